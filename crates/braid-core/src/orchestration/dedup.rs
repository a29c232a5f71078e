//! Content-prefix deduplication.
//!
//! Two items are duplicates when their normalized content shares the same
//! leading 100 characters. The higher weighted score survives; on a tie the
//! item seen first is kept.

use std::collections::HashMap;

use crate::types::RankedItem;

/// Number of normalized characters that make up a fingerprint.
pub const FINGERPRINT_CHARS: usize = 100;

/// Cheap near-duplicate key for a piece of content.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentFingerprint {
    len: usize,
    prefix: String,
}

impl ContentFingerprint {
    /// Lowercase, collapse whitespace runs to one space, trim, and keep the
    /// first [`FINGERPRINT_CHARS`] characters.
    pub fn of(content: &str) -> Self {
        let normalized = content
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        let prefix: String = normalized.chars().take(FINGERPRINT_CHARS).collect();

        Self {
            len: prefix.chars().count(),
            prefix,
        }
    }

    /// Length of the prefix, in characters.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the content was blank.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The normalized prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

/// Collapse items with identical fingerprints across all sources.
///
/// Output keeps the position of each fingerprint's first occurrence; callers
/// re-rank afterwards.
pub fn deduplicate(items: Vec<RankedItem>) -> Vec<RankedItem> {
    if items.len() <= 1 {
        return items;
    }

    let mut slots: HashMap<ContentFingerprint, usize> = HashMap::with_capacity(items.len());
    let mut kept: Vec<RankedItem> = Vec::with_capacity(items.len());

    for item in items {
        let key = ContentFingerprint::of(item.content());
        match slots.get(&key) {
            Some(&idx) => {
                if item.weighted_score > kept[idx].weighted_score {
                    kept[idx] = item;
                }
            }
            None => {
                slots.insert(key, kept.len());
                kept.push(item);
            }
        }
    }

    kept
}
