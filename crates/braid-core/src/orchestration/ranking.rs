//! Global ranking, relevance filtering, and the optional diversity pass.

use std::cmp::Ordering;
use std::collections::HashSet;

use ordered_float::OrderedFloat;

use crate::types::RankedItem;

/// Sort by weighted score descending. Ties fall back to id, then source precedence.
pub fn rank(items: &mut [RankedItem]) {
    items.sort_by(compare);
}

fn compare(a: &RankedItem, b: &RankedItem) -> Ordering {
    OrderedFloat(b.weighted_score)
        .cmp(&OrderedFloat(a.weighted_score))
        .then_with(|| a.id().cmp(b.id()))
        .then_with(|| a.source().precedence().cmp(&b.source().precedence()))
}

/// Drop items whose weighted score is below `min_score`. Order is preserved.
pub fn filter_relevant(items: Vec<RankedItem>, min_score: f32) -> Vec<RankedItem> {
    items
        .into_iter()
        .filter(|item| item.weighted_score >= min_score)
        .collect()
}

/// Drop candidates too similar to a higher-ranked one already kept.
///
/// Similarity is the Jaccard index of lowercase word sets; a candidate goes
/// when it reaches `1 - threshold` against any kept item. Expects ranked input.
pub fn diversify(items: Vec<RankedItem>, threshold: f32) -> Vec<RankedItem> {
    let cutoff = 1.0 - threshold;
    let mut kept: Vec<RankedItem> = Vec::with_capacity(items.len());
    let mut kept_words: Vec<HashSet<String>> = Vec::with_capacity(items.len());

    for item in items {
        let words = word_set(item.content());
        let redundant = kept_words
            .iter()
            .any(|other| jaccard(&words, other) >= cutoff);
        if !redundant {
            kept_words.push(words);
            kept.push(item);
        }
    }

    kept
}

fn word_set(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f32 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    intersection as f32 / union as f32
}
