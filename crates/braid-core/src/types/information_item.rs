//! Information item types.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::source::InformationSource;

/// Descriptive metadata attached to an item.
///
/// Only `title` is ever looked at by the pipeline, and then only as a label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemMetadata {
    /// Section or document title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Provider-specific kind ("knowledgeGraph", "designDoc", ...).
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub item_type: Option<String>,
    /// Timestamp reported by the backend, verbatim.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Link back to the original record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Provider-specific extras.
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl ItemMetadata {
    /// Metadata carrying a title and a type.
    pub fn titled(title: impl Into<String>, item_type: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            item_type: Some(item_type.into()),
            ..Default::default()
        }
    }
}

/// The atomic unit of retrieved content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InformationItem {
    /// Identifier, unique within one orchestration call.
    pub id: String,
    /// Which backend family produced the item.
    pub source: InformationSource,
    /// Human-readable text, already truncated by the provider.
    pub content: String,
    /// Raw relevance in `[0, 1]` as reported by the provider.
    pub score: f32,
    /// Optional descriptive metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ItemMetadata>,
}

impl InformationItem {
    /// Create a new item. The score is clamped into `[0, 1]`.
    pub fn new(
        id: impl Into<String>,
        source: InformationSource,
        content: impl Into<String>,
        score: f32,
    ) -> Self {
        Self {
            id: id.into(),
            source,
            content: content.into(),
            score: clamp_score(score),
            metadata: None,
        }
    }

    /// Set the score (clamped into `[0, 1]`).
    pub fn with_score(mut self, score: f32) -> Self {
        self.score = clamp_score(score);
        self
    }

    /// Set the metadata.
    pub fn with_metadata(mut self, metadata: ItemMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Set the title, creating metadata when the item has none.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.metadata.get_or_insert_with(ItemMetadata::default).title = Some(title.into());
        self
    }

    /// Title from the metadata, if any.
    pub fn title(&self) -> Option<&str> {
        self.metadata.as_ref().and_then(|m| m.title.as_deref())
    }
}

/// Normalize a provider score into `[0, 1]`; non-finite values become 0.
pub fn clamp_score(score: f32) -> f32 {
    if score.is_finite() {
        score.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// An item after provider weighting, as it moves through the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedItem {
    /// The item as returned by its provider.
    #[serde(flatten)]
    pub item: InformationItem,
    /// `item.score * provider weight`.
    pub weighted_score: f32,
    /// Whether the content was cut to fit the token budget.
    #[serde(default, skip_serializing_if = "is_false")]
    pub truncated: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl RankedItem {
    /// Weight an item.
    pub fn weighted(item: InformationItem, weight: f32) -> Self {
        let weighted_score = item.score * weight;
        Self {
            item,
            weighted_score,
            truncated: false,
        }
    }

    /// Item id.
    pub fn id(&self) -> &str {
        &self.item.id
    }

    /// Item source.
    pub fn source(&self) -> InformationSource {
        self.item.source
    }

    /// Item content.
    pub fn content(&self) -> &str {
        &self.item.content
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_clamps_score() {
        let item = InformationItem::new("a", InformationSource::Other, "text", 1.7);
        assert_eq!(item.score, 1.0);
        let item = item.with_score(-0.2);
        assert_eq!(item.score, 0.0);
        let item = item.with_score(f32::NAN);
        assert_eq!(item.score, 0.0);
    }

    #[test]
    fn weighting_multiplies_score() {
        let item = InformationItem::new("kg-0", InformationSource::KnowledgeGraph, "x", 0.9);
        let ranked = RankedItem::weighted(item, 0.5);
        assert!((ranked.weighted_score - 0.45).abs() < 1e-6);
        assert_eq!(ranked.item.score, 0.9);
        assert!(!ranked.truncated);
    }

    #[test]
    fn with_title_creates_or_updates_metadata() {
        let item = InformationItem::new("n-1", InformationSource::Other, "text", 0.4)
            .with_title("Standups");
        assert_eq!(item.title(), Some("Standups"));

        let item = InformationItem::new("dd-0", InformationSource::DesignDocs, "text", 0.7)
            .with_metadata(ItemMetadata::titled("Queues", "designDoc"))
            .with_title("Job queues");
        let meta = item.metadata.as_ref().unwrap();
        assert_eq!(meta.title.as_deref(), Some("Job queues"));
        assert_eq!(meta.item_type.as_deref(), Some("designDoc"));
    }

    #[test]
    fn metadata_serializes_type_and_extras() {
        let mut meta = ItemMetadata::titled("Entities", "knowledgeGraph");
        meta.extra
            .insert("organizationId".to_string(), serde_json::json!("org-1"));
        let item = InformationItem::new("kg-0", InformationSource::KnowledgeGraph, "x", 0.5)
            .with_metadata(meta);

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["source"], "knowledgeGraph");
        assert_eq!(json["metadata"]["type"], "knowledgeGraph");
        assert_eq!(json["metadata"]["organizationId"], "org-1");
        assert_eq!(item.title(), Some("Entities"));
    }
}
