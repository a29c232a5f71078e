//! Grouped context rendering.

use crate::types::{InformationSource, RankedItem};

/// Render selected items grouped by source.
///
/// Groups appear in [`InformationSource::PRECEDENCE`] order, each under a
/// `## ` header with its items in selection order, separated by blank lines.
/// Empty groups are omitted; no items gives an empty string.
pub fn build_context(items: &[RankedItem]) -> String {
    let mut blocks: Vec<String> = Vec::new();

    for source in InformationSource::PRECEDENCE {
        let contents: Vec<&str> = items
            .iter()
            .filter(|item| item.source() == source)
            .map(|item| item.content().trim())
            .filter(|content| !content.is_empty())
            .collect();

        if contents.is_empty() {
            continue;
        }

        blocks.push(format!("## {}\n\n{}", source.label(), contents.join("\n\n")));
    }

    blocks.join("\n\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::InformationItem;

    fn ranked(id: &str, source: InformationSource, content: &str) -> RankedItem {
        RankedItem::weighted(InformationItem::new(id, source, content, 1.0), 1.0)
    }

    #[test]
    fn empty_selection_is_empty_string() {
        assert_eq!(build_context(&[]), "");
    }

    #[test]
    fn groups_follow_precedence_not_selection_order() {
        let items = vec![
            ranked("o", InformationSource::Other, "other fact"),
            ranked("m", InformationSource::Mcp, "mcp fact"),
            ranked("k1", InformationSource::KnowledgeGraph, "kg first"),
            ranked("k2", InformationSource::KnowledgeGraph, "kg second"),
        ];

        let context = build_context(&items);
        assert_eq!(
            context,
            "## Knowledge graph information\n\nkg first\n\nkg second\n\n\
             ## Information via MCP\n\nmcp fact\n\n\
             ## Other information\n\nother fact"
        );
        assert!(!context.contains("System design documentation"));
    }
}
