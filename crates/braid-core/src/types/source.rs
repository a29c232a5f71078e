//! Information source kinds.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// The backend family an [`InformationItem`](super::InformationItem) came from.
///
/// The source fixes both the weight applied to an item's raw score and the
/// section the item lands in when the context is assembled.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[strum(serialize_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub enum InformationSource {
    /// Vector search over knowledge-graph entities, relations, and topics.
    KnowledgeGraph,
    /// Vector search over static system design documentation.
    DesignDocs,
    /// Search performed through an MCP tool call.
    Mcp,
    /// Anything else.
    Other,
}

impl InformationSource {
    /// Fixed order in which source groups appear in the assembled context.
    pub const PRECEDENCE: [InformationSource; 4] = [
        InformationSource::KnowledgeGraph,
        InformationSource::DesignDocs,
        InformationSource::Mcp,
        InformationSource::Other,
    ];

    /// Position of this source in [`Self::PRECEDENCE`].
    pub fn precedence(self) -> usize {
        match self {
            InformationSource::KnowledgeGraph => 0,
            InformationSource::DesignDocs => 1,
            InformationSource::Mcp => 2,
            InformationSource::Other => 3,
        }
    }

    /// Section header used for this source's group in the assembled context.
    pub fn label(self) -> &'static str {
        match self {
            InformationSource::KnowledgeGraph => "Knowledge graph information",
            InformationSource::DesignDocs => "System design documentation",
            InformationSource::Mcp => "Information via MCP",
            InformationSource::Other => "Other information",
        }
    }

    /// Short prefix used when adapters mint per-call item ids.
    pub fn id_prefix(self) -> &'static str {
        match self {
            InformationSource::KnowledgeGraph => "kg",
            InformationSource::DesignDocs => "dd",
            InformationSource::Mcp => "mcp",
            InformationSource::Other => "other",
        }
    }
}
