//! Splitting rendered markdown contexts into per-section items.

/// One `## `-headed section of a rendered context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Header line without the `## ` marker.
    pub title: String,
    /// Everything under the header, trimmed.
    pub body: String,
}

impl Section {
    /// Render the section back into markdown.
    pub fn render(&self) -> String {
        format!("## {}\n{}", self.title, self.body)
    }
}

/// Split `context` on `"\n## "` boundaries.
///
/// The first line of each chunk is the title; sections with an empty body are
/// dropped. A context that opens with a header keeps its first title clean.
pub fn split_sections(context: &str) -> Vec<Section> {
    if context.trim().is_empty() {
        return Vec::new();
    }

    context
        .split("\n## ")
        .enumerate()
        .filter_map(|(idx, chunk)| {
            if chunk.trim().is_empty() {
                return None;
            }

            let (head, rest) = chunk.split_once('\n').unwrap_or((chunk, ""));
            let mut title = head.trim();
            if idx == 0 {
                title = title.strip_prefix("## ").unwrap_or(title).trim();
            }

            let body = rest.trim();
            if body.is_empty() {
                return None;
            }

            Some(Section {
                title: title.to_string(),
                body: body.to_string(),
            })
        })
        .collect()
}
