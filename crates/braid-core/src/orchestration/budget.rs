//! Greedy token-budget packing.

use crate::types::RankedItem;

/// Characters per estimated token.
pub const CHARS_PER_TOKEN: usize = 4;

/// A partial item is only added when more than this many tokens remain.
pub const MIN_TRUNCATION_TOKENS: usize = 100;

/// Appended to an item cut to fit the remaining budget.
pub const TRUNCATION_MARKER: &str = "\n\n(content truncated to fit the context budget)";

/// Estimated token cost: a quarter token per character, rounded up.
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(CHARS_PER_TOKEN)
}

/// Items chosen for the context and what they cost.
#[derive(Debug, Clone, Default)]
pub struct BudgetSelection {
    pub items: Vec<RankedItem>,
    /// Estimated tokens of the selected contents, marker included.
    pub used_tokens: usize,
}

/// Walk ranked candidates and keep whole items while they fit.
///
/// The first item that does not fit closes the budget. If more than
/// [`MIN_TRUNCATION_TOKENS`] remain at that point, a cut-down copy of it is
/// added first.
pub fn select_within_budget(candidates: Vec<RankedItem>, max_tokens: usize) -> BudgetSelection {
    let mut selection = BudgetSelection::default();

    for mut candidate in candidates {
        let cost = estimate_tokens(candidate.content());
        if selection.used_tokens + cost <= max_tokens {
            selection.used_tokens += cost;
            selection.items.push(candidate);
            continue;
        }

        let remaining = max_tokens.saturating_sub(selection.used_tokens);
        if remaining > MIN_TRUNCATION_TOKENS {
            let keep_chars = remaining * CHARS_PER_TOKEN;
            let mut content: String = candidate.content().chars().take(keep_chars).collect();
            content.push_str(TRUNCATION_MARKER);

            selection.used_tokens += estimate_tokens(&content);
            candidate.item.content = content;
            candidate.truncated = true;
            selection.items.push(candidate);
        }
        break;
    }

    selection
}
