//! Core types for braid.

mod information_item;
mod source;

pub use information_item::*;
pub use source::InformationSource;
