//! Core traits for braid providers and the backends they wrap.

mod backend;
mod provider;

pub use backend::*;
pub use provider::*;
