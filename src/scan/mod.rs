//! Incremental tokenization.
//!
//! - [`Scanner`] - Iterator of tokens over a [`std::io::Read`]
//! - [`ScanState`] - Scanner lifecycle state
//! - [`split`] - Split function contract and the standard policies

pub(crate) mod engine;
mod iter;
pub mod split;

pub use engine::{MAX_EMPTY_TOKENS, ScanState};
pub use iter::Scanner;
