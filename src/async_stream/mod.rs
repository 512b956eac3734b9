//! Async replication and scanning over `futures-io`.
//!
//! Runtime-agnostic: anything implementing `futures_io::AsyncRead` /
//! `AsyncWrite` works (tokio through `tokio_util::compat`, async-std, smol).
//!
//! - [`AsyncDuplicator`] - async reader that replicates into an async sink
//! - [`scan_async`] - async stream of tokens from an async reader
//!
//! This module requires the `async-io` feature to be enabled.

mod duplicator;
mod stream;

pub use duplicator::AsyncDuplicator;
pub use stream::{TokenStream, scan_async};
