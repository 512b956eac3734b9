//! Content digests for replicated streams.
//!
//! - [`Digest`] - 32-byte BLAKE3 digest
//! - [`HashingSink`] - `Write` adapter that hashes everything its inner sink
//!   accepts, so sinks can be compared without keeping their bytes around
//!
//! Requires the `hash-blake3` feature.

mod blake3;
mod digest;
mod sink;

pub use digest::Digest;
pub use sink::{HashingSink, digest};

pub(crate) use self::blake3::Blake3Hasher;
