//! BLAKE3 hashing state.

use super::Digest;

/// Incremental BLAKE3 hasher producing [`Digest`]s.
#[derive(Debug, Clone, Default)]
pub struct Blake3Hasher {
    state: blake3::Hasher,
}

impl Blake3Hasher {
    /// Creates a new hasher.
    pub fn new() -> Self {
        Self {
            state: blake3::Hasher::new(),
        }
    }

    /// Updates the hasher with more data.
    pub fn update(&mut self, data: &[u8]) {
        self.state.update(data);
    }

    /// Returns the digest of everything fed so far.
    pub fn finalize(&self) -> Digest {
        Digest::new(self.state.finalize().into())
    }

    /// One-shot hash.
    pub fn hash(data: &[u8]) -> Digest {
        Digest::new(blake3::hash(data).into())
    }
}
