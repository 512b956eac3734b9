//! A sink that hashes what it forwards.

use std::io::{self, Write};

use super::{Blake3Hasher, Digest};

/// A `Write` adapter that hashes exactly the bytes its inner sink accepted.
///
/// Wrap [`std::io::sink()`] to get a digest-only sink that stores nothing.
///
/// # Example
///
/// ```
/// use std::io::Write;
/// use teestream::{HashingSink, digest};
///
/// let mut sink = HashingSink::new(std::io::sink());
/// sink.write_all(b"hoge fuga")?;
///
/// assert_eq!(sink.digest(), digest(b"hoge fuga"));
/// assert_eq!(sink.bytes_written(), 9);
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct HashingSink<W> {
    inner: W,
    hasher: Blake3Hasher,
    written: u64,
}

impl<W> HashingSink<W> {
    /// Wraps `inner`.
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            hasher: Blake3Hasher::new(),
            written: 0,
        }
    }

    /// Returns the digest of everything written so far.
    pub fn digest(&self) -> Digest {
        self.hasher.finalize()
    }

    /// Returns the number of bytes written so far.
    pub fn bytes_written(&self) -> u64 {
        self.written
    }

    /// Returns a reference to the inner sink.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Consumes the adapter, returning the inner sink and the final digest.
    pub fn into_parts(self) -> (W, Digest) {
        let digest = self.digest();
        (self.inner, digest)
    }
}

impl<W: Write> Write for HashingSink<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.hasher.update(&buf[..n]);
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Computes the [`Digest`] of `data` in one shot.
pub fn digest(data: &[u8]) -> Digest {
    Blake3Hasher::hash(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forwards_and_hashes() {
        let mut sink = HashingSink::new(Vec::<u8>::new());
        sink.write_all(b"foo ").unwrap();
        sink.write_all(b"bar").unwrap();

        let (inner, d) = sink.into_parts();
        assert_eq!(inner, b"foo bar");
        assert_eq!(d, digest(b"foo bar"));
    }

    #[test]
    fn test_hashes_only_accepted_bytes() {
        let mut buf = [0u8; 4];
        let mut sink = HashingSink::new(&mut buf[..]);

        // A fixed slice takes what fits
        assert_eq!(sink.write(b"abcdef").unwrap(), 4);
        assert_eq!(sink.digest(), digest(b"abcd"));
        assert_eq!(sink.bytes_written(), 4);
    }
}
