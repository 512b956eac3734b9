//! Synchronous scanner - an iterator of tokens over a [`std::io::Read`].

use std::io::Read;
use std::iter::FusedIterator;

use bytes::Bytes;

use crate::config::ScanConfig;
use crate::error::ReplicaError;

use super::engine::{ScanState, Step, TokenBuffer};
use super::split::SplitFn;

/// An iterator that splits a reader into tokens.
///
/// Reads lazily, at most [`ScanConfig::read_size`] bytes at a time, and keeps
/// its own buffer, which grows while the split function needs more input, up
/// to [`ScanConfig::max_token_size`]. The sequence is single pass: after the
/// last token or the first error, `next()` keeps returning `None`.
///
/// Reading through a [`Duplicator`](crate::Duplicator) or
/// [`DuplicatorChain`](crate::DuplicatorChain) tokenizes the stream while it
/// is being replicated; a sink failure ends the scan with
/// [`ReplicaError::SinkWrite`].
///
/// # Example
///
/// ```
/// use teestream::{Scanner, split::Words};
///
/// let tokens: Vec<_> = Scanner::new(&b"hoge fuga\nfoo bar"[..], Words)
///     .collect::<Result<_, _>>()?;
///
/// assert_eq!(tokens, ["hoge", "fuga", "foo", "bar"]);
/// # Ok::<(), teestream::ReplicaError>(())
/// ```
#[derive(Debug)]
pub struct Scanner<R, S> {
    reader: R,
    core: TokenBuffer<S>,
}

impl<R: Read, S: SplitFn> Scanner<R, S> {
    /// Creates a scanner with the default [`ScanConfig`].
    pub fn new(reader: R, split: S) -> Self {
        Self {
            reader,
            core: TokenBuffer::new(split, ScanConfig::default()),
        }
    }

    /// Creates a scanner with a custom configuration.
    ///
    /// # Errors
    ///
    /// [`ReplicaError::InvalidConfig`] if `config` doesn't validate.
    pub fn with_config(reader: R, split: S, config: ScanConfig) -> Result<Self, ReplicaError> {
        config.validate()?;
        Ok(Self {
            reader,
            core: TokenBuffer::new(split, config),
        })
    }
}

impl<R, S: SplitFn> Scanner<R, S> {
    /// Returns the current state.
    pub fn state(&self) -> ScanState {
        self.core.state()
    }

    /// Returns the number of bytes buffered but not yet consumed.
    pub fn buffered(&self) -> usize {
        self.core.buffered()
    }

    /// Returns a reference to the underlying reader.
    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    /// Consumes the scanner, returning the underlying reader.
    ///
    /// Buffered bytes that were read but not yet tokenized are lost.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read, S: SplitFn> Iterator for Scanner<R, S> {
    type Item = Result<Bytes, ReplicaError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.core.step() {
                Step::Token(token) => return Some(Ok(token)),
                Step::Done => return None,
                Step::Failed(err) => return Some(Err(err)),
                Step::Read(want) => {
                    let slot = self.core.read_slot(want);
                    match self.reader.read(slot) {
                        Ok(n) => self.core.commit_read(n),
                        Err(e) => return Some(Err(self.core.abort(e.into()))),
                    }
                }
            }
        }
    }
}

impl<R: Read, S: SplitFn> FusedIterator for Scanner<R, S> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::split::{Lines, Words};
    use std::io;

    struct FailAfter<'a> {
        data: &'a [u8],
    }

    impl Read for FailAfter<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.data.is_empty() {
                return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "truncated"));
            }
            self.data.read(buf)
        }
    }

    #[test]
    fn test_empty_input() {
        let mut scanner = Scanner::new(&b""[..], Lines);
        assert!(scanner.next().is_none());
        assert_eq!(scanner.state(), ScanState::Done);
    }

    #[test]
    fn test_read_error_ends_scan() {
        let mut scanner = Scanner::new(FailAfter { data: b"one\ntwo" }, Lines);

        assert_eq!(scanner.next().unwrap().unwrap(), "one");
        let err = scanner.next().unwrap().unwrap_err();
        assert!(matches!(err, ReplicaError::SourceRead(ref e) if e.kind() == io::ErrorKind::UnexpectedEof));
        assert!(scanner.next().is_none());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ScanConfig::default().with_read_size(0);
        assert!(Scanner::with_config(&b""[..], Words, config).is_err());
    }

    #[test]
    fn test_state_transitions() {
        let config = ScanConfig::new(4, 64).unwrap();
        let mut scanner = Scanner::with_config(&b"ab cd"[..], Words, config).unwrap();
        assert_eq!(scanner.state(), ScanState::NeedMoreInput);

        assert_eq!(scanner.next().unwrap().unwrap(), "ab");
        assert_eq!(scanner.state(), ScanState::TokenReady);
        assert_eq!(scanner.buffered(), 1);

        assert_eq!(scanner.next().unwrap().unwrap(), "cd");
        assert!(scanner.next().is_none());
        assert_eq!(scanner.state(), ScanState::Done);
    }
}
