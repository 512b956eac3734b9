//! Core scanning engine shared by the sync iterator and the async stream.
//!
//! [`TokenBuffer`] owns the growable buffer, the split function and the state
//! machine, but never touches I/O. Its caller alternates between [`step`]
//! and feeding it bytes:
//!
//! ```text
//! loop {
//!     match core.step() {
//!         Step::Token(t) => yield t,
//!         Step::Read(n)  => { let slot = core.read_slot(n); let got = read(slot)?; core.commit_read(got) }
//!         Step::Done     => return,
//!         Step::Failed(e) => yield error, return,
//!     }
//! }
//! ```
//!
//! [`step`]: TokenBuffer::step

use bytes::{Buf, Bytes, BytesMut};

use crate::config::ScanConfig;
use crate::error::{ReplicaError, SplitError};

use super::split::{Split, SplitFn};

/// Consecutive empty, non-consuming tokens tolerated before giving up.
pub const MAX_EMPTY_TOKENS: usize = 100;

/// Where the scanner is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScanState {
    /// Waiting on the stream for more bytes.
    NeedMoreInput,
    /// The last call yielded a token.
    TokenReady,
    /// Finished, either at end-of-stream or after an error. Nothing more will
    /// be yielded.
    Done,
}

/// What the driver should do next.
#[derive(Debug)]
pub(crate) enum Step {
    /// Yield this token.
    Token(Bytes),
    /// Read up to this many bytes into [`TokenBuffer::read_slot`].
    Read(usize),
    /// Scan finished cleanly.
    Done,
    /// Scan failed; the state is already `Done`.
    Failed(ReplicaError),
}

#[derive(Debug)]
pub(crate) struct TokenBuffer<S> {
    buf: BytesMut,
    split: S,
    config: ScanConfig,
    state: ScanState,
    eof: bool,
    empty_tokens: usize,
    read_start: usize,
}

impl<S: SplitFn> TokenBuffer<S> {
    pub(crate) fn new(split: S, config: ScanConfig) -> Self {
        Self {
            buf: BytesMut::with_capacity(config.read_size()),
            split,
            config,
            state: ScanState::NeedMoreInput,
            eof: false,
            empty_tokens: 0,
            read_start: 0,
        }
    }

    /// Runs the split function over the buffer until it yields a token, needs
    /// input, or the scan ends.
    pub(crate) fn step(&mut self) -> Step {
        loop {
            if self.state == ScanState::Done {
                return Step::Done;
            }

            if !self.buf.is_empty() || self.eof {
                let len = self.buf.len();
                let outcome = match self.split.split(&self.buf, self.eof) {
                    Ok(outcome) => outcome,
                    Err(e) => return Step::Failed(self.abort(e.into())),
                };

                match outcome {
                    Split::Token { consumed, token } => {
                        let end = consumed.max(token.end);
                        if end > len || token.start > token.end {
                            let err = SplitError::OutOfRange { end, len };
                            return Step::Failed(self.abort(err.into()));
                        }
                        if consumed == 0 && token.is_empty() {
                            self.empty_tokens += 1;
                            if self.empty_tokens > MAX_EMPTY_TOKENS {
                                let err = SplitError::NoProgress(MAX_EMPTY_TOKENS);
                                return Step::Failed(self.abort(err.into()));
                            }
                        } else {
                            self.empty_tokens = 0;
                        }
                        self.state = ScanState::TokenReady;
                        return Step::Token(self.take_token(consumed, token));
                    }
                    Split::Skip(k) if k > 0 => {
                        if k > len {
                            let err = SplitError::OutOfRange { end: k, len };
                            return Step::Failed(self.abort(err.into()));
                        }
                        self.buf.advance(k);
                        continue;
                    }
                    Split::Skip(_) | Split::Need => {
                        if self.eof {
                            tracing::debug!(leftover = len, "scan reached end of stream");
                            self.state = ScanState::Done;
                            return Step::Done;
                        }
                    }
                }
            }

            let len = self.buf.len();
            let max = self.config.max_token_size();
            if len >= max {
                tracing::warn!(size = len, max, "token exceeds buffer limit");
                return Step::Failed(self.abort(ReplicaError::TokenTooLarge { size: len, max }));
            }

            self.state = ScanState::NeedMoreInput;
            return Step::Read(self.config.read_size().min(max - len));
        }
    }

    /// Grows the buffer by `want` zeroed bytes and returns them for reading into.
    pub(crate) fn read_slot(&mut self, want: usize) -> &mut [u8] {
        self.read_start = self.buf.len();
        self.buf.resize(self.read_start + want, 0);
        &mut self.buf[self.read_start..]
    }

    /// Keeps the first `n` bytes of the last read slot. Zero marks end-of-stream.
    pub(crate) fn commit_read(&mut self, n: usize) {
        self.buf.truncate(self.read_start + n);
        if n == 0 {
            self.eof = true;
        }
        tracing::trace!(bytes = n, buffered = self.buf.len(), "scan read");
    }

    /// Discards the last read slot without marking end-of-stream.
    #[cfg_attr(not(feature = "async-io"), allow(dead_code))]
    pub(crate) fn cancel_read(&mut self) {
        self.buf.truncate(self.read_start);
    }

    /// Ends the scan, handing `err` back for the caller to report.
    pub(crate) fn abort(&mut self, err: ReplicaError) -> ReplicaError {
        self.state = ScanState::Done;
        self.buf.clear();
        err
    }

    pub(crate) fn state(&self) -> ScanState {
        self.state
    }

    pub(crate) fn buffered(&self) -> usize {
        self.buf.len()
    }

    fn take_token(&mut self, consumed: usize, token: std::ops::Range<usize>) -> Bytes {
        if token.end <= consumed {
            // Token lies inside the consumed prefix: hand out a slice of it
            return self.buf.split_to(consumed).freeze().slice(token);
        }
        let out = Bytes::copy_from_slice(&self.buf[token]);
        self.buf.advance(consumed);
        out
    }
}
