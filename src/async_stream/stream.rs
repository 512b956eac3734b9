//! Async token stream.

use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures_core::{FusedStream, Stream};
use futures_io::AsyncRead;
use pin_project_lite::pin_project;

use crate::config::ScanConfig;
use crate::error::ReplicaError;
use crate::scan::ScanState;
use crate::scan::engine::{Step, TokenBuffer};
use crate::scan::split::SplitFn;

pin_project! {
    /// A stream of tokens from an async reader.
    ///
    /// Async twin of [`Scanner`](crate::Scanner) with the same buffering,
    /// limits and error behaviour.
    #[derive(Debug)]
    pub struct TokenStream<R, S> {
        #[pin]
        reader: R,
        core: TokenBuffer<S>,
    }
}

impl<R: AsyncRead, S: SplitFn> TokenStream<R, S> {
    /// Creates a token stream with the default [`ScanConfig`].
    pub fn new(reader: R, split: S) -> Self {
        Self {
            reader,
            core: TokenBuffer::new(split, ScanConfig::default()),
        }
    }

    /// Creates a token stream with a custom configuration.
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

impl<R, S: SplitFn> TokenStream<R, S> {
    /// Returns the current state.
    pub fn state(&self) -> ScanState {
        self.core.state()
    }

    /// Consumes the stream, returning the underlying reader.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: AsyncRead, S: SplitFn> Stream for TokenStream<R, S> {
    type Item = Result<Bytes, ReplicaError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        loop {
            match this.core.step() {
                Step::Token(token) => return Poll::Ready(Some(Ok(token))),
                Step::Done => return Poll::Ready(None),
                Step::Failed(err) => return Poll::Ready(Some(Err(err))),
                Step::Read(want) => {
                    let slot = this.core.read_slot(want);
                    match this.reader.as_mut().poll_read(cx, slot) {
                        Poll::Pending => {
                            this.core.cancel_read();
                            return Poll::Pending;
                        }
                        Poll::Ready(Ok(n)) => this.core.commit_read(n),
                        Poll::Ready(Err(e)) => {
                            return Poll::Ready(Some(Err(this.core.abort(e.into()))));
                        }
                    }
                }
            }
        }
    }
}

impl<R: AsyncRead, S: SplitFn> FusedStream for TokenStream<R, S> {
    fn is_terminated(&self) -> bool {
        self.core.state() == ScanState::Done
    }
}

/// Creates a token stream from an async reader with the default
/// [`ScanConfig`].
///
/// For tokio readers, convert with `tokio_util::compat`:
///
/// ```ignore
/// use tokio_util::compat::TokioAsyncReadCompatExt;
/// use teestream::{scan_async, split::Lines};
///
/// let file = tokio::fs::File::open("log.txt").await?;
/// let mut lines = scan_async(file.compat(), Lines);
/// while let Some(line) = lines.next().await {
///     println!("{}", String::from_utf8_lossy(&line?));
/// }
/// ```
pub fn scan_async<R: AsyncRead, S: SplitFn>(reader: R, split: S) -> TokenStream<R, S> {
    TokenStream::new(reader, split)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::split::{Lines, Words};
    use futures_util::StreamExt;
    use futures_util::io::Cursor;
    use std::io;

    /// Yields one byte per poll, returning `Pending` in between.
    struct Dribble {
        data: Vec<u8>,
        pos: usize,
        ready: bool,
    }

    impl AsyncRead for Dribble {
        fn poll_read(
            mut self: Pin<&mut Self>,
            cx: &mut Context<'_>,
            buf: &mut [u8],
        ) -> Poll<io::Result<usize>> {
            if !self.ready {
                self.ready = true;
                cx.waker().wake_by_ref();
                return Poll::Pending;
            }
            self.ready = false;
            if self.pos == self.data.len() || buf.is_empty() {
                return Poll::Ready(Ok(0));
            }
            buf[0] = self.data[self.pos];
            self.pos += 1;
            Poll::Ready(Ok(1))
        }
    }

    #[tokio::test]
    async fn test_words_stream() {
        let stream = scan_async(Cursor::new(b"hoge fuga\nfoo bar".to_vec()), Words);
        let words: Vec<_> = stream.map(|t| t.unwrap()).collect().await;
        assert_eq!(words, vec!["hoge", "fuga", "foo", "bar"]);
    }

    #[tokio::test]
    async fn test_pending_reader_keeps_partial_token() {
        let reader = Dribble {
            data: b"one\ntwo\n".to_vec(),
            pos: 0,
            ready: false,
        };
        let mut stream = scan_async(reader, Lines);

        assert_eq!(stream.next().await.unwrap().unwrap(), "one");
        assert_eq!(stream.next().await.unwrap().unwrap(), "two");
        assert!(stream.next().await.is_none());
        assert!(stream.is_terminated());
    }

    #[tokio::test]
    async fn test_token_too_large() {
        let config = ScanConfig::new(4, 8).unwrap();
        let mut stream =
            TokenStream::with_config(Cursor::new(vec![b'x'; 32]), Lines, config).unwrap();

        let err = stream.next().await.unwrap().unwrap_err();
        assert!(matches!(err, ReplicaError::TokenTooLarge { max: 8, .. }));
        assert!(stream.next().await.is_none());
    }
}
