//! Async counterpart of [`Duplicator`](crate::Duplicator).

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll, ready};

use futures_io::{AsyncRead, AsyncWrite};
use pin_project_lite::pin_project;

use crate::error::ReplicaError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Nothing buffered; the next poll reads upstream.
    Idle,
    /// A chunk was read and is waiting for the sink to accept it.
    Writing,
    /// The sink has the chunk; hand it to the caller from `pos`.
    Serving { pos: usize },
}

pin_project! {
    /// An async reader that writes every chunk it returns to a sink first.
    ///
    /// Same contract as [`Duplicator`](crate::Duplicator): one `poll_write`
    /// per non-empty chunk, completed before the chunk is handed to the
    /// caller, and a short or failed write fails the read with
    /// [`ReplicaError::SinkWrite`]. If the sink returns `Pending`, the read
    /// does too and the chunk is held until the sink is ready.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use futures_util::AsyncReadExt;
    /// use teestream::AsyncDuplicator;
    ///
    /// let mut copy = Vec::new();
    /// let mut dup = AsyncDuplicator::new(&b"hoge fuga"[..], futures_util::io::Cursor::new(&mut copy));
    ///
    /// let mut out = Vec::new();
    /// dup.read_to_end(&mut out).await?;
    /// ```
    #[derive(Debug)]
    pub struct AsyncDuplicator<R, W> {
        #[pin]
        reader: R,
        #[pin]
        sink: W,
        sink_index: usize,
        chunk: Vec<u8>,
        phase: Phase,
        replicated: u64,
    }
}

impl<R, W> AsyncDuplicator<R, W> {
    /// Creates a duplicator reading from `reader` and replicating into `sink`.
    pub fn new(reader: R, sink: W) -> Self {
        Self {
            reader,
            sink,
            sink_index: 0,
            chunk: Vec::new(),
            phase: Phase::Idle,
            replicated: 0,
        }
    }

    /// Sets the index reported in [`ReplicaError::SinkWrite`] for this sink.
    pub fn with_sink_index(mut self, index: usize) -> Self {
        self.sink_index = index;
        self
    }

    /// Returns the total number of bytes the sink has accepted.
    pub fn replicated(&self) -> u64 {
        self.replicated
    }

    /// Returns a reference to the upstream reader.
    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    /// Returns a reference to the sink.
    pub fn sink(&self) -> &W {
        &self.sink
    }

    /// Consumes the duplicator, returning the reader and the sink.
    ///
    /// A chunk already written to the sink but not yet read by the caller is
    /// lost.
    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.sink)
    }
}

impl<R: AsyncRead, W: AsyncWrite> AsyncRead for AsyncDuplicator<R, W> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut [u8],
    ) -> Poll<io::Result<usize>> {
        let mut this = self.project();

        loop {
            match *this.phase {
                Phase::Idle => {
                    if buf.is_empty() {
                        return Poll::Ready(Ok(0));
                    }
                    this.chunk.resize(buf.len(), 0);
                    let n = ready!(this.reader.as_mut().poll_read(cx, &mut this.chunk[..]))?;
                    if n == 0 {
                        this.chunk.clear();
                        tracing::debug!(sink = *this.sink_index, "async upstream reached end of stream");
                        return Poll::Ready(Ok(0));
                    }
                    this.chunk.truncate(n);
                    *this.phase = Phase::Writing;
                }
                Phase::Writing => {
                    let len = this.chunk.len();
                    let index = *this.sink_index;
                    let result = ready!(this.sink.as_mut().poll_write(cx, &this.chunk[..]));
                    let err = match result {
                        Ok(written) if written == len => {
                            *this.replicated += len as u64;
                            *this.phase = Phase::Serving { pos: 0 };
                            tracing::trace!(sink = index, bytes = len, "chunk replicated");
                            continue;
                        }
                        Ok(written) => ReplicaError::short_write(index, written, len),
                        Err(source) => ReplicaError::SinkWrite { sink: index, source },
                    };
                    tracing::warn!(sink = index, error = %err, "sink rejected chunk");
                    this.chunk.clear();
                    *this.phase = Phase::Idle;
                    return Poll::Ready(Err(err.into()));
                }
                Phase::Serving { pos } => {
                    let n = buf.len().min(this.chunk.len() - pos);
                    buf[..n].copy_from_slice(&this.chunk[pos..pos + n]);
                    if pos + n == this.chunk.len() {
                        this.chunk.clear();
                        *this.phase = Phase::Idle;
                    } else {
                        *this.phase = Phase::Serving { pos: pos + n };
                    }
                    return Poll::Ready(Ok(n));
                }
            }
        }
    }
}
