//! The Duplicator - a reader that replicates every chunk it yields into a sink.

use std::io::{self, Read, Write};

use crate::error::ReplicaError;

/// A reader that writes every chunk it returns to a sink first.
///
/// Each call to [`Read::read`] forwards the caller's buffer to the wrapped
/// reader. When it produces `n > 0` bytes, exactly those bytes are handed to
/// the sink with a single [`Write::write`] call before `read` returns. The
/// sink must take the whole chunk: an error or a short write fails the read
/// with [`ReplicaError::SinkWrite`] (carried inside the returned
/// [`io::Error`]; recover it with `ReplicaError::from`).
///
/// End-of-stream is passed through without touching the sink, and upstream
/// errors are returned unchanged.
///
/// Pass `&mut reader` / `&mut sink` to keep ownership with the caller; both
/// references implement the required traits.
///
/// # Example
///
/// ```
/// use std::io::Read;
/// use teestream::Duplicator;
///
/// let mut copy: Vec<u8> = Vec::new();
/// let mut dup = Duplicator::new(&b"hoge fuga"[..], &mut copy);
///
/// let mut out = String::new();
/// dup.read_to_string(&mut out)?;
/// drop(dup);
///
/// assert_eq!(out, "hoge fuga");
/// assert_eq!(copy, b"hoge fuga");
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug)]
pub struct Duplicator<R, W> {
    reader: R,
    sink: W,
    sink_index: usize,
    replicated: u64,
}

impl<R, W> Duplicator<R, W> {
    /// Creates a duplicator reading from `reader` and replicating into `sink`.
    pub fn new(reader: R, sink: W) -> Self {
        Self {
            reader,
            sink,
            sink_index: 0,
            replicated: 0,
        }
    }

    /// Sets the index reported in [`ReplicaError::SinkWrite`] for this sink.
    pub fn with_sink_index(mut self, index: usize) -> Self {
        self.sink_index = index;
        self
    }

    /// Returns the sink index used in error reports.
    pub fn sink_index(&self) -> usize {
        self.sink_index
    }

    /// Returns the number of bytes replicated into the sink so far.
    pub fn replicated(&self) -> u64 {
        self.replicated
    }

    /// Returns a reference to the wrapped reader.
    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    /// Returns a mutable reference to the wrapped reader.
    ///
    /// Reading from it directly bypasses replication.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.reader
    }

    /// Returns a reference to the sink.
    pub fn sink(&self) -> &W {
        &self.sink
    }

    /// Consumes the duplicator, returning the reader and the sink.
    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.sink)
    }
}

impl<R, W: Write> Duplicator<R, W> {
    /// Flushes the sink.
    pub fn flush_sink(&mut self) -> Result<(), ReplicaError> {
        self.sink.flush().map_err(|source| ReplicaError::SinkWrite {
            sink: self.sink_index,
            source,
        })
    }
}

impl<R: Read, W: Write> Read for Duplicator<R, W> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.reader.read(buf)?;
        if n == 0 {
            return Ok(0);
        }

        write_chunk(&mut self.sink, self.sink_index, &buf[..n])?;
        self.replicated += n as u64;
        tracing::trace!(sink = self.sink_index, bytes = n, "chunk replicated");
        Ok(n)
    }
}

/// Hands `chunk` to `sink` in a single write call.
///
/// Anything short of the whole chunk is a [`ReplicaError::SinkWrite`]; there
/// is no retry.
pub(crate) fn write_chunk<W: Write + ?Sized>(
    sink: &mut W,
    index: usize,
    chunk: &[u8],
) -> Result<(), ReplicaError> {
    match sink.write(chunk) {
        Ok(written) if written == chunk.len() => Ok(()),
        Ok(written) => {
            tracing::warn!(sink = index, written, expected = chunk.len(), "short sink write");
            Err(ReplicaError::short_write(index, written, chunk.len()))
        }
        Err(source) => {
            tracing::warn!(sink = index, error = %source, "sink write failed");
            Err(ReplicaError::SinkWrite {
                sink: index,
                source,
            })
        }
    }
}
