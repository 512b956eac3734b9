//! Eager fan-out: push the whole source into every sink.
//!
//! This is the bulk-copy counterpart of [`DuplicatorChain`](super::DuplicatorChain).
//! Instead of replicating as a side effect of someone else's reads, the copy
//! loop owns the drive: read a chunk, write it to each sink, repeat until
//! end-of-stream. Both strategies read the source once and leave every sink
//! with identical bytes; `benches/replicate_bench.rs` compares them.

use std::io::{self, Read, Write};

use crate::buffer::ScratchBuffer;
use crate::config::DEFAULT_COPY_BUFFER_SIZE;
use crate::error::ReplicaError;

use super::duplicator::write_chunk;

/// A writer that forwards every chunk to each of its sinks, in order.
///
/// Each sink gets one `write` call per chunk and must take all of it. The
/// first failure stops the chunk from reaching later sinks and is returned
/// as [`ReplicaError::SinkWrite`] inside the `io::Error`.
///
/// # Example
///
/// ```
/// use std::io::Write;
/// use teestream::FanOutWriter;
///
/// let mut out = FanOutWriter::new(vec![Vec::<u8>::new(), Vec::new()]);
/// out.write_all(b"twice")?;
///
/// for sink in out.into_inner() {
///     assert_eq!(sink, b"twice");
/// }
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug)]
pub struct FanOutWriter<W> {
    sinks: Vec<W>,
}

impl<W> FanOutWriter<W> {
    /// Creates a fan-out writer over `sinks`.
    pub fn new(sinks: Vec<W>) -> Self {
        Self { sinks }
    }

    /// Returns the sinks.
    pub fn sinks(&self) -> &[W] {
        &self.sinks
    }

    /// Consumes the writer, returning the sinks.
    pub fn into_inner(self) -> Vec<W> {
        self.sinks
    }
}

impl<W: Write> Write for FanOutWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        for (index, sink) in self.sinks.iter_mut().enumerate() {
            write_chunk(sink, index, buf)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        for (index, sink) in self.sinks.iter_mut().enumerate() {
            sink.flush()
                .map_err(|source| ReplicaError::SinkWrite { sink: index, source })?;
        }
        Ok(())
    }
}

/// Copies `reader` to end-of-stream into every sink, then flushes them.
///
/// Returns the number of bytes read from the source (each sink received the
/// same count).
///
/// # Errors
///
/// [`ReplicaError::SourceRead`] if the source fails, [`ReplicaError::SinkWrite`]
/// if any sink fails. Either way the copy stops at that chunk.
///
/// # Example
///
/// ```
/// use teestream::copy_to_sinks;
///
/// let mut sinks: [Vec<u8>; 3] = Default::default();
/// let copied = copy_to_sinks(&mut &b"fileA"[..], &mut sinks)?;
///
/// assert_eq!(copied, 5);
/// assert!(sinks.iter().all(|s| s == b"fileA"));
/// # Ok::<(), teestream::ReplicaError>(())
/// ```
pub fn copy_to_sinks<R, W>(reader: &mut R, sinks: &mut [W]) -> Result<u64, ReplicaError>
where
    R: Read + ?Sized,
    W: Write,
{
    let mut buf = ScratchBuffer::take(DEFAULT_COPY_BUFFER_SIZE);
    let mut total = 0u64;

    loop {
        let n = reader.read(&mut buf).map_err(ReplicaError::from)?;
        if n == 0 {
            break;
        }
        for (index, sink) in sinks.iter_mut().enumerate() {
            write_chunk(sink, index, &buf[..n])?;
        }
        total += n as u64;
    }

    for (index, sink) in sinks.iter_mut().enumerate() {
        sink.flush()
            .map_err(|source| ReplicaError::SinkWrite { sink: index, source })?;
    }

    tracing::debug!(bytes = total, sinks = sinks.len(), "bulk copy finished");
    Ok(total)
}
