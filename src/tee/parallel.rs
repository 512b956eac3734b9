//! Concurrent fan-out with rayon.
//!
//! Requires the `parallel` feature.

use std::io::{self, Read, Write};

use rayon::prelude::*;

use crate::error::ReplicaError;

use super::duplicator::write_chunk;

/// A reader that replicates each chunk into all of its sinks concurrently.
///
/// Same contract as a [`DuplicatorChain`](super::DuplicatorChain) except for
/// ordering between sinks: the writes for one chunk run in parallel, and
/// `read` joins every one of them before returning. If any sink fails the
/// whole read fails with [`ReplicaError::SinkWrite`]; other sinks may or may
/// not have taken that chunk, so the pipeline should be abandoned.
///
/// Worth it when sink writes are slow and independent (separate disks or
/// sockets). For in-memory sinks the chain is faster.
///
/// # Example
///
/// ```
/// use std::io::Read;
/// use teestream::ParallelDuplicator;
///
/// let mut dup = ParallelDuplicator::new(&b"fan out"[..], vec![Vec::<u8>::new(), Vec::new()]);
/// let mut out = Vec::new();
/// dup.read_to_end(&mut out)?;
///
/// let (_, sinks) = dup.into_inner();
/// assert!(sinks.iter().all(|s| s == &out));
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug)]
pub struct ParallelDuplicator<R, W> {
    reader: R,
    sinks: Vec<W>,
}

impl<R, W> ParallelDuplicator<R, W> {
    /// Creates a parallel duplicator over `reader` and `sinks`.
    pub fn new(reader: R, sinks: Vec<W>) -> Self {
        Self { reader, sinks }
    }

    /// Returns the sinks.
    pub fn sinks(&self) -> &[W] {
        &self.sinks
    }

    /// Consumes the duplicator, returning the reader and the sinks.
    pub fn into_inner(self) -> (R, Vec<W>) {
        (self.reader, self.sinks)
    }
}

impl<R: Read, W: Write + Send> Read for ParallelDuplicator<R, W> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.reader.read(buf)?;
        if n == 0 {
            return Ok(0);
        }

        let chunk = &buf[..n];
        self.sinks
            .par_iter_mut()
            .enumerate()
            .try_for_each(|(index, sink)| write_chunk(sink, index, chunk))?;

        tracing::trace!(sinks = self.sinks.len(), bytes = n, "chunk replicated in parallel");
        Ok(n)
    }
}
