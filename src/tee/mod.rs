//! Stream replication.
//!
//! - [`Duplicator`] - Reader that writes every chunk it yields into one sink
//! - [`DuplicatorChain`] - Stacked duplicators, one source read fans out to N sinks
//! - [`FanOutWriter`] / [`copy_to_sinks`] - Eager push-based copy into N sinks
//! - [`ParallelDuplicator`] - Concurrent fan-out (feature `parallel`)
//! - [`drain`] - Read any reader to end-of-stream, discarding the bytes

mod chain;
mod duplicator;
mod fanout;
#[cfg(feature = "parallel")]
mod parallel;

use std::io::Read;

use crate::buffer::ScratchBuffer;
use crate::error::ReplicaError;

pub use chain::DuplicatorChain;
pub use duplicator::Duplicator;
pub use fanout::{FanOutWriter, copy_to_sinks};
#[cfg(feature = "parallel")]
pub use parallel::ParallelDuplicator;

/// Reads `reader` to end-of-stream in reads of `chunk_size` bytes and throws
/// the data away. Returns the number of bytes read.
///
/// This is how a chain is driven when nothing downstream needs the bytes:
/// the sinks get everything as a side effect. A `chunk_size` of zero is
/// treated as one.
pub fn drain<R: Read + ?Sized>(reader: &mut R, chunk_size: usize) -> Result<u64, ReplicaError> {
    let mut buf = ScratchBuffer::take(chunk_size.max(1));
    let mut total = 0u64;

    loop {
        match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => total += n as u64,
            Err(e) => return Err(e.into()),
        }
    }

    tracing::debug!(bytes = total, "drained to end of stream");
    Ok(total)
}
