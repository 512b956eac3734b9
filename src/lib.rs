//! teestream
//!
//! Single-pass stream replication for Rust.
//!
//! `teestream` reads a byte stream once and delivers every byte to any number
//! of sinks, while the consumer at the end of the pipeline reads (and
//! optionally tokenizes) the same bytes. Typical uses:
//!
//! - uploading a file while writing local copies
//! - hashing or checksumming a download as it is parsed
//! - logging a protocol stream while decoding it
//!
//! The crate intentionally:
//! - does NOT open files or sockets
//! - does NOT retry, buffer for slow sinks, or apply back-pressure policy
//! - does NOT persist what it replicates
//!
//! It only does one thing: **Read bytes once → write them everywhere**
//!
//! # Replicate while tokenizing
//!
//! ```
//! use teestream::{DuplicatorChain, Scanner, split::Lines};
//!
//! let (mut a, mut b) = (Vec::<u8>::new(), Vec::<u8>::new());
//! let chain = DuplicatorChain::new(&b"hoge fuga\nfoo bar"[..])
//!     .with_sink(&mut a)
//!     .with_sink(&mut b);
//!
//! let lines: Vec<_> = Scanner::new(chain, Lines).collect::<Result<_, _>>()?;
//!
//! assert_eq!(lines, ["hoge fuga", "foo bar"]);
//! assert_eq!(a, b"hoge fuga\nfoo bar");
//! assert_eq!(a, b);
//! # Ok::<(), teestream::ReplicaError>(())
//! ```
//!
//! # Bulk copy
//!
//! ```no_run
//! use std::fs::File;
//! use teestream::{ReplicaError, copy_to_sinks};
//!
//! fn main() -> Result<(), ReplicaError> {
//!     let mut source = File::open("fileA")?;
//!     let mut sinks = [File::create("fileB")?, File::create("fileC")?];
//!     copy_to_sinks(&mut source, &mut sinks)?;
//!     Ok(())
//! }
//! ```
//!
//! # Async (feature = "async-io")
//!
//! ```ignore
//! use futures_util::StreamExt;
//! use teestream::{AsyncDuplicator, scan_async, split::Words};
//!
//! async fn demo<R, W>(reader: R, sink: W) -> Result<(), teestream::ReplicaError>
//! where
//!     R: futures_io::AsyncRead + Unpin,
//!     W: futures_io::AsyncWrite + Unpin,
//! {
//!     let mut words = scan_async(AsyncDuplicator::new(reader, sink), Words);
//!     while let Some(word) = words.next().await {
//!         println!("{:?}", word?);
//!     }
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
pub mod scan;
mod sync;
mod tee;

mod buffer; // internal (thread-local reuse)

#[cfg(feature = "hash-blake3")]
mod hash;

#[cfg(feature = "async-io")]
mod async_stream;

//
// Public surface
//

pub use config::{DEFAULT_COPY_BUFFER_SIZE, DEFAULT_MAX_TOKEN_SIZE, DEFAULT_READ_SIZE, ScanConfig};
pub use error::{ReplicaError, SplitError};
pub use scan::{MAX_EMPTY_TOKENS, ScanState, Scanner, split};
pub use sync::{BarrierError, CompletionToken, RunOnce, TaskBarrier};
pub use tee::{Duplicator, DuplicatorChain, FanOutWriter, copy_to_sinks, drain};

#[cfg(feature = "parallel")]
pub use tee::ParallelDuplicator;

#[cfg(feature = "hash-blake3")]
pub use hash::{Digest, HashingSink, digest};

#[cfg(feature = "async-io")]
pub use async_stream::{AsyncDuplicator, TokenStream, scan_async};
