//! Duplicator chains - fan-out to N sinks in a single pass over the source.

use std::fmt;
use std::io::{self, Read, Write};

use crate::error::ReplicaError;

use super::{Duplicator, drain};

/// A reader that replicates its source into an ordered list of sinks.
///
/// Built by stacking [`Duplicator`]s: `with_sink(s1).with_sink(s2)` produces
/// `Duplicator(Duplicator(source, s1), s2)`. One read from the chain performs
/// one read from the source and then one write to each sink in the order the
/// sinks were added. Sink `i` is reported as `sink: i` in
/// [`ReplicaError::SinkWrite`].
///
/// If a sink fails, the read fails and sinks added after it never see that
/// chunk. The chain does not try to recover; since the sinks now disagree,
/// callers should treat the failure as fatal for the pipeline.
///
/// Sinks are owned by the chain once added. Buffered sinks (`BufWriter`)
/// should be flushed with [`flush`](Self::flush) before the chain is dropped;
/// a drop-time flush swallows its error.
///
/// # Example
///
/// ```
/// use teestream::DuplicatorChain;
///
/// let (mut a, mut b, mut c): (Vec<u8>, Vec<u8>, Vec<u8>) = Default::default();
/// let mut chain = DuplicatorChain::new(&b"foo bar"[..])
///     .with_sink(&mut a)
///     .with_sink(&mut b)
///     .with_sink(&mut c);
///
/// assert_eq!(chain.len(), 3);
/// let total = chain.drain(4)?;
/// drop(chain);
///
/// assert_eq!(total, 7);
/// assert!([a, b, c].iter().all(|s| s == b"foo bar"));
/// # Ok::<(), teestream::ReplicaError>(())
/// ```
pub struct DuplicatorChain<'a> {
    head: Box<dyn Link + 'a>,
    sinks: usize,
}

/// One stage of a chain: a reader that can flush every sink behind it.
trait Link: Read {
    fn flush_sinks(&mut self) -> Result<(), ReplicaError>;
}

/// The chain's source; has no sinks to flush.
struct Source<R>(R);

impl<R: Read> Read for Source<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.0.read(buf)
    }
}

impl<R: Read> Link for Source<R> {
    fn flush_sinks(&mut self) -> Result<(), ReplicaError> {
        Ok(())
    }
}

impl<'a, W: Write> Link for Duplicator<Box<dyn Link + 'a>, W> {
    fn flush_sinks(&mut self) -> Result<(), ReplicaError> {
        self.get_mut().flush_sinks()?;
        self.flush_sink()
    }
}

impl<'a> DuplicatorChain<'a> {
    /// Starts a chain over `source` with no sinks yet.
    pub fn new(source: impl Read + 'a) -> Self {
        Self {
            head: Box::new(Source(source)),
            sinks: 0,
        }
    }

    /// Appends a sink to the end of the chain.
    pub fn with_sink(self, sink: impl Write + 'a) -> Self {
        let index = self.sinks;
        tracing::debug!(sink = index, "sink added to chain");
        Self {
            head: Box::new(Duplicator::new(self.head, sink).with_sink_index(index)),
            sinks: index + 1,
        }
    }

    /// Returns the number of sinks in the chain.
    pub fn len(&self) -> usize {
        self.sinks
    }

    /// Returns true if the chain has no sinks.
    pub fn is_empty(&self) -> bool {
        self.sinks == 0
    }

    /// Reads the chain to end-of-stream in `chunk_size` reads, discarding the
    /// bytes. Returns the number of bytes that went through.
    pub fn drain(&mut self, chunk_size: usize) -> Result<u64, ReplicaError> {
        drain(self, chunk_size)
    }

    /// Flushes every sink, nearest the source first.
    ///
    /// # Errors
    ///
    /// [`ReplicaError::SinkWrite`] naming the first sink whose flush failed;
    /// later sinks are not flushed.
    pub fn flush(&mut self) -> Result<(), ReplicaError> {
        self.head.flush_sinks()
    }
}

impl Read for DuplicatorChain<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.head.read(buf)
    }
}

impl fmt::Debug for DuplicatorChain<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DuplicatorChain")
            .field("sinks", &self.sinks)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Rejecting;

    impl Write for Rejecting {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::StorageFull, "disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Buffers writes and only reports them on flush.
    struct Buffered {
        pending: Vec<u8>,
        flushed: Rc<RefCell<Vec<u8>>>,
        fail_flush: bool,
    }

    impl Buffered {
        fn new(flushed: &Rc<RefCell<Vec<u8>>>, fail_flush: bool) -> Self {
            Self {
                pending: Vec::new(),
                flushed: Rc::clone(flushed),
                fail_flush,
            }
        }
    }

    impl Write for Buffered {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.pending.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            if self.fail_flush {
                return Err(io::Error::new(io::ErrorKind::StorageFull, "disk full"));
            }
            self.flushed.borrow_mut().append(&mut self.pending);
            Ok(())
        }
    }

    #[test]
    fn test_empty_chain_is_plain_reader() {
        let mut chain = DuplicatorChain::new(&b"plain"[..]);
        assert!(chain.is_empty());

        let mut out = Vec::new();
        chain.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"plain");
    }

    #[test]
    fn test_all_sinks_receive_everything() {
        let data: Vec<u8> = (0..1000).map(|i| (i % 251) as u8).collect();
        let mut sinks: Vec<Vec<u8>> = vec![Vec::new(); 4];

        let mut chain = DuplicatorChain::new(&data[..]);
        for sink in sinks.iter_mut() {
            chain = chain.with_sink(sink);
        }
        assert_eq!(chain.drain(7).unwrap(), 1000);
        drop(chain);

        for sink in &sinks {
            assert_eq!(sink, &data);
        }
    }

    #[test]
    fn test_failure_stops_propagation() {
        let (mut first, mut last): (Vec<u8>, Vec<u8>) = Default::default();
        let mut chain = DuplicatorChain::new(&b"chunk"[..])
            .with_sink(&mut first)
            .with_sink(Rejecting)
            .with_sink(&mut last);

        let err = chain.drain(16).unwrap_err();
        drop(chain);

        assert!(matches!(err, ReplicaError::SinkWrite { sink: 1, .. }));
        assert_eq!(first, b"chunk");
        assert!(last.is_empty());
    }

    #[test]
    fn test_flush_reaches_every_sink() {
        let a = Rc::default();
        let b = Rc::default();
        let mut chain = DuplicatorChain::new(&b"buffered"[..])
            .with_sink(Buffered::new(&a, false))
            .with_sink(Buffered::new(&b, false));

        chain.drain(3).unwrap();
        assert!(a.borrow().is_empty());

        chain.flush().unwrap();
        assert_eq!(*a.borrow(), b"buffered");
        assert_eq!(*b.borrow(), b"buffered");
    }

    #[test]
    fn test_flush_failure_names_sink() {
        let mut chain = DuplicatorChain::new(&b"x"[..])
            .with_sink(Vec::<u8>::new())
            .with_sink(Buffered::new(&Rc::default(), true));

        chain.drain(1).unwrap();
        let err = chain.flush().unwrap_err();
        assert!(matches!(err, ReplicaError::SinkWrite { sink: 1, .. }));
    }
}
