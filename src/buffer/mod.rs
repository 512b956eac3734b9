//! Internal buffer management.
//!
//! This module provides a thread-local scratch buffer pool so repeated drain
//! and copy loops don't reallocate. It is an implementation detail and not
//! part of the public API.

mod pool;

pub(crate) use pool::ScratchBuffer;
