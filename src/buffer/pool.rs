//! Thread-local scratch buffer pool for drain and copy loops.

use std::cell::RefCell;
use std::ops::{Deref, DerefMut};

/// Largest buffer capacity worth returning to the pool (128 KiB).
pub const MAX_POOLED_CAPACITY: usize = 128 * 1024;

/// Maximum number of buffers to keep per thread.
pub const MAX_POOL_SIZE: usize = 4;

/// A zero-filled byte buffer borrowed from the thread-local pool.
///
/// Dereferences to a `[u8]` of exactly the requested length. Returned to the
/// pool on drop unless it grew past [`MAX_POOLED_CAPACITY`].
pub struct ScratchBuffer {
    data: Vec<u8>,
}

impl ScratchBuffer {
    /// Takes a buffer of `len` bytes from the pool or allocates a new one.
    pub fn take(len: usize) -> Self {
        let mut data = THREAD_BUFFER_POOL
            .with(|pool| pool.borrow_mut().pop())
            .unwrap_or_default();
        data.clear();
        data.resize(len, 0);
        Self { data }
    }
}

impl Deref for ScratchBuffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.data
    }
}

impl DerefMut for ScratchBuffer {
    fn deref_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

impl Drop for ScratchBuffer {
    fn drop(&mut self) {
        if self.data.capacity() > MAX_POOLED_CAPACITY {
            return;
        }
        THREAD_BUFFER_POOL.with(|pool| {
            let mut pool = pool.borrow_mut();
            if pool.len() < MAX_POOL_SIZE {
                pool.push(std::mem::take(&mut self.data));
            }
        });
    }
}

thread_local! {
    static THREAD_BUFFER_POOL: RefCell<Vec<Vec<u8>>> = const { RefCell::new(Vec::new()) };
}
