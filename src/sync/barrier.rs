//! Completion barrier with one-shot tokens.
//!
//! Each task gets a [`CompletionToken`] from [`TaskBarrier::register`] and
//! hands it back through [`CompletionToken::complete`]. Completing consumes
//! the token, so a task can't signal twice. A token dropped without
//! completing (early return, panic) is counted as abandoned and waiters see
//! [`BarrierError::Abandoned`] instead of hanging.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use thiserror::Error;

/// Why a barrier wait didn't end cleanly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BarrierError {
    /// Some tokens were dropped without being completed.
    #[error("{count} task(s) dropped their completion token without completing")]
    Abandoned {
        /// Number of abandoned tokens.
        count: usize,
    },

    /// The timeout elapsed with tasks still outstanding.
    #[error("timed out with {outstanding} task(s) outstanding")]
    TimedOut {
        /// Tasks still running when the wait gave up.
        outstanding: usize,
    },
}

#[derive(Debug, Default)]
struct State {
    outstanding: usize,
    abandoned: usize,
}

#[derive(Debug, Default)]
struct Inner {
    state: Mutex<State>,
    done: Condvar,
}

impl Inner {
    fn finish(&self, abandoned: bool) {
        let mut state = self.state.lock();
        state.outstanding -= 1;
        if abandoned {
            state.abandoned += 1;
        }
        if state.outstanding == 0 {
            self.done.notify_all();
        }
    }
}

/// Waits for every registered task to signal completion.
///
/// Cloning shares the same barrier.
///
/// # Example
///
/// ```
/// use std::thread;
/// use teestream::TaskBarrier;
///
/// let barrier = TaskBarrier::new();
/// let handles: Vec<_> = barrier
///     .register_many(4)
///     .into_iter()
///     .map(|token| thread::spawn(move || token.complete()))
///     .collect();
///
/// barrier.wait()?;
/// # for h in handles { h.join().unwrap(); }
/// # Ok::<(), teestream::BarrierError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct TaskBarrier {
    inner: Arc<Inner>,
}

impl TaskBarrier {
    /// Creates a barrier with no registered tasks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one task and returns its token.
    pub fn register(&self) -> CompletionToken {
        self.inner.state.lock().outstanding += 1;
        CompletionToken {
            inner: Arc::clone(&self.inner),
            completed: false,
        }
    }

    /// Registers `n` tasks.
    pub fn register_many(&self, n: usize) -> Vec<CompletionToken> {
        (0..n).map(|_| self.register()).collect()
    }

    /// Returns the number of tasks that haven't signalled yet.
    pub fn outstanding(&self) -> usize {
        self.inner.state.lock().outstanding
    }

    /// Blocks until every registered task has signalled.
    ///
    /// Returns immediately if nothing is registered.
    ///
    /// # Errors
    ///
    /// [`BarrierError::Abandoned`] if any token was dropped without completing.
    pub fn wait(&self) -> Result<(), BarrierError> {
        let mut state = self.inner.state.lock();
        while state.outstanding > 0 {
            self.inner.done.wait(&mut state);
        }
        check(&state)
    }

    /// Like [`wait`](Self::wait), but gives up after `timeout`.
    ///
    /// # Errors
    ///
    /// [`BarrierError::TimedOut`] if tasks are still outstanding when the
    /// timeout elapses, [`BarrierError::Abandoned`] as for `wait`.
    pub fn wait_timeout(&self, timeout: Duration) -> Result<(), BarrierError> {
        let deadline = Instant::now() + timeout;
        let mut state = self.inner.state.lock();
        while state.outstanding > 0 {
            if self.inner.done.wait_until(&mut state, deadline).timed_out() && state.outstanding > 0 {
                return Err(BarrierError::TimedOut {
                    outstanding: state.outstanding,
                });
            }
        }
        check(&state)
    }
}

fn check(state: &State) -> Result<(), BarrierError> {
    match state.abandoned {
        0 => Ok(()),
        count => Err(BarrierError::Abandoned { count }),
    }
}

/// Proof that one registered task is still running.
///
/// Call [`complete`](Self::complete) when the task is done.
#[derive(Debug)]
#[must_use = "dropping a token without completing it marks the task abandoned"]
pub struct CompletionToken {
    inner: Arc<Inner>,
    completed: bool,
}

impl CompletionToken {
    /// Signals that the task finished.
    pub fn complete(mut self) {
        self.completed = true;
        self.inner.finish(false);
    }
}

impl Drop for CompletionToken {
    fn drop(&mut self) {
        if !self.completed {
            tracing::warn!("completion token dropped without completing");
            self.inner.finish(true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_wait_without_tasks() {
        assert_eq!(TaskBarrier::new().wait(), Ok(()));
    }

    #[test]
    fn test_wait_for_threads() {
        let barrier = TaskBarrier::new();
        let handles: Vec<_> = barrier
            .register_many(8)
            .into_iter()
            .map(|token| {
                thread::spawn(move || {
                    thread::sleep(Duration::from_millis(5));
                    token.complete();
                })
            })
            .collect();

        assert_eq!(barrier.wait(), Ok(()));
        assert_eq!(barrier.outstanding(), 0);
        for h in handles {
            h.join().unwrap();
        }
    }

    #[test]
    fn test_dropped_token_is_abandoned() {
        let barrier = TaskBarrier::new();
        let done = barrier.register();
        let dropped = barrier.register();

        done.complete();
        drop(dropped);

        assert_eq!(barrier.wait(), Err(BarrierError::Abandoned { count: 1 }));
    }

    #[test]
    fn test_wait_timeout() {
        let barrier = TaskBarrier::new();
        let token = barrier.register();

        let err = barrier.wait_timeout(Duration::from_millis(10)).unwrap_err();
        assert_eq!(err, BarrierError::TimedOut { outstanding: 1 });

        token.complete();
        assert_eq!(barrier.wait_timeout(Duration::from_millis(10)), Ok(()));
    }
}
