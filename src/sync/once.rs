use parking_lot::Once;

/// Runs an action at most once, no matter how many threads ask.
///
/// The first caller runs its action; concurrent callers block until it has
/// finished. Every later call is a no-op, even with a different action.
///
/// # Example
///
/// ```
/// use teestream::RunOnce;
///
/// static INIT: RunOnce = RunOnce::new();
///
/// let mut hits = 0;
/// assert!(INIT.run(|| hits += 1));
/// assert!(!INIT.run(|| hits += 1));
/// assert_eq!(hits, 1);
/// ```
#[derive(Debug)]
pub struct RunOnce {
    once: Once,
}

impl RunOnce {
    /// Creates a guard that hasn't run yet.
    pub const fn new() -> Self {
        Self { once: Once::new() }
    }

    /// Runs `f` if no action has run yet.
    ///
    /// Returns `true` if this call ran its action. If the action panics the
    /// guard is poisoned and later calls panic too.
    pub fn run<F: FnOnce()>(&self, f: F) -> bool {
        let mut ran = false;
        self.once.call_once(|| {
            f();
            ran = true;
        });
        ran
    }

    /// Returns `true` once an action has completed.
    pub fn is_completed(&self) -> bool {
        self.once.state().done()
    }
}

impl Default for RunOnce {
    fn default() -> Self {
        Self::new()
    }
}
