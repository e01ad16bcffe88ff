//! Optional progress side-channel.

/// One progress notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Progress {
    /// Steps completed so far.
    pub current: usize,
    /// Total number of steps.
    pub total: usize,
    /// Human readable description of the step.
    pub message: String,
}

impl Progress {
    pub fn new(current: usize, total: usize, message: impl Into<String>) -> Self {
        Self {
            current,
            total,
            message: message.into(),
        }
    }
}

/// Progress callback. Carries no correctness obligation.
pub type ProgressFn<'a> = &'a (dyn Fn(&Progress) + Sync);

/// Report progress if a callback is installed.
#[inline]
pub fn report(callback: Option<ProgressFn<'_>>, current: usize, total: usize, message: &str) {
    if let Some(callback) = callback {
        callback(&Progress::new(current, total, message));
    }
}
