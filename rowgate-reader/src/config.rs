/// What a pull in flight turns into when the signal fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CancelPolicy {
    /// Abandon the pull in flight, the call returns `Canceled`.
    #[default]
    FailFast,
    /// Let the pull in flight complete and deliver its row,
    /// the following call returns `Canceled`.
    DrainThenStop,
}

pub const DEFAULT_CANCEL_POLICY: CancelPolicy = CancelPolicy::FailFast;
pub const DEFAULT_SCAN_ERROR_TERMINATES: bool = false;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderConfig {
    pub(crate) policy: CancelPolicy,
    pub(crate) scan_error_terminates: bool,
}

impl Default for ReaderConfig {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl ReaderConfig {
    #[inline]
    pub fn new() -> Self {
        ReaderConfig {
            policy: DEFAULT_CANCEL_POLICY,
            scan_error_terminates: DEFAULT_SCAN_ERROR_TERMINATES,
        }
    }

    #[inline]
    pub fn policy(mut self, policy: CancelPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Whether a row that fails to scan ends the read.
    #[inline]
    pub fn scan_error_terminates(mut self, scan_error_terminates: bool) -> Self {
        self.scan_error_terminates = scan_error_terminates;
        self
    }
}
