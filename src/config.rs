//! Session configuration.

/// Hard limits on the size of a tokenized line.
///
/// Exceeding any of them is a `LexError`; nothing is truncated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Limits {
    /// Longest accepted command keyword, in characters
    pub max_keyword_len: usize,
    /// Longest accepted argument (including a `&name` capture), in characters
    pub max_argument_len: usize,
    /// Most arguments a single line may carry, capture included
    pub max_arguments: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_keyword_len: 14,
            max_argument_len: 29,
            max_arguments: 4,
        }
    }
}

/// What the source driver does when a line fails
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Stop at the first failing line
    #[default]
    Abort,
    /// Record the failure and carry on with the next line
    Continue,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionConfig {
    pub limits: Limits,
    pub error_policy: ErrorPolicy,
}

impl SessionConfig {
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }
}
