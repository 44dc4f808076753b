//! Interpreter limits.

/// Default bound on nested calls before [`CallStackOverflow`](super::RuntimeError::CallStackOverflow).
pub const DEFAULT_MAX_CALL_DEPTH: usize = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of simultaneously active calls.
    pub max_call_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }
}

impl Config {
    #[must_use]
    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_default() {
        assert_eq!(Config::default().max_call_depth, DEFAULT_MAX_CALL_DEPTH);
        assert_eq!(Config::default().with_max_call_depth(8).max_call_depth, 8);
    }
}
