//! Interpreter settings.

use std::env;

/// Call depth allowed when nothing else is configured.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 4096;

/// Environment variable overriding [`InterpreterConfig::max_call_depth`].
pub const MAX_CALL_DEPTH_VAR: &str = "GOO_MAX_CALL_DEPTH";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpreterConfig {
    /// Frames allowed on the call stack before a call fails with a stack overflow
    pub max_call_depth: usize,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }
}

impl InterpreterConfig {
    /// Defaults, with `GOO_MAX_CALL_DEPTH` applied when it holds a positive integer.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(raw) = env::var(MAX_CALL_DEPTH_VAR) {
            match parse_depth(&raw) {
                Some(depth) => config.max_call_depth = depth,
                None => tracing::warn!(
                    value = %raw,
                    default = DEFAULT_MAX_CALL_DEPTH,
                    "ignoring invalid {}",
                    MAX_CALL_DEPTH_VAR
                ),
            }
        }
        config
    }

    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }
}

fn parse_depth(raw: &str) -> Option<usize> {
    raw.trim().parse::<usize>().ok().filter(|d| *d > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_depth() {
        assert_eq!(parse_depth("128"), Some(128));
        assert_eq!(parse_depth(" 64\n"), Some(64));
        assert_eq!(parse_depth("0"), None);
        assert_eq!(parse_depth("deep"), None);
    }

    #[test]
    fn test_builder() {
        let config = InterpreterConfig::default().with_max_call_depth(10);
        assert_eq!(config.max_call_depth, 10);
        assert_eq!(InterpreterConfig::default().max_call_depth, DEFAULT_MAX_CALL_DEPTH);
    }
}
