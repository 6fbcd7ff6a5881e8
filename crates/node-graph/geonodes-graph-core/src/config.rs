//! Evaluator configuration.

use serde::{Deserialize, Serialize};

/// Knobs for [`evaluate_all`](crate::eval::evaluate_all).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    /// Run independent nodes of the same topological level on worker threads.
    pub parallel: bool,
    /// Upper bound on worker threads per level.
    pub max_threads: usize,
    /// Echo node diagnostics through the `log` facade as they are merged.
    pub log_diagnostics: bool,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            parallel: false,
            max_threads: 4,
            log_diagnostics: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config: EvalConfig = serde_json::from_str(r#"{ "parallel": true }"#).unwrap();
        assert!(config.parallel);
        assert_eq!(config.max_threads, 4);
        assert!(config.log_diagnostics);
    }
}
