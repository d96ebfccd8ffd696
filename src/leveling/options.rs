//! Leveling configuration and cancellation.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::error::ConfigError;

/// Tunables of the leveling engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelingOptions {
    /// Highest acceptable peak-to-average labor ratio.
    pub balance_threshold: f64,
    /// Auto-optimize iteration cap.
    pub max_iterations: usize,
    /// Only activities with more workers than this are split.
    pub split_labor_threshold: f64,
    /// Ratio above which a second shift is recommended.
    pub shift_ratio: f64,
    /// Wall-clock budget for auto-optimize, checked between iterations.
    #[serde(default)]
    pub timeout: Option<Duration>,
}

impl Default for LevelingOptions {
    fn default() -> Self {
        Self {
            balance_threshold: 1.20,
            max_iterations: 5,
            split_labor_threshold: 10.0,
            shift_ratio: 1.50,
            timeout: None,
        }
    }
}

impl LevelingOptions {
    pub fn with_balance_threshold(mut self, threshold: f64) -> Self {
        self.balance_threshold = threshold;
        self
    }

    pub fn with_max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = iterations;
        self
    }

    pub fn with_split_labor_threshold(mut self, workers: f64) -> Self {
        self.split_labor_threshold = workers;
        self
    }

    pub fn with_shift_ratio(mut self, ratio: f64) -> Self {
        self.shift_ratio = ratio;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Checks that every tunable is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field: &str, reason: &str| ConfigError::InvalidValue {
            field: field.to_string(),
            reason: reason.to_string(),
        };
        if !self.balance_threshold.is_finite() || self.balance_threshold < 1.0 {
            return Err(invalid("balance_threshold", "must be a finite ratio >= 1"));
        }
        if !self.split_labor_threshold.is_finite() || self.split_labor_threshold < 0.0 {
            return Err(invalid("split_labor_threshold", "must be a finite headcount >= 0"));
        }
        if !self.shift_ratio.is_finite() || self.shift_ratio < 1.0 {
            return Err(invalid("shift_ratio", "must be a finite ratio >= 1"));
        }
        Ok(())
    }
}

/// Shared flag for stopping auto-optimize between iterations.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Visible to every clone.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = LevelingOptions::default();
        assert_eq!(options.balance_threshold, 1.20);
        assert_eq!(options.max_iterations, 5);
        assert_eq!(options.split_labor_threshold, 10.0);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_invalid_threshold() {
        let options = LevelingOptions::default().with_balance_threshold(0.9);
        assert!(matches!(
            options.validate(),
            Err(ConfigError::InvalidValue { field, .. }) if field == "balance_threshold"
        ));
        assert!(LevelingOptions::default()
            .with_shift_ratio(f64::NAN)
            .validate()
            .is_err());
    }

    #[test]
    fn test_serde_roundtrip() {
        let options = LevelingOptions::default()
            .with_max_iterations(8)
            .with_timeout(Duration::from_secs(2));
        let json = serde_json::to_string(&options).unwrap();
        let back: LevelingOptions = serde_json::from_str(&json).unwrap();
        assert_eq!(back, options);

        let partial: LevelingOptions = serde_json::from_str(
            r#"{"balance_threshold":1.3,"max_iterations":3,"split_labor_threshold":8.0,"shift_ratio":1.6}"#,
        )
        .unwrap();
        assert_eq!(partial.timeout, None);
    }

    #[test]
    fn test_token_shared_between_clones() {
        let token = CancellationToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }
}
