use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Quiet period after the last resize before the panel refreshes.
pub const DEFAULT_DEBOUNCE_MS: f64 = 300.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("debounceMs must be a positive number, got {0}")]
    DebounceWindow(f64),
    #[error("confirmation revert delay must be a positive number, got {0}")]
    RevertDelay(f64),
}

/// What happens to the "copied" confirmation after a copy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum ConfirmationPolicy {
    /// Stays set until the panel is mounted again.
    #[default]
    Sticky,
    /// Clears `ms` after the most recent copy.
    RevertAfter { ms: f64 },
}

/// Panel settings. Every field has a default, so `{}` is a valid config.
///
/// ```json
/// { "debounceMs": 300, "confirmation": { "mode": "revertAfter", "ms": 2000 } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PanelConfig {
    pub debounce_ms: f64,
    pub confirmation: ConfirmationPolicy,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            confirmation: ConfirmationPolicy::Sticky,
        }
    }
}

impl PanelConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.debounce_ms.is_finite() && self.debounce_ms > 0.0) {
            return Err(ConfigError::DebounceWindow(self.debounce_ms));
        }
        if let ConfirmationPolicy::RevertAfter { ms } = self.confirmation
            && !(ms.is_finite() && ms > 0.0)
        {
            return Err(ConfigError::RevertDelay(ms));
        }
        Ok(())
    }
}
