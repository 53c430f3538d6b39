//! Engine configuration.
//!
//! Loaded once by the host process (CLI start-up, first binding call) and
//! shared read-only afterwards.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::MortgageError;
use crate::stress_test::StressTestPolicy;
use crate::MortgageResult;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub stress_test: StressTestPolicy,
}

impl EngineConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> MortgageResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            MortgageError::Configuration(format!("Failed to read '{}': {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string and validate it.
    pub fn from_toml_str(content: &str) -> MortgageResult<Self> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if given, otherwise fall back to defaults.
    pub fn load(path: Option<&Path>) -> MortgageResult<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> MortgageResult<()> {
        if self.stress_test.floor_rate_percent < Decimal::ZERO {
            return Err(MortgageError::Configuration(
                "stress_test.floor_rate_percent cannot be negative".into(),
            ));
        }
        if self.stress_test.spread_percent < Decimal::ZERO {
            return Err(MortgageError::Configuration(
                "stress_test.spread_percent cannot be negative".into(),
            ));
        }
        Ok(())
    }
}
