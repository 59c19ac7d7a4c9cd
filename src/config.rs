// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Metanest World Contract Engine - Configuration

use serde::{Deserialize, Serialize};

use crate::core_types::AsciiText;
use crate::error::TextError;

/// Default byte limit for names and descriptions (`string-ascii 64`).
pub const DEFAULT_TEXT_LIMIT: usize = 64;

/// Errors from loading a [`ContractConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{field} must be greater than zero")]
    ZeroBound { field: &'static str },
}

/// Bounds applied to call arguments before they reach any store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ContractConfig {
    pub max_name_len: usize,
    pub max_description_len: usize,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            max_name_len: DEFAULT_TEXT_LIMIT,
            max_description_len: DEFAULT_TEXT_LIMIT,
        }
    }
}

impl ContractConfig {
    /// Parse from JSON. Missing keys take their defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_name_len == 0 {
            return Err(ConfigError::ZeroBound { field: "max-name-len" });
        }
        if self.max_description_len == 0 {
            return Err(ConfigError::ZeroBound { field: "max-description-len" });
        }
        Ok(())
    }

    pub fn name(&self, raw: &str) -> Result<AsciiText, TextError> {
        AsciiText::parse(raw, self.max_name_len)
    }

    pub fn description(&self, raw: &str) -> Result<AsciiText, TextError> {
        AsciiText::parse(raw, self.max_description_len)
    }
}
