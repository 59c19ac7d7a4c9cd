// Copyright (c) 2026 Hypermesh Foundation. All rights reserved.
// Licensed under the Business Source License 1.1.
// See the LICENSE file in the repository root for full license text.

//! Error kinds surfaced by contract calls.
//!
//! Every failing call returns exactly one [`ContractError`]. Finer-grained
//! validation errors exist for logging but collapse into `InvalidInput`
//! before they cross the facade.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ContractError
// ---------------------------------------------------------------------------

/// Error kinds returned by contract calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "kebab-case")]
pub enum ContractError {
    /// Non-owner attempting an owner-only action.
    #[error("caller is not authorized (err u100)")]
    Unauthorized,

    /// Referenced world or activity does not exist.
    #[error("record not found (err u101)")]
    NotFound,

    /// Duplicate portal.
    #[error("record already exists (err u102)")]
    AlreadyExists,

    /// Malformed or oversized text, negative reward, self-referential
    /// portal, or arithmetic overflow.
    #[error("invalid input (err u103)")]
    InvalidInput,
}

impl ContractError {
    /// Stable numeric code, as carried in an `(err uN)` receipt.
    pub fn code(&self) -> u32 {
        match self {
            Self::Unauthorized => 100,
            Self::NotFound => 101,
            Self::AlreadyExists => 102,
            Self::InvalidInput => 103,
        }
    }
}

// ---------------------------------------------------------------------------
// TextError
// ---------------------------------------------------------------------------

/// Why a text argument was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TextError {
    #[error("non-ascii character {0:?}")]
    NonAscii(char),

    #[error("text is {len} bytes, limit is {max}")]
    TooLong { len: usize, max: usize },
}

impl From<TextError> for ContractError {
    fn from(_: TextError) -> Self {
        ContractError::InvalidInput
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(ContractError::Unauthorized.code(), 100);
        assert_eq!(ContractError::NotFound.code(), 101);
        assert_eq!(ContractError::AlreadyExists.code(), 102);
        assert_eq!(ContractError::InvalidInput.code(), 103);
    }

    #[test]
    fn text_error_collapses_to_invalid_input() {
        let err: ContractError = TextError::TooLong { len: 70, max: 64 }.into();
        assert_eq!(err, ContractError::InvalidInput);
    }

    #[test]
    fn display_carries_code() {
        assert_eq!(ContractError::NotFound.to_string(), "record not found (err u101)");
    }
}
