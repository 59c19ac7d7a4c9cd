// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Metanest World Contract Engine - Core Types

//! Identifier, principal, reward and text newtypes shared by every store.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ContractError, TextError};

// ---------------------------------------------------------------------------
// WorldId
// ---------------------------------------------------------------------------

/// 1-based world identifier, assigned sequentially.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorldId(pub u64);

impl fmt::Display for WorldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "u{}", self.0)
    }
}

impl From<u64> for WorldId {
    fn from(v: u64) -> Self { WorldId(v) }
}

// ---------------------------------------------------------------------------
// ActivityId
// ---------------------------------------------------------------------------

/// 1-based activity identifier, scoped to its owning world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityId(pub u64);

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "u{}", self.0)
    }
}

impl From<u64> for ActivityId {
    fn from(v: u64) -> Self { ActivityId(v) }
}

// ---------------------------------------------------------------------------
// Principal
// ---------------------------------------------------------------------------

/// Authenticated caller identity, supplied by whoever sequences the calls.
#[derive(Debug, Clone, Hash, Eq, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(pub String);

impl Principal {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Principal {
    fn from(s: String) -> Self { Principal(s) }
}

impl From<&str> for Principal {
    fn from(s: &str) -> Self { Principal(s.to_string()) }
}

// ---------------------------------------------------------------------------
// RewardAmount
// ---------------------------------------------------------------------------

/// Non-negative reward units. All arithmetic is checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RewardAmount(pub u128);

impl RewardAmount {
    pub fn zero() -> Self {
        Self(0)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Convert a raw signed amount; negative values are rejected.
    pub fn from_signed(raw: i128) -> Result<Self, ContractError> {
        u128::try_from(raw)
            .map(Self)
            .map_err(|_| ContractError::InvalidInput)
    }

    /// Overflow surfaces as `InvalidInput` rather than wrapping.
    pub fn checked_add(self, rhs: Self) -> Result<Self, ContractError> {
        self.0
            .checked_add(rhs.0)
            .map(Self)
            .ok_or(ContractError::InvalidInput)
    }

    pub fn checked_mul(self, n: u64) -> Result<Self, ContractError> {
        self.0
            .checked_mul(u128::from(n))
            .map(Self)
            .ok_or(ContractError::InvalidInput)
    }
}

impl fmt::Display for RewardAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "u{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// AsciiText
// ---------------------------------------------------------------------------

/// Bounded ASCII text. Only constructible through [`AsciiText::parse`], so a
/// value held by a store has always passed the length and charset checks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AsciiText(String);

impl AsciiText {
    /// Validate `raw` against the ASCII charset and `max_len` bytes.
    pub fn parse(raw: &str, max_len: usize) -> Result<Self, TextError> {
        if let Some(c) = raw.chars().find(|c| !c.is_ascii()) {
            return Err(TextError::NonAscii(c));
        }
        if raw.len() > max_len {
            return Err(TextError::TooLong { len: raw.len(), max: max_len });
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for AsciiText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<&str> for AsciiText {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
