//! Identifiers: alternatives, ballots, agents.
//!
//! `BallotId` and `AgentId` deserialize transparently: an unknown or
//! malformed id is a lookup failure in the store, not a decode failure.

use crate::errors::CoreError;
use alloc::format;
use alloc::string::{String, ToString};
use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An alternative (candidate). Valid values are `1..=N` for a ballot of `N`
/// alternatives; the range check lives with the ballot, not here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct Alternative(u32);

impl Alternative {
    #[inline]
    pub const fn new(n: u32) -> Self { Self(n) }
    #[inline]
    pub const fn get(self) -> u32 { self.0 }
}

impl From<u32> for Alternative {
    fn from(n: u32) -> Self { Self(n) }
}

impl fmt::Display for Alternative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

const BALLOT_PREFIX: &str = "ballot";

/// Server-assigned ballot id, `"ballot<n>"` with `n >= 1`.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct BallotId(String);

impl BallotId {
    /// Id for the `seq`-th ballot created by a store (1-based).
    pub fn from_seq(seq: u64) -> Self {
        Self(format!("{BALLOT_PREFIX}{seq}"))
    }

    pub fn as_str(&self) -> &str { &self.0 }

    /// Sequence number, if the id has the canonical shape.
    pub fn seq(&self) -> Option<u64> {
        let digits = self.0.strip_prefix(BALLOT_PREFIX)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }
}

impl fmt::Display for BallotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for BallotId {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = Self(s.to_string());
        match id.seq() {
            Some(n) if n >= 1 => Ok(id),
            _ => Err(CoreError::InvalidId),
        }
    }
}

/// Opaque voter/agent identifier.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct AgentId(String);

impl AgentId {
    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AgentId {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s.chars().any(char::is_control) {
            return Err(CoreError::InvalidId);
        }
        Ok(Self(s.to_string()))
    }
}

impl From<&str> for AgentId {
    fn from(s: &str) -> Self { Self(s.to_string()) }
}
