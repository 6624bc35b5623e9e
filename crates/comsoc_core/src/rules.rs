//! Voting rules known to the engine and their wire tokens.
//!
//! Requests carry the rule as a free string: an unrecognized token is a
//! distinct failure ("not implemented"), so parsing goes through `FromStr`
//! rather than a serde derive on the request type.

use crate::errors::CoreError;
use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

macro_rules! rule_enum {
    ($name:ident => { $($variant:ident = $token:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        pub enum $name {
            $(
                #[cfg_attr(feature = "serde", serde(rename = $token))]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub const fn as_str(self) -> &'static str {
                match self { $($name::$variant => $token),+ }
            }
        }

        impl FromStr for $name {
            type Err = CoreError;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($token => Ok($name::$variant),)+
                    _ => Err(CoreError::UnknownRule),
                }
            }
        }
    };
}

rule_enum!(Rule => {
    Majority  = "majority",
    Borda     = "borda",
    Approval  = "approval",
    Condorcet = "condorcet",
    Stv       = "stv",
});

impl Rule {
    /// Condorcet never consults a tie-break; every other rule requires a
    /// complete one at ballot creation.
    #[inline]
    pub const fn requires_tie_break(self) -> bool {
        !matches!(self, Rule::Condorcet)
    }

    /// Whether a computed result carries a full ranking.
    #[inline]
    pub const fn has_ranking(self) -> bool {
        !matches!(self, Rule::Condorcet)
    }

    /// Approval needs a per-voter threshold in `options[0]`.
    #[inline]
    pub const fn uses_threshold(self) -> bool {
        matches!(self, Rule::Approval)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
