//! comsoc_core — Core types for the ballot engine.
//!
//! This crate is **I/O-free**. It defines the vocabulary shared by the scoring
//! engine (`comsoc_algo`), the wire layer (`comsoc_io`), the ballot store
//! (`comsoc_store`), the HTTP surface and the CLI.
//!
//! - Alternatives are positive integers `1..=N`
//! - Preferences, profiles, counts (dense over every alternative)
//! - Strict orders used as tie-breaks
//! - Rule tokens (`majority`, `borda`, `approval`, `condorcet`, `stv`)
//! - Seedable RNG (ChaCha20) for generating synthetic voters
//!
//! Serialization derives are gated behind `serde` feature.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod errors {
    use core::fmt;

    /// Minimal error set for core-domain validation & parsing.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub enum CoreError {
        InvalidId,
        UnknownRule,
        /// Sequence is not a permutation of `1..=expected_len`.
        NotAPermutation { expected_len: usize },
        EmptyChoiceSet,
    }

    impl fmt::Display for CoreError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                CoreError::InvalidId => write!(f, "invalid id"),
                CoreError::UnknownRule => write!(f, "unknown rule"),
                CoreError::NotAPermutation { expected_len } => {
                    write!(f, "not a permutation of 1..={expected_len}")
                }
                CoreError::EmptyChoiceSet => write!(f, "empty choice set"),
            }
        }
    }

    #[cfg(feature = "std")]
    impl std::error::Error for CoreError {}
}

pub mod ids;
pub mod profile;
pub mod rng;
pub mod rules;

pub use errors::CoreError;
pub use ids::{AgentId, Alternative, BallotId};
pub use profile::{
    check_profile, dense_count, is_permutation_of_range, Count, Preference, Profile, ProfileError,
    StrictOrder,
};
pub use rng::ProfileRng;
pub use rules::Rule;
