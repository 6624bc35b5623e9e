// crates/comsoc_algo/src/lib.rs
#![forbid(unsafe_code)]

// Core types
pub use comsoc_core::{
    check_profile, dense_count,
    ids::Alternative,
    profile::{Count, Preference, Profile, ProfileError, StrictOrder},
};

// ----------------------------- Errors -----------------------------

pub mod errors {
    use comsoc_core::ProfileError;
    use std::fmt;

    /// Failures of the scoring engine. Callers see these only when a profile
    /// slipped past ballot-level validation or parameters are out of range.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum AlgoError {
        InvalidProfile(ProfileError),
        /// Approval threshold outside `0..=alts` for the voter at row `voter`.
        InvalidThreshold { voter: usize, threshold: i64, alts: usize },
        /// One threshold per vote is required.
        ThresholdCount { thresholds: usize, votes: usize },
        /// Tie-break asked to choose from an empty set.
        EmptyInput,
    }

    impl fmt::Display for AlgoError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                AlgoError::InvalidProfile(e) => write!(f, "invalid profile: {e}"),
                AlgoError::InvalidThreshold { voter, threshold, alts } => write!(
                    f,
                    "invalid threshold {threshold} for voter {voter} (alternatives: {alts})"
                ),
                AlgoError::ThresholdCount { thresholds, votes } => {
                    write!(f, "{thresholds} thresholds for {votes} votes")
                }
                AlgoError::EmptyInput => write!(f, "tie-break over an empty set"),
            }
        }
    }

    impl std::error::Error for AlgoError {}

    impl From<ProfileError> for AlgoError {
        fn from(e: ProfileError) -> Self {
            AlgoError::InvalidProfile(e)
        }
    }
}

pub use errors::AlgoError;

// ----------------------------- Tabulation (public surface) ---------------------------

pub mod tabulation {
    pub mod majority;
    pub mod borda;
    pub mod approval;
    pub mod condorcet;
    pub mod stv;

    pub use approval::{approval_ranking, approval_scf, approval_swf, approval_winner};
    pub use borda::{borda_scf, borda_swf};
    pub use condorcet::{condorcet_scf, condorcet_swf, condorcet_winner, Pairwise};
    pub use majority::{majority_scf, majority_swf};
    pub use stv::{stv_ranking, stv_scf, stv_swf, stv_winner, StvOutcome};
}

pub mod tiebreak;

pub use tiebreak::{to_ranking, to_winner, TieBreak};

// ----------------------------- Shared helpers -----------------------------

/// Insert an explicit zero for every alternative of `alts` missing from `count`.
pub fn normalize_dense(mut count: Count, alts: &[Alternative]) -> Count {
    for a in alts {
        count.entry(*a).or_insert(0);
    }
    count
}

/// Alternatives holding the maximal score, ascending by id. Empty for an empty count.
pub fn max_count(count: &Count) -> Vec<Alternative> {
    let Some(best) = count.values().copied().max() else {
        return Vec::new();
    };
    count
        .iter()
        .filter(|(_, v)| **v == best)
        .map(|(a, _)| *a)
        .collect()
}
