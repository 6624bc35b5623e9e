//! Condorcet: pairwise duels, winner must beat every other alternative.
//!
//! A duel between `a` and `b` scans each preference until either appears;
//! that one takes the voter. `a` wins when its voters exceed half the
//! electorate. Profiles are full permutations, so the scan is equivalent to
//! comparing positions.
//!
//! No ranking is defined for this rule. A profile without a Condorcet winner
//! yields an empty set, not an error.

use std::collections::BTreeMap;

use comsoc_core::{check_profile, dense_count, Count, Profile};

use crate::{AlgoError, Alternative};

/// Pairwise support: `support(a, b)` = number of voters ranking `a` above `b`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Pairwise {
    support: BTreeMap<(Alternative, Alternative), u64>,
    voters: u64,
    alternatives: Vec<Alternative>,
}

impl Pairwise {
    pub fn from_profile(profile: &Profile) -> Result<Self, AlgoError> {
        check_profile(profile)?;
        let alternatives = profile.alternatives().to_vec();
        let mut support = BTreeMap::new();
        for a in &alternatives {
            for b in &alternatives {
                if a != b {
                    support.insert((*a, *b), 0u64);
                }
            }
        }
        for pref in profile {
            for (i, a) in pref.iter().enumerate() {
                for b in &pref[i + 1..] {
                    if let Some(slot) = support.get_mut(&(*a, *b)) {
                        *slot += 1;
                    }
                }
            }
        }
        Ok(Self { support, voters: profile.len() as u64, alternatives })
    }

    #[inline]
    pub fn support(&self, a: Alternative, b: Alternative) -> u64 {
        self.support.get(&(a, b)).copied().unwrap_or(0)
    }

    /// `a` beats `b` with strictly more than half the votes.
    #[inline]
    pub fn beats(&self, a: Alternative, b: Alternative) -> bool {
        let wins = self.support(a, b);
        wins > self.voters - wins
    }

    /// Number of duels `a` wins.
    pub fn duels_won(&self, a: Alternative) -> u64 {
        self.alternatives
            .iter()
            .filter(|b| **b != a && self.beats(a, **b))
            .count() as u64
    }

    /// The alternative that wins every duel, scanning in first-row order.
    pub fn winner(&self) -> Option<Alternative> {
        let needed = self.alternatives.len() as u64 - 1;
        self.alternatives
            .iter()
            .copied()
            .find(|a| self.duels_won(*a) == needed)
    }
}

/// Duels won per alternative (dense). A Condorcet winner, if any, holds the
/// unique maximum `N - 1`.
pub fn condorcet_swf(profile: &Profile) -> Result<Count, AlgoError> {
    let pw = Pairwise::from_profile(profile)?;
    let mut count = dense_count(profile.alternatives().iter().copied());
    for (alt, score) in count.iter_mut() {
        *score = pw.duels_won(*alt);
    }
    Ok(count)
}

/// Empty or a singleton.
pub fn condorcet_scf(profile: &Profile) -> Result<Vec<Alternative>, AlgoError> {
    Ok(condorcet_winner(profile)?.into_iter().collect())
}

pub fn condorcet_winner(profile: &Profile) -> Result<Option<Alternative>, AlgoError> {
    Ok(Pairwise::from_profile(profile)?.winner())
}
