//! Single transferable vote, one elimination per round.
//!
//! Runs `N - 1` rounds on a private copy of the profile. Each round tallies
//! first choices among the alternatives still in play, eliminates the one
//! with the fewest votes, and strikes it from every preference (survivors
//! keep their relative order). Ties for last place are broken by the
//! tie-break order read backwards: the tied alternative ranked lowest in it
//! is eliminated. Every survivor of a round scores one point, so the final
//! score of an alternative is the number of rounds it survived.

use comsoc_core::{check_profile, dense_count, Count, Preference, Profile};

use crate::tiebreak::TieBreak;
use crate::{max_count, AlgoError, Alternative};

/// Result of a full elimination run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StvOutcome {
    /// Rounds survived per alternative (dense).
    pub count: Count,
    /// Eliminated alternatives, first round first.
    pub eliminated: Vec<Alternative>,
    pub survivor: Alternative,
}

impl StvOutcome {
    /// Survivor first, then in reverse elimination order.
    pub fn ranking(&self) -> Vec<Alternative> {
        std::iter::once(self.survivor)
            .chain(self.eliminated.iter().rev().copied())
            .collect()
    }
}

pub fn stv_swf(profile: &Profile, tie_break: &TieBreak) -> Result<StvOutcome, AlgoError> {
    check_profile(profile)?;
    let mut rows: Vec<Preference> = profile.rows().to_vec();
    let mut in_play: Vec<Alternative> = profile.alternatives().to_vec();
    let mut count = dense_count(in_play.iter().copied());
    let mut eliminated = Vec::with_capacity(in_play.len().saturating_sub(1));

    while in_play.len() > 1 {
        let mut tally = dense_count(in_play.iter().copied());
        for pref in &rows {
            if let Some(top) = pref.first() {
                *tally.entry(*top).or_insert(0) += 1;
            }
        }
        let fewest = in_play.iter().map(|a| tally[a]).min().unwrap_or(0);
        let last: Vec<Alternative> = in_play.iter().copied().filter(|a| tally[a] == fewest).collect();
        let out = tie_break.weakest(&last)?;

        for pref in rows.iter_mut() {
            pref.retain(|a| *a != out);
        }
        in_play.retain(|a| *a != out);
        for a in &in_play {
            *count.entry(*a).or_insert(0) += 1;
        }
        eliminated.push(out);
    }

    let survivor = in_play.first().copied().ok_or(AlgoError::EmptyInput)?;
    Ok(StvOutcome { count, eliminated, survivor })
}

pub fn stv_scf(profile: &Profile, tie_break: &TieBreak) -> Result<Vec<Alternative>, AlgoError> {
    Ok(max_count(&stv_swf(profile, tie_break)?.count))
}

/// Tie-free ranking by elimination round.
pub fn stv_ranking(profile: &Profile, tie_break: &TieBreak) -> Result<Vec<Alternative>, AlgoError> {
    Ok(stv_swf(profile, tie_break)?.ranking())
}

pub fn stv_winner(profile: &Profile, tie_break: &TieBreak) -> Result<Alternative, AlgoError> {
    Ok(stv_swf(profile, tie_break)?.survivor)
}
