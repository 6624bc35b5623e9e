//! Approval with per-voter thresholds.
//!
//! Voter `i` approves the top `thresholds[i]` alternatives of their
//! preference. Thresholds are positional: `thresholds[i]` belongs to
//! `profile.rows()[i]`.

use comsoc_core::{check_profile, dense_count, Count, Profile};

use crate::tiebreak::TieBreak;
use crate::{max_count, AlgoError, Alternative};

pub fn approval_swf(profile: &Profile, thresholds: &[i64]) -> Result<Count, AlgoError> {
    check_profile(profile)?;
    if thresholds.len() != profile.len() {
        return Err(AlgoError::ThresholdCount {
            thresholds: thresholds.len(),
            votes: profile.len(),
        });
    }
    let alts = profile.num_alternatives();
    let mut count = dense_count(profile.alternatives().iter().copied());
    for (voter, (pref, &t)) in profile.iter().zip(thresholds).enumerate() {
        if t < 0 || t as u64 > alts as u64 {
            return Err(AlgoError::InvalidThreshold { voter, threshold: t, alts });
        }
        for alt in pref.iter().take(t as usize) {
            *count.entry(*alt).or_insert(0) += 1;
        }
    }
    Ok(count)
}

pub fn approval_scf(profile: &Profile, thresholds: &[i64]) -> Result<Vec<Alternative>, AlgoError> {
    Ok(max_count(&approval_swf(profile, thresholds)?))
}

/// Full tie-free ranking. Thresholds are not part of a plain `Count -> ranking`
/// composition, so this runs the composer's bucket loop directly.
pub fn approval_ranking(
    profile: &Profile,
    thresholds: &[i64],
    tie_break: &TieBreak,
) -> Result<Vec<Alternative>, AlgoError> {
    tie_break.rank_count(&approval_swf(profile, thresholds)?)
}

pub fn approval_winner(
    profile: &Profile,
    thresholds: &[i64],
    tie_break: &TieBreak,
) -> Result<Alternative, AlgoError> {
    tie_break.break_tie(&approval_scf(profile, thresholds)?)
}
