//! Rule dispatch: a ballot's rule → scoring engine + tie-break composer.
//!
//! Majority and Borda go through the generic composer. Approval (per-voter
//! thresholds), Condorcet (no ranking, winner may not exist) and STV
//! (tie-break applied during elimination) have their own routines.

use comsoc_algo::tabulation::{
    approval_ranking, approval_winner, borda_scf, borda_swf, condorcet_winner, majority_scf,
    majority_swf, stv_swf,
};
use comsoc_algo::{to_ranking, to_winner, AlgoError, Count, TieBreak};
use comsoc_core::{Alternative, Profile, Rule};
use comsoc_io::wire::ResultResponse;

use crate::ballot::Ballot;

type Swf = fn(&Profile) -> Result<Count, AlgoError>;
type Scf = fn(&Profile) -> Result<Vec<Alternative>, AlgoError>;

/// Rules fully described by a (SWF, SCF) pair.
fn scored(rule: Rule) -> Option<(Swf, Scf)> {
    match rule {
        Rule::Majority => Some((majority_swf as Swf, majority_scf as Scf)),
        Rule::Borda => Some((borda_swf as Swf, borda_scf as Scf)),
        Rule::Approval | Rule::Condorcet | Rule::Stv => None,
    }
}

/// Computed result of a closed ballot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// `None` when no alternative wins (Condorcet only).
    pub winner: Option<Alternative>,
    /// `None` for rules without a ranking.
    pub ranking: Option<Vec<Alternative>>,
    /// Zero votes were cast: the tie-break order stands in for a computed result.
    pub fallback: bool,
}

impl Outcome {
    pub fn to_response(&self) -> ResultResponse {
        ResultResponse {
            winner: self.winner.unwrap_or(ResultResponse::NO_WINNER),
            ranking: self.ranking.clone(),
        }
    }
}

/// Zero votes: the tie-break's first element wins and the tie-break itself is
/// the ranking. Condorcet reports no winner and no ranking.
fn fallback(ballot: &Ballot) -> Outcome {
    let order = ballot
        .tie_break
        .as_ref()
        .filter(|_| ballot.rule.has_ranking())
        .map(|order| order.as_slice().to_vec());
    Outcome {
        winner: order.as_ref().and_then(|o| o.first().copied()),
        ranking: order,
        fallback: true,
    }
}

pub fn compute_outcome(ballot: &Ballot) -> Result<Outcome, AlgoError> {
    if ballot.votes_cast() == 0 {
        return Ok(fallback(ballot));
    }
    // The engines need at least two alternatives; a lone one wins outright.
    if ballot.alts == 1 {
        let only = Alternative::new(1);
        return Ok(Outcome {
            winner: Some(only),
            ranking: ballot.rule.has_ranking().then(|| vec![only]),
            fallback: false,
        });
    }
    let profile = ballot.profile();

    if ballot.rule == Rule::Condorcet {
        return Ok(Outcome { winner: condorcet_winner(profile)?, ranking: None, fallback: false });
    }

    let tie_break = ballot
        .tie_break
        .as_ref()
        .map(TieBreak::from)
        .ok_or(AlgoError::EmptyInput)?;

    let (winner, ranking) = match ballot.rule {
        Rule::Approval => {
            let thresholds = ballot.thresholds_in_vote_order();
            let ranking = approval_ranking(profile, &thresholds, &tie_break)?;
            let winner = approval_winner(profile, &thresholds, &tie_break)?;
            (winner, ranking)
        }
        Rule::Stv => {
            let out = stv_swf(profile, &tie_break)?;
            (out.survivor, out.ranking())
        }
        rule => {
            let (swf, scf) = scored(rule).ok_or(AlgoError::EmptyInput)?;
            let ranking = to_ranking(swf, &tie_break)(profile)?;
            let winner = to_winner(scf, &tie_break)(profile)?;
            (winner, ranking)
        }
    };

    Ok(Outcome { winner: Some(winner), ranking: Some(ranking), fallback: false })
}
