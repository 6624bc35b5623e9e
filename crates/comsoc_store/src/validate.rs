//! Structural & semantic checks, run before any mutation.
//!
//! Creation checks run in a fixed order (deadline, rule, alternative count,
//! tie-break) so a request with several defects always reports the first.

use chrono::{DateTime, Utc};
use comsoc_core::{is_permutation_of_range, Alternative, BallotId, Preference, Rule, StrictOrder};
use comsoc_io::deadline::parse_deadline;
use comsoc_io::wire::NewBallotRequest;

use crate::error::BallotError;

/// A creation request that passed every check.
#[derive(Debug, Clone)]
pub struct ValidatedBallot {
    pub rule: Rule,
    pub deadline: DateTime<Utc>,
    pub alts: usize,
    pub tie_break: Option<StrictOrder>,
}

/// Convert signed wire integers to alternatives; `None` if any is out of `u32`.
fn as_alternatives(values: &[i64]) -> Option<Vec<Alternative>> {
    values
        .iter()
        .map(|v| u32::try_from(*v).ok().map(Alternative::new))
        .collect()
}

fn strict_order(values: &[i64], alts: usize) -> Option<StrictOrder> {
    StrictOrder::new(as_alternatives(values)?, alts).ok()
}

pub fn validate_new_ballot(req: &NewBallotRequest) -> Result<ValidatedBallot, BallotError> {
    let deadline =
        parse_deadline(&req.deadline).map_err(|_| BallotError::BadDeadline(req.deadline.clone()))?;

    let rule: Rule = req
        .rule
        .parse()
        .map_err(|_| BallotError::UnknownRule(req.rule.clone()))?;

    if req.alts < 1 {
        return Err(BallotError::BadAltCount(req.alts));
    }
    let alts = usize::try_from(req.alts).map_err(|_| BallotError::BadAltCount(req.alts))?;

    let tie_break = strict_order(&req.tie_break, alts);
    if rule.requires_tie_break() && tie_break.is_none() {
        return Err(BallotError::BadTieBreak { tie_break: req.tie_break.clone(), alts: req.alts });
    }

    Ok(ValidatedBallot { rule, deadline, alts, tie_break })
}

/// `prefs` must be a permutation of `1..=alts`.
pub fn validate_preference(
    ballot: &BallotId,
    prefs: &[i64],
    alts: usize,
) -> Result<Preference, BallotError> {
    as_alternatives(prefs)
        .filter(|p| is_permutation_of_range(p, alts))
        .ok_or_else(|| BallotError::MalformedPreference {
            ballot: ballot.clone(),
            prefs: prefs.to_vec(),
            alts,
        })
}

/// Approval threshold from `options[0]`, in `0..=alts`.
pub fn validate_threshold(
    ballot: &BallotId,
    options: Option<&[i64]>,
    alts: usize,
) -> Result<i64, BallotError> {
    match options.and_then(|o| o.first()) {
        Some(&t) if t >= 0 && t as u64 <= alts as u64 => Ok(t),
        _ => Err(BallotError::MissingOrInvalidThreshold {
            ballot: ballot.clone(),
            options: options.map(<[i64]>::to_vec),
            alts,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(rule: &str, alts: i64, tie_break: Vec<i64>) -> NewBallotRequest {
        NewBallotRequest {
            rule: rule.into(),
            deadline: "2030-01-01T00:00:00Z".into(),
            voter_ids: vec![],
            alts,
            tie_break,
        }
    }

    #[test]
    fn accepts_a_well_formed_request() {
        let v = validate_new_ballot(&req("borda", 3, vec![3, 1, 2])).unwrap();
        assert_eq!(v.rule, Rule::Borda);
        assert_eq!(v.alts, 3);
        assert_eq!(v.tie_break.unwrap().first(), Some(Alternative::new(3)));
    }

    #[test]
    fn reports_the_first_defect() {
        let mut r = req("nope", 0, vec![]);
        r.deadline = "soon".into();
        assert_eq!(validate_new_ballot(&r).unwrap_err(), BallotError::BadDeadline("soon".into()));
        assert_eq!(
            validate_new_ballot(&req("nope", 0, vec![])).unwrap_err(),
            BallotError::UnknownRule("nope".into())
        );
        assert_eq!(
            validate_new_ballot(&req("stv", 0, vec![])).unwrap_err(),
            BallotError::BadAltCount(0)
        );
        assert_eq!(
            validate_new_ballot(&req("stv", 3, vec![1, 2])).unwrap_err().kind(),
            crate::ErrorKind::BadTieBreak
        );
    }

    #[test]
    fn tie_break_must_be_an_exact_permutation() {
        for tb in [vec![1, 2, 2], vec![0, 1, 2], vec![2, 3, 4], vec![1, 2, 3, 4], vec![-1, 1, 2]] {
            assert_eq!(
                validate_new_ballot(&req("majority", 3, tb.clone())).unwrap_err().kind(),
                crate::ErrorKind::BadTieBreak,
                "{tb:?}"
            );
        }
    }

    #[test]
    fn condorcet_skips_the_tie_break_check() {
        let v = validate_new_ballot(&req("condorcet", 3, vec![])).unwrap();
        assert!(v.tie_break.is_none());
        let v = validate_new_ballot(&req("condorcet", 3, vec![9])).unwrap();
        assert!(v.tie_break.is_none());
    }

    #[test]
    fn preferences_and_thresholds() {
        let id = BallotId::from_seq(1);
        assert!(validate_preference(&id, &[2, 3, 1], 3).is_ok());
        for bad in [vec![1, 2], vec![1, 1, 2], vec![0, 1, 2], vec![1, 2, 4], vec![-3, 1, 2]] {
            assert!(validate_preference(&id, &bad, 3).is_err(), "{bad:?}");
        }
        assert_eq!(validate_threshold(&id, Some(&[2, 9][..]), 3), Ok(2));
        assert_eq!(validate_threshold(&id, Some(&[0][..]), 3), Ok(0));
        assert!(validate_threshold(&id, None, 3).is_err());
        assert!(validate_threshold(&id, Some(&[][..]), 3).is_err());
        assert!(validate_threshold(&id, Some(&[4][..]), 3).is_err());
        assert!(validate_threshold(&id, Some(&[-1][..]), 3).is_err());
    }
}
