//! Tie-break composer.
//!
//! A `TieBreak` is built from a strict order; entry `i` weighs `len - i`, so
//! earlier entries win. Alternatives missing from the order weigh 0. Equal
//! weights (only possible between missing alternatives) resolve to the first
//! candidate in input order.
//!
//! `to_ranking` lifts any social welfare function into a tie-free ranking;
//! `to_winner` lifts a social choice function into a single winner.

use std::collections::BTreeMap;

use comsoc_core::{Count, Profile, StrictOrder};

use crate::{normalize_dense, AlgoError, Alternative};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TieBreak {
    order: Vec<Alternative>,
    weight: BTreeMap<Alternative, usize>,
}

impl TieBreak {
    pub fn new(order: &[Alternative]) -> Self {
        let len = order.len();
        let weight = order.iter().enumerate().map(|(i, a)| (*a, len - i)).collect();
        Self { order: order.to_vec(), weight }
    }

    pub fn order(&self) -> &[Alternative] { &self.order }

    #[inline]
    pub fn weight(&self, a: Alternative) -> usize {
        self.weight.get(&a).copied().unwrap_or(0)
    }

    /// Highest-weighted member of `alts`.
    pub fn break_tie(&self, alts: &[Alternative]) -> Result<Alternative, AlgoError> {
        let (first, rest) = alts.split_first().ok_or(AlgoError::EmptyInput)?;
        let mut best = *first;
        for a in rest {
            if self.weight(*a) > self.weight(best) {
                best = *a;
            }
        }
        Ok(best)
    }

    /// Lowest-weighted member of `alts`; used to pick whom to eliminate.
    pub fn weakest(&self, alts: &[Alternative]) -> Result<Alternative, AlgoError> {
        let (first, rest) = alts.split_first().ok_or(AlgoError::EmptyInput)?;
        let mut worst = *first;
        for a in rest {
            if self.weight(*a) < self.weight(worst) {
                worst = *a;
            }
        }
        Ok(worst)
    }

    /// Bucket by score, walk buckets from the highest score down, and drain each
    /// bucket by repeated `break_tie`. Output length equals `count.len()`.
    pub fn rank_count(&self, count: &Count) -> Result<Vec<Alternative>, AlgoError> {
        let mut buckets: BTreeMap<u64, Vec<Alternative>> = BTreeMap::new();
        for (alt, score) in count {
            buckets.entry(*score).or_default().push(*alt);
        }
        let mut ranking = Vec::with_capacity(count.len());
        for (_, mut tied) in buckets.into_iter().rev() {
            while !tied.is_empty() {
                let best = self.break_tie(&tied)?;
                ranking.push(best);
                if let Some(i) = tied.iter().position(|a| *a == best) {
                    tied.remove(i);
                }
            }
        }
        Ok(ranking)
    }
}

impl From<&StrictOrder> for TieBreak {
    fn from(order: &StrictOrder) -> Self {
        TieBreak::new(order.as_slice())
    }
}

/// Wrap a social welfare function into one returning a full, tie-free ranking.
/// The count is made dense over the profile's alternatives before bucketing.
pub fn to_ranking<'a, F>(
    swf: F,
    tie_break: &'a TieBreak,
) -> impl Fn(&Profile) -> Result<Vec<Alternative>, AlgoError> + 'a
where
    F: Fn(&Profile) -> Result<Count, AlgoError> + 'a,
{
    move |profile: &Profile| {
        let count = normalize_dense(swf(profile)?, profile.alternatives());
        tie_break.rank_count(&count)
    }
}

/// Wrap a social choice function into one returning a single winner.
pub fn to_winner<'a, F>(
    scf: F,
    tie_break: &'a TieBreak,
) -> impl Fn(&Profile) -> Result<Alternative, AlgoError> + 'a
where
    F: Fn(&Profile) -> Result<Vec<Alternative>, AlgoError> + 'a,
{
    move |profile: &Profile| tie_break.break_tie(&scf(profile)?)
}
