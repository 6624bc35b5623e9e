//! Preferences, profiles, counts and strict orders.
//!
//! A preference lists every alternative exactly once, most preferred first.
//! A profile is the ordered list of cast preferences; row order is the order
//! in which votes were accepted and is significant for STV and Condorcet
//! scanning.

use crate::errors::CoreError;
use crate::ids::Alternative;
use alloc::collections::{BTreeMap, BTreeSet};
use alloc::vec::Vec;
use core::fmt;

/// Most-preferred first.
pub type Preference = Vec<Alternative>;

/// Score per alternative. Counts produced by the scoring engine are dense:
/// every alternative of the profile has an entry, zero included.
pub type Count = BTreeMap<Alternative, u64>;

/// Ordered list of preferences.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(transparent))]
pub struct Profile {
    rows: Vec<Preference>,
}

impl Profile {
    pub fn new(rows: Vec<Preference>) -> Self { Self { rows } }

    /// Convenience constructor from raw integers.
    pub fn from_rows<I, R>(rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = u32>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|r| r.into_iter().map(Alternative::new).collect())
                .collect(),
        }
    }

    pub fn push(&mut self, pref: Preference) { self.rows.push(pref); }

    #[inline]
    pub fn len(&self) -> usize { self.rows.len() }
    #[inline]
    pub fn is_empty(&self) -> bool { self.rows.is_empty() }

    pub fn rows(&self) -> &[Preference] { &self.rows }

    pub fn iter(&self) -> core::slice::Iter<'_, Preference> { self.rows.iter() }

    /// Alternatives in the order of the first preference (empty if no votes).
    pub fn alternatives(&self) -> &[Alternative] {
        self.rows.first().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn num_alternatives(&self) -> usize { self.alternatives().len() }
}

impl<'a> IntoIterator for &'a Profile {
    type Item = &'a Preference;
    type IntoIter = core::slice::Iter<'a, Preference>;
    fn into_iter(self) -> Self::IntoIter { self.rows.iter() }
}

/// Why a profile is unusable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProfileError {
    NoVotes,
    TooFewAlternatives { found: usize },
    RaggedRow { row: usize, expected: usize, found: usize },
    /// Row repeats an alternative or names one absent from the first row.
    NotAPermutation { row: usize },
}

impl fmt::Display for ProfileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileError::NoVotes => write!(f, "profile has no votes"),
            ProfileError::TooFewAlternatives { found } => {
                write!(f, "profile needs at least 2 alternatives, found {found}")
            }
            ProfileError::RaggedRow { row, expected, found } => {
                write!(f, "row {row} has {found} alternatives, expected {expected}")
            }
            ProfileError::NotAPermutation { row } => {
                write!(f, "row {row} is not a permutation of the profile's alternatives")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ProfileError {}

/// Validate shape: at least one row, at least two alternatives, every row a
/// permutation of the first.
pub fn check_profile(profile: &Profile) -> Result<(), ProfileError> {
    let first = profile.rows.first().ok_or(ProfileError::NoVotes)?;
    if first.len() < 2 {
        return Err(ProfileError::TooFewAlternatives { found: first.len() });
    }
    let universe: BTreeSet<Alternative> = first.iter().copied().collect();
    for (row, pref) in profile.rows.iter().enumerate() {
        if pref.len() != first.len() {
            return Err(ProfileError::RaggedRow { row, expected: first.len(), found: pref.len() });
        }
        let mut seen = BTreeSet::new();
        for a in pref {
            if !universe.contains(a) || !seen.insert(*a) {
                return Err(ProfileError::NotAPermutation { row });
            }
        }
    }
    Ok(())
}

/// True iff `values` is a permutation of `1..=n`.
pub fn is_permutation_of_range(values: &[Alternative], n: usize) -> bool {
    if values.len() != n {
        return false;
    }
    let mut seen = alloc::vec![false; n];
    for a in values {
        let v = a.get() as usize;
        if v == 0 || v > n || seen[v - 1] {
            return false;
        }
        seen[v - 1] = true;
    }
    true
}

/// Zero-filled count over `alts`.
pub fn dense_count<I>(alts: I) -> Count
where
    I: IntoIterator<Item = Alternative>,
{
    alts.into_iter().map(|a| (a, 0)).collect()
}

/// A permutation of `1..=N`, used as a tie-break order (first = strongest).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StrictOrder(Vec<Alternative>);

impl StrictOrder {
    /// Validate that `order` is a permutation of `1..=n`.
    pub fn new(order: Vec<Alternative>, n: usize) -> Result<Self, CoreError> {
        if n == 0 {
            return Err(CoreError::EmptyChoiceSet);
        }
        if !is_permutation_of_range(&order, n) {
            return Err(CoreError::NotAPermutation { expected_len: n });
        }
        Ok(Self(order))
    }

    /// `1, 2, .., n`.
    pub fn identity(n: usize) -> Self {
        Self((1..=n as u32).map(Alternative::new).collect())
    }

    pub fn as_slice(&self) -> &[Alternative] { &self.0 }
    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
    pub fn first(&self) -> Option<Alternative> { self.0.first().copied() }

    pub fn position(&self, a: Alternative) -> Option<usize> {
        self.0.iter().position(|x| *x == a)
    }
}

impl AsRef<[Alternative]> for StrictOrder {
    fn as_ref(&self) -> &[Alternative] { &self.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn alts(v: &[u32]) -> Vec<Alternative> { v.iter().copied().map(Alternative::new).collect() }

    #[test]
    fn check_profile_accepts_permutations() {
        let p = Profile::from_rows([vec![1, 2, 3], vec![3, 1, 2], vec![2, 3, 1]]);
        assert_eq!(check_profile(&p), Ok(()));
        assert_eq!(p.alternatives(), alts(&[1, 2, 3]).as_slice());
    }

    #[test]
    fn check_profile_rejects_bad_shapes() {
        assert_eq!(check_profile(&Profile::default()), Err(ProfileError::NoVotes));
        assert_eq!(
            check_profile(&Profile::from_rows([vec![1]])),
            Err(ProfileError::TooFewAlternatives { found: 1 })
        );
        assert_eq!(
            check_profile(&Profile::from_rows([vec![1, 2, 3], vec![1, 2]])),
            Err(ProfileError::RaggedRow { row: 1, expected: 3, found: 2 })
        );
        assert_eq!(
            check_profile(&Profile::from_rows([vec![1, 2, 3], vec![1, 1, 2]])),
            Err(ProfileError::NotAPermutation { row: 1 })
        );
        assert_eq!(
            check_profile(&Profile::from_rows([vec![1, 2, 3], vec![1, 2, 4]])),
            Err(ProfileError::NotAPermutation { row: 1 })
        );
        assert_eq!(
            check_profile(&Profile::from_rows([vec![2, 2]])),
            Err(ProfileError::NotAPermutation { row: 0 })
        );
    }

    #[test]
    fn permutation_of_range() {
        assert!(is_permutation_of_range(&alts(&[3, 1, 2]), 3));
        assert!(!is_permutation_of_range(&alts(&[3, 1, 2]), 4));
        assert!(!is_permutation_of_range(&alts(&[0, 1, 2]), 3));
        assert!(!is_permutation_of_range(&alts(&[1, 1, 2]), 3));
        assert!(!is_permutation_of_range(&alts(&[1, 2, 4]), 3));
    }

    #[test]
    fn strict_order_validation() {
        let o = StrictOrder::new(alts(&[4, 2, 3, 1]), 4).unwrap();
        assert_eq!(o.first(), Some(Alternative::new(4)));
        assert_eq!(o.position(Alternative::new(1)), Some(3));
        assert_eq!(
            StrictOrder::new(alts(&[1, 2]), 3),
            Err(CoreError::NotAPermutation { expected_len: 3 })
        );
        assert_eq!(StrictOrder::new(Vec::new(), 0), Err(CoreError::EmptyChoiceSet));
        assert_eq!(StrictOrder::identity(3).as_slice(), alts(&[1, 2, 3]).as_slice());
    }

    #[test]
    fn dense_count_is_zero_filled() {
        let c = dense_count(alts(&[2, 1]));
        assert_eq!(c.len(), 2);
        assert!(c.values().all(|v| *v == 0));
    }
}
