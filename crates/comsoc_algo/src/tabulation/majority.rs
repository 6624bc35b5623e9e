//! Majority (plurality over first choices).

use comsoc_core::{check_profile, dense_count, Count, Profile};

use crate::{max_count, AlgoError, Alternative};

/// One point to each voter's first-ranked alternative. Dense over all alternatives.
pub fn majority_swf(profile: &Profile) -> Result<Count, AlgoError> {
    check_profile(profile)?;
    let mut count = dense_count(profile.alternatives().iter().copied());
    for pref in profile {
        if let Some(top) = pref.first() {
            *count.entry(*top).or_insert(0) += 1;
        }
    }
    Ok(count)
}

pub fn majority_scf(profile: &Profile) -> Result<Vec<Alternative>, AlgoError> {
    Ok(max_count(&majority_swf(profile)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_choices_are_counted() {
        let p = Profile::from_rows([vec![1, 2, 3], vec![1, 3, 2], vec![2, 1, 3]]);
        let c = majority_swf(&p).unwrap();
        assert_eq!(c.values().copied().collect::<Vec<_>>(), vec![2, 1, 0]);
        assert_eq!(majority_scf(&p).unwrap(), vec![Alternative::new(1)]);
    }

    #[test]
    fn ties_surface_in_the_scf() {
        let p = Profile::from_rows([vec![1, 2], vec![2, 1]]);
        assert_eq!(majority_scf(&p).unwrap(), vec![Alternative::new(1), Alternative::new(2)]);
    }

    #[test]
    fn empty_profile_is_invalid() {
        assert!(matches!(majority_swf(&Profile::default()), Err(AlgoError::InvalidProfile(_))));
    }
}
