//! Borda: `N - 1 - rank` points per position, top choice earns `N - 1`.

use comsoc_core::{check_profile, dense_count, Count, Profile};

use crate::{max_count, AlgoError, Alternative};

pub fn borda_swf(profile: &Profile) -> Result<Count, AlgoError> {
    check_profile(profile)?;
    let n = profile.num_alternatives() as u64;
    let mut count = dense_count(profile.alternatives().iter().copied());
    for pref in profile {
        for (rank, alt) in pref.iter().enumerate() {
            *count.entry(*alt).or_insert(0) += n - 1 - rank as u64;
        }
    }
    Ok(count)
}

pub fn borda_scf(profile: &Profile) -> Result<Vec<Alternative>, AlgoError> {
    Ok(max_count(&borda_swf(profile)?))
}
