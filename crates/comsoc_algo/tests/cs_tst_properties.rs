//! Property tests for the scoring engine and the tie-break composer.
//!
//! Profiles are random permutations of `1..=N` with 2..=6 alternatives and
//! 1..=15 voters. Each case also draws a random strict order (tie-break) and
//! one approval threshold per voter.

use std::collections::{BTreeMap, BTreeSet};

use comsoc_algo::tabulation::{
    approval_ranking, approval_scf, approval_swf, borda_scf, borda_swf, condorcet_scf,
    condorcet_swf, condorcet_winner, majority_scf, majority_swf, stv_scf, stv_swf, Pairwise,
};
use comsoc_algo::{max_count, to_ranking, to_winner, AlgoError, Alternative, Count, Profile, TieBreak};
use proptest::prelude::*;
use rand_chacha::ChaCha20Rng;
use rand_core::{RngCore, SeedableRng};

#[derive(Clone, Debug)]
struct Election {
    n: usize,
    profile: Profile,
    order: Vec<Alternative>,
    thresholds: Vec<i64>,
}

fn election() -> impl Strategy<Value = Election> {
    (2usize..=6, 1usize..=15)
        .prop_flat_map(|(n, voters)| {
            let base: Vec<u32> = (1..=n as u32).collect();
            (
                Just(n),
                prop::collection::vec(Just(base.clone()).prop_shuffle(), voters),
                Just(base).prop_shuffle(),
                prop::collection::vec(0..=n as i64, voters),
            )
        })
        .prop_map(|(n, rows, order, thresholds)| Election {
            n,
            profile: Profile::from_rows(rows),
            order: order.into_iter().map(Alternative::new).collect(),
            thresholds,
        })
}

/// Voters preferring `a` to `b`, found by scanning each preference until
/// either alternative shows up.
fn scan_duel(p: &Profile, a: Alternative, b: Alternative) -> u64 {
    p.iter()
        .filter(|pref| pref.iter().find(|x| **x == a || **x == b) == Some(&a))
        .count() as u64
}

fn assert_scf_in_argmax(scf: &[Alternative], swf: &Count) {
    let best = max_count(swf);
    for w in scf {
        assert!(best.contains(w), "{w} not among maxima {best:?}");
    }
}

fn check_ranking(ranking: &[Alternative], count: &Count, tb: &TieBreak, n: usize) {
    assert_eq!(ranking.len(), n);
    let distinct: BTreeSet<_> = ranking.iter().collect();
    assert_eq!(distinct.len(), n);
    for pair in ranking.windows(2) {
        let (hi, lo) = (count[&pair[0]], count[&pair[1]]);
        assert!(hi >= lo);
        if hi == lo {
            assert!(tb.weight(pair[0]) > tb.weight(pair[1]));
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn borda_scores_sum_to_a_constant(e in election()) {
        let n = e.n as u64;
        let c = borda_swf(&e.profile).unwrap();
        prop_assert_eq!(c.values().sum::<u64>(), e.profile.len() as u64 * n * (n - 1) / 2);
    }

    #[test]
    fn counts_are_dense(e in election()) {
        prop_assert_eq!(majority_swf(&e.profile).unwrap().len(), e.n);
        prop_assert_eq!(borda_swf(&e.profile).unwrap().len(), e.n);
        prop_assert_eq!(approval_swf(&e.profile, &e.thresholds).unwrap().len(), e.n);
        prop_assert_eq!(condorcet_swf(&e.profile).unwrap().len(), e.n);
    }

    #[test]
    fn scf_winners_hold_the_maximal_score(e in election()) {
        let tb = TieBreak::new(&e.order);
        let p = &e.profile;
        assert_scf_in_argmax(&majority_scf(p).unwrap(), &majority_swf(p).unwrap());
        assert_scf_in_argmax(&borda_scf(p).unwrap(), &borda_swf(p).unwrap());
        assert_scf_in_argmax(
            &approval_scf(p, &e.thresholds).unwrap(),
            &approval_swf(p, &e.thresholds).unwrap(),
        );
        assert_scf_in_argmax(&condorcet_scf(p).unwrap(), &condorcet_swf(p).unwrap());
        assert_scf_in_argmax(&stv_scf(p, &tb).unwrap(), &stv_swf(p, &tb).unwrap().count);
    }

    #[test]
    fn rankings_are_total_and_tie_free(e in election()) {
        let tb = TieBreak::new(&e.order);
        let swfs: [fn(&Profile) -> Result<Count, AlgoError>; 3] =
            [majority_swf, borda_swf, condorcet_swf];
        for swf in swfs {
            let ranking = to_ranking(swf, &tb)(&e.profile).unwrap();
            check_ranking(&ranking, &swf(&e.profile).unwrap(), &tb, e.n);
        }
        let ranking = approval_ranking(&e.profile, &e.thresholds, &tb).unwrap();
        check_ranking(&ranking, &approval_swf(&e.profile, &e.thresholds).unwrap(), &tb, e.n);
    }

    #[test]
    fn winners_head_their_rankings(e in election()) {
        let tb = TieBreak::new(&e.order);
        let winner = to_winner(borda_scf, &tb)(&e.profile).unwrap();
        let ranking = to_ranking(borda_swf, &tb)(&e.profile).unwrap();
        prop_assert_eq!(ranking[0], winner);
    }

    #[test]
    fn stv_eliminates_one_per_round(e in election()) {
        let tb = TieBreak::new(&e.order);
        let out = stv_swf(&e.profile, &tb).unwrap();
        let n = e.n as u64;
        prop_assert_eq!(out.eliminated.len(), e.n - 1);
        let distinct: BTreeSet<_> = out.eliminated.iter().chain([&out.survivor]).collect();
        prop_assert_eq!(distinct.len(), e.n);
        prop_assert_eq!(out.count[&out.survivor], n - 1);
        prop_assert_eq!(out.count.values().sum::<u64>(), n * (n - 1) / 2);
        for (i, alt) in out.ranking().iter().enumerate() {
            prop_assert_eq!(out.count[alt], n - 1 - i as u64);
        }
    }

    #[test]
    fn stv_eliminates_fewest_first_choices(e in election()) {
        let tb = TieBreak::new(&e.order);
        let out = stv_swf(&e.profile, &tb).unwrap();
        let mut rows: Vec<Vec<Alternative>> = e.profile.rows().to_vec();
        let mut in_play: Vec<Alternative> = e.profile.alternatives().to_vec();
        for gone in &out.eliminated {
            let mut tally: BTreeMap<Alternative, u64> = in_play.iter().map(|a| (*a, 0)).collect();
            for row in &rows {
                *tally.get_mut(&row[0]).unwrap() += 1;
            }
            let fewest = *tally.values().min().unwrap();
            let last: Vec<Alternative> =
                tally.iter().filter(|(_, v)| **v == fewest).map(|(a, _)| *a).collect();
            prop_assert!(last.contains(gone), "{gone} eliminated with {} first choices", tally[gone]);
            prop_assert!(last.iter().all(|a| tb.weight(*a) >= tb.weight(*gone)));
            for row in rows.iter_mut() {
                row.retain(|a| a != gone);
            }
            in_play.retain(|a| a != gone);
        }
        prop_assert_eq!(in_play, vec![out.survivor]);
    }

    #[test]
    fn condorcet_winner_beats_everyone(e in election()) {
        let p = &e.profile;
        let voters = p.len() as u64;
        let alts = p.alternatives().to_vec();
        let beats_all = |a: Alternative| {
            alts.iter().filter(|b| **b != a).all(|b| 2 * scan_duel(p, a, *b) > voters)
        };
        match condorcet_winner(p).unwrap() {
            Some(w) => prop_assert!(beats_all(w)),
            None => prop_assert!(alts.iter().all(|a| !beats_all(*a))),
        }
    }
}

#[test]
fn pairwise_support_matches_scanning() {
    let mut rng = ChaCha20Rng::seed_from_u64(2024);
    for _ in 0..200 {
        let n = 2 + (rng.next_u32() % 5) as usize;
        let voters = 1 + (rng.next_u32() % 12) as usize;
        let mut rows = Vec::with_capacity(voters);
        for _ in 0..voters {
            let mut pref: Vec<u32> = (1..=n as u32).collect();
            for i in (1..n).rev() {
                let j = (rng.next_u32() as usize) % (i + 1);
                pref.swap(i, j);
            }
            rows.push(pref);
        }
        let p = Profile::from_rows(rows);
        let pw = Pairwise::from_profile(&p).unwrap();
        for a in p.alternatives() {
            for b in p.alternatives() {
                if a != b {
                    assert_eq!(pw.support(*a, *b), scan_duel(&p, *a, *b));
                    assert_eq!(pw.support(*a, *b) + pw.support(*b, *a), voters as u64);
                }
            }
        }
    }
}

#[test]
fn end_to_end_scenarios() {
    let a = Alternative::new;
    let votes = Profile::from_rows([vec![1, 2, 3], vec![1, 3, 2], vec![2, 1, 3]]);
    let tb = TieBreak::new(&[a(1), a(2), a(3)]);

    assert_eq!(to_winner(majority_scf, &tb)(&votes).unwrap(), a(1));
    assert_eq!(to_winner(borda_scf, &tb)(&votes).unwrap(), a(1));

    let approval = Profile::from_rows([vec![1, 2, 3], vec![2, 1, 3]]);
    let c = approval_swf(&approval, &[1, 2]).unwrap();
    assert_eq!((c[&a(1)], c[&a(2)], c[&a(3)]), (2, 1, 0));

    let stv = Profile::from_rows([vec![1, 2, 3], vec![1, 2, 3], vec![2, 3, 1]]);
    let out = stv_swf(&stv, &tb).unwrap();
    assert_eq!(out.eliminated, vec![a(3), a(2)]);
    assert_eq!(out.survivor, a(1));
}
