//! Fixed scenarios: run one ballot either against a server or against an
//! in-process store with a simulated clock, then compare with `expect`.

use chrono::{Duration, Utc};
use comsoc_core::{Alternative, BallotId};
use comsoc_io::deadline::format_deadline;
use comsoc_io::scenario::{Expectation, Scenario, ScenarioVote};
use comsoc_io::wire::{NewBallotRequest, ResultResponse, VoteRequest};
use comsoc_store::{BallotError, BallotStore, Clock, ManualClock};
use serde::Serialize;
use tracing::{debug, info};

use crate::client::{ClientError, RestClient};

/// Simulated voting window for local runs.
const LOCAL_WINDOW_SECS: i64 = 60;

pub fn new_ballot_request(s: &Scenario, deadline: &str) -> NewBallotRequest {
    NewBallotRequest {
        rule: s.rule.clone(),
        deadline: deadline.to_string(),
        voter_ids: s.voter_ids(),
        alts: i64::from(s.alts),
        tie_break: s.tie_break.iter().copied().map(i64::from).collect(),
    }
}

pub fn vote_request(ballot_id: &BallotId, v: &ScenarioVote) -> VoteRequest {
    VoteRequest {
        agent_id: v.agent_id.clone(),
        ballot_id: ballot_id.clone(),
        prefs: v.prefs.iter().copied().map(i64::from).collect(),
        options: v.threshold.map(|t| vec![t]),
    }
}

/// In-process run: votes are cast at the simulated start, the result is
/// read once the clock is past the deadline.
pub fn run_local(s: &Scenario) -> Result<(BallotId, ResultResponse), BallotError> {
    let clock = ManualClock::new(Utc::now());
    let mut store = BallotStore::new();
    let deadline = clock.now() + Duration::seconds(LOCAL_WINDOW_SECS);
    let ballot_id = store.create_ballot(&new_ballot_request(s, &format_deadline(&deadline)))?;
    for v in s.expand() {
        store.cast_vote(&vote_request(&ballot_id, &v), clock.now())?;
    }
    clock.set(deadline);
    let outcome = store.compute_result(&ballot_id, clock.now())?;
    debug!(ballot = %ballot_id, fallback = outcome.fallback, "local scenario computed");
    Ok((ballot_id, outcome.to_response()))
}

pub fn run_remote(
    client: &RestClient,
    s: &Scenario,
    voting: std::time::Duration,
) -> Result<(BallotId, ResultResponse), ClientError> {
    let deadline = Utc::now() + Duration::milliseconds(voting.as_millis() as i64);
    let ballot_id = client.new_ballot(&new_ballot_request(s, &format_deadline(&deadline)))?;
    info!(ballot = %ballot_id, url = client.base_url(), "scenario ballot created");
    for v in s.expand() {
        client.vote(&vote_request(&ballot_id, &v))?;
    }
    let result = client.result_after(&ballot_id, deadline)?;
    Ok((ballot_id, result))
}

fn alts(v: &[u32]) -> Vec<Alternative> {
    v.iter().copied().map(Alternative::new).collect()
}

/// `None` when the result satisfies the expectation. A missing expected
/// ranking is not checked.
pub fn mismatch(expect: &Expectation, got: &ResultResponse) -> Option<String> {
    if got.winner != Alternative::new(expect.winner) {
        return Some(format!("expected winner {}, got {}", expect.winner, got.winner));
    }
    match (&expect.ranking, &got.ranking) {
        (Some(want), Some(have)) if alts(want) == *have => None,
        (Some(want), have) => Some(format!("expected ranking {want:?}, got {have:?}")),
        (None, _) => None,
    }
}

/// What `--out` writes.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub name: Option<String>,
    pub file: String,
    pub rule: String,
    pub voters: usize,
    #[serde(rename = "ballot-id")]
    pub ballot_id: BallotId,
    pub mode: &'static str,
    pub expected: Option<Expectation>,
    pub actual: ResultResponse,
    pub matches: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use comsoc_io::scenario::VoterGroup;

    fn scenario(rule: &str, voters: Vec<VoterGroup>, expect: Expectation) -> Scenario {
        Scenario {
            name: None,
            rule: rule.into(),
            alts: 3,
            tie_break: vec![1, 2, 3],
            voters,
            expect: Some(expect),
        }
    }

    fn group(count: u32, prefs: &[u32], threshold: Option<i64>) -> VoterGroup {
        VoterGroup { count, prefs: prefs.to_vec(), threshold }
    }

    #[test]
    fn local_borda_follows_rank_scores() {
        let s = scenario(
            "borda",
            vec![group(1, &[1, 2, 3], None), group(1, &[1, 3, 2], None), group(1, &[2, 1, 3], None)],
            Expectation { winner: 1, ranking: Some(vec![1, 2, 3]) },
        );
        let (id, got) = run_local(&s).unwrap();
        assert_eq!(id.as_str(), "ballot1");
        assert_eq!(mismatch(s.expect.as_ref().unwrap(), &got), None);
    }

    #[test]
    fn local_approval_sends_thresholds() {
        let s = scenario(
            "approval",
            vec![group(1, &[1, 2, 3], Some(1)), group(1, &[2, 1, 3], Some(2))],
            Expectation { winner: 1, ranking: Some(vec![1, 2, 3]) },
        );
        let (_, got) = run_local(&s).unwrap();
        assert_eq!(mismatch(s.expect.as_ref().unwrap(), &got), None);
    }

    #[test]
    fn local_run_surfaces_store_errors() {
        let s = scenario("approval", vec![group(1, &[1, 2, 3], None)], Expectation { winner: 1, ranking: None });
        assert!(matches!(run_local(&s), Err(BallotError::MissingOrInvalidThreshold { .. })));
    }

    #[test]
    fn mismatch_reports_winner_then_ranking() {
        let got = ResultResponse { winner: Alternative::new(2), ranking: Some(alts(&[2, 1, 3])) };
        assert!(mismatch(&Expectation { winner: 1, ranking: None }, &got).unwrap().contains("winner"));
        assert!(mismatch(&Expectation { winner: 2, ranking: Some(vec![2, 3, 1]) }, &got)
            .unwrap()
            .contains("ranking"));
        assert_eq!(mismatch(&Expectation { winner: 2, ranking: None }, &got), None);
    }
}
