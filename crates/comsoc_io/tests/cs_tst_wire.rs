//! Wire contract and file round-trips for comsoc_io.

use std::fs;

use assert_json_diff::assert_json_eq;
use comsoc_core::{AgentId, Alternative, BallotId};
use comsoc_io::report::{read_json, write_json_atomic};
use comsoc_io::scenario::{load_scenario, Scenario};
use comsoc_io::wire::{encode, NewBallotResponse, ResultResponse, VoteRequest};
use comsoc_io::IoError;
use serde_json::{json, Value};

fn to_value<T: serde::Serialize>(v: &T) -> Value {
    serde_json::from_slice(&encode(v).unwrap()).unwrap()
}

#[test]
fn result_with_ranking() {
    let resp = ResultResponse {
        winner: Alternative::new(2),
        ranking: Some(vec![Alternative::new(2), Alternative::new(1), Alternative::new(3)]),
    };
    assert_json_eq!(to_value(&resp), json!({"winner": 2, "ranking": [2, 1, 3]}));
}

#[test]
fn result_without_ranking_omits_the_field() {
    let resp = ResultResponse { winner: ResultResponse::NO_WINNER, ranking: None };
    assert!(!resp.has_winner());
    assert_json_eq!(to_value(&resp), json!({"winner": 0}));
}

#[test]
fn ballot_id_field_name() {
    let resp = NewBallotResponse { ballot_id: BallotId::from_seq(1) };
    assert_json_eq!(to_value(&resp), json!({"ballot-id": "ballot1"}));
}

#[test]
fn vote_echo_keeps_options() {
    let vote = VoteRequest {
        agent_id: AgentId::from("ag_vote_1"),
        ballot_id: BallotId::from_seq(3),
        prefs: vec![3, 1, 2],
        options: Some(vec![2]),
    };
    assert_json_eq!(
        to_value(&vote),
        json!({"agent-id": "ag_vote_1", "ballot-id": "ballot3", "prefs": [3, 1, 2], "options": [2]})
    );
    let plain = VoteRequest { options: None, ..vote };
    assert_json_eq!(
        to_value(&plain),
        json!({"agent-id": "ag_vote_1", "ballot-id": "ballot3", "prefs": [3, 1, 2]})
    );
}

#[test]
fn scenario_file_loads_and_validates() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stv.json");
    fs::write(
        &path,
        r#"{
            "rule": "stv",
            "alts": 3,
            "tie-break": [1, 2, 3],
            "voters": [
                {"count": 2, "prefs": [1, 2, 3]},
                {"prefs": [2, 3, 1]}
            ],
            "expect": {"winner": 1, "ranking": [1, 2, 3]}
        }"#,
    )
    .unwrap();
    let s = load_scenario(&path).unwrap();
    assert_eq!(s.voter_count(), 3);
    assert_eq!(s.expect.as_ref().map(|e| e.winner), Some(1));
}

#[test]
fn scenario_errors_are_typed() {
    let dir = tempfile::tempdir().unwrap();

    let missing = dir.path().join("nope.json");
    assert!(matches!(load_scenario(&missing), Err(IoError::Path(_))));

    let broken = dir.path().join("broken.json");
    fs::write(&broken, "{ not json").unwrap();
    assert!(matches!(load_scenario(&broken), Err(IoError::Json { .. })));

    let bad = dir.path().join("bad.json");
    fs::write(&bad, r#"{"rule":"borda","alts":3,"voters":[{"prefs":[1,2,3]}]}"#).unwrap();
    assert!(matches!(load_scenario(&bad), Err(IoError::Scenario(_))));
}

#[test]
fn report_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out").join("report.json");
    let s = Scenario {
        name: Some("demo".into()),
        rule: "majority".into(),
        alts: 2,
        tie_break: vec![2, 1],
        voters: vec![],
        expect: None,
    };
    write_json_atomic(&path, &s).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.ends_with('\n'));
    let back: Scenario = read_json(&path).unwrap();
    assert_eq!(back, s);
    assert_eq!(fs::read_dir(path.parent().unwrap()).unwrap().count(), 1);
}
