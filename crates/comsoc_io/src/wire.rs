//! JSON bodies exchanged with `/new_ballot`, `/vote` and `/result`.
//!
//! Numeric fields that the ballot store range-checks (`#alts`, `tie-break`,
//! `prefs`, `options`) are decoded as signed integers so that a negative or
//! zero value reaches validation and fails with its own error kind instead of
//! a generic decode error.

use comsoc_core::{AgentId, Alternative, BallotId};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::IoResult;

/// Request paths. Every endpoint takes a JSON body over `POST`.
pub mod endpoints {
    pub const NEW_BALLOT: &str = "/new_ballot";
    pub const VOTE: &str = "/vote";
    pub const RESULT: &str = "/result";
}

// ----------------------------- Requests -----------------------------

/// `POST /new_ballot`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBallotRequest {
    pub rule: String,
    /// RFC3339 timestamp.
    pub deadline: String,
    #[serde(rename = "voter-ids")]
    pub voter_ids: Vec<AgentId>,
    #[serde(rename = "#alts")]
    pub alts: i64,
    /// Optional for `condorcet` only.
    #[serde(rename = "tie-break", default)]
    pub tie_break: Vec<i64>,
}

/// `POST /vote`. Echoed back as the acknowledgment body on success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRequest {
    #[serde(rename = "agent-id")]
    pub agent_id: AgentId,
    #[serde(rename = "ballot-id")]
    pub ballot_id: BallotId,
    pub prefs: Vec<i64>,
    /// `options[0]` is the approval threshold.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<i64>>,
}

/// `POST /result`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRequest {
    #[serde(rename = "ballot-id")]
    pub ballot_id: BallotId,
}

// ----------------------------- Responses -----------------------------

/// `201 Created` body of `/new_ballot`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBallotResponse {
    #[serde(rename = "ballot-id")]
    pub ballot_id: BallotId,
}

/// `200 OK` body of `/result`. `winner` is `0` when no alternative wins
/// (Condorcet without a Condorcet winner); `ranking` is omitted for rules that
/// define none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultResponse {
    pub winner: Alternative,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ranking: Option<Vec<Alternative>>,
}

impl ResultResponse {
    pub const NO_WINNER: Alternative = Alternative::new(0);

    pub fn has_winner(&self) -> bool {
        self.winner != Self::NO_WINNER
    }
}

// ----------------------------- Codec -----------------------------

pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> IoResult<T> {
    Ok(serde_json::from_slice(bytes)?)
}

pub fn encode<T: Serialize>(value: &T) -> IoResult<Vec<u8>> {
    Ok(serde_json::to_vec(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IoError;

    #[test]
    fn new_ballot_uses_hyphenated_names() {
        let req: NewBallotRequest = decode(
            br##"{"rule":"borda","deadline":"2026-01-01T00:00:00Z","voter-ids":["ag1","ag2"],"#alts":3,"tie-break":[2,1,3]}"##,
        )
        .unwrap();
        assert_eq!(req.rule, "borda");
        assert_eq!(req.voter_ids.len(), 2);
        assert_eq!(req.alts, 3);
        assert_eq!(req.tie_break, vec![2, 1, 3]);
    }

    #[test]
    fn tie_break_may_be_absent() {
        let req: NewBallotRequest = decode(
            br##"{"rule":"condorcet","deadline":"2026-01-01T00:00:00Z","voter-ids":[],"#alts":3}"##,
        )
        .unwrap();
        assert!(req.tie_break.is_empty());
    }

    #[test]
    fn malformed_bodies_are_json_errors() {
        assert!(matches!(decode::<ResultRequest>(b"{"), Err(IoError::Json { .. })));
        assert!(matches!(decode::<ResultRequest>(br#"{"ballot":"x"}"#), Err(IoError::Json { .. })));
        assert!(matches!(
            decode::<VoteRequest>(br#"{"agent-id":"a","ballot-id":"ballot1","prefs":"1,2"}"#),
            Err(IoError::Json { .. })
        ));
    }
}
