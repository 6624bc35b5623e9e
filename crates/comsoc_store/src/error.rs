//! Closed set of ballot failures. Messages carry the ballot id and the
//! offending value; they are sent verbatim as HTTP error bodies.

use comsoc_algo::AlgoError;
use comsoc_core::{AgentId, BallotId};
use comsoc_io::IoError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BallotError {
    #[error("deadline {0:?} is not an RFC3339 timestamp")]
    BadDeadline(String),

    #[error("rule {0:?} is not implemented")]
    UnknownRule(String),

    #[error("number of alternatives {0} should be >= 1")]
    BadAltCount(i64),

    #[error("tie-break {tie_break:?} is not a permutation of 1..={alts}")]
    BadTieBreak { tie_break: Vec<i64>, alts: i64 },

    #[error("ballot {0} does not exist")]
    UnknownBallot(BallotId),

    #[error("agent {agent} has already voted for ballot {ballot}")]
    AlreadyVoted { ballot: BallotId, agent: AgentId },

    #[error("agent {agent} is not allowed to vote for ballot {ballot}")]
    NotEligible { ballot: BallotId, agent: AgentId },

    #[error("ballot {ballot} closed at {deadline}")]
    BallotClosed { ballot: BallotId, deadline: String },

    #[error("prefs {prefs:?} for ballot {ballot} is not a permutation of 1..={alts}")]
    MalformedPreference { ballot: BallotId, prefs: Vec<i64>, alts: usize },

    #[error("approval ballot {ballot} needs options[0] in 0..={alts}, got {options:?}")]
    MissingOrInvalidThreshold { ballot: BallotId, options: Option<Vec<i64>>, alts: usize },

    #[error("ballot {ballot} is still open until {deadline}")]
    BallotStillOpen { ballot: BallotId, deadline: String },

    #[error("malformed request body: {0}")]
    Decode(String),

    #[error("can't compute result for ballot {ballot}: {source}")]
    Compute { ballot: BallotId, source: AlgoError },
}

/// Flat, copyable discriminant used for status mapping and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    BadDeadline,
    UnknownRule,
    BadAltCount,
    BadTieBreak,
    UnknownBallot,
    AlreadyVoted,
    NotEligible,
    BallotClosed,
    MalformedPreference,
    MissingOrInvalidThreshold,
    BallotStillOpen,
    Decode,
    Compute,
}

impl BallotError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BallotError::BadDeadline(_) => ErrorKind::BadDeadline,
            BallotError::UnknownRule(_) => ErrorKind::UnknownRule,
            BallotError::BadAltCount(_) => ErrorKind::BadAltCount,
            BallotError::BadTieBreak { .. } => ErrorKind::BadTieBreak,
            BallotError::UnknownBallot(_) => ErrorKind::UnknownBallot,
            BallotError::AlreadyVoted { .. } => ErrorKind::AlreadyVoted,
            BallotError::NotEligible { .. } => ErrorKind::NotEligible,
            BallotError::BallotClosed { .. } => ErrorKind::BallotClosed,
            BallotError::MalformedPreference { .. } => ErrorKind::MalformedPreference,
            BallotError::MissingOrInvalidThreshold { .. } => ErrorKind::MissingOrInvalidThreshold,
            BallotError::BallotStillOpen { .. } => ErrorKind::BallotStillOpen,
            BallotError::Decode(_) => ErrorKind::Decode,
            BallotError::Compute { .. } => ErrorKind::Compute,
        }
    }
}

impl From<IoError> for BallotError {
    fn from(e: IoError) -> Self {
        BallotError::Decode(e.to_string())
    }
}
