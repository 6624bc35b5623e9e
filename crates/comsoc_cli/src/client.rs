//! Blocking HTTP client for the three ballot endpoints.

use std::thread;
use std::time::Duration;

use chrono::{DateTime, Utc};
use comsoc_core::BallotId;
use comsoc_io::wire::{
    endpoints, NewBallotRequest, NewBallotResponse, ResultRequest, ResultResponse, VoteRequest,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
/// Slack after the deadline before asking for a result.
const DEADLINE_GRACE: Duration = Duration::from_millis(100);
const STILL_OPEN_RETRIES: u32 = 20;
const STILL_OPEN_PAUSE: Duration = Duration::from_millis(100);

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{endpoint} answered {code}: {body}")]
    Status { endpoint: &'static str, code: u16, body: String },
}

impl ClientError {
    pub fn code(&self) -> Option<u16> {
        match self {
            ClientError::Status { code, .. } => Some(*code),
            ClientError::Transport(_) => None,
        }
    }

    /// 425, or 503 when the server is configured that way.
    fn is_still_open(&self) -> bool {
        matches!(self.code(), Some(425 | 503))
    }
}

#[derive(Debug, Clone)]
pub struct RestClient {
    base: String,
    http: reqwest::blocking::Client,
}

impl RestClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let http = reqwest::blocking::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { base: base_url.trim_end_matches('/').to_string(), http })
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    fn post<B: Serialize, R: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        body: &B,
    ) -> Result<R, ClientError> {
        let resp = self.http.post(format!("{}{endpoint}", self.base)).json(body).send()?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(ClientError::Status { endpoint, code: status.as_u16(), body });
        }
        Ok(resp.json::<R>()?)
    }

    pub fn new_ballot(&self, req: &NewBallotRequest) -> Result<BallotId, ClientError> {
        let created: NewBallotResponse = self.post(endpoints::NEW_BALLOT, req)?;
        Ok(created.ballot_id)
    }

    /// The server echoes the accepted vote; the echo is not checked.
    pub fn vote(&self, req: &VoteRequest) -> Result<(), ClientError> {
        let _: serde_json::Value = self.post(endpoints::VOTE, req)?;
        Ok(())
    }

    pub fn result(&self, ballot_id: &BallotId) -> Result<ResultResponse, ClientError> {
        self.post(endpoints::RESULT, &ResultRequest { ballot_id: ballot_id.clone() })
    }

    /// Sleep past `deadline`, then fetch the result, retrying briefly while
    /// the server still reports the ballot open.
    pub fn result_after(
        &self,
        ballot_id: &BallotId,
        deadline: DateTime<Utc>,
    ) -> Result<ResultResponse, ClientError> {
        let remaining = (deadline - Utc::now()).to_std().unwrap_or_default();
        thread::sleep(remaining + DEADLINE_GRACE);
        let mut attempt = 0;
        loop {
            match self.result(ballot_id) {
                Err(e) if e.is_still_open() && attempt < STILL_OPEN_RETRIES => {
                    attempt += 1;
                    debug!(ballot = %ballot_id, attempt, "ballot still open, retrying");
                    thread::sleep(STILL_OPEN_PAUSE);
                }
                other => return other,
            }
        }
    }
}
