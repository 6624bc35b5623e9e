//! Ballot and voting agents, one thread each, sequenced by channels:
//!
//! 1. every ballot agent creates its ballot and publishes the id;
//! 2. once all ids are in, voting agents vote on every ballot and report back;
//! 3. when all voters are done, ballot agents wait out the deadline and fetch
//!    their results.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use chrono::{DateTime, Utc};
use comsoc_core::{BallotId, Rule};
use comsoc_io::deadline::format_deadline;
use comsoc_io::wire::{NewBallotRequest, ResultResponse};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::client::{ClientError, RestClient};
use crate::demo::DemoPlan;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("agent thread: {0}")]
    Thread(String),
    #[error("launcher stopped before the votes were in")]
    Aborted,
}

#[derive(Debug, Clone)]
pub struct BallotReport {
    pub ballot_id: BallotId,
    pub rule: Rule,
    /// Votes the server accepted.
    pub votes: usize,
    pub result: ResultResponse,
}

type Created = (usize, Result<BallotId, ClientError>);
type Voted = (usize, Result<Vec<bool>, ClientError>);

fn ballot_agent(
    client: RestClient,
    index: usize,
    req: NewBallotRequest,
    deadline: DateTime<Utc>,
    created: Sender<Created>,
    go: Receiver<()>,
) -> Result<ResultResponse, AgentError> {
    let ballot_id = match client.new_ballot(&req) {
        Ok(id) => id,
        Err(e) => {
            let _ = created.send((index, Err(e)));
            return Err(AgentError::Aborted);
        }
    };
    info!(ballot = %ballot_id, rule = %req.rule, "ballot created");
    let _ = created.send((index, Ok(ballot_id.clone())));
    drop(created);

    go.recv().map_err(|_| AgentError::Aborted)?;
    Ok(client.result_after(&ballot_id, deadline)?)
}

/// Rejected votes are logged and skipped; transport failures end the agent.
fn voting_agent(
    client: RestClient,
    plan: Arc<DemoPlan>,
    voter: usize,
    ballots: Arc<Vec<BallotId>>,
) -> Result<Vec<bool>, ClientError> {
    let mut accepted = Vec::with_capacity(ballots.len());
    for (index, ballot_id) in ballots.iter().enumerate() {
        let req = plan.vote_request(voter, index, ballot_id);
        match client.vote(&req) {
            Ok(()) => {
                debug!(agent = %req.agent_id, ballot = %ballot_id, "vote accepted");
                accepted.push(true);
            }
            Err(e @ ClientError::Status { .. }) => {
                warn!(agent = %req.agent_id, ballot = %ballot_id, error = %e, "vote rejected");
                accepted.push(false);
            }
            Err(e) => return Err(e),
        }
    }
    Ok(accepted)
}

fn join<T>(handle: JoinHandle<T>, what: &str) -> Result<T, AgentError> {
    handle.join().map_err(|_| AgentError::Thread(format!("{what} panicked")))
}

/// Run the whole fleet described by `plan`; ballots close `voting` after launch.
pub fn run_fleet(
    client: &RestClient,
    plan: DemoPlan,
    voting: Duration,
) -> Result<Vec<BallotReport>, AgentError> {
    let plan = Arc::new(plan);
    let deadline = Utc::now() + chrono::Duration::milliseconds(voting.as_millis() as i64);
    let deadline_str = format_deadline(&deadline);

    // Creation.
    let (created_tx, created_rx) = mpsc::channel::<Created>();
    let mut ballot_agents = Vec::with_capacity(plan.ballots.len());
    for index in 0..plan.ballots.len() {
        let (go_tx, go_rx) = mpsc::channel::<()>();
        let req = plan.new_ballot_request(index, &deadline_str);
        let (client, created_tx) = (client.clone(), created_tx.clone());
        let handle = thread::Builder::new()
            .name(format!("ballot-agent-{index}"))
            .spawn(move || ballot_agent(client, index, req, deadline, created_tx, go_rx))
            .map_err(|e| AgentError::Thread(e.to_string()))?;
        ballot_agents.push((go_tx, handle));
    }
    drop(created_tx);

    let mut ids: Vec<Option<BallotId>> = vec![None; plan.ballots.len()];
    for (index, created) in created_rx {
        ids[index] = Some(created?);
    }
    let ballots: Arc<Vec<BallotId>> = Arc::new(
        ids.into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| AgentError::Thread("a ballot agent exited without reporting".into()))?,
    );

    // Voting.
    let (voted_tx, voted_rx) = mpsc::channel::<Voted>();
    let mut voters = Vec::with_capacity(plan.voters.len());
    for voter in 0..plan.voters.len() {
        let (client, plan, ballots, voted_tx) = (client.clone(), plan.clone(), ballots.clone(), voted_tx.clone());
        let handle = thread::Builder::new()
            .name(format!("voting-agent-{voter}"))
            .spawn(move || {
                let outcome = voting_agent(client, plan, voter, ballots);
                let _ = voted_tx.send((voter, outcome));
            })
            .map_err(|e| AgentError::Thread(e.to_string()))?;
        voters.push(handle);
    }
    drop(voted_tx);

    let mut votes = vec![0usize; ballots.len()];
    for (voter, outcome) in voted_rx {
        for (index, ok) in outcome?.into_iter().enumerate() {
            votes[index] += usize::from(ok);
        }
        debug!(voter, "voting agent done");
    }
    for handle in voters {
        join(handle, "voting agent")?;
    }
    info!(ballots = ballots.len(), voters = plan.voters.len(), "all votes submitted");

    // Results.
    for (go, _) in &ballot_agents {
        let _ = go.send(());
    }
    let mut reports = Vec::with_capacity(ballots.len());
    for (index, (_, handle)) in ballot_agents.into_iter().enumerate() {
        let result = join(handle, "ballot agent")??;
        reports.push(BallotReport {
            ballot_id: ballots[index].clone(),
            rule: plan.ballots[index].rule,
            votes: votes[index],
            result,
        });
    }
    Ok(reports)
}
