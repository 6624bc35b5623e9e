//! Ballot registry and the single lock around it.
//!
//! Every operation validates fully before touching state, so a rejected
//! request leaves the store exactly as it was.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use comsoc_core::{BallotId, Rule};
use comsoc_io::deadline::format_deadline;
use comsoc_io::wire::{NewBallotRequest, VoteRequest};
use tracing::{debug, info, warn};

use crate::ballot::Ballot;
use crate::dispatch::{compute_outcome, Outcome};
use crate::error::BallotError;
use crate::validate::{validate_new_ballot, validate_preference, validate_threshold};

#[derive(Debug)]
pub struct BallotStore {
    ballots: BTreeMap<BallotId, Ballot>,
    next_seq: u64,
}

impl Default for BallotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BallotStore {
    pub fn new() -> Self {
        Self { ballots: BTreeMap::new(), next_seq: 1 }
    }

    pub fn len(&self) -> usize {
        self.ballots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ballots.is_empty()
    }

    pub fn ballot(&self, id: &BallotId) -> Option<&Ballot> {
        self.ballots.get(id)
    }

    fn lookup(&self, id: &BallotId) -> Result<&Ballot, BallotError> {
        self.ballots.get(id).ok_or_else(|| BallotError::UnknownBallot(id.clone()))
    }

    /// Register a new ballot; ids are `ballot1`, `ballot2`, ... in creation order.
    pub fn create_ballot(&mut self, req: &NewBallotRequest) -> Result<BallotId, BallotError> {
        let v = validate_new_ballot(req)?;
        let id = BallotId::from_seq(self.next_seq);
        self.next_seq += 1;

        info!(
            ballot = %id,
            rule = %v.rule,
            alts = v.alts,
            voters = req.voter_ids.len(),
            deadline = %format_deadline(&v.deadline),
            "ballot created"
        );
        let ballot = Ballot::new(id.clone(), v.rule, v.deadline, req.voter_ids.clone(), v.alts, v.tie_break);
        self.ballots.insert(id.clone(), ballot);
        Ok(id)
    }

    /// Accept one vote. Checks run in this order: ballot exists, agent has not
    /// voted, agent is eligible, ballot is open, preference is well-formed,
    /// approval threshold is present and in range.
    pub fn cast_vote(&mut self, req: &VoteRequest, now: DateTime<Utc>) -> Result<(), BallotError> {
        let ballot = self.lookup(&req.ballot_id)?;
        let id = &ballot.id;

        if ballot.has_voted(&req.agent_id) {
            return Err(BallotError::AlreadyVoted { ballot: id.clone(), agent: req.agent_id.clone() });
        }
        if !ballot.is_eligible(&req.agent_id) {
            return Err(BallotError::NotEligible { ballot: id.clone(), agent: req.agent_id.clone() });
        }
        if ballot.is_closed(now) {
            return Err(BallotError::BallotClosed {
                ballot: id.clone(),
                deadline: format_deadline(&ballot.deadline),
            });
        }
        let pref = validate_preference(id, &req.prefs, ballot.alts)?;
        let threshold = match ballot.rule {
            Rule::Approval => Some(validate_threshold(id, req.options.as_deref(), ballot.alts)?),
            _ => None,
        };

        let ballot = self
            .ballots
            .get_mut(&req.ballot_id)
            .ok_or_else(|| BallotError::UnknownBallot(req.ballot_id.clone()))?;
        if !ballot.record_vote(req.agent_id.clone(), pref, threshold) {
            warn!(ballot = %ballot.id, agent = %req.agent_id, "no free voting slot");
            return Err(BallotError::NotEligible {
                ballot: ballot.id.clone(),
                agent: req.agent_id.clone(),
            });
        }
        debug!(ballot = %ballot.id, agent = %req.agent_id, votes = ballot.votes_cast(), "vote recorded");
        Ok(())
    }

    /// Result of a closed ballot.
    pub fn compute_result(&self, id: &BallotId, now: DateTime<Utc>) -> Result<Outcome, BallotError> {
        let ballot = self.lookup(id)?;
        if !ballot.is_closed(now) {
            return Err(BallotError::BallotStillOpen {
                ballot: id.clone(),
                deadline: format_deadline(&ballot.deadline),
            });
        }
        let outcome = compute_outcome(ballot).map_err(|source| {
            warn!(ballot = %id, error = %source, "result computation failed");
            BallotError::Compute { ballot: id.clone(), source }
        })?;
        if outcome.fallback {
            info!(ballot = %id, rule = %ballot.rule, "no votes cast; tie-break order stands as result");
        }
        Ok(outcome)
    }
}

/// The process-wide lock. Cloning shares the same store.
#[derive(Debug, Clone, Default)]
pub struct SharedStore {
    inner: Arc<Mutex<BallotStore>>,
}

impl SharedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Poisoning is ignored: state is only mutated after validation succeeds.
    pub fn lock(&self) -> MutexGuard<'_, BallotStore> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Run `f` with the lock held for its whole duration.
    pub fn with<R>(&self, f: impl FnOnce(&mut BallotStore) -> R) -> R {
        let mut guard = self.lock();
        f(&mut guard)
    }
}
