//! One election instance and its accumulated votes.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use comsoc_core::{AgentId, BallotId, Preference, Profile, Rule, StrictOrder};

#[derive(Debug, Clone)]
pub struct Ballot {
    pub id: BallotId,
    pub rule: Rule,
    pub deadline: DateTime<Utc>,
    pub voter_ids: Vec<AgentId>,
    pub alts: usize,
    /// Always present for rules that require one; for Condorcet only when
    /// the supplied order happened to be a valid permutation.
    pub tie_break: Option<StrictOrder>,
    /// Fixed size (one slot per eligible voter), filled left to right.
    have_voted: Vec<Option<AgentId>>,
    profile: Profile,
    /// Approval only.
    thresholds: BTreeMap<AgentId, i64>,
}

impl Ballot {
    pub(crate) fn new(
        id: BallotId,
        rule: Rule,
        deadline: DateTime<Utc>,
        voter_ids: Vec<AgentId>,
        alts: usize,
        tie_break: Option<StrictOrder>,
    ) -> Self {
        let slots = voter_ids.len();
        Self {
            id,
            rule,
            deadline,
            voter_ids,
            alts,
            tie_break,
            have_voted: vec![None; slots],
            profile: Profile::default(),
            thresholds: BTreeMap::new(),
        }
    }

    /// Closed once the deadline is reached.
    #[inline]
    pub fn is_closed(&self, now: DateTime<Utc>) -> bool {
        now >= self.deadline
    }

    pub fn has_voted(&self, agent: &AgentId) -> bool {
        self.have_voted.iter().flatten().any(|a| a == agent)
    }

    pub fn is_eligible(&self, agent: &AgentId) -> bool {
        self.voter_ids.contains(agent)
    }

    /// Agents in the order their votes were accepted.
    pub fn voters_in_order(&self) -> impl Iterator<Item = &AgentId> {
        self.have_voted.iter().map_while(Option::as_ref)
    }

    pub fn votes_cast(&self) -> usize {
        self.profile.len()
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn threshold_of(&self, agent: &AgentId) -> Option<i64> {
        self.thresholds.get(agent).copied()
    }

    /// Thresholds aligned with profile rows.
    pub fn thresholds_in_vote_order(&self) -> Vec<i64> {
        self.voters_in_order()
            .map(|a| self.threshold_of(a).unwrap_or(0))
            .collect()
    }

    /// Append an already validated vote. Returns `false` (and changes nothing)
    /// when every slot is taken.
    pub(crate) fn record_vote(
        &mut self,
        agent: AgentId,
        pref: Preference,
        threshold: Option<i64>,
    ) -> bool {
        let Some(slot) = self.have_voted.iter_mut().find(|s| s.is_none()) else {
            return false;
        };
        if let Some(t) = threshold {
            self.thresholds.insert(agent.clone(), t);
        }
        *slot = Some(agent);
        self.profile.push(pref);
        true
    }
}
