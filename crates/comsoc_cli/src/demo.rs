//! Seeded plan for a generated voter fleet.
//!
//! Everything random is drawn up front from one ChaCha20 stream, so two runs
//! with the same flags submit the same ballots and votes.

use comsoc_core::{AgentId, Alternative, BallotId, Preference, ProfileRng, Rule};
use comsoc_io::wire::{NewBallotRequest, VoteRequest};

use crate::args::DemoArgs;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BallotPlan {
    pub rule: Rule,
    pub alts: usize,
    pub tie_break: Preference,
}

/// One voter's ballots, in ballot order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoterPlan {
    pub agent_id: AgentId,
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub prefs: Preference,
    /// Drawn for every ballot; sent only where the rule reads it.
    pub threshold: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoPlan {
    pub ballots: Vec<BallotPlan>,
    pub voters: Vec<VoterPlan>,
}

pub fn plan(args: &DemoArgs) -> DemoPlan {
    let mut rng = ProfileRng::from_seed_u64(args.seed);
    let alts = args.alts as usize;

    let ballots: Vec<BallotPlan> = (0..args.ballots as usize)
        .map(|i| BallotPlan {
            rule: args.rule.unwrap_or(Rule::ALL[i % Rule::ALL.len()]),
            alts,
            tie_break: rng.random_preference(alts),
        })
        .collect();

    let voters = (1..=args.agents)
        .map(|n| VoterPlan {
            agent_id: AgentId::from(format!("ag_vote_{n}").as_str()),
            choices: ballots
                .iter()
                .map(|b| Choice {
                    prefs: rng.random_preference(b.alts),
                    threshold: rng.random_threshold(b.alts),
                })
                .collect(),
        })
        .collect();

    DemoPlan { ballots, voters }
}

fn wire(prefs: &[Alternative]) -> Vec<i64> {
    prefs.iter().map(|a| i64::from(a.get())).collect()
}

impl DemoPlan {
    pub fn voter_ids(&self) -> Vec<AgentId> {
        self.voters.iter().map(|v| v.agent_id.clone()).collect()
    }

    pub fn new_ballot_request(&self, index: usize, deadline: &str) -> NewBallotRequest {
        let b = &self.ballots[index];
        NewBallotRequest {
            rule: b.rule.as_str().to_string(),
            deadline: deadline.to_string(),
            voter_ids: self.voter_ids(),
            alts: b.alts as i64,
            tie_break: wire(&b.tie_break),
        }
    }

    pub fn vote_request(&self, voter: usize, ballot: usize, ballot_id: &BallotId) -> VoteRequest {
        let v = &self.voters[voter];
        let choice = &v.choices[ballot];
        VoteRequest {
            agent_id: v.agent_id.clone(),
            ballot_id: ballot_id.clone(),
            prefs: wire(&choice.prefs),
            options: self.ballots[ballot].rule.uses_threshold().then(|| vec![choice.threshold]),
        }
    }
}
