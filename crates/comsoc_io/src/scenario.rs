//! Scenario files: a ballot definition plus voter groups with multiplicity.
//!
//! ```json
//! {
//!   "name": "chap2-condorcet",
//!   "rule": "condorcet",
//!   "alts": 3,
//!   "tie-break": [1, 2, 3],
//!   "voters": [
//!     { "count": 10, "prefs": [1, 2, 3] },
//!     { "count": 6,  "prefs": [2, 3, 1] }
//!   ],
//!   "expect": { "winner": 2 }
//! }
//! ```
//!
//! Voters get agent ids `ag_vote_<n>`, `n` counting from 1 across all groups
//! in file order.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use comsoc_core::{is_permutation_of_range, AgentId, Alternative, Rule};
use serde::{Deserialize, Serialize};

use crate::{IoError, IoResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoterGroup {
    #[serde(default = "one")]
    pub count: u32,
    pub prefs: Vec<u32>,
    /// Approval threshold for every voter of the group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<i64>,
}

fn one() -> u32 { 1 }

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expectation {
    pub winner: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ranking: Option<Vec<u32>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: Option<String>,
    pub rule: String,
    pub alts: u32,
    #[serde(rename = "tie-break", default)]
    pub tie_break: Vec<u32>,
    pub voters: Vec<VoterGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expect: Option<Expectation>,
}

/// One voter after expanding group multiplicities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioVote {
    pub agent_id: AgentId,
    pub prefs: Vec<u32>,
    pub threshold: Option<i64>,
}

fn to_alts(v: &[u32]) -> Vec<Alternative> {
    v.iter().copied().map(Alternative::new).collect()
}

impl Scenario {
    pub fn parsed_rule(&self) -> IoResult<Rule> {
        Rule::from_str(&self.rule)
            .map_err(|_| IoError::Scenario(format!("rule {:?} is not implemented", self.rule)))
    }

    pub fn voter_count(&self) -> usize {
        self.voters.iter().map(|g| g.count as usize).sum()
    }

    /// Check the scenario the same way the ballot store would check the
    /// corresponding requests, so a valid scenario never fails mid-run.
    pub fn validate(&self) -> IoResult<()> {
        let rule = self.parsed_rule()?;
        let n = self.alts as usize;
        if n < 1 {
            return Err(IoError::Scenario("alts must be >= 1".into()));
        }
        if rule.requires_tie_break() && !is_permutation_of_range(&to_alts(&self.tie_break), n) {
            return Err(IoError::Scenario(format!(
                "tie-break {:?} is not a permutation of 1..={n}",
                self.tie_break
            )));
        }
        for (i, g) in self.voters.iter().enumerate() {
            if g.count == 0 {
                return Err(IoError::Scenario(format!("voter group {i} has count 0")));
            }
            if !is_permutation_of_range(&to_alts(&g.prefs), n) {
                return Err(IoError::Scenario(format!(
                    "voter group {i}: prefs {:?} is not a permutation of 1..={n}",
                    g.prefs
                )));
            }
            if rule.uses_threshold() {
                match g.threshold {
                    Some(t) if (0..=n as i64).contains(&t) => {}
                    Some(t) => {
                        return Err(IoError::Scenario(format!(
                            "voter group {i}: threshold {t} outside 0..={n}"
                        )))
                    }
                    None => {
                        return Err(IoError::Scenario(format!(
                            "voter group {i}: approval needs a threshold"
                        )))
                    }
                }
            }
        }
        if let Some(exp) = &self.expect {
            if exp.winner as usize > n {
                return Err(IoError::Scenario(format!("expected winner {} outside 0..={n}", exp.winner)));
            }
        }
        Ok(())
    }

    pub fn expand(&self) -> Vec<ScenarioVote> {
        let mut out = Vec::with_capacity(self.voter_count());
        for g in &self.voters {
            for _ in 0..g.count {
                out.push(ScenarioVote {
                    agent_id: AgentId::from(format!("ag_vote_{}", out.len() + 1).as_str()),
                    prefs: g.prefs.clone(),
                    threshold: g.threshold,
                });
            }
        }
        out
    }

    /// Voter ids in expansion order.
    pub fn voter_ids(&self) -> Vec<AgentId> {
        self.expand().into_iter().map(|v| v.agent_id).collect()
    }
}

/// Read, decode and validate a scenario file.
pub fn load_scenario(path: &Path) -> IoResult<Scenario> {
    let bytes = fs::read(path)
        .map_err(|e| IoError::Path(format!("{}: {e}", path.display())))?;
    let scenario: Scenario = serde_json::from_slice(&bytes)?;
    scenario.validate()?;
    Ok(scenario)
}
