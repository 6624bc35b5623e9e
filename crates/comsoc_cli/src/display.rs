//! One-line result rendering for stdout.

use std::fmt::Write as _;

use comsoc_core::{Alternative, BallotId, Rule};
use comsoc_io::wire::ResultResponse;

fn join(alts: &[Alternative]) -> String {
    let parts: Vec<String> = alts.iter().map(ToString::to_string).collect();
    format!("[{}]", parts.join(", "))
}

/// `ballot2  rule=borda  voters=5  winner=3  ranking=[3, 1, 2]`
pub fn result_line(ballot_id: &BallotId, rule: Rule, voters: usize, result: &ResultResponse) -> String {
    let mut line = format!("{ballot_id}  rule={rule}  voters={voters}  ");
    if result.has_winner() {
        let _ = write!(line, "winner={}", result.winner);
    } else {
        line.push_str("winner=none");
    }
    if let Some(ranking) = &result.ranking {
        let _ = write!(line, "  ranking={}", join(ranking));
    }
    line
}
