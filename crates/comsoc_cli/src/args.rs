// crates/comsoc_cli/src/args.rs
//
// Command-line surface of the `comsoc` binary.
//
// - `serve`: run the HTTP ballot server (flags fall back to COMSOC_* env vars)
// - `demo`: generated fleet of ballot and voting agents against a server
// - `scenario`: replay a fixed scenario file, remotely or in-process

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use comsoc_core::Rule;
use comsoc_server::{ServerConfig, StillOpenStatus};

#[derive(Debug, Parser, Clone)]
#[command(
    name = "comsoc",
    disable_help_subcommand = true,
    about = "Ballot server, voter fleet and scenario runner"
)]
pub struct Cli {
    /// Debug-level logs (RUST_LOG still wins when set).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the HTTP ballot server until interrupted.
    Serve(ServeArgs),
    /// Create ballots and let a generated fleet of voters fill them.
    Demo(DemoArgs),
    /// Replay a fixed scenario file and compare with its expectation.
    Scenario(ScenarioArgs),
}

#[derive(Debug, clap::Args, Clone)]
pub struct ServeArgs {
    #[arg(long, env = "COMSOC_HOST", default_value = "127.0.0.1")]
    pub host: String,
    #[arg(long, env = "COMSOC_PORT", default_value_t = 8080)]
    pub port: u16,
    /// Worker threads (default: one per CPU).
    #[arg(long, env = "COMSOC_WORKERS")]
    pub workers: Option<usize>,
    /// Status for a result asked before the deadline: too-early (425) or unavailable (503).
    #[arg(long, env = "COMSOC_STILL_OPEN_STATUS", default_value = "too-early")]
    pub still_open_status: StillOpenStatus,
}

impl ServeArgs {
    pub fn to_config(&self) -> ServerConfig {
        ServerConfig {
            host: self.host.clone(),
            port: self.port,
            workers: self.workers,
            still_open_status: self.still_open_status,
        }
    }
}

/// Where the client side sends its requests.
#[derive(Debug, clap::Args, Clone)]
pub struct Target {
    /// Base URL of a running server.
    #[arg(long, env = "COMSOC_URL", default_value = "http://127.0.0.1:8080", value_parser = parse_base_url)]
    pub url: String,
    /// Start a server on an ephemeral local port for this run and ignore --url.
    #[arg(long)]
    pub spawn_server: bool,
}

#[derive(Debug, clap::Args, Clone)]
pub struct DemoArgs {
    /// Number of voting agents.
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..))]
    pub agents: u32,
    /// Number of ballots.
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..))]
    pub ballots: u32,
    /// Alternatives per ballot.
    #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u32).range(1..))]
    pub alts: u32,
    /// Rule for every ballot; cycles through all rules when absent.
    #[arg(long)]
    pub rule: Option<Rule>,
    /// Seed for preferences, thresholds and tie-breaks. Decimal u64 or 0x-hex.
    #[arg(long, default_value = "42", value_parser = parse_seed)]
    pub seed: u64,
    /// Seconds between ballot creation and deadline.
    #[arg(long, default_value_t = 2)]
    pub voting_secs: u64,

    #[command(flatten)]
    pub target: Target,
}

#[derive(Debug, clap::Args, Clone)]
pub struct ScenarioArgs {
    /// Scenario JSON file.
    #[arg(value_parser = parse_local_path)]
    pub file: PathBuf,
    /// Load and check the file only.
    #[arg(long, conflicts_with = "local")]
    pub validate_only: bool,
    /// Run against an in-process ballot store with a simulated clock.
    #[arg(long)]
    pub local: bool,
    /// Write a JSON report of the run to this path.
    #[arg(long, value_parser = parse_local_path)]
    pub out: Option<PathBuf>,
    /// Seconds between ballot creation and deadline (remote runs).
    #[arg(long, default_value_t = 1)]
    pub voting_secs: u64,

    #[command(flatten)]
    pub target: Target,
}

/// Seed parser: decimal u64 or 0x-hex (1..=16 nybbles).
pub fn parse_seed(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty seed".into());
    }
    if let Some(rest) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        if rest.is_empty() || rest.len() > 16 || !rest.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err("hex seed must be 1..16 hex digits".into());
        }
        u64::from_str_radix(rest, 16).map_err(|_| "hex seed out of range".into())
    } else {
        s.parse::<u64>().map_err(|_| "decimal seed must be a valid u64".into())
    }
}

/// `http://host[:port]`, trailing slashes dropped.
pub fn parse_base_url(s: &str) -> Result<String, String> {
    let s = s.trim().trim_end_matches('/');
    match s.strip_prefix("http://") {
        Some(rest) if !rest.is_empty() && !rest.contains('/') => Ok(s.to_string()),
        Some(_) => Err(format!("expected http://host[:port], got {s:?}")),
        None => Err(format!("only plain http:// servers are supported, got {s:?}")),
    }
}

#[inline]
fn has_scheme(s: &str) -> bool {
    let lower = s.trim().to_ascii_lowercase();
    lower.contains("://") || lower.starts_with("http:") || lower.starts_with("https:") || lower.starts_with("file:")
}

/// Scenario and report paths are local files.
pub fn parse_local_path(s: &str) -> Result<PathBuf, String> {
    if s.trim().is_empty() {
        return Err("empty path".into());
    }
    if has_scheme(s) {
        return Err(format!("path must be local file (no scheme): {s}"));
    }
    Ok(Path::new(s).to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn seeds_accept_decimal_and_hex() {
        assert_eq!(parse_seed("42"), Ok(42));
        assert_eq!(parse_seed("0xff"), Ok(255));
        assert_eq!(parse_seed("0XFFFFFFFFFFFFFFFF"), Ok(u64::MAX));
        assert!(parse_seed("").is_err());
        assert!(parse_seed("0x").is_err());
        assert!(parse_seed("0x1ffffffffffffffff").is_err());
        assert!(parse_seed("-1").is_err());
    }

    #[test]
    fn base_urls_are_plain_http() {
        assert_eq!(parse_base_url("http://127.0.0.1:8080/").as_deref(), Ok("http://127.0.0.1:8080"));
        assert!(parse_base_url("https://example.org").is_err());
        assert!(parse_base_url("http://").is_err());
        assert!(parse_base_url("http://host/path").is_err());
    }

    #[test]
    fn paths_reject_schemes() {
        assert!(parse_local_path("scenarios/borda.json").is_ok());
        assert!(parse_local_path("file:///tmp/x.json").is_err());
        assert!(parse_local_path(" ").is_err());
    }

    #[test]
    fn demo_flags_parse() {
        let cli = Cli::try_parse_from([
            "comsoc", "demo", "--agents", "5", "--rule", "stv", "--seed", "0x10", "--spawn-server",
        ])
        .unwrap();
        let Command::Demo(demo) = cli.command else { panic!("expected demo") };
        assert_eq!(demo.agents, 5);
        assert_eq!(demo.rule, Some(Rule::Stv));
        assert_eq!(demo.seed, 16);
        assert!(demo.target.spawn_server);
        assert!(Cli::try_parse_from(["comsoc", "demo", "--agents", "0"]).is_err());
        assert!(Cli::try_parse_from(["comsoc", "demo", "--rule", "copeland"]).is_err());
    }

    #[test]
    fn scenario_modes_conflict() {
        assert!(Cli::try_parse_from(["comsoc", "scenario", "a.json", "--validate-only", "--local"]).is_err());
        let cli = Cli::try_parse_from(["comsoc", "scenario", "a.json", "--local", "--out", "r.json"]).unwrap();
        let Command::Scenario(s) = cli.command else { panic!("expected scenario") };
        assert!(s.local);
        assert_eq!(s.out, Some(PathBuf::from("r.json")));
    }

    #[test]
    fn serve_maps_to_server_config() {
        let cli = Cli::try_parse_from([
            "comsoc", "serve", "--host", "0.0.0.0", "--port", "9000", "--still-open-status", "unavailable",
        ])
        .unwrap();
        let Command::Serve(s) = cli.command else { panic!("expected serve") };
        let config = s.to_config();
        assert_eq!(config.addr(), ("0.0.0.0", 9000));
        assert_eq!(config.still_open_status, StillOpenStatus::Unavailable);
    }
}
