// crates/comsoc_cli/src/main.rs
//
// `comsoc` binary: exit codes, error mapping, logging setup and the three
// subcommands (serve / demo / scenario).

mod agents;
mod args;
mod client;
mod demo;
mod display;
mod scenario;

mod exitcodes {
    pub const OK: u8 = 0;
    /// Usage, scenario file or request validation failures.
    pub const VALIDATION: u8 = 2;
    /// Filesystem, socket or HTTP transport failures.
    pub const IO: u8 = 4;
    /// Rule computation failed, or a scenario result differs from its expectation.
    pub const OUTCOME: u8 = 5;
}

use std::fmt;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use comsoc_io::report::write_json_atomic;
use comsoc_io::scenario::load_scenario;
use comsoc_server::{BackgroundServer, ServerConfig};
use comsoc_store::{BallotError, ErrorKind};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use agents::AgentError;
use args::{Cli, Command, DemoArgs, ScenarioArgs, ServeArgs, Target};
use client::{ClientError, RestClient};
use scenario::ScenarioReport;

/// Central error type for exit-code mapping.
#[derive(Debug)]
enum MainError {
    Validation(String),
    Io(String),
    Outcome(String),
}

impl fmt::Display for MainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MainError::Validation(m) => write!(f, "validation: {m}"),
            MainError::Io(m) => write!(f, "io: {m}"),
            MainError::Outcome(m) => write!(f, "{m}"),
        }
    }
}

fn exit_code(e: &MainError) -> u8 {
    match e {
        MainError::Validation(_) => exitcodes::VALIDATION,
        MainError::Io(_) => exitcodes::IO,
        MainError::Outcome(_) => exitcodes::OUTCOME,
    }
}

fn map_io_err(e: comsoc_io::IoError) -> MainError {
    use comsoc_io::IoError::*;
    match e {
        Path(m) => MainError::Io(m),
        e @ (Json { .. } | Deadline { .. } | Scenario(_)) => MainError::Validation(e.to_string()),
    }
}

fn map_ballot_err(e: BallotError) -> MainError {
    match e.kind() {
        ErrorKind::Compute => MainError::Outcome(e.to_string()),
        _ => MainError::Validation(e.to_string()),
    }
}

fn map_client_err(e: ClientError) -> MainError {
    match e.code() {
        Some(500) => MainError::Outcome(e.to_string()),
        _ => MainError::Io(e.to_string()),
    }
}

fn map_agent_err(e: AgentError) -> MainError {
    match e {
        AgentError::Client(c) => map_client_err(c),
        other => MainError::Io(other.to_string()),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "comsoc=debug" } else { "comsoc=info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let outcome = match &cli.command {
        Command::Serve(a) => serve(a),
        Command::Demo(a) => run_demo(a),
        Command::Scenario(a) => run_scenario(a),
    };

    match outcome {
        Ok(()) => ExitCode::from(exitcodes::OK),
        Err(e) => {
            eprintln!("comsoc: error: {e}");
            ExitCode::from(exit_code(&e))
        }
    }
}

fn serve(args: &ServeArgs) -> Result<(), MainError> {
    actix_web::rt::System::new()
        .block_on(comsoc_server::run(args.to_config()))
        .map_err(|e| MainError::Io(format!("serve {}:{}: {e}", args.host, args.port)))
}

/// Run `f` against the target server, starting a throwaway one when asked.
fn with_target<T>(
    target: &Target,
    f: impl FnOnce(&RestClient) -> Result<T, MainError>,
) -> Result<T, MainError> {
    let spawned = if target.spawn_server {
        let config = ServerConfig { port: 0, ..ServerConfig::default() };
        Some(BackgroundServer::spawn(&config).map_err(|e| MainError::Io(format!("spawn server: {e}")))?)
    } else {
        None
    };
    let url = spawned.as_ref().map_or_else(|| target.url.clone(), BackgroundServer::base_url);
    let client = RestClient::new(&url).map_err(map_client_err)?;
    let out = f(&client);
    if let Some(server) = spawned {
        if let Err(e) = server.stop() {
            warn!(error = %e, "background server did not stop cleanly");
        }
    }
    out
}

fn run_demo(args: &DemoArgs) -> Result<(), MainError> {
    let plan = demo::plan(args);
    let voters = plan.voters.len();
    with_target(&args.target, |client| {
        info!(url = client.base_url(), ballots = plan.ballots.len(), voters, "starting demo fleet");
        let reports = agents::run_fleet(client, plan, Duration::from_secs(args.voting_secs))
            .map_err(map_agent_err)?;
        for r in &reports {
            println!("{}", display::result_line(&r.ballot_id, r.rule, r.votes, &r.result));
        }
        Ok(())
    })
}

fn run_scenario(args: &ScenarioArgs) -> Result<(), MainError> {
    let s = load_scenario(&args.file).map_err(map_io_err)?;
    let rule = s.parsed_rule().map_err(map_io_err)?;
    if args.validate_only {
        println!("{}: ok ({rule}, {} alternatives, {} voters)", args.file.display(), s.alts, s.voter_count());
        return Ok(());
    }

    let (mode, (ballot_id, result)) = if args.local {
        ("local", scenario::run_local(&s).map_err(map_ballot_err)?)
    } else {
        let voting = Duration::from_secs(args.voting_secs);
        ("remote", with_target(&args.target, |client| {
            scenario::run_remote(client, &s, voting).map_err(map_client_err)
        })?)
    };
    println!("{}", display::result_line(&ballot_id, rule, s.voter_count(), &result));

    let problem = s.expect.as_ref().and_then(|exp| scenario::mismatch(exp, &result));
    if let Some(path) = &args.out {
        let report = ScenarioReport {
            name: s.name.clone(),
            file: args.file.display().to_string(),
            rule: s.rule.clone(),
            voters: s.voter_count(),
            ballot_id,
            mode,
            expected: s.expect.clone(),
            actual: result,
            matches: problem.is_none(),
        };
        write_json_atomic(path, &report).map_err(map_io_err)?;
        info!(path = %path.display(), "scenario report written");
    }
    match problem {
        Some(p) => Err(MainError::Outcome(format!("{}: {p}", args.file.display()))),
        None => Ok(()),
    }
}
