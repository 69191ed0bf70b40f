//! payops-agent — closed-loop autonomous control agent for payment infrastructure.
//!
//! ```bash
//! payops-agent run --config agent.toml --duration 300
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use payops_agent::config::{self, AgentConfig};
use payops_agent::knowledge::RuleTablePlaybookProvider;
use payops_agent::ControlLoop;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "payops-agent", version, about = "Closed-loop control agent for payment infrastructure")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the continuous control loop.
    Run {
        /// Path to a TOML config file. Falls back to `agent.toml` in the
        /// current directory, then to built-in defaults.
        #[arg(long, env = "PAYOPS_CONFIG")]
        config: Option<PathBuf>,

        /// Directory for the persisted state snapshot.
        #[arg(long, default_value = "./state")]
        state_dir: PathBuf,

        /// Directory for the append-only audit log.
        #[arg(long, default_value = "./audit")]
        audit_dir: PathBuf,

        /// Deterministic RNG seed for the drift and generator simulation.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Stop after this many seconds. Unbounded if omitted.
        #[arg(long)]
        duration: Option<u64>,

        /// Stop after this many full decision cycles. Unbounded if omitted.
        #[arg(long)]
        max_cycles: Option<u64>,

        /// Override `cycle_interval_ms` from the config file.
        #[arg(long)]
        cycle_interval: Option<i64>,

        /// Attach the local rule-table playbook provider for incident-recall
        /// assisted decisions. Accepted for forward-compatibility; the core
        /// decision policy does not yet consult it.
        #[arg(long)]
        enable_rag: bool,

        /// Named scenario to seed the generator/drift config from. Reserved
        /// for demo tooling; unrecognized names are a no-op today.
        #[arg(long)]
        scenario: Option<String>,

        /// External message-bus connection string. The core loop is
        /// transport-agnostic (§6); this flag is accepted for parity with
        /// the message-bus ingress contract but no producer/consumer ships
        /// with this crate.
        #[arg(long)]
        bootstrap_servers: Option<String>,

        #[arg(long)]
        topic: Option<String>,

        #[arg(long)]
        group_id: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let Command::Run {
        config: config_path,
        state_dir,
        audit_dir,
        seed,
        duration,
        max_cycles: _max_cycles,
        cycle_interval,
        enable_rag,
        scenario,
        bootstrap_servers,
        topic,
        group_id,
    } = cli.command;

    let (mut agent_config, warnings) = match &config_path {
        Some(path) => match AgentConfig::load(path) {
            Ok(loaded) => loaded,
            Err(e) => {
                eprintln!("fatal: failed to load config from {}: {e}", path.display());
                return ExitCode::from(1);
            }
        },
        None => match std::fs::metadata("agent.toml") {
            Ok(_) => match AgentConfig::load(&PathBuf::from("agent.toml")) {
                Ok(loaded) => loaded,
                Err(e) => {
                    eprintln!("fatal: failed to load agent.toml: {e}");
                    return ExitCode::from(1);
                }
            },
            Err(_) => (AgentConfig::default(), Vec::new()),
        },
    };

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::try_new(&agent_config.log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    for warning in &warnings {
        tracing::warn!("{warning}");
    }

    if let Some(interval) = cycle_interval {
        agent_config.loop_config.cycle_interval_ms = interval;
    }
    if let Some(max_secs) = duration {
        agent_config.loop_config.max_duration_secs = Some(max_secs);
    }
    if let Some(scenario) = &scenario {
        tracing::info!(scenario, "scenario flag accepted; named scenarios are a demo-tooling concern");
    }
    if let (Some(servers), Some(topic), Some(group)) = (&bootstrap_servers, &topic, &group_id) {
        tracing::info!(bootstrap_servers = %servers, topic = %topic, group_id = %group, "external transaction stream flags accepted, no transport wired in this build");
    }

    config::init(agent_config.clone());

    if enable_rag {
        let _playbook_provider = RuleTablePlaybookProvider::new(0.4);
        tracing::info!("rule-table playbook provider attached (enable_rag)");
    }

    let now_ms = 0;
    let control_loop = ControlLoop::new(agent_config.clone(), state_dir, audit_dir, seed, now_ms);
    let cancel_token = control_loop.cancel_token();

    let max_duration = agent_config.loop_config.max_duration_secs.map(Duration::from_secs);

    tokio::spawn({
        let cancel_token = cancel_token.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("received shutdown signal");
                cancel_token.cancel();
            }
        }
    });

    let stats = control_loop.run(max_duration).await;
    tracing::info!(cycles = stats.cycles_run, full_cycles = stats.full_cycles_run, interventions = stats.interventions_executed, "shutdown complete");

    ExitCode::from(0)
}
