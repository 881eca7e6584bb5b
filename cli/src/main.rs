//! `athena`: inspect configuration and replay operation scripts against an
//! in-memory Athena engine.

mod config;
mod replay;

use anyhow::Context;
use athena_utils::{init_logging, LogFormat};
use clap::Parser;
use config::CliConfig;
use replay::{parse_script, Replayer};
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "athena", about = "Athena oracle adjudication engine")]
struct Cli {
    /// Path to a TOML configuration file. File settings are the base; flags
    /// and environment variables override them.
    #[arg(long, global = true, env = "ATHENA_CONFIG")]
    config: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, global = true, env = "ATHENA_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, global = true, env = "ATHENA_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Identity owning the engine.
    #[arg(long, global = true, env = "ATHENA_OWNER")]
    owner: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Print the effective configuration as TOML.
    Params,

    /// Run a JSON operation script and print every event as a JSON line.
    Replay {
        /// The script: a JSON array of operations.
        #[arg(long)]
        script: PathBuf,

        /// Write the final engine state (bincode) here.
        #[arg(long)]
        snapshot_out: Option<PathBuf>,

        /// Clock value (seconds) at the start of the replay.
        #[arg(long, default_value_t = 0)]
        start_time: u64,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => CliConfig::from_toml_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => CliConfig::default(),
    };
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    if let Some(owner) = cli.owner {
        config.owner = owner;
    }

    init_logging(config.log_format, &config.log_level);
    let params = config.engine_params()?;
    let owner = config.owner_address()?;

    match cli.command {
        Command::Params => {
            print!("{}", config.to_toml_string()?);
        }
        Command::Replay {
            script,
            snapshot_out,
            start_time,
        } => {
            let json = std::fs::read_to_string(&script)
                .with_context(|| format!("reading {}", script.display()))?;
            let ops = parse_script(&json)?;
            tracing::info!(ops = ops.len(), script = %script.display(), "replaying script");

            let mut replayer = Replayer::new(owner, params, start_time);
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            let written = replayer.run(&ops, &mut out)?;
            out.flush()?;
            tracing::info!(events = written, "replay complete");

            if let Some(path) = snapshot_out {
                let bytes = replayer.engine().save_state()?;
                std::fs::write(&path, bytes)
                    .with_context(|| format!("writing {}", path.display()))?;
                tracing::info!(path = %path.display(), "snapshot written");
            }
        }
    }
    Ok(())
}
