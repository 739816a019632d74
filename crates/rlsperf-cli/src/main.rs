use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use rlsperf_core::RewriteMode;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(
    name = "rlsperf",
    version,
    about = "Wrap RLS helper function calls in subqueries so Postgres evaluates them once per query"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rewrite a schema file in place.
    Apply {
        /// Path to the schema file, e.g. supabase/schema.sql
        path: PathBuf,

        #[command(flatten)]
        rules: RuleArgs,

        /// Copy the original to <path>.bak before writing
        #[arg(long, default_value_t = false)]
        backup: bool,
    },

    /// Report what `apply` would change without writing. Exits 1 if the file would change.
    Check {
        /// Path to the schema file
        path: PathBuf,

        #[command(flatten)]
        rules: RuleArgs,

        /// Print the report as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// List the effective rewrite rules in application order.
    Rules {
        #[command(flatten)]
        rules: RuleArgs,
    },
}

#[derive(Args, Debug)]
struct RuleArgs {
    /// YAML file listing the function calls to wrap (defaults to the built-in set)
    #[arg(long, env = "RLSPERF_CONFIG")]
    config: Option<PathBuf>,

    /// Override the mode from the config file
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ModeArg {
    /// Wrap every match, then restore declarations (re-running wraps again)
    Compat,
    /// Wrap call sites only; safe to re-run
    CallSites,
}

impl From<ModeArg> for RewriteMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Compat => RewriteMode::Compat,
            ModeArg::CallSites => RewriteMode::CallSites,
        }
    }
}

fn main() -> ExitCode {
    // Logs go to stderr; stdout carries the completion line and reports.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    match cli.cmd {
        Command::Apply {
            path,
            rules,
            backup,
        } => {
            let config = commands::load_config(rules.config.as_deref(), rules.mode.map(Into::into))?;
            commands::apply::run(&path, &config, backup)?;
            Ok(ExitCode::SUCCESS)
        }

        Command::Check { path, rules, json } => {
            let config = commands::load_config(rules.config.as_deref(), rules.mode.map(Into::into))?;
            let pending = commands::check::run(&path, &config, json)?;
            Ok(if pending {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            })
        }

        Command::Rules { rules } => {
            let config = commands::load_config(rules.config.as_deref(), rules.mode.map(Into::into))?;
            commands::rules::run(&config)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
