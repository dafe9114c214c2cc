pub mod cli;
pub mod config;
pub mod error;
pub mod executor;
pub mod overwrite;
pub mod path;
pub mod privilege;
pub mod prompt;
pub mod task;
pub mod workdir;
pub mod workflow;

pub use error::DevstrapError;

use std::io::Write;

use anyhow::{Context, Result};
use camino::Utf8Path;
use clap::CommandFactory;
use strum::IntoEnumIterator;
use tracing::{info, warn};
use tracing_subscriber::{FmtSubscriber, filter::LevelFilter};

use crate::executor::CommandExecutor;
use crate::prompt::{AssumeAnswer, Prompter, StdioPrompter};
use crate::task::TaskContext;
use crate::workdir::WorkDir;
use crate::workflow::{Step, Workflow};

pub fn init_logging(log_level: cli::LogLevel) -> Result<()> {
    let filter = match log_level {
        cli::LogLevel::Trace => LevelFilter::TRACE,
        cli::LogLevel::Debug => LevelFilter::DEBUG,
        cli::LogLevel::Info => LevelFilter::INFO,
        cli::LogLevel::Warn => LevelFilter::WARN,
        cli::LogLevel::Error => LevelFilter::ERROR,
    };

    // stdout carries prompts and tool output
    tracing::subscriber::set_global_default(
        FmtSubscriber::builder()
            .with_max_level(filter)
            .with_writer(std::io::stderr)
            .finish(),
    )
    .context("failed to set global default tracing subscriber")
}

/// Loads the profile at `file`.
///
/// A missing file at the default location yields the built-in profile;
/// an explicitly named file must exist.
pub fn load_profile(file: &Utf8Path) -> Result<config::Profile> {
    if file.as_str() == cli::DEFAULT_PROFILE && !file.exists() {
        warn!("{} not found, using the built-in profile", file);
        return Ok(config::Profile::default());
    }
    config::load_profile(file).with_context(|| format!("failed to load profile from {}", file))
}

/// Picks the prompter for an apply run.
pub fn prompter_for(opts: &cli::ApplyArgs) -> Box<dyn Prompter> {
    if opts.yes {
        Box::new(AssumeAnswer(true))
    } else {
        Box::new(StdioPrompter)
    }
}

pub fn run_apply(
    opts: &cli::ApplyArgs,
    executor: &dyn CommandExecutor,
    prompter: &dyn Prompter,
) -> Result<()> {
    let profile = load_profile(&opts.file)?;
    profile.validate().context("profile validation failed")?;

    let workflow = if opts.only.is_empty() {
        Workflow::new(&profile)
    } else {
        Workflow::with_steps(&profile, &opts.only)
    };

    let workdir = WorkDir::create().context("failed to create working directory")?;
    let ctx = TaskContext::new(executor, prompter, opts.dry_run);
    workflow.run(&ctx, workdir.path())
}

pub fn run_validate(opts: &cli::ValidateArgs) -> Result<()> {
    let profile = load_profile(&opts.file)?;
    profile.validate().context("profile validation failed")?;
    info!("validation successful:\n{:#?}", profile);
    Ok(())
}

/// Writes the step names, one per line, in execution order.
pub fn write_steps(out: &mut dyn Write) -> Result<()> {
    for step in Step::iter() {
        writeln!(out, "{}", step).context("failed to write step list")?;
    }
    Ok(())
}

/// Writes a completion script for `shell`.
pub fn write_completions(shell: clap_complete::Shell, out: &mut dyn Write) {
    let mut cmd = cli::Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, out);
}
