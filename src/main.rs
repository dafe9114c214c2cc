use std::process;

use anyhow::Result;
use devstrap::cli::{self, Commands};
use devstrap::executor::RealCommandExecutor;
use tracing::error;

fn main() {
    if let Err(e) = run() {
        error!("{:#}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = cli::parse_args()?;
    devstrap::init_logging(args.command.log_level())?;

    match &args.command {
        Commands::Apply(opts) => {
            let executor = RealCommandExecutor {
                dry_run: opts.dry_run,
            };
            let prompter = devstrap::prompter_for(opts);
            devstrap::run_apply(opts, &executor, prompter.as_ref())
        }
        Commands::Validate(opts) => devstrap::run_validate(opts),
        Commands::Steps(_) => devstrap::write_steps(&mut std::io::stdout().lock()),
        Commands::Completions(opts) => {
            devstrap::write_completions(opts.shell, &mut std::io::stdout().lock());
            Ok(())
        }
    }
}
