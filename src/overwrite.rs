//! Overwrite confirmation flow.
//!
//! Guards steps that populate a destination which may already exist:
//!
//! ```text
//! check existence ─┬─ missing ─────────────────────────▶ Absent
//!                  └─ exists ─▶ prompt ─┬─ yes ─▶ delete ▶ Deleted
//!                                       └─ no ─────────▶ Skipped
//! ```
//!
//! The flow is built from a `DirectoryPrompt` task whose continuation runs
//! a `DeletePath` task on an affirmative answer.

use std::cell::Cell;

use tracing::{info, warn};

use crate::error::DevstrapError;
use crate::path::SplitPath;
use crate::privilege::PrivilegeMethod;
use crate::task::file_ops::create_dir_all;
use crate::task::{DeletePathConfig, DirectoryPromptConfig, Task, TaskContext, TaskKind};

/// Destination to guard and how to delete it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverwriteOptions {
    pub path: SplitPath,
    pub privilege: Option<PrivilegeMethod>,
}

/// How the flow ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverwriteOutcome {
    /// Nothing was there; no prompt was shown.
    Absent,
    /// The operator agreed and the destination was removed.
    Deleted,
    /// The operator declined, or the parent could not be prepared.
    Skipped,
}

impl OverwriteOutcome {
    /// Whether the guarded step must not run.
    pub fn is_skipped(self) -> bool {
        self == Self::Skipped
    }
}

/// Runs the overwrite confirmation flow for `opts.path.join()`.
///
/// `opts.path.base` is created first. If that fails the step is reported
/// as skipped without prompting.
pub fn handle_overwrite(
    ctx: &TaskContext<'_>,
    opts: &OverwriteOptions,
) -> Result<OverwriteOutcome, DevstrapError> {
    if let Err(e) = create_dir_all(&opts.path.base, ctx.dry_run()) {
        warn!("cannot prepare {}, skipping step: {}", opts.path.base, e);
        return Ok(OverwriteOutcome::Skipped);
    }

    let target = opts.path.join();
    let answer: Cell<Option<bool>> = Cell::new(None);

    let prompt = Task::new(
        "DirectoryPromptTask",
        TaskKind::DirectoryPrompt(DirectoryPromptConfig {
            path: target.clone(),
            action: Box::new(|ctx: &TaskContext<'_>, yes: bool| {
                answer.set(Some(yes));
                if !yes {
                    return Ok(());
                }
                Task::new(
                    "DeletePathTask",
                    TaskKind::DeletePath(DeletePathConfig {
                        path: target.clone(),
                        privilege: opts.privilege,
                    }),
                )
                .execute(ctx)
            }),
        }),
    );
    prompt.execute(ctx)?;

    let outcome = match answer.get() {
        None => OverwriteOutcome::Absent,
        Some(true) => OverwriteOutcome::Deleted,
        Some(false) => OverwriteOutcome::Skipped,
    };
    if outcome.is_skipped() {
        info!("keeping existing {}", target);
    }
    Ok(outcome)
}
