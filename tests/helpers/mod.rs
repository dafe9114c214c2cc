use std::collections::{HashMap, HashSet, VecDeque};
use std::os::unix::process::ExitStatusExt;
use std::process::ExitStatus;
use std::sync::Mutex;

use camino::Utf8PathBuf;
use devstrap::DevstrapError;
use devstrap::executor::{CommandExecutor, CommandSpec, ExecutionResult};
use devstrap::prompt::Prompter;

/// Executor that records every command instead of running it.
///
/// Commands succeed unless an exit code was registered for their program
/// (the command itself, not the elevation tool) or the program was marked
/// missing.
#[allow(dead_code)]
#[derive(Default)]
pub struct MockExecutor {
    specs: Mutex<Vec<CommandSpec>>,
    exit_codes: HashMap<String, i32>,
    missing: HashSet<String>,
    create_downloads: bool,
}

#[allow(dead_code)]
impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every invocation of `program` exit with `code`.
    pub fn with_exit_code(mut self, program: &str, code: i32) -> Self {
        self.exit_codes.insert(program.to_string(), code);
        self
    }

    /// Makes `program` behave as if it were not in `PATH`.
    pub fn with_missing(mut self, program: &str) -> Self {
        self.missing.insert(program.to_string());
        self
    }

    /// Makes `curl ... -o <file>` create an empty `<file>`, so later
    /// validation of the downloaded artifact passes.
    pub fn creating_downloads(mut self) -> Self {
        self.create_downloads = true;
        self
    }

    pub fn specs(&self) -> Vec<CommandSpec> {
        self.specs.lock().unwrap().clone()
    }

    /// Recorded commands as full argv, elevation tool included.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.specs()
            .iter()
            .map(|spec| {
                let (program, args) = spec.argv();
                std::iter::once(program).chain(args).collect()
            })
            .collect()
    }

    /// Programs invoked, in order, without elevation or arguments.
    pub fn programs(&self) -> Vec<String> {
        self.specs().into_iter().map(|spec| spec.command).collect()
    }
}

impl CommandExecutor for MockExecutor {
    fn execute(&self, spec: &CommandSpec) -> Result<ExecutionResult, DevstrapError> {
        self.specs.lock().unwrap().push(spec.clone());

        if self.missing.contains(&spec.command) {
            return Err(DevstrapError::CommandNotFound {
                command: spec.command.clone(),
            });
        }

        let code = self.exit_codes.get(&spec.command).copied().unwrap_or(0);
        if code == 0 && self.create_downloads && spec.command == "curl" {
            if let Some(pos) = spec.args.iter().position(|a| a == "-o") {
                std::fs::write(&spec.args[pos + 1], b"").expect("failed to create download");
            }
        }
        Ok(ExecutionResult {
            status: Some(ExitStatus::from_raw(code << 8)),
        })
    }
}

/// Prompter answering from a fixed script and recording the questions.
///
/// Running out of answers counts as "no".
#[allow(dead_code)]
#[derive(Default)]
pub struct ScriptedPrompter {
    answers: Mutex<VecDeque<bool>>,
    questions: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().collect()),
            questions: Mutex::new(Vec::new()),
        }
    }

    pub fn questions(&self) -> Vec<String> {
        self.questions.lock().unwrap().clone()
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&self, question: &str) -> Result<bool, DevstrapError> {
        self.questions.lock().unwrap().push(question.to_string());
        Ok(self.answers.lock().unwrap().pop_front().unwrap_or(false))
    }
}

/// Creates a temporary directory and returns it with its UTF-8 path.
#[allow(dead_code)]
pub fn temp_dir() -> (tempfile::TempDir, Utf8PathBuf) {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path =
        Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("path should be valid UTF-8");
    (dir, path)
}

/// Converts a list of string literals into an owned argv.
#[allow(dead_code)]
pub fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}
