//! In-memory host for testing.
//!
//! `FakeHost` implements the [`Host`] trait from canned answers and records
//! every environment lookup, program run, symlink created and sleep requested
//! so tests can assert on them afterwards. Programs without a configured response succeed with
//! empty output.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Result, SnapflatError};
use crate::shell::{CommandResult, Invocation};

use super::Host;

/// Fake host built from canned answers.
#[derive(Debug, Default)]
pub struct FakeHost {
    root: bool,
    programs: HashSet<String>,
    env: HashMap<String, String>,
    files: HashMap<PathBuf, String>,
    paths: HashSet<PathBuf>,
    responses: HashMap<String, CommandResult>,
    queued: RefCell<HashMap<String, VecDeque<CommandResult>>>,
    spawn_failures: HashSet<String>,
    lookups: RefCell<Vec<String>>,
    runs: RefCell<Vec<Invocation>>,
    symlinks: RefCell<Vec<(PathBuf, PathBuf)>>,
    sleeps: RefCell<Vec<Duration>>,
}

impl FakeHost {
    /// Create an empty host: not root, no programs, no files.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether the effective user is root.
    pub fn as_root(mut self, root: bool) -> Self {
        self.root = root;
        self
    }

    /// Make a program available on PATH.
    pub fn with_program(mut self, name: &str) -> Self {
        self.programs.insert(name.to_string());
        self
    }

    /// Set an environment variable.
    pub fn with_env(mut self, key: &str, value: &str) -> Self {
        self.env.insert(key.to_string(), value.to_string());
        self
    }

    /// Add a readable file. The path also counts as existing.
    pub fn with_file(mut self, path: &str, content: &str) -> Self {
        self.files.insert(PathBuf::from(path), content.to_string());
        self.paths.insert(PathBuf::from(path));
        self
    }

    /// Mark a path as existing without content.
    pub fn with_path(mut self, path: &str) -> Self {
        self.paths.insert(PathBuf::from(path));
        self
    }

    /// Respond to a command line with `result` every time it is run.
    pub fn respond(mut self, command_line: &str, result: CommandResult) -> Self {
        self.responses.insert(command_line.to_string(), result);
        self
    }

    /// Respond to a command line with `results` in order.
    ///
    /// After the queue is exhausted, falls back to [`respond`](Self::respond)
    /// or the default success.
    pub fn queue(self, command_line: &str, results: Vec<CommandResult>) -> Self {
        self.queued
            .borrow_mut()
            .insert(command_line.to_string(), results.into_iter().collect());
        self
    }

    /// Make spawning a command line fail, as if the program could not be executed.
    pub fn fail_to_spawn(mut self, command_line: &str) -> Self {
        self.spawn_failures.insert(command_line.to_string());
        self
    }

    /// Environment lookups made so far, in order, such as `"is_root"` or
    /// `"read_file /etc/os-release"`.
    pub fn lookups(&self) -> Vec<String> {
        self.lookups.borrow().clone()
    }

    /// How many times a lookup was made.
    pub fn lookup_count(&self, lookup: &str) -> usize {
        self.lookups.borrow().iter().filter(|l| *l == lookup).count()
    }

    fn record(&self, lookup: String) {
        self.lookups.borrow_mut().push(lookup);
    }

    /// All invocations run so far, in order.
    pub fn runs(&self) -> Vec<Invocation> {
        self.runs.borrow().clone()
    }

    /// Command lines run so far, in order.
    pub fn command_lines(&self) -> Vec<String> {
        self.runs.borrow().iter().map(|i| i.command_line()).collect()
    }

    /// Whether a command line was run.
    pub fn ran(&self, command_line: &str) -> bool {
        self.runs
            .borrow()
            .iter()
            .any(|i| i.command_line() == command_line)
    }

    /// How many times a command line was run.
    pub fn run_count(&self, command_line: &str) -> usize {
        self.runs
            .borrow()
            .iter()
            .filter(|i| i.command_line() == command_line)
            .count()
    }

    /// Whether any command starting with `program` was run.
    pub fn ran_program(&self, program: &str) -> bool {
        self.runs.borrow().iter().any(|i| i.program == program)
    }

    /// Symlinks created so far as `(target, link)` pairs.
    pub fn symlinks(&self) -> Vec<(PathBuf, PathBuf)> {
        self.symlinks.borrow().clone()
    }

    /// Sleeps requested so far.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.borrow().clone()
    }
}

impl Host for FakeHost {
    fn is_root(&self) -> bool {
        self.record("is_root".to_string());
        self.root
    }

    fn find_program(&self, name: &str) -> Option<PathBuf> {
        self.record(format!("find_program {}", name));
        self.programs
            .contains(name)
            .then(|| PathBuf::from("/usr/bin").join(name))
    }

    fn env_var(&self, key: &str) -> Option<String> {
        self.record(format!("env_var {}", key));
        self.env.get(key).cloned()
    }

    fn read_file(&self, path: &Path) -> Option<String> {
        self.record(format!("read_file {}", path.display()));
        self.files.get(path).cloned()
    }

    fn path_exists(&self, path: &Path) -> bool {
        self.record(format!("path_exists {}", path.display()));
        self.paths.contains(path)
    }

    fn run(&self, invocation: &Invocation) -> Result<CommandResult> {
        let line = invocation.command_line();
        self.runs.borrow_mut().push(invocation.clone());

        if self.spawn_failures.contains(&line) {
            return Err(SnapflatError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{}: not found", invocation.program),
            )));
        }

        if let Some(result) = self
            .queued
            .borrow_mut()
            .get_mut(&line)
            .and_then(|q| q.pop_front())
        {
            return Ok(result);
        }

        Ok(self
            .responses
            .get(&line)
            .cloned()
            .unwrap_or_else(|| CommandResult::with_stdout("")))
    }

    fn symlink(&self, target: &Path, link: &Path) -> Result<()> {
        self.symlinks
            .borrow_mut()
            .push((target.to_path_buf(), link.to_path_buf()));
        Ok(())
    }

    fn sleep(&self, duration: Duration) {
        self.sleeps.borrow_mut().push(duration);
    }
}
