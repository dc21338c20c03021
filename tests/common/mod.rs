// Shared helpers for integration tests.
//
// Provides an in-memory host (config stores, installed fonts) behind the
// `Executor` trait and a temporary home directory, so each integration test
// can run the engine end to end without touching the real machine.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{Result, bail};

use appconf_cli::config::{ConfigurationDocument, Format, parse_str};
use appconf_cli::engine::{
    self, ApplicationResult, Context, DependencyResolver, ExecutionMode,
};
use appconf_cli::error::EngineError;
use appconf_cli::exec::{ExecResult, Executor};
use appconf_cli::logging::{Log, Logger};
use appconf_cli::platform::{Os, Platform};
use appconf_cli::resources::ResourceChange;

fn ok(stdout: impl Into<String>) -> ExecResult {
    ExecResult {
        stdout: stdout.into(),
        stderr: String::new(),
        success: true,
        code: Some(0),
    }
}

fn exit_one() -> ExecResult {
    ExecResult {
        stdout: String::new(),
        stderr: String::new(),
        success: false,
        code: Some(1),
    }
}

/// A fake host answering `git config`, `npm config`, `fc-list` and
/// `oh-my-posh font install` from memory.
#[derive(Debug, Default)]
pub struct FakeHost {
    git: Mutex<BTreeMap<String, String>>,
    npm: Mutex<BTreeMap<String, String>>,
    fonts: Mutex<Vec<String>>,
    /// Programs whose mutating sub-commands fail.
    broken: Mutex<HashSet<String>>,
    writes: Mutex<Vec<String>>,
}

impl FakeHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_git(&self, key: &str, value: &str) {
        self.git
            .lock()
            .expect("git lock")
            .insert(key.to_string(), value.to_string());
    }

    pub fn git(&self, key: &str) -> Option<String> {
        self.git.lock().expect("git lock").get(key).cloned()
    }

    pub fn npm(&self, key: &str) -> Option<String> {
        self.npm.lock().expect("npm lock").get(key).cloned()
    }

    pub fn install_font(&self, name: &str) {
        self.fonts.lock().expect("fonts lock").push(name.to_string());
    }

    /// Make every write through `program` fail.
    pub fn break_program(&self, program: &str) {
        self.broken
            .lock()
            .expect("broken lock")
            .insert(program.to_string());
    }

    /// Every mutating command run so far, as `program arg arg …`.
    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().expect("writes lock").clone()
    }

    fn write(&self, program: &str, args: &[&str]) -> Result<()> {
        if self.broken.lock().expect("broken lock").contains(program) {
            bail!("{program} failed (exit 1): permission denied");
        }
        self.writes
            .lock()
            .expect("writes lock")
            .push(std::iter::once(program).chain(args.iter().copied()).collect::<Vec<_>>().join(" "));
        Ok(())
    }

    fn dispatch(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        match (program, args) {
            ("git", ["config", "--global", "--get", key]) => {
                Ok(self.git(key).map_or_else(exit_one, |v| ok(format!("{v}\n"))))
            }
            ("git", ["config", "--global", key, value]) => {
                self.write(program, args)?;
                self.set_git(key, value);
                Ok(ok(""))
            }
            ("npm", ["config", "get", key]) => Ok(ok(format!(
                "{}\n",
                self.npm(key).unwrap_or_else(|| "undefined".to_string())
            ))),
            ("npm", ["config", "set", key, value]) => {
                self.write(program, args)?;
                self.npm
                    .lock()
                    .expect("npm lock")
                    .insert((*key).to_string(), (*value).to_string());
                Ok(ok(""))
            }
            ("fc-list", _) => Ok(ok(self.fonts.lock().expect("fonts lock").join("\n"))),
            ("oh-my-posh", ["font", "install", name]) => {
                self.write(program, args)?;
                self.install_font(&format!("{name} Nerd Font"));
                Ok(ok(""))
            }
            _ => bail!("unexpected command: {program} {}", args.join(" ")),
        }
    }
}

impl Executor for FakeHost {
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        let result = self.dispatch(program, args)?;
        if !result.success {
            bail!("{program} failed (exit 1)");
        }
        Ok(result)
    }

    fn run_in(&self, _dir: &Path, program: &str, args: &[&str]) -> Result<ExecResult> {
        self.run(program, args)
    }

    fn run_unchecked(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        self.dispatch(program, args)
    }

    fn which(&self, _program: &str) -> bool {
        true
    }
}

/// Resolver that counts calls and never installs anything.
#[derive(Debug, Default)]
pub struct CountingResolver {
    calls: AtomicUsize,
    seen: Mutex<Vec<String>>,
}

impl CountingResolver {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().expect("seen lock").clone()
    }
}

impl DependencyResolver for CountingResolver {
    fn ensure_available(
        &self,
        command: &str,
        _source: &str,
        _mode: ExecutionMode,
    ) -> Result<ResourceChange, EngineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen
            .lock()
            .expect("seen lock")
            .push(command.to_string());
        Ok(ResourceChange::AlreadyCorrect)
    }
}

/// An isolated machine: a temporary home directory plus a [`FakeHost`].
pub struct TestMachine {
    /// Temporary directory used as the home directory.
    pub home: tempfile::TempDir,
    pub host: Arc<FakeHost>,
    pub resolver: Arc<CountingResolver>,
}

impl TestMachine {
    pub fn new() -> Self {
        Self {
            home: tempfile::tempdir().expect("create temp dir"),
            host: FakeHost::new(),
            resolver: Arc::new(CountingResolver::default()),
        }
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.home.path().join(rel)
    }

    pub fn read(&self, rel: &str) -> String {
        std::fs::read_to_string(self.path(rel)).expect("read file")
    }

    pub fn write(&self, rel: &str, content: &str) {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent");
        }
        std::fs::write(path, content).expect("write file");
    }

    /// Build a context for a Linux host with this machine's home.
    pub fn context(&self, mode: ExecutionMode) -> Context {
        Context::new(
            Arc::new(Logger::with_log_file(None)) as Arc<dyn Log>,
            mode,
            Arc::clone(&self.host) as Arc<dyn Executor>,
            Arc::clone(&self.resolver) as Arc<dyn DependencyResolver>,
            Platform::new(Os::Linux, false),
            self.home.path().to_path_buf(),
        )
    }

    /// Parse `yaml`, replacing `$HOME` with this machine's home directory.
    pub fn document(&self, yaml: &str) -> ConfigurationDocument {
        let yaml = yaml.replace("$HOME", &self.home.path().to_string_lossy());
        parse_str(&yaml, Format::Yaml).expect("parse document")
    }

    /// Run the engine once over `yaml`.
    pub fn apply(&self, yaml: &str, mode: ExecutionMode) -> Vec<ApplicationResult> {
        engine::run(&self.document(yaml), &self.context(mode))
    }
}
