//! External program invocation.
//!
//! Every tool the project workflow depends on (`make`, `norminette`,
//! `valgrind`, the built program itself) is reached through [`ToolRunner`].
//! [`SystemRunner`] spawns real processes with inherited stdio so output and
//! interactive input pass straight through.

use crate::error::ProjectError;
use crate::settings::ToolSettings;
use crate::ui;
use anyhow::{Context, Result};
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

/// A single program run: what to execute, with which arguments, and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl Invocation {
    pub fn new(program: impl Into<String>, cwd: &Path) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.to_path_buf(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

/// How a finished program exited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolStatus {
    pub code: i32,
}

impl ToolStatus {
    pub fn success(&self) -> bool {
        self.code == 0
    }

    pub fn from_exit_status(status: ExitStatus) -> Self {
        if let Some(code) = status.code() {
            return Self { code };
        }
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                return Self { code: 128 + signal };
            }
        }
        Self { code: 1 }
    }
}

pub trait ToolRunner {
    /// Runs the invocation to completion.
    fn run(&self, invocation: &Invocation) -> Result<ToolStatus>;
}

/// Spawns real child processes sharing this process's stdin/stdout/stderr.
pub struct SystemRunner;

impl ToolRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<ToolStatus> {
        ui::debug(&format!(
            "Running command: {} (in {})",
            ui::format_command(&invocation.program, &invocation.args),
            invocation.cwd.display()
        ));

        let status = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .status();

        let status = match status {
            Ok(status) => status,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ProjectError::ToolNotFound(invocation.program.clone()).into());
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to execute {}", invocation.program));
            }
        };

        let result = ToolStatus::from_exit_status(status);
        ui::debug(&format!(
            "{} exited with code {}",
            invocation.program, result.code
        ));
        Ok(result)
    }
}

/// The project workflow's external capabilities, bound to configured program
/// names and a runner.
pub struct Tools<'a> {
    settings: &'a ToolSettings,
    runner: &'a dyn ToolRunner,
}

impl<'a> Tools<'a> {
    pub fn new(settings: &'a ToolSettings, runner: &'a dyn ToolRunner) -> Self {
        Self { settings, runner }
    }

    /// `make [-B]` in the project root.
    pub fn compile(&self, root: &Path, force_rebuild: bool) -> Result<ToolStatus> {
        let mut invocation = Invocation::new(&self.settings.make, root);
        if force_rebuild {
            invocation = invocation.arg("-B");
        }
        self.runner.run(&invocation)
    }

    /// `norminette <paths>` in the project root.
    pub fn lint(&self, root: &Path, paths: &[&str]) -> Result<ToolStatus> {
        let invocation = Invocation::new(&self.settings.norminette, root).args(paths.iter().copied());
        self.runner.run(&invocation)
    }

    /// Runs the built program with `args` forwarded verbatim.
    pub fn run(&self, root: &Path, program: &str, args: &[String]) -> Result<ToolStatus> {
        let invocation = Invocation::new(program, root).args(args.iter().cloned());
        self.runner.run(&invocation)
    }

    /// Runs the built program under the memory checker.
    pub fn mem_check(&self, root: &Path, program: &str, args: &[String]) -> Result<ToolStatus> {
        let invocation = Invocation::new(&self.settings.valgrind, root)
            .args(self.settings.valgrind_args.iter().cloned())
            .arg(program)
            .args(args.iter().cloned());
        self.runner.run(&invocation)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Records invocations instead of spawning anything. Exit codes can be
    /// scripted per program name; unscripted programs succeed.
    #[derive(Default)]
    pub struct RecordingRunner {
        pub calls: RefCell<Vec<Invocation>>,
        codes: HashMap<String, i32>,
        missing: Vec<String>,
    }

    impl RecordingRunner {
        pub fn exiting(mut self, program: &str, code: i32) -> Self {
            self.codes.insert(program.to_string(), code);
            self
        }

        /// `program` behaves as if it were not installed.
        pub fn missing(mut self, program: &str) -> Self {
            self.missing.push(program.to_string());
            self
        }

        pub fn programs(&self) -> Vec<String> {
            self.calls.borrow().iter().map(|c| c.program.clone()).collect()
        }

        pub fn call_to(&self, program: &str) -> Option<Invocation> {
            self.calls
                .borrow()
                .iter()
                .find(|c| c.program == program)
                .cloned()
        }
    }

    impl ToolRunner for RecordingRunner {
        fn run(&self, invocation: &Invocation) -> Result<ToolStatus> {
            self.calls.borrow_mut().push(invocation.clone());
            if self.missing.contains(&invocation.program) {
                return Err(ProjectError::ToolNotFound(invocation.program.clone()).into());
            }
            let code = self.codes.get(&invocation.program).copied().unwrap_or(0);
            Ok(ToolStatus { code })
        }
    }
}
