//! Subprocess invocation of the build tool
//!
//! Discovery talks to CMake only through `ToolRunner`, so tests and hosts
//! can substitute canned output for a real process.

use std::io::{self, Read};
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::{Error, Result};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// A single invocation of the build tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl ToolInvocation {
    pub fn new(program: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.into(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn display(&self) -> String {
        let mut cmd = self.program.clone();
        for arg in &self.args {
            cmd.push(' ');
            cmd.push_str(arg);
        }
        cmd
    }
}

/// Captured result of a successful invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
}

pub trait ToolRunner: Send + Sync {
    /// Run to completion. A non-zero exit is an error.
    fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutput>;
}

/// Runs the tool as a child process, killing it when the timeout expires
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    timeout: Duration,
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl ToolRunner for ProcessRunner {
    fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutput> {
        tracing::debug!("Running: {} (in {:?})", invocation.display(), invocation.cwd);

        let mut child = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => Error::ExecutableNotFound(invocation.program.clone()),
                _ => Error::IoError(e),
            })?;

        let stdout = child.stdout.take().map(read_to_end);
        let stderr = child.stderr.take().map(read_to_end);

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if Instant::now() >= deadline {
                tracing::warn!("{} timed out after {:?}", invocation.display(), self.timeout);
                let _ = child.kill();
                let _ = child.wait();
                return Err(Error::ToolTimeout {
                    command: invocation.display(),
                    timeout: self.timeout,
                });
            }
            thread::sleep(POLL_INTERVAL);
        };

        let output = ToolOutput {
            stdout: join_reader(stdout),
            stderr: join_reader(stderr),
        };
        check_status(invocation, status, output)
    }
}

fn read_to_end<R: Read + Send + 'static>(mut source: R) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = source.read_to_end(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    })
}

fn join_reader(handle: Option<thread::JoinHandle<String>>) -> String {
    handle.and_then(|h| h.join().ok()).unwrap_or_default()
}

fn check_status(invocation: &ToolInvocation, status: ExitStatus, output: ToolOutput) -> Result<ToolOutput> {
    if status.success() {
        Ok(output)
    } else {
        Err(Error::ToolFailed {
            command: invocation.display(),
            status: status.to_string(),
            stderr: output.stderr.trim().to_string(),
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sh(dir: &TempDir, script: &str) -> ToolInvocation {
        ToolInvocation::new("sh", dir.path()).arg("-c").arg(script)
    }

    #[test]
    fn test_captures_stdout() {
        let dir = TempDir::new().unwrap();
        let output = ProcessRunner::new()
            .run(&sh(&dir, "printf '... all\\n... clean\\n'"))
            .unwrap();
        assert_eq!(output.stdout, "... all\n... clean\n");
    }

    #[test]
    fn test_runs_in_working_directory() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("marker.txt"), "here").unwrap();
        let output = ProcessRunner::new().run(&sh(&dir, "cat marker.txt")).unwrap();
        assert_eq!(output.stdout, "here");
    }

    #[test]
    fn test_non_zero_exit_is_failure() {
        let dir = TempDir::new().unwrap();
        let err = ProcessRunner::new()
            .run(&sh(&dir, "echo 'no such target' 1>&2; exit 3"))
            .unwrap_err();
        match err {
            Error::ToolFailed { stderr, .. } => assert_eq!(stderr, "no such target"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_program() {
        let dir = TempDir::new().unwrap();
        let err = ProcessRunner::new()
            .run(&ToolInvocation::new("no-such-cmake-here", dir.path()))
            .unwrap_err();
        assert!(matches!(err, Error::ExecutableNotFound(_)));
    }

    #[test]
    fn test_timeout_kills_child() {
        let dir = TempDir::new().unwrap();
        let runner = ProcessRunner::with_timeout(Duration::from_millis(200));
        let started = Instant::now();
        let err = runner.run(&sh(&dir, "exec sleep 10")).unwrap_err();
        assert!(matches!(err, Error::ToolTimeout { .. }));
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
