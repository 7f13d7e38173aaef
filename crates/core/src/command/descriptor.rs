use serde::{Deserialize, Serialize};
use std::io::{self, BufRead, BufReader, Read};
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};
use std::sync::mpsc;
use std::thread;

use crate::error::{Error, Result};
use crate::patterns::{Diagnostic, ErrorMatcher};

/// A planned invocation of the build tool that the host can execute.
///
/// Descriptors are plain data. A discovery pass produces a fresh list and
/// never mutates a previously returned one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetDescriptor {
    /// Host command identifier, `cmake:<name>`
    pub command_name: String,
    pub name: String,
    pub exec: String,
    pub cwd: PathBuf,
    pub args: Vec<String>,
    /// Patterns for scraping diagnostics out of the tool output
    pub error_match: Vec<String>,
    /// Whether the host should run it through a shell; discovered targets never do
    pub sh: bool,
}

/// Outcome of running a descriptor
#[derive(Debug)]
pub struct ExecutionReport {
    pub status: ExitStatus,
    pub diagnostics: Vec<Diagnostic>,
}

impl ExecutionReport {
    pub fn success(&self) -> bool {
        self.status.success()
    }
}

impl TargetDescriptor {
    pub fn new(name: impl Into<String>, exec: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        let name = name.into();
        Self {
            command_name: format!("cmake:{name}"),
            name,
            exec: exec.into(),
            cwd: cwd.into(),
            args: Vec::new(),
            error_match: Vec::new(),
            sh: false,
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn with_error_match<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.error_match.extend(patterns.into_iter().map(Into::into));
        self
    }

    /// The invocation as a POSIX shell command line, for display
    pub fn to_shell_command(&self) -> String {
        let mut cmd = quote(&self.exec);
        for arg in &self.args {
            cmd.push(' ');
            cmd.push_str(&quote(arg));
        }
        cmd
    }

    /// Run the descriptor, passing every output line to `on_line` and
    /// collecting the diagnostics its error patterns recognize.
    pub fn execute_with<F>(&self, mut on_line: F) -> Result<ExecutionReport>
    where
        F: FnMut(&str),
    {
        let matcher = ErrorMatcher::new(&self.error_match)?;

        let mut child = Command::new(&self.exec)
            .args(&self.args)
            .current_dir(&self.cwd)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        let (tx, rx) = mpsc::channel::<String>();
        let mut readers = Vec::new();
        if let Some(stdout) = child.stdout.take() {
            readers.push(forward_lines(stdout, tx.clone()));
        }
        if let Some(stderr) = child.stderr.take() {
            readers.push(forward_lines(stderr, tx.clone()));
        }
        drop(tx);

        let mut diagnostics = Vec::new();
        for line in rx {
            on_line(&line);
            if let Some(diagnostic) = matcher.scan_line(&line) {
                diagnostics.push(diagnostic);
            }
        }

        for reader in readers {
            let _ = reader.join();
        }
        let status = child.wait()?;
        tracing::debug!(
            "{} finished with {} ({} diagnostics)",
            self.command_name,
            status,
            diagnostics.len()
        );

        Ok(ExecutionReport {
            status,
            diagnostics,
        })
    }

    fn spawn_error(&self, e: io::Error) -> Error {
        if e.kind() == io::ErrorKind::NotFound {
            Error::ExecutableNotFound(self.exec.clone())
        } else {
            Error::IoError(e)
        }
    }
}

fn forward_lines<R>(source: R, tx: mpsc::Sender<String>) -> thread::JoinHandle<()>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        for line in BufReader::new(source).lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    })
}

/// Quote `arg` for a POSIX shell unless it only holds characters the shell
/// leaves alone
fn quote(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=@%+,".contains(c));
    if plain {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}
