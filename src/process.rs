//! Thin layer over `std::process` so that every external tool invocation is
//! echoed, checked for a non-zero exit, and replaceable in tests.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalCommand {
    program: String,
    args: Vec<String>,
    cwd: Option<PathBuf>,
}

impl ExternalCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into(), args: Vec::new(), cwd: None }
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

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    pub fn get_current_dir(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }
}

impl fmt::Display for ExternalCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", quote(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", quote(arg))?;
        }
        Ok(())
    }
}

fn quote(value: &str) -> String {
    let plain = !value.is_empty()
        && value.chars().all(|c| c.is_ascii_alphanumeric() || "-_./:=@,+%~".contains(c));
    if plain { value.to_string() } else { format!("'{}'", value.replace('\'', r"'\''")) }
}

/// Whether the child's output is collected or passed through to the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Capture,
    Stream,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn stdout_lines(&self) -> impl Iterator<Item = &str> {
        self.stdout.lines().map(str::trim).filter(|line| !line.is_empty())
    }
}

pub trait CommandRunner {
    /// Runs `command` to completion. A non-zero exit is an error.
    fn run(&self, command: &ExternalCommand, mode: OutputMode) -> Result<CommandOutput, AppError>;
}

/// Runs commands on the host.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, command: &ExternalCommand, mode: OutputMode) -> Result<CommandOutput, AppError> {
        tracing::info!("$ {command}");

        let mut process = Command::new(command.program());
        process.args(command.get_args());
        if let Some(dir) = command.get_current_dir() {
            tracing::debug!("working directory: {}", dir.display());
            process.current_dir(dir);
        }

        let launch_error =
            |source| AppError::Launch { program: command.program().to_string(), source };

        let (status, output) = match mode {
            OutputMode::Capture => {
                let output = process.stdin(Stdio::null()).output().map_err(launch_error)?;
                let captured = CommandOutput {
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                };
                (output.status, captured)
            }
            OutputMode::Stream => {
                let status = process.status().map_err(launch_error)?;
                (status, CommandOutput::default())
            }
        };

        if status.success() {
            Ok(output)
        } else {
            tracing::debug!("'{command}' exited with {status}");
            Err(AppError::CommandFailed {
                command: command.to_string(),
                code: status.code(),
                stderr: output.stderr,
            })
        }
    }
}
