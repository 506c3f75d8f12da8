use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Application-wide error type for docker-volume-sync.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Failed to write configuration: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("Failed to launch '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("'{command}' {}{}", exit_description(.code), stderr_suffix(.stderr))]
    CommandFailed { command: String, code: Option<i32>, stderr: String },

    #[error("Archive not found: {}", .0.display())]
    ArchiveNotFound(PathBuf),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Unknown compression mode '{0}' (expected 'auto' or 'none')")]
    InvalidCompression(String),

    #[error("Failed to launch editor: {0}")]
    Editor(String),
}

impl AppError {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        AppError::Config(msg.into())
    }
}

fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exited with status {code}"),
        None => "was terminated by a signal".to_string(),
    }
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() { String::new() } else { format!(": {trimmed}") }
}
