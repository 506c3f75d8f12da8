use std::path::Path;

use crate::config::Config;
use crate::error::AppError;
use crate::process::{CommandRunner, ExternalCommand, OutputMode};

/// Object storage transfers delegated to `s3cmd`.
pub struct S3Client<'a> {
    runner: &'a dyn CommandRunner,
    program: &'a str,
}

impl<'a> S3Client<'a> {
    pub fn new(runner: &'a dyn CommandRunner, config: &'a Config) -> Self {
        Self { runner, program: &config.s3cmd_bin }
    }

    pub fn put(&self, local: &Path, remote: &str) -> Result<(), AppError> {
        let command = ExternalCommand::new(self.program)
            .arg("put")
            .arg(local.to_string_lossy())
            .arg(remote);
        self.runner.run(&command, OutputMode::Stream)?;
        Ok(())
    }

    pub fn get(&self, remote: &str, local: &Path) -> Result<(), AppError> {
        let command = ExternalCommand::new(self.program)
            .arg("get")
            .arg(remote)
            .arg(local.to_string_lossy());
        self.runner.run(&command, OutputMode::Stream)?;
        Ok(())
    }
}
