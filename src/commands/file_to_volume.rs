use std::path::PathBuf;

use crate::config::Config;
use crate::docker::Docker;
use crate::error::AppError;
use crate::process::CommandRunner;

pub struct FileToVolumeOptions {
    pub path: PathBuf,
    pub volume: String,
}

pub fn execute_file_to_volume(
    options: FileToVolumeOptions,
    runner: &dyn CommandRunner,
    config: &Config,
) -> Result<(), AppError> {
    Docker::new(runner, config).restore_volume(&options.volume, &options.path)
}
