use std::path::PathBuf;

use crate::config::Config;
use crate::docker::Docker;
use crate::error::AppError;
use crate::model::SaveOutcome;
use crate::process::CommandRunner;

pub struct VolumeToFileOptions {
    pub volume: String,
    pub path: PathBuf,
}

pub fn execute_volume_to_file(
    options: VolumeToFileOptions,
    runner: &dyn CommandRunner,
    config: &Config,
) -> Result<SaveOutcome, AppError> {
    Docker::new(runner, config).save_volume(&options.volume, &options.path)
}
