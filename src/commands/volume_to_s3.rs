use crate::config::Config;
use crate::docker::Docker;
use crate::error::AppError;
use crate::model::SaveOutcome;
use crate::path::staging_file_name;
use crate::process::CommandRunner;
use crate::s3::S3Client;

pub struct VolumeToS3Options {
    pub volume: String,
    pub s3_path: String,
}

pub fn execute_volume_to_s3(
    options: VolumeToS3Options,
    runner: &dyn CommandRunner,
    config: &Config,
) -> Result<SaveOutcome, AppError> {
    // Removed on drop, including when `?` returns early.
    let staging_dir = tempfile::Builder::new().prefix("docker-volume-sync").tempdir()?;
    let staging_file = staging_dir
        .path()
        .join(staging_file_name(&options.s3_path, &config.fallback_archive_name));
    tracing::debug!("staging archive at {}", staging_file.display());

    let outcome = Docker::new(runner, config).save_volume(&options.volume, &staging_file)?;
    if outcome == SaveOutcome::Skipped {
        println!("Nothing to upload to {}.", options.s3_path);
        return Ok(outcome);
    }

    S3Client::new(runner, config).put(&staging_file, &options.s3_path)?;
    println!("Uploaded volume {} to {}", options.volume, options.s3_path);

    Ok(outcome)
}
