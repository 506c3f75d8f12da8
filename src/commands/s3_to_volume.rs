use crate::config::Config;
use crate::docker::Docker;
use crate::error::AppError;
use crate::model::RestoreOutcome;
use crate::path::staging_file_name;
use crate::process::CommandRunner;
use crate::s3::S3Client;

pub struct S3ToVolumeOptions {
    pub s3_path: String,
    pub volume: String,
    /// Restore even when the volume already exists.
    pub force: bool,
}

/// Restores a volume from object storage. Without `force` an existing volume
/// is left alone and storage is never contacted, so repeated runs from
/// provisioning tools only restore on the first run.
pub fn execute_s3_to_volume(
    options: S3ToVolumeOptions,
    runner: &dyn CommandRunner,
    config: &Config,
) -> Result<RestoreOutcome, AppError> {
    let docker = Docker::new(runner, config);

    if !options.force && docker.volume_exists(&options.volume)? {
        println!("Volume {} already exists, not restoring.", options.volume);
        return Ok(RestoreOutcome::Skipped);
    }

    let staging_dir = tempfile::Builder::new().prefix("docker-volume-sync").tempdir()?;
    let staging_file = staging_dir
        .path()
        .join(staging_file_name(&options.s3_path, &config.fallback_archive_name));

    S3Client::new(runner, config).get(&options.s3_path, &staging_file)?;
    docker.restore_volume(&options.volume, &staging_file)?;

    Ok(RestoreOutcome::Restored)
}
