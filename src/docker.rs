use std::fs;
use std::path::Path;

use crate::config::Config;
use crate::error::AppError;
use crate::model::{ImageSource, SaveOutcome};
use crate::path::{display_path, split_archive_path};
use crate::process::{CommandRunner, ExternalCommand, OutputMode};

/// Volume operations carried out through the docker CLI and a throwaway container.
pub struct Docker<'a> {
    runner: &'a dyn CommandRunner,
    config: &'a Config,
}

impl<'a> Docker<'a> {
    pub fn new(runner: &'a dyn CommandRunner, config: &'a Config) -> Self {
        Self { runner, config }
    }

    fn command(&self) -> ExternalCommand {
        ExternalCommand::new(&self.config.docker_bin)
    }

    pub fn list_volumes(&self) -> Result<Vec<String>, AppError> {
        let command = self.command().args(["volume", "ls", "-q"]);
        let output = self.runner.run(&command, OutputMode::Capture)?;
        Ok(output.stdout_lines().map(str::to_string).collect())
    }

    pub fn volume_exists(&self, name: &str) -> Result<bool, AppError> {
        let exists = self.list_volumes()?.iter().any(|volume| volume == name);
        tracing::debug!("volume '{name}' exists: {exists}");
        Ok(exists)
    }

    /// Makes sure the helper image is available and returns its name.
    pub fn provision_image(&self) -> Result<&'a str, AppError> {
        let config: &'a Config = self.config;
        let image = &config.image;
        if let ImageSource::Build { tag, .. } = image
            && let Some(dockerfile) = image.dockerfile()
        {
            let context = tempfile::Builder::new().prefix("docker-volume-sync-build").tempdir()?;
            fs::write(context.path().join("Dockerfile"), dockerfile)?;

            let command =
                self.command().args(["build", "-t", tag.as_str(), "."]).current_dir(context.path());
            self.runner.run(&command, OutputMode::Stream)?;
        }
        Ok(image.image_name())
    }

    /// Archives the whole volume into `path`. Skipped with a warning when the
    /// volume does not exist.
    pub fn save_volume(&self, volume: &str, path: &Path) -> Result<SaveOutcome, AppError> {
        if !self.volume_exists(volume)? {
            tracing::warn!("Volume `{volume}` does not exist, not saving.");
            return Ok(SaveOutcome::Skipped);
        }

        let location = split_archive_path(path)?;
        fs::create_dir_all(&location.directory)?;
        let image = self.provision_image()?;

        println!("Saving volume {volume} to path {}", display_path(&location.host_path()));

        let data = &self.config.data_mount;
        let staging = &self.config.staging_mount;
        let command = self.command().args([
            "run".to_string(),
            "--rm".to_string(),
            "-v".to_string(),
            format!("{volume}:{data}"),
            "-v".to_string(),
            format!("{}:{staging}", location.directory.display()),
            image.to_string(),
            "tar".to_string(),
            self.config.compression.create_flags().to_string(),
            location.container_path(staging),
            "-C".to_string(),
            data.clone(),
            ".".to_string(),
        ]);
        self.runner.run(&command, OutputMode::Stream)?;

        Ok(SaveOutcome::Saved)
    }

    /// Extracts the archive at `path` into `volume`, on top of whatever the
    /// volume already holds.
    pub fn restore_volume(&self, volume: &str, path: &Path) -> Result<(), AppError> {
        let location = split_archive_path(path)?;
        let archive = location.host_path();
        if !archive.is_file() {
            return Err(AppError::ArchiveNotFound(archive));
        }
        let image = self.provision_image()?;

        println!("Restoring {} into volume {volume}", display_path(&archive));

        let data = &self.config.data_mount;
        let staging = &self.config.staging_mount;
        let command = self.command().args([
            "run".to_string(),
            "--rm".to_string(),
            "-v".to_string(),
            format!("{volume}:{data}"),
            "-v".to_string(),
            format!("{}:{staging}:ro", location.directory.display()),
            image.to_string(),
            "tar".to_string(),
            self.config.compression.extract_flags().to_string(),
            location.container_path(staging),
            "-C".to_string(),
            data.clone(),
        ]);
        self.runner.run(&command, OutputMode::Stream)?;

        Ok(())
    }
}
