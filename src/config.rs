use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use dirs_next as dirs;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::model::{Compression, ImageSource};

const APP_DIR: &str = "docker-volume-sync";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Container runtime CLI.
    pub docker_bin: String,
    /// Object storage CLI.
    pub s3cmd_bin: String,
    pub compression: Compression,
    /// Where the volume is mounted inside the helper container.
    pub data_mount: String,
    /// Where the archive's host directory is mounted inside the helper container.
    pub staging_mount: String,
    /// Staging file name used when an S3 URL has no object name.
    pub fallback_archive_name: String,
    pub image: ImageSource,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            docker_bin: "docker".to_string(),
            s3cmd_bin: "s3cmd".to_string(),
            compression: Compression::Auto,
            data_mount: "/data".to_string(),
            staging_mount: "/tmp".to_string(),
            fallback_archive_name: "volume.tar.gz".to_string(),
            image: ImageSource::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        let path = config_file_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self, AppError> {
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            let config: Config = toml::from_str(&contents)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), AppError> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let mut file = fs::File::create(path)?;
        let contents = self.to_toml()?;
        file.write_all(contents.as_bytes())?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String, AppError> {
        Ok(toml::to_string_pretty(self)?)
    }

    fn validate(&self) -> Result<(), AppError> {
        for (key, value) in [
            ("docker_bin", self.docker_bin.as_str()),
            ("s3cmd_bin", self.s3cmd_bin.as_str()),
            ("data_mount", self.data_mount.as_str()),
            ("staging_mount", self.staging_mount.as_str()),
            ("fallback_archive_name", self.fallback_archive_name.as_str()),
            ("image", self.image.image_name()),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::config(format!("'{key}' must not be empty")));
            }
        }

        for (key, mount) in [("data_mount", &self.data_mount), ("staging_mount", &self.staging_mount)]
        {
            if !mount.starts_with('/') {
                return Err(AppError::config(format!(
                    "'{key}' must be an absolute container path, got '{mount}'"
                )));
            }
        }

        if self.data_mount.trim_end_matches('/') == self.staging_mount.trim_end_matches('/') {
            return Err(AppError::config("'data_mount' and 'staging_mount' must differ"));
        }

        Ok(())
    }
}

pub fn config_file_path() -> Result<PathBuf, AppError> {
    let config_root = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(dirs::config_dir)
        .ok_or_else(|| {
            AppError::config("Unable to determine configuration directory for this platform")
        })?;
    Ok(config_root.join(APP_DIR).join("config.toml"))
}

pub fn ensure_config_file() -> Result<PathBuf, AppError> {
    let path = config_file_path()?;
    if !path.exists() {
        Config::default().save_to(&path)?;
    }
    Ok(path)
}
