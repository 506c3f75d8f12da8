use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// How tar treats compression inside the helper container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    /// Let tar pick the compressor from the archive extension (`-a`).
    #[default]
    Auto,
    /// Plain, uncompressed tar.
    None,
}

impl Compression {
    pub fn from_name(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "auto" => Some(Compression::Auto),
            "none" | "plain" => Some(Compression::None),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Compression::Auto => "auto",
            Compression::None => "none",
        }
    }

    pub fn create_flags(&self) -> &'static str {
        match self {
            Compression::Auto => "-caf",
            Compression::None => "-cf",
        }
    }

    pub fn extract_flags(&self) -> &'static str {
        match self {
            Compression::Auto => "-xaf",
            Compression::None => "-xf",
        }
    }
}

impl std::str::FromStr for Compression {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Compression::from_name(s).ok_or_else(|| AppError::InvalidCompression(s.to_string()))
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where the container image used for tar operations comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum ImageSource {
    /// Build a local helper image on every save/restore.
    Build { tag: String, base: String, packages: Vec<String> },
    /// Use a published image as-is.
    Prebuilt { image: String },
}

impl ImageSource {
    /// Name passed to `docker run`.
    pub fn image_name(&self) -> &str {
        match self {
            ImageSource::Build { tag, .. } => tag,
            ImageSource::Prebuilt { image } => image,
        }
    }

    /// Dockerfile contents for the `Build` variant.
    pub fn dockerfile(&self) -> Option<String> {
        match self {
            ImageSource::Build { base, packages, .. } => {
                let mut contents = format!("FROM {base}");
                if !packages.is_empty() {
                    contents.push_str("\nRUN apk add -U ");
                    contents.push_str(&packages.join(" "));
                }
                Some(contents)
            }
            ImageSource::Prebuilt { .. } => None,
        }
    }
}

impl Default for ImageSource {
    fn default() -> Self {
        ImageSource::Build {
            tag: "jt-docker-volume-backup".to_string(),
            base: "alpine:latest".to_string(),
            packages: vec!["xz".to_string(), "gzip".to_string(), "tar".to_string()],
        }
    }
}

/// An archive path split into the pieces needed to bind-mount it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveLocation {
    pub file_name: String,
    pub directory: PathBuf,
}

impl ArchiveLocation {
    /// Path of the archive as seen from inside a container that mounts
    /// `directory` at `staging_mount`.
    pub fn container_path(&self, staging_mount: &str) -> String {
        format!("{}/{}", staging_mount.trim_end_matches('/'), self.file_name)
    }

    pub fn host_path(&self) -> PathBuf {
        self.directory.join(&self.file_name)
    }
}

/// Result of a save that may be skipped by its existence guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    Skipped,
}

/// Result of a restore that may be skipped because the volume already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    Restored,
    Skipped,
}
