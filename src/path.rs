use std::path::{Component, Path, PathBuf};

use dirs_next as dirs;

use crate::error::AppError;
use crate::model::ArchiveLocation;

/// Replace the home directory prefix with `~` to make output easier to read.
pub fn display_path(path: &Path) -> String {
    if let Some(home) = dirs::home_dir()
        && let Ok(stripped) = path.strip_prefix(&home)
    {
        let mut display = PathBuf::from("~");
        display.push(stripped);
        return display.display().to_string();
    }

    path.display().to_string()
}

/// Split an archive path into its file name and absolute parent directory,
/// expanding `~` and resolving relative components against the current directory.
pub fn split_archive_path(path: &Path) -> Result<ArchiveLocation, AppError> {
    let cwd = std::env::current_dir()?;
    split_archive_path_from(path, dirs::home_dir().as_deref(), &cwd)
}

pub fn split_archive_path_from(
    path: &Path,
    home: Option<&Path>,
    cwd: &Path,
) -> Result<ArchiveLocation, AppError> {
    let raw = path.to_string_lossy();
    let names_directory =
        matches!(path.components().next_back(), Some(Component::ParentDir | Component::CurDir));
    if raw.is_empty() || raw.ends_with('/') || raw.ends_with("/.") || raw == "." || names_directory
    {
        return Err(AppError::InvalidPath(format!("'{raw}' does not name a file")));
    }

    let expanded = expand_home(path, home)?;
    let absolute = if expanded.is_absolute() { expanded } else { cwd.join(expanded) };
    let normalized = normalize(&absolute);

    let file_name = normalized
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| AppError::InvalidPath(format!("'{raw}' does not name a file")))?;
    let directory =
        normalized.parent().map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("/"));

    Ok(ArchiveLocation { file_name, directory })
}

/// Name of the staging file used when an archive passes through a temporary
/// directory on its way to or from object storage.
pub fn staging_file_name(remote: &str, fallback: &str) -> String {
    let key = remote.split_once("://").map(|(_, rest)| rest).unwrap_or(remote);
    let key = key.split(['?', '#']).next().unwrap_or_default();
    match key.split_once('/') {
        Some((_, object)) => match object.rsplit('/').next() {
            Some(name) if !name.is_empty() && name != "." && name != ".." => name.to_string(),
            _ => fallback.to_string(),
        },
        None => fallback.to_string(),
    }
}

fn expand_home(path: &Path, home: Option<&Path>) -> Result<PathBuf, AppError> {
    let mut components = path.components();
    match components.next() {
        Some(Component::Normal(first)) if first == "~" => {
            let home = home.ok_or_else(|| {
                AppError::config("Unable to expand '~' because the home directory is unknown")
            })?;
            Ok(home.join(components.as_path()))
        }
        _ => Ok(path.to_path_buf()),
    }
}

fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}
