//! Filesystem port.
//!
//! Every generator and the compose synthesizer reach the disk through
//! [`Filesystem`], rooted at the project directory. Paths handed to the port
//! are always relative to that root.

use std::{
    fs::Permissions,
    io::Write,
    path::{Component, Path, PathBuf},
};

use crate::{Error, Overwrite, Result, WriteResult};

/// Port for filesystem operations.
///
/// Implemented by:
/// - [`LocalFilesystem`] (production)
/// - `testing::MemoryFilesystem` (tests, behind the `testing` feature)
pub trait Filesystem {
    /// Check if a file or directory exists.
    fn exists(&self, path: &Path) -> bool;

    /// Check if the path is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Read a whole file as UTF-8.
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Write content to a file, creating parent directories as needed.
    fn write_file(&self, path: &Path, content: &str) -> Result<()>;

    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Names of the immediate entries of a directory, sorted.
    fn list_dir_names(&self, path: &Path) -> Result<Vec<String>>;

    /// Write a file according to an overwrite policy.
    fn write(&self, path: &Path, content: &str, overwrite: Overwrite) -> Result<WriteResult> {
        match overwrite {
            Overwrite::Always => {
                self.write_file(path, content)?;
                Ok(WriteResult::Written)
            }
            Overwrite::IfMissing => {
                if self.exists(path) {
                    tracing::debug!(path = %path.display(), "exists, leaving untouched");
                    Ok(WriteResult::Skipped)
                } else {
                    self.write_file(path, content)?;
                    Ok(WriteResult::Written)
                }
            }
        }
    }
}

/// Normalize a path relative to the project root.
///
/// `.` components are dropped; absolute paths and `..` components are
/// rejected so nothing can be written outside the root.
pub fn normalize(path: &Path) -> Result<PathBuf> {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                return Err(Error::path(path, "parent directory components are not allowed"));
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(Error::path(path, "absolute paths are not allowed"));
            }
        }
    }
    Ok(out)
}

/// Production filesystem rooted at a project directory.
#[derive(Debug, Clone)]
pub struct LocalFilesystem {
    root: PathBuf,
}

impl LocalFilesystem {
    /// Create a filesystem adapter rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The project root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn full(&self, path: &Path) -> Result<PathBuf> {
        Ok(self.root.join(normalize(path)?))
    }
}

impl Filesystem for LocalFilesystem {
    fn exists(&self, path: &Path) -> bool {
        self.full(path).is_ok_and(|p| p.exists())
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.full(path).is_ok_and(|p| p.is_dir())
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        let full = self.full(path)?;
        std::fs::read_to_string(&full).map_err(|e| Error::io("read", full, e))
    }

    fn write_file(&self, path: &Path, content: &str) -> Result<()> {
        let full = self.full(path)?;
        let parent = full
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.root.clone());
        std::fs::create_dir_all(&parent).map_err(|e| Error::io("create directory", &parent, e))?;

        // Write next to the target and rename over it, so readers never see
        // a half-written file.
        let mut tmp = tempfile::NamedTempFile::new_in(&parent)
            .map_err(|e| Error::io("create temporary file in", &parent, e))?;
        tmp.write_all(content.as_bytes())
            .map_err(|e| Error::io("write", &full, e))?;
        // Temporary files are created owner-only.
        if let Some(permissions) = target_permissions(&full) {
            tmp.as_file()
                .set_permissions(permissions)
                .map_err(|e| Error::io("set permissions on", &full, e))?;
        }
        tmp.persist(&full)
            .map_err(|e| Error::io("replace", &full, e.error))?;

        tracing::debug!(path = %path.display(), "wrote file");
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        let full = self.full(path)?;
        std::fs::create_dir_all(&full).map_err(|e| Error::io("create directory", full, e))
    }

    fn list_dir_names(&self, path: &Path) -> Result<Vec<String>> {
        let full = self.full(path)?;
        let entries = std::fs::read_dir(&full).map_err(|e| Error::io("list", &full, e))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Error::io("list", &full, e))?;
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

/// Mode for a rewritten file: the current one, or what a plain create
/// gives under the common 022 umask.
fn target_permissions(full: &Path) -> Option<Permissions> {
    match std::fs::metadata(full) {
        Ok(meta) => Some(meta.permissions()),
        Err(_) => default_permissions(),
    }
}

#[cfg(unix)]
fn default_permissions() -> Option<Permissions> {
    use std::os::unix::fs::PermissionsExt;

    Some(Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<Permissions> {
    None
}
