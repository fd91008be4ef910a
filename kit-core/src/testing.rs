//! Test doubles for the filesystem and command ports.
//!
//! This module is only available when the `testing` feature is enabled
//! or during tests.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::{PoisonError, RwLock},
};

use crate::{CommandExecutor, Error, Filesystem, Result, fs::normalize};

/// In-memory filesystem for testing.
#[derive(Debug, Default)]
pub struct MemoryFilesystem {
    inner: RwLock<MemoryFilesystemInner>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, String>,
    directories: BTreeSet<PathBuf>,
    writes: usize,
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file, creating its parent directories.
    pub fn with_file(self, path: impl AsRef<Path>, content: &str) -> Self {
        self.seed(path.as_ref(), content);
        self
    }

    /// Seed a directory.
    pub fn with_dir(self, path: impl AsRef<Path>) -> Self {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        insert_dirs(&mut inner.directories, path.as_ref());
        drop(inner);
        self
    }

    /// Seed a file without counting it as a write.
    pub fn seed(&self, path: &Path, content: &str) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(parent) = path.parent() {
            insert_dirs(&mut inner.directories, parent);
        }
        inner.files.insert(path.to_path_buf(), content.to_string());
    }

    /// Read a file's content (testing helper).
    pub fn file(&self, path: impl AsRef<Path>) -> Option<String> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.files.get(path.as_ref()).cloned()
    }

    /// All file paths, sorted.
    pub fn files(&self) -> Vec<PathBuf> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.files.keys().cloned().collect()
    }

    /// Number of writes performed through the port.
    pub fn write_count(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .writes
    }
}

fn insert_dirs(directories: &mut BTreeSet<PathBuf>, path: &Path) {
    let mut current = PathBuf::new();
    for component in path.components() {
        current.push(component);
        directories.insert(current.clone());
    }
}

impl Filesystem for MemoryFilesystem {
    fn exists(&self, path: &Path) -> bool {
        let Ok(path) = normalize(path) else {
            return false;
        };
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        path.as_os_str().is_empty()
            || inner.files.contains_key(&path)
            || inner.directories.contains(&path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        let Ok(path) = normalize(path) else {
            return false;
        };
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        path.as_os_str().is_empty() || inner.directories.contains(&path)
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        let path = normalize(path)?;
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.files.get(&path).cloned().ok_or_else(|| {
            Error::io(
                "read",
                &path,
                std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            )
        })
    }

    fn write_file(&self, path: &Path, content: &str) -> Result<()> {
        let path = normalize(path)?;
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(parent) = path.parent() {
            insert_dirs(&mut inner.directories, parent);
        }
        inner.files.insert(path, content.to_string());
        inner.writes += 1;
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        let path = normalize(path)?;
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        insert_dirs(&mut inner.directories, &path);
        Ok(())
    }

    fn list_dir_names(&self, path: &Path) -> Result<Vec<String>> {
        let path = normalize(path)?;
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        if !path.as_os_str().is_empty() && !inner.directories.contains(&path) {
            return Err(Error::io(
                "list",
                &path,
                std::io::Error::new(std::io::ErrorKind::NotFound, "no such directory"),
            ));
        }

        let children: BTreeSet<String> = inner
            .directories
            .iter()
            .chain(inner.files.keys())
            .filter(|p| p.parent() == Some(path.as_path()))
            .filter_map(|p| p.file_name()?.to_str().map(str::to_string))
            .collect();
        Ok(children.into_iter().collect())
    }
}

/// A recorded command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub dir: PathBuf,
    pub program: String,
    pub args: Vec<String>,
}

/// Command executor that records invocations instead of spawning processes.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    invocations: RwLock<Vec<Invocation>>,
    fail_with: Option<String>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every invocation fail with the given stderr.
    pub fn failing(stderr: impl Into<String>) -> Self {
        Self {
            invocations: RwLock::default(),
            fail_with: Some(stderr.into()),
        }
    }

    /// Invocations seen so far.
    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl CommandExecutor for RecordingExecutor {
    fn run(&self, dir: &Path, program: &str, args: &[&str]) -> Result<()> {
        self.invocations
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Invocation {
                dir: dir.to_path_buf(),
                program: program.to_string(),
                args: args.iter().map(|a| a.to_string()).collect(),
            });

        match &self.fail_with {
            Some(stderr) => Err(Box::new(Error::Toolchain {
                command: format!("{} {}", program, args.join(" ")),
                dir: dir.to_path_buf(),
                stderr: stderr.clone(),
            })),
            None => Ok(()),
        }
    }
}
