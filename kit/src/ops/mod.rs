//! Core operations.
//!
//! The business logic behind each command, separated from argument parsing
//! and output rendering.

pub mod compose;
pub mod new_service;

use std::path::{Path, PathBuf};

use kitgen_config::Config;
use kitgen_core::{Error, Result};

pub use compose::compose;
pub use new_service::{NewServiceOptions, new_service};

/// The project root and its configuration.
#[derive(Debug, Clone)]
pub struct Project {
    pub root: PathBuf,
    pub config: Config,
}

impl Project {
    /// Load `kit.toml` from `config`, or from the root when not given.
    pub fn open(root: &Path, config: Option<&Path>) -> Result<Self> {
        if !root.is_dir() {
            return Err(Error::io(
                "open project root",
                root,
                std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
            ));
        }

        let config = match config {
            Some(path) => kitgen_config::parse_file(path)?,
            None => Config::discover(root)?,
        };
        Ok(Self {
            root: root.to_path_buf(),
            config,
        })
    }

    /// Directory name of the root, used in compose build contexts.
    pub fn name(&self) -> String {
        std::fs::canonicalize(&self.root)
            .ok()
            .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .unwrap_or_default()
    }
}
