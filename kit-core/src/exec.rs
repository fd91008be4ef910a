//! External command port.

use std::{
    path::{Path, PathBuf},
    process::Command,
};

use crate::{Error, Result, fs::normalize};

/// Port for running external toolchain commands.
pub trait CommandExecutor {
    /// Run `program args..` inside `dir` (relative to the project root).
    fn run(&self, dir: &Path, program: &str, args: &[&str]) -> Result<()>;
}

/// Runs commands as child processes.
#[derive(Debug, Clone)]
pub struct ProcessExecutor {
    root: PathBuf,
}

impl ProcessExecutor {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl CommandExecutor for ProcessExecutor {
    fn run(&self, dir: &Path, program: &str, args: &[&str]) -> Result<()> {
        let cwd = self.root.join(normalize(dir)?);
        let command = std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        tracing::debug!(%command, dir = %cwd.display(), "running");

        let output = Command::new(program)
            .args(args)
            .current_dir(&cwd)
            .output()
            .map_err(|e| Error::io("spawn command in", &cwd, e))?;

        if output.status.success() {
            Ok(())
        } else {
            Err(Box::new(Error::Toolchain {
                command,
                dir: dir.to_path_buf(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }))
        }
    }
}
