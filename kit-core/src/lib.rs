//! Core utilities and types for the kit service scaffolder.
//!
//! This crate provides the error taxonomy, the filesystem and command ports,
//! and the write policy shared by the generators and the compose synthesizer.

// thiserror/miette derive false positive (fields read by the derived impls)
#![allow(unused_assignments)]

mod error;
mod exec;
mod file;
mod fs;
mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Errors
pub use error::{Error, Result};
// External command port
pub use exec::{CommandExecutor, ProcessExecutor};
// File operations
pub use file::{File, FileRules, GENERATED_HEADER, GeneratedFile, Overwrite, WriteResult};
// Filesystem port
pub use fs::{Filesystem, LocalFilesystem, normalize};
// String utilities
pub use utils::{to_camel_case, to_lower_snake_case};
