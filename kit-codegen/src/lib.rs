//! Go source assembly for the kit service scaffolder.
//!
//! Generators describe a Go file as declarations holding semantic type and
//! symbol references; [`GoFile`] renders it with a minimal, sorted import
//! block and tab indentation.
//!
//! # Module Organization
//!
//! - [`builder`] - Indented text building blocks (CodeBuilder, CodeFragment, etc.)
//! - [`ast`] - Go declarations (Struct, Interface, Func, Var, Const)
//! - [`imports`] - Import table and alias assignment

pub mod ast;
pub mod builder;
mod go_file;
pub mod imports;

pub use go_file::GoFile;
