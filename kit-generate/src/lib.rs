//! Generators for the Go artifacts of a new service.
//!
//! Each [`Generator`] is independently invokable and independently fallible;
//! [`run_all`] runs them best effort and finishes with compose synthesis.

mod context;
mod driver;
mod generator;
mod module;

pub mod files;

pub use context::{GenContext, ServiceName};
pub use driver::{RunReport, StepOutcome, run_all};
pub use generator::{FileOutcome, GenerateReport, Generator};
pub use module::{GO_MOD, ensure_module};
