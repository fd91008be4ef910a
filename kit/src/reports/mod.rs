//! Report data structures for commands.
//!
//! Commands build reports, then render them to an Output target.

mod compose;
mod new_service;
mod output;

pub use compose::SynthesisReport;
pub use new_service::NewServiceReport;
pub use output::{Report, TerminalOutput};
