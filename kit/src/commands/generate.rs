use clap::{Args, Subcommand};
use eyre::Result;

use super::{GlobalArgs, UnwrapOrExit};
use crate::{
    ops::{self, Project},
    reports::{Report, SynthesisReport, TerminalOutput},
};

#[derive(Args)]
pub struct GenerateCommand {
    #[command(subcommand)]
    target: GenerateTarget,
}

#[derive(Subcommand)]
enum GenerateTarget {
    /// Register every service directory in docker-compose.yml
    Compose,
}

impl GenerateCommand {
    pub fn run(&self, global: &GlobalArgs) -> Result<()> {
        match self.target {
            GenerateTarget::Compose => {
                let project =
                    Project::open(&global.root, global.config.as_deref()).unwrap_or_exit();
                let report = ops::compose(&project).unwrap_or_exit();
                SynthesisReport(&report).render(&mut TerminalOutput::new());
                Ok(())
            }
        }
    }
}
