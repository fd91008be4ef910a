use clap::{Args, Subcommand};
use eyre::{Result, bail};
use kitgen_core::ProcessExecutor;

use super::{GlobalArgs, UnwrapOrExit};
use crate::{
    ops::{self, NewServiceOptions, Project},
    reports::{NewServiceReport, Report, TerminalOutput},
};

#[derive(Args)]
pub struct NewCommand {
    #[command(subcommand)]
    target: NewTarget,
}

#[derive(Subcommand)]
enum NewTarget {
    /// Scaffold a Go service and register it in docker-compose.yml
    Service(NewServiceArgs),
}

#[derive(Args)]
struct NewServiceArgs {
    /// Service name (any case; directories use snake_case)
    name: String,

    /// Go module path (defaults to the service name)
    #[arg(short, long)]
    module: Option<String>,

    /// Skip docker-compose registration
    #[arg(long)]
    no_compose: bool,
}

impl NewCommand {
    pub fn run(&self, global: &GlobalArgs) -> Result<()> {
        match &self.target {
            NewTarget::Service(args) => args.run(global),
        }
    }
}

impl NewServiceArgs {
    fn run(&self, global: &GlobalArgs) -> Result<()> {
        let project = Project::open(&global.root, global.config.as_deref()).unwrap_or_exit();

        let executor = ProcessExecutor::new(&project.root);

        let (name, run) = ops::new_service(
            &project,
            &executor,
            NewServiceOptions {
                name: &self.name,
                module: self.module.as_deref(),
                compose: !self.no_compose,
            },
        )
        .unwrap_or_exit();

        let module = name.module(self.module.as_deref());
        NewServiceReport {
            name: &name,
            module: &module,
            run: &run,
        }
        .render(&mut TerminalOutput::new());

        if !run.is_success() {
            bail!("service '{}' is incomplete", name.snake);
        }
        Ok(())
    }
}
