//! Runs the generators for one new service.

use kitgen_core::Result;

use crate::{GenContext, GenerateReport, Generator};

/// One generator's result.
#[derive(Debug)]
pub struct StepOutcome {
    pub generator: Generator,
    pub result: Result<GenerateReport>,
}

/// Results of every generator that ran, in run order.
#[derive(Debug, Default)]
pub struct RunReport {
    pub steps: Vec<StepOutcome>,
}

impl RunReport {
    pub fn failures(&self) -> impl Iterator<Item = &StepOutcome> {
        self.steps.iter().filter(|step| step.result.is_err())
    }

    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }
}

/// Run every artifact generator, then compose unless `compose` is false.
///
/// A failing generator is logged and recorded; the others still run.
pub fn run_all(ctx: &GenContext, compose: bool) -> RunReport {
    let mut generators = Generator::ARTIFACTS.to_vec();
    if compose {
        generators.push(Generator::Compose);
    }

    let mut report = RunReport::default();
    for generator in generators {
        tracing::debug!(generator = generator.name(), service = %ctx.name.raw, "running");
        let result = generator.generate(ctx);
        if let Err(err) = &result {
            tracing::error!(generator = generator.name(), error = %err, "generator failed");
        }
        report.steps.push(StepOutcome { generator, result });
    }
    report
}

#[cfg(test)]
mod tests {
    use kitgen_config::{Config, PathTemplate};
    use kitgen_core::testing::{MemoryFilesystem, RecordingExecutor};

    use super::*;
    use crate::ServiceName;

    #[test]
    fn test_failure_does_not_stop_siblings() {
        let fs = MemoryFilesystem::new();
        let exec = RecordingExecutor::failing("go: not found");
        let mut config = Config::default();
        config.paths.postgres = PathTemplate::new("db/{name}");
        let ctx = GenContext::new(&fs, &config, &exec, ServiceName::new("shop").unwrap());

        let report = run_all(&ctx, true);

        let failed: Vec<_> = report.failures().map(|s| s.generator).collect();
        assert_eq!(failed, vec![Generator::Service, Generator::Model]);
        assert!(!report.is_success());
        assert_eq!(report.steps.len(), 6);

        assert!(fs.file("shop/config/config.go").is_some());
        assert!(fs.file("db/shop/db.go").is_some());
        assert!(fs.file("shop/pkg/service/service.go").is_none());
    }

    #[test]
    fn test_no_compose() {
        let fs = MemoryFilesystem::new();
        let exec = RecordingExecutor::new();
        let config = Config::default();
        let ctx = GenContext::new(&fs, &config, &exec, ServiceName::new("shop").unwrap());

        let report = run_all(&ctx, false);
        assert!(report.is_success());
        assert!(report.steps.iter().all(|s| s.generator != Generator::Compose));
        assert!(fs.file("docker-compose.yml").is_none());
    }
}
