//! New service report.

use kitgen_generate::{RunReport, ServiceName};

use super::{
    SynthesisReport,
    output::{Output, Report},
};

/// Per-generator outcome of `kit new service`.
#[derive(Debug)]
pub struct NewServiceReport<'a> {
    pub name: &'a ServiceName,
    pub module: &'a str,
    pub run: &'a RunReport,
}

impl Report for NewServiceReport<'_> {
    fn render(&self, out: &mut dyn Output) {
        out.key_value("Service", &self.name.snake);
        out.key_value("Module", self.module);

        for step in &self.run.steps {
            out.newline();
            let report = match &step.result {
                Ok(report) => report,
                Err(err) => {
                    out.section(step.generator.name());
                    out.warning(&format!("{} failed: {}", step.generator.name(), err));
                    continue;
                }
            };

            if let Some(compose) = &report.compose {
                SynthesisReport(compose).render(out);
                continue;
            }

            out.section(step.generator.name());
            if report.module_initialized {
                out.added_item("go.mod");
            }
            for file in report.written() {
                out.added_item(&file.path.display().to_string());
            }
            for file in report.skipped() {
                out.list_item(&format!("{} (kept)", file.path.display()));
            }
        }

        let failed = self.run.failures().count();
        if failed > 0 {
            out.newline();
            out.warning(&format!(
                "{} of {} generators failed",
                failed,
                self.run.steps.len()
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use kitgen_core::{Error, WriteResult};
    use kitgen_generate::{FileOutcome, GenerateReport, Generator, StepOutcome};

    use super::*;
    use crate::reports::output::BufferOutput;

    #[test]
    fn test_renders_written_kept_and_failed() {
        let name = ServiceName::new("Shop").unwrap();
        let mut config = GenerateReport::new(Generator::Config);
        config.files = vec![
            FileOutcome {
                path: PathBuf::from("shop/config/config.go"),
                result: WriteResult::Skipped,
            },
            FileOutcome {
                path: PathBuf::from("shop/config/status.yml"),
                result: WriteResult::Written,
            },
        ];
        let run = RunReport {
            steps: vec![
                StepOutcome {
                    generator: Generator::Service,
                    result: Err(Error::configuration("go: not found")),
                },
                StepOutcome {
                    generator: Generator::Config,
                    result: Ok(config),
                },
            ],
        };

        let mut out = BufferOutput::default();
        NewServiceReport {
            name: &name,
            module: "shop",
            run: &run,
        }
        .render(&mut out);

        assert_eq!(
            out.lines,
            vec![
                "Service: shop",
                "Module: shop",
                "",
                "service:",
                "warning: service failed: go: not found",
                "",
                "config:",
                "  + shop/config/status.yml",
                "  - shop/config/config.go (kept)",
                "",
                "warning: 1 of 2 generators failed",
            ]
        );
    }
}
