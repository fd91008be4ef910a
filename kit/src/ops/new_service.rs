//! New service operation - run every generator for one service.

use kitgen_core::{CommandExecutor, LocalFilesystem, Result};
use kitgen_generate::{GenContext, RunReport, ServiceName, run_all};

use super::Project;

pub struct NewServiceOptions<'a> {
    pub name: &'a str,
    /// Go module path; the snake service name when absent.
    pub module: Option<&'a str>,
    /// Register the service in the compose manifest afterwards.
    pub compose: bool,
}

/// Generate a service. Generator failures are collected in the report;
/// only an unusable name is an error.
pub fn new_service(
    project: &Project,
    executor: &dyn CommandExecutor,
    opts: NewServiceOptions,
) -> Result<(ServiceName, RunReport)> {
    let name = ServiceName::new(opts.name)?;
    let fs = LocalFilesystem::new(&project.root);

    let ctx = GenContext::new(&fs, &project.config, executor, name.clone())
        .with_module(opts.module)
        .with_project(project.name());
    let report = run_all(&ctx, opts.compose);
    Ok((name, report))
}

#[cfg(test)]
mod tests {
    use kitgen_core::testing::RecordingExecutor;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_new_service_end_to_end() {
        let temp = TempDir::new().unwrap();
        let project = Project::open(temp.path(), None).unwrap();
        let exec = RecordingExecutor::new();

        let (name, report) = new_service(
            &project,
            &exec,
            NewServiceOptions {
                name: "Payments",
                module: Some("github.com/acme/Payments"),
                compose: true,
            },
        )
        .unwrap();

        assert!(report.is_success());
        assert_eq!(name.snake, "payments");
        assert_eq!(exec.invocations()[0].args[2], "github.com/acme/payments");

        let root = temp.path();
        assert!(root.join("payments/pkg/service/service.go").is_file());
        assert!(root.join("payments/pkg/db/postgres/db.go").is_file());
        let model = std::fs::read_to_string(root.join("payments/pkg/model/base.go")).unwrap();
        assert!(model.contains("\"github.com/acme/payments/pkg/db/postgres\""));

        // Registered, but without a port: no transport handlers yet.
        let manifest = std::fs::read_to_string(root.join("docker-compose.yml")).unwrap();
        assert!(manifest.contains("payments:"));
        assert!(!manifest.contains("8800"));
    }

    #[test]
    fn test_bad_name_is_rejected() {
        let temp = TempDir::new().unwrap();
        let project = Project::open(temp.path(), None).unwrap();

        let err = new_service(
            &project,
            &RecordingExecutor::new(),
            NewServiceOptions {
                name: "../evil",
                module: None,
                compose: false,
            },
        )
        .unwrap_err();
        assert!(matches!(*err, kitgen_core::Error::Configuration { .. }));
    }
}
