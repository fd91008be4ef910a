//! Compose operation - register every service in the manifest.

use kitgen_compose::{ComposeReport, Synthesizer};
use kitgen_core::{LocalFilesystem, Result};

use super::Project;

pub fn compose(project: &Project) -> Result<ComposeReport> {
    let fs = LocalFilesystem::new(&project.root);
    Synthesizer::new(&fs, &project.config, project.name()).run()
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_compose_registers_service_dirs() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("billing/pkg/service");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("service.go"), "package service\n").unwrap();

        let project = Project::open(temp.path(), None).unwrap();
        let report = compose(&project).unwrap();

        assert_eq!(report.registered.len(), 1);
        assert_eq!(report.registered[0].name, "billing");
        assert!(temp.path().join("docker-compose.yml").is_file());
        assert!(temp.path().join("billing/Dockerfile").is_file());
    }
}
