//! Compose synthesis report.

use kitgen_compose::{ComposeReport, Registration};

use super::output::{Output, Report};

/// What a synthesis pass did to the manifest.
#[derive(Debug)]
pub struct SynthesisReport<'a>(pub &'a ComposeReport);

impl Report for SynthesisReport<'_> {
    fn render(&self, out: &mut dyn Output) {
        let report = self.0;
        let manifest = report.manifest.display().to_string();

        if !report.manifest_written {
            out.key_value("Up to date", &manifest);
            return;
        }
        out.key_value("Updated", &manifest);

        if !report.registered.is_empty() {
            out.newline();
            out.section(&format!("Registered ({})", report.registered.len()));
            for registration in &report.registered {
                out.added_item(&describe(registration));
            }
        }

        if !report.unchanged.is_empty() {
            out.newline();
            out.section("Already registered");
            for name in &report.unchanged {
                out.list_item(name);
            }
        }

        if !report.dockerfiles.is_empty() {
            out.newline();
            out.section("New Dockerfiles");
            for path in &report.dockerfiles {
                out.added_item(&path.display().to_string());
            }
        }
    }
}

fn describe(registration: &Registration) -> String {
    let mut text = registration.name.clone();
    for port in &registration.ports {
        text.push_str(&format!(
            " {}={}:{}",
            port.transport.as_str(),
            port.host,
            port.container
        ));
    }
    if registration.external {
        text.push_str(" (own Dockerfile)");
    }
    text
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use kitgen_compose::{PortBinding, Transport};

    use super::*;
    use crate::reports::output::BufferOutput;

    #[test]
    fn test_renders_ports_per_service() {
        let report = ComposeReport {
            manifest: PathBuf::from("docker-compose.yml"),
            manifest_written: true,
            registered: vec![Registration {
                name: "billing".into(),
                external: false,
                build_context: "/go/src/shop/billing".into(),
                ports: vec![
                    PortBinding {
                        transport: Transport::Http,
                        host: 8801,
                        container: 8081,
                    },
                    PortBinding {
                        transport: Transport::Grpc,
                        host: 8802,
                        container: 8082,
                    },
                ],
            }],
            unchanged: vec!["auth".into()],
            dockerfiles: vec![PathBuf::from("billing/Dockerfile")],
        };

        let mut out = BufferOutput::default();
        SynthesisReport(&report).render(&mut out);

        assert_eq!(
            out.lines,
            vec![
                "Updated: docker-compose.yml",
                "",
                "Registered (1):",
                "  + billing http=8801:8081 grpc=8802:8082",
                "",
                "Already registered:",
                "  - auth",
                "",
                "New Dockerfiles:",
                "  + billing/Dockerfile",
            ]
        );
    }

    #[test]
    fn test_unchanged_manifest_is_one_line() {
        let report = ComposeReport {
            manifest: PathBuf::from("docker-compose.yml"),
            manifest_written: false,
            registered: Vec::new(),
            unchanged: vec!["auth".into()],
            dockerfiles: Vec::new(),
        };

        let mut out = BufferOutput::default();
        SynthesisReport(&report).render(&mut out);
        assert_eq!(out.lines, vec!["Up to date: docker-compose.yml"]);
    }
}
