use std::path::PathBuf;

use kitgen_config::Config;
use kitgen_core::{File, Filesystem, GeneratedFile, Result, WriteResult};

use crate::{
    discovery::{DiscoveredService, discover},
    dockerfile,
    manifest::{
        Command, ComposeManifest, Environment, Networks, PortSpec, ServiceEntry, VolumeSpec,
    },
    ports::PortAllocator,
};

/// Named volume shared by every service for the Go module cache.
pub const GOPATH_VOLUME: &str = "shared_gopath";

/// A transport a service exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Http,
    Grpc,
}

impl Transport {
    pub fn as_str(&self) -> &'static str {
        match self {
            Transport::Http => "http",
            Transport::Grpc => "grpc",
        }
    }
}

/// A host port published for one transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortBinding {
    pub transport: Transport,
    pub host: u16,
    pub container: u16,
}

/// A service added to the manifest by this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub name: String,
    /// Built from its own Dockerfile rather than a synthesized one.
    pub external: bool,
    pub build_context: String,
    pub ports: Vec<PortBinding>,
}

/// What a synthesis run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposeReport {
    pub manifest: PathBuf,
    pub manifest_written: bool,
    pub registered: Vec<Registration>,
    /// Services already in the manifest, left as they were.
    pub unchanged: Vec<String>,
    pub dockerfiles: Vec<PathBuf>,
}

/// Everything a run will write, computed before touching the disk.
#[derive(Debug)]
pub struct Plan {
    manifest: ComposeManifest,
    changed: bool,
    dockerfiles: Vec<File>,
    report: ComposeReport,
}

impl Plan {
    pub fn manifest(&self) -> &ComposeManifest {
        &self.manifest
    }

    pub fn report(&self) -> &ComposeReport {
        &self.report
    }
}

/// Merges discovered services into the compose manifest.
pub struct Synthesizer<'a> {
    fs: &'a dyn Filesystem,
    config: &'a Config,
    project: String,
}

impl<'a> Synthesizer<'a> {
    /// `project` is the project directory name, used in build contexts.
    pub fn new(fs: &'a dyn Filesystem, config: &'a Config, project: impl Into<String>) -> Self {
        Self {
            fs,
            config,
            project: project.into(),
        }
    }

    /// Plan and apply in one go.
    pub fn run(&self) -> Result<ComposeReport> {
        let plan = self.plan()?;
        self.apply(plan)
    }

    /// Load, discover, and allocate ports. Writes nothing.
    pub fn plan(&self) -> Result<Plan> {
        let compose = &self.config.compose;
        let manifest_path = PathBuf::from(&compose.file);

        let loaded = ComposeManifest::load(self.fs, &manifest_path)?;
        let exists = self.fs.exists(&manifest_path);
        let services = discover(self.fs, self.config, &self.project)?;

        let mut manifest = loaded.clone();
        let mut allocator =
            PortAllocator::from_manifest(&manifest, compose.base_port, compose.port_window);
        let mut report = ComposeReport {
            manifest: manifest_path,
            ..ComposeReport::default()
        };
        let mut dockerfiles = Vec::new();

        for service in services {
            if !service.qualifies() {
                tracing::debug!(dir = %service.name, "not a service, skipping");
                continue;
            }
            if !service.has_dockerfile {
                dockerfiles.push(dockerfile::file(&service));
            }

            if manifest.contains(&service.name) {
                report.unchanged.push(service.name);
                continue;
            }

            let ports = self.allocate(&service, &mut allocator)?;
            manifest
                .services
                .insert(service.name.clone(), self.new_entry(&service, &ports));
            manifest.declare("networks", &compose.network);
            manifest.declare("volumes", GOPATH_VOLUME);

            report.registered.push(Registration {
                name: service.name,
                external: service.has_dockerfile,
                build_context: service.build_context,
                ports,
            });
        }

        Ok(Plan {
            changed: !exists || manifest != loaded,
            manifest,
            dockerfiles,
            report,
        })
    }

    /// Write Dockerfiles, then the manifest.
    pub fn apply(&self, plan: Plan) -> Result<ComposeReport> {
        let Plan {
            manifest,
            changed,
            dockerfiles,
            mut report,
        } = plan;

        let yaml = manifest.to_yaml()?;

        for file in dockerfiles {
            if file.write(self.fs)? == WriteResult::Written {
                tracing::info!(path = %file.file_path().display(), "wrote Dockerfile");
                report.dockerfiles.push(file.file_path().to_path_buf());
            }
        }

        if changed {
            self.fs.write_file(&report.manifest, &yaml)?;
            report.manifest_written = true;
        }

        for registration in &report.registered {
            let ports = registration
                .ports
                .iter()
                .map(|p| format!("{}={}:{}", p.transport.as_str(), p.host, p.container))
                .collect::<Vec<_>>()
                .join(" ");
            tracing::info!(service = %registration.name, %ports, "registered service");
        }

        Ok(report)
    }

    /// HTTP first, then gRPC, each on the lowest free host port.
    fn allocate(
        &self,
        service: &DiscoveredService,
        allocator: &mut PortAllocator,
    ) -> Result<Vec<PortBinding>> {
        let compose = &self.config.compose;
        let wanted = [
            (service.has_http, Transport::Http, compose.http_container_port),
            (service.has_grpc, Transport::Grpc, compose.grpc_container_port),
        ];

        let mut ports = Vec::new();
        for (present, transport, container) in wanted {
            if present {
                let host = allocator.claim_next(&service.name)?;
                ports.push(PortBinding {
                    transport,
                    host,
                    container,
                });
            }
        }
        Ok(ports)
    }

    fn new_entry(&self, service: &DiscoveredService, ports: &[PortBinding]) -> ServiceEntry {
        let compose = &self.config.compose;
        let name = &service.name;

        let mut environment = vec!["GOPATH=/gopath".to_string()];
        for port in ports {
            let key = match port.transport {
                Transport::Http => "HTTP_PORT",
                Transport::Grpc => "GRPC_PORT",
            };
            environment.push(format!("{}={}", key, port.container));
        }

        ServiceEntry {
            image: Some(compose.image.clone()),
            command: Some(Command::Exec(vec![
                "go".to_string(),
                "run".to_string(),
                "main.go".to_string(),
            ])),
            working_dir: Some(format!("/{}", name)),
            volumes: Some(vec![
                VolumeSpec::Short(format!("./{}:/{}", name, name)),
                VolumeSpec::Short(format!("{}:/gopath", GOPATH_VOLUME)),
            ]),
            environment: Some(Environment::List(environment)),
            ports: (!ports.is_empty()).then(|| {
                ports
                    .iter()
                    .map(|p| PortSpec::Short(format!("{}:{}", p.host, p.container)))
                    .collect()
            }),
            networks: Some(Networks::List(vec![compose.network.clone()])),
            extra: Default::default(),
        }
    }
}
