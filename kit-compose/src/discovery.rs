//! Service discovery over the project root.

use std::path::{Path, PathBuf};

use kitgen_config::Config;
use kitgen_core::{Error, Filesystem, Result, to_lower_snake_case};

/// File name marking a service that brings its own image build.
pub const DOCKERFILE: &str = "Dockerfile";

/// A top-level directory of the project and what it contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredService {
    /// Directory name, also the manifest key.
    pub name: String,
    /// Lower-snake name used to locate generated artifacts.
    pub snake: String,
    pub has_http: bool,
    pub has_grpc: bool,
    pub has_dockerfile: bool,
    /// Holds a generated service interface.
    pub is_service: bool,
    /// Source path of the service inside build containers.
    pub build_context: String,
}

impl DiscoveredService {
    /// Services that end up in the manifest.
    pub fn qualifies(&self) -> bool {
        self.has_dockerfile || self.is_service
    }

    pub fn dockerfile_path(&self) -> PathBuf {
        Path::new(&self.name).join(DOCKERFILE)
    }
}

/// Inspect every immediate subdirectory of the root, in name order.
///
/// Hidden directories are ignored. Listing failures are fatal.
pub fn discover(
    fs: &dyn Filesystem,
    config: &Config,
    project: &str,
) -> Result<Vec<DiscoveredService>> {
    let root = Path::new(".");
    let names = fs.list_dir_names(root).map_err(|err| match *err {
        Error::Io { path, source, .. } => Box::new(Error::Discovery { path, source }),
        other => Box::new(other),
    })?;

    let mut services = Vec::new();
    for name in names {
        if name.starts_with('.') || !fs.is_dir(Path::new(&name)) {
            continue;
        }
        services.push(inspect(fs, config, project, name));
    }
    Ok(services)
}

fn inspect(fs: &dyn Filesystem, config: &Config, project: &str, name: String) -> DiscoveredService {
    let snake = to_lower_snake_case(&name);
    let paths = &config.paths;
    let files = &config.files;

    let has_http = fs.exists(&config.file_path(&paths.http, &snake, &files.http_handler));
    let has_grpc = fs.exists(&config.file_path(&paths.grpc, &snake, &files.grpc_handler));
    let is_service = fs.exists(&config.file_path(&paths.service, &snake, &files.service));
    let has_dockerfile = fs.exists(&Path::new(&name).join(DOCKERFILE));

    let build_context = build_context(&config.compose.toolchain_root, project, &name);

    DiscoveredService {
        name,
        snake,
        has_http,
        has_grpc,
        has_dockerfile,
        is_service,
        build_context,
    }
}

/// `<toolchain_root>/<project>/<name>`, with empty parts left out.
pub fn build_context(toolchain_root: &str, project: &str, name: &str) -> String {
    let root = toolchain_root.trim_end_matches('/');
    [root, project.trim_matches('/'), name]
        .iter()
        .enumerate()
        .filter(|(i, part)| *i == 0 || !part.is_empty())
        .map(|(_, part)| *part)
        .collect::<Vec<_>>()
        .join("/")
}
