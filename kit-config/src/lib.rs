//! `kit.toml`: where generated artifacts go and how services are composed.
//!
//! Every key is optional; a missing file yields [`Config::default`].

mod template;

use std::path::{Path, PathBuf};

use kitgen_core::{Error, Result};
use serde::Deserialize;
pub use template::{NAME_PLACEHOLDER, PathTemplate};

/// Default config file name, looked up in the project root.
pub const CONFIG_FILE: &str = "kit.toml";

/// Root schema for kit.toml
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub paths: PathsConfig,
    pub files: FilesConfig,
    pub compose: ComposeConfig,
}

/// `[paths]`: per-service directory templates.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    pub service: PathTemplate,
    pub model: PathTemplate,
    pub config: PathTemplate,
    pub utils: PathTemplate,
    pub postgres: PathTemplate,
    pub http: PathTemplate,
    pub grpc: PathTemplate,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            service: PathTemplate::new("{name}/pkg/service"),
            model: PathTemplate::new("{name}/pkg/model"),
            config: PathTemplate::new("{name}/config"),
            utils: PathTemplate::new("{name}/pkg/utils"),
            postgres: PathTemplate::new("{name}/pkg/db/postgres"),
            http: PathTemplate::new("{name}/pkg/http"),
            grpc: PathTemplate::new("{name}/pkg/grpc"),
        }
    }
}

impl PathsConfig {
    fn entries(&self) -> [(&'static str, &PathTemplate); 7] {
        [
            ("service", &self.service),
            ("model", &self.model),
            ("config", &self.config),
            ("utils", &self.utils),
            ("postgres", &self.postgres),
            ("http", &self.http),
            ("grpc", &self.grpc),
        ]
    }
}

/// `[files]`: file names inside the templated directories.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilesConfig {
    pub service: String,
    pub model: String,
    pub model_postgres: String,
    pub config: String,
    pub status: String,
    pub utils: String,
    pub utils_constant: String,
    pub utils_status: String,
    pub postgres_config: String,
    pub postgres_db: String,
    pub http_handler: String,
    pub grpc_handler: String,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            service: "service.go".to_string(),
            model: "base.go".to_string(),
            model_postgres: "postgres.go".to_string(),
            config: "config.go".to_string(),
            status: "status.yml".to_string(),
            utils: "utils.go".to_string(),
            utils_constant: "constant.go".to_string(),
            utils_status: "status.go".to_string(),
            postgres_config: "config.go".to_string(),
            postgres_db: "db.go".to_string(),
            http_handler: "handler.go".to_string(),
            grpc_handler: "handler.go".to_string(),
        }
    }
}

impl FilesConfig {
    fn entries(&self) -> [(&'static str, &str); 12] {
        [
            ("service", self.service.as_str()),
            ("model", self.model.as_str()),
            ("model_postgres", self.model_postgres.as_str()),
            ("config", self.config.as_str()),
            ("status", self.status.as_str()),
            ("utils", self.utils.as_str()),
            ("utils_constant", self.utils_constant.as_str()),
            ("utils_status", self.utils_status.as_str()),
            ("postgres_config", self.postgres_config.as_str()),
            ("postgres_db", self.postgres_db.as_str()),
            ("http_handler", self.http_handler.as_str()),
            ("grpc_handler", self.grpc_handler.as_str()),
        ]
    }
}

/// `[compose]`: orchestration manifest settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComposeConfig {
    /// Manifest file name in the project root.
    pub file: String,
    /// Image used for new service entries and the synthesized Dockerfile.
    pub image: String,
    pub network: String,
    /// GOPATH-style source root inside build containers.
    pub toolchain_root: String,
    pub base_port: u16,
    /// How many host ports above `base_port` may be probed.
    pub port_window: u16,
    pub http_container_port: u16,
    pub grpc_container_port: u16,
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            file: "docker-compose.yml".to_string(),
            image: "golang:1.14".to_string(),
            network: "finan_network".to_string(),
            toolchain_root: "/go/src".to_string(),
            base_port: 8800,
            port_window: 1000,
            http_container_port: 8081,
            grpc_container_port: 8082,
        }
    }
}

impl Config {
    /// Validate the configuration after parsing
    pub fn validate(&self) -> Result<()> {
        for (key, template) in self.paths.entries() {
            template.validate(key)?;
        }

        for (key, name) in self.files.entries() {
            if name.is_empty() || name.contains('/') || name.contains('\\') || name == ".." {
                return Err(Error::configuration(format!(
                    "files.{} = '{}' must be a plain file name",
                    key, name
                )));
            }
        }

        let compose = &self.compose;
        if compose.file.is_empty() || compose.file.contains('/') {
            return Err(Error::configuration(format!(
                "compose.file = '{}' must be a file name in the project root",
                compose.file
            )));
        }
        if compose.port_window == 0 {
            return Err(Error::configuration("compose.port_window must be at least 1"));
        }
        if compose.base_port == 0 {
            return Err(Error::configuration("compose.base_port must be a valid port"));
        }
        Ok(())
    }

    /// Path of a file under a templated service directory.
    pub fn file_path(&self, template: &PathTemplate, name: &str, file: &str) -> PathBuf {
        template.render(name).join(file)
    }

    /// Load `kit.toml` from the project root, or defaults when it is absent.
    pub fn discover(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        if path.is_file() {
            tracing::debug!(path = %path.display(), "loading config");
            parse_file(&path)
        } else {
            Ok(Self::default())
        }
    }
}

/// Parse a kit.toml file from the given path
pub fn parse_file(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| Error::io("read", path, e))?;
    let filename = path.display().to_string();
    parse_str_with_filename(&content, &filename)
}

/// Parse a kit.toml from a string (uses "kit.toml" as default filename)
pub fn parse_str(content: &str) -> Result<Config> {
    parse_str_with_filename(content, CONFIG_FILE)
}

/// Parse a kit.toml from a string with a custom filename for error reporting
pub fn parse_str_with_filename(content: &str, filename: &str) -> Result<Config> {
    let config: Config =
        toml::from_str(content).map_err(|e| Error::config_parse(e, content, filename))?;

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_empty_is_default() {
        let config = parse_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.compose.base_port, 8800);
        assert_eq!(config.compose.http_container_port, 8081);
        assert_eq!(config.compose.grpc_container_port, 8082);
    }

    #[test]
    fn test_partial_override() {
        let config = parse_str(
            r#"
[paths]
service = "{name}/internal/service"

[compose]
base_port = 9000
network = "dev"
"#,
        )
        .unwrap();

        assert_eq!(config.paths.service.as_str(), "{name}/internal/service");
        assert_eq!(config.paths.model.as_str(), "{name}/pkg/model");
        assert_eq!(config.compose.base_port, 9000);
        assert_eq!(config.compose.network, "dev");
        assert_eq!(config.compose.image, "golang:1.14");
    }

    #[test]
    fn test_file_path() {
        let config = Config::default();
        assert_eq!(
            config.file_path(&config.paths.service, "shop", &config.files.service),
            PathBuf::from("shop/pkg/service/service.go")
        );
    }

    #[test]
    fn test_parse_error_has_span() {
        let err = parse_str("[compose]\nbase_port = \"high\"\n").unwrap_err();
        match *err {
            Error::ConfigParse { span, .. } => assert!(span.is_some()),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_key_is_parse_error() {
        let err = parse_str("[paths]\nhandlers = \"{name}/h\"\n").unwrap_err();
        assert!(matches!(*err, Error::ConfigParse { .. }));
    }

    #[test]
    fn test_template_without_name_is_configuration_error() {
        let err = parse_str("[paths]\nmodel = \"pkg/model\"\n").unwrap_err();
        assert!(matches!(*err, Error::Configuration { .. }));
    }

    #[test]
    fn test_nested_file_name_is_rejected() {
        let err = parse_str("[files]\nservice = \"a/service.go\"\n").unwrap_err();
        assert!(matches!(*err, Error::Configuration { .. }));
    }

    #[test]
    fn test_zero_window_is_rejected() {
        let err = parse_str("[compose]\nport_window = 0\n").unwrap_err();
        assert!(matches!(*err, Error::Configuration { .. }));
    }

    #[test]
    fn test_discover() {
        let temp = TempDir::new().unwrap();
        assert_eq!(Config::discover(temp.path()).unwrap(), Config::default());

        std::fs::write(
            temp.path().join(CONFIG_FILE),
            "[compose]\nfile = \"compose.yml\"\n",
        )
        .unwrap();
        let config = Config::discover(temp.path()).unwrap();
        assert_eq!(config.compose.file, "compose.yml");
    }
}
