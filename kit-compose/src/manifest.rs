//! docker-compose manifest model.
//!
//! Only the keys kit writes are typed. Everything else, at the top level and
//! on each service, is kept as raw YAML so a load/save cycle never drops it.

use std::path::Path;

use indexmap::IndexMap;
use kitgen_core::{Error, Filesystem, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Value;

/// Manifest version written when no manifest exists yet.
pub const DEFAULT_VERSION: &str = "3";

/// YAML merge key. serde_yaml keeps it as an ordinary key.
const MERGE_KEY: &str = "<<";

/// The persisted orchestration manifest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComposeManifest {
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub version: Option<String>,
    #[serde(default, deserialize_with = "nullable_services")]
    pub services: IndexMap<String, ServiceEntry>,
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

/// One service under `services:`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<Command>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volumes: Option<Vec<VolumeSpec>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<Environment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ports: Option<Vec<PortSpec>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub networks: Option<Networks>,
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl ServiceEntry {
    /// `ports:` as compose sees them, with `<<` merge keys applied.
    pub fn effective_ports(&self) -> Vec<PortSpec> {
        let own = self.ports.clone().unwrap_or_default();
        if !self.extra.contains_key(MERGE_KEY) {
            return own;
        }

        let merged = serde_yaml::to_value(self).and_then(|mut value| {
            value.apply_merge()?;
            match value.get("ports") {
                Some(ports) => serde_yaml::from_value::<Vec<PortSpec>>(ports.clone()),
                None => Ok(Vec::new()),
            }
        });
        match merged {
            Ok(ports) => ports,
            Err(err) => {
                tracing::debug!(error = %err, "cannot apply merge key, using own ports");
                own
            }
        }
    }
}

/// `command:` as a shell string or an exec list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Command {
    Shell(String),
    Exec(Vec<String>),
}

/// `environment:` as `KEY=VALUE` entries or a mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Environment {
    List(Vec<String>),
    Map(IndexMap<String, Value>),
}

/// One `volumes:` item in short (`src:dst`) or long syntax.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VolumeSpec {
    Short(String),
    Long(IndexMap<String, Value>),
}

/// One `ports:` item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PortSpec {
    /// `[ip:]host:container[/proto]`, ranges allowed.
    Short(String),
    /// A bare container port.
    Number(u64),
    /// Long syntax with `target`, `published`, ...
    Long(IndexMap<String, Value>),
}

/// `networks:` as a list of names or a mapping of per-network settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Networks {
    List(Vec<String>),
    Map(IndexMap<String, Value>),
}

impl ComposeManifest {
    /// An empty manifest for a project without one.
    pub fn new() -> Self {
        Self {
            version: Some(DEFAULT_VERSION.to_string()),
            ..Self::default()
        }
    }

    /// Read the manifest at `path`, or start a new one when it is absent.
    ///
    /// A file that does not parse is fatal; it is never replaced.
    pub fn load(fs: &dyn Filesystem, path: &Path) -> Result<Self> {
        match fs.read_to_string(path) {
            Ok(src) => Self::parse(&src, &path.display().to_string()),
            Err(err) if err.is_not_found() => {
                tracing::debug!(path = %path.display(), "no manifest yet");
                Ok(Self::new())
            }
            Err(err) => Err(err),
        }
    }

    /// Parse manifest YAML. An empty document is an empty manifest.
    pub fn parse(src: &str, filename: &str) -> Result<Self> {
        let document: Value =
            serde_yaml::from_str(src).map_err(|e| Error::manifest_corrupt(e, src, filename))?;
        if document.is_null() {
            return Ok(Self::new());
        }
        serde_yaml::from_str(src).map_err(|e| Error::manifest_corrupt(e, src, filename))
    }

    /// Serialize back to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            Error::configuration(format!("cannot serialize compose manifest: {}", e))
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.services.contains_key(name)
    }

    /// Add `item` under a top-level section (`networks`, `volumes`) unless
    /// it is already declared there.
    ///
    /// A section holding something other than a mapping is left alone.
    pub fn declare(&mut self, section: &str, item: &str) {
        let entry = self
            .extra
            .entry(section.to_string())
            .or_insert_with(|| Value::Mapping(Default::default()));
        if entry.is_null() {
            *entry = Value::Mapping(Default::default());
        }
        if let Value::Mapping(map) = entry {
            let key = Value::String(item.to_string());
            if !map.contains_key(&key) {
                map.insert(key, Value::Mapping(Default::default()));
            }
        }
    }
}

/// Accept `version: 3` as well as `version: "3"`.
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected a version string, found {:?}",
            other
        ))),
    }
}

/// `services:` with no entries may be written as an empty key.
fn nullable_services<'de, D>(
    deserializer: D,
) -> std::result::Result<IndexMap<String, ServiceEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    let services = Option::<IndexMap<String, Option<ServiceEntry>>>::deserialize(deserializer)?;
    Ok(services
        .unwrap_or_default()
        .into_iter()
        .map(|(name, entry)| (name, entry.unwrap_or_default()))
        .collect())
}

#[cfg(test)]
mod tests {
    use kitgen_core::testing::MemoryFilesystem;

    use super::*;

    const SAMPLE: &str = r#"
version: "3.8"
x-common: &common
  restart: unless-stopped
services:
  db:
    image: postgres:13
    environment:
      POSTGRES_PASSWORD: secret
    ports:
      - "5432:5432"
      - target: 9000
        published: 9000
    healthcheck:
      test: ["CMD", "pg_isready"]
  api:
    command: go run main.go
    networks:
      default:
        aliases: [api]
volumes:
  pgdata: {}
"#;

    #[test]
    fn test_missing_manifest_is_new() {
        let fs = MemoryFilesystem::new();
        let manifest = ComposeManifest::load(&fs, Path::new("docker-compose.yml")).unwrap();
        assert_eq!(manifest, ComposeManifest::new());
        assert_eq!(manifest.version.as_deref(), Some("3"));
    }

    #[test]
    fn test_empty_document_is_new() {
        let manifest = ComposeManifest::parse("# nothing yet\n", "docker-compose.yml").unwrap();
        assert!(manifest.services.is_empty());
    }

    #[test]
    fn test_parse_typed_and_unknown_keys() {
        let manifest = ComposeManifest::parse(SAMPLE, "docker-compose.yml").unwrap();

        assert_eq!(manifest.version.as_deref(), Some("3.8"));
        assert!(manifest.extra.contains_key("x-common"));
        assert!(manifest.extra.contains_key("volumes"));

        let db = &manifest.services["db"];
        assert_eq!(db.image.as_deref(), Some("postgres:13"));
        assert!(matches!(db.environment, Some(Environment::Map(_))));
        let ports = db.ports.as_ref().unwrap();
        assert!(matches!(ports[0], PortSpec::Short(ref s) if s == "5432:5432"));
        assert!(matches!(ports[1], PortSpec::Long(_)));
        assert!(db.extra.contains_key("healthcheck"));

        let api = &manifest.services["api"];
        assert_eq!(api.command, Some(Command::Shell("go run main.go".to_string())));
        assert!(matches!(api.networks, Some(Networks::Map(_))));
    }

    #[test]
    fn test_round_trip_preserves_unknown_keys() {
        let manifest = ComposeManifest::parse(SAMPLE, "docker-compose.yml").unwrap();
        let yaml = manifest.to_yaml().unwrap();
        let again = ComposeManifest::parse(&yaml, "docker-compose.yml").unwrap();

        assert_eq!(manifest, again);
        assert_eq!(yaml, again.to_yaml().unwrap());
    }

    #[test]
    fn test_numeric_version_and_null_services() {
        let manifest = ComposeManifest::parse("version: 3\nservices:\n", "c.yml").unwrap();
        assert_eq!(manifest.version.as_deref(), Some("3"));
        assert!(manifest.services.is_empty());
    }

    #[test]
    fn test_corrupt_manifest_has_span() {
        let err = ComposeManifest::parse("services:\n  a: [unclosed\n", "c.yml").unwrap_err();
        match *err {
            Error::ManifestCorrupt { span, .. } => assert!(span.is_some()),
            other => panic!("expected corrupt manifest, got {:?}", other),
        }
    }

    #[test]
    fn test_wrong_shape_is_corrupt() {
        let err = ComposeManifest::parse("- just\n- a list\n", "c.yml").unwrap_err();
        assert!(matches!(*err, Error::ManifestCorrupt { .. }));
    }

    #[test]
    fn test_effective_ports_follow_merge_key() {
        let manifest = ComposeManifest::parse(
            r#"
x-legacy: &legacy
  image: nginx
  ports: ["8800:80"]
x-quiet: &quiet
  restart: always
services:
  legacy:
    <<: *legacy
  pinned:
    <<: *legacy
    ports: ["9000:80"]
  layered:
    <<: [*quiet, *legacy]
  plain:
    ports: ["7000:80"]
"#,
            "c.yml",
        )
        .unwrap();

        let ports = |name: &str| manifest.services[name].effective_ports();
        assert_eq!(ports("legacy"), vec![PortSpec::Short("8800:80".into())]);
        assert_eq!(ports("pinned"), vec![PortSpec::Short("9000:80".into())]);
        assert_eq!(ports("layered"), vec![PortSpec::Short("8800:80".into())]);
        assert_eq!(ports("plain"), vec![PortSpec::Short("7000:80".into())]);
        assert!(manifest.services["legacy"].ports.is_none());
    }

    #[test]
    fn test_declare_adds_missing_only() {
        let mut manifest = ComposeManifest::parse(SAMPLE, "c.yml").unwrap();
        manifest.declare("volumes", "pgdata");
        manifest.declare("volumes", "shared_gopath");
        manifest.declare("networks", "finan_network");

        let Value::Mapping(volumes) = &manifest.extra["volumes"] else {
            panic!("volumes should stay a mapping");
        };
        assert_eq!(volumes.len(), 2);
        assert!(manifest.extra.contains_key("networks"));
    }
}
