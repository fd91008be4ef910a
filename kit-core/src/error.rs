use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Result type for kit operations (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<Error>>;

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("refusing to touch '{path}': {reason}")]
    #[diagnostic(
        code(kit::path),
        help("generated paths must stay inside the project root")
    )]
    Path { path: PathBuf, reason: String },

    #[error("failed to {op} '{path}'")]
    #[diagnostic(code(kit::io))]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{message}")]
    #[diagnostic(code(kit::configuration), help("check the [paths] and [files] tables in kit.toml"))]
    Configuration { message: String },

    #[error("failed to parse {filename}")]
    #[diagnostic(code(kit::config_parse))]
    ConfigParse {
        filename: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("parse error here")]
        span: Option<SourceSpan>,
        #[source]
        source: toml::de::Error,
    },

    #[error("'{filename}' is not a valid compose manifest")]
    #[diagnostic(
        code(kit::manifest_corrupt),
        help("fix or remove the file by hand; kit never rewrites a manifest it cannot parse")
    )]
    ManifestCorrupt {
        filename: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("invalid here")]
        span: Option<SourceSpan>,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("cannot list service directories under '{path}'")]
    #[diagnostic(code(kit::discovery))]
    Discovery {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no free host port for '{service}' in {first}..={last}")]
    #[diagnostic(
        code(kit::ports_exhausted),
        help("raise compose.port_window or compose.base_port in kit.toml")
    )]
    ResourceExhausted { service: String, first: u16, last: u16 },

    #[error("`{command}` failed in '{dir}': {stderr}")]
    #[diagnostic(code(kit::toolchain))]
    Toolchain {
        command: String,
        dir: PathBuf,
        stderr: String,
    },
}

impl Error {
    /// Create a path error
    pub fn path(path: impl Into<PathBuf>, reason: impl Into<String>) -> Box<Self> {
        Box::new(Error::Path {
            path: path.into(),
            reason: reason.into(),
        })
    }

    /// Create an I/O error for the given operation
    pub fn io(op: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Box<Self> {
        Box::new(Error::Io {
            op,
            path: path.into(),
            source,
        })
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Box<Self> {
        Box::new(Error::Configuration {
            message: message.into(),
        })
    }

    /// Create a config parse error from a toml error with source context
    pub fn config_parse(source: toml::de::Error, src: &str, filename: &str) -> Box<Self> {
        let span = source.span().map(SourceSpan::from);
        Box::new(Error::ConfigParse {
            filename: filename.to_string(),
            src: NamedSource::new(filename, src.to_string()),
            span,
            source,
        })
    }

    /// Create a manifest corruption error from a yaml error with source context
    pub fn manifest_corrupt(source: serde_yaml::Error, src: &str, filename: &str) -> Box<Self> {
        let span = source
            .location()
            .map(|loc| SourceSpan::from(loc.index()..loc.index()));
        Box::new(Error::ManifestCorrupt {
            filename: filename.to_string(),
            src: NamedSource::new(filename, src.to_string()),
            span,
            source,
        })
    }

    /// Whether this error wraps a missing file
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}
