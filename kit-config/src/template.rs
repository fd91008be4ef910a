use std::{
    fmt,
    path::{Component, Path, PathBuf},
};

use kitgen_core::{Error, Result};
use serde::Deserialize;

/// Placeholder substituted with the lower-snake service name.
pub const NAME_PLACEHOLDER: &str = "{name}";

/// A directory template such as `{name}/pkg/service`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct PathTemplate(String);

impl PathTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Substitute the service name.
    pub fn render(&self, name: &str) -> PathBuf {
        PathBuf::from(self.0.replace(NAME_PLACEHOLDER, name))
    }

    /// The template below the service directory (`pkg/service` for
    /// `{name}/pkg/service`), or `None` when it is not rooted there.
    pub fn below_service_dir(&self) -> Option<&str> {
        let trimmed = self.0.trim_end_matches('/');
        if trimmed == NAME_PLACEHOLDER {
            return Some("");
        }
        trimmed
            .strip_prefix(NAME_PLACEHOLDER)?
            .strip_prefix('/')
            .filter(|rest| !rest.contains(NAME_PLACEHOLDER))
    }

    /// Go import path of the package this template points at, inside the
    /// module stamped on the service directory.
    pub fn import_path(&self, module: &str) -> Result<String> {
        let module = module.trim_end_matches('/');
        if module.is_empty() {
            return Err(Error::configuration(format!(
                "cannot derive an import path for '{}' without a module name",
                self
            )));
        }

        match self.below_service_dir() {
            Some("") => Ok(module.to_string()),
            Some(rest) => Ok(format!("{}/{}", module, rest)),
            None => Err(Error::configuration(format!(
                "path template '{}' must start with '{}/' to be importable from a sibling package",
                self, NAME_PLACEHOLDER
            ))),
        }
    }

    /// Reject templates that would not name a per-service path inside the root.
    pub fn validate(&self, key: &str) -> Result<()> {
        if !self.0.contains(NAME_PLACEHOLDER) {
            return Err(Error::configuration(format!(
                "paths.{} = '{}' does not contain '{}'",
                key, self, NAME_PLACEHOLDER
            )));
        }

        let escapes = Path::new(&self.0).components().any(|c| {
            matches!(
                c,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
        if escapes {
            return Err(Error::configuration(format!(
                "paths.{} = '{}' must be a relative path without '..'",
                key, self
            )));
        }
        Ok(())
    }
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render() {
        let t = PathTemplate::new("{name}/pkg/service");
        assert_eq!(t.render("user_profile"), PathBuf::from("user_profile/pkg/service"));
    }

    #[test]
    fn test_import_path() {
        let t = PathTemplate::new("{name}/config");
        assert_eq!(t.import_path("github.com/acme/shop").unwrap(), "github.com/acme/shop/config");
        assert_eq!(t.import_path("shop/").unwrap(), "shop/config");

        let root = PathTemplate::new("{name}");
        assert_eq!(root.import_path("shop").unwrap(), "shop");
    }

    #[test]
    fn test_import_path_requires_module() {
        let err = PathTemplate::new("{name}/config").import_path("").unwrap_err();
        assert!(matches!(*err, Error::Configuration { .. }));
    }

    #[test]
    fn test_import_path_requires_service_root() {
        let err = PathTemplate::new("shared/{name}/config")
            .import_path("shop")
            .unwrap_err();
        assert!(matches!(*err, Error::Configuration { .. }));
    }

    #[test]
    fn test_validate() {
        assert!(PathTemplate::new("{name}/pkg/http").validate("http").is_ok());
        assert!(PathTemplate::new("pkg/http").validate("http").is_err());
        assert!(PathTemplate::new("../{name}").validate("http").is_err());
        assert!(PathTemplate::new("/srv/{name}").validate("http").is_err());
    }
}
