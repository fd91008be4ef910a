use std::path::PathBuf;

use kitgen_config::{Config, PathTemplate};
use kitgen_core::{
    CommandExecutor, Error, Filesystem, Result, to_camel_case, to_lower_snake_case,
};

/// A service name in the spellings the generators need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceName {
    /// As typed on the command line.
    pub raw: String,
    /// Directory token: `user_profile`.
    pub snake: String,
    /// Type token: `UserProfile`.
    pub camel: String,
}

impl ServiceName {
    pub fn new(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        let snake = to_lower_snake_case(raw.trim());
        if snake.is_empty() {
            return Err(Error::configuration(format!(
                "'{}' is not a usable service name",
                raw
            )));
        }
        if !snake
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(Error::configuration(format!(
                "service name '{}' may only contain letters, digits, '-' and '_'",
                raw
            )));
        }

        let camel = to_camel_case(&snake);
        Ok(Self { raw, snake, camel })
    }

    /// Go module stamped on the service directory.
    ///
    /// Defaults to the snake name. An explicit module keeps its leading
    /// segments and snake-cases the last one: `acme/svc/UserProfile`
    /// becomes `acme/svc/user_profile`.
    pub fn module(&self, explicit: Option<&str>) -> String {
        match explicit.map(|m| m.trim().trim_end_matches('/')) {
            Some(module) if !module.is_empty() => match module.rsplit_once('/') {
                Some((prefix, last)) => format!("{}/{}", prefix, to_lower_snake_case(last)),
                None => to_lower_snake_case(module),
            },
            _ => self.snake.clone(),
        }
    }
}

/// Everything a generator may touch, passed explicitly to each one.
pub struct GenContext<'a> {
    pub fs: &'a dyn Filesystem,
    pub config: &'a Config,
    pub executor: &'a dyn CommandExecutor,
    pub name: ServiceName,
    /// Go module of the service.
    pub module: String,
    /// Project directory name, used for compose build contexts.
    pub project: String,
}

impl<'a> GenContext<'a> {
    pub fn new(
        fs: &'a dyn Filesystem,
        config: &'a Config,
        executor: &'a dyn CommandExecutor,
        name: ServiceName,
    ) -> Self {
        Self {
            fs,
            config,
            executor,
            module: name.module(None),
            name,
            project: String::new(),
        }
    }

    pub fn with_module(mut self, module: Option<&str>) -> Self {
        self.module = self.name.module(module);
        self
    }

    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = project.into();
        self
    }

    /// The service directory in the project root.
    pub fn service_dir(&self) -> PathBuf {
        PathBuf::from(&self.name.snake)
    }

    /// Directory a template points at for this service.
    pub fn dir(&self, template: &PathTemplate) -> PathBuf {
        template.render(&self.name.snake)
    }

    /// A file under a templated directory.
    pub fn file(&self, template: &PathTemplate, file: &str) -> PathBuf {
        self.config.file_path(template, &self.name.snake, file)
    }

    /// Import path of a sibling package, for cross-package references.
    pub fn import_path(&self, template: &PathTemplate) -> Result<String> {
        template.import_path(&self.module)
    }

    /// Package path of a file's own package.
    ///
    /// Falls back to the directory path when the template is not importable,
    /// which only affects how the package name is guessed.
    pub fn package_path(&self, template: &PathTemplate) -> String {
        self.import_path(template)
            .unwrap_or_else(|_| self.dir(template).to_string_lossy().replace('\\', "/"))
    }
}

#[cfg(test)]
mod tests {
    use kitgen_core::testing::{MemoryFilesystem, RecordingExecutor};

    use super::*;

    #[test]
    fn test_service_name_spellings() {
        let name = ServiceName::new("UserProfile").unwrap();
        assert_eq!(name.snake, "user_profile");
        assert_eq!(name.camel, "UserProfile");

        let name = ServiceName::new("order-history").unwrap();
        assert_eq!(name.snake, "order_history");
        assert_eq!(name.camel, "OrderHistory");
    }

    #[test]
    fn test_invalid_service_names() {
        for bad in ["", "  ", "a/b", "../up", "caf\u{e9}"] {
            let err = ServiceName::new(bad).unwrap_err();
            assert!(
                matches!(*err, Error::Configuration { .. }),
                "{:?} accepted",
                bad
            );
        }
    }

    #[test]
    fn test_module_override_snake_cases_last_segment() {
        let name = ServiceName::new("UserProfile").unwrap();
        assert_eq!(name.module(None), "user_profile");
        assert_eq!(name.module(Some("")), "user_profile");
        assert_eq!(
            name.module(Some("github.com/acme/UserProfile")),
            "github.com/acme/user_profile"
        );
        assert_eq!(name.module(Some("Shop")), "shop");
    }

    #[test]
    fn test_paths_and_imports() {
        let fs = MemoryFilesystem::new();
        let exec = RecordingExecutor::new();
        let config = Config::default();
        let ctx = GenContext::new(&fs, &config, &exec, ServiceName::new("Shop").unwrap())
            .with_module(Some("github.com/acme/shop"));

        assert_eq!(ctx.dir(&config.paths.model), PathBuf::from("shop/pkg/model"));
        assert_eq!(
            ctx.import_path(&config.paths.postgres).unwrap(),
            "github.com/acme/shop/pkg/db/postgres"
        );
        assert_eq!(ctx.package_path(&config.paths.config), "github.com/acme/shop/config");
    }

    #[test]
    fn test_unrooted_template_is_not_importable() {
        let fs = MemoryFilesystem::new();
        let exec = RecordingExecutor::new();
        let mut config = Config::default();
        config.paths.config = PathTemplate::new("shared/{name}/config");
        let ctx = GenContext::new(&fs, &config, &exec, ServiceName::new("shop").unwrap());

        let err = ctx.import_path(&config.paths.config).unwrap_err();
        assert!(matches!(*err, Error::Configuration { .. }));
        assert_eq!(ctx.package_path(&config.paths.config), "shared/shop/config");
    }
}
