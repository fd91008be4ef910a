use std::path::PathBuf;

use kitgen_codegen::{
    GoFile,
    ast::{Field, GoType, Struct},
};
use kitgen_core::{FileRules, GeneratedFile};

/// Environment-backed settings: (field, variable, default).
const SETTINGS: [(&str, &str, &str); 9] = [
    ("DBHost", "DB_HOST", "localhost"),
    ("DBPort", "DB_PORT", "5432"),
    ("DBUser", "DB_USER", "postgres"),
    ("DBPass", "DB_PASS", "123456"),
    ("DBName", "DB_NAME", "postgres"),
    ("DBSchema", "DB_SCHEMA", "public"),
    ("LogFormat", "LOG_FORMAT", "text"),
    ("LogLevel", "LOG_LEVEL", "debug"),
    ("LogOutput", "LOG_OUTPUT", "file://logs/metadata.log"),
];

/// `AppConfig`, read from the environment.
pub struct ConfigGo {
    pub path: PathBuf,
    pub package: String,
}

impl ConfigGo {
    pub fn new(path: impl Into<PathBuf>, package: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            package: package.into(),
        }
    }
}

impl GeneratedFile for ConfigGo {
    fn path(&self) -> PathBuf {
        self.path.clone()
    }

    fn rules(&self) -> FileRules {
        FileRules::if_missing()
    }

    fn render(&self) -> String {
        let app_config = SETTINGS.iter().fold(
            Struct::new("AppConfig").doc("AppConfig is loaded from environment variables."),
            |s, (field, env, default)| {
                s.field(
                    Field::new(*field, GoType::string())
                        .tag("env", *env)
                        .tag("envDefault", *default),
                )
            },
        );
        GoFile::new(&self.package).add(app_config).render()
    }
}

/// Status code table read by the utils package at startup.
pub struct StatusYml {
    pub path: PathBuf,
}

impl StatusYml {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl GeneratedFile for StatusYml {
    fn path(&self) -> PathBuf {
        self.path.clone()
    }

    fn rules(&self) -> FileRules {
        FileRules::always_overwrite()
    }

    fn render(&self) -> String {
        r#"gen:
  success:
    code: 1001
    status: 200
    message: "Success"

  not_found:
    code: 1002
    status: 404
    message: "Not found"

  timeout:
    code: 1003
    status: 500
    message: "Timeout"

  bad_request:
    code: 1004
    status: 400
    message: "Invalid input"

  internal:
    code: 1005
    status: 500
    message: "Internal server error"

  unauthorized:
    code: 1006
    status: 401
    message: "Authorization required"

  database:
    code: 1007
    status: 500
    message: "Database error"
"#
        .to_string()
    }
}
