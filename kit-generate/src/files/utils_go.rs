use std::path::PathBuf;

use kitgen_codegen::{
    GoFile,
    ast::{Code, Func, GoType, Param, Var},
};
use kitgen_core::{FileRules, GENERATED_HEADER, GeneratedFile};

const ENV: &str = "github.com/caarlos0/env/v6";

/// Error and environment helpers.
pub struct UtilsGo {
    pub path: PathBuf,
    pub package: String,
    pub module: String,
    /// Import path of the config package.
    pub config_import: String,
}

impl UtilsGo {
    pub fn new(
        path: impl Into<PathBuf>,
        package: impl Into<String>,
        module: impl Into<String>,
        config_import: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            package: package.into(),
            module: module.into(),
            config_import: config_import.into(),
        }
    }
}

impl GeneratedFile for UtilsGo {
    fn path(&self) -> PathBuf {
        self.path.clone()
    }

    fn rules(&self) -> FileRules {
        FileRules::if_missing()
    }

    fn render(&self) -> String {
        let app_config = || GoType::qual(&self.config_import, "AppConfig");

        GoFile::new(&self.package)
            .local_module(&self.module)
            .add(Var::new("conf").ty(app_config()))
            .add(
                Func::new("IsErrNotFound")
                    .param(Param::new("err", GoType::error()))
                    .result(Param::unnamed(GoType::ident("bool")))
                    .line(
                        Code::new()
                            .text("return ")
                            .qual("errors", "Is")
                            .text("(err, ")
                            .qual("github.com/jinzhu/gorm", "ErrRecordNotFound")
                            .text(")"),
                    ),
            )
            .add(
                Func::new("LoadEnv")
                    .line(Code::new().text("_ = ").qual(ENV, "Parse").text("(&conf)")),
            )
            .add(
                Func::new("GetEnv")
                    .result(Param::unnamed(app_config()))
                    .line("return conf"),
            )
            .render()
    }
}

/// Package-wide constants, regenerated on every run.
pub struct ConstantGo {
    pub path: PathBuf,
    pub package: String,
}

impl ConstantGo {
    pub fn new(path: impl Into<PathBuf>, package: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            package: package.into(),
        }
    }
}

impl GeneratedFile for ConstantGo {
    fn path(&self) -> PathBuf {
        self.path.clone()
    }

    fn rules(&self) -> FileRules {
        FileRules::always_overwrite().with_header(GENERATED_HEADER)
    }

    fn render(&self) -> String {
        GoFile::new(&self.package).render()
    }
}

/// Loader for the status table written by the config generator.
pub struct StatusGo {
    pub path: PathBuf,
    pub package: String,
}

impl StatusGo {
    pub fn new(path: impl Into<PathBuf>, package: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            package: package.into(),
        }
    }
}

impl GeneratedFile for StatusGo {
    fn path(&self) -> PathBuf {
        self.path.clone()
    }

    fn rules(&self) -> FileRules {
        FileRules::always_overwrite().with_header(GENERATED_HEADER)
    }

    fn render(&self) -> String {
        let package = GoFile::new(&self.package).render();
        format!(
            "{}{}",
            package,
            r#"
import (
	"os"
	"sync"

	"github.com/praslar/common/response"
	"github.com/sirupsen/logrus"
	"gopkg.in/yaml.v3"
)

type (
	// Status format from status pkg
	Status = response.ResponseStatus

	GenStatus struct {
		Success      Status
		BadRequest   Status
		Unauthorized Status
		Internal     Status
		Database     Status
	}

	statuses struct {
		Gen GenStatus
	}
)

var (
	all  *statuses
	once sync.Once
)

// Init loads statuses from the given config file.
// Init panics if it cannot open or parse the file.
func Init(conf string) {
	once.Do(func() {
		f, err := os.Open(conf)
		if err != nil {
			logrus.Errorf("Fail to open status file, %v", err)
			panic(err)
		}
		all = &statuses{}
		if err := yaml.NewDecoder(f).Decode(all); err != nil {
			logrus.Errorf("Fail to parse status file data to statuses struct, %v", err)
			panic(err)
		}
	})
}

// load returns all registered statuses, reading STATUS_PATH (or
// conf/status.yml) on first use.
func load(err string) *statuses {
	conf := os.Getenv("STATUS_PATH")
	if conf == "" {
		conf = "conf/status.yml"
	}
	Init(conf)
	if err != "" {
		all.Gen.BadRequest.XMessage = err
	}
	return all
}

func Gen(err string) GenStatus {
	return load(err).Gen
}
"#
        )
    }
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;
    use kitgen_core::testing::MemoryFilesystem;

    use super::*;

    #[test]
    fn test_utils_import_config_by_module_path() {
        let file = UtilsGo::new(
            "shop/pkg/utils/utils.go",
            "github.com/acme/shop/pkg/utils",
            "github.com/acme/shop",
            "github.com/acme/shop/config",
        );

        assert_snapshot!(file.render(), @r#"
package utils

import (
	"errors"

	env "github.com/caarlos0/env/v6"
	"github.com/jinzhu/gorm"

	"github.com/acme/shop/config"
)

var conf config.AppConfig

func IsErrNotFound(err error) bool {
	return errors.Is(err, gorm.ErrRecordNotFound)
}

func LoadEnv() {
	_ = env.Parse(&conf)
}

func GetEnv() config.AppConfig {
	return conf
}
"#);
    }

    #[test]
    fn test_regenerated_files_carry_header() {
        let fs = MemoryFilesystem::new();
        ConstantGo::new("shop/pkg/utils/constant.go", "shop/pkg/utils")
            .write(&fs)
            .unwrap();
        StatusGo::new("shop/pkg/utils/status.go", "shop/pkg/utils")
            .write(&fs)
            .unwrap();

        assert_eq!(
            fs.file("shop/pkg/utils/constant.go").unwrap(),
            format!("{}\n\npackage utils\n", GENERATED_HEADER)
        );
        let status = fs.file("shop/pkg/utils/status.go").unwrap();
        assert!(status.starts_with(&format!("{}\n\npackage utils\n\nimport (", GENERATED_HEADER)));
    }
}
