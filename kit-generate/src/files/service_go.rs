use std::path::PathBuf;

use kitgen_codegen::{GoFile, ast::Interface};
use kitgen_core::{FileRules, GeneratedFile};

/// The service interface, owned by the user after the first run.
pub struct ServiceGo {
    pub path: PathBuf,
    pub package: String,
    pub camel: String,
}

impl ServiceGo {
    pub fn new(path: impl Into<PathBuf>, package: impl Into<String>, camel: &str) -> Self {
        Self {
            path: path.into(),
            package: package.into(),
            camel: camel.to_string(),
        }
    }

    pub fn interface_name(&self) -> String {
        format!("{}Service", self.camel)
    }
}

impl GeneratedFile for ServiceGo {
    fn path(&self) -> PathBuf {
        self.path.clone()
    }

    fn rules(&self) -> FileRules {
        FileRules::if_missing()
    }

    fn render(&self) -> String {
        let name = self.interface_name();
        GoFile::new(&self.package)
            .add(
                Interface::new(&name)
                    .doc(format!("{} describes the service.", name))
                    .comment("Add your methods here")
                    .comment("e.x: Foo(ctx context.Context, s string) (rs string, err error)"),
            )
            .render()
    }
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;

    #[test]
    fn test_service_interface() {
        let file = ServiceGo::new("shop/pkg/service/service.go", "shop/pkg/service", "Shop");

        assert_snapshot!(file.render(), @r#"
package service

// ShopService describes the service.
type ShopService interface {
	// Add your methods here
	// e.x: Foo(ctx context.Context, s string) (rs string, err error)
}
"#);
    }
}
