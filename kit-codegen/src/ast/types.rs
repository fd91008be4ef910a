//! Go type references.

use crate::imports::Scope;

/// A type as written in a Go declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoType {
    /// A predeclared or package-local type (`string`, `error`, `DBInfo`).
    Ident(String),
    /// A type exported by another package.
    Qual { path: String, name: String },
    Pointer(Box<GoType>),
    Slice(Box<GoType>),
    Map(Box<GoType>, Box<GoType>),
}

impl GoType {
    pub fn ident(name: impl Into<String>) -> Self {
        let name = name.into();
        debug_assert!(!name.is_empty(), "empty type name");
        Self::Ident(name)
    }

    pub fn qual(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Qual {
            path: path.into(),
            name: name.into(),
        }
    }

    pub fn string() -> Self {
        Self::ident("string")
    }

    pub fn error() -> Self {
        Self::ident("error")
    }

    pub fn pointer(self) -> Self {
        Self::Pointer(Box::new(self))
    }

    pub fn slice(self) -> Self {
        Self::Slice(Box::new(self))
    }

    pub fn map(key: GoType, value: GoType) -> Self {
        Self::Map(Box::new(key), Box::new(value))
    }

    /// Render as seen from a file with the given scope.
    pub fn render(&self, scope: &Scope) -> String {
        match self {
            Self::Ident(name) => name.clone(),
            Self::Qual { path, name } => scope.qualify(path, name),
            Self::Pointer(inner) => format!("*{}", inner.render(scope)),
            Self::Slice(inner) => format!("[]{}", inner.render(scope)),
            Self::Map(key, value) => {
                format!("map[{}]{}", key.render(scope), value.render(scope))
            }
        }
    }

    pub(crate) fn visit_imports(&self, f: &mut dyn FnMut(&str)) {
        match self {
            Self::Ident(_) => {}
            Self::Qual { path, .. } => f(path),
            Self::Pointer(inner) | Self::Slice(inner) => inner.visit_imports(f),
            Self::Map(key, value) => {
                key.visit_imports(f);
                value.visit_imports(f);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imports::ImportTable;

    #[test]
    fn test_render_composite_types() {
        let mut table = ImportTable::new("svc/pkg/db/postgres");
        let ty = GoType::map(
            GoType::string(),
            GoType::qual("github.com/jinzhu/gorm", "DB").pointer(),
        );
        ty.visit_imports(&mut |path| table.register(path));

        let scope = table.resolve("postgres");
        assert_eq!(ty.render(&scope), "map[string]*gorm.DB");
        assert_eq!(
            GoType::ident("DBInfo").slice().render(&scope),
            "[]DBInfo"
        );
    }
}
