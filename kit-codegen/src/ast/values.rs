//! Package-level `var` and `const` declarations.

use super::{Code, GoType};
use crate::{builder::CodeFragment, imports::Scope};

/// `var name T = value`; either the type or the value may be omitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Var {
    keyword: &'static str,
    name: String,
    ty: Option<GoType>,
    value: Option<Code>,
}

impl Var {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        debug_assert!(!name.is_empty(), "var without a name");
        Self {
            keyword: "var",
            name,
            ty: None,
            value: None,
        }
    }

    pub fn ty(mut self, ty: GoType) -> Self {
        self.ty = Some(ty);
        self
    }

    pub fn value(mut self, value: impl Into<Code>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub(crate) fn visit_imports(&self, f: &mut dyn FnMut(&str)) {
        if let Some(ty) = &self.ty {
            ty.visit_imports(f);
        }
        if let Some(value) = &self.value {
            value.visit_imports(f);
        }
    }

    pub(crate) fn to_fragments(&self, scope: &Scope) -> Vec<CodeFragment> {
        let mut line = format!("{} {}", self.keyword, self.name);
        if let Some(ty) = &self.ty {
            line.push(' ');
            line.push_str(&ty.render(scope));
        }
        if let Some(value) = &self.value {
            line.push_str(" = ");
            line.push_str(&value.render(scope));
        }
        vec![CodeFragment::Line(line)]
    }
}

/// `const name = value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Const(Var);

impl Const {
    pub fn new(name: impl Into<String>, value: impl Into<Code>) -> Self {
        Self(Var {
            keyword: "const",
            ..Var::new(name).value(value)
        })
    }

    pub fn ty(self, ty: GoType) -> Self {
        Self(self.0.ty(ty))
    }

    pub(crate) fn visit_imports(&self, f: &mut dyn FnMut(&str)) {
        self.0.visit_imports(f);
    }

    pub(crate) fn to_fragments(&self, scope: &Scope) -> Vec<CodeFragment> {
        self.0.to_fragments(scope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imports::ImportTable;

    #[test]
    fn test_var_and_const_lines() {
        let var = Var::new("conf").ty(GoType::qual("shop/config", "AppConfig"));
        let constant = Const::new("DefaultConnName", Code::new().lit("default"));

        let mut table = ImportTable::new("shop/pkg/utils");
        var.visit_imports(&mut |p| table.register(p));
        constant.visit_imports(&mut |p| table.register(p));
        let scope = table.resolve("utils");

        assert_eq!(
            var.to_fragments(&scope),
            vec![CodeFragment::line("var conf config.AppConfig")]
        );
        assert_eq!(
            constant.to_fragments(&scope),
            vec![CodeFragment::line("const DefaultConnName = \"default\"")]
        );
    }
}
