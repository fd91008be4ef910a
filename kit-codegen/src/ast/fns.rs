//! Go function builder.

use super::{Code, GoType, Stmt};
use crate::{builder::CodeFragment, imports::Scope};

/// A parameter, result, or receiver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// Empty for an unnamed result.
    pub name: String,
    pub ty: GoType,
    pub variadic: bool,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: GoType) -> Self {
        Self {
            name: name.into(),
            ty,
            variadic: false,
        }
    }

    /// An unnamed parameter or result.
    pub fn unnamed(ty: GoType) -> Self {
        Self::new("", ty)
    }

    /// Mark as `...T`.
    pub fn variadic(mut self) -> Self {
        self.variadic = true;
        self
    }

    fn render(&self, scope: &Scope) -> String {
        let dots = if self.variadic { "..." } else { "" };
        if self.name.is_empty() {
            format!("{}{}", dots, self.ty.render(scope))
        } else {
            format!("{} {}{}", self.name, dots, self.ty.render(scope))
        }
    }
}

/// A method signature without the `func` keyword: `Name(params) results`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub name: String,
    pub params: Vec<Param>,
    pub results: Vec<Param>,
}

impl Signature {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        debug_assert!(!name.is_empty(), "function without a name");
        Self {
            name,
            params: Vec::new(),
            results: Vec::new(),
        }
    }

    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    pub fn result(mut self, result: Param) -> Self {
        self.results.push(result);
        self
    }

    pub(crate) fn render(&self, scope: &Scope) -> String {
        let params = self
            .params
            .iter()
            .map(|p| p.render(scope))
            .collect::<Vec<_>>()
            .join(", ");

        let results = match self.results.as_slice() {
            [] => String::new(),
            [single] if single.name.is_empty() => format!(" {}", single.render(scope)),
            many => format!(
                " ({})",
                many.iter()
                    .map(|p| p.render(scope))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        };

        format!("{}({}){}", self.name, params, results)
    }

    pub(crate) fn visit_imports(&self, f: &mut dyn FnMut(&str)) {
        for p in self.params.iter().chain(&self.results) {
            p.ty.visit_imports(f);
        }
    }
}

/// Builder for Go function and method declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Func {
    doc: Option<String>,
    receiver: Option<Param>,
    signature: Signature,
    body: Vec<Stmt>,
}

impl Func {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            doc: None,
            receiver: None,
            signature: Signature::new(name),
            body: Vec::new(),
        }
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Make this a method on `receiver`.
    pub fn receiver(mut self, receiver: Param) -> Self {
        self.receiver = Some(receiver);
        self
    }

    pub fn param(mut self, param: Param) -> Self {
        self.signature = self.signature.param(param);
        self
    }

    pub fn result(mut self, result: Param) -> Self {
        self.signature = self.signature.result(result);
        self
    }

    pub fn stmt(mut self, stmt: Stmt) -> Self {
        self.body.push(stmt);
        self
    }

    /// Append a single-line statement.
    pub fn line(self, code: impl Into<Code>) -> Self {
        self.stmt(Stmt::line(code))
    }

    pub(crate) fn visit_imports(&self, f: &mut dyn FnMut(&str)) {
        if let Some(receiver) = &self.receiver {
            receiver.ty.visit_imports(f);
        }
        self.signature.visit_imports(f);
        for stmt in &self.body {
            stmt.visit_imports(f);
        }
    }

    pub(crate) fn to_fragments(&self, scope: &Scope) -> Vec<CodeFragment> {
        let mut fragments = Vec::new();
        if let Some(doc) = &self.doc {
            fragments.push(CodeFragment::comment(doc.clone()));
        }

        let receiver = self
            .receiver
            .as_ref()
            .map(|r| format!("({}) ", r.render(scope)))
            .unwrap_or_default();
        let head = format!("func {}{}", receiver, self.signature.render(scope));

        if self.body.is_empty() {
            fragments.push(CodeFragment::line(format!("{} {{}}", head)));
        } else {
            fragments.push(CodeFragment::braced(
                format!("{} {{", head),
                self.body.iter().flat_map(|s| s.to_fragments(scope)).collect(),
            ));
        }
        fragments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{builder::CodeBuilder, imports::ImportTable};

    fn render(func: &Func) -> String {
        let mut table = ImportTable::new("svc/pkg/model");
        func.visit_imports(&mut |p| table.register(p));
        let scope = table.resolve("model");
        let mut builder = CodeBuilder::new();
        builder.emit(&func.to_fragments(&scope));
        builder.build()
    }

    #[test]
    fn test_empty_func() {
        assert_eq!(render(&Func::new("LoadEnv")), "func LoadEnv() {}\n");
    }

    #[test]
    fn test_single_unnamed_result() {
        let func = Func::new("IsErrNotFound")
            .param(Param::new("err", GoType::error()))
            .result(Param::unnamed(GoType::ident("bool")))
            .line(Code::new().text("return ").qual("errors", "Is").text("(err, nil)"));

        assert_eq!(
            render(&func),
            "func IsErrNotFound(err error) bool {\n\treturn errors.Is(err, nil)\n}\n"
        );
    }

    #[test]
    fn test_method_with_named_results() {
        let func = Func::new("get")
            .receiver(Param::new("ac", GoType::ident("_dbCache").pointer()))
            .param(Param::new("name", GoType::string()))
            .result(Param::new("al", GoType::ident("alias").pointer()))
            .result(Param::new("ok", GoType::ident("bool")))
            .line("return");

        assert_eq!(
            render(&func),
            "func (ac *_dbCache) get(name string) (al *alias, ok bool) {\n\treturn\n}\n"
        );
    }

    #[test]
    fn test_variadic_param() {
        let func = Func::new("GetDB")
            .param(Param::new("aliasNames", GoType::string()).variadic())
            .result(Param::unnamed(GoType::error()))
            .line("return nil");

        assert!(render(&func).starts_with("func GetDB(aliasNames ...string) error {"));
    }
}
