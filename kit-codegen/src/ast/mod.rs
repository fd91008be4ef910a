//! Go AST builders for structs, interfaces, functions, and package-level values.
//!
//! Nodes hold semantic type and symbol references; import aliases are only
//! decided when a [`GoFile`](crate::GoFile) renders them.

mod code;
mod fns;
mod interfaces;
mod structs;
mod types;
mod values;

pub use code::{Code, Stmt, quote};
pub use fns::{Func, Param, Signature};
pub use interfaces::Interface;
pub use structs::{Field, Struct};
pub use types::GoType;
pub use values::{Const, Var};

use crate::{builder::CodeFragment, imports::Scope};

/// A top-level declaration in a Go file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decl {
    Struct(Struct),
    Interface(Interface),
    Func(Func),
    Var(Var),
    Const(Const),
    /// A free-standing comment block.
    Comment(String),
    /// Verbatim code; qualified references in it are still imported.
    Raw(Code),
}

impl Decl {
    /// Call `f` once per qualified reference held by this declaration.
    pub fn visit_imports(&self, f: &mut dyn FnMut(&str)) {
        match self {
            Decl::Struct(s) => s.visit_imports(f),
            Decl::Interface(i) => i.visit_imports(f),
            Decl::Func(func) => func.visit_imports(f),
            Decl::Var(v) => v.visit_imports(f),
            Decl::Const(c) => c.visit_imports(f),
            Decl::Comment(_) => {}
            Decl::Raw(code) => code.visit_imports(f),
        }
    }

    pub fn to_fragments(&self, scope: &Scope) -> Vec<CodeFragment> {
        match self {
            Decl::Struct(s) => s.to_fragments(scope),
            Decl::Interface(i) => i.to_fragments(scope),
            Decl::Func(func) => func.to_fragments(scope),
            Decl::Var(v) => v.to_fragments(scope),
            Decl::Const(c) => c.to_fragments(scope),
            Decl::Comment(text) => vec![CodeFragment::comment(text.clone())],
            Decl::Raw(code) => code.line_fragments(scope),
        }
    }
}

impl From<Struct> for Decl {
    fn from(s: Struct) -> Self {
        Decl::Struct(s)
    }
}

impl From<Interface> for Decl {
    fn from(i: Interface) -> Self {
        Decl::Interface(i)
    }
}

impl From<Func> for Decl {
    fn from(f: Func) -> Self {
        Decl::Func(f)
    }
}

impl From<Var> for Decl {
    fn from(v: Var) -> Self {
        Decl::Var(v)
    }
}

impl From<Const> for Decl {
    fn from(c: Const) -> Self {
        Decl::Const(c)
    }
}

impl From<Code> for Decl {
    fn from(code: Code) -> Self {
        Decl::Raw(code)
    }
}
