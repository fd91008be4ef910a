//! Statement-level code: token runs and nested blocks.

use crate::{builder::CodeFragment, imports::Scope};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Text(String),
    Qual { path: String, name: String },
}

/// A run of Go source text that may reference symbols from other packages.
///
/// ```
/// use kitgen_codegen::ast::Code;
///
/// let call = Code::new()
///     .text("return ")
///     .qual("errors", "Is")
///     .text("(err, target)");
/// assert!(call.references().eq(["errors"]));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Code {
    tokens: Vec<Token>,
}

impl Code {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append literal source text.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.tokens.push(Token::Text(text.into()));
        self
    }

    /// Append a reference to `name` exported by package `path`.
    pub fn qual(mut self, path: impl Into<String>, name: impl Into<String>) -> Self {
        let (path, name) = (path.into(), name.into());
        debug_assert!(!name.is_empty(), "qualified reference with empty name");
        self.tokens.push(Token::Qual { path, name });
        self
    }

    /// Append a Go string literal.
    pub fn lit(self, value: &str) -> Self {
        self.text(quote(value))
    }

    /// Import paths referenced by this code, with repetition.
    pub fn references(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().filter_map(|token| match token {
            Token::Qual { path, .. } => Some(path.as_str()),
            Token::Text(_) => None,
        })
    }

    pub fn render(&self, scope: &Scope) -> String {
        self.tokens
            .iter()
            .map(|token| match token {
                Token::Text(text) => text.clone(),
                Token::Qual { path, name } => scope.qualify(path, name),
            })
            .collect()
    }

    pub(crate) fn visit_imports(&self, f: &mut dyn FnMut(&str)) {
        self.references().for_each(f);
    }

    /// Lines of the rendered code, each as a fragment.
    pub(crate) fn line_fragments(&self, scope: &Scope) -> Vec<CodeFragment> {
        self.render(scope)
            .lines()
            .map(|line| CodeFragment::Line(line.to_string()))
            .collect()
    }
}

impl From<&str> for Code {
    fn from(text: &str) -> Self {
        Code::new().text(text)
    }
}

impl From<String> for Code {
    fn from(text: String) -> Self {
        Code::new().text(text)
    }
}

/// Quote a string as a Go interpreted string literal.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// A statement inside a function body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    Line(Code),
    /// `head {` body `}`, with an optional `else` branch.
    Block {
        head: Code,
        body: Vec<Stmt>,
        else_body: Option<Vec<Stmt>>,
    },
}

impl Stmt {
    pub fn line(code: impl Into<Code>) -> Self {
        Self::Line(code.into())
    }

    pub fn block(head: impl Into<Code>, body: Vec<Stmt>) -> Self {
        Self::Block {
            head: head.into(),
            body,
            else_body: None,
        }
    }

    /// Attach an `else` branch to a block statement.
    ///
    /// Has no effect on a plain line.
    pub fn or_else(self, branch: Vec<Stmt>) -> Self {
        match self {
            Self::Block { head, body, .. } => Self::Block {
                head,
                body,
                else_body: Some(branch),
            },
            line => line,
        }
    }

    pub(crate) fn visit_imports(&self, f: &mut dyn FnMut(&str)) {
        match self {
            Self::Line(code) => code.visit_imports(f),
            Self::Block {
                head,
                body,
                else_body,
            } => {
                head.visit_imports(f);
                body.iter().for_each(|stmt| stmt.visit_imports(f));
                for stmt in else_body.iter().flatten() {
                    stmt.visit_imports(f);
                }
            }
        }
    }

    pub(crate) fn to_fragments(&self, scope: &Scope) -> Vec<CodeFragment> {
        match self {
            Self::Line(code) => code.line_fragments(scope),
            Self::Block {
                head,
                body,
                else_body,
            } => {
                let body = body.iter().flat_map(|s| s.to_fragments(scope)).collect();
                let header = format!("{} {{", head.render(scope));
                match else_body {
                    None => vec![CodeFragment::braced(header, body)],
                    Some(branch) => vec![
                        CodeFragment::Block {
                            header,
                            body,
                            close: None,
                        },
                        CodeFragment::braced(
                            "} else {",
                            branch.iter().flat_map(|s| s.to_fragments(scope)).collect(),
                        ),
                    ],
                }
            }
        }
    }
}
