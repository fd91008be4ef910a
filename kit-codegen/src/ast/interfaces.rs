//! Go interface builder.

use super::Signature;
use crate::{builder::CodeFragment, imports::Scope};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Item {
    Method(Signature),
    Comment(String),
}

/// Builder for Go interface type declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interface {
    name: String,
    doc: Option<String>,
    items: Vec<Item>,
}

impl Interface {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        debug_assert!(!name.is_empty(), "interface without a name");
        Self {
            name,
            doc: None,
            items: Vec::new(),
        }
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn method(mut self, signature: Signature) -> Self {
        self.items.push(Item::Method(signature));
        self
    }

    /// A free comment line inside the interface body.
    pub fn comment(mut self, text: impl Into<String>) -> Self {
        self.items.push(Item::Comment(text.into()));
        self
    }

    pub(crate) fn visit_imports(&self, f: &mut dyn FnMut(&str)) {
        for item in &self.items {
            if let Item::Method(signature) = item {
                signature.visit_imports(f);
            }
        }
    }

    pub(crate) fn to_fragments(&self, scope: &Scope) -> Vec<CodeFragment> {
        let mut fragments = Vec::new();
        if let Some(doc) = &self.doc {
            fragments.push(CodeFragment::comment(doc.clone()));
        }

        if self.items.is_empty() {
            fragments.push(CodeFragment::line(format!(
                "type {} interface{{}}",
                self.name
            )));
            return fragments;
        }

        let body = self
            .items
            .iter()
            .map(|item| match item {
                Item::Method(signature) => CodeFragment::Line(signature.render(scope)),
                Item::Comment(text) => CodeFragment::comment(text.clone()),
            })
            .collect();
        fragments.push(CodeFragment::braced(
            format!("type {} interface {{", self.name),
            body,
        ));
        fragments
    }
}
