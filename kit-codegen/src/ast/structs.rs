//! Go struct builder.

use indexmap::IndexMap;

use super::GoType;
use crate::{builder::CodeFragment, imports::Scope};

/// A field in a Go struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Empty for an embedded field.
    pub name: String,
    pub ty: GoType,
    pub tags: IndexMap<String, String>,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: GoType) -> Self {
        Self {
            name: name.into(),
            ty,
            tags: IndexMap::new(),
        }
    }

    /// An embedded field (`*sync.RWMutex`).
    pub fn embedded(ty: GoType) -> Self {
        Self::new("", ty)
    }

    /// Add a struct tag entry; keys render in insertion order.
    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    fn tag_literal(&self) -> Option<String> {
        if self.tags.is_empty() {
            return None;
        }
        let body = self
            .tags
            .iter()
            .map(|(k, v)| format!("{}:\"{}\"", k, v))
            .collect::<Vec<_>>()
            .join(" ");
        Some(format!("`{}`", body))
    }
}

/// Builder for Go struct type declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Struct {
    name: String,
    doc: Option<String>,
    fields: Vec<Field>,
}

impl Struct {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        debug_assert!(!name.is_empty(), "struct without a name");
        Self {
            name,
            doc: None,
            fields: Vec::new(),
        }
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub(crate) fn visit_imports(&self, f: &mut dyn FnMut(&str)) {
        for field in &self.fields {
            field.ty.visit_imports(f);
        }
    }

    pub(crate) fn to_fragments(&self, scope: &Scope) -> Vec<CodeFragment> {
        let mut fragments = Vec::new();
        if let Some(doc) = &self.doc {
            fragments.push(CodeFragment::comment(doc.clone()));
        }

        if self.fields.is_empty() {
            fragments.push(CodeFragment::line(format!(
                "type {} struct{{}}",
                self.name
            )));
        } else {
            fragments.push(CodeFragment::braced(
                format!("type {} struct {{", self.name),
                self.field_lines(scope)
                    .into_iter()
                    .map(CodeFragment::Line)
                    .collect(),
            ));
        }
        fragments
    }

    /// Field lines with gofmt column alignment.
    ///
    /// Names align across each run of named fields; types align across each
    /// run of consecutive tagged fields.
    fn field_lines(&self, scope: &Scope) -> Vec<String> {
        let rows: Vec<(&str, String, Option<String>)> = self
            .fields
            .iter()
            .map(|f| (f.name.as_str(), f.ty.render(scope), f.tag_literal()))
            .collect();

        let name_widths = run_widths(&rows, |(name, _, _)| {
            (!name.is_empty()).then_some(name.chars().count())
        });
        let type_widths = run_widths(&rows, |(name, ty, tag)| {
            (!name.is_empty() && tag.is_some()).then_some(ty.chars().count())
        });

        rows.iter()
            .enumerate()
            .map(|(i, (name, ty, tag))| {
                if name.is_empty() {
                    return ty.clone();
                }
                let mut line = format!("{:<width$} {}", name, ty, width = name_widths[i]);
                if let Some(tag) = tag {
                    let pad = type_widths[i].saturating_sub(ty.chars().count());
                    line.push_str(&" ".repeat(pad));
                    line.push(' ');
                    line.push_str(tag);
                }
                line
            })
            .collect()
    }
}

/// For every row, the widest cell in the run of consecutive rows that have
/// a cell at all (0 for rows without one).
fn run_widths<T>(rows: &[T], cell: impl Fn(&T) -> Option<usize>) -> Vec<usize> {
    let cells: Vec<Option<usize>> = rows.iter().map(cell).collect();
    let mut widths = vec![0; rows.len()];

    let mut start = 0;
    while start < cells.len() {
        if cells[start].is_none() {
            start += 1;
            continue;
        }
        let mut end = start;
        while end < cells.len() && cells[end].is_some() {
            end += 1;
        }
        let max = cells[start..end].iter().flatten().copied().max().unwrap_or(0);
        widths[start..end].fill(max);
        start = end;
    }
    widths
}
