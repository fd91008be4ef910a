//! Import table for Go files.
//!
//! Declarations register every qualified reference they hold; the table
//! counts them per import path and assigns each path a local package name
//! when the file is rendered.

use std::collections::{BTreeSet, HashMap, HashSet};

use indexmap::IndexMap;

use crate::builder::CodeFragment;

/// Counts qualified references per import path.
#[derive(Debug, Clone, Default)]
pub struct ImportTable {
    own_path: String,
    local_prefix: Option<String>,
    counts: IndexMap<String, usize>,
    side_effects: BTreeSet<String>,
}

impl ImportTable {
    /// Create a table for a file living in the package `own_path`.
    pub fn new(own_path: impl Into<String>) -> Self {
        Self {
            own_path: own_path.into(),
            ..Self::default()
        }
    }

    /// Treat paths under `module` as local imports, grouped after third-party ones.
    pub fn set_local_prefix(&mut self, module: impl Into<String>) {
        let module = module.into();
        self.local_prefix = (!module.is_empty()).then_some(module);
    }

    /// Record one reference to `path`.
    ///
    /// References to the file's own package are never imported.
    pub fn register(&mut self, path: &str) {
        debug_assert!(!path.is_empty(), "qualified reference with empty path");
        if path.is_empty() || path == self.own_path {
            return;
        }
        *self.counts.entry(path.to_string()).or_insert(0) += 1;
    }

    /// Import a package for its side effects only (`_ "path"`).
    pub fn register_side_effect(&mut self, path: &str) {
        if path != self.own_path {
            self.side_effects.insert(path.to_string());
        }
    }

    /// Number of references recorded for `path`.
    pub fn count(&self, path: &str) -> usize {
        self.counts.get(path).copied().unwrap_or(0)
    }

    /// Paths that will be imported, in render order.
    pub fn paths(&self) -> Vec<&str> {
        self.resolve_order()
            .into_iter()
            .map(|(path, _)| path)
            .collect()
    }

    /// Assign local names and freeze the table for rendering.
    ///
    /// `own_name` is reserved so no import shadows the file's package name.
    pub fn resolve(&self, own_name: &str) -> Scope {
        let mut taken: HashSet<String> = HashSet::new();
        taken.insert(own_name.to_string());

        let mut aliases = HashMap::new();
        let mut entries = Vec::new();

        for (path, side_effect) in self.resolve_order() {
            let group = self.group(path);
            if side_effect {
                entries.push(ImportEntry {
                    path: path.to_string(),
                    alias: Some("_".to_string()),
                    group,
                });
                continue;
            }

            let base = guess_alias(path);
            let mut alias = base.clone();
            let mut n = 2;
            while taken.contains(&alias) {
                alias = format!("{}{}", base, n);
                n += 1;
            }
            taken.insert(alias.clone());

            let explicit = last_segment(path) != alias;
            entries.push(ImportEntry {
                path: path.to_string(),
                alias: explicit.then(|| alias.clone()),
                group,
            });
            aliases.insert(path.to_string(), alias);
        }

        Scope {
            own_path: self.own_path.clone(),
            aliases,
            entries,
        }
    }

    fn group(&self, path: &str) -> ImportGroup {
        match &self.local_prefix {
            Some(prefix)
                if path == prefix
                    || path
                        .strip_prefix(prefix.as_str())
                        .is_some_and(|rest| rest.starts_with('/')) =>
            {
                ImportGroup::Local
            }
            _ if is_stdlib(path) => ImportGroup::Std,
            _ => ImportGroup::ThirdParty,
        }
    }

    /// Counted and side-effect paths grouped (standard library, third-party,
    /// local), each group sorted.
    fn resolve_order(&self) -> Vec<(&str, bool)> {
        let mut paths: Vec<(&str, bool)> = self
            .counts
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(path, _)| (path.as_str(), false))
            .chain(
                self.side_effects
                    .iter()
                    .filter(|path| !self.counts.contains_key(path.as_str()))
                    .map(|path| (path.as_str(), true)),
            )
            .collect();
        paths.sort_by(|(a, _), (b, _)| (self.group(a), *a).cmp(&(self.group(b), *b)));
        paths
    }
}

/// Import block section, in render order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ImportGroup {
    Std,
    ThirdParty,
    Local,
}

/// One line of the import block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportEntry {
    pub path: String,
    /// Set when the local name differs from the last path segment.
    pub alias: Option<String>,
    pub group: ImportGroup,
}

/// Resolved names for one file render.
#[derive(Debug, Clone)]
pub struct Scope {
    own_path: String,
    aliases: HashMap<String, String>,
    entries: Vec<ImportEntry>,
}

impl Scope {
    /// Spell `name` from package `path` as seen from this file.
    pub fn qualify(&self, path: &str, name: &str) -> String {
        if path.is_empty() || path == self.own_path {
            return name.to_string();
        }
        match self.aliases.get(path) {
            Some(alias) => format!("{}.{}", alias, name),
            None => format!("{}.{}", guess_alias(path), name),
        }
    }

    /// Import lines in render order.
    pub fn entries(&self) -> &[ImportEntry] {
        &self.entries
    }

    /// The parenthesised import block, or `None` when nothing is imported.
    pub fn import_block(&self) -> Option<CodeFragment> {
        if self.entries.is_empty() {
            return None;
        }

        let mut body = Vec::new();
        let mut current = None;
        for entry in &self.entries {
            if current.is_some_and(|group| group != entry.group) {
                body.push(CodeFragment::Blank);
            }
            current = Some(entry.group);

            body.push(CodeFragment::Line(match &entry.alias {
                Some(alias) => format!("{} \"{}\"", alias, entry.path),
                None => format!("\"{}\"", entry.path),
            }));
        }

        Some(CodeFragment::Block {
            header: "import (".to_string(),
            body,
            close: Some(")".to_string()),
        })
    }
}

/// Standard library paths have no dot in their first element.
pub fn is_stdlib(path: &str) -> bool {
    path.split('/').next().is_some_and(|first| !first.contains('.'))
}

/// Guess the package name Go code uses for an import path.
///
/// Takes the last element, skipping a `/vN` major-version suffix, drops a
/// `go-` prefix and anything after the first dot, and keeps identifier
/// characters only.
pub fn guess_alias(path: &str) -> String {
    let mut segments = path.rsplit('/').filter(|s| !s.is_empty());
    let mut last = segments.next().unwrap_or_default();
    if is_major_version(last)
        && let Some(prev) = segments.next()
    {
        last = prev;
    }

    let last = last.strip_prefix("go-").unwrap_or(last);
    let last = last.split('.').next().unwrap_or(last);
    let alias: String = last
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect::<String>()
        .to_lowercase();

    match alias.chars().next() {
        None => "pkg".to_string(),
        Some(c) if c.is_ascii_digit() => format!("pkg{}", alias),
        Some(_) => alias,
    }
}

fn last_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn is_major_version(segment: &str) -> bool {
    segment
        .strip_prefix('v')
        .is_some_and(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()))
}
