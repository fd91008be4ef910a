//! GoFile abstraction for structured Go file generation.

use crate::{
    ast::Decl,
    builder::{CodeBuilder, CodeFragment, Renderable},
    imports::{ImportTable, Scope, guess_alias},
};

/// A structured representation of a Go source file.
///
/// Declarations are rendered in the order they were added, separated by
/// blank lines. Imports are derived from the declarations: every qualified
/// reference is counted on [`add`](Self::add), and the import block lists
/// exactly the packages with a non-zero count.
///
/// # Example
///
/// ```
/// use kitgen_codegen::{GoFile, ast::{Func, Code}};
///
/// let file = GoFile::new("shop/pkg/utils").add(
///     Func::new("Now").line(Code::new().text("_ = ").qual("time", "Now").text("()")),
/// );
/// assert!(file.render().contains("import (\n\t\"time\"\n)"));
/// ```
#[derive(Debug, Clone)]
pub struct GoFile {
    package_path: String,
    package_name: String,
    imports: ImportTable,
    decls: Vec<Decl>,
}

impl GoFile {
    /// Create a file in the package with the given import path.
    ///
    /// The package name is guessed from the path's last element.
    pub fn new(package_path: impl Into<String>) -> Self {
        let package_path = package_path.into();
        debug_assert!(!package_path.is_empty(), "file without a package path");
        Self {
            package_name: guess_alias(&package_path),
            imports: ImportTable::new(package_path.clone()),
            package_path,
            decls: Vec::new(),
        }
    }

    /// Override the guessed package name.
    pub fn package_name(mut self, name: impl Into<String>) -> Self {
        self.package_name = name.into();
        self
    }

    /// Group imports under `module` after third-party ones.
    pub fn local_module(mut self, module: impl Into<String>) -> Self {
        self.imports.set_local_prefix(module);
        self
    }

    /// Add a declaration, registering its qualified references.
    #[allow(clippy::should_implement_trait)]
    pub fn add(mut self, decl: impl Into<Decl>) -> Self {
        self.push(decl);
        self
    }

    /// Add a declaration in place.
    pub fn push(&mut self, decl: impl Into<Decl>) {
        let decl = decl.into();
        let imports = &mut self.imports;
        decl.visit_imports(&mut |path| imports.register(path));
        self.decls.push(decl);
    }

    /// Import a package for its side effects only.
    pub fn side_effect_import(mut self, path: &str) -> Self {
        self.imports.register_side_effect(path);
        self
    }

    pub fn path(&self) -> &str {
        &self.package_path
    }

    pub fn name(&self) -> &str {
        &self.package_name
    }

    /// The import table, for inspection.
    pub fn imports(&self) -> &ImportTable {
        &self.imports
    }

    /// Render the file as gofmt-shaped Go source.
    pub fn render(&self) -> String {
        let scope = self.imports.resolve(&self.package_name);
        let mut builder = CodeBuilder::new();
        builder.emit(&ScopedFile { file: self, scope });
        builder.build()
    }
}

/// A file paired with the names resolved for one render.
struct ScopedFile<'a> {
    file: &'a GoFile,
    scope: Scope,
}

impl Renderable for ScopedFile<'_> {
    fn to_fragments(&self) -> Vec<CodeFragment> {
        let mut fragments = vec![CodeFragment::line(format!(
            "package {}",
            self.file.package_name
        ))];

        if let Some(block) = self.scope.import_block() {
            fragments.push(CodeFragment::Blank);
            fragments.push(block);
        }

        for decl in &self.file.decls {
            fragments.push(CodeFragment::Blank);
            fragments.extend(decl.to_fragments(&self.scope));
        }
        fragments
    }
}
