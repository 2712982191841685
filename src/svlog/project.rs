// Copyright (c) 2019-2020 Fabian Schuiki

//! The set of files participating in a symbol table build.
//!
//! Parsing is the business of an external front end, abstracted behind
//! [`SyntaxProvider`]. The project resolves paths to [`Source`] handles
//! through the global source manager, remembers which files are translation
//! units, and memoizes one parse per file, so repeated opens and `` `include ``
//! graft re-entries are cheap and idempotent.

use crate::diag::Diagnostic;
use crate::syntax::SyntaxNode;
use mead_common::source::{get_source_manager, Source};
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;

/// The external parser.
pub trait SyntaxProvider {
    /// Parse a registered source file into a syntax tree.
    fn parse(&self, source: Source) -> Result<Rc<SyntaxNode>, Diagnostic>;
}

/// A provider serving prebuilt syntax trees keyed by file path. Useful for
/// unit tests and for embedders that parse ahead of time.
#[derive(Default)]
pub struct StaticProvider {
    trees: HashMap<String, Rc<SyntaxNode>>,
}

impl StaticProvider {
    pub fn new() -> StaticProvider {
        Default::default()
    }

    /// Register the syntax tree for a path.
    pub fn add(&mut self, path: &str, tree: SyntaxNode) {
        self.trees.insert(path.to_string(), Rc::new(tree));
    }
}

impl SyntaxProvider for StaticProvider {
    fn parse(&self, source: Source) -> Result<Rc<SyntaxNode>, Diagnostic> {
        let path = source.get_path();
        self.trees.get(&*path).cloned().ok_or_else(|| {
            Diagnostic::parse_error(format!("no syntax tree registered for `{}`", path))
        })
    }
}

/// The files of one analysis run.
pub struct Project {
    provider: Box<dyn SyntaxProvider>,
    include_dirs: Vec<String>,
    parsed: HashMap<Source, Result<Rc<SyntaxNode>, Diagnostic>>,
    units: Vec<Source>,
}

impl Project {
    pub fn new(provider: Box<dyn SyntaxProvider>) -> Project {
        Project {
            provider,
            include_dirs: Vec::new(),
            parsed: HashMap::new(),
            units: Vec::new(),
        }
    }

    /// Add a search directory for `` `include `` files.
    pub fn add_include_dir(&mut self, dir: &str) {
        self.include_dirs.push(dir.to_string());
    }

    fn locate(&self, path: &str) -> Option<Source> {
        let sm = get_source_manager();
        sm.find(path).or_else(|| sm.open(path))
    }

    /// Register a file as a translation unit. Idempotent.
    pub fn open_translation_unit(&mut self, path: &str) -> Result<Source, Diagnostic> {
        let source = self.locate(path).ok_or_else(|| {
            Diagnostic::not_found(format!("cannot open translation unit `{}`", path))
        })?;
        if !self.units.contains(&source) {
            self.units.push(source);
        }
        Ok(source)
    }

    /// Open a file named by an `` `include `` directive, searching the
    /// literal path first and the include directories after. Idempotent.
    pub fn open_included_file(&mut self, path: &str) -> Result<Source, Diagnostic> {
        if let Some(source) = self.locate(path) {
            return Ok(source);
        }
        for dir in &self.include_dirs {
            let joined = Path::new(dir).join(path);
            if let Some(joined) = joined.to_str() {
                if let Some(source) = self.locate(joined) {
                    return Ok(source);
                }
            }
        }
        Err(Diagnostic::not_found(format!(
            "cannot open included file `{}`",
            path
        )))
    }

    /// The syntax tree of a file, parsing it through the provider on first
    /// request. The outcome, success or failure, is memoized.
    pub fn syntax_tree(&mut self, source: Source) -> Result<Rc<SyntaxNode>, Diagnostic> {
        if !self.parsed.contains_key(&source) {
            let result = self.provider.parse(source);
            self.parsed.insert(source, result);
        }
        self.parsed[&source].clone()
    }

    /// The registered translation units, in registration order.
    pub fn translation_units(&self) -> Vec<Source> {
        self.units.clone()
    }
}
