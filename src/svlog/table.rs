// Copyright (c) 2018-2020 Fabian Schuiki

//! The hierarchical symbol table.
//!
//! Scopes form a strict tree: every named declaration is a node holding a
//! [`SymbolInfo`], keyed by its identifier, unique among its siblings. Nodes
//! live in an arena owned by the [`SymbolTable`] and refer to each other by
//! [`SymbolId`]; the root has index zero, no key, and prints as `$root`.
//! References captured while a scope was current are stored on that scope and
//! bound later by the resolver.

use crate::builder::build_symbol_table;
use crate::diag::Diagnostic;
use crate::project::Project;
use crate::reference::{ReferenceArena, ReferenceKind, ReferenceTree, RefId};
use itertools::Itertools;
use mead_common::name::{intern, Name};
use mead_common::source::{Source, Span, INVALID_SOURCE, INVALID_SPAN};
use std::fmt;

/// The metatype of a declared symbol, or the metatype a reference expects.
///
/// `Unspecified` and `Callable` are patterns that only occur as expectations:
/// the former matches any declaration, the latter matches functions and
/// tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Root,
    Class,
    Module,
    Package,
    Parameter,
    TypeAlias,
    DataNetVariableInstance,
    Function,
    Task,
    Interface,
    Generate,
    Unspecified,
    Callable,
}

impl SymbolKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SymbolKind::Root => "<root>",
            SymbolKind::Class => "class",
            SymbolKind::Module => "module",
            SymbolKind::Package => "package",
            SymbolKind::Parameter => "parameter",
            SymbolKind::TypeAlias => "typedef",
            SymbolKind::DataNetVariableInstance => "data/net/var/instance",
            SymbolKind::Function => "function",
            SymbolKind::Task => "task",
            SymbolKind::Interface => "interface",
            SymbolKind::Generate => "generate",
            SymbolKind::Unspecified => "<unspecified>",
            SymbolKind::Callable => "<callable>",
        }
    }

    /// Check a found metatype against this expectation.
    pub fn matches(self, found: SymbolKind) -> bool {
        match self {
            SymbolKind::Unspecified => true,
            SymbolKind::Callable => matches!(found, SymbolKind::Function | SymbolKind::Task),
            _ => self == found,
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The type a data-like symbol was declared with.
///
/// Only meaningful for nets, variables, instances, parameters, and function
/// return values. `syntax` is invalid for implicit and void types;
/// `named_type` points at the terminal component of the type's reference
/// chain when the type is user-defined, e.g. the `C` of `A::B::C`.
#[derive(Debug, Clone, Copy)]
pub struct DeclaredType {
    pub syntax: Span,
    pub named_type: Option<RefId>,
}

impl DeclaredType {
    pub fn is_primitive(&self) -> bool {
        self.named_type.is_none()
    }
}

impl Default for DeclaredType {
    fn default() -> DeclaredType {
        DeclaredType {
            syntax: INVALID_SPAN,
            named_type: None,
        }
    }
}

/// The payload of a scope node.
#[derive(Debug)]
pub struct SymbolInfo {
    pub kind: SymbolKind,
    /// The file the declaration came from. Changes across `` `include ``
    /// boundaries.
    pub file: Source,
    /// The declaration's syntax, for diagnostics.
    pub syntax: Span,
    pub declared_type: DeclaredType,
    /// References captured while this scope was current, in capture order,
    /// awaiting resolution.
    pub local_refs: Vec<ReferenceTree>,
    /// Names synthesized for unlabeled child scopes. They start with `%`,
    /// which cannot begin a user identifier.
    anon_names: Vec<Name>,
}

impl SymbolInfo {
    pub fn new(kind: SymbolKind, file: Source, syntax: Span) -> SymbolInfo {
        SymbolInfo {
            kind,
            file,
            syntax,
            declared_type: Default::default(),
            local_refs: Vec::new(),
            anon_names: Vec::new(),
        }
    }

    pub fn with_type(mut self, declared_type: DeclaredType) -> SymbolInfo {
        self.declared_type = declared_type;
        self
    }

    /// Produce a fresh scope name of the form `%anon-{base}-{n}`.
    pub fn anonymous_scope_name(&mut self, base: &str) -> Name {
        let n = self.anon_names.len();
        let name = intern(&format!("%anon-{}-{}", base, n));
        self.anon_names.push(name);
        name
    }
}

/// An id of a scope node within its table's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolId(u32);

impl SymbolId {
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// One scope node.
#[derive(Debug)]
pub struct Symbol {
    key: Option<Name>,
    parent: Option<SymbolId>,
    children: Vec<SymbolId>,
    pub info: SymbolInfo,
}

impl Symbol {
    /// The identifier this symbol is known by in its parent scope. The root
    /// has none.
    pub fn key(&self) -> Option<Name> {
        self.key
    }

    pub fn parent(&self) -> Option<SymbolId> {
        self.parent
    }

    /// The child scopes, in declaration order.
    pub fn children(&self) -> &[SymbolId] {
        &self.children
    }
}

/// The symbol table of a set of translation units.
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    refs: ReferenceArena,
}

impl SymbolTable {
    /// Create a table holding only the root scope.
    pub fn new() -> SymbolTable {
        SymbolTable {
            symbols: vec![Symbol {
                key: None,
                parent: None,
                children: Vec::new(),
                info: SymbolInfo::new(SymbolKind::Root, INVALID_SOURCE, INVALID_SPAN),
            }],
            refs: ReferenceArena::new(),
        }
    }

    pub fn root(&self) -> SymbolId {
        SymbolId(0)
    }

    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.as_usize()]
    }

    pub fn symbol_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.symbols[id.as_usize()]
    }

    pub fn refs(&self) -> &ReferenceArena {
        &self.refs
    }

    pub fn refs_mut(&mut self) -> &mut ReferenceArena {
        &mut self.refs
    }

    /// Insert `name` into `scope`, or return the existing node if the name
    /// is already taken. The boolean reports whether an insertion happened.
    pub fn try_emplace(
        &mut self,
        scope: SymbolId,
        name: Name,
        info: SymbolInfo,
    ) -> (SymbolId, bool) {
        if let Some(existing) = self.find(scope, name) {
            return (existing, false);
        }
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(Symbol {
            key: Some(name),
            parent: Some(scope),
            children: Vec::new(),
            info,
        });
        self.symbols[scope.as_usize()].children.push(id);
        (id, true)
    }

    /// Look up a name among the direct children of `scope`.
    pub fn find(&self, scope: SymbolId, name: Name) -> Option<SymbolId> {
        self.symbol(scope)
            .children
            .iter()
            .cloned()
            .find(|&child| self.symbol(child).key == Some(name))
    }

    /// The fully qualified name of a symbol, `$root::outer::inner`.
    pub fn path_string(&self, id: SymbolId) -> String {
        let mut names = Vec::new();
        let mut cursor = Some(id);
        while let Some(c) = cursor {
            let symbol = self.symbol(c);
            names.push(match symbol.key {
                Some(key) => key.as_str().to_string(),
                None => "$root".to_string(),
            });
            cursor = symbol.parent;
        }
        names.iter().rev().join("::")
    }

    /// All scope ids, parents before children, siblings in declaration
    /// order.
    pub fn preorder_ids(&self) -> Vec<SymbolId> {
        let mut out = Vec::new();
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            out.push(id);
            for &child in self.symbol(id).children.iter().rev() {
                stack.push(child);
            }
        }
        out
    }

    fn root_of(&self, id: SymbolId) -> SymbolId {
        let mut cursor = id;
        while let Some(parent) = self.symbol(cursor).parent {
            cursor = parent;
        }
        cursor
    }

    /// Assert the structural invariants that all stored cross-links must
    /// satisfy. Violations are implementation bugs, not input errors.
    pub fn check_integrity(&self) {
        for (index, symbol) in self.symbols.iter().enumerate() {
            let id = SymbolId(index as u32);
            for &child in &symbol.children {
                assert!(
                    child.as_usize() < self.symbols.len(),
                    "child id out of bounds"
                );
                assert_eq!(
                    self.symbol(child).parent,
                    Some(id),
                    "child/parent link mismatch"
                );
            }
            if let Some(named) = symbol.info.declared_type.named_type {
                assert!(
                    named.as_usize() < self.refs.len(),
                    "declared type reference out of bounds"
                );
            }
            for tree in &symbol.info.local_refs {
                let root = match tree.root() {
                    Some(root) => root,
                    None => continue,
                };
                assert!(
                    self.refs.node(root).parent.is_none(),
                    "reference tree root must not have a parent"
                );
                assert!(
                    matches!(
                        self.refs.component(root).kind,
                        ReferenceKind::Unqualified | ReferenceKind::Immediate
                    ),
                    "reference tree root must be unqualified or immediate"
                );
                for node in self.refs.preorder(root) {
                    if let Some(resolved) = self.refs.component(node).resolved {
                        assert!(
                            resolved.as_usize() < self.symbols.len(),
                            "resolved symbols must point into the same symbol table"
                        );
                        assert_eq!(
                            self.root_of(resolved),
                            self.root(),
                            "resolved symbols must share the table root"
                        );
                    }
                }
            }
        }
    }

    /// Build symbol tables for every translation unit registered with the
    /// project, in registration order. Parse failures are forwarded and do
    /// not stop the remaining units.
    pub fn build(&mut self, project: &mut Project) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for unit in project.translation_units() {
            diagnostics.extend(build_symbol_table(unit, self, project));
        }
        diagnostics
    }

    /// Open and build one translation unit on demand.
    pub fn build_translation_unit(
        &mut self,
        path: &str,
        project: &mut Project,
    ) -> Vec<Diagnostic> {
        match project.open_translation_unit(path) {
            Ok(source) => build_symbol_table(source, self, project),
            Err(diag) => vec![diag],
        }
    }

    /// A hierarchical dump of every declared symbol.
    pub fn definitions(&self) -> Definitions {
        Definitions(self)
    }

    /// A per-scope dump of the captured reference trees.
    pub fn references(&self) -> References {
        References(self)
    }
}

impl Default for SymbolTable {
    fn default() -> SymbolTable {
        SymbolTable::new()
    }
}

/// Displays the scope hierarchy. See [`SymbolTable::definitions`].
pub struct Definitions<'a>(&'a SymbolTable);

impl<'a> Definitions<'a> {
    fn print_symbol(&self, f: &mut fmt::Formatter, id: SymbolId, indent: usize) -> fmt::Result {
        let table = self.0;
        let symbol = table.symbol(id);
        write!(f, "{:indent$}", "", indent = indent)?;
        match symbol.key {
            Some(key) => write!(f, "{}", key)?,
            None => write!(f, "$root")?,
        }
        write!(f, " [{}]", symbol.info.kind)?;
        if symbol.info.file.is_valid() {
            write!(f, " file: {}", symbol.info.file.get_path())?;
        }
        if symbol.info.kind == SymbolKind::DataNetVariableInstance {
            match symbol.info.declared_type.named_type {
                Some(named) => write!(f, " type: {}", table.refs().component(named).ident)?,
                None => write!(f, " type: (primitive)")?,
            }
        }
        writeln!(f)?;
        for &child in symbol.children() {
            self.print_symbol(f, child, indent + 4)?;
        }
        Ok(())
    }
}

impl<'a> fmt::Display for Definitions<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.print_symbol(f, self.0.root(), 0)
    }
}

/// Displays the captured references per scope. See
/// [`SymbolTable::references`].
pub struct References<'a>(&'a SymbolTable);

impl<'a> References<'a> {
    fn print_node(&self, f: &mut fmt::Formatter, id: RefId, indent: usize) -> fmt::Result {
        let table = self.0;
        let node = table.refs().node(id);
        let component = &node.component;
        write!(
            f,
            "{:indent$}{}{}",
            "",
            component.kind.glyph(),
            component.ident,
            indent = indent
        )?;
        if component.expected != SymbolKind::Unspecified {
            write!(f, "[{}]", component.expected)?;
        }
        match component.resolved {
            Some(resolved) => writeln!(f, " -> {}", table.path_string(resolved))?,
            None => writeln!(f, " -> <unresolved>")?,
        }
        for &child in &node.children {
            self.print_node(f, child, indent + 4)?;
        }
        Ok(())
    }
}

impl<'a> fmt::Display for References<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let table = self.0;
        for id in table.preorder_ids() {
            let symbol = table.symbol(id);
            if symbol.info.local_refs.is_empty() {
                continue;
            }
            writeln!(f, "{}:", table.path_string(id))?;
            for tree in &symbol.info.local_refs {
                match tree.root() {
                    Some(root) => self.print_node(f, root, 4)?,
                    None => writeln!(f, "    (empty-ref)")?,
                }
            }
        }
        Ok(())
    }
}
