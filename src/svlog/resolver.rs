// Copyright (c) 2019-2020 Fabian Schuiki

//! Reference resolution.
//!
//! Two passes bind the references a build captured. The full pass walks the
//! scope tree in pre-order and, per reference tree, the components in
//! pre-order, so a component's parent is always bound before the component
//! itself. The local pass only binds tree roots against their own scope; it
//! is cheap, diagnostic-free, and binds a subset of what the full pass
//! would. Both passes skip components that are already bound, so re-running
//! them is harmless.

use crate::diag::Diagnostic;
use crate::reference::{ReferenceKind, RefId};
use crate::table::{SymbolId, SymbolKind, SymbolTable};
use mead_common::name::Name;

impl SymbolTable {
    /// Bind every pending reference component, collecting diagnostics for
    /// names that cannot be found and candidates of the wrong metatype.
    pub fn resolve(&mut self) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for scope in self.preorder_ids() {
            let roots: Vec<RefId> = self
                .symbol(scope)
                .info
                .local_refs
                .iter()
                .filter_map(|tree| tree.root())
                .collect();
            for root in roots {
                for node in self.refs().preorder(root) {
                    self.resolve_component(node, scope, &mut diagnostics);
                }
            }
        }
        diagnostics
    }

    /// Bind only reference tree roots, and only against the scope the
    /// reference appeared in. No upward search, no member traversal, no
    /// diagnostics.
    pub fn resolve_locally_only(&mut self) {
        for scope in self.preorder_ids() {
            let roots: Vec<RefId> = self
                .symbol(scope)
                .info
                .local_refs
                .iter()
                .filter_map(|tree| tree.root())
                .collect();
            for root in roots {
                let component = *self.refs().component(root);
                if component.resolved.is_some() {
                    continue;
                }
                match component.kind {
                    ReferenceKind::Unqualified | ReferenceKind::Immediate => {
                        if let Some(found) = self.find(scope, component.ident) {
                            if component.expected.matches(self.symbol(found).info.kind) {
                                self.refs_mut().component_mut(root).resolved = Some(found);
                            }
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    fn resolve_component(
        &mut self,
        id: RefId,
        anchor: SymbolId,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        let component = *self.refs().component(id);
        if component.resolved.is_some() {
            return;
        }
        trace!(
            "resolving {} from {}",
            self.refs().path_string(id),
            self.path_string(anchor)
        );
        match component.kind {
            ReferenceKind::Unqualified => {
                assert!(
                    self.refs().node(id).parent.is_none(),
                    "unqualified component must be a tree root"
                );
                match self.lookup_upwards(anchor, component.ident) {
                    Some(found) => self.bind_checked(id, found, diagnostics),
                    None => diagnostics.push(Diagnostic::not_found(format!(
                        "unable to resolve symbol `{}` from context {}",
                        component.ident,
                        self.path_string(anchor)
                    ))),
                }
            }
            ReferenceKind::Immediate => self.resolve_member_in(id, anchor, diagnostics),
            ReferenceKind::DirectMember => {
                let parent = self
                    .refs()
                    .node(id)
                    .parent
                    .expect("member component without a parent");
                match self.refs().component(parent).resolved {
                    Some(scope) => self.resolve_member_in(id, scope, diagnostics),
                    // An unresolved parent leaves this subtree pending,
                    // without further noise.
                    None => {}
                }
            }
            ReferenceKind::TypeMember => {
                let parent = self
                    .refs()
                    .node(id)
                    .parent
                    .expect("member component without a parent");
                let parent_symbol = match self.refs().component(parent).resolved {
                    Some(symbol) => symbol,
                    None => return,
                };
                let named = match self.symbol(parent_symbol).info.declared_type.named_type {
                    Some(named) => named,
                    None => {
                        // Primitive types have no members.
                        diagnostics.push(Diagnostic::invalid_argument(format!(
                            "type of parent reference {} does not have any members",
                            self.refs().path_string(parent)
                        )));
                        return;
                    }
                };
                // The type chain's scope is not an ancestor of this
                // component, so it is not necessarily bound yet; leave the
                // member pending in that case.
                // TODO: resolve the type chain on demand here.
                let type_scope = match self.refs().component(named).resolved {
                    Some(scope) => scope,
                    None => return,
                };
                self.resolve_member_in(id, type_scope, diagnostics);
            }
        }
    }

    /// Look up a component's name among the direct members of `scope` and
    /// bind it, checking the metatype.
    fn resolve_member_in(
        &mut self,
        id: RefId,
        scope: SymbolId,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        let component = *self.refs().component(id);
        match self.find(scope, component.ident) {
            Some(found) => self.bind_checked(id, found, diagnostics),
            None => diagnostics.push(missing_member(self, component.ident, scope)),
        }
    }

    fn bind_checked(&mut self, id: RefId, found: SymbolId, diagnostics: &mut Vec<Diagnostic>) {
        let component = *self.refs().component(id);
        let found_kind = self.symbol(found).info.kind;
        if component.expected.matches(found_kind) {
            self.refs_mut().component_mut(id).resolved = Some(found);
        } else {
            diagnostics.push(metatype_mismatch(
                component.ident,
                component.expected,
                found_kind,
            ));
        }
    }

    /// Search for a name from `scope` up through its parents, stopping at
    /// the first scope that declares it.
    fn lookup_upwards(&self, scope: SymbolId, name: Name) -> Option<SymbolId> {
        let mut cursor = Some(scope);
        while let Some(id) = cursor {
            // TODO: consult wildcard package imports here once import
            // tracking lands.
            if let Some(found) = self.find(id, name) {
                return Some(found);
            }
            cursor = self.symbol(id).parent();
        }
        None
    }
}

/// Resolve the base component of an out-of-line definition in `scope` only,
/// with its metatype check, and bind it on success. Failures are returned
/// rather than collected because the caller skips the definition subtree.
pub(crate) fn resolve_base_locally(
    table: &mut SymbolTable,
    root: RefId,
    scope: SymbolId,
) -> Result<SymbolId, Diagnostic> {
    let component = *table.refs().component(root);
    assert!(
        matches!(
            component.kind,
            ReferenceKind::Unqualified | ReferenceKind::Immediate
        ),
        "inconsistent reference kind on a base component"
    );
    let found = match table.find(scope, component.ident) {
        Some(found) => found,
        None => return Err(missing_member(table, component.ident, scope)),
    };
    let found_kind = table.symbol(found).info.kind;
    if !component.expected.matches(found_kind) {
        return Err(metatype_mismatch(
            component.ident,
            component.expected,
            found_kind,
        ));
    }
    table.refs_mut().component_mut(root).resolved = Some(found);
    Ok(found)
}

pub(crate) fn missing_member(table: &SymbolTable, name: Name, scope: SymbolId) -> Diagnostic {
    let context_name = match table.symbol(scope).key() {
        Some(key) => key.as_str().to_string(),
        None => "$root".to_string(),
    };
    Diagnostic::not_found(format!(
        "no member symbol `{}` in parent scope ({}) {}",
        name,
        table.symbol(scope).info.kind,
        context_name
    ))
}

pub(crate) fn metatype_mismatch(ident: Name, expected: SymbolKind, found: SymbolKind) -> Diagnostic {
    Diagnostic::invalid_argument(format!(
        "expected reference `{}` to resolve to a {}, but found a {}",
        ident, expected, found
    ))
}
