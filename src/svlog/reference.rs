// Copyright (c) 2018-2020 Fabian Schuiki

//! Dependent reference chains and trees.
//!
//! Every identifier use is captured as a chain of components anchored to the
//! scope it appears in, e.g. `A::B::C` becomes a three-component spine.
//! Named parameters and named ports hang off their anchor as parallel
//! branches, so a parameterized reference such as `A#(.B(1))::C` forms a
//! tree with `::B` and `::C` as siblings under `A`. All nodes live in a
//! per-table arena and refer to each other by id, which keeps handles to
//! siblings valid no matter how the tree grows afterwards.

use crate::table::{SymbolId, SymbolKind};
use mead_common::name::Name;
use std::fmt;

/// How a reference component finds its symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    /// A bare name, looked up from the anchor scope upwards.
    Unqualified,
    /// A name looked up in the anchor scope only, without upward search.
    /// Used for the base of out-of-line definitions.
    Immediate,
    /// A `::` member, looked up inside the parent component's resolved
    /// symbol.
    DirectMember,
    /// A `.` member, looked up inside the declared type of the parent
    /// component's resolved symbol.
    TypeMember,
}

impl ReferenceKind {
    /// The single-character prefix used when printing reference paths.
    pub fn glyph(self) -> &'static str {
        match self {
            ReferenceKind::Unqualified => "@",
            ReferenceKind::Immediate => "!",
            ReferenceKind::DirectMember => "::",
            ReferenceKind::TypeMember => ".",
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

/// One identifier along a reference chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceComponent {
    pub ident: Name,
    pub kind: ReferenceKind,
    /// The metatype the context expects the symbol to have; checked against
    /// the resolved symbol's actual metatype.
    pub expected: SymbolKind,
    pub resolved: Option<SymbolId>,
}

/// An id of a reference node within its table's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RefId(u32);

impl RefId {
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// A node of a reference tree.
#[derive(Debug, Clone)]
pub struct ReferenceNode {
    pub component: ReferenceComponent,
    pub parent: Option<RefId>,
    pub children: Vec<RefId>,
}

/// The arena holding every reference node of a symbol table.
#[derive(Debug, Default)]
pub struct ReferenceArena {
    nodes: Vec<ReferenceNode>,
}

impl ReferenceArena {
    pub fn new() -> ReferenceArena {
        Default::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: RefId) -> &ReferenceNode {
        &self.nodes[id.as_usize()]
    }

    pub fn component(&self, id: RefId) -> &ReferenceComponent {
        &self.node(id).component
    }

    pub fn component_mut(&mut self, id: RefId) -> &mut ReferenceComponent {
        &mut self.nodes[id.as_usize()].component
    }

    fn alloc(&mut self, component: ReferenceComponent, parent: Option<RefId>) -> RefId {
        let id = RefId(self.nodes.len() as u32);
        self.nodes.push(ReferenceNode {
            component,
            parent,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            self.nodes[parent.as_usize()].children.push(id);
        }
        id
    }

    /// Attach a component as a child of `parent`. Used for the parallel
    /// branches of named parameters and named ports.
    pub fn attach_child(&mut self, parent: RefId, component: ReferenceComponent) -> RefId {
        self.alloc(component, Some(parent))
    }

    /// The ids of the subtree under `root`, parents before children.
    pub fn preorder(&self, root: RefId) -> Vec<RefId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            out.push(id);
            for &child in self.node(id).children.iter().rev() {
                stack.push(child);
            }
        }
        out
    }

    /// Print the path of components from the tree root down to `id`, each
    /// prefixed with its reference kind glyph.
    pub fn path_string(&self, id: RefId) -> String {
        let mut chain = Vec::new();
        let mut cursor = Some(id);
        while let Some(c) = cursor {
            chain.push(c);
            cursor = self.node(c).parent;
        }
        let mut out = String::new();
        for &c in chain.iter().rev() {
            let component = self.component(c);
            out.push_str(component.kind.glyph());
            out.push_str(&component.ident.as_str());
        }
        out
    }
}

/// A chain of dependent references under construction or awaiting
/// resolution. The tree itself lives in the table's [`ReferenceArena`]; this
/// is a pair of handles: the root, and the current spine leaf. Chain growth
/// attaches at the spine leaf and advances it; branch attachments through
/// [`ReferenceArena::attach_child`] leave the spine alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceTree {
    root: Option<RefId>,
    leaf: Option<RefId>,
}

impl ReferenceTree {
    pub fn new() -> ReferenceTree {
        Default::default()
    }

    /// Whether any component has been captured yet.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn root(&self) -> Option<RefId> {
        self.root
    }

    /// The terminal of the spine, e.g. the `C` of `A::B::C`. This is the
    /// component a declared type records as its user-defined type.
    pub fn last_leaf(&self) -> Option<RefId> {
        self.leaf
    }

    /// Append a component to the spine: create the root if the tree is
    /// empty, or grow a new spine leaf under the current one.
    pub fn push_component(
        &mut self,
        arena: &mut ReferenceArena,
        component: ReferenceComponent,
    ) -> RefId {
        let id = arena.alloc(component, self.leaf);
        if self.root.is_none() {
            self.root = Some(id);
        }
        self.leaf = Some(id);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mead_common::name::intern;

    fn unqualified(name: &str) -> ReferenceComponent {
        ReferenceComponent {
            ident: intern(name),
            kind: ReferenceKind::Unqualified,
            expected: SymbolKind::Unspecified,
            resolved: None,
        }
    }

    fn member(name: &str) -> ReferenceComponent {
        ReferenceComponent {
            ident: intern(name),
            kind: ReferenceKind::DirectMember,
            expected: SymbolKind::Unspecified,
            resolved: None,
        }
    }

    #[test]
    fn chain_growth() {
        let mut arena = ReferenceArena::new();
        let mut tree = ReferenceTree::new();
        assert!(tree.is_empty());
        let a = tree.push_component(&mut arena, unqualified("a"));
        let b = tree.push_component(&mut arena, member("b"));
        let c = tree.push_component(&mut arena, member("c"));
        assert_eq!(tree.root(), Some(a));
        assert_eq!(tree.last_leaf(), Some(c));
        assert_eq!(arena.node(b).parent, Some(a));
        assert_eq!(arena.node(c).parent, Some(b));
        assert_eq!(arena.path_string(c), "@a::b::c");
    }

    #[test]
    fn branches_do_not_move_the_spine() {
        // A#(.B(1))::C keeps ::B and ::C as siblings under A, and the spine
        // terminal stays ::C.
        let mut arena = ReferenceArena::new();
        let mut tree = ReferenceTree::new();
        let a = tree.push_component(&mut arena, unqualified("A"));
        let b = arena.attach_child(a, member("B"));
        let c = tree.push_component(&mut arena, member("C"));
        assert_eq!(arena.node(a).children, vec![b, c]);
        assert_eq!(arena.node(b).children, Vec::new());
        assert_eq!(tree.last_leaf(), Some(c));
    }

    #[test]
    fn preorder_is_parent_before_child() {
        let mut arena = ReferenceArena::new();
        let mut tree = ReferenceTree::new();
        let a = tree.push_component(&mut arena, unqualified("A"));
        let b = arena.attach_child(a, member("B"));
        let c = tree.push_component(&mut arena, member("C"));
        assert_eq!(arena.preorder(a), vec![a, b, c]);
    }
}
