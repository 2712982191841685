// Copyright (c) 2017-2020 Fabian Schuiki

//! Queries over the concrete syntax tree.
//!
//! The symbol table never pattern-matches tree shapes itself; it goes through
//! the helpers in this module. The shape conventions they rely on are:
//!
//! - The name of a module, package, or class declaration is the first
//!   identifier leaf among the declaration's direct children.
//! - A function or task header carries its id as a direct `UnqualifiedId` or
//!   `QualifiedId` child; the latter marks an out-of-line definition.
//! - An `UnqualifiedId` may carry an `ActualParameterList` after its
//!   identifier, as in the type reference `A#(.B(1))`.
//! - The name of a net variable, register variable, or gate instance is the
//!   first identifier leaf among its direct children.
//! - A generate block's label hangs off its `GenerateBlockBegin` child.
//! - An `` `include `` directive carries its file as a string literal leaf,
//!   quotes included.

use crate::cst::{NodeKind, SyntaxNode, Token};
use mead_common::name::Name;

/// The first identifier among a node's direct leaf children.
fn first_direct_ident(node: &SyntaxNode) -> Option<Name> {
    node.leaves().filter_map(|leaf| leaf.ident()).next()
}

/// The name of a module declaration.
pub fn module_name(module: &SyntaxNode) -> Option<Name> {
    first_direct_ident(module)
}

/// The name of a package declaration.
pub fn package_name(package: &SyntaxNode) -> Option<Name> {
    first_direct_ident(package)
}

/// The name of a class declaration.
pub fn class_name(class: &SyntaxNode) -> Option<Name> {
    first_direct_ident(class)
}

/// The name of a net variable, register variable, or gate instance.
pub fn declared_name(decl: &SyntaxNode) -> Option<Name> {
    first_direct_ident(decl)
}

/// The id node of a function or task header: an `UnqualifiedId` for ordinary
/// declarations, a `QualifiedId` for out-of-line definitions.
pub fn header_id(header: &SyntaxNode) -> Option<&SyntaxNode> {
    header
        .nodes()
        .find(|n| n.kind == NodeKind::UnqualifiedId || n.kind == NodeKind::QualifiedId)
}

/// The body of a generate if or else clause: a `GenerateBlock`, or a
/// `ConditionalGenerateConstruct` for chained `else if`, or whatever single
/// node the clause wraps.
pub fn generate_body(clause: &SyntaxNode) -> Option<&SyntaxNode> {
    clause
        .nodes()
        .find(|n| {
            n.kind == NodeKind::GenerateBlock || n.kind == NodeKind::ConditionalGenerateConstruct
        })
        .or_else(|| clause.nodes().last())
}

/// The begin label of a generate block, if it has one.
pub fn generate_label(body: &SyntaxNode) -> Option<Name> {
    if body.kind != NodeKind::GenerateBlock {
        return None;
    }
    body.nodes()
        .find(|n| n.kind == NodeKind::GenerateBlockBegin)
        .and_then(first_direct_ident)
}

/// The file named by an `` `include `` directive, quotes included.
pub fn include_file(include: &SyntaxNode) -> Option<Name> {
    include
        .leaves()
        .filter_map(|leaf| match leaf.token {
            Token::LitStr(name) => Some(name),
            _ => None,
        })
        .next()
}

/// Remove the outermost double quotes from `text`, if present.
pub fn strip_quotes(text: &str) -> &str {
    let text = text.strip_prefix('"').unwrap_or(text);
    text.strip_suffix('"').unwrap_or(text)
}
