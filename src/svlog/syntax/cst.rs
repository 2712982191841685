// Copyright (c) 2016-2020 Fabian Schuiki

//! The concrete syntax tree consumed by the symbol table.
//!
//! Parsing is performed by an external front end; this module only defines
//! the tree shape that front end hands over. The tree is untyped: nodes carry
//! a [`NodeKind`] tag and an ordered list of children, leaves carry a
//! [`Token`]. Node kinds the symbol table does not know about are traversed
//! generically, so a richer producer loses nothing.

use mead_common::name::Name;
use mead_common::source::{Span, INVALID_SPAN};

/// The tag of a syntax tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    // Neutral structural kinds.
    SourceText,
    ItemList,
    Statement,
    Expression,

    // Design elements.
    ModuleDeclaration,
    PackageDeclaration,
    ClassDeclaration,

    // Generate constructs.
    ConditionalGenerateConstruct,
    GenerateIfClause,
    GenerateElseClause,
    GenerateBlock,
    GenerateBlockBegin,

    // Functions and tasks.
    FunctionDeclaration,
    FunctionPrototype,
    FunctionHeader,
    TaskDeclaration,
    TaskPrototype,
    TaskHeader,

    // Ports and data declarations.
    PortList,
    PortItem,
    PortDeclaration,
    NetDeclaration,
    DataDeclaration,
    ParamDeclaration,
    ParamType,

    // Type subtrees.
    TypeInfo,
    DataType,
    DataTypeImplicitBasicIdDimensions,

    // References and calls.
    ReferenceCallBase,
    LocalRoot,
    FunctionCall,
    MethodCallExtension,

    // Actual parameter and port connections.
    ActualParameterList,
    ParamByName,
    PortActualList,
    ActualNamedPort,

    // Instances and variables.
    GateInstance,
    NetVariable,
    RegisterVariable,

    // Identifiers.
    UnqualifiedId,
    QualifiedId,

    // Preprocessing leftovers.
    PreprocessorInclude,
}

/// A token at a leaf of the syntax tree. Only identifiers, the two hierarchy
/// operators, and string literals are meaningful to the symbol table; all
/// other lexemes appear as keywords or are omitted by the producer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    /// An identifier.
    Ident(Name),
    /// The `.` hierarchy operator.
    Period,
    /// The `::` scope operator.
    ColonColon,
    /// A string literal, quotes included.
    LitStr(Name),
    /// Any other lexeme, e.g. a keyword or punctuation.
    Kw(Name),
}

/// A leaf of the syntax tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxLeaf {
    pub token: Token,
    pub span: Span,
}

impl SyntaxLeaf {
    pub fn new(token: Token, span: Span) -> SyntaxLeaf {
        SyntaxLeaf { token, span }
    }

    /// The identifier name, if this leaf is an identifier.
    pub fn ident(&self) -> Option<Name> {
        match self.token {
            Token::Ident(name) => Some(name),
            _ => None,
        }
    }
}

/// An inner node of the syntax tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    pub span: Span,
    pub children: Vec<SyntaxElem>,
}

impl SyntaxNode {
    /// Create a new node whose span covers its children.
    pub fn new(kind: NodeKind, children: Vec<SyntaxElem>) -> SyntaxNode {
        let span = children
            .iter()
            .fold(INVALID_SPAN, |sp, c| Span::union(sp, c.span()));
        SyntaxNode {
            kind,
            span,
            children,
        }
    }

    /// Create a new node with an explicit span.
    pub fn with_span(kind: NodeKind, span: Span, children: Vec<SyntaxElem>) -> SyntaxNode {
        SyntaxNode {
            kind,
            span,
            children,
        }
    }

    /// Iterate over the direct child nodes.
    pub fn nodes(&self) -> impl Iterator<Item = &SyntaxNode> {
        self.children.iter().filter_map(SyntaxElem::as_node)
    }

    /// Iterate over the direct child leaves.
    pub fn leaves(&self) -> impl Iterator<Item = &SyntaxLeaf> {
        self.children.iter().filter_map(SyntaxElem::as_leaf)
    }

    /// The leftmost leaf of this subtree, if any. Subtrees without leaves
    /// represent implicit constructs, e.g. an omitted type.
    pub fn first_leaf(&self) -> Option<&SyntaxLeaf> {
        for child in &self.children {
            match child {
                SyntaxElem::Leaf(leaf) => return Some(leaf),
                SyntaxElem::Node(node) => {
                    if let Some(leaf) = node.first_leaf() {
                        return Some(leaf);
                    }
                }
            }
        }
        None
    }

}

/// Either an inner node or a leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxElem {
    Node(SyntaxNode),
    Leaf(SyntaxLeaf),
}

impl SyntaxElem {
    pub fn as_node(&self) -> Option<&SyntaxNode> {
        match self {
            SyntaxElem::Node(node) => Some(node),
            SyntaxElem::Leaf(_) => None,
        }
    }

    pub fn as_leaf(&self) -> Option<&SyntaxLeaf> {
        match self {
            SyntaxElem::Node(_) => None,
            SyntaxElem::Leaf(leaf) => Some(leaf),
        }
    }

    pub fn span(&self) -> Span {
        match self {
            SyntaxElem::Node(node) => node.span,
            SyntaxElem::Leaf(leaf) => leaf.span,
        }
    }
}

impl From<SyntaxNode> for SyntaxElem {
    fn from(node: SyntaxNode) -> SyntaxElem {
        SyntaxElem::Node(node)
    }
}

impl From<SyntaxLeaf> for SyntaxElem {
    fn from(leaf: SyntaxLeaf) -> SyntaxElem {
        SyntaxElem::Leaf(leaf)
    }
}
