// Copyright (c) 2016-2020 Fabian Schuiki
#![allow(dead_code)]

//! Utilities for symbol table tests.
//!
//! The parser is an external collaborator, so tests assemble concrete syntax
//! trees with the builder vocabulary below and serve them through a
//! `StaticProvider`. Each test registers its files under fresh names so that
//! tests sharing a thread never collide in the source manager.

pub use mead_common::errors::DiagEmitter;
pub use mead_common::Session;
pub use mead_svlog::syntax::{NodeKind, SyntaxElem, SyntaxLeaf, SyntaxNode, Token};
pub use mead_svlog::*;

use mead_common::name::intern;
use mead_common::source::{get_source_manager, INVALID_SPAN};
use std::cell::Cell;

/// Produce a file name no other test on this thread has used.
pub fn unit(stem: &str) -> String {
    thread_local!(static INDEX: Cell<usize> = Cell::new(0));
    let idx = INDEX.with(|i| {
        let v = i.get();
        i.set(v + 1);
        v
    });
    format!("{}_{}.sv", stem, idx)
}

/// A built symbol table together with its project and build diagnostics.
pub struct Fixture {
    pub project: Project,
    pub table: SymbolTable,
    pub diagnostics: Vec<Diagnostic>,
    pub paths: Vec<String>,
}

/// Register the given translation units and include files, then build the
/// units in order.
pub fn build_units(
    units: Vec<(String, SyntaxNode)>,
    includes: Vec<(String, SyntaxNode)>,
) -> Fixture {
    build_units_with_dirs(units, includes, vec![])
}

/// Like `build_units`, with `` `include `` search directories.
pub fn build_units_with_dirs(
    units: Vec<(String, SyntaxNode)>,
    includes: Vec<(String, SyntaxNode)>,
    include_dirs: Vec<String>,
) -> Fixture {
    let _ = simple_logger::init();
    let sm = get_source_manager();
    let mut provider = StaticProvider::new();
    let mut paths = Vec::new();
    for (path, tree) in units {
        sm.add(&path, "");
        provider.add(&path, tree);
        paths.push(path);
    }
    for (path, tree) in includes {
        sm.add(&path, "");
        provider.add(&path, tree);
    }
    let mut project = Project::new(Box::new(provider));
    for dir in include_dirs {
        project.add_include_dir(&dir);
    }
    let mut table = SymbolTable::new();
    let mut diagnostics = Vec::new();
    for path in &paths {
        diagnostics.extend(table.build_translation_unit(path, &mut project));
    }
    Fixture {
        project,
        table,
        diagnostics,
        paths,
    }
}

/// Build a single translation unit.
pub fn build_one(tree: SyntaxNode) -> Fixture {
    build_units(vec![(unit("test"), tree)], vec![])
}

/// Register files and open them as translation units without building.
pub fn project_with_units(units: Vec<(String, SyntaxNode)>) -> (Project, Vec<String>) {
    let _ = simple_logger::init();
    let sm = get_source_manager();
    let mut provider = StaticProvider::new();
    let mut paths = Vec::new();
    for (path, tree) in units {
        sm.add(&path, "");
        provider.add(&path, tree);
        paths.push(path);
    }
    let mut project = Project::new(Box::new(provider));
    for path in &paths {
        project.open_translation_unit(path).expect("unit should open");
    }
    (project, paths)
}

/// Register an empty source file that has no syntax tree behind it.
pub fn add_source(stem: &str) -> String {
    let path = unit(stem);
    get_source_manager().add(&path, "");
    path
}

/// Walk a `$root`-relative path of identifiers down the symbol table.
pub fn find(table: &SymbolTable, path: &[&str]) -> Option<SymbolId> {
    let mut id = table.root();
    for name in path {
        id = table.find(id, intern(name))?;
    }
    Some(id)
}

pub fn kind_of(table: &SymbolTable, path: &[&str]) -> SymbolKind {
    table.symbol(find(table, path).expect("symbol not found")).info.kind
}

/// The roots of the non-empty reference trees captured in a scope.
pub fn ref_roots(table: &SymbolTable, scope: SymbolId) -> Vec<RefId> {
    table
        .symbol(scope)
        .info
        .local_refs
        .iter()
        .filter_map(|tree| tree.root())
        .collect()
}

/// The root of the captured reference tree whose first component is `name`.
pub fn ref_root_named(table: &SymbolTable, scope: SymbolId, name: &str) -> RefId {
    let name = intern(name);
    ref_roots(table, scope)
        .into_iter()
        .find(|&root| table.refs().component(root).ident == name)
        .expect("no reference tree with that root identifier")
}

// ----- Leaves ----------------------------------------------------------

pub fn ident(name: &str) -> SyntaxElem {
    SyntaxLeaf::new(Token::Ident(intern(name)), INVALID_SPAN).into()
}

pub fn kw(text: &str) -> SyntaxElem {
    SyntaxLeaf::new(Token::Kw(intern(text)), INVALID_SPAN).into()
}

pub fn dot() -> SyntaxElem {
    SyntaxLeaf::new(Token::Period, INVALID_SPAN).into()
}

pub fn colons() -> SyntaxElem {
    SyntaxLeaf::new(Token::ColonColon, INVALID_SPAN).into()
}

pub fn lit_str(text: &str) -> SyntaxElem {
    SyntaxLeaf::new(Token::LitStr(intern(text)), INVALID_SPAN).into()
}

pub fn node(kind: NodeKind, children: Vec<SyntaxElem>) -> SyntaxElem {
    SyntaxNode::new(kind, children).into()
}

// ----- Design elements -------------------------------------------------

pub fn source_text(items: Vec<SyntaxElem>) -> SyntaxNode {
    SyntaxNode::new(NodeKind::SourceText, items)
}

pub fn module(name: &str, items: Vec<SyntaxElem>) -> SyntaxElem {
    let mut children = vec![kw("module"), ident(name), kw(";")];
    children.extend(items);
    children.push(kw("endmodule"));
    node(NodeKind::ModuleDeclaration, children)
}

pub fn package(name: &str, items: Vec<SyntaxElem>) -> SyntaxElem {
    let mut children = vec![kw("package"), ident(name), kw(";")];
    children.extend(items);
    children.push(kw("endpackage"));
    node(NodeKind::PackageDeclaration, children)
}

pub fn class(name: &str, items: Vec<SyntaxElem>) -> SyntaxElem {
    let mut children = vec![kw("class"), ident(name), kw(";")];
    children.extend(items);
    children.push(kw("endclass"));
    node(NodeKind::ClassDeclaration, children)
}

// ----- Types and data declarations -------------------------------------

/// A primitive type like `wire` or `int`.
pub fn data_type(name: &str) -> SyntaxElem {
    node(NodeKind::DataType, vec![kw(name)])
}

/// A user-defined type reference, optionally parameterized:
/// `name #(params)`.
pub fn named_type(name: &str, params: Vec<SyntaxElem>) -> SyntaxElem {
    let mut id = vec![ident(name)];
    if !params.is_empty() {
        id.push(node(NodeKind::ActualParameterList, params));
    }
    node(NodeKind::DataType, vec![node(NodeKind::UnqualifiedId, id)])
}

/// A named parameter assignment `.name(value)`.
pub fn param_by_name(name: &str, value: Vec<SyntaxElem>) -> SyntaxElem {
    node(
        NodeKind::ParamByName,
        vec![dot(), ident(name), node(NodeKind::Expression, value)],
    )
}

/// `ty name, name, ...;`
pub fn net_decl(ty: &str, names: &[&str]) -> SyntaxElem {
    let mut children = vec![data_type(ty)];
    for name in names {
        children.push(node(NodeKind::NetVariable, vec![ident(name)]));
    }
    node(NodeKind::NetDeclaration, children)
}

/// `parameter name = 1;`
pub fn param_decl(name: &str) -> SyntaxElem {
    node(
        NodeKind::ParamDeclaration,
        vec![
            kw("parameter"),
            node(NodeKind::ParamType, vec![ident(name)]),
            kw("="),
            node(NodeKind::Expression, vec![kw("1")]),
        ],
    )
}

/// A module port declaration like `input x`.
pub fn port_decl(direction: &str, name: &str) -> SyntaxElem {
    node(
        NodeKind::PortDeclaration,
        vec![kw(direction), node(NodeKind::UnqualifiedId, vec![ident(name)])],
    )
}

/// A function/task port item like `int x`.
pub fn port_item(ty: &str, name: &str) -> SyntaxElem {
    node(
        NodeKind::PortItem,
        vec![node(
            NodeKind::DataTypeImplicitBasicIdDimensions,
            vec![data_type(ty), node(NodeKind::UnqualifiedId, vec![ident(name)])],
        )],
    )
}

pub fn port_list(ports: Vec<SyntaxElem>) -> SyntaxElem {
    node(NodeKind::PortList, ports)
}

/// An instantiation `ty #(params) name (ports);`.
pub fn instance(
    ty: &str,
    params: Vec<SyntaxElem>,
    name: &str,
    ports: Vec<SyntaxElem>,
) -> SyntaxElem {
    let mut gate = vec![ident(name)];
    if !ports.is_empty() {
        gate.push(node(NodeKind::PortActualList, ports));
    }
    node(
        NodeKind::DataDeclaration,
        vec![named_type(ty, params), node(NodeKind::GateInstance, gate)],
    )
}

/// A named port connection `.name(actual)`.
pub fn named_port(name: &str, actual: SyntaxElem) -> SyntaxElem {
    node(NodeKind::ActualNamedPort, vec![dot(), ident(name), actual])
}

// ----- References and calls --------------------------------------------

pub fn unq_id(name: &str) -> SyntaxElem {
    node(NodeKind::UnqualifiedId, vec![ident(name)])
}

pub fn qual_id(outer: &str, inner: &str) -> SyntaxElem {
    node(
        NodeKind::QualifiedId,
        vec![unq_id(outer), colons(), unq_id(inner)],
    )
}

/// A bare variable reference.
pub fn var_ref(name: &str) -> SyntaxElem {
    node(
        NodeKind::ReferenceCallBase,
        vec![node(NodeKind::LocalRoot, vec![unq_id(name)])],
    )
}

/// A bare call `name(...)`.
pub fn call(name: &str) -> SyntaxElem {
    node(
        NodeKind::ReferenceCallBase,
        vec![node(
            NodeKind::FunctionCall,
            vec![node(NodeKind::LocalRoot, vec![unq_id(name)])],
        )],
    )
}

/// A qualified call `outer::inner(...)`.
pub fn qualified_call(outer: &str, inner: &str) -> SyntaxElem {
    node(
        NodeKind::ReferenceCallBase,
        vec![node(
            NodeKind::FunctionCall,
            vec![node(NodeKind::LocalRoot, vec![qual_id(outer, inner)])],
        )],
    )
}

/// A method call `obj.method(...)`.
pub fn method_call(obj: &str, method: &str) -> SyntaxElem {
    node(
        NodeKind::ReferenceCallBase,
        vec![
            node(NodeKind::LocalRoot, vec![unq_id(obj)]),
            node(NodeKind::MethodCallExtension, vec![dot(), unq_id(method)]),
        ],
    )
}

pub fn statement(children: Vec<SyntaxElem>) -> SyntaxElem {
    node(NodeKind::Statement, children)
}

// ----- Functions and tasks ---------------------------------------------

pub fn function_header(ret: SyntaxElem, id: SyntaxElem, ports: Vec<SyntaxElem>) -> SyntaxElem {
    node(
        NodeKind::FunctionHeader,
        vec![kw("function"), ret, id, port_list(ports), kw(";")],
    )
}

pub fn function_decl(header: SyntaxElem, body: Vec<SyntaxElem>) -> SyntaxElem {
    let mut children = vec![header];
    children.extend(body);
    children.push(kw("endfunction"));
    node(NodeKind::FunctionDeclaration, children)
}

pub fn function_prototype(header: SyntaxElem) -> SyntaxElem {
    node(NodeKind::FunctionPrototype, vec![kw("extern"), header])
}

pub fn task_header(id: SyntaxElem, ports: Vec<SyntaxElem>) -> SyntaxElem {
    node(
        NodeKind::TaskHeader,
        vec![kw("task"), id, port_list(ports), kw(";")],
    )
}

pub fn task_decl(header: SyntaxElem, body: Vec<SyntaxElem>) -> SyntaxElem {
    let mut children = vec![header];
    children.extend(body);
    children.push(kw("endtask"));
    node(NodeKind::TaskDeclaration, children)
}

pub fn task_prototype(header: SyntaxElem) -> SyntaxElem {
    node(NodeKind::TaskPrototype, vec![kw("extern"), header])
}

// ----- Generate constructs ---------------------------------------------

pub fn gen_block(label: Option<&str>, items: Vec<SyntaxElem>) -> SyntaxElem {
    let mut begin = vec![kw("begin")];
    if let Some(label) = label {
        begin.push(kw(":"));
        begin.push(ident(label));
    }
    let mut children = vec![node(NodeKind::GenerateBlockBegin, begin)];
    children.extend(items);
    children.push(kw("end"));
    node(NodeKind::GenerateBlock, children)
}

pub fn gen_if_clause(body: SyntaxElem) -> SyntaxElem {
    node(
        NodeKind::GenerateIfClause,
        vec![kw("if"), node(NodeKind::Expression, vec![kw("1")]), body],
    )
}

/// `if (...) <body>` with no else clause.
pub fn gen_if(body: SyntaxElem) -> SyntaxElem {
    node(NodeKind::ConditionalGenerateConstruct, vec![gen_if_clause(body)])
}

/// `if (...) <then_body> else <else_body>`.
pub fn gen_if_else(then_body: SyntaxElem, else_body: SyntaxElem) -> SyntaxElem {
    node(
        NodeKind::ConditionalGenerateConstruct,
        vec![
            gen_if_clause(then_body),
            node(NodeKind::GenerateElseClause, vec![kw("else"), else_body]),
        ],
    )
}

// ----- Preprocessing ---------------------------------------------------

pub fn include_directive(path: &str) -> SyntaxElem {
    node(
        NodeKind::PreprocessorInclude,
        vec![kw("`include"), lit_str(&format!("\"{}\"", path))],
    )
}
