// Copyright (c) 2018-2020 Fabian Schuiki

//! Symbol table construction.
//!
//! One builder pass walks the concrete syntax tree of a translation unit,
//! creates a scope for every named declaration it encounters, and captures
//! every identifier use as a dependent reference anchored to the scope it
//! appeared in. Binding the captured references to declarations is left to
//! the resolver, so declaration order within and across files does not
//! matter. The pass never aborts on bad input; findings are collected and
//! traversal continues, which allows partial recovery after parser errors.

use crate::diag::Diagnostic;
use crate::project::Project;
use crate::reference::{ReferenceComponent, ReferenceKind, ReferenceTree, RefId};
use crate::resolver;
use crate::syntax::query;
use crate::syntax::{NodeKind, SyntaxElem, SyntaxLeaf, SyntaxNode, Token};
use crate::table::{DeclaredType, SymbolId, SymbolInfo, SymbolKind, SymbolTable};
use mead_common::name::Name;
use mead_common::source::{Source, Span};
use std::mem;

/// Build the symbol table contribution of one translation unit.
///
/// The unit must already be registered with the project; its parse failure,
/// if any, is forwarded as a diagnostic. Symbols land in `table`, includes
/// are opened through `project`.
pub fn build_symbol_table(
    source: Source,
    table: &mut SymbolTable,
    project: &mut Project,
) -> Vec<Diagnostic> {
    let tree = match project.syntax_tree(source) {
        Ok(tree) => tree,
        Err(diag) => return vec![diag],
    };
    let current_scope = table.root();
    let mut builder = Builder {
        table,
        project: Some(project),
        source,
        current_scope,
        ref_builders: Vec::new(),
        branch_point: None,
        decl_type: None,
        last_hierarchy_op: None,
        include_stack: vec![source],
        diagnostics: Vec::new(),
    };
    builder.visit_node(&tree, None);
    builder.diagnostics
}

/// The ancestors of the node currently being visited, innermost first, as a
/// parent-linked chain of stack frames.
#[derive(Clone, Copy)]
struct Context<'a> {
    node: &'a SyntaxNode,
    parent: Option<&'a Context<'a>>,
}

/// Whether the direct parent has the given kind.
fn parent_is(ctx: Option<&Context>, kind: NodeKind) -> bool {
    ctx.map_or(false, |c| c.node.kind == kind)
}

/// Whether the nearest ancestors have the given kinds, innermost first.
fn parents_are(ctx: Option<&Context>, kinds: &[NodeKind]) -> bool {
    let mut ctx = ctx;
    for &kind in kinds {
        match ctx {
            Some(c) if c.node.kind == kind => ctx = c.parent,
            _ => return false,
        }
    }
    true
}

/// The nearest ancestor satisfying a predicate.
fn nearest<'a>(
    ctx: Option<&Context<'a>>,
    mut pred: impl FnMut(&SyntaxNode) -> bool,
) -> Option<&'a SyntaxNode> {
    let mut ctx = ctx;
    while let Some(c) = ctx {
        if pred(c.node) {
            return Some(c.node);
        }
        ctx = c.parent;
    }
    None
}

struct Builder<'a> {
    table: &'a mut SymbolTable,
    project: Option<&'a mut Project>,
    /// The file symbols are attributed to. Re-rooted while traversing an
    /// `` `include `` graft.
    source: Source,
    /// The scope new declarations go into.
    current_scope: SymbolId,
    /// The references under construction, innermost last. A stack because
    /// expressions nest (`f(g(h))`) and so do type references (`A#(B#(C))`).
    ref_builders: Vec<ReferenceTree>,
    /// Where the next named-parameter or named-port component attaches as a
    /// parallel sibling.
    branch_point: Option<RefId>,
    /// The type being bound to declared names, while inside a declaration
    /// that binds one. Unset otherwise, so nested type expressions do not
    /// spill into unrelated declarations.
    decl_type: Option<DeclaredType>,
    /// The most recently seen `.` or `::` token.
    last_hierarchy_op: Option<Token>,
    /// The files currently being traversed, for include cycle detection.
    include_stack: Vec<Source>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Builder<'a> {
    fn visit_elem(&mut self, elem: &SyntaxElem, ctx: Option<&Context>) {
        match elem {
            SyntaxElem::Node(node) => self.visit_node(node, ctx),
            SyntaxElem::Leaf(leaf) => self.visit_leaf(leaf, ctx),
        }
    }

    fn visit_node(&mut self, node: &SyntaxNode, ctx: Option<&Context>) {
        trace!("visit node {:?}", node.kind);
        match node.kind {
            NodeKind::ModuleDeclaration => self.declare_module(node, ctx),
            NodeKind::PackageDeclaration => self.declare_package(node, ctx),
            NodeKind::ClassDeclaration => self.declare_class(node, ctx),
            NodeKind::GenerateIfClause => self.declare_generate_if(node, ctx),
            NodeKind::GenerateElseClause => self.declare_generate_else(node, ctx),
            NodeKind::FunctionDeclaration
            | NodeKind::FunctionPrototype
            | NodeKind::TaskDeclaration
            | NodeKind::TaskPrototype => self.declare_callable(node, ctx),
            NodeKind::FunctionHeader => self.descend_with_fresh_type(node, ctx),
            NodeKind::PortList => self.declare_ports(node, ctx),
            NodeKind::PortItem
            | NodeKind::PortDeclaration
            | NodeKind::NetDeclaration
            | NodeKind::DataDeclaration
            | NodeKind::ParamDeclaration => self.descend_with_fresh_type(node, ctx),
            NodeKind::TypeInfo | NodeKind::DataType => self.descend_type(node, ctx),
            NodeKind::ReferenceCallBase => self.descend_reference(node, ctx),
            NodeKind::NetVariable | NodeKind::RegisterVariable => {
                self.declare_variable(node, ctx)
            }
            NodeKind::GateInstance => self.declare_instance(node, ctx),
            NodeKind::QualifiedId => self.handle_qualified_id(node, ctx),
            NodeKind::PreprocessorInclude => self.enter_include(node),
            _ => self.descend(node, ctx),
        }
    }

    fn visit_leaf(&mut self, leaf: &SyntaxLeaf, ctx: Option<&Context>) {
        match leaf.token {
            Token::Ident(name) => self.handle_identifier(leaf, name, ctx),
            Token::Period | Token::ColonColon => self.last_hierarchy_op = Some(leaf.token),
            _ => {}
        }
    }

    /// Visit the children of `node`, with `node` entered into the ancestor
    /// chain.
    fn descend(&mut self, node: &SyntaxNode, ctx: Option<&Context>) {
        let here = Context { node, parent: ctx };
        for child in &node.children {
            self.visit_elem(child, Some(&here));
        }
    }

    /// Like `descend`, but new declarations go into `scope` for the duration.
    fn descend_in_scope(&mut self, node: &SyntaxNode, ctx: Option<&Context>, scope: SymbolId) {
        let saved = mem::replace(&mut self.current_scope, scope);
        self.descend(node, ctx);
        self.current_scope = saved;
    }

    /// Run `f` with a fresh reference capture on the builder stack, then
    /// commit the captured tree to the scope that is current at close time.
    fn capture_references<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> (ReferenceTree, R) {
        self.ref_builders.push(ReferenceTree::new());
        let result = f(self);
        let tree = self
            .ref_builders
            .pop()
            .expect("reference builder stack imbalance");
        self.table
            .symbol_mut(self.current_scope)
            .info
            .local_refs
            .push(tree);
        (tree, result)
    }

    /// Append a component to the innermost reference under construction.
    fn push_to_current(&mut self, component: ReferenceComponent) -> RefId {
        let mut tree = *self
            .ref_builders
            .last()
            .expect("not in a reference context");
        let id = tree.push_component(self.table.refs_mut(), component);
        *self.ref_builders.last_mut().unwrap() = tree;
        id
    }

    // ----- Declarations ------------------------------------------------

    fn emplace_info(&mut self, name: Name, info: SymbolInfo) -> SymbolId {
        let (id, inserted) = self.table.try_emplace(self.current_scope, name, info);
        if !inserted {
            let scope = self.table.path_string(self.current_scope);
            self.diagnostics.push(Diagnostic::already_exists(format!(
                "symbol `{}` is already defined in the {} scope",
                name, scope
            )));
        }
        id
    }

    /// Declare a named language element: a module, package, class, or task.
    fn emplace_element(&mut self, name: Name, kind: SymbolKind, syntax: Span) -> SymbolId {
        self.emplace_info(name, SymbolInfo::new(kind, self.source, syntax))
    }

    /// Declare a named element carrying the active declaration type: a net,
    /// variable, instance, parameter, or function (through its return type).
    fn emplace_typed_element(&mut self, name: Name, kind: SymbolKind, syntax: Span) -> SymbolId {
        let declared_type = self
            .decl_type
            .expect("typed declaration outside of a declaration type context");
        let info = SymbolInfo::new(kind, self.source, syntax).with_type(declared_type);
        self.emplace_info(name, info)
    }

    /// Declare a scoped element and traverse its subtree inside the new
    /// scope.
    fn declare_scoped_element(
        &mut self,
        node: &SyntaxNode,
        ctx: Option<&Context>,
        name: Name,
        kind: SymbolKind,
    ) {
        let scope = self.emplace_element(name, kind, node.span);
        self.descend_in_scope(node, ctx, scope);
    }

    fn declare_module(&mut self, node: &SyntaxNode, ctx: Option<&Context>) {
        match query::module_name(node) {
            Some(name) => self.declare_scoped_element(node, ctx, name, SymbolKind::Module),
            None => self.descend(node, ctx),
        }
    }

    fn declare_package(&mut self, node: &SyntaxNode, ctx: Option<&Context>) {
        match query::package_name(node) {
            Some(name) => self.declare_scoped_element(node, ctx, name, SymbolKind::Package),
            None => self.descend(node, ctx),
        }
    }

    fn declare_class(&mut self, node: &SyntaxNode, ctx: Option<&Context>) {
        match query::class_name(node) {
            Some(name) => self.declare_scoped_element(node, ctx, name, SymbolKind::Class),
            None => self.descend(node, ctx),
        }
    }

    /// The scope name for a generate body: its begin label if it has one,
    /// a fresh anonymous name otherwise.
    fn generate_scope_name(&mut self, body: Option<&SyntaxNode>) -> Name {
        if let Some(label) = body.and_then(query::generate_label) {
            return label;
        }
        self.table
            .symbol_mut(self.current_scope)
            .info
            .anonymous_scope_name("generate")
    }

    fn declare_generate_if(&mut self, node: &SyntaxNode, ctx: Option<&Context>) {
        let name = self.generate_scope_name(query::generate_body(node));
        self.declare_scoped_element(node, ctx, name, SymbolKind::Generate);
    }

    fn declare_generate_else(&mut self, node: &SyntaxNode, ctx: Option<&Context>) {
        match query::generate_body(node) {
            // A chained `else if` flattens: no scope for the else clause,
            // the inner if clause scopes directly under the current scope.
            Some(body) if body.kind == NodeKind::ConditionalGenerateConstruct => {
                self.visit_node(body, ctx)
            }
            body => {
                let name = self.generate_scope_name(body);
                self.declare_scoped_element(node, ctx, name, SymbolKind::Generate);
            }
        }
    }

    /// Function and task declarations and prototypes defer their scope
    /// creation to the header identifier, so that the return type is still
    /// captured as a reference in the surrounding context. The scope set up
    /// by the identifier is wound back here.
    fn declare_callable(&mut self, node: &SyntaxNode, ctx: Option<&Context>) {
        let saved = self.current_scope;
        self.descend(node, ctx);
        self.current_scope = saved;
    }

    /// Enter a declaration that binds a type to the names it declares.
    fn descend_with_fresh_type(&mut self, node: &SyntaxNode, ctx: Option<&Context>) {
        let saved = self.decl_type.replace(DeclaredType::default());
        self.descend(node, ctx);
        self.decl_type = saved;
    }

    fn declare_ports(&mut self, node: &SyntaxNode, ctx: Option<&Context>) {
        // Out-of-line definitions take their ports from the prototype; the
        // prototype's names are the public interface, so the out-of-line
        // port list is not re-declared.
        let header = nearest(ctx, |n| {
            n.kind == NodeKind::FunctionHeader || n.kind == NodeKind::TaskHeader
        });
        if let Some(id) = header.and_then(query::header_id) {
            if id.kind == NodeKind::QualifiedId {
                return;
            }
        }
        self.descend(node, ctx);
    }

    /// Traverse a type subtree, collecting the references it makes and, when
    /// a declaration is in flight, recording it as the declared type.
    fn descend_type(&mut self, node: &SyntaxNode, ctx: Option<&Context>) {
        let (tree, _) = self.capture_references(|b| {
            // Hide the declaration type and the branch point for the
            // duration: in `A#(B)`, the nested `B` begets its own reference
            // chain but is not involved in the enclosing declaration.
            let saved_type = b.decl_type.take();
            let saved_branch = b.branch_point.take();
            b.descend(node, ctx);
            b.decl_type = saved_type;
            b.branch_point = saved_branch;
        });
        if let Some(decl_type) = self.decl_type.as_mut() {
            if node.first_leaf().is_some() {
                // Leafless type subtrees are implicit or void types and get
                // no syntax origin.
                decl_type.syntax = node.span;
            }
            if !tree.is_empty() {
                decl_type.named_type = tree.last_leaf();
            }
        }
    }

    /// Capture the references made by an expression from the current scope.
    fn descend_reference(&mut self, node: &SyntaxNode, ctx: Option<&Context>) {
        self.capture_references(|b| b.descend(node, ctx));
    }

    fn declare_variable(&mut self, node: &SyntaxNode, ctx: Option<&Context>) {
        if let Some(name) = query::declared_name(node) {
            self.emplace_typed_element(name, SymbolKind::DataNetVariableInstance, node.span);
        }
        self.descend(node, ctx);
    }

    /// Declare one instance of an instantiation statement, and plant a
    /// self-reference: a reference tree whose root is already resolved to
    /// the new instance, so that named port connections hang off it as
    /// parallel children and resolve through the instance's declared type.
    fn declare_instance(&mut self, node: &SyntaxNode, ctx: Option<&Context>) {
        let name = match query::declared_name(node) {
            Some(name) => name,
            None => return self.descend(node, ctx),
        };
        let instance =
            self.emplace_typed_element(name, SymbolKind::DataNetVariableInstance, node.span);
        self.capture_references(|b| {
            let root = b.push_to_current(ReferenceComponent {
                ident: name,
                kind: ReferenceKind::Unqualified,
                expected: SymbolKind::DataNetVariableInstance,
                resolved: Some(instance),
            });
            let saved_branch = b.branch_point.replace(root);
            b.descend(node, ctx);
            b.branch_point = saved_branch;
        });
    }

    // ----- Out-of-line definitions -------------------------------------

    fn handle_qualified_id(&mut self, node: &SyntaxNode, ctx: Option<&Context>) {
        match ctx.map(|c| c.node.kind) {
            Some(NodeKind::FunctionHeader) => {
                let decl = nearest(ctx, |n| {
                    n.kind == NodeKind::FunctionDeclaration
                        || n.kind == NodeKind::FunctionPrototype
                });
                self.descend_out_of_line(node, ctx, SymbolKind::Function, decl.map(|n| n.span));
            }
            Some(NodeKind::TaskHeader) => {
                let decl = nearest(ctx, |n| {
                    n.kind == NodeKind::TaskDeclaration || n.kind == NodeKind::TaskPrototype
                });
                self.descend_out_of_line(node, ctx, SymbolKind::Task, decl.map(|n| n.span));
            }
            // Anywhere else a qualified id is a plain reference.
            _ => self.descend(node, ctx),
        }
    }

    fn descend_out_of_line(
        &mut self,
        node: &SyntaxNode,
        ctx: Option<&Context>,
        kind: SymbolKind,
        decl_span: Option<Span>,
    ) {
        match self.lookup_or_inject_out_of_line(node, ctx, kind, decl_span) {
            Ok(member) => {
                // Construct the definition inside the member's scope. The
                // enclosing declaration winds the scope back afterwards.
                self.current_scope = member;
                self.descend(node, ctx);
            }
            // Without a scope to hold its locals, the definition subtree is
            // skipped entirely.
            Err(diag) => self.diagnostics.push(diag),
        }
    }

    /// Resolve the base of `outer::inner` in the current scope, then look up
    /// or inject `inner` inside it, diagnosing a missing prototype
    /// non-fatally and a metatype clash fatally for this definition.
    fn lookup_or_inject_out_of_line(
        &mut self,
        node: &SyntaxNode,
        ctx: Option<&Context>,
        kind: SymbolKind,
        decl_span: Option<Span>,
    ) -> Result<SymbolId, Diagnostic> {
        let (tree, _) = self.capture_references(|b| b.descend(node, ctx));
        let root = match tree.root() {
            Some(root) => root,
            None => {
                return Err(Diagnostic::not_found(
                    "out-of-line definition carries no name",
                ))
            }
        };
        assert_eq!(
            self.table.refs().node(root).children.len(),
            1,
            "out-of-line definition must be a two-component reference"
        );
        let member_ref = self.table.refs().node(root).children[0];

        // The base must resolve now, in the scope the definition appears in,
        // with no upward search; resolution of the whole definition hinges
        // on it.
        let base = resolver::resolve_base_locally(self.table, root, self.current_scope)?;

        let member_name = self.table.refs().component(member_ref).ident;
        let info = SymbolInfo::new(kind, self.source, decl_span.unwrap_or(node.span));
        let (member, inserted) = self.table.try_emplace(base, member_name, info);
        if inserted {
            // The prototype was missing; the definition is injected and the
            // finding reported non-fatally.
            self.diagnostics
                .push(resolver::missing_member(self.table, member_name, base));
        } else {
            let original_kind = self.table.symbol(member).info.kind;
            if original_kind != kind {
                return Err(Diagnostic::already_exists(format!(
                    "{} {} cannot be redefined out-of-line as a {}",
                    original_kind,
                    self.table.path_string(member),
                    kind
                )));
            }
        }
        // The member component of the self-reference resolves immediately.
        self.table.refs_mut().component_mut(member_ref).resolved = Some(member);
        Ok(member)
    }

    // ----- Includes ----------------------------------------------------

    /// Graft the syntax tree of an included file into the current capture
    /// context. Declarations land in the current scope but are attributed to
    /// the included file.
    fn enter_include(&mut self, node: &SyntaxNode) {
        let filename = match query::include_file(node) {
            Some(filename) => filename,
            None => return,
        };
        let text = filename.as_str();
        let unquoted = query::strip_quotes(&text).to_string();
        debug!("entering `include \"{}\"", unquoted);

        let project = match self.project.as_deref_mut() {
            // Without a project there is nowhere to open files from.
            None => return,
            Some(project) => project,
        };
        let source = match project.open_included_file(&unquoted) {
            Ok(source) => source,
            Err(diag) => return self.diagnostics.push(diag),
        };
        let tree = match project.syntax_tree(source) {
            Ok(tree) => tree,
            Err(diag) => return self.diagnostics.push(diag),
        };
        if self.include_stack.contains(&source) {
            self.diagnostics.push(
                Diagnostic::invalid_argument(format!(
                    "circular `include of \"{}\"",
                    unquoted
                ))
                .with_span(node.span),
            );
            return;
        }

        self.include_stack.push(source);
        let saved = mem::replace(&mut self.source, source);
        self.visit_node(&tree, None);
        self.source = saved;
        self.include_stack.pop();
    }

    // ----- Identifiers -------------------------------------------------

    fn handle_identifier(&mut self, leaf: &SyntaxLeaf, name: Name, ctx: Option<&Context>) {
        // Declarative positions first.
        if parent_is(ctx, NodeKind::ParamType) {
            self.emplace_typed_element(name, SymbolKind::Parameter, leaf.span);
            return;
        }
        if parents_are(ctx, &[NodeKind::UnqualifiedId, NodeKind::PortDeclaration])
            || parents_are(
                ctx,
                &[
                    NodeKind::UnqualifiedId,
                    NodeKind::DataTypeImplicitBasicIdDimensions,
                    NodeKind::PortItem,
                ],
            )
        {
            // A non-parameter port of a module, function, or task.
            self.emplace_typed_element(name, SymbolKind::DataNetVariableInstance, leaf.span);
            return;
        }
        if parents_are(ctx, &[NodeKind::UnqualifiedId, NodeKind::FunctionHeader]) {
            // The declaration deferred by `declare_callable`: the return
            // type is captured by now, so the function can be registered and
            // entered for its ports and body. Out-of-line definitions take
            // the qualified-id path instead.
            let decl = nearest(ctx, |n| {
                n.kind == NodeKind::FunctionDeclaration || n.kind == NodeKind::FunctionPrototype
            });
            if let Some(decl) = decl {
                let function = self.emplace_typed_element(name, SymbolKind::Function, decl.span);
                self.current_scope = function;
            }
            return;
        }
        if parents_are(ctx, &[NodeKind::UnqualifiedId, NodeKind::TaskHeader]) {
            let decl = nearest(ctx, |n| {
                n.kind == NodeKind::TaskDeclaration || n.kind == NodeKind::TaskPrototype
            });
            if let Some(decl) = decl {
                let task = self.emplace_element(name, SymbolKind::Task, decl.span);
                self.current_scope = task;
            }
            return;
        }
        if parent_is(ctx, NodeKind::GateInstance) {
            // The self-reference for the instance is already planted.
            return;
        }

        // Everything else is a use, captured only inside a reference
        // builder.
        if self.ref_builders.is_empty() {
            return;
        }
        trace!("reference component `{}`", name);
        let component = ReferenceComponent {
            ident: name,
            kind: self.infer_reference_kind(ctx),
            expected: self.infer_metatype(ctx),
            resolved: None,
        };

        // Named ports and named parameters attach as parallel siblings under
        // the branch point; everything else grows the chain deeper.
        if parent_is(ctx, NodeKind::ActualNamedPort) || parent_is(ctx, NodeKind::ParamByName) {
            let branch = self
                .branch_point
                .expect("named argument outside of a reference branch");
            self.table.refs_mut().attach_child(branch, component);
            return;
        }
        self.push_to_current(component);
        if self.branch_point.is_none() {
            // The first component of a reference establishes the node that
            // upcoming named arguments branch from.
            self.branch_point = self.ref_builders.last().unwrap().root();
        }
    }

    /// Classify how a new reference component will look up its symbol.
    fn infer_reference_kind(&self, ctx: Option<&Context>) -> ReferenceKind {
        let tree = self
            .ref_builders
            .last()
            .expect("not in a reference context");
        if tree.is_empty() || self.last_hierarchy_op.is_none() {
            // A root component. The base of an out-of-line definition must
            // resolve immediately; all other roots look upward.
            if parents_are(
                ctx,
                &[
                    NodeKind::UnqualifiedId,
                    NodeKind::QualifiedId,
                    NodeKind::FunctionHeader,
                ],
            ) || parents_are(
                ctx,
                &[
                    NodeKind::UnqualifiedId,
                    NodeKind::QualifiedId,
                    NodeKind::TaskHeader,
                ],
            ) {
                return ReferenceKind::Immediate;
            }
            return ReferenceKind::Unqualified;
        }
        if parent_is(ctx, NodeKind::ParamByName) {
            // Named parameters read as `.P`, but they branch off a base that
            // already names the scope to search, so no typeof indirection
            // applies.
            return ReferenceKind::DirectMember;
        }
        match self.last_hierarchy_op {
            Some(Token::Period) => ReferenceKind::TypeMember,
            _ => ReferenceKind::DirectMember,
        }
    }

    /// The metatype the context requires the referenced symbol to have.
    fn infer_metatype(&self, ctx: Option<&Context>) -> SymbolKind {
        let tree = self
            .ref_builders
            .last()
            .expect("not in a reference context");
        if parents_are(
            ctx,
            &[
                NodeKind::UnqualifiedId,
                NodeKind::QualifiedId,
                NodeKind::FunctionHeader,
            ],
        ) {
            // The base of an out-of-line method must be a class, the member
            // a function or task per the header.
            return if tree.is_empty() {
                SymbolKind::Class
            } else {
                SymbolKind::Function
            };
        }
        if parents_are(
            ctx,
            &[
                NodeKind::UnqualifiedId,
                NodeKind::QualifiedId,
                NodeKind::TaskHeader,
            ],
        ) {
            return if tree.is_empty() {
                SymbolKind::Class
            } else {
                SymbolKind::Task
            };
        }
        if parent_is(ctx, NodeKind::ActualNamedPort) {
            return SymbolKind::DataNetVariableInstance;
        }
        if parent_is(ctx, NodeKind::ParamByName) {
            return SymbolKind::Parameter;
        }
        if parents_are(
            ctx,
            &[
                NodeKind::UnqualifiedId,
                NodeKind::LocalRoot,
                NodeKind::FunctionCall,
            ],
        ) {
            // A bare call `f(...)`.
            return SymbolKind::Callable;
        }
        if parents_are(
            ctx,
            &[
                NodeKind::UnqualifiedId,
                NodeKind::QualifiedId,
                NodeKind::LocalRoot,
                NodeKind::FunctionCall,
            ],
        ) {
            // A qualified call `pkg::f(...)`: only the last component must
            // be callable.
            let qualified = nearest(ctx, |n| n.kind == NodeKind::QualifiedId);
            let unqualified = nearest(ctx, |n| n.kind == NodeKind::UnqualifiedId);
            if let (Some(qualified), Some(unqualified)) = (qualified, unqualified) {
                let last = qualified.children.iter().rev().find_map(SyntaxElem::as_node);
                if last.map_or(false, |last| std::ptr::eq(last, unqualified)) {
                    return SymbolKind::Callable;
                }
            }
        }
        if parents_are(
            ctx,
            &[NodeKind::UnqualifiedId, NodeKind::MethodCallExtension],
        ) {
            // A method call `obj.method(...)`.
            return SymbolKind::Callable;
        }
        SymbolKind::Unspecified
    }
}
