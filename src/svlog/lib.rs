// Copyright (c) 2016-2020 Fabian Schuiki

//! This crate implements a symbol table for SystemVerilog: it discovers the
//! named declarations in externally-parsed syntax trees, captures every
//! identifier use as a dependent reference anchored to the scope it appears
//! in, and binds the captured references to their declarations in a later
//! resolve pass.

#[macro_use]
extern crate log;

pub use mead_svlog_syntax as syntax;

pub mod builder;
pub mod diag;
pub mod project;
pub mod reference;
pub mod resolver;
pub mod table;

pub use crate::builder::build_symbol_table;
pub use crate::diag::{DiagKind, Diagnostic};
pub use crate::project::{Project, StaticProvider, SyntaxProvider};
pub use crate::reference::{
    ReferenceArena, ReferenceComponent, ReferenceKind, ReferenceNode, ReferenceTree, RefId,
};
pub use crate::table::{
    DeclaredType, Symbol, SymbolId, SymbolInfo, SymbolKind, SymbolTable,
};
