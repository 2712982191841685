// Copyright (c) 2016-2020 Fabian Schuiki

//! This crate defines the concrete syntax tree for SystemVerilog source files
//! as consumed by the mead symbol table, together with the queries the table
//! performs on it. Producing such trees is the business of an external
//! parser.

pub mod cst;
pub mod query;

pub use crate::cst::{NodeKind, SyntaxElem, SyntaxLeaf, SyntaxNode, Token};
