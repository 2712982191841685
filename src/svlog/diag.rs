// Copyright (c) 2018-2020 Fabian Schuiki

//! Structured diagnostics for symbol table construction and resolution.
//!
//! Builder and resolver never abort on bad input; they collect diagnostics
//! and keep going, which allows partial recovery after parser errors. Each
//! diagnostic carries a kind so that tools and tests can react to the
//! category without string matching.

use mead_common::errors::DiagBuilder2;
use mead_common::source::{Span, INVALID_SPAN};
use std::fmt;

/// The category of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagKind {
    /// A name is already taken in the scope it is declared in, or an
    /// out-of-line definition clashes with its prototype.
    AlreadyExists,
    /// A name did not resolve to any symbol, or a file could not be opened.
    NotFound,
    /// A name resolved to a symbol of the wrong metatype, or a member lookup
    /// was attempted on something without members.
    InvalidArgument,
    /// The external parser failed to produce a syntax tree.
    ParseError,
}

/// A single finding produced while building or resolving a symbol table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagKind,
    pub message: String,
    pub span: Span,
}

impl Diagnostic {
    pub fn new<S: Into<String>>(kind: DiagKind, message: S) -> Diagnostic {
        Diagnostic {
            kind,
            message: message.into(),
            span: INVALID_SPAN,
        }
    }

    pub fn already_exists<S: Into<String>>(message: S) -> Diagnostic {
        Diagnostic::new(DiagKind::AlreadyExists, message)
    }

    pub fn not_found<S: Into<String>>(message: S) -> Diagnostic {
        Diagnostic::new(DiagKind::NotFound, message)
    }

    pub fn invalid_argument<S: Into<String>>(message: S) -> Diagnostic {
        Diagnostic::new(DiagKind::InvalidArgument, message)
    }

    pub fn parse_error<S: Into<String>>(message: S) -> Diagnostic {
        Diagnostic::new(DiagKind::ParseError, message)
    }

    /// Attach the source range the diagnostic refers to.
    pub fn with_span(mut self, span: Span) -> Diagnostic {
        self.span = span;
        self
    }

    /// Convert into a displayable diagnostic for a `DiagEmitter`.
    pub fn to_diag(&self) -> DiagBuilder2 {
        let d = DiagBuilder2::error(self.message.clone());
        if self.span.is_valid() {
            d.span(self.span)
        } else {
            d
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}
