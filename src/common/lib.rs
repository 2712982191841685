// Copyright (c) 2016-2020 Fabian Schuiki

//! This crate contains the fundamental utilities used by the rest of the
//! mead symbol table library.

pub mod errors;
pub mod name;
pub mod source;

use crate::errors::{DiagBuilder2, DiagEmitter, Severity};
use std::cell::Cell;

/// A diagnostics sink for an analysis run.
pub struct Session {
    /// Whether any error diagnostics were produced.
    pub failed: Cell<bool>,
}

impl Session {
    /// Create a new session.
    pub fn new() -> Session {
        Session {
            failed: Cell::new(false),
        }
    }
}

impl Default for Session {
    fn default() -> Session {
        Session::new()
    }
}

impl DiagEmitter for Session {
    fn emit(&self, diag: DiagBuilder2) {
        if diag.severity >= Severity::Error {
            self.failed.set(true);
        }
        eprintln!("{}", diag);
    }
}
