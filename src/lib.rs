// Copyright (c) 2016-2020 Fabian Schuiki

//! A symbol table library for SystemVerilog.

// Re-export everything from the common crate.
pub use mead_common as common;
pub use crate::common::*;

// Pull in subcrates. We might want to feature-gate this at some point.
pub use mead_svlog as svlog;
