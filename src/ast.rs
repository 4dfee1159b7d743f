//! Syntax trees as the resolver consumes them.
//!
//! Nodes live in the [`Context`](crate::context::Context) tables and refer to
//! each other through copyable typed ids rather than owned pointers, so the
//! context is the sole owner of every tree.

pub mod annotation;
pub mod decl;
pub mod expr;

use crate::{context::Location, symbol::Symbol};

/// An identifier token: interned text plus the location where it appeared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ident {
    pub symbol: Symbol,
    pub loc: Location,
}
