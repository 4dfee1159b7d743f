//! The symbol-resolution and type-representation core for Krait.
//!
//! Parsed source files are registered into a [`context::Context`], which owns
//! the AST tables, the scope tree, and the canonical type table for one
//! compilation. Resolution and canonicalization queries then run against that
//! context.

pub mod ast;
pub mod context;
pub mod scope;
pub mod source_file;
pub mod span;
pub mod symbol;
pub mod ty;
