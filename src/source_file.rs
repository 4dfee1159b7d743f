//! Source files as the resolver sees them.

use std::path::Path;

use crate::{context::DeclId, symbol::Symbol};

/// A parsed source file: its path, its module name, and its top-level
/// declarations in source order.
///
/// A file's identity exists before its contents are parsed, since node
/// locations refer back to their file. Loading and parsing happen upstream;
/// once the parsed top level is attached the file is immutable.
#[derive(Debug, Clone)]
pub struct SourceFile {
    path: Box<Path>,
    module: Symbol,
    decls: Box<[DeclId]>,
}

impl SourceFile {
    pub fn new(path: impl Into<Box<Path>>, module: Symbol) -> Self {
        SourceFile {
            path: path.into(),
            module,
            decls: Box::from([]),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The name this file's scope contributes to qualified names.
    pub fn module_name(&self) -> Symbol {
        self.module
    }

    pub fn decls(&self) -> &[DeclId] {
        &self.decls
    }

    pub(crate) fn set_decls(&mut self, decls: Box<[DeclId]>) {
        debug_assert!(
            self.decls.is_empty(),
            "a file's top level is attached exactly once"
        );
        self.decls = decls;
    }
}
