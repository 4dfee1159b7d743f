//! Syntactic type annotations, prior to canonicalization.

use crate::{ast::Ident, context::AnnotId};

/// A type as written in the source. Annotations are immutable once parsed;
/// canonicalization reads them and never writes back.
#[derive(Debug, Clone)]
pub enum TypeAnnotation {
    /// A bare type name.
    Var(Ident),
    /// A pointer annotation, `*T` or `*mut T`.
    Pointer { pointee: AnnotId, mutable: bool },
    /// A function annotation, `fn(A, B) -> R`.
    Function {
        params: Box<[AnnotId]>,
        return_ty: AnnotId,
    },
}

impl TypeAnnotation {
    pub fn as_var(&self) -> Option<Ident> {
        if let Self::Var(name) = self {
            Some(*name)
        } else {
            None
        }
    }
}
