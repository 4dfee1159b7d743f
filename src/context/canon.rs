//! Canonicalization of annotations into structural types.

use thiserror::Error;

use crate::{
    ast::{Ident, annotation::TypeAnnotation},
    scope::{Namespace, ScopeId},
    ty::{Type, TypeId},
};

use super::{AnnotId, Context, DeclId, SigId, resolve::NameResolutionResult};

/// Errors produced while turning annotations into types.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TypeError {
    /// The annotation names something no scope or built-in defines.
    #[error("unknown type name")]
    UnknownType(Ident),
    /// The annotation names a declaration that is not a type.
    #[error("expected a type, found a value declaration")]
    KindMismatch { name: Ident, decl: DeclId },
}

/// One pending step of the canonicalization walk.
enum Frame {
    Visit(AnnotId),
    Pointer { mutable: bool },
    Function { arity: usize },
}

impl Context {
    /// Canonicalizes `annotation` into its structural type, resolving type
    /// names from `scope`. Equal structures come back with equal IDs.
    ///
    /// The walk keeps its own frame stack, so pointer chains of any depth
    /// canonicalize without recursing.
    pub fn canonicalize(
        &mut self,
        annotation: AnnotId,
        scope: ScopeId,
    ) -> Result<TypeId, TypeError> {
        let mut frames = vec![Frame::Visit(annotation)];
        let mut results: Vec<TypeId> = Vec::new();

        while let Some(frame) = frames.pop() {
            match frame {
                // cloning the row keeps the walk free of table borrows
                Frame::Visit(id) => match self.get_annotation(id).clone() {
                    TypeAnnotation::Var(name) => {
                        results.push(self.canonicalize_var(name, scope)?);
                    }
                    TypeAnnotation::Pointer { pointee, mutable } => {
                        frames.push(Frame::Pointer { mutable });
                        frames.push(Frame::Visit(pointee));
                    }
                    TypeAnnotation::Function { params, return_ty } => {
                        frames.push(Frame::Function {
                            arity: params.len(),
                        });
                        frames.push(Frame::Visit(return_ty));
                        // reversed, so the first param is popped first
                        for &param in params.iter().rev() {
                            frames.push(Frame::Visit(param));
                        }
                    }
                },
                Frame::Pointer { mutable } => {
                    let pointee = results
                        .pop()
                        .expect("pointer frames follow their pointee");
                    let ty = Type::Pointer { pointee, mutable };
                    results.push(self.types.intern(ty));
                }
                Frame::Function { arity } => {
                    let return_ty = results
                        .pop()
                        .expect("function frames follow their return type");
                    let params = results
                        .split_off(results.len() - arity)
                        .into_boxed_slice();
                    let ty = Type::Function { params, return_ty };
                    results.push(self.types.intern(ty));
                }
            }
        }

        Ok(results
            .pop()
            .expect("canonicalization leaves exactly one result"))
    }

    fn canonicalize_var(
        &mut self,
        name: Ident,
        scope: ScopeId,
    ) -> Result<TypeId, TypeError> {
        let resolved = self.resolver().resolve(name, Namespace::Type, scope);
        match resolved {
            NameResolutionResult::Builtin(ty) => Ok(ty),
            NameResolutionResult::Decl(decl) => {
                if self.get_decl(decl).as_struct().is_some() {
                    Ok(self.types.intern(Type::Struct { decl }))
                } else {
                    Err(TypeError::KindMismatch { name, decl })
                }
            }
            NameResolutionResult::Unresolved(name) => {
                Err(TypeError::UnknownType(name))
            }
        }
    }

    /// Canonicalizes a whole signature into its function type. Signatures
    /// with the same shape share one type, whichever declarations they
    /// hang off. An omitted return annotation means `Void`.
    pub fn signature_type(
        &mut self,
        signature: SigId,
        scope: ScopeId,
    ) -> Result<TypeId, TypeError> {
        let sig = self.get_signature(signature).clone();

        let mut params = Vec::with_capacity(sig.params.len());
        for param in &sig.params {
            params.push(self.canonicalize(param.annotation, scope)?);
        }
        let return_ty = match sig.return_ty {
            Some(annotation) => self.canonicalize(annotation, scope)?,
            None => self.builtins.void(),
        };

        let ty = Type::Function {
            params: params.into_boxed_slice(),
            return_ty,
        };
        Ok(self.types.intern(ty))
    }
}
