//! Name resolution over the scope tree.

use crate::{
    ast::Ident,
    scope::{Namespace, ScopeId, ScopeKind},
    symbol::{StringInterner, Symbol},
    ty::TypeId,
};

use super::{AnnotId, Context, DeclId, ExprId};

/// The outcome of resolving one identifier in one namespace.
///
/// Resolution never hands back a bare nullable handle; every caller sees
/// and handles all three cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameResolutionResult {
    /// The name refers to a user declaration.
    Decl(DeclId),
    /// The name refers to a built-in type.
    Builtin(TypeId),
    /// The name is not bound in any visible scope.
    Unresolved(Ident),
}

impl NameResolutionResult {
    pub fn as_decl(&self) -> Option<DeclId> {
        if let Self::Decl(decl) = self {
            Some(*decl)
        } else {
            None
        }
    }

    pub fn as_builtin(&self) -> Option<TypeId> {
        if let Self::Builtin(ty) = self {
            Some(*ty)
        } else {
            None
        }
    }
}

/// Read-only name resolution over a registered context.
pub struct Resolver<'a> {
    ctx: &'a Context,
}

impl Context {
    pub fn resolver(&self) -> Resolver<'_> {
        Resolver { ctx: self }
    }
}

impl Resolver<'_> {
    /// Resolves `name` in `namespace`, walking the scope chain outward from
    /// `scope`. The innermost binding wins. Built-ins are consulted only
    /// once the chain is exhausted, and only in the type namespace, so any
    /// user declaration can shadow them.
    pub fn resolve(
        &self,
        name: Ident,
        namespace: Namespace,
        scope: ScopeId,
    ) -> NameResolutionResult {
        let mut current = Some(scope);
        while let Some(scope) = current {
            if let Some(decl) =
                self.ctx.scopes.lookup_local(scope, namespace, name.symbol)
            {
                return NameResolutionResult::Decl(decl);
            }
            current = self.ctx.scopes.parent_of(scope);
        }

        if namespace == Namespace::Type {
            if let Some(ty) = self.ctx.builtins.by_name(name.symbol) {
                return NameResolutionResult::Builtin(ty);
            }
        }

        tracing::trace!(?namespace, "identifier did not resolve");
        NameResolutionResult::Unresolved(name)
    }

    /// Resolves a `Var` type annotation in the type namespace, starting
    /// from the scope registration recorded for it.
    pub fn resolve_type_var(
        &self,
        annotation: AnnotId,
    ) -> NameResolutionResult {
        let name = self
            .ctx
            .get_annotation(annotation)
            .as_var()
            .expect("resolve_type_var takes Var annotations");
        let scope = self
            .ctx
            .annotation_scope(annotation)
            .expect("annotations are registered before resolution");
        self.resolve(name, Namespace::Type, scope)
    }

    /// Resolves a `Var` expression in the value namespace, starting from
    /// the scope registration recorded for it.
    pub fn resolve_expr_var(&self, expr: ExprId) -> NameResolutionResult {
        let name = self
            .ctx
            .get_expr(expr)
            .as_var()
            .expect("resolve_expr_var takes Var expressions");
        let scope = self
            .ctx
            .expr_scope(expr)
            .expect("expressions are registered before resolution");
        self.resolve(name, Namespace::Value, scope)
    }

    /// Derives the fully qualified name of a declaration from its position
    /// in the scope tree: enclosing named scopes outermost-first, then the
    /// declaration's own name. `None` only for unnamed error placeholders.
    pub fn qualified_name(&self, decl: DeclId) -> Option<QualifiedName> {
        let name = self.ctx.decl_name(decl)?;
        let scope = self
            .ctx
            .decl_scope(decl)
            .expect("declarations are registered before name queries");

        let mut segments = vec![name.symbol];
        let mut current = Some(scope);
        while let Some(scope) = current {
            match self.ctx.scopes.get(scope).kind() {
                ScopeKind::File { module } => segments.push(module),
                ScopeKind::StructBody { name } => segments.push(name),
                ScopeKind::Block => {}
            }
            current = self.ctx.scopes.parent_of(scope);
        }
        segments.reverse();

        Some(QualifiedName {
            segments: segments.into_boxed_slice(),
        })
    }
}

/// A fully qualified declaration name, outermost segment first.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    segments: Box<[Symbol]>,
}

impl QualifiedName {
    pub fn segments(&self) -> &[Symbol] {
        &self.segments
    }

    /// Renders the name dot-separated.
    pub fn display<'a>(
        &'a self,
        interner: &'a StringInterner,
    ) -> QualifiedNameDisplay<'a> {
        QualifiedNameDisplay {
            name: self,
            interner,
        }
    }
}

pub struct QualifiedNameDisplay<'a> {
    name: &'a QualifiedName,
    interner: &'a StringInterner,
}

impl std::fmt::Display for QualifiedNameDisplay<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, &segment) in self.name.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(self.interner.resolve(segment).unwrap_or("?"))?;
        }
        Ok(())
    }
}
