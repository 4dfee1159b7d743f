//! Declaration registration: builds the scope tree for parsed files.
//!
//! Registration runs once per file, before any resolution query against that
//! file. It creates the file's scope subtree, binds every named declaration
//! into the right namespace, and records which scope encloses each node so
//! the resolver entry points can find their starting scopes. A duplicate
//! name loses its binding but its body is still walked, so annotations under
//! it stay resolvable.

use crate::{
    ast::{
        Ident,
        annotation::TypeAnnotation,
        decl::{Decl, StructMember},
        expr::Expr,
    },
    scope::{NameConflict, Namespace, ScopeId, ScopeKind},
};

use super::{AnnotId, Context, DeclId, ExprId, FileId, SigId};

impl Context {
    /// Builds the scope subtree for `file` and declares its top-level
    /// declarations, returning every name conflict encountered. The pass
    /// never aborts early; for each conflict the first binding stands.
    pub fn register_source_file(&mut self, file: FileId) -> Vec<NameConflict> {
        let source = self.get_file(file);
        let module = source.module_name();
        let decls: Vec<DeclId> = source.decls().to_vec();

        let scope = self.scopes.alloc_scope(ScopeKind::File { module }, None);
        self.node_scopes.files.insert(file, scope);
        tracing::debug!(?file, ?scope, "registering source file");

        let mut conflicts = Vec::new();
        for decl in decls {
            self.register_decl(decl, scope, &mut conflicts);
        }
        conflicts
    }

    fn register_decl(
        &mut self,
        decl: DeclId,
        scope: ScopeId,
        conflicts: &mut Vec<NameConflict>,
    ) {
        self.node_scopes.decls.insert(decl, scope);

        // cloning the row keeps the walk free of table borrows
        match self.get_decl(decl).clone() {
            Decl::Error(_) => {}
            Decl::Extern(def) => {
                let name = self.get_signature(def.signature).name;
                self.bind(scope, Namespace::Value, name, decl, conflicts);
                self.register_signature(def.signature, scope);
            }
            Decl::Struct(def) => {
                self.bind(scope, Namespace::Type, def.name, decl, conflicts);

                let body = self.scopes.alloc_scope(
                    ScopeKind::StructBody {
                        name: def.name.symbol,
                    },
                    Some(scope),
                );
                for member in def.members {
                    match member {
                        StructMember::Field(field) => {
                            if let Some(annotation) = field.annotation {
                                self.register_annotation(annotation, body);
                            }
                        }
                        StructMember::Struct(inner) => {
                            self.register_decl(inner, body, conflicts);
                        }
                    }
                }
            }
            Decl::Function(def) => {
                let name = self.get_signature(def.signature).name;
                self.bind(scope, Namespace::Value, name, decl, conflicts);
                self.register_signature(def.signature, scope);

                let body_scope =
                    self.scopes.alloc_scope(ScopeKind::Block, Some(scope));
                for expr in self.get_block(def.body).exprs.clone() {
                    self.register_expr(expr, body_scope);
                }
            }
        }
    }

    fn bind(
        &mut self,
        scope: ScopeId,
        namespace: Namespace,
        name: Ident,
        decl: DeclId,
        conflicts: &mut Vec<NameConflict>,
    ) {
        if let Err(conflict) = self.declare(scope, namespace, name, decl) {
            tracing::debug!(?conflict, "discarding duplicate binding");
            conflicts.push(conflict);
        }
    }

    /// Signature annotations resolve in the scope enclosing the declaration,
    /// not in the function body.
    fn register_signature(&mut self, signature: SigId, scope: ScopeId) {
        let sig = self.get_signature(signature).clone();
        for param in &sig.params {
            self.register_annotation(param.annotation, scope);
        }
        if let Some(return_ty) = sig.return_ty {
            self.register_annotation(return_ty, scope);
        }
    }

    /// Maps every node of an annotation tree to `scope`. Iterative, since
    /// pointer annotations nest arbitrarily deep.
    fn register_annotation(&mut self, annotation: AnnotId, scope: ScopeId) {
        let mut work = vec![annotation];
        while let Some(annot) = work.pop() {
            self.node_scopes.annotations.insert(annot, scope);
            match self.get_annotation(annot) {
                TypeAnnotation::Var(_) => {}
                TypeAnnotation::Pointer { pointee, .. } => work.push(*pointee),
                TypeAnnotation::Function { params, return_ty } => {
                    work.extend(params.iter().copied());
                    work.push(*return_ty);
                }
            }
        }
    }

    /// Maps every node of an expression tree to `scope`.
    fn register_expr(&mut self, expr: ExprId, scope: ScopeId) {
        let mut work = vec![expr];
        while let Some(expr) = work.pop() {
            self.node_scopes.exprs.insert(expr, scope);
            match self.get_expr(expr) {
                Expr::Error(_) | Expr::Var(_) | Expr::IntLiteral { .. } => {}
                Expr::Call { callee, args, .. } => {
                    work.push(*callee);
                    work.extend(args.iter().map(|arg| arg.value));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ast::decl::StructDef,
        context::fixtures::{
            error_decl, extern_def, function_def, ident, loc,
            named_annotation, pointer_annotation, register, struct_def,
            test_ctx,
        },
    };

    #[test]
    fn structs_land_in_the_type_namespace() {
        let (mut ctx, file) = test_ctx("main");
        let i32_field = named_annotation(&mut ctx, file, "i32");
        let point =
            struct_def(&mut ctx, file, "Point", &[("x", Some(i32_field))]);

        let conflicts = register(&mut ctx, file, &[point]);
        assert!(conflicts.is_empty());

        let scope = ctx.file_scope(file).unwrap();
        let name = ctx.interner.intern("Point");
        assert_eq!(
            ctx.scopes.lookup_local(scope, Namespace::Type, name),
            Some(point)
        );
        assert_eq!(
            ctx.scopes.lookup_local(scope, Namespace::Value, name),
            None
        );
    }

    #[test]
    fn externs_land_in_the_value_namespace() {
        let (mut ctx, file) = test_ctx("main");
        let ret = named_annotation(&mut ctx, file, "u32");
        let def = extern_def(&mut ctx, file, "getchar", &[], Some(ret));

        let conflicts = register(&mut ctx, file, &[def]);
        assert!(conflicts.is_empty());

        let scope = ctx.file_scope(file).unwrap();
        let name = ctx.interner.intern("getchar");
        assert_eq!(
            ctx.scopes.lookup_local(scope, Namespace::Value, name),
            Some(def)
        );
        assert_eq!(ctx.scopes.lookup_local(scope, Namespace::Type, name), None);
    }

    #[test]
    fn duplicate_externs_yield_one_conflict() {
        let (mut ctx, file) = test_ctx("main");
        let first = extern_def(&mut ctx, file, "foo", &[], None);
        let second = extern_def(&mut ctx, file, "foo", &[], None);

        let conflicts = register(&mut ctx, file, &[first, second]);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].first, first);
        assert_eq!(conflicts[0].second, second);

        // the first binding stands
        let scope = ctx.file_scope(file).unwrap();
        let name = ctx.interner.intern("foo");
        assert_eq!(
            ctx.scopes.lookup_local(scope, Namespace::Value, name),
            Some(first)
        );
    }

    #[test]
    fn discarded_duplicates_still_get_scope_mappings() {
        let (mut ctx, file) = test_ctx("main");
        let first = extern_def(&mut ctx, file, "foo", &[], None);
        let dup_ret = named_annotation(&mut ctx, file, "u32");
        let second = extern_def(&mut ctx, file, "foo", &[], Some(dup_ret));

        let conflicts = register(&mut ctx, file, &[first, second]);
        assert_eq!(conflicts.len(), 1);

        // the losing declaration's annotations remain resolvable
        assert_eq!(ctx.annotation_scope(dup_ret), ctx.file_scope(file));
    }

    #[test]
    fn nested_structs_bind_inside_the_body_scope() {
        let (mut ctx, file) = test_ctx("main");
        let inner = struct_def(&mut ctx, file, "Inner", &[]);
        let outer_name = ident(&mut ctx, file, "Outer");
        let outer = ctx.alloc_decl(Decl::Struct(StructDef {
            loc: loc(file),
            name: outer_name,
            members: Box::new([StructMember::Struct(inner)]),
        }));

        let conflicts = register(&mut ctx, file, &[outer]);
        assert!(conflicts.is_empty());

        let file_scope = ctx.file_scope(file).unwrap();
        let inner_name = ctx.interner.intern("Inner");

        // not visible at file scope, only in the body scope
        assert_eq!(
            ctx.scopes.lookup_local(file_scope, Namespace::Type, inner_name),
            None
        );
        let body = ctx.decl_scope(inner).unwrap();
        assert_eq!(
            ctx.scopes.lookup_local(body, Namespace::Type, inner_name),
            Some(inner)
        );
        assert_eq!(ctx.scopes.parent_of(body), Some(file_scope));
    }

    #[test]
    fn function_bodies_get_a_block_scope() {
        let (mut ctx, file) = test_ctx("main");
        let x = ident(&mut ctx, file, "x");
        let var = ctx.alloc_expr(Expr::Var(x));
        let def = function_def(&mut ctx, file, "main", &[], None, &[var]);

        let conflicts = register(&mut ctx, file, &[def]);
        assert!(conflicts.is_empty());

        let file_scope = ctx.file_scope(file).unwrap();
        let body_scope = ctx.expr_scope(var).unwrap();
        assert_ne!(body_scope, file_scope);
        assert_eq!(ctx.scopes.parent_of(body_scope), Some(file_scope));
    }

    #[test]
    fn pointer_annotations_map_every_layer() {
        let (mut ctx, file) = test_ctx("main");
        let base = named_annotation(&mut ctx, file, "u32");
        let once = pointer_annotation(&mut ctx, base, false);
        let twice = pointer_annotation(&mut ctx, once, true);
        let point = struct_def(&mut ctx, file, "P", &[("p", Some(twice))]);

        register(&mut ctx, file, &[point]);

        // every layer maps to the struct body scope, not the file scope
        let file_scope = ctx.file_scope(file).unwrap();
        for annot in [base, once, twice] {
            assert_eq!(ctx.annotation_scope(annot), ctx.annotation_scope(base));
        }
        assert_ne!(ctx.annotation_scope(base), Some(file_scope));
        assert_ne!(ctx.annotation_scope(base), None);
    }

    #[test]
    fn error_declarations_are_not_bound() {
        let (mut ctx, file) = test_ctx("main");
        let decl = error_decl(&mut ctx, file);
        let conflicts = register(&mut ctx, file, &[decl]);
        assert!(conflicts.is_empty());
        assert_eq!(ctx.decl_scope(decl), ctx.file_scope(file));
    }
}
