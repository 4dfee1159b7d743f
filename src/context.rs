//! The compilation context and its node tables.

use rustc_hash::FxHashMap;

use crate::{
    ast::{
        Ident,
        annotation::TypeAnnotation,
        decl::{Block, Decl, FunctionSignature},
        expr::Expr,
    },
    scope::{NameConflict, Namespace, ScopeId, ScopeTree},
    source_file::SourceFile,
    span::Span,
    symbol::StringInterner,
    ty::{Builtins, TypeDisplay, TypeId, TypeTable},
};

pub mod canon;
pub mod register;
pub mod resolve;

/// A source location: a byte span plus the file it indexes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub span: Span,
    pub file: FileId,
}

#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub struct FileId(usize);

#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub struct DeclId(usize);

#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub struct SigId(usize);

#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub struct BlockId(usize);

#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub struct ExprId(usize);

#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub struct AnnotId(usize);

/// Where each AST node sits in the scope tree, recorded during registration.
///
/// AST nodes carry no parent pointers, so these maps are how the resolver
/// entry points find "the scope enclosing this node".
#[derive(Debug, Default)]
struct NodeScopes {
    files: FxHashMap<FileId, ScopeId>,
    decls: FxHashMap<DeclId, ScopeId>,
    exprs: FxHashMap<ExprId, ScopeId>,
    annotations: FxHashMap<AnnotId, ScopeId>,
}

/// The global environment for one compilation.
///
/// This struct acts as a faux-database for the front end, divided into
/// append-only tables for files, declarations, signatures, blocks,
/// expressions, and annotations, plus the scope tree and the canonical type
/// table. Ids handed out by the `alloc_*` methods stay valid for the
/// lifetime of the context; nothing is freed before the context itself.
#[derive(Debug)]
pub struct Context {
    pub interner: StringInterner,
    pub scopes: ScopeTree,
    files: Vec<SourceFile>,
    declarations: Vec<Decl>,
    signatures: Vec<FunctionSignature>,
    blocks: Vec<Block>,
    exprs: Vec<Expr>,
    annotations: Vec<TypeAnnotation>,
    types: TypeTable,
    builtins: Builtins,
    node_scopes: NodeScopes,
}

impl Context {
    pub fn new() -> Self {
        let mut interner = StringInterner::new();
        let mut types = TypeTable::new();
        let builtins = Builtins::new(&mut types, &mut interner);

        Context {
            interner,
            scopes: ScopeTree::new(),
            files: Vec::new(),
            declarations: Vec::new(),
            signatures: Vec::new(),
            blocks: Vec::new(),
            exprs: Vec::new(),
            annotations: Vec::new(),
            types,
            builtins,
            node_scopes: NodeScopes::default(),
        }
    }

    // FILES

    pub fn add_source_file(&mut self, file: SourceFile) -> FileId {
        let id = FileId(self.files.len());
        self.files.push(file);
        id
    }

    pub fn get_file(&self, id: FileId) -> &SourceFile {
        self.files
            .get(id.0)
            .expect("File IDs are valid by construction")
    }

    /// Attaches the parsed top level to a file. Nodes are allocated against
    /// an already-issued [`FileId`], so this runs after parsing, once per
    /// file.
    pub fn set_file_decls(
        &mut self,
        id: FileId,
        decls: impl Into<Box<[DeclId]>>,
    ) {
        self.files
            .get_mut(id.0)
            .expect("File IDs are valid by construction")
            .set_decls(decls.into());
    }

    /// The scope a registered file's top level declares into. `None` before
    /// registration.
    pub fn file_scope(&self, id: FileId) -> Option<ScopeId> {
        self.node_scopes.files.get(&id).copied()
    }

    // DECLARATIONS

    pub fn alloc_decl(&mut self, decl: Decl) -> DeclId {
        let id = DeclId(self.declarations.len());
        self.declarations.push(decl);
        id
    }

    pub fn get_decl(&self, id: DeclId) -> &Decl {
        self.declarations
            .get(id.0)
            .expect("Declaration IDs are valid by construction")
    }

    /// The name a declaration binds, if it has one. Signature-bearing
    /// declarations are named by their signature; error placeholders are
    /// unnamed.
    pub fn decl_name(&self, id: DeclId) -> Option<Ident> {
        match self.get_decl(id) {
            Decl::Error(_) => None,
            Decl::Struct(def) => Some(def.name),
            Decl::Extern(def) => Some(self.get_signature(def.signature).name),
            Decl::Function(def) => Some(self.get_signature(def.signature).name),
        }
    }

    /// The scope a registered declaration was declared in. `None` before
    /// registration.
    pub fn decl_scope(&self, id: DeclId) -> Option<ScopeId> {
        self.node_scopes.decls.get(&id).copied()
    }

    // SIGNATURES

    pub fn alloc_signature(&mut self, signature: FunctionSignature) -> SigId {
        let id = SigId(self.signatures.len());
        self.signatures.push(signature);
        id
    }

    pub fn get_signature(&self, id: SigId) -> &FunctionSignature {
        self.signatures
            .get(id.0)
            .expect("Signature IDs are valid by construction")
    }

    // BLOCKS

    pub fn alloc_block(&mut self, block: Block) -> BlockId {
        let id = BlockId(self.blocks.len());
        self.blocks.push(block);
        id
    }

    pub fn get_block(&self, id: BlockId) -> &Block {
        self.blocks
            .get(id.0)
            .expect("Block IDs are valid by construction")
    }

    // EXPRESSIONS

    pub fn alloc_expr(&mut self, expr: Expr) -> ExprId {
        let id = ExprId(self.exprs.len());
        self.exprs.push(expr);
        id
    }

    pub fn get_expr(&self, id: ExprId) -> &Expr {
        self.exprs
            .get(id.0)
            .expect("Expression IDs are valid by construction")
    }

    /// The scope enclosing a registered expression. `None` before
    /// registration.
    pub fn expr_scope(&self, id: ExprId) -> Option<ScopeId> {
        self.node_scopes.exprs.get(&id).copied()
    }

    // ANNOTATIONS

    pub fn alloc_annotation(&mut self, annotation: TypeAnnotation) -> AnnotId {
        let id = AnnotId(self.annotations.len());
        self.annotations.push(annotation);
        id
    }

    pub fn get_annotation(&self, id: AnnotId) -> &TypeAnnotation {
        self.annotations
            .get(id.0)
            .expect("Annotation IDs are valid by construction")
    }

    /// The scope a registered annotation resolves its names in. `None`
    /// before registration.
    pub fn annotation_scope(&self, id: AnnotId) -> Option<ScopeId> {
        self.node_scopes.annotations.get(&id).copied()
    }

    // TYPES

    pub fn types(&self) -> &TypeTable {
        &self.types
    }

    pub fn builtins(&self) -> &Builtins {
        &self.builtins
    }

    /// Renders a canonical type for diagnostics.
    pub fn display_type(&self, id: TypeId) -> TypeDisplay<'_> {
        TypeDisplay::new(self, id)
    }

    // SCOPES

    /// Binds `name` to `decl` in one scope and namespace.
    pub fn declare(
        &mut self,
        scope: ScopeId,
        namespace: Namespace,
        name: Ident,
        decl: DeclId,
    ) -> Result<(), NameConflict> {
        self.scopes.declare(scope, namespace, name, decl)
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}


#[cfg(test)]
mod tests {
    use super::{
        fixtures::{
            extern_def, function_def, ident, named_annotation,
            pointer_annotation, register, signature, struct_def, test_ctx,
        },
        resolve::NameResolutionResult,
        *,
    };
    use crate::ty::Type;

    #[test]
    fn a_small_file_flows_through_every_phase() {
        let (mut ctx, file) = test_ctx("geo");

        let x = named_annotation(&mut ctx, file, "u32");
        let y = named_annotation(&mut ctx, file, "u32");
        let point = struct_def(
            &mut ctx,
            file,
            "Point",
            &[("x", Some(x)), ("y", Some(y))],
        );

        let origin = named_annotation(&mut ctx, file, "Point");
        let corner_pointee = named_annotation(&mut ctx, file, "Point");
        let corner = pointer_annotation(&mut ctx, corner_pointee, true);
        let rect = struct_def(
            &mut ctx,
            file,
            "Rect",
            &[("origin", Some(origin)), ("corner", Some(corner))],
        );

        let arg = named_annotation(&mut ctx, file, "u32");
        let ret = named_annotation(&mut ctx, file, "Point");
        let point_new =
            extern_def(&mut ctx, file, "point_new", &[arg], Some(ret));

        let callee = ident(&mut ctx, file, "point_new");
        let callee = ctx.alloc_expr(Expr::Var(callee));
        let main = function_def(&mut ctx, file, "main", &[], None, &[callee]);

        let conflicts =
            register(&mut ctx, file, &[point, rect, point_new, main]);
        assert!(conflicts.is_empty());

        // names written before their declarations resolve all the same
        assert_eq!(
            ctx.resolver().resolve_type_var(origin),
            NameResolutionResult::Decl(point)
        );
        assert_eq!(
            ctx.resolver().resolve_expr_var(callee),
            NameResolutionResult::Decl(point_new)
        );

        let scope = ctx.annotation_scope(origin).unwrap();
        let origin_ty = ctx.canonicalize(origin, scope).unwrap();
        let scope = ctx.annotation_scope(ret).unwrap();
        let ret_ty = ctx.canonicalize(ret, scope).unwrap();
        assert_eq!(origin_ty, ret_ty);
        assert_eq!(*ctx.types().get(origin_ty), Type::Struct { decl: point });

        let scope = ctx.annotation_scope(corner).unwrap();
        let corner_ty = ctx.canonicalize(corner, scope).unwrap();
        assert_eq!(
            *ctx.types().get(corner_ty),
            Type::Pointer {
                pointee: origin_ty,
                mutable: true,
            }
        );
        assert_eq!(ctx.display_type(corner_ty).to_string(), "*mut Point");

        let Decl::Extern(def) = ctx.get_decl(point_new) else {
            panic!("point_new is an extern");
        };
        let sig = def.signature;
        let scope = ctx.decl_scope(point_new).unwrap();
        let sig_ty = ctx.signature_type(sig, scope).unwrap();
        assert_eq!(ctx.display_type(sig_ty).to_string(), "fn(u32) -> Point");

        let name = ctx.resolver().qualified_name(rect).unwrap();
        assert_eq!(name.display(&ctx.interner).to_string(), "geo.Rect");
    }

    #[test]
    fn types_render_for_diagnostics() {
        let (mut ctx, file) = test_ctx("main");
        register(&mut ctx, file, &[]);
        let scope = ctx.file_scope(file).unwrap();

        let mut annotation = named_annotation(&mut ctx, file, "i64");
        for _ in 0..3 {
            annotation = pointer_annotation(&mut ctx, annotation, false);
        }
        let id = ctx.canonicalize(annotation, scope).unwrap();
        assert_eq!(ctx.display_type(id).to_string(), "***i64");

        let param = named_annotation(&mut ctx, file, "u32");
        let sig = signature(&mut ctx, file, "f", &[param], None);
        let id = ctx.signature_type(sig, scope).unwrap();
        assert_eq!(ctx.display_type(id).to_string(), "fn(u32) -> Void");
    }
}
