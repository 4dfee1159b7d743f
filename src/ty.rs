//! Canonical representations of types.
//!
//! Every distinct type structure is interned exactly once per compilation
//! context, so later phases compare types by [`TypeId`] equality instead of
//! walking structures. Struct types are nominal: their identity is the
//! declaring struct.

use rustc_hash::FxHashMap;

use crate::{
    context::{Context, DeclId},
    symbol::{StringInterner, Symbol},
};

/// An index into the canonical type table.
#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub struct TypeId(usize);

/// A canonical type.
#[derive(Debug, Hash, PartialEq, Eq, Clone)]
pub enum Type {
    Void,
    Int { width: u8, signed: bool },
    Pointer { pointee: TypeId, mutable: bool },
    Function {
        params: Box<[TypeId]>,
        return_ty: TypeId,
    },
    Struct { decl: DeclId },
}

impl Type {
    const fn int(width: u8, signed: bool) -> Self {
        Type::Int { width, signed }
    }
}

/// The canonical type table: an append-only store plus a structural cache.
///
/// Two calls to [`TypeTable::intern`] with structurally equal types return
/// the same id; nothing is ever evicted or freed before the table itself.
#[derive(Debug)]
pub struct TypeTable {
    types: Vec<Type>,
    dedup: FxHashMap<Type, TypeId>,
}

impl TypeTable {
    pub fn new() -> Self {
        TypeTable {
            types: Vec::new(),
            dedup: FxHashMap::default(),
        }
    }

    /// Returns the canonical id for `ty`, allocating a slot only on the
    /// first encounter of this structure.
    pub fn intern(&mut self, ty: Type) -> TypeId {
        let next_id = TypeId(self.types.len());
        *self.dedup.entry(ty.clone()).or_insert_with(|| {
            tracing::trace!(id = next_id.0, "interned new type");
            self.types.push(ty);
            next_id
        })
    }

    pub fn get(&self, id: TypeId) -> &Type {
        self.types
            .get(id.0)
            .expect("Type IDs are valid by construction")
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Default for TypeTable {
    fn default() -> Self {
        Self::new()
    }
}

/// The built-in types, pre-canonicalized at context construction.
///
/// The resolver consults these by exact name match only after the whole
/// scope chain has come up empty, so any user declaration can shadow them.
#[derive(Debug)]
pub struct Builtins {
    void: TypeId,
    entries: Box<[(Symbol, TypeId)]>,
}

impl Builtins {
    pub fn new(types: &mut TypeTable, interner: &mut StringInterner) -> Self {
        let entries = [
            ("u32", Type::int(32, false)),
            ("i32", Type::int(32, true)),
            ("u64", Type::int(64, false)),
            ("i64", Type::int(64, true)),
            ("Void", Type::Void),
        ]
        .map(|(name, ty)| (interner.intern_static(name), types.intern(ty)));

        Builtins {
            void: types.intern(Type::Void),
            entries: Box::new(entries),
        }
    }

    /// Looks `name` up in the built-in table.
    pub fn by_name(&self, name: Symbol) -> Option<TypeId> {
        self.entries
            .iter()
            .find_map(|&(builtin, ty)| (builtin == name).then_some(ty))
    }

    /// The canonical `Void` type.
    pub fn void(&self) -> TypeId {
        self.void
    }
}

/// Renders a canonical type for diagnostics.
///
/// Pointer chains are written iteratively, so display tolerates the same
/// nesting depths canonicalization does.
pub struct TypeDisplay<'a> {
    ctx: &'a Context,
    id: TypeId,
}

impl<'a> TypeDisplay<'a> {
    pub(crate) fn new(ctx: &'a Context, id: TypeId) -> Self {
        TypeDisplay { ctx, id }
    }
}

impl std::fmt::Display for TypeDisplay<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut current = self.id;
        loop {
            match self.ctx.types().get(current) {
                Type::Pointer { pointee, mutable } => {
                    f.write_str(if *mutable { "*mut " } else { "*" })?;
                    current = *pointee;
                }
                Type::Void => return f.write_str("Void"),
                Type::Int { width, signed } => {
                    let prefix = if *signed { 'i' } else { 'u' };
                    return write!(f, "{prefix}{width}");
                }
                Type::Function { params, return_ty } => {
                    f.write_str("fn(")?;
                    for (i, param) in params.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{}", self.ctx.display_type(*param))?;
                    }
                    let ret = self.ctx.display_type(*return_ty);
                    return write!(f, ") -> {ret}");
                }
                Type::Struct { decl } => {
                    let name = self
                        .ctx
                        .decl_name(*decl)
                        .and_then(|name| self.ctx.interner.resolve(name.symbol))
                        .unwrap_or("?");
                    return f.write_str(name);
                }
            }
        }
    }
}
