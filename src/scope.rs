//! Lexical scopes and the declaration maps inside them.

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::{ast::Ident, context::DeclId, symbol::Symbol};

/// An index into the scope tree.
#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub struct ScopeId(usize);

/// One of the two independent identifier universes a scope binds.
///
/// A single name may be bound in both namespaces at once without conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    Type,
    Value,
}

impl std::fmt::Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Namespace::Type => "type",
            Namespace::Value => "value",
        })
    }
}

#[derive(Debug, Clone, Copy)]
pub enum ScopeKind {
    /// A file's top-level scope, named by the file's module name.
    File { module: Symbol },
    /// The body of a struct declaration, named by the struct.
    StructBody { name: Symbol },
    /// An unnamed scope inside a function body.
    Block,
}

// NOTE: the two-map layout borrows from the design of
// rustc_resolve::late::Rib

/// A single lexical scope.
#[derive(Debug)]
pub struct Scope {
    kind: ScopeKind,
    parent: Option<ScopeId>,
    types: FxHashMap<Symbol, DeclId>,
    values: FxHashMap<Symbol, DeclId>,
}

impl Scope {
    pub fn kind(&self) -> ScopeKind {
        self.kind
    }

    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    fn namespace(&self, namespace: Namespace) -> &FxHashMap<Symbol, DeclId> {
        match namespace {
            Namespace::Type => &self.types,
            Namespace::Value => &self.values,
        }
    }

    fn namespace_mut(
        &mut self,
        namespace: Namespace,
    ) -> &mut FxHashMap<Symbol, DeclId> {
        match namespace {
            Namespace::Type => &mut self.types,
            Namespace::Value => &mut self.values,
        }
    }
}

/// A second declaration of a name already bound in the same scope and
/// namespace. The first binding stands; the second declaration is the one
/// discarded.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("duplicate declaration in the {namespace} namespace")]
pub struct NameConflict {
    pub scope: ScopeId,
    pub namespace: Namespace,
    /// The identifier at the rejected declaration site.
    pub name: Ident,
    /// The declaration that already owns the name.
    pub first: DeclId,
    /// The rejected declaration.
    pub second: DeclId,
}

/// The forest of lexical scopes for one compilation context.
#[derive(Debug, Default)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
}

impl ScopeTree {
    pub fn new() -> Self {
        ScopeTree { scopes: Vec::new() }
    }

    /// Appends a fresh, empty scope. File scopes are roots; every other kind
    /// must have a parent.
    pub fn alloc_scope(
        &mut self,
        kind: ScopeKind,
        parent: Option<ScopeId>,
    ) -> ScopeId {
        debug_assert!(
            matches!(kind, ScopeKind::File { .. }) == parent.is_none(),
            "file scopes are exactly the parentless scopes"
        );

        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope {
            kind,
            parent,
            types: FxHashMap::default(),
            values: FxHashMap::default(),
        });
        id
    }

    pub fn get(&self, id: ScopeId) -> &Scope {
        self.scopes
            .get(id.0)
            .expect("Scope IDs are valid by construction")
    }

    fn get_mut(&mut self, id: ScopeId) -> &mut Scope {
        self.scopes
            .get_mut(id.0)
            .expect("Scope IDs are valid by construction")
    }

    pub fn parent_of(&self, id: ScopeId) -> Option<ScopeId> {
        self.get(id).parent
    }

    /// Binds `name` to `decl` in one scope and namespace.
    ///
    /// Shadowing an enclosing scope is not a conflict; only a duplicate in
    /// this exact scope and namespace is.
    pub fn declare(
        &mut self,
        scope: ScopeId,
        namespace: Namespace,
        name: Ident,
        decl: DeclId,
    ) -> Result<(), NameConflict> {
        use std::collections::hash_map::Entry;

        match self.get_mut(scope).namespace_mut(namespace).entry(name.symbol)
        {
            Entry::Occupied(entry) => Err(NameConflict {
                scope,
                namespace,
                name,
                first: *entry.get(),
                second: decl,
            }),
            Entry::Vacant(entry) => {
                entry.insert(decl);
                Ok(())
            }
        }
    }

    /// Looks `name` up in exactly one scope, without walking parents.
    pub fn lookup_local(
        &self,
        scope: ScopeId,
        namespace: Namespace,
        name: Symbol,
    ) -> Option<DeclId> {
        self.get(scope).namespace(namespace).get(&name).copied()
    }
}
