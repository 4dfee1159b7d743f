//! Top-level declarations and their component nodes.

use crate::{
    ast::Ident,
    context::{AnnotId, BlockId, DeclId, ExprId, Location, SigId},
};

/// A top-level declaration.
#[derive(Debug, Clone)]
pub enum Decl {
    /// A placeholder for a declaration the parser could not build.
    Error(Location),
    Extern(ExternDef),
    Struct(StructDef),
    Function(FunctionDef),
}

impl Decl {
    pub fn loc(&self) -> Location {
        match self {
            Decl::Error(loc) => *loc,
            Decl::Extern(def) => def.loc,
            Decl::Struct(def) => def.loc,
            Decl::Function(def) => def.loc,
        }
    }

    pub fn as_struct(&self) -> Option<&StructDef> {
        if let Self::Struct(def) = self {
            Some(def)
        } else {
            None
        }
    }
}

/// A foreign function declaration.
#[derive(Debug, Clone)]
pub struct ExternDef {
    pub loc: Location,
    pub signature: SigId,
    /// The name of the foreign function at link time, which may differ from
    /// the signature name the declaration binds.
    pub extern_name: Ident,
}

/// A struct declaration. Member order is source order and is significant.
#[derive(Debug, Clone)]
pub struct StructDef {
    pub loc: Location,
    pub name: Ident,
    pub members: Box<[StructMember]>,
}

#[derive(Debug, Clone)]
pub enum StructMember {
    Field(StructField),
    /// A struct declared inside another struct's body.
    Struct(DeclId),
}

#[derive(Debug, Clone)]
pub struct StructField {
    pub name: Ident,
    /// Absent when the field type is left to inference.
    pub annotation: Option<AnnotId>,
}

/// A function declaration with a body.
#[derive(Debug, Clone)]
pub struct FunctionDef {
    pub loc: Location,
    pub signature: SigId,
    pub body: BlockId,
}

/// The callable surface of a function or extern declaration.
#[derive(Debug, Clone)]
pub struct FunctionSignature {
    pub name: Ident,
    pub params: Box<[Param]>,
    /// Absent return annotations mean the built-in `Void`.
    pub return_ty: Option<AnnotId>,
}

#[derive(Debug, Clone)]
pub struct Param {
    pub name: Ident,
    pub annotation: AnnotId,
}

/// A function body: expression statements in source order.
#[derive(Debug, Clone)]
pub struct Block {
    pub loc: Location,
    pub exprs: Box<[ExprId]>,
}
