//! Expressions.

use crate::{
    ast::Ident,
    context::{ExprId, Location},
};

#[derive(Debug, Clone)]
pub enum Expr {
    /// A placeholder for an expression the parser could not build.
    Error(Location),
    /// A bare value name.
    Var(Ident),
    IntLiteral { loc: Location, value: u64 },
    Call {
        loc: Location,
        callee: ExprId,
        args: Box<[Arg]>,
    },
}

impl Expr {
    pub fn loc(&self) -> Location {
        match self {
            Expr::Error(loc) => *loc,
            Expr::Var(name) => name.loc,
            Expr::IntLiteral { loc, .. } => *loc,
            Expr::Call { loc, .. } => *loc,
        }
    }

    pub fn as_var(&self) -> Option<Ident> {
        if let Self::Var(name) = self {
            Some(*name)
        } else {
            None
        }
    }
}

/// A call argument, optionally labeled as in `f(x: 1)`.
#[derive(Debug, Clone, Copy)]
pub struct Arg {
    pub label: Option<Ident>,
    pub value: ExprId,
}
