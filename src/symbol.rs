//! Interned identifier text, backed by [`string_interner`].
//!
//! Every identifier the front end touches is interned once; the rest of the
//! crate passes [`Symbol`] handles around and resolves them back to text
//! only at diagnostic boundaries.

use string_interner::{self, backend, symbol};

/// The initial capacity of a [`StringInterner`], in symbols.
const INTERNER_CAPACITY: usize = 1024;

/// An interned string handle.
///
/// Symbols are cheap to copy and compare; two symbols from the same interner
/// are equal exactly when their underlying text is equal. The `Ord` impl is a
/// stable total order on handles (allocation order), not a lexicographic
/// order on the interned text.
#[derive(Debug, Hash, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Symbol(symbol::SymbolU32);

#[derive(Debug)]
pub struct StringInterner(
    string_interner::StringInterner<backend::StringBackend<symbol::SymbolU32>>,
);

impl StringInterner {
    pub fn new() -> Self {
        StringInterner(string_interner::StringInterner::with_capacity(
            INTERNER_CAPACITY,
        ))
    }

    /// Interns `s`, returning the same [`Symbol`] for equal text on every
    /// call.
    pub fn intern(&mut self, s: &str) -> Symbol {
        let raw_symbol = self.0.get_or_intern(s);
        Symbol(raw_symbol)
    }

    /// As [`StringInterner::intern`], but skips copying the string contents.
    pub fn intern_static(&mut self, s: &'static str) -> Symbol {
        let raw_symbol = self.0.get_or_intern_static(s);
        Symbol(raw_symbol)
    }

    /// Returns the text behind `sym`. Always `Some` for symbols produced by
    /// this interner.
    pub fn resolve(&self, sym: Symbol) -> Option<&str> {
        self.0.resolve(sym.0)
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}
