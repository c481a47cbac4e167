//! Capability interface for resolving grammar symbols, fields and states.

use std::fmt;
use std::num::NonZeroU16;

/// Internal identifier of a node type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(pub u16);

impl Symbol {
    /// The builtin symbol of nodes produced by error recovery.
    pub const ERROR: Self = Self(u16::MAX);
}

/// Internal identifier of a field name. Zero is reserved for "no field".
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldId(pub NonZeroU16);

impl FieldId {
    pub const fn new(raw: u16) -> Option<Self> {
        match NonZeroU16::new(raw) {
            Some(raw) => Some(Self(raw)),
            None => None,
        }
    }

    #[inline]
    pub const fn get(self) -> u16 {
        self.0.get()
    }
}

/// A state of the grammar's parse table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateId(pub u16);

impl StateId {
    /// Marks nodes that carry no parse state.
    pub const NONE: Self = Self(u16::MAX);
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Per-symbol flags published by a grammar.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SymbolMetadata {
    /// The symbol is semantically meaningful, as opposed to punctuation or
    /// keywords.
    pub named: bool,
}

/// Everything a syntax tree needs to know about the grammar that produced it.
///
/// Grammars are loaded at runtime, so names and ids are resolved through
/// lookup tables rather than compiled-in enumerations.
pub trait Language: Send + Sync {
    /// Number of symbols, excluding [`Symbol::ERROR`].
    fn symbol_count(&self) -> usize;

    fn symbol_name(&self, symbol: Symbol) -> Option<&str>;

    fn symbol_metadata(&self, symbol: Symbol) -> SymbolMetadata;

    /// Resolves a type name. Anonymous and named symbols may share a name,
    /// e.g. the keyword `"if"` and a named `if` rule.
    fn symbol_for_name(&self, name: &str, named: bool) -> Option<Symbol>;

    fn field_count(&self) -> usize;

    fn field_name(&self, field: FieldId) -> Option<&str>;

    fn field_for_name(&self, name: &str) -> Option<FieldId>;

    /// The state reached after consuming `symbol` in `state`.
    fn next_state(&self, state: StateId, symbol: Symbol) -> StateId;
}

impl fmt::Debug for dyn Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Language")
            .field("symbol_count", &self.symbol_count())
            .field("field_count", &self.field_count())
            .finish_non_exhaustive()
    }
}
