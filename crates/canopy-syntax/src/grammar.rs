//! Table-driven [`Language`] implementation.

use rustc_hash::FxHashMap;

use crate::{FieldId, Language, StateId, Symbol, SymbolMetadata};

const ERROR_NAME: &str = "ERROR";

struct SymbolInfo {
    name: Box<str>,
    metadata: SymbolMetadata,
}

/// A grammar descriptor backed by plain lookup tables.
pub struct Grammar {
    name: Box<str>,
    symbols: Vec<SymbolInfo>,
    /// Anonymous and named ids per type name, indexed by `named as usize`.
    symbol_ids: FxHashMap<Box<str>, [Option<Symbol>; 2]>,
    /// Field names, indexed by `FieldId - 1`.
    fields: Vec<Box<str>>,
    field_ids: FxHashMap<Box<str>, FieldId>,
    transitions: FxHashMap<(StateId, Symbol), StateId>,
}

impl Grammar {
    pub fn builder(name: &str) -> GrammarBuilder {
        GrammarBuilder {
            grammar: Self {
                name: name.into(),
                symbols: Vec::new(),
                symbol_ids: FxHashMap::default(),
                fields: Vec::new(),
                field_ids: FxHashMap::default(),
                transitions: FxHashMap::default(),
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Language for Grammar {
    fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    fn symbol_name(&self, symbol: Symbol) -> Option<&str> {
        if symbol == Symbol::ERROR {
            return Some(ERROR_NAME);
        }
        self.symbols.get(usize::from(symbol.0)).map(|info| &*info.name)
    }

    fn symbol_metadata(&self, symbol: Symbol) -> SymbolMetadata {
        if symbol == Symbol::ERROR {
            return SymbolMetadata { named: true };
        }
        self.symbols
            .get(usize::from(symbol.0))
            .map_or_else(SymbolMetadata::default, |info| info.metadata)
    }

    fn symbol_for_name(&self, name: &str, named: bool) -> Option<Symbol> {
        if named && name == ERROR_NAME {
            return Some(Symbol::ERROR);
        }
        self.symbol_ids.get(name)?[usize::from(named)]
    }

    fn field_count(&self) -> usize {
        self.fields.len()
    }

    fn field_name(&self, field: FieldId) -> Option<&str> {
        self.fields.get(usize::from(field.get()) - 1).map(|name| &**name)
    }

    fn field_for_name(&self, name: &str) -> Option<FieldId> {
        self.field_ids.get(name).copied()
    }

    fn next_state(&self, state: StateId, symbol: Symbol) -> StateId {
        self.transitions.get(&(state, symbol)).copied().unwrap_or(StateId::NONE)
    }
}

/// Registers the symbols, fields and transitions of a [`Grammar`].
pub struct GrammarBuilder {
    grammar: Grammar,
}

impl GrammarBuilder {
    /// Registers a named symbol, returning the existing id if already known.
    pub fn symbol(&mut self, name: &str) -> Symbol {
        self.insert_symbol(name, SymbolMetadata { named: true })
    }

    /// Registers an anonymous symbol such as punctuation or a keyword.
    pub fn anonymous(&mut self, name: &str) -> Symbol {
        self.insert_symbol(name, SymbolMetadata { named: false })
    }

    fn insert_symbol(&mut self, name: &str, metadata: SymbolMetadata) -> Symbol {
        let slot = usize::from(metadata.named);
        if let Some(symbol) = self.grammar.symbol_ids.get(name).and_then(|ids| ids[slot]) {
            return symbol;
        }
        let id = u16::try_from(self.grammar.symbols.len())
            .ok()
            .filter(|&id| id != Symbol::ERROR.0)
            .expect("too many symbols");
        let symbol = Symbol(id);
        self.grammar.symbols.push(SymbolInfo { name: name.into(), metadata });
        self.grammar.symbol_ids.entry(name.into()).or_default()[slot] = Some(symbol);
        symbol
    }

    /// Registers a field name, returning the existing id if already known.
    pub fn field(&mut self, name: &str) -> FieldId {
        if let Some(&field) = self.grammar.field_ids.get(name) {
            return field;
        }
        let field = u16::try_from(self.grammar.fields.len() + 1)
            .ok()
            .and_then(FieldId::new)
            .expect("too many fields");
        self.grammar.fields.push(name.into());
        self.grammar.field_ids.insert(name.into(), field);
        field
    }

    /// Records that consuming `symbol` in state `from` leads to `to`.
    pub fn transition(&mut self, from: StateId, symbol: Symbol, to: StateId) -> &mut Self {
        self.grammar.transitions.insert((from, symbol), to);
        self
    }

    pub fn build(self) -> Grammar {
        self.grammar
    }
}
