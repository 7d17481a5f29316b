// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use crate::{Symbol, SymbolId};

/// Owns every symbol created during a compilation.
///
/// Scopes come and go while binding, but tree nodes keep referring to the
/// symbols declared in them until code generation is over, so symbols are
/// never freed individually.
#[derive(Debug, Default, Clone)]
pub struct SymbolArena {
    symbols: Vec<Symbol>,
}

impl SymbolArena {
    pub fn alloc(&mut self, sym: Symbol) -> SymbolId {
        let id = SymbolId(self.symbols.len());
        self.symbols.push(sym);
        id
    }

    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter_enumerated(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> {
        self.symbols.iter().enumerate().map(|(idx, sym)| (SymbolId(idx), sym))
    }
}
