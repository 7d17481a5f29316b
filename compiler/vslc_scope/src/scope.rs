// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use indexmap::IndexMap;
use vslc_symbol::SymbolId;

/// One lexical level: a function list, a function or a block.
#[derive(Debug, Default, Clone)]
pub struct Scope {
    symbols: IndexMap<String, SymbolId>,
}

impl Scope {
    /// Registers `name`, returning the id it replaces if the name was
    /// already declared in this scope.
    pub fn add_sym(&mut self, name: &str, id: SymbolId) -> Option<SymbolId> {
        self.symbols.insert(name.to_string(), id)
    }

    pub fn get_sym(&self, name: &str) -> Option<SymbolId> {
        self.symbols.get(name).copied()
    }
}
