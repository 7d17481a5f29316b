// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use vslc_const::StringPool;
use vslc_scope::SymbolTable;

use crate::CompilerCtx;

#[derive(Default)]
pub struct CompilerCtxBuilder {
    symbols: Option<SymbolTable>,
    strings: Option<StringPool>,
}

impl CompilerCtxBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn symbol_table(mut self, symbols: SymbolTable) -> Self {
        self.symbols = Some(symbols);
        self
    }

    pub fn string_pool(mut self, strings: StringPool) -> Self {
        self.strings = Some(strings);
        self
    }

    pub fn build(self) -> CompilerCtx {
        CompilerCtx::new(
            self.symbols.unwrap_or_default(),
            self.strings.unwrap_or_default(),
        )
    }
}
