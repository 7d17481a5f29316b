// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use vslc_const::StringPool;
use vslc_scope::SymbolTable;

/// State shared by the passes of one compilation.
///
/// The name binder is the only writer; the code generator reads the
/// symbols and strings it left behind.
#[derive(Debug, Default)]
pub struct CompilerCtx {
    pub symbols: SymbolTable,

    pub strings: StringPool,
}

impl CompilerCtx {
    pub fn new(symbols: SymbolTable, strings: StringPool) -> Self {
        Self { symbols, strings }
    }
}
