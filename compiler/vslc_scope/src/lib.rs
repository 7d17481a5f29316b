// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

mod scope;
mod symbol_table;

pub use scope::*;
pub use symbol_table::*;
