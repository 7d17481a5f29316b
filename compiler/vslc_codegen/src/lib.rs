// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

pub mod errors;
pub mod instruction;

mod codegen;
mod x86;

pub use codegen::*;
pub use x86::*;
