// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

mod sym;
mod arena;

pub use sym::*;
pub use arena::*;

/// Size in bytes of one stack slot on the target machine.
pub const STORAGE_UNIT: i32 = 4;

/// Distance from the frame pointer to the last pushed argument: the saved
/// return address sits between them.
pub const PARAM_BASE_OFFSET: i32 = 4;
