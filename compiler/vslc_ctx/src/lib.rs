// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

mod builder;
mod ctx;

pub use builder::*;
pub use ctx::*;
