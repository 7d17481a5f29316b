// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

mod simplifier;

pub use simplifier::*;
