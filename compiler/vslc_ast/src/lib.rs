// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

mod ast_node;
mod node_kind;
mod operation;
pub mod dump;
pub mod reader;

pub use ast_node::*;
pub use node_kind::*;
pub use operation::*;
