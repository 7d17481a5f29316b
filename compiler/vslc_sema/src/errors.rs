// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use thiserror::Error;
use vslc_ast::NodeKind;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BindError {
    #[error("undeclared variable '{0}'")]
    UndeclaredVariable(String),

    #[error("malformed {kind} node: {reason}")]
    MalformedNode {
        kind: NodeKind,
        reason: &'static str,
    },
}

pub type BindResult<T> = Result<T, BindError>;
