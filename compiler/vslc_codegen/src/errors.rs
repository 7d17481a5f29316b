// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use thiserror::Error;
use vslc_ast::NodeKind;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodegenError {
    #[error("unknown operator '{0}'")]
    UnknownOperator(String),

    #[error("'{0}' is a function and cannot be used as a variable")]
    NotAVariable(String),

    #[error("'{0}' has no symbol attached; was the tree bound?")]
    Unbound(String),

    #[error("malformed {kind} node: {reason}")]
    MalformedNode {
        kind: NodeKind,
        reason: &'static str,
    },

    #[error("'continue' outside of a loop")]
    ContinueOutsideLoop,
}

pub type CodegenResult<T> = Result<T, CodegenError>;
