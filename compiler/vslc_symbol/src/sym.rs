// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use std::fmt;

/// Stable handle to a symbol stored in a [`SymbolArena`](crate::SymbolArena).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub usize);

/// What kind of name the symbol was declared as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Function,
    Parameter,
    Local,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SymbolKind::Function => "function",
            SymbolKind::Parameter => "param",
            SymbolKind::Local => "local",
        };
        f.write_str(name)
    }
}

/// A declared name together with where it lives at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    /// Name as written in the source.
    pub name: String,

    pub kind: SymbolKind,

    /// Byte offset from the frame pointer of the frame that declares it.
    /// Positive for parameters, negative for locals, zero for functions.
    pub stack_offset: i32,

    /// Lexical depth of the declaring scope. Stamped by the symbol table
    /// on insertion.
    pub depth: usize,

    /// Code label; only functions carry one.
    pub label: Option<String>,
}

impl Symbol {
    pub fn function(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: SymbolKind::Function,
            stack_offset: 0,
            depth: 0,
            label: Some(name.to_string()),
        }
    }

    pub fn parameter(name: &str, stack_offset: i32) -> Self {
        Self {
            name: name.to_string(),
            kind: SymbolKind::Parameter,
            stack_offset,
            depth: 0,
            label: None,
        }
    }

    pub fn local(name: &str, stack_offset: i32) -> Self {
        Self {
            name: name.to_string(),
            kind: SymbolKind::Local,
            stack_offset,
            depth: 0,
            label: None,
        }
    }

    /// Functions have no stack slot and cannot be loaded as values.
    pub fn is_variable(&self) -> bool {
        self.kind != SymbolKind::Function
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{name} [{kind}] offset={off} depth={depth}",
            name = self.name,
            kind = self.kind,
            off = self.stack_offset,
            depth = self.depth
        )?;
        if let Some(label) = &self.label {
            write!(f, " label={label}")?;
        }
        Ok(())
    }
}
