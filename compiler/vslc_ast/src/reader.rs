// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

//! Reads trees in the dump format of [`crate::dump`].
//!
//! This is how trees built by an external parser enter the compiler.

use thiserror::Error;

use crate::dump::{INDENT, NULL_NODE};
use crate::{Node, NodeData, NodeKind};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReadError {
    #[error("input contains no tree")]
    Empty,

    #[error("line {line}: unknown node kind '{kind}'")]
    UnknownKind { line: usize, kind: String },

    #[error("line {line}: {message}")]
    Malformed { line: usize, message: String },
}

pub type ReadResult<T> = Result<T, ReadError>;

struct Line<'a> {
    number: usize,
    depth: usize,
    text: &'a str,
}

pub struct TreeReader<'a> {
    lines: Vec<Line<'a>>,
    pos: usize,
}

impl<'a> TreeReader<'a> {
    pub fn new(source: &'a str) -> ReadResult<Self> {
        let mut lines = vec![];
        for (idx, raw) in source.lines().enumerate() {
            let number = idx + 1;
            let text = raw.trim_end();
            if text.trim().is_empty() {
                continue;
            }
            let body = text.trim_start_matches(' ');
            let spaces = text.len() - body.len();
            if body.starts_with('\t') {
                return Err(malformed(number, "tabs are not allowed in indentation"));
            }
            if spaces % INDENT.len() != 0 {
                return Err(malformed(number, "indentation is not a multiple of two spaces"));
            }
            lines.push(Line {
                number,
                depth: spaces / INDENT.len(),
                text: body,
            });
        }
        Ok(Self { lines, pos: 0 })
    }

    /// Reads the single root node of the input.
    pub fn read(mut self) -> ReadResult<Node> {
        let Some(first) = self.lines.first() else {
            return Err(ReadError::Empty);
        };
        if first.depth != 0 {
            return Err(malformed(first.number, "root node must not be indented"));
        }
        let root_line = first.number;

        let root = self
            .read_slot(0)?
            .ok_or_else(|| malformed(root_line, "root node cannot be NULL"))?;

        if let Some(extra) = self.lines.get(self.pos) {
            return Err(malformed(extra.number, "more than one root node"));
        }
        Ok(root)
    }

    fn read_slot(&mut self, depth: usize) -> ReadResult<Option<Node>> {
        let line = &self.lines[self.pos];
        let number = line.number;
        let text = line.text;
        self.pos += 1;

        if text == NULL_NODE {
            if self.next_depth().is_some_and(|d| d > depth) {
                return Err(malformed(number, "NULL cannot have children"));
            }
            return Ok(None);
        }

        let (kind, data) = parse_header(number, text)?;
        let mut children = vec![];
        while let Some(next) = self.next_depth() {
            if next <= depth {
                break;
            }
            if next > depth + 1 {
                let bad = self.lines[self.pos].number;
                return Err(malformed(bad, "indented more than one level below its parent"));
            }
            children.push(self.read_slot(depth + 1)?);
        }
        Ok(Some(Node::new(kind, data, children)))
    }

    fn next_depth(&self) -> Option<usize> {
        self.lines.get(self.pos).map(|line| line.depth)
    }
}

/// Convenience wrapper around [`TreeReader`].
pub fn read_tree(source: &str) -> ReadResult<Node> {
    TreeReader::new(source)?.read()
}

fn malformed(line: usize, message: &str) -> ReadError {
    ReadError::Malformed {
        line,
        message: message.to_string(),
    }
}

fn parse_header(line: usize, text: &str) -> ReadResult<(NodeKind, NodeData)> {
    let (name, payload) = match text.find('(') {
        Some(open) => {
            if !text.ends_with(')') || text.len() < open + 2 {
                return Err(malformed(line, "unterminated payload"));
            }
            (&text[..open], Some(&text[open + 1..text.len() - 1]))
        }
        None => (text, None),
    };

    let kind = NodeKind::from_name(name).ok_or_else(|| ReadError::UnknownKind {
        line,
        kind: name.to_string(),
    })?;

    let data = match (kind, payload) {
        (NodeKind::Integer, Some(value)) => value
            .trim()
            .parse::<i32>()
            .map(NodeData::Int)
            .map_err(|_| malformed(line, &format!("'{value}' is not a 32-bit integer")))?,
        (NodeKind::Variable, Some(name)) if !name.is_empty() => NodeData::Ident(name.to_string()),
        (NodeKind::Expression, Some(op)) if !op.is_empty() => NodeData::Op(op.to_string()),
        (NodeKind::Expression, None) => NodeData::None,
        (NodeKind::Text, Some(text)) => match text.strip_prefix('#').map(str::parse::<usize>) {
            Some(Ok(idx)) => NodeData::StrIdx(idx),
            _ => NodeData::Text(text.to_string()),
        },
        (NodeKind::Integer | NodeKind::Variable | NodeKind::Text, _) => {
            return Err(malformed(line, &format!("{kind} requires a payload")));
        }
        (_, Some(_)) => {
            return Err(malformed(line, &format!("{kind} does not take a payload")));
        }
        (_, None) => NodeData::None,
    };
    Ok((kind, data))
}
