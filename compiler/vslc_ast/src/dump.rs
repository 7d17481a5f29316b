// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

//! Textual tree dumps.
//!
//! One node per line, indented two spaces per level, with the payload in
//! parentheses after the kind name. Empty child slots print as `NULL`.
//! [`crate::reader`] reads the same format back.

use itertools::Itertools;

use crate::{Node, NodeData};

pub const INDENT: &str = "  ";

pub const NULL_NODE: &str = "NULL";

/// Renders the payload part of a dump line, without parentheses.
pub fn payload(data: &NodeData) -> Option<String> {
    match data {
        NodeData::None => None,
        NodeData::Int(value) => Some(value.to_string()),
        NodeData::Ident(text) | NodeData::Op(text) | NodeData::Text(text) => Some(text.clone()),
        NodeData::StrIdx(idx) => Some(format!("#{idx}")),
    }
}

pub fn dump_tree(root: &Node) -> String {
    let mut lines = vec![];
    dump_node(Some(root), 0, &mut lines);
    lines.iter().join("\n")
}

fn dump_node(node: Option<&Node>, nesting: usize, lines: &mut Vec<String>) {
    let indent = INDENT.repeat(nesting);
    let Some(node) = node else {
        lines.push(format!("{indent}{NULL_NODE}"));
        return;
    };

    match payload(&node.data) {
        Some(data) => lines.push(format!("{indent}{kind}({data})", kind = node.kind)),
        None => lines.push(format!("{indent}{kind}", kind = node.kind)),
    }
    for child in &node.children {
        dump_node(child.as_ref(), nesting + 1, lines);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AstOp, NodeKind};

    #[test]
    fn test_dump_layout() {
        let func = Node::new(
            NodeKind::Function,
            NodeData::None,
            vec![
                Some(Node::variable("main")),
                None,
                Some(Node::binary(AstOp::LtEq, Node::integer(-1), Node::text("\"hi\""))),
            ],
        );

        assert_eq!(
            dump_tree(&func),
            [
                "FUNCTION",
                "  VARIABLE(main)",
                "  NULL",
                "  EXPRESSION(<=)",
                "    INTEGER(-1)",
                "    TEXT(\"hi\")",
            ]
            .join("\n")
        );
    }

    #[test]
    fn test_bound_text_shows_pool_index() {
        let text = Node::leaf(NodeKind::Text, NodeData::StrIdx(3));
        assert_eq!(dump_tree(&text), "TEXT(#3)");
    }
}
