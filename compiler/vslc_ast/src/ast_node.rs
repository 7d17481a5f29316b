// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use vslc_symbol::SymbolId;

use crate::{AstOp, NodeKind, CALL_TAG, NEGATE_TAG};

/// Payload carried by a node. Which variant a node holds is determined by
/// its kind: identifiers on `VARIABLE`, values on `INTEGER`, literal text
/// (or its pool index once bound) on `TEXT`, operator tags on `EXPRESSION`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum NodeData {
    #[default]
    None,
    Int(i32),
    Ident(String),
    Op(String),
    Text(String),
    StrIdx(usize),
}

impl NodeData {
    pub fn is_none(&self) -> bool {
        matches!(self, NodeData::None)
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            NodeData::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_ident(&self) -> Option<&str> {
        match self {
            NodeData::Ident(name) => Some(name),
            _ => None,
        }
    }

    pub fn as_op(&self) -> Option<&str> {
        match self {
            NodeData::Op(op) => Some(op),
            _ => None,
        }
    }

    pub fn as_str_idx(&self) -> Option<usize> {
        match self {
            NodeData::StrIdx(idx) => Some(*idx),
            _ => None,
        }
    }
}

/// A node of the program tree.
///
/// Children are owned slots; an empty slot stands for an omitted optional
/// part, e.g. the parameter list of a function without parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub data: NodeData,

    /// Symbol this node refers to, filled in by the name binder.
    pub binding: Option<SymbolId>,

    pub children: Vec<Option<Node>>,
}

impl Node {
    pub fn new(kind: NodeKind, data: NodeData, children: Vec<Option<Node>>) -> Self {
        Self {
            kind,
            data,
            binding: None,
            children,
        }
    }

    pub fn leaf(kind: NodeKind, data: NodeData) -> Self {
        Self::new(kind, data, vec![])
    }

    /// Builds a node whose child slots are all filled.
    pub fn with_children(kind: NodeKind, children: Vec<Node>) -> Self {
        Self::new(kind, NodeData::None, children.into_iter().map(Some).collect())
    }

    pub fn integer(value: i32) -> Self {
        Self::leaf(NodeKind::Integer, NodeData::Int(value))
    }

    pub fn variable(name: &str) -> Self {
        Self::leaf(NodeKind::Variable, NodeData::Ident(name.to_string()))
    }

    pub fn text(literal: &str) -> Self {
        Self::leaf(NodeKind::Text, NodeData::Text(literal.to_string()))
    }

    pub fn binary(op: AstOp, lhs: Node, rhs: Node) -> Self {
        Self::new(
            NodeKind::Expression,
            NodeData::Op(op.symbol().to_string()),
            vec![Some(lhs), Some(rhs)],
        )
    }

    pub fn negate(operand: Node) -> Self {
        Self::new(
            NodeKind::Expression,
            NodeData::Op(NEGATE_TAG.to_string()),
            vec![Some(operand)],
        )
    }

    pub fn call(callee: &str, args: Option<Node>) -> Self {
        Self::new(
            NodeKind::Expression,
            NodeData::Op(CALL_TAG.to_string()),
            vec![Some(Self::variable(callee)), args],
        )
    }

    pub fn arity(&self) -> usize {
        self.children.len()
    }

    /// Child at `idx`, or `None` when the slot is empty or missing.
    pub fn child(&self, idx: usize) -> Option<&Node> {
        self.children.get(idx).and_then(Option::as_ref)
    }

    pub fn child_mut(&mut self, idx: usize) -> Option<&mut Node> {
        self.children.get_mut(idx).and_then(Option::as_mut)
    }

    /// Non-empty children in order.
    pub fn iter_children(&self) -> impl Iterator<Item = &Node> {
        self.children.iter().flatten()
    }

    /// Whether this expression node is a function call.
    pub fn is_call(&self) -> bool {
        self.kind == NodeKind::Expression && self.data.as_op() == Some(CALL_TAG)
    }

    /// Number of nodes in the subtree rooted here.
    pub fn count_nodes(&self) -> usize {
        1 + self.iter_children().map(Node::count_nodes).sum::<usize>()
    }

    /// Visits every node of the subtree in depth-first pre-order.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        visit(self);
        for child in self.iter_children() {
            child.walk(visit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_slots_are_skipped() {
        let func = Node::new(
            NodeKind::Function,
            NodeData::None,
            vec![Some(Node::variable("main")), None, Some(Node::integer(0))],
        );

        assert_eq!(func.arity(), 3);
        assert!(func.child(1).is_none());
        assert_eq!(func.iter_children().count(), 2);
        assert_eq!(func.child(0).unwrap().data.as_ident(), Some("main"));
    }

    #[test]
    fn test_call_constructor() {
        let call = Node::call("f", None);
        assert!(call.is_call());
        assert_eq!(call.arity(), 2);
        assert!(!Node::binary(AstOp::Add, Node::integer(1), Node::integer(2)).is_call());
    }

    #[test]
    fn test_walk_is_preorder() {
        let tree = Node::binary(
            AstOp::Add,
            Node::integer(1),
            Node::negate(Node::variable("x")),
        );
        let mut kinds = vec![];
        tree.walk(&mut |n| kinds.push(n.kind));

        assert_eq!(
            kinds,
            vec![
                NodeKind::Expression,
                NodeKind::Integer,
                NodeKind::Expression,
                NodeKind::Variable
            ]
        );
        assert_eq!(tree.count_nodes(), 4);
    }
}
