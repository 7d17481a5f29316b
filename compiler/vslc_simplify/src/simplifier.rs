// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use vslc_ast::{AstOp, Node, NodeData, NodeKind, NEGATE_TAG};

/// What a simplification run changed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SimplifyStats {
    /// List cons cells merged into their left neighbour.
    pub flattened: usize,

    /// Single-child wrappers replaced by their child.
    pub collapsed: usize,

    /// Expressions replaced by a constant.
    pub folded: usize,
}

/// Bottom-up rewrite of a freshly parsed tree.
///
/// Each call takes ownership of a node and hands back the node that should
/// take its place in the parent's slot.
#[derive(Debug)]
pub struct TreeSimplifier {
    fold_constants: bool,
    stats: SimplifyStats,
}

impl Default for TreeSimplifier {
    fn default() -> Self {
        Self::new(true)
    }
}

impl TreeSimplifier {
    pub fn new(fold_constants: bool) -> Self {
        Self {
            fold_constants,
            stats: SimplifyStats::default(),
        }
    }

    pub fn stats(&self) -> SimplifyStats {
        self.stats
    }

    pub fn simplify(&mut self, mut node: Node) -> Node {
        node.children = std::mem::take(&mut node.children)
            .into_iter()
            .map(|child| child.map(|c| self.simplify(c)))
            .collect();

        match node.kind {
            NodeKind::DeclarationList if node.arity() > 1 && node.children[0].is_none() => {
                // parser's list terminator
                node.children.remove(0);
                node
            }

            kind if kind.is_flattened_list() => self.flatten_list(node),

            NodeKind::Statement | NodeKind::ParameterList | NodeKind::ArgumentList => {
                self.collapse(node)
            }

            NodeKind::Expression => self.simplify_expression(node),

            _ => node,
        }
    }

    /// Turns `LIST(LIST(a, b), c)` into `LIST(a, b, c)`. The inner list is
    /// already flat because children are simplified first.
    fn flatten_list(&mut self, mut node: Node) -> Node {
        let same_kind = node
            .child(0)
            .is_some_and(|first| first.kind == node.kind);
        if !same_kind || node.arity() != 2 {
            return node;
        }

        let tail = node.children.pop().flatten();
        let Some(Some(mut head)) = node.children.pop() else {
            return node;
        };
        head.children.push(tail);
        self.stats.flattened += 1;
        head
    }

    /// Replaces a single-child wrapper by its child.
    fn collapse(&mut self, mut node: Node) -> Node {
        if node.arity() != 1 || node.children[0].is_none() {
            return node;
        }
        match node.children.pop() {
            Some(Some(child)) => {
                self.stats.collapsed += 1;
                child
            }
            _ => node,
        }
    }

    fn simplify_expression(&mut self, mut node: Node) -> Node {
        match node.arity() {
            1 if node.data.is_none() => self.collapse(node),

            1 if self.fold_constants && node.data.as_op() == Some(NEGATE_TAG) => {
                match node.child_mut(0) {
                    Some(operand) if operand.kind == NodeKind::Integer => {
                        if let NodeData::Int(value) = &mut operand.data {
                            *value = value.wrapping_neg();
                        }
                        self.stats.folded += 1;
                        self.collapse(node)
                    }
                    _ => node,
                }
            }

            2 if self.fold_constants => {
                let operands = (
                    node.child(0).and_then(|n| n.data.as_int()),
                    node.child(1).and_then(|n| n.data.as_int()),
                );
                let op = node.data.as_op().and_then(AstOp::from_symbol);
                let folded = match (op, operands) {
                    (Some(op), (Some(lhs), Some(rhs))) => op.evaluate(lhs, rhs),
                    _ => None,
                };
                match folded {
                    Some(value) => {
                        tracing::trace!(?op, value, "folded constant expression");
                        self.stats.folded += 1;
                        Node::integer(value)
                    }
                    None => node,
                }
            }

            _ => node,
        }
    }
}

/// Simplifies `root` with constant folding enabled.
pub fn simplify_tree(root: Node) -> Node {
    TreeSimplifier::default().simplify(root)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cons(kind: NodeKind, head: Node, item: Node) -> Node {
        Node::with_children(kind, vec![head, item])
    }

    fn single(kind: NodeKind, item: Node) -> Node {
        Node::with_children(kind, vec![item])
    }

    fn statement(inner: Node) -> Node {
        single(NodeKind::Statement, inner)
    }

    fn ret(value: Node) -> Node {
        single(NodeKind::ReturnStatement, value)
    }

    #[test]
    fn test_flattens_statement_list() {
        // ((s1) s2) s3
        let list = cons(
            NodeKind::StatementList,
            cons(
                NodeKind::StatementList,
                single(NodeKind::StatementList, statement(ret(Node::integer(1)))),
                statement(ret(Node::integer(2))),
            ),
            statement(ret(Node::integer(3))),
        );

        let mut simplifier = TreeSimplifier::default();
        let flat = simplifier.simplify(list);

        assert_eq!(flat.kind, NodeKind::StatementList);
        assert_eq!(flat.arity(), 3);
        let values: Vec<i32> = flat
            .iter_children()
            .map(|s| {
                assert_eq!(s.kind, NodeKind::ReturnStatement);
                s.child(0).unwrap().data.as_int().unwrap()
            })
            .collect();
        assert_eq!(values, vec![1, 2, 3]);
        assert_eq!(simplifier.stats().flattened, 2);
        assert_eq!(simplifier.stats().collapsed, 3);
    }

    #[test]
    fn test_declaration_list_terminator() {
        let decl = |name: &str| {
            single(
                NodeKind::Declaration,
                single(NodeKind::VariableList, Node::variable(name)),
            )
        };
        let first = Node::new(
            NodeKind::DeclarationList,
            NodeData::None,
            vec![None, Some(decl("a"))],
        );
        let list = cons(NodeKind::DeclarationList, first, decl("b"));

        let flat = simplify_tree(list);
        assert_eq!(flat.kind, NodeKind::DeclarationList);
        assert_eq!(flat.arity(), 2);
        assert!(flat.iter_children().all(|d| d.kind == NodeKind::Declaration));
        let names: Vec<_> = flat
            .iter_children()
            .map(|d| d.child(0).unwrap().child(0).unwrap().data.as_ident().unwrap())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_parameter_and_argument_lists_collapse() {
        let params = single(
            NodeKind::ParameterList,
            cons(
                NodeKind::VariableList,
                single(NodeKind::VariableList, Node::variable("a")),
                Node::variable("b"),
            ),
        );
        let flat = simplify_tree(params);
        assert_eq!(flat.kind, NodeKind::VariableList);
        assert_eq!(flat.arity(), 2);

        let args = single(
            NodeKind::ArgumentList,
            single(NodeKind::ExpressionList, Node::variable("x")),
        );
        let flat = simplify_tree(args);
        assert_eq!(flat.kind, NodeKind::ExpressionList);
        assert_eq!(flat.arity(), 1);
    }

    #[test]
    fn test_parenthesised_expression_collapses() {
        let paren = Node::new(
            NodeKind::Expression,
            NodeData::None,
            vec![Some(Node::variable("x"))],
        );
        assert_eq!(simplify_tree(paren), Node::variable("x"));
    }

    #[test]
    fn test_folds_nested_arithmetic() {
        // 1 + 2 * 3, precedence encoded in the tree shape
        let expr = Node::binary(
            AstOp::Add,
            Node::integer(1),
            Node::binary(AstOp::Multiply, Node::integer(2), Node::integer(3)),
        );
        let mut simplifier = TreeSimplifier::default();
        assert_eq!(simplifier.simplify(expr), Node::integer(7));
        assert_eq!(simplifier.stats().folded, 2);
    }

    #[test]
    fn test_fold_matches_direct_evaluation() {
        let ops = [
            AstOp::Add,
            AstOp::Subtract,
            AstOp::Multiply,
            AstOp::Divide,
            AstOp::LThan,
            AstOp::GThan,
            AstOp::LtEq,
            AstOp::GtEq,
            AstOp::EqEq,
            AstOp::NEq,
        ];
        let pairs = [(7, 2), (-7, 2), (3, 3), (0, 5), (-4, -9)];
        for op in ops {
            for (a, b) in pairs {
                let expected = match op {
                    AstOp::Add => a + b,
                    AstOp::Subtract => a - b,
                    AstOp::Multiply => a * b,
                    AstOp::Divide => a / b,
                    AstOp::LThan => (a < b) as i32,
                    AstOp::GThan => (a > b) as i32,
                    AstOp::LtEq => (a <= b) as i32,
                    AstOp::GtEq => (a >= b) as i32,
                    AstOp::EqEq => (a == b) as i32,
                    AstOp::NEq => (a != b) as i32,
                };
                let folded = simplify_tree(Node::binary(op, Node::integer(a), Node::integer(b)));
                assert_eq!(folded, Node::integer(expected), "{a} {op} {b}");
            }
        }
    }

    #[test]
    fn test_unary_minus_folds() {
        assert_eq!(simplify_tree(Node::negate(Node::integer(5))), Node::integer(-5));
        assert_eq!(simplify_tree(Node::negate(Node::integer(-5))), Node::integer(5));

        // -(2 - 9) folds inside out
        let nested = Node::negate(Node::binary(AstOp::Subtract, Node::integer(2), Node::integer(9)));
        assert_eq!(simplify_tree(nested), Node::integer(7));
    }

    #[test]
    fn test_unary_minus_on_variable_is_kept() {
        let neg = Node::negate(Node::variable("x"));
        assert_eq!(simplify_tree(neg.clone()), neg);
    }

    #[test]
    fn test_division_by_zero_left_for_runtime() {
        let div = Node::binary(AstOp::Divide, Node::integer(1), Node::integer(0));
        assert_eq!(simplify_tree(div.clone()), div);
    }

    #[test]
    fn test_calls_and_variables_are_not_folded() {
        let call = Node::call(
            "f",
            Some(single(NodeKind::ExpressionList, Node::integer(1))),
        );
        assert_eq!(simplify_tree(call.clone()), call);

        let mixed = Node::binary(AstOp::Add, Node::variable("x"), Node::integer(1));
        assert_eq!(simplify_tree(mixed.clone()), mixed);
    }

    #[test]
    fn test_folding_can_be_disabled() {
        let expr = Node::binary(AstOp::Add, Node::integer(1), Node::integer(2));
        let mut simplifier = TreeSimplifier::new(false);
        assert_eq!(simplifier.simplify(expr.clone()), expr);
        assert_eq!(simplifier.stats().folded, 0);
    }

    #[test]
    fn test_simplify_is_idempotent() {
        let program = single(
            NodeKind::Program,
            cons(
                NodeKind::FunctionList,
                single(
                    NodeKind::FunctionList,
                    Node::new(
                        NodeKind::Function,
                        NodeData::None,
                        vec![
                            Some(Node::variable("f")),
                            None,
                            Some(statement(single(
                                NodeKind::PrintStatement,
                                cons(
                                    NodeKind::PrintList,
                                    single(
                                        NodeKind::PrintList,
                                        single(NodeKind::PrintItem, Node::text("\"x\"")),
                                    ),
                                    single(
                                        NodeKind::PrintItem,
                                        Node::binary(
                                            AstOp::Add,
                                            Node::variable("a"),
                                            Node::integer(2),
                                        ),
                                    ),
                                ),
                            ))),
                        ],
                    ),
                ),
                Node::new(
                    NodeKind::Function,
                    NodeData::None,
                    vec![
                        Some(Node::variable("g")),
                        None,
                        Some(statement(ret(Node::integer(0)))),
                    ],
                ),
            ),
        );

        let once = simplify_tree(program);
        let twice = simplify_tree(once.clone());
        assert_eq!(once, twice);
        assert!(once.count_nodes() > 0);
        assert_eq!(once.child(0).unwrap().arity(), 2);
    }

    #[test]
    fn test_output_never_grows() {
        let expr = single(
            NodeKind::StatementList,
            statement(ret(Node::binary(
                AstOp::GtEq,
                Node::negate(Node::integer(3)),
                Node::variable("y"),
            ))),
        );
        let before = expr.count_nodes();
        let after = simplify_tree(expr).count_nodes();
        assert!(after < before);
    }
}
