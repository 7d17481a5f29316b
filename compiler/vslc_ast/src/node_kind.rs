// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use std::collections::HashMap;
use std::fmt;

use lazy_static::lazy_static;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum NodeKind {
    Program,

    // list kinds produced as right-recursive cons cells by the parser
    FunctionList,
    StatementList,
    PrintList,
    ExpressionList,
    VariableList,
    ArgumentList,
    ParameterList,
    DeclarationList,

    Function,
    Statement,
    Block,
    AssignmentStatement,
    ReturnStatement,
    PrintStatement,
    NullStatement,
    IfStatement,
    WhileStatement,
    Expression,
    Declaration,
    PrintItem,

    // leaves
    Variable,
    Integer,
    Text,
}

const ALL_KINDS: [NodeKind; 24] = [
    NodeKind::Program,
    NodeKind::FunctionList,
    NodeKind::StatementList,
    NodeKind::PrintList,
    NodeKind::ExpressionList,
    NodeKind::VariableList,
    NodeKind::ArgumentList,
    NodeKind::ParameterList,
    NodeKind::DeclarationList,
    NodeKind::Function,
    NodeKind::Statement,
    NodeKind::Block,
    NodeKind::AssignmentStatement,
    NodeKind::ReturnStatement,
    NodeKind::PrintStatement,
    NodeKind::NullStatement,
    NodeKind::IfStatement,
    NodeKind::WhileStatement,
    NodeKind::Expression,
    NodeKind::Declaration,
    NodeKind::PrintItem,
    NodeKind::Variable,
    NodeKind::Integer,
    NodeKind::Text,
];

lazy_static! {
    static ref KINDS_BY_NAME: HashMap<&'static str, NodeKind> =
        ALL_KINDS.iter().map(|kind| (kind.name(), *kind)).collect();
}

impl NodeKind {
    /// Name used in tree dumps.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Program => "PROGRAM",
            NodeKind::FunctionList => "FUNCTION_LIST",
            NodeKind::StatementList => "STATEMENT_LIST",
            NodeKind::PrintList => "PRINT_LIST",
            NodeKind::ExpressionList => "EXPRESSION_LIST",
            NodeKind::VariableList => "VARIABLE_LIST",
            NodeKind::ArgumentList => "ARGUMENT_LIST",
            NodeKind::ParameterList => "PARAMETER_LIST",
            NodeKind::DeclarationList => "DECLARATION_LIST",
            NodeKind::Function => "FUNCTION",
            NodeKind::Statement => "STATEMENT",
            NodeKind::Block => "BLOCK",
            NodeKind::AssignmentStatement => "ASSIGNMENT_STATEMENT",
            NodeKind::ReturnStatement => "RETURN_STATEMENT",
            NodeKind::PrintStatement => "PRINT_STATEMENT",
            NodeKind::NullStatement => "NULL_STATEMENT",
            NodeKind::IfStatement => "IF_STATEMENT",
            NodeKind::WhileStatement => "WHILE_STATEMENT",
            NodeKind::Expression => "EXPRESSION",
            NodeKind::Declaration => "DECLARATION",
            NodeKind::PrintItem => "PRINT_ITEM",
            NodeKind::Variable => "VARIABLE",
            NodeKind::Integer => "INTEGER",
            NodeKind::Text => "TEXT",
        }
    }

    pub fn from_name(name: &str) -> Option<NodeKind> {
        KINDS_BY_NAME.get(name).copied()
    }

    /// List kinds that the simplifier flattens into n-ary nodes.
    pub fn is_flattened_list(&self) -> bool {
        matches!(
            self,
            NodeKind::FunctionList
                | NodeKind::StatementList
                | NodeKind::PrintList
                | NodeKind::ExpressionList
                | NodeKind::VariableList
                | NodeKind::DeclarationList
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
