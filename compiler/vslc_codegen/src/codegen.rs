// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use vslc_ast::{Node, NodeKind};

use crate::errors::CodegenResult;

/// Tree walk shared by the code generators. Dispatch happens on the node
/// kind; anything without its own rule just visits its children in order.
pub trait CodeGenerator {
    fn gen_node(&mut self, node: &Node) -> CodegenResult<()> {
        match node.kind {
            NodeKind::Program => self.gen_program(node),
            NodeKind::Function => self.gen_function(node),
            NodeKind::Block => self.gen_block(node),
            NodeKind::Declaration => self.gen_declaration(node),
            NodeKind::PrintList => self.gen_print_list(node),
            NodeKind::PrintItem => self.gen_print_item(node),
            NodeKind::Expression => self.gen_expression(node),
            NodeKind::Variable => self.gen_variable(node),
            NodeKind::Integer => self.gen_integer(node),
            NodeKind::AssignmentStatement => self.gen_assignment(node),
            NodeKind::ReturnStatement => self.gen_return(node),
            NodeKind::IfStatement => self.gen_if(node),
            NodeKind::WhileStatement => self.gen_while(node),
            NodeKind::NullStatement => self.gen_continue(node),
            _ => self.gen_children(node),
        }
    }

    fn gen_children(&mut self, node: &Node) -> CodegenResult<()> {
        for child in node.iter_children() {
            self.gen_node(child)?;
        }
        Ok(())
    }

    /// Data section, all functions, then the entry point.
    fn gen_program(&mut self, node: &Node) -> CodegenResult<()>;

    fn gen_function(&mut self, node: &Node) -> CodegenResult<()>;

    fn gen_block(&mut self, node: &Node) -> CodegenResult<()>;

    /// Reserves stack space for the declared locals.
    fn gen_declaration(&mut self, node: &Node) -> CodegenResult<()>;

    fn gen_print_list(&mut self, node: &Node) -> CodegenResult<()>;

    fn gen_print_item(&mut self, node: &Node) -> CodegenResult<()>;

    /// Leaves the value of the expression on top of the stack.
    fn gen_expression(&mut self, node: &Node) -> CodegenResult<()>;

    fn gen_variable(&mut self, node: &Node) -> CodegenResult<()>;

    fn gen_integer(&mut self, node: &Node) -> CodegenResult<()>;

    fn gen_assignment(&mut self, node: &Node) -> CodegenResult<()>;

    fn gen_return(&mut self, node: &Node) -> CodegenResult<()>;

    fn gen_if(&mut self, node: &Node) -> CodegenResult<()>;

    fn gen_while(&mut self, node: &Node) -> CodegenResult<()>;

    /// `continue`: restart the innermost loop.
    fn gen_continue(&mut self, node: &Node) -> CodegenResult<()>;
}
