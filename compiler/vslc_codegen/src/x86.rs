// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use vslc_ast::{AstOp, Node, NodeKind, NEGATE_TAG};
use vslc_const::{StringPool, INTEGER_FORMAT_LABEL};
use vslc_ctx::CompilerCtx;
use vslc_symbol::{Symbol, SymbolKind, STORAGE_UNIT};
use vslc_target::X86Reg;

use crate::errors::{CodegenError, CodegenResult};
use crate::instruction::{Instruction, InstructionList, Opcode, Operand};
use crate::CodeGenerator;

/// Loop currently being generated, for `continue`.
#[derive(Debug, Clone)]
struct LoopFrame {
    start: String,

    /// Generator depth outside the loop body.
    depth: usize,
}

/// Stack-machine code generator for 32-bit x86.
///
/// Every expression leaves its value on the stack. Each function and each
/// block gets its own frame, and the saved frame pointers form the static
/// chain used to reach variables of enclosing frames.
pub struct X86Generator<'ctx> {
    ctx: &'ctx CompilerCtx,

    code: InstructionList,

    /// Frames entered since the function list: 1 inside a function body,
    /// one more per nested block. Matches the depth stamped on symbols.
    depth: usize,

    /// Source of unique control-flow label numbers.
    next_label: usize,

    loops: Vec<LoopFrame>,
}

impl<'ctx> X86Generator<'ctx> {
    pub fn new(ctx: &'ctx CompilerCtx) -> Self {
        Self {
            ctx,
            code: InstructionList::default(),
            depth: 0,
            next_label: 0,
            loops: vec![],
        }
    }

    /// Generates code for a bound tree and hands back the instructions.
    pub fn generate(mut self, root: &Node) -> CodegenResult<InstructionList> {
        self.gen_node(root)?;
        tracing::debug!(instructions = self.code.len(), "code generation finished");
        Ok(self.code)
    }

    fn emit(&mut self, instr: Instruction) {
        self.code.push(instr);
    }

    fn emit_op(&mut self, opcode: Opcode) {
        self.emit(Instruction::nullary(opcode));
    }

    fn push_frame(&mut self) {
        self.emit(Instruction::unary(Opcode::Push, X86Reg::EBP));
        self.emit(Instruction::binary(Opcode::Move, X86Reg::ESP, X86Reg::EBP));
    }

    fn fresh_label(&mut self, suffix: &str) -> String {
        let label = format!("L{}.{suffix}", self.next_label);
        self.next_label += 1;
        label
    }

    fn symbol_of(&self, node: &Node) -> CodegenResult<&'ctx Symbol> {
        let ctx = self.ctx;
        node.binding
            .and_then(|id| ctx.symbols.get(id))
            .ok_or_else(|| CodegenError::Unbound(node_name(node)))
    }

    fn variable_of(&self, node: &Node) -> CodegenResult<&'ctx Symbol> {
        let sym = self.symbol_of(node)?;
        if !sym.is_variable() {
            return Err(CodegenError::NotAVariable(sym.name.clone()));
        }
        Ok(sym)
    }

    /// Register holding the frame pointer of the frame that declares
    /// `sym`. Walks the static chain through `%ecx` when that frame is not
    /// the current one.
    fn frame_of(&mut self, sym: &Symbol) -> CodegenResult<X86Reg> {
        let Some(hops) = self.depth.checked_sub(sym.depth) else {
            return Err(CodegenError::MalformedNode {
                kind: NodeKind::Variable,
                reason: "variable used outside its declaring scope",
            });
        };
        if hops == 0 {
            return Ok(X86Reg::EBP);
        }

        self.emit(Instruction::binary(Opcode::Move, X86Reg::EBP, X86Reg::ECX));
        for _ in 0..hops {
            self.emit(Instruction::binary(
                Opcode::Move,
                Operand::Deref(X86Reg::ECX),
                X86Reg::ECX,
            ));
        }
        Ok(X86Reg::ECX)
    }

    /// Pops the condition and jumps to `target` when it is zero.
    fn gen_condition(&mut self, cond: &Node, target: &str) -> CodegenResult<()> {
        self.gen_node(cond)?;
        self.emit(Instruction::unary(Opcode::Pop, X86Reg::EAX));
        self.emit(Instruction::unary(Opcode::CmpZero, X86Reg::EAX));
        self.emit(Instruction::unary(Opcode::JumpZero, Operand::Label(target.to_string())));
        Ok(())
    }

    fn gen_call(&mut self, node: &Node) -> CodegenResult<()> {
        let callee = required_child(node, 0, "call without callee")?;
        let sym = self.symbol_of(callee)?;
        let label = match (&sym.kind, &sym.label) {
            (SymbolKind::Function, Some(label)) => label.clone(),
            _ => {
                return Err(CodegenError::MalformedNode {
                    kind: NodeKind::Expression,
                    reason: "callee is not a function",
                })
            }
        };

        let args = node.child(1);
        if let Some(args) = args {
            self.gen_node(args)?;
        }
        self.emit(Instruction::call(label));

        let count = args.map_or(0, argument_count) as i32;
        if count > 0 {
            self.emit(Instruction::binary(
                Opcode::Add,
                Operand::Imm(STORAGE_UNIT * count),
                X86Reg::ESP,
            ));
        }
        self.emit(Instruction::unary(Opcode::Push, X86Reg::EAX));
        Ok(())
    }

    fn gen_binary(&mut self, op: &str) -> CodegenResult<()> {
        let Some(ast_op) = AstOp::from_symbol(op) else {
            return Err(CodegenError::UnknownOperator(op.to_string()));
        };

        self.emit(Instruction::unary(Opcode::Pop, X86Reg::EBX));
        self.emit(Instruction::unary(Opcode::Pop, X86Reg::EAX));
        match ast_op {
            AstOp::Add => self.emit(Instruction::binary(Opcode::Add, X86Reg::EBX, X86Reg::EAX)),
            AstOp::Subtract => self.emit(Instruction::binary(Opcode::Sub, X86Reg::EBX, X86Reg::EAX)),
            AstOp::Multiply => self.emit(Instruction::unary(Opcode::Mul, X86Reg::EBX)),
            AstOp::Divide => {
                self.emit_op(Opcode::Cltd);
                self.emit(Instruction::unary(Opcode::Div, X86Reg::EBX));
            }
            relational => {
                let set = match relational {
                    AstOp::LThan => Opcode::SetL,
                    AstOp::GThan => Opcode::SetG,
                    AstOp::LtEq => Opcode::SetLe,
                    AstOp::GtEq => Opcode::SetGe,
                    AstOp::EqEq => Opcode::SetE,
                    _ => Opcode::SetNe,
                };
                self.emit(Instruction::binary(Opcode::Cmp, X86Reg::EBX, X86Reg::EAX));
                self.emit(Instruction::unary(set, X86Reg::AL));
                self.emit_op(Opcode::Cbw);
                self.emit_op(Opcode::Cwde);
            }
        }
        self.emit(Instruction::unary(Opcode::Push, X86Reg::EAX));
        Ok(())
    }

    /// Parses the command line into stack arguments, calls the first
    /// function and exits with its result.
    fn gen_entry_point(&mut self, first_function: String) {
        let text = |s: &str| Operand::Text(s.to_string());

        self.emit(Instruction::directive("main:"));
        self.push_frame();
        self.emit(Instruction::binary(Opcode::Move, X86Reg::ESP, X86Reg::ESI).with_offsets(8, 0));
        self.emit(Instruction::unary(Opcode::Decl, X86Reg::ESI));
        self.emit(Instruction::unary(Opcode::JumpZero, text("noargs")));
        self.emit(Instruction::binary(Opcode::Move, X86Reg::EBP, X86Reg::EBX).with_offsets(12, 0));
        self.emit(Instruction::directive("pusharg:"));
        self.emit(Instruction::binary(Opcode::Add, Operand::Imm(4), X86Reg::EBX));
        self.emit(Instruction::unary(Opcode::Push, Operand::Imm(10)));
        self.emit(Instruction::unary(Opcode::Push, Operand::Imm(0)));
        self.emit(Instruction::unary(Opcode::Push, Operand::Deref(X86Reg::EBX)));
        self.emit(Instruction::syscall("strtol"));
        self.emit(Instruction::binary(Opcode::Add, Operand::Imm(12), X86Reg::ESP));
        self.emit(Instruction::unary(Opcode::Push, X86Reg::EAX));
        self.emit(Instruction::unary(Opcode::Decl, X86Reg::ESI));
        self.emit(Instruction::unary(Opcode::JumpNonZero, text("pusharg")));
        self.emit(Instruction::directive("noargs:"));

        self.emit(Instruction::call(first_function));

        self.emit_op(Opcode::Leave);
        self.emit(Instruction::unary(Opcode::Push, X86Reg::EAX));
        self.emit(Instruction::syscall("exit"));
    }
}

impl CodeGenerator for X86Generator<'_> {
    fn gen_program(&mut self, node: &Node) -> CodegenResult<()> {
        let first_function = node
            .child(0)
            .and_then(|list| list.child(0))
            .and_then(|func| func.child(0))
            .and_then(|name| name.data.as_ident())
            .map(str::to_string)
            .ok_or(CodegenError::MalformedNode {
                kind: NodeKind::Program,
                reason: "program has no functions",
            })?;

        let data = self.ctx.strings.data_section();
        for line in data.lines() {
            self.emit(Instruction::directive(line));
        }
        self.emit(Instruction::directive(".text"));

        self.gen_children(node)?;
        self.gen_entry_point(first_function);
        Ok(())
    }

    fn gen_function(&mut self, node: &Node) -> CodegenResult<()> {
        let name = required_child(node, 0, "function without name")?;
        let Some(label) = self.symbol_of(name)?.label.clone() else {
            return Err(CodegenError::MalformedNode {
                kind: NodeKind::Function,
                reason: "function name is not bound to a function",
            });
        };
        tracing::trace!(function = %label, "generating function");

        self.depth += 1;
        self.emit(Instruction::label(label));
        self.push_frame();
        if let Some(body) = node.child(2) {
            self.gen_node(body)?;
        }
        // falling off the end returns whatever is in %eax
        self.emit_op(Opcode::Leave);
        self.emit_op(Opcode::Ret);
        self.depth -= 1;
        Ok(())
    }

    fn gen_block(&mut self, node: &Node) -> CodegenResult<()> {
        self.depth += 1;
        self.push_frame();
        self.gen_children(node)?;
        self.emit_op(Opcode::Leave);
        self.depth -= 1;
        Ok(())
    }

    fn gen_declaration(&mut self, node: &Node) -> CodegenResult<()> {
        let mut count = 0;
        node.walk(&mut |n| {
            if n.kind == NodeKind::Variable {
                count += 1;
            }
        });
        self.emit(Instruction::binary(
            Opcode::Sub,
            Operand::Imm(STORAGE_UNIT * count),
            X86Reg::ESP,
        ));
        Ok(())
    }

    fn gen_print_list(&mut self, node: &Node) -> CodegenResult<()> {
        self.gen_children(node)?;
        self.emit(Instruction::unary(Opcode::Push, Operand::Imm(10)));
        self.emit(Instruction::syscall("putchar"));
        Ok(())
    }

    fn gen_print_item(&mut self, node: &Node) -> CodegenResult<()> {
        let item = required_child(node, 0, "empty print item")?;
        if item.kind == NodeKind::Text {
            let Some(idx) = item.data.as_str_idx() else {
                return Err(CodegenError::MalformedNode {
                    kind: NodeKind::Text,
                    reason: "string literal was not interned",
                });
            };
            self.emit(Instruction::unary(Opcode::Push, Operand::Addr(StringPool::label(idx))));
        } else {
            self.gen_node(item)?;
            self.emit(Instruction::unary(
                Opcode::Push,
                Operand::Addr(INTEGER_FORMAT_LABEL.to_string()),
            ));
        }
        self.emit(Instruction::syscall("printf"));
        Ok(())
    }

    fn gen_expression(&mut self, node: &Node) -> CodegenResult<()> {
        if node.is_call() {
            return self.gen_call(node);
        }

        self.gen_children(node)?;
        match (node.arity(), node.data.as_op()) {
            (1, Some(NEGATE_TAG)) => {
                self.emit(Instruction::unary(Opcode::Pop, X86Reg::EBX));
                self.emit(Instruction::unary(Opcode::Neg, X86Reg::EBX));
                self.emit(Instruction::unary(Opcode::Push, X86Reg::EBX));
                Ok(())
            }
            // parenthesised, the value is already in place
            (1, None) => Ok(()),
            (2, Some(op)) => self.gen_binary(op),
            (_, Some(op)) => Err(CodegenError::UnknownOperator(op.to_string())),
            _ => Err(CodegenError::MalformedNode {
                kind: NodeKind::Expression,
                reason: "binary expression without operator",
            }),
        }
    }

    fn gen_variable(&mut self, node: &Node) -> CodegenResult<()> {
        let sym = self.variable_of(node)?;
        let frame = self.frame_of(sym)?;
        self.emit(Instruction::unary(Opcode::Push, frame).with_offsets(sym.stack_offset, 0));
        Ok(())
    }

    fn gen_integer(&mut self, node: &Node) -> CodegenResult<()> {
        let Some(value) = node.data.as_int() else {
            return Err(CodegenError::MalformedNode {
                kind: NodeKind::Integer,
                reason: "missing value",
            });
        };
        self.emit(Instruction::unary(Opcode::Push, Operand::Imm(value)));
        Ok(())
    }

    fn gen_assignment(&mut self, node: &Node) -> CodegenResult<()> {
        let target = required_child(node, 0, "assignment without target")?;
        let value = required_child(node, 1, "assignment without value")?;
        let sym = self.variable_of(target)?;

        self.gen_node(value)?;
        self.emit(Instruction::unary(Opcode::Pop, X86Reg::EAX));
        let frame = self.frame_of(sym)?;
        self.emit(
            Instruction::binary(Opcode::Move, X86Reg::EAX, frame).with_offsets(0, sym.stack_offset),
        );
        Ok(())
    }

    fn gen_return(&mut self, node: &Node) -> CodegenResult<()> {
        self.gen_children(node)?;
        self.emit(Instruction::unary(Opcode::Pop, X86Reg::EAX));
        // one frame per enclosing block, plus the function's own
        for _ in 0..self.depth {
            self.emit_op(Opcode::Leave);
        }
        self.emit_op(Opcode::Ret);
        Ok(())
    }

    fn gen_if(&mut self, node: &Node) -> CodegenResult<()> {
        let cond = required_child(node, 0, "if without condition")?;
        let then = required_child(node, 1, "if without body")?;
        let end = self.fresh_label("endif");

        match node.child(2) {
            Some(otherwise) => {
                let else_label = self.fresh_label("else");
                self.gen_condition(cond, &else_label)?;
                self.gen_node(then)?;
                self.emit(Instruction::unary(Opcode::Jump, Operand::Label(end.clone())));
                self.emit(Instruction::label(else_label));
                self.gen_node(otherwise)?;
            }
            None => {
                self.gen_condition(cond, &end)?;
                self.gen_node(then)?;
            }
        }
        self.emit(Instruction::label(end));
        Ok(())
    }

    fn gen_while(&mut self, node: &Node) -> CodegenResult<()> {
        let cond = required_child(node, 0, "while without condition")?;
        let body = required_child(node, 1, "while without body")?;
        let start = self.fresh_label("while");
        let end = self.fresh_label("done");

        self.emit(Instruction::label(start.clone()));
        self.gen_condition(cond, &end)?;

        self.loops.push(LoopFrame {
            start: start.clone(),
            depth: self.depth,
        });
        let body_result = self.gen_node(body);
        self.loops.pop();
        body_result?;

        self.emit(Instruction::unary(Opcode::Jump, Operand::Label(start)));
        self.emit(Instruction::label(end));
        Ok(())
    }

    fn gen_continue(&mut self, _node: &Node) -> CodegenResult<()> {
        let Some(frame) = self.loops.last().cloned() else {
            return Err(CodegenError::ContinueOutsideLoop);
        };
        // drop the block frames opened inside the loop body
        for _ in frame.depth..self.depth {
            self.emit_op(Opcode::Leave);
        }
        self.emit(Instruction::unary(Opcode::Jump, Operand::Label(frame.start)));
        Ok(())
    }
}

/// Renders a bound tree as assembly text.
pub fn generate_program(ctx: &CompilerCtx, root: &Node) -> CodegenResult<String> {
    Ok(X86Generator::new(ctx).generate(root)?.render())
}

fn required_child<'n>(node: &'n Node, idx: usize, reason: &'static str) -> CodegenResult<&'n Node> {
    node.child(idx).ok_or(CodegenError::MalformedNode {
        kind: node.kind,
        reason,
    })
}

fn node_name(node: &Node) -> String {
    node.data
        .as_ident()
        .map_or_else(|| node.kind.to_string(), str::to_string)
}

/// Values a call pushes for its argument node.
fn argument_count(args: &Node) -> usize {
    match args.kind {
        NodeKind::ExpressionList => args.arity(),
        NodeKind::ArgumentList => args.iter_children().map(argument_count).sum(),
        _ => 1,
    }
}
