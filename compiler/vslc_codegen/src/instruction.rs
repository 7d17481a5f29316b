// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

//! Low-level representation of the emitted program.

use std::fmt;

use itertools::Itertools;
use vslc_target::X86Reg;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Opcode {
    /// Raw line, written out as is.
    Directive,
    Label,
    Push,
    Pop,
    Move,

    /// Call to a function of the program.
    Call,

    /// Call to a C library routine.
    Syscall,
    Leave,
    Ret,
    Add,
    Sub,
    Mul,
    Div,
    Cltd,
    Neg,
    Decl,
    Cmp,
    CmpZero,
    SetL,
    SetG,
    SetLe,
    SetGe,
    SetE,
    SetNe,
    Cbw,
    Cwde,
    Jump,
    JumpZero,
    JumpNonZero,
}

impl Opcode {
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Opcode::Directive | Opcode::Label => "",
            Opcode::Push => "pushl",
            Opcode::Pop => "popl",
            Opcode::Move => "movl",
            Opcode::Call | Opcode::Syscall => "call",
            Opcode::Leave => "leave",
            Opcode::Ret => "ret",
            Opcode::Add => "addl",
            Opcode::Sub => "subl",
            Opcode::Mul => "imull",
            Opcode::Div => "idivl",
            Opcode::Cltd => "cltd",
            Opcode::Neg => "negl",
            Opcode::Decl => "decl",
            Opcode::Cmp | Opcode::CmpZero => "cmpl",
            Opcode::SetL => "setl",
            Opcode::SetG => "setg",
            Opcode::SetLe => "setle",
            Opcode::SetGe => "setge",
            Opcode::SetE => "sete",
            Opcode::SetNe => "setne",
            Opcode::Cbw => "cbw",
            Opcode::Cwde => "cwde",
            Opcode::Jump => "jmp",
            Opcode::JumpZero => "jz",
            Opcode::JumpNonZero => "jnz",
        }
    }

    /// Number of operand slots the opcode reads.
    pub fn operand_count(&self) -> usize {
        match self {
            Opcode::Leave | Opcode::Ret | Opcode::Cltd | Opcode::Cbw | Opcode::Cwde => 0,
            Opcode::Move | Opcode::Add | Opcode::Sub | Opcode::Cmp => 2,
            _ => 1,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Operand {
    #[default]
    None,

    Reg(X86Reg),

    /// Immediate value, `$n`.
    Imm(i32),

    /// Address of a data label, `$label`.
    Addr(String),

    /// Memory the register points at, `(%reg)`.
    Deref(X86Reg),

    /// Code label of the program, rendered with a leading underscore.
    Label(String),

    /// Anything else, rendered verbatim.
    Text(String),
}

impl From<X86Reg> for Operand {
    fn from(reg: X86Reg) -> Self {
        Operand::Reg(reg)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::None => Ok(()),
            Operand::Reg(reg) => write!(f, "{reg}"),
            Operand::Imm(value) => write!(f, "${value}"),
            Operand::Addr(label) => write!(f, "${label}"),
            Operand::Deref(reg) => write!(f, "({reg})"),
            Operand::Label(name) => write!(f, "_{name}"),
            Operand::Text(text) => f.write_str(text),
        }
    }
}

/// One emitted instruction. Operands are in AT&T order: source first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instruction {
    pub opcode: Opcode,
    pub operands: [Operand; 2],

    /// Displacement applied to the matching operand; zero means none.
    pub offsets: [i32; 2],
}

impl Instruction {
    pub fn new(opcode: Opcode, src: Operand, dst: Operand) -> Self {
        Self {
            opcode,
            operands: [src, dst],
            offsets: [0, 0],
        }
    }

    pub fn nullary(opcode: Opcode) -> Self {
        Self::new(opcode, Operand::None, Operand::None)
    }

    pub fn unary(opcode: Opcode, operand: impl Into<Operand>) -> Self {
        Self::new(opcode, operand.into(), Operand::None)
    }

    pub fn binary(opcode: Opcode, src: impl Into<Operand>, dst: impl Into<Operand>) -> Self {
        Self::new(opcode, src.into(), dst.into())
    }

    pub fn with_offsets(mut self, src: i32, dst: i32) -> Self {
        self.offsets = [src, dst];
        self
    }

    pub fn directive(text: impl Into<String>) -> Self {
        Self::unary(Opcode::Directive, Operand::Text(text.into()))
    }

    pub fn label(name: impl Into<String>) -> Self {
        Self::unary(Opcode::Label, Operand::Label(name.into()))
    }

    pub fn call(name: impl Into<String>) -> Self {
        Self::unary(Opcode::Call, Operand::Label(name.into()))
    }

    pub fn syscall(routine: &str) -> Self {
        Self::unary(Opcode::Syscall, Operand::Text(routine.to_string()))
    }

    fn operand(&self, idx: usize) -> String {
        match self.offsets[idx] {
            0 => self.operands[idx].to_string(),
            disp => format!("{disp}({})", self.operands[idx]),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mnemonic = self.opcode.mnemonic();
        match self.opcode {
            Opcode::Directive => write!(f, "{}", self.operand(0)),
            Opcode::Label => write!(f, "{}:", self.operand(0)),
            Opcode::CmpZero => write!(f, "\t{mnemonic}\t$0,{}", self.operand(0)),
            opcode => match opcode.operand_count() {
                0 => write!(f, "\t{mnemonic}"),
                1 => write!(f, "\t{mnemonic}\t{}", self.operand(0)),
                _ => write!(f, "\t{mnemonic}\t{},{}", self.operand(0), self.operand(1)),
            },
        }
    }
}

/// Instructions in emission order. Appended to, never edited.
#[derive(Clone, Debug, Default)]
pub struct InstructionList {
    instrs: Vec<Instruction>,
}

impl InstructionList {
    pub fn push(&mut self, instr: Instruction) {
        self.instrs.push(instr);
    }

    pub fn len(&self) -> usize {
        self.instrs.len()
    }

    /// One line per instruction, newline terminated.
    pub fn render(&self) -> String {
        if self.instrs.is_empty() {
            return String::new();
        }
        format!("{}\n", self.instrs.iter().join("\n"))
    }
}
