// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use std::fmt;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum X86RegName {
    RAX,
    RBX,
    RCX,
    RDX,
    RSP,
    RBP,
    RSI,
    RDI,
}

/// Width of a register access.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum RegSize {
    /// Low byte, used to receive comparison flags.
    Byte,

    /// Full 32-bit register.
    Dword,
}

/// X86 register
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct X86Reg {
    pub size: RegSize,
    pub name: X86RegName,
}

impl X86Reg {
    pub const EAX: X86Reg = X86Reg::dword(X86RegName::RAX);
    pub const EBX: X86Reg = X86Reg::dword(X86RegName::RBX);
    pub const ECX: X86Reg = X86Reg::dword(X86RegName::RCX);
    pub const ESP: X86Reg = X86Reg::dword(X86RegName::RSP);
    pub const EBP: X86Reg = X86Reg::dword(X86RegName::RBP);
    pub const ESI: X86Reg = X86Reg::dword(X86RegName::RSI);
    pub const AL: X86Reg = X86Reg::byte(X86RegName::RAX);

    pub const fn dword(name: X86RegName) -> Self {
        Self { size: RegSize::Dword, name }
    }

    pub const fn byte(name: X86RegName) -> Self {
        Self { size: RegSize::Byte, name }
    }

    /// Textual name for the access width, without the `%` sigil.
    pub fn name(&self) -> &'static str {
        match (self.name, self.size) {
            (X86RegName::RAX, RegSize::Dword) => "eax",
            (X86RegName::RAX, RegSize::Byte) => "al",

            (X86RegName::RBX, RegSize::Dword) => "ebx",
            (X86RegName::RBX, RegSize::Byte) => "bl",

            (X86RegName::RCX, RegSize::Dword) => "ecx",
            (X86RegName::RCX, RegSize::Byte) => "cl",

            (X86RegName::RDX, RegSize::Dword) => "edx",
            (X86RegName::RDX, RegSize::Byte) => "dl",

            (X86RegName::RSP, RegSize::Dword) => "esp",
            (X86RegName::RSP, RegSize::Byte) => "spl",

            (X86RegName::RBP, RegSize::Dword) => "ebp",
            (X86RegName::RBP, RegSize::Byte) => "bpl",

            (X86RegName::RSI, RegSize::Dword) => "esi",
            (X86RegName::RSI, RegSize::Byte) => "sil",

            (X86RegName::RDI, RegSize::Dword) => "edi",
            (X86RegName::RDI, RegSize::Byte) => "dil",
        }
    }
}

impl fmt::Display for X86Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_names() {
        assert_eq!(X86Reg::EAX.to_string(), "%eax");
        assert_eq!(X86Reg::AL.to_string(), "%al");
        assert_eq!(X86Reg::EBP.name(), "ebp");
        assert_ne!(X86Reg::EAX, X86Reg::AL);
    }
}
