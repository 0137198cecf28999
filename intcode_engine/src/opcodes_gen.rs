// Copyright 2026 the Intcode Engine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// @generated by intcode_codegen. Do not edit by hand.

/// Operand access for the opcode table.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OperandAccess {
    /// The operand is resolved to a value.
    Read,
    /// The operand is resolved to a destination address.
    Write,
}

/// Instruction opcodes, keyed by the low two decimal digits of an
/// instruction word.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// `write(dst) = read(a) + read(b)`
    Add = 1,
    /// `write(dst) = read(a) * read(b)`
    Mul = 2,
    /// `write(dst) = next value from the input port`
    In = 3,
    /// `emit read(a) to the output port`
    Out = 4,
    /// `if read(a) != 0, cursor = read(b)`
    Jnz = 5,
    /// `if read(a) == 0, cursor = read(b)`
    Jz = 6,
    /// `write(dst) = 1 if read(a) < read(b), else 0`
    Lt = 7,
    /// `write(dst) = 1 if read(a) == read(b), else 0`
    Eq = 8,
    /// `relative_base += read(a)`
    AdjustBase = 9,
    /// `halt with exit code 0`
    Halt = 99,
}

impl Opcode {
    /// Parses an opcode from its low-two-digit code value.
    #[must_use]
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Add),
            2 => Some(Self::Mul),
            3 => Some(Self::In),
            4 => Some(Self::Out),
            5 => Some(Self::Jnz),
            6 => Some(Self::Jz),
            7 => Some(Self::Lt),
            8 => Some(Self::Eq),
            9 => Some(Self::AdjustBase),
            99 => Some(Self::Halt),
            _ => None,
        }
    }

    /// Returns the instruction mnemonic.
    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Mul => "mul",
            Self::In => "in",
            Self::Out => "out",
            Self::Jnz => "jnz",
            Self::Jz => "jz",
            Self::Lt => "lt",
            Self::Eq => "eq",
            Self::AdjustBase => "arb",
            Self::Halt => "halt",
        }
    }

    /// Returns the per-operand access schema, one entry per operand in
    /// program order.
    #[must_use]
    pub const fn operands(self) -> &'static [OperandAccess] {
        match self {
            Self::Add => &[
                OperandAccess::Read,
                OperandAccess::Read,
                OperandAccess::Write,
            ],
            Self::Mul => &[
                OperandAccess::Read,
                OperandAccess::Read,
                OperandAccess::Write,
            ],
            Self::In => &[OperandAccess::Write],
            Self::Out => &[OperandAccess::Read],
            Self::Jnz => &[OperandAccess::Read, OperandAccess::Read],
            Self::Jz => &[OperandAccess::Read, OperandAccess::Read],
            Self::Lt => &[
                OperandAccess::Read,
                OperandAccess::Read,
                OperandAccess::Write,
            ],
            Self::Eq => &[
                OperandAccess::Read,
                OperandAccess::Read,
                OperandAccess::Write,
            ],
            Self::AdjustBase => &[OperandAccess::Read],
            Self::Halt => &[],
        }
    }
}
