// Copyright 2026 the Intcode Engine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Disassembler for program word images.
//!
//! This module provides:
//! - A structured view ([`Disassembly`], [`InstrView`]) for tooling/tests.
//! - A stable, human-readable text format via [`core::fmt::Display`].
//!
//! Disassembly is best-effort and purely diagnostic: words that do not
//! decode to an executable instruction (unknown opcodes, truncated operand
//! lists, invalid modes) are rendered as data and never affect execution.
//! Since programs may interleave code and data, a data line does not mean
//! the image is malformed.

use alloc::vec::Vec;
use core::fmt;

use crate::decode::{Mode, decode};
use crate::opcode::{Opcode, OperandAccess};

/// One resolved operand of a disassembled instruction.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Operand {
    /// Addressing mode.
    pub mode: Mode,
    /// Raw operand word.
    pub value: i64,
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mode {
            Mode::Positional => write!(f, "[{}]", self.value),
            Mode::Immediate => write!(f, "{}", self.value),
            Mode::Relative => write!(f, "[base{:+}]", self.value),
        }
    }
}

/// One disassembled line: an instruction or a raw data word.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InstrView {
    /// An executable instruction.
    Instr {
        /// Address of the instruction word.
        pc: usize,
        /// Decoded opcode.
        opcode: Opcode,
        /// Operands in program order, one per arity slot.
        operands: Vec<Operand>,
    },
    /// A word that does not decode to an executable instruction.
    Data {
        /// Address of the word.
        pc: usize,
        /// The raw word.
        word: i64,
    },
}

/// A structured disassembly of a word image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Disassembly {
    instrs: Vec<InstrView>,
}

impl Disassembly {
    /// Returns the disassembled lines in address order.
    #[must_use]
    pub fn instrs(&self) -> &[InstrView] {
        &self.instrs
    }
}

impl fmt::Display for Disassembly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for view in &self.instrs {
            match view {
                InstrView::Instr {
                    pc,
                    opcode,
                    operands,
                } => {
                    write!(f, "{pc:>4}: {}", opcode.mnemonic())?;
                    for (ix, operand) in operands.iter().enumerate() {
                        if ix == 0 {
                            write!(f, " {operand}")?;
                        } else {
                            write!(f, ", {operand}")?;
                        }
                    }
                    writeln!(f)?;
                }
                InstrView::Data { pc, word } => {
                    writeln!(f, "{pc:>4}: .data {word}")?;
                }
            }
        }
        Ok(())
    }
}

/// Disassembles `words` into a structured view.
#[must_use]
pub fn disassemble(words: &[i64]) -> Disassembly {
    let mut instrs = Vec::new();
    let mut pc = 0;
    while pc < words.len() {
        match instr_at(words, pc) {
            Some(view) => {
                let arity = match &view {
                    InstrView::Instr { opcode, .. } => opcode.arity(),
                    InstrView::Data { .. } => 0,
                };
                instrs.push(view);
                pc += 1 + arity;
            }
            None => {
                instrs.push(InstrView::Data { pc, word: words[pc] });
                pc += 1;
            }
        }
    }
    Disassembly { instrs }
}

fn instr_at(words: &[i64], pc: usize) -> Option<InstrView> {
    let raw = decode(words[pc]);
    let opcode = Opcode::from_code(raw.code)?;
    let schema = opcode.operands();
    if pc + 1 + schema.len() > words.len() {
        return None;
    }

    let mut operands = Vec::with_capacity(schema.len());
    for (ix, access) in schema.iter().enumerate() {
        let mode = Mode::from_digit(raw.modes[ix])?;
        if *access == OperandAccess::Write && mode == Mode::Immediate {
            return None;
        }
        operands.push(Operand {
            mode,
            value: words[pc + 1 + ix],
        });
    }
    Some(InstrView::Instr {
        pc,
        opcode,
        operands,
    })
}
