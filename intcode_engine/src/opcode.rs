// Copyright 2026 the Intcode Engine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Opcode values and operand schemas for the instruction set.
//!
//! This module is a small wrapper around generated opcode tables.

include!("opcodes_gen.rs");

impl Opcode {
    /// Returns the opcode code value (the low two decimal digits of an
    /// instruction word).
    #[must_use]
    pub const fn code(self) -> i64 {
        self as i64
    }

    /// Returns the number of operand words following the opcode word.
    #[must_use]
    pub const fn arity(self) -> usize {
        self.operands().len()
    }
}
