// Copyright 2026 the Intcode Engine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing hooks for the engine.
//!
//! Tracing is optional and `no_std` friendly. The engine only emits events
//! requested by a [`TraceMask`]; with [`TraceMask::NONE`] the step loop
//! pays nothing.
//!
//! To enable tracing, pass a [`TraceMask`] and [`TraceSink`] to
//! [`Engine::run_traced`].

use crate::engine::FaultInfo;
use crate::opcode::Opcode;

#[cfg(doc)]
use crate::engine::Engine;

/// A set of trace events requested by a [`TraceSink`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TraceMask(u32);

impl core::ops::BitOr for TraceMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl core::ops::BitOrAssign for TraceMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl TraceMask {
    /// No tracing.
    pub const NONE: Self = Self(0);
    /// Trace run boundaries.
    ///
    /// Enables:
    /// - [`TraceSink::run_start`]
    /// - [`TraceSink::run_end`]
    pub const RUN: Self = Self(1 << 0);
    /// Trace each executed instruction.
    ///
    /// Enables:
    /// - [`TraceSink::instr`]
    pub const INSTR: Self = Self(1 << 1);
    /// Trace port traffic.
    ///
    /// Enables:
    /// - [`TraceSink::port_input`]
    /// - [`TraceSink::port_output`]
    pub const IO: Self = Self(1 << 2);

    /// Returns `true` if this mask includes all bits in `other`.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }
}

/// Run outcome for tracing.
#[derive(Clone, Debug)]
pub enum TraceOutcome<'a> {
    /// The engine halted with this exit code.
    Halted(i64),
    /// The engine faulted.
    Fault(&'a FaultInfo),
}

/// A trace sink that can receive engine events.
pub trait TraceSink {
    /// Returns the set of events the sink wants.
    fn mask(&self) -> TraceMask {
        TraceMask::NONE
    }

    /// Called at the start of a traced run.
    ///
    /// Called only if `mask()` includes [`TraceMask::RUN`].
    ///
    /// - `memory_len`: memory length in words at run start
    fn run_start(&mut self, _memory_len: usize) {}

    /// Called when a traced run ends, normally or on a fault.
    ///
    /// Called only if `mask()` includes [`TraceMask::RUN`].
    fn run_end(&mut self, _outcome: TraceOutcome<'_>) {}

    /// Called before each executed instruction.
    ///
    /// Called only if `mask()` includes [`TraceMask::INSTR`].
    ///
    /// - `cursor`: address of the instruction word
    /// - `opcode`: decoded opcode
    fn instr(&mut self, _cursor: usize, _opcode: Opcode) {}

    /// Called after each value pulled from the input port.
    ///
    /// Called only if `mask()` includes [`TraceMask::IO`].
    fn port_input(&mut self, _value: i64) {}

    /// Called after each value pushed to the output port.
    ///
    /// Called only if `mask()` includes [`TraceMask::IO`].
    fn port_output(&mut self, _value: i64) {}
}

#[cfg(test)]
mod tests {
    use super::TraceMask;

    #[test]
    fn mask_bits_combine_and_contain() {
        let mask = TraceMask::RUN | TraceMask::IO;
        assert!(mask.contains(TraceMask::RUN));
        assert!(mask.contains(TraceMask::IO));
        assert!(!mask.contains(TraceMask::INSTR));
        assert!(mask.contains(TraceMask::NONE));

        let mut mask = TraceMask::NONE;
        mask |= TraceMask::INSTR;
        assert!(mask.contains(TraceMask::INSTR));
    }
}
