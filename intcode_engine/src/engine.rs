// Copyright 2026 the Intcode Engine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The virtual machine core.
//!
//! An [`Engine`] owns its [`Memory`], an instruction cursor, and a relative
//! base register, and executes the fixed instruction set one word-aligned
//! instruction at a time. Execution is resumable between instructions:
//! [`Engine::step`] runs exactly one instruction, so a cooperative
//! scheduler can interleave several engines without any yield support in
//! the engine itself.
//!
//! Halting is an explicit terminal state checked by the step loop, not an
//! unwound error. Faults are fatal for the engine: once a step returns a
//! [`FaultInfo`], the engine stays faulted and every further step returns
//! the same fault.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use crate::decode::{MAX_OPERANDS, Mode, decode};
use crate::memory::{Memory, OutOfRange};
use crate::opcode::Opcode;
use crate::parse::{ParseError, parse_program};
use crate::port::{Exhausted, InputPort, OutputPort};
use crate::trace::{TraceMask, TraceOutcome, TraceSink};

/// Execution limits for an engine.
#[derive(Clone, Debug)]
pub struct Limits {
    /// Maximum memory size in words. Writes addressed past this bound
    /// fault instead of growing the store.
    pub max_memory_words: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_memory_words: 1 << 21,
        }
    }
}

/// Which port an instruction required.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PortKind {
    /// The pull-based input port.
    Input,
    /// The push-based output port.
    Output,
}

impl fmt::Display for PortKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => write!(f, "input"),
            Self::Output => write!(f, "output"),
        }
    }
}

/// A fatal execution fault.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Fault {
    /// The fetched instruction word carries a code no opcode matches.
    UnknownOpcode {
        /// The unmatched low-two-digit code.
        opcode: i64,
    },
    /// An operand carries a mode digit no addressing mode matches.
    UnknownMode {
        /// The unmatched mode digit.
        digit: i64,
    },
    /// An operand in write position carries immediate mode.
    InvalidWriteMode,
    /// An `in` instruction executed against an exhausted input port.
    InputExhausted,
    /// An instruction required a port that was never assigned.
    UninitializedPort {
        /// The missing port.
        port: PortKind,
    },
    /// A resolved address was negative or past the memory bound.
    AddressOutOfRange {
        /// The offending address value.
        address: i64,
    },
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownOpcode { opcode } => write!(f, "unknown opcode {opcode}"),
            Self::UnknownMode { digit } => write!(f, "unknown addressing mode {digit}"),
            Self::InvalidWriteMode => write!(f, "immediate mode on a write operand"),
            Self::InputExhausted => write!(f, "input exhausted"),
            Self::UninitializedPort { port } => write!(f, "{port} port not assigned"),
            Self::AddressOutOfRange { address } => write!(f, "address {address} out of range"),
        }
    }
}

impl core::error::Error for Fault {}

/// A fault annotated with the cursor at fetch time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FaultInfo {
    /// Cursor position of the faulting instruction word.
    pub cursor: usize,
    /// Fault kind.
    pub fault: Fault,
}

impl fmt::Display for FaultInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fault at cursor {}: {}", self.cursor, self.fault)
    }
}

impl core::error::Error for FaultInfo {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        Some(&self.fault)
    }
}

/// Engine execution status.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Status {
    /// The engine can execute further instructions.
    Running,
    /// The engine halted with this exit code. Terminal.
    ///
    /// The documented instruction set only ever produces exit code 0;
    /// other codes are reserved for instruction extensions.
    Halted(i64),
    /// The engine faulted. Terminal; the fault is kept and re-reported.
    Faulted,
}

impl Status {
    /// Returns `true` if the engine can execute further instructions.
    #[must_use]
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }

    /// Returns `true` if the engine halted normally.
    #[must_use]
    pub const fn is_halted(self) -> bool {
        matches!(self, Self::Halted(_))
    }
}

/// One running instance of the virtual machine.
pub struct Engine {
    memory: Memory,
    cursor: usize,
    relative_base: i64,
    status: Status,
    fault: Option<FaultInfo>,
    input: Option<Box<dyn InputPort>>,
    output: Option<Box<dyn OutputPort>>,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("cursor", &self.cursor)
            .field("relative_base", &self.relative_base)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Creates an engine over `image` with default [`Limits`].
    ///
    /// The engine starts at cursor 0 with relative base 0 and no ports
    /// assigned.
    #[must_use]
    pub fn new(image: Vec<i64>) -> Self {
        Self::with_limits(image, &Limits::default())
    }

    /// Creates an engine over `image` with explicit `limits`.
    #[must_use]
    pub fn with_limits(image: Vec<i64>, limits: &Limits) -> Self {
        Self {
            memory: Memory::new(image, limits.max_memory_words),
            cursor: 0,
            relative_base: 0,
            status: Status::Running,
            fault: None,
            input: None,
            output: None,
        }
    }

    /// Parses a comma-separated program text and creates an engine over it.
    pub fn from_source(text: &str) -> Result<Self, ParseError> {
        Ok(Self::new(parse_program(text)?))
    }

    /// Assigns the input port.
    pub fn set_input(&mut self, port: impl InputPort + 'static) {
        self.input = Some(Box::new(port));
    }

    /// Assigns the output port.
    pub fn set_output(&mut self, port: impl OutputPort + 'static) {
        self.output = Some(Box::new(port));
    }

    /// Assigns both ports, consuming and returning the engine for
    /// construction chains.
    #[must_use]
    pub fn with_io(
        mut self,
        input: impl InputPort + 'static,
        output: impl OutputPort + 'static,
    ) -> Self {
        self.set_input(input);
        self.set_output(output);
        self
    }

    /// Returns the engine's memory.
    #[must_use]
    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Returns a full ordered copy of memory.
    ///
    /// Available at any point, including after a halt or fault.
    #[must_use]
    pub fn snapshot(&self) -> Vec<i64> {
        self.memory.snapshot()
    }

    /// Returns the instruction cursor.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Returns the relative base register.
    #[must_use]
    pub fn relative_base(&self) -> i64 {
        self.relative_base
    }

    /// Returns the execution status.
    #[must_use]
    pub fn status(&self) -> Status {
        self.status
    }

    /// Returns the recorded fault, if the engine faulted.
    #[must_use]
    pub fn fault(&self) -> Option<&FaultInfo> {
        self.fault.as_ref()
    }

    /// Patches one memory word before execution starts.
    ///
    /// This is the pre-execution transform hook drivers use to set initial
    /// parameters. It is not meant for mid-run mutation.
    pub fn patch(&mut self, address: usize, value: i64) -> Result<(), OutOfRange> {
        debug_assert!(
            self.status.is_running() && self.cursor == 0,
            "patch is a pre-execution hook"
        );
        self.memory.set(address, value)
    }

    /// Creates an independent engine from a snapshot of this one's memory.
    ///
    /// The fork starts from cursor 0 with relative base 0, running status,
    /// and no ports assigned; the two memories evolve independently
    /// afterwards.
    #[must_use]
    pub fn fork(&self) -> Self {
        Self {
            memory: self.memory.clone(),
            cursor: 0,
            relative_base: 0,
            status: Status::Running,
            fault: None,
            input: None,
            output: None,
        }
    }

    /// Executes at most one instruction and returns the status afterwards.
    ///
    /// A halted engine returns its status without executing anything; a
    /// faulted engine returns its recorded fault again.
    pub fn step(&mut self) -> Result<Status, FaultInfo> {
        self.step_with(TraceMask::NONE, &mut None)
    }

    /// Runs until the engine halts, returning the exit code.
    ///
    /// On a fault the engine is left faulted and memory stays inspectable
    /// through [`snapshot`](Self::snapshot).
    pub fn run(&mut self) -> Result<i64, FaultInfo> {
        loop {
            if let Status::Halted(code) = self.step()? {
                return Ok(code);
            }
        }
    }

    /// Runs until halt with tracing, emitting the events `mask` requests
    /// to `sink`.
    pub fn run_traced(
        &mut self,
        mask: TraceMask,
        sink: &mut dyn TraceSink,
    ) -> Result<i64, FaultInfo> {
        if mask.contains(TraceMask::RUN) {
            sink.run_start(self.memory.len());
        }
        let result = self.run_traced_body(mask, sink);
        if mask.contains(TraceMask::RUN) {
            match &result {
                Ok(code) => sink.run_end(TraceOutcome::Halted(*code)),
                Err(info) => sink.run_end(TraceOutcome::Fault(info)),
            }
        }
        result
    }

    fn run_traced_body(
        &mut self,
        mask: TraceMask,
        sink: &mut dyn TraceSink,
    ) -> Result<i64, FaultInfo> {
        let mut trace: Option<&mut dyn TraceSink> = Some(sink);
        loop {
            if let Status::Halted(code) = self.step_with(mask, &mut trace)? {
                return Ok(code);
            }
        }
    }

    /// Executes at most `max_steps` instructions, stopping early on halt.
    ///
    /// Returns [`Status::Running`] when the budget ran out first. This is
    /// the suspension primitive cooperative schedulers build on.
    pub fn run_bounded(&mut self, max_steps: u64) -> Result<Status, FaultInfo> {
        for _ in 0..max_steps {
            if let status @ Status::Halted(_) = self.step()? {
                return Ok(status);
            }
        }
        Ok(self.status)
    }

    fn step_with(
        &mut self,
        mask: TraceMask,
        trace: &mut Option<&mut dyn TraceSink>,
    ) -> Result<Status, FaultInfo> {
        if let Some(info) = &self.fault {
            return Err(info.clone());
        }
        if let Status::Halted(_) = self.status {
            return Ok(self.status);
        }

        let pc = self.cursor;
        let raw = decode(self.memory.get(pc));
        let Some(opcode) = Opcode::from_code(raw.code) else {
            return Err(self.fault_at(pc, Fault::UnknownOpcode { opcode: raw.code }));
        };

        if mask.contains(TraceMask::INSTR)
            && let Some(t) = trace.as_mut()
        {
            t.instr(pc, opcode);
        }

        match self.exec(pc, opcode, raw.modes, mask, trace) {
            Ok(()) => Ok(self.status),
            Err(fault) => Err(self.fault_at(pc, fault)),
        }
    }

    fn exec(
        &mut self,
        pc: usize,
        opcode: Opcode,
        modes: [i64; MAX_OPERANDS],
        mask: TraceMask,
        trace: &mut Option<&mut dyn TraceSink>,
    ) -> Result<(), Fault> {
        let arity = opcode.arity();
        let mut args = [0i64; MAX_OPERANDS];
        for (ix, arg) in args.iter_mut().enumerate().take(arity) {
            *arg = self.memory.get(pc + 1 + ix);
        }
        // Default fallthrough target; jumps overwrite it below.
        let next = pc + 1 + arity;

        match opcode {
            Opcode::Add => {
                let a = self.read_operand(modes[0], args[0])?;
                let b = self.read_operand(modes[1], args[1])?;
                let dst = self.write_operand(modes[2], args[2])?;
                self.store(dst, a + b)?;
                self.cursor = next;
            }
            Opcode::Mul => {
                let a = self.read_operand(modes[0], args[0])?;
                let b = self.read_operand(modes[1], args[1])?;
                let dst = self.write_operand(modes[2], args[2])?;
                self.store(dst, a * b)?;
                self.cursor = next;
            }
            Opcode::In => {
                let dst = self.write_operand(modes[0], args[0])?;
                let port = self.input.as_mut().ok_or(Fault::UninitializedPort {
                    port: PortKind::Input,
                })?;
                let value = port.next().map_err(|Exhausted| Fault::InputExhausted)?;
                if mask.contains(TraceMask::IO)
                    && let Some(t) = trace.as_mut()
                {
                    t.port_input(value);
                }
                self.store(dst, value)?;
                self.cursor = next;
            }
            Opcode::Out => {
                let value = self.read_operand(modes[0], args[0])?;
                let port = self.output.as_mut().ok_or(Fault::UninitializedPort {
                    port: PortKind::Output,
                })?;
                port.emit(value);
                if mask.contains(TraceMask::IO)
                    && let Some(t) = trace.as_mut()
                {
                    t.port_output(value);
                }
                self.cursor = next;
            }
            Opcode::Jnz => {
                let cond = self.read_operand(modes[0], args[0])?;
                let target = self.read_operand(modes[1], args[1])?;
                self.cursor = if cond != 0 { to_address(target)? } else { next };
            }
            Opcode::Jz => {
                let cond = self.read_operand(modes[0], args[0])?;
                let target = self.read_operand(modes[1], args[1])?;
                self.cursor = if cond == 0 { to_address(target)? } else { next };
            }
            Opcode::Lt => {
                let a = self.read_operand(modes[0], args[0])?;
                let b = self.read_operand(modes[1], args[1])?;
                let dst = self.write_operand(modes[2], args[2])?;
                self.store(dst, i64::from(a < b))?;
                self.cursor = next;
            }
            Opcode::Eq => {
                let a = self.read_operand(modes[0], args[0])?;
                let b = self.read_operand(modes[1], args[1])?;
                let dst = self.write_operand(modes[2], args[2])?;
                self.store(dst, i64::from(a == b))?;
                self.cursor = next;
            }
            Opcode::AdjustBase => {
                let delta = self.read_operand(modes[0], args[0])?;
                self.relative_base += delta;
                self.cursor = next;
            }
            Opcode::Halt => {
                self.status = Status::Halted(0);
            }
        }
        Ok(())
    }

    fn read_operand(&self, digit: i64, raw: i64) -> Result<i64, Fault> {
        let mode = Mode::from_digit(digit).ok_or(Fault::UnknownMode { digit })?;
        Ok(match mode {
            Mode::Immediate => raw,
            Mode::Positional => self.memory.get(to_address(raw)?),
            Mode::Relative => self.memory.get(to_address(self.relative_base + raw)?),
        })
    }

    fn write_operand(&self, digit: i64, raw: i64) -> Result<usize, Fault> {
        let mode = Mode::from_digit(digit).ok_or(Fault::UnknownMode { digit })?;
        match mode {
            Mode::Positional => to_address(raw),
            Mode::Immediate => Err(Fault::InvalidWriteMode),
            Mode::Relative => to_address(self.relative_base + raw),
        }
    }

    fn store(&mut self, address: usize, value: i64) -> Result<(), Fault> {
        self.memory.set(address, value).map_err(|e| {
            Fault::AddressOutOfRange {
                address: e.address as i64,
            }
        })
    }

    fn fault_at(&mut self, cursor: usize, fault: Fault) -> FaultInfo {
        self.status = Status::Faulted;
        let info = FaultInfo { cursor, fault };
        self.fault = Some(info.clone());
        info
    }
}

fn to_address(value: i64) -> Result<usize, Fault> {
    usize::try_from(value).map_err(|_| Fault::AddressOutOfRange { address: value })
}

#[cfg(test)]
mod tests {
    use super::{Engine, Fault, PortKind, Status};
    use crate::port::{BufferOutput, QueueInput};
    use alloc::vec;

    fn run_to_snapshot(source: &str) -> alloc::vec::Vec<i64> {
        let mut engine = Engine::from_source(source).unwrap();
        assert_eq!(engine.run().unwrap(), 0);
        engine.snapshot()
    }

    #[test]
    fn positional_arithmetic_matches_reference_snapshots() {
        assert_eq!(run_to_snapshot("1,0,0,0,99"), vec![2, 0, 0, 0, 99]);
        assert_eq!(run_to_snapshot("2,3,0,3,99"), vec![2, 3, 0, 6, 99]);
        assert_eq!(run_to_snapshot("2,4,4,5,99,0"), vec![2, 4, 4, 5, 99, 9801]);
        assert_eq!(
            run_to_snapshot("1,1,1,4,99,5,6,0,99"),
            vec![30, 1, 1, 4, 2, 5, 6, 0, 99]
        );
    }

    #[test]
    fn immediate_modes_resolve_literals() {
        assert_eq!(run_to_snapshot("1002,4,3,4,33"), vec![1002, 4, 3, 4, 99]);
    }

    #[test]
    fn echo_program_round_trips_io() {
        let input = QueueInput::with_values([1234]);
        let output = BufferOutput::new();
        let mut engine = Engine::from_source("3,5,4,5,99")
            .unwrap()
            .with_io(input, output.clone());
        engine.run().unwrap();
        assert_eq!(output.values(), vec![1234]);
    }

    #[test]
    fn adjust_base_moves_the_relative_base() {
        let mut engine = Engine::from_source("109,19,109,-4,99").unwrap();
        engine.run().unwrap();
        assert_eq!(engine.relative_base(), 15);
    }

    #[test]
    fn halted_engines_do_not_execute_further() {
        let mut engine = Engine::from_source("99,1,0,0,0").unwrap();
        assert_eq!(engine.run().unwrap(), 0);
        let before = engine.snapshot();
        assert_eq!(engine.step().unwrap(), Status::Halted(0));
        assert_eq!(engine.snapshot(), before);
    }

    #[test]
    fn unknown_opcode_faults_at_the_fetch_cursor() {
        let mut engine = Engine::new(vec![1, 0, 0, 0, 98]);
        let info = engine.run().unwrap_err();
        assert_eq!(info.cursor, 4);
        assert_eq!(info.fault, Fault::UnknownOpcode { opcode: 98 });
        assert_eq!(engine.status(), Status::Faulted);
    }

    #[test]
    fn immediate_write_operand_faults() {
        let mut engine = Engine::from_source("11101,1,1,0,99").unwrap();
        let info = engine.run().unwrap_err();
        assert_eq!(info.fault, Fault::InvalidWriteMode);
    }

    #[test]
    fn unassigned_input_port_faults() {
        let mut engine = Engine::from_source("3,0,99").unwrap();
        let info = engine.run().unwrap_err();
        assert_eq!(
            info.fault,
            Fault::UninitializedPort {
                port: PortKind::Input
            }
        );
    }

    #[test]
    fn exhausted_input_faults_and_sticks() {
        let mut engine = Engine::from_source("3,0,99").unwrap();
        engine.set_input(QueueInput::new());
        let info = engine.run().unwrap_err();
        assert_eq!(info.fault, Fault::InputExhausted);
        assert_eq!(engine.status(), Status::Faulted);
        // The fault is re-reported, never silently cleared.
        assert_eq!(engine.step().unwrap_err(), info);
    }

    #[test]
    fn negative_resolved_addresses_fault() {
        let mut engine = Engine::from_source("4,-3,99").unwrap();
        engine.set_output(BufferOutput::new());
        let info = engine.run().unwrap_err();
        assert_eq!(info.fault, Fault::AddressOutOfRange { address: -3 });
    }

    #[test]
    fn run_bounded_stops_on_budget_then_resumes() {
        let input = QueueInput::with_values([8]);
        let output = BufferOutput::new();
        let mut engine = Engine::from_source("3,9,8,9,10,9,4,9,99,-1,8")
            .unwrap()
            .with_io(input, output.clone());

        assert_eq!(engine.run_bounded(2).unwrap(), Status::Running);
        assert!(output.values().is_empty());
        assert_eq!(engine.run_bounded(u64::MAX).unwrap(), Status::Halted(0));
        assert_eq!(output.values(), vec![1]);
    }

    #[test]
    fn fork_copies_memory_and_resets_registers() {
        let mut original = Engine::from_source("1,0,6,0,99,20,22").unwrap();
        original.step().unwrap();
        assert_eq!(original.snapshot()[0], 23);
        let fork = original.fork();

        assert_eq!(fork.cursor(), 0);
        assert_eq!(fork.status(), Status::Running);
        assert_eq!(fork.snapshot(), original.snapshot());

        // Running each side further must not leak into the other.
        let mut fork = fork;
        fork.run().unwrap();
        assert_eq!(fork.snapshot()[0], 45);
        assert_eq!(original.snapshot()[0], 23);
    }

    #[test]
    fn patch_applies_before_execution() {
        let mut engine = Engine::from_source("1,0,0,0,99").unwrap();
        engine.patch(1, 4).unwrap();
        engine.run().unwrap();
        assert_eq!(engine.snapshot(), vec![100, 4, 0, 0, 99]);
    }
}
