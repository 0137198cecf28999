// Copyright 2026 the Intcode Engine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Round-robin feedback chain execution.
//!
//! A [`FeedbackLoop`] holds an arena of engines plus a FIFO worklist of
//! runnable indices. Each service turn feeds the current piped value to the
//! front engine, single-steps it until it either emits one output (detected
//! through a latch on its output port) or halts, then requeues it at the
//! back iff it is still runnable. The engine itself has no yield concept;
//! suspension is purely this loop ceasing to step it.

use alloc::collections::VecDeque;
use alloc::vec::Vec;
use core::fmt;

use intcode_engine::engine::{Engine, FaultInfo};
use intcode_engine::port::{LatchOutput, QueueInput};

/// Feedback scheduling errors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoopError {
    /// The loop holds no engines.
    Empty,
    /// An engine faulted while being served.
    EngineFault {
        /// Index of the faulting engine in insertion order.
        engine: usize,
        /// The engine's fault.
        info: FaultInfo,
    },
}

impl fmt::Display for LoopError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "feedback loop holds no engines"),
            Self::EngineFault { engine, info } => {
                write!(f, "engine {engine} faulted: {info}")
            }
        }
    }
}

impl core::error::Error for LoopError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::EngineFault { info, .. } => Some(info),
            Self::Empty => None,
        }
    }
}

struct Slot {
    engine: Engine,
    feed: QueueInput,
    emitted: LatchOutput,
}

/// A round-robin feedback chain of engines.
///
/// ## Semantics
///
/// - Engines are served strictly in insertion order, requeued at the back
///   after each served output. This FIFO order is correctness-critical for
///   feedback chains and is never reordered.
/// - Each engine's first inputs are its pre-seeded values (typically one
///   phase setting); every later input is the piped value of the moment it
///   is served.
/// - [`run`](Self::run) ends when every engine has halted and returns the
///   final piped value. Repeated runs of identical chains are
///   deterministic.
#[derive(Default)]
pub struct FeedbackLoop {
    slots: Vec<Slot>,
}

impl fmt::Debug for FeedbackLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeedbackLoop")
            .field("engines", &self.slots.len())
            .finish_non_exhaustive()
    }
}

impl FeedbackLoop {
    /// Creates an empty feedback loop.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a chain by forking `prototype` once per phase value, seeding
    /// each fork's input queue with its phase.
    ///
    /// The prototype itself is left untouched and can seed further chains.
    #[must_use]
    pub fn from_engine(prototype: &Engine, phases: &[i64]) -> Self {
        let mut chain = Self::new();
        for &phase in phases {
            chain.push_engine(prototype.fork(), &[phase]);
        }
        chain
    }

    /// Appends `engine` to the chain, attaching fresh ports and seeding its
    /// input queue with `first_inputs` in order.
    ///
    /// Any ports previously assigned to the engine are replaced; the loop
    /// must own both ends to route values.
    pub fn push_engine(&mut self, mut engine: Engine, first_inputs: &[i64]) {
        let feed = QueueInput::with_values(first_inputs.iter().copied());
        let emitted = LatchOutput::new();
        engine.set_input(feed.clone());
        engine.set_output(emitted.clone());
        self.slots.push(Slot {
            engine,
            feed,
            emitted,
        });
    }

    /// Returns the number of engines in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if the chain holds no engines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Runs the chain to completion, seeding the first engine with
    /// `initial`, and returns the final piped value.
    ///
    /// Engines left halted by a previous run are simply skipped, so a
    /// fresh chain must be built per run.
    pub fn run(&mut self, initial: i64) -> Result<i64, LoopError> {
        if self.slots.is_empty() {
            return Err(LoopError::Empty);
        }

        let mut worklist: VecDeque<usize> = (0..self.slots.len())
            .filter(|&ix| self.slots[ix].engine.status().is_running())
            .collect();
        let mut piped = initial;

        while let Some(ix) = worklist.pop_front() {
            let slot = &mut self.slots[ix];
            slot.feed.push(piped);
            loop {
                let status = slot
                    .engine
                    .step()
                    .map_err(|info| LoopError::EngineFault { engine: ix, info })?;
                if let Some(value) = slot.emitted.take() {
                    piped = value;
                    if status.is_running() {
                        worklist.push_back(ix);
                    }
                    break;
                }
                if !status.is_running() {
                    break;
                }
            }
        }
        Ok(piped)
    }
}
