// Copyright 2026 the Intcode Engine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `intcode_engine`: a register-less integer VM with pluggable I/O ports
//! and resumable stepping.
//!
//! Programs are flat sequences of `i64` words. The engine decodes one
//! instruction word at a time (opcode in the low two decimal digits, one
//! addressing-mode digit per operand above them), pulls input through an
//! [`port::InputPort`], pushes output through an [`port::OutputPort`], and
//! can be stepped one instruction at a time so several engines can be
//! scheduled cooperatively.
//!
//! ## Example
//!
//! ```
//! use intcode_engine::engine::Engine;
//! use intcode_engine::port::{BufferOutput, QueueInput};
//!
//! // Outputs 1 iff the single input equals 8.
//! let input = QueueInput::with_values([8]);
//! let output = BufferOutput::new();
//! let mut engine = Engine::from_source("3,9,8,9,10,9,4,9,99,-1,8")?
//!     .with_io(input, output.clone());
//! engine.run()?;
//! assert_eq!(output.values(), vec![1]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![no_std]

extern crate alloc;

pub mod decode;
pub mod disasm;
pub mod engine;
pub mod memory;
pub mod opcode;
pub mod parse;
pub mod port;
pub mod trace;
