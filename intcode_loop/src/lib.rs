// Copyright 2026 the Intcode Engine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cooperative feedback scheduling built on `intcode_engine`.
//!
//! This crate wires several engine instances into a feedback chain: each
//! engine's single output value becomes the next engine's input, round and
//! round, until every engine has halted. Engines are served strictly in
//! round-robin order; an engine that halts mid-cycle is removed and never
//! revisited.
//!
//! Concurrency between engines is simulated: exactly one engine
//! instruction executes at a time, and the only cross-engine state is the
//! scalar piped value handed off by copy.

#![no_std]

extern crate alloc;

mod feedback;

pub use feedback::{FeedbackLoop, LoopError};
