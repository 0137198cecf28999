// Copyright 2026 the Intcode Engine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmark crate for the intcode workspace.
//!
//! All benchmarks live in `benches/`; this library target is intentionally
//! empty.
