// Copyright 2026 the Intcode Engine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Conformance test crate for the intcode workspace.
//!
//! All tests live in `tests/`; this library target is intentionally empty.
