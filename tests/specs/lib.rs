// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Behaviour tests for the `lifeline` binary.
//!
//! The tests under `cli/` drive the compiled binary; they run as the `specs`
//! test target of the `lifeline` crate so the binary is built first.
