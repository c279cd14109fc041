// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Behaviour tests for the `lifeline` binary.

mod common;
mod emergency;
mod queue;
mod servers;
mod status;
