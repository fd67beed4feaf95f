// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! forge daemon library
//!
//! Configuration, logging and lifecycle for the `forged` binary.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod adapters;
pub mod env;
pub mod lifecycle;
pub mod logging;

pub use lifecycle::{shutdown_signal, startup, Config, DaemonEngine, DaemonState, LifecycleError};
