// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Adapters for the external collaborators of the job pipeline

pub mod agent;
pub mod image;
pub mod subprocess;
pub mod tools;
pub mod validate;

pub use agent::{AgentAdapter, AgentContext, AgentError, AgentUpdate, CommandAgentAdapter};
pub use image::{
    generate_into, CommandImageAdapter, ImageAdapter, ImageError, ImageRequest, NoopImageAdapter,
};
pub use tools::{JobTools, ToolError, ToolHandler};
pub use validate::{ScriptValidator, ValidateError, Validator};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use agent::{AgentCall, FakeAgentAdapter, FakeOutcome};
#[cfg(any(test, feature = "test-support"))]
pub use image::{test_png, FakeImageAdapter};
#[cfg(any(test, feature = "test-support"))]
pub use validate::FakeValidator;
