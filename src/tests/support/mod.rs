// Shared test support code.
// This module provides common utilities that all test files can use.

pub mod common;
pub mod policy;

pub use common::*;
pub use policy::{Call, Journal, ScriptedPolicy};
