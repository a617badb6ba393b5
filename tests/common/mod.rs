//! Common test utilities and helpers
//!
//! Shared between the integration test binaries; not every binary uses
//! every helper.
#![allow(dead_code)]

pub mod git_fixtures;
pub mod scripted_runner;
