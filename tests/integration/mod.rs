//! Integration tests for llm-relay
//!
//! These tests drive the public API with scripted in-memory providers.

pub mod concurrency_tests;
pub mod config_tests;
pub mod router_tests;
