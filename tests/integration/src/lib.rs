//! Integration test utilities for the moderation bot
//!
//! This crate provides a recording gateway, configuration fixtures, and a
//! helper that brings a bot to the Running state without any live
//! platform connection.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
