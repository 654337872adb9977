//! Core decision logic for the nudge monitor.
//!
//! Everything in this crate is pure: window resolution, content digests,
//! the staleness state machine and payload composition all take their
//! inputs as arguments and perform no IO, so the policy layer is fully
//! testable without a live desktop.

pub mod config;
pub mod digest;
pub mod message;
pub mod resolver;
pub mod staleness;
pub mod types;
