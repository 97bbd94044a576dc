//! Agent Module
//!
//! Hosts plugins:
//! - Sequential start in registration order
//! - Reverse-order close
//! - Interrupt handling

pub mod lifecycle;

pub use lifecycle::{Agent, ShutdownHandle, AGENT_LOGGER};
