//! Application layer - Orchestration and message handling
//!
//! This layer contains:
//! - Errors: error types for every layer
//! - Messaging: message parsing and dispatching
//! - Services: the Bot orchestrator

pub mod errors;
pub mod messaging;
pub mod services;
