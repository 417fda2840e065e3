//! Infrastructure layer - External concerns
//!
//! This layer contains:
//! - Config: Configuration loading
//! - Modules: Resolving config entries into commands and plugins
//! - Adapters: Platform client implementations

pub mod config;
pub mod modules;
pub mod adapters;
