//! Domain layer - Core types of the command framework
//!
//! This layer contains:
//! - Entities: users, messages, permissions, descriptors, registries
//! - Traits: Command, Plugin and the platform client capability set

pub mod entities;
pub mod traits;
