//! Application services - Orchestration

pub mod bot;

pub use bot::{Bot, BotBuilder, WeakBot};
