//! Message handling - Turning addressed chat messages into command runs

pub mod dispatcher;
pub mod parser;

pub use dispatcher::{Dispatch, IgnoreReason, MessageDispatcher};
pub use parser::MessageParser;
