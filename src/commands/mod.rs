//! Built-in commands, available in the module table as `builtin:<name>`

pub mod echo;
pub mod fetch_user;

pub use echo::EchoCommand;
pub use fetch_user::FetchUserCommand;
