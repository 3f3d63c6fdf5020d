//! External program execution and platform queries.

pub mod command;
pub mod platform;

pub use command::{execute, CommandResult, Invocation};
pub use platform::{is_elevated, is_executable, parse_system_path, resolve_tool_path};
