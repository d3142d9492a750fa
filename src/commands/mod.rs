// src/commands/mod.rs
pub mod cd;
pub mod history_cmd;
pub mod ls;
pub mod mv;
pub mod registry;
pub mod types;
pub mod uname_cmd;

pub use registry::{create_registry, CommandRegistry};
pub use types::{Command, CommandContext};
