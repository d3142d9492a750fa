// src/commands/uname_cmd.rs
use crate::commands::{Command, CommandContext};
use crate::shell::error::ShellError;
use crate::system::OsIdentity;

pub struct UnameCommand;

impl Command for UnameCommand {
    fn name(&self) -> &'static str {
        "uname"
    }

    fn execute(&self, _ctx: CommandContext) -> Result<String, ShellError> {
        Ok(format!("{}\n", OsIdentity::collect().render()))
    }
}
