// src/commands/mv.rs
use crate::commands::{Command, CommandContext};
use crate::shell::error::ShellError;

pub struct MvCommand;

impl Command for MvCommand {
    fn name(&self) -> &'static str {
        "mv"
    }

    fn execute(&self, ctx: CommandContext) -> Result<String, ShellError> {
        let [source, dest] = ctx.args else {
            return Err(ShellError::Usage("mv <source> <dest>"));
        };
        let cwd = ctx.session.cwd().clone();
        ctx.session
            .vfs_mut()
            .mv(&cwd, source, dest)
            .map_err(|e| ShellError::command("mv", e))?;
        Ok(String::new())
    }
}
