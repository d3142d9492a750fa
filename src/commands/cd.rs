// src/commands/cd.rs
use crate::commands::{Command, CommandContext};
use crate::shell::error::ShellError;

pub struct CdCommand;

impl Command for CdCommand {
    fn name(&self) -> &'static str {
        "cd"
    }

    fn execute(&self, ctx: CommandContext) -> Result<String, ShellError> {
        match ctx.args {
            // Bare `cd` resets to the root.
            [] => {
                ctx.session.set_cwd(crate::fs::VfsPath::root());
                Ok(String::new())
            }
            [token] => {
                let resolved = ctx
                    .session
                    .vfs()
                    .resolve_dir(ctx.session.cwd(), token)
                    .map_err(|e| ShellError::command("cd", e))?;
                ctx.session.set_cwd(resolved);
                Ok(String::new())
            }
            _ => Err(ShellError::Usage("cd [dir]")),
        }
    }
}
