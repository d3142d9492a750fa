// src/commands/history_cmd.rs
use crate::commands::{Command, CommandContext};
use crate::shell::error::ShellError;

pub struct HistoryCommand;

impl Command for HistoryCommand {
    fn name(&self) -> &'static str {
        "history"
    }

    /// Prints the session log verbatim, oldest first. By the time this
    /// handler runs the dispatcher has already recorded the `history` line
    /// itself, so it appears as the last entry.
    fn execute(&self, ctx: CommandContext) -> Result<String, ShellError> {
        let mut out = String::new();
        for line in ctx.session.history() {
            out.push_str(line);
            out.push('\n');
        }
        Ok(out)
    }
}
