// src/commands/types.rs
use crate::shell::error::ShellError;
use crate::shell::session::Session;

/// Everything a command handler sees: its arguments (first token already
/// stripped) and the session it may read or mutate.
pub struct CommandContext<'a> {
    pub args: &'a [String],
    pub session: &'a mut Session,
}

/// One shell command. Handlers are synchronous: the dispatcher processes a
/// line to completion, archive rewrite included, before reading the next.
/// On success the returned string is written to stdout verbatim; on error
/// the dispatcher renders the kind to the error stream and the session is
/// left exactly as it was.
pub trait Command {
    fn name(&self) -> &'static str;
    fn execute(&self, ctx: CommandContext) -> Result<String, ShellError>;
}
