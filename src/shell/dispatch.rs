//! Command dispatcher
//!
//! Splits an input line on whitespace and routes the first token. The
//! logging policy is recognition-gated: a recognized command is appended
//! to the session log before its handler runs, so a failing `cd` still
//! shows up in `history`; an unknown token is reported and never logged;
//! an empty line is a no-op.

use crate::commands::{create_registry, CommandContext, CommandRegistry};

use super::error::ShellError;
use super::session::Session;

/// What one dispatched line produced. The REPL decides which stream each
/// variant goes to; the dispatcher itself never prints.
#[derive(Debug)]
pub enum Outcome {
    /// Empty line, or a command with no output.
    Quiet,
    /// Successful command output for stdout.
    Output(String),
    /// Recoverable error for the error stream; session state unchanged.
    Error(ShellError),
    /// `exit`: the session summary, then terminate with code 0.
    Exit(String),
}

pub struct Dispatcher {
    registry: CommandRegistry,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            registry: create_registry(),
        }
    }

    pub fn dispatch(&self, session: &mut Session, line: &str) -> Outcome {
        let tokens: Vec<String> = line.split_whitespace().map(str::to_string).collect();
        let Some(name) = tokens.first() else {
            return Outcome::Quiet;
        };

        if name == "exit" {
            session.record(line);
            return Outcome::Exit(session.summary());
        }

        let Some(command) = self.registry.get(name) else {
            return Outcome::Error(ShellError::UnknownCommand(name.clone()));
        };

        // Recognition, not success, gates logging.
        session.record(line);
        match command.execute(CommandContext {
            args: &tokens[1..],
            session,
        }) {
            Ok(out) if out.is_empty() => Outcome::Quiet,
            Ok(out) => Outcome::Output(out),
            Err(e) => Outcome::Error(e),
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::zip::{build_archive, ZipEntry};
    use crate::fs::Vfs;

    fn setup() -> (tempfile::TempDir, Session, Dispatcher) {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("fs.zip");
        let entries = vec![
            ZipEntry {
                name: "docs/guide.txt".to_string(),
                data: b"g".to_vec(),
            },
            ZipEntry {
                name: "notes.txt".to_string(),
                data: b"n".to_vec(),
            },
        ];
        std::fs::write(&archive, build_archive(&entries)).unwrap();
        let session = Session::new(Vfs::load(&archive).unwrap(), "u", "h", None);
        (dir, session, Dispatcher::new())
    }

    #[test]
    fn test_empty_line_is_noop_and_unlogged() {
        let (_dir, mut session, dispatcher) = setup();
        assert!(matches!(
            dispatcher.dispatch(&mut session, "   "),
            Outcome::Quiet
        ));
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_unknown_command_is_error_and_unlogged() {
        let (_dir, mut session, dispatcher) = setup();
        let outcome = dispatcher.dispatch(&mut session, "foobar now");
        match outcome {
            Outcome::Error(ShellError::UnknownCommand(name)) => assert_eq!(name, "foobar"),
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_failing_recognized_command_is_logged() {
        let (_dir, mut session, dispatcher) = setup();
        let outcome = dispatcher.dispatch(&mut session, "cd doesnotexist");
        assert!(matches!(outcome, Outcome::Error(ShellError::Command { .. })));
        assert_eq!(session.history(), ["cd doesnotexist"]);
        assert!(session.cwd().is_root());
    }

    #[test]
    fn test_history_reflects_logging_policy() {
        let (_dir, mut session, dispatcher) = setup();
        dispatcher.dispatch(&mut session, "foobar");
        dispatcher.dispatch(&mut session, "cd doesnotexist");
        dispatcher.dispatch(&mut session, "mv missing.txt dest.txt");
        dispatcher.dispatch(&mut session, "ls");

        let outcome = dispatcher.dispatch(&mut session, "history");
        let Outcome::Output(out) = outcome else {
            panic!("history should produce output");
        };
        assert!(!out.contains("foobar"));
        // The history line itself was recorded before its handler ran.
        assert_eq!(out, "cd doesnotexist\nmv missing.txt dest.txt\nls\nhistory\n");
        // The failed mv left the tree alone.
        assert_eq!(session.vfs().list_files().len(), 2);
    }

    #[test]
    fn test_ls_output_goes_to_stdout_variant() {
        let (_dir, mut session, dispatcher) = setup();
        let Outcome::Output(out) = dispatcher.dispatch(&mut session, "ls") else {
            panic!("ls should produce output");
        };
        assert_eq!(out, "docs/\nnotes.txt\n");
    }

    #[test]
    fn test_cd_then_relative_mv() {
        let (_dir, mut session, dispatcher) = setup();
        assert!(matches!(
            dispatcher.dispatch(&mut session, "cd docs"),
            Outcome::Quiet
        ));
        assert!(matches!(
            dispatcher.dispatch(&mut session, "mv guide.txt /notes2.txt"),
            Outcome::Quiet
        ));
        let files = session.vfs().list_files();
        assert!(files.contains(&"notes2.txt".to_string()));
        assert!(!files.contains(&"docs/guide.txt".to_string()));
    }

    #[test]
    fn test_exit_returns_summary() {
        let (_dir, mut session, dispatcher) = setup();
        let outcome = dispatcher.dispatch(&mut session, "exit");
        match outcome {
            Outcome::Exit(summary) => assert!(summary.contains("seconds")),
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(session.history(), ["exit"]);
    }
}
