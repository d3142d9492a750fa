// src/commands/ls.rs
use crate::commands::{Command, CommandContext};
use crate::shell::error::ShellError;

pub struct LsCommand;

impl Command for LsCommand {
    fn name(&self) -> &'static str {
        "ls"
    }

    fn execute(&self, ctx: CommandContext) -> Result<String, ShellError> {
        let vfs = ctx.session.vfs();
        let target = match ctx.args {
            [] => ctx.session.cwd().clone(),
            // Resolve-list-discard: the current directory is not moved.
            [token] => vfs
                .resolve_dir(ctx.session.cwd(), token)
                .map_err(|e| ShellError::command("ls", e))?,
            _ => return Err(ShellError::Usage("ls [dir]")),
        };

        let names = vfs
            .list_dir(&target)
            .map_err(|e| ShellError::command("ls", e))?;
        let mut out = String::new();
        for name in names {
            out.push_str(&name);
            out.push('\n');
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::zip::{build_archive, ZipEntry};
    use crate::fs::Vfs;
    use crate::shell::session::Session;

    fn session() -> (tempfile::TempDir, Session) {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("fs.zip");
        // "a/" appears before "c.txt" by entry order.
        let entries = vec![
            ZipEntry {
                name: "a/b.txt".to_string(),
                data: b"b".to_vec(),
            },
            ZipEntry {
                name: "c.txt".to_string(),
                data: b"c".to_vec(),
            },
        ];
        std::fs::write(&archive, build_archive(&entries)).unwrap();
        (dir, Session::new(Vfs::load(&archive).unwrap(), "u", "h", None))
    }

    fn run(session: &mut Session, args: &[&str]) -> Result<String, ShellError> {
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        LsCommand.execute(CommandContext {
            args: &args,
            session,
        })
    }

    #[test]
    fn test_ls_root_renders_dirs_with_separator_in_entry_order() {
        let (_dir, mut session) = session();
        assert_eq!(run(&mut session, &[]).unwrap(), "a/\nc.txt\n");
    }

    #[test]
    fn test_ls_argument_does_not_change_cwd() {
        let (_dir, mut session) = session();
        assert_eq!(run(&mut session, &["a"]).unwrap(), "b.txt\n");
        assert!(session.cwd().is_root());
    }

    #[test]
    fn test_ls_missing_target() {
        let (_dir, mut session) = session();
        let err = run(&mut session, &["nope"]).unwrap_err();
        assert!(err.to_string().starts_with("ls: "));
        assert!(session.cwd().is_root());
    }

    #[test]
    fn test_ls_too_many_args() {
        let (_dir, mut session) = session();
        assert!(matches!(
            run(&mut session, &["a", "c.txt"]),
            Err(ShellError::Usage(_))
        ));
    }
}
