use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;

use zipsh::config::Config;
use zipsh::fs::Vfs;
use zipsh::shell::{Dispatcher, Outcome, Session};

#[derive(Parser)]
#[command(name = "zipsh")]
#[command(about = "A restricted shell over a zip-backed virtual filesystem")]
#[command(version)]
struct Cli {
    /// Path to the configuration file (TOML or INI)
    config: PathBuf,
}

fn main() {
    // Wrong argument count prints usage and exits 1.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            process::exit(1);
        }
    };

    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    let vfs = match Vfs::load(&config.paths.vfs) {
        Ok(vfs) => vfs,
        Err(e) => {
            eprintln!("cannot load '{}': {}", config.paths.vfs.display(), e);
            process::exit(1);
        }
    };

    let mut session = Session::new(
        vfs,
        config.user.name,
        config.user.computer,
        Some(config.paths.log),
    );
    let dispatcher = Dispatcher::new();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("{}", session.prompt());
        let _ = io::stdout().flush();

        let line = match lines.next() {
            Some(Ok(line)) => line,
            // EOF behaves like `exit` so piped scripts terminate cleanly.
            None => {
                println!();
                println!("{}", session.summary());
                break;
            }
            Some(Err(e)) => {
                eprintln!("read error: {}", e);
                process::exit(1);
            }
        };

        match dispatcher.dispatch(&mut session, &line) {
            Outcome::Quiet => {}
            Outcome::Output(out) => print!("{}", out),
            Outcome::Error(e) => eprintln!("{}", e),
            Outcome::Exit(summary) => {
                println!("{}", summary);
                break;
            }
        }
    }
}
