// src/commands/registry.rs
use std::collections::HashMap;

use super::cd::CdCommand;
use super::history_cmd::HistoryCommand;
use super::ls::LsCommand;
use super::mv::MvCommand;
use super::types::Command;
use super::uname_cmd::UnameCommand;

pub struct CommandRegistry {
    commands: HashMap<String, Box<dyn Command>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            commands: HashMap::new(),
        }
    }

    pub fn register(&mut self, cmd: Box<dyn Command>) {
        self.commands.insert(cmd.name().to_string(), cmd);
    }

    pub fn get(&self, name: &str) -> Option<&dyn Command> {
        self.commands.get(name).map(|c| c.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// The fixed command set. `exit` is handled by the dispatcher itself
/// because it ends the process, not the line.
pub fn create_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    registry.register(Box::new(CdCommand));
    registry.register(Box::new(LsCommand));
    registry.register(Box::new(MvCommand));
    registry.register(Box::new(HistoryCommand));
    registry.register(Box::new(UnameCommand));
    registry
}
