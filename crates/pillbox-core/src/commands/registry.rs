// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Command registry: the immutable set of known action commands.
//!
//! The registry is constructed once (usually via [`CommandRegistry::with_builtins`])
//! and then passed explicitly to the tokenizer and the picker.  It is never
//! mutated after construction, so it can be shared behind an `Arc` without
//! locking.

use std::sync::Arc;

use super::{builtin, Command};

/// Ordered collection of known commands.
///
/// Commands are stored as `Arc<Command>` so candidate lists produced by the
/// picker can share them without cloning the strings.
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    commands: Vec<Arc<Command>>,
}

impl CommandRegistry {
    /// Create an empty registry.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a registry pre-populated with the built-in commands.
    pub fn with_builtins() -> Self {
        Self::from_commands(builtin::builtin_commands())
    }

    /// Create a registry from `commands`, keeping their order.
    ///
    /// Names are not checked for uniqueness.  When two commands share a name
    /// (case-insensitively) [`by_name`](Self::by_name) returns the one that
    /// was declared first.
    pub fn from_commands(commands: impl IntoIterator<Item = Command>) -> Self {
        Self {
            commands: commands.into_iter().map(Arc::new).collect(),
        }
    }

    /// All commands in declaration order.
    pub fn all(&self) -> &[Arc<Command>] {
        &self.commands
    }

    /// Look up a command by exact id.
    pub fn by_id(&self, id: &str) -> Option<Arc<Command>> {
        self.commands.iter().find(|cmd| cmd.id() == id).cloned()
    }

    /// Look up a command by name, ignoring case.  No substring matching.
    ///
    /// The first declared command wins when names collide.
    pub fn by_name(&self, name: &str) -> Option<Arc<Command>> {
        let wanted = name.to_lowercase();
        self.commands
            .iter()
            .find(|cmd| cmd.name().to_lowercase() == wanted)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmd(id: &str, name: &str) -> Command {
        Command::new(id, name, format!("{name} description"), format!("run {id}"))
    }

    #[test]
    fn with_builtins_registers_compact() {
        let reg = CommandRegistry::with_builtins();
        let compact = reg.by_id("compact").expect("compact must be registered");
        assert_eq!(compact.name(), "Compact");
        assert_eq!(compact.expansion(), "Please compact this conversation");
    }

    #[test]
    fn all_keeps_declaration_order() {
        let reg = CommandRegistry::from_commands(vec![cmd("b", "Beta"), cmd("a", "Alpha")]);
        let ids: Vec<&str> = reg.all().iter().map(|c| c.id()).collect();
        assert_eq!(ids, ["b", "a"]);
    }

    #[test]
    fn by_name_ignores_case_but_not_substrings() {
        let reg = CommandRegistry::from_commands(vec![cmd("compact", "Compact")]);
        assert_eq!(reg.by_name("compact").unwrap().id(), "compact");
        assert_eq!(reg.by_name("COMPACT").unwrap().id(), "compact");
        assert!(reg.by_name("Comp").is_none());
        assert!(reg.by_name("Compact ").is_none());
    }

    #[test]
    fn by_name_first_declared_wins_on_collision() {
        let reg = CommandRegistry::from_commands(vec![
            cmd("first", "Deploy"),
            cmd("second", "deploy"),
        ]);
        assert_eq!(reg.by_name("DEPLOY").unwrap().id(), "first");
    }

    #[test]
    fn missing_lookups_return_none() {
        let reg = CommandRegistry::empty();
        assert!(reg.is_empty());
        assert!(reg.by_id("compact").is_none());
        assert!(reg.by_name("Compact").is_none());
    }
}
