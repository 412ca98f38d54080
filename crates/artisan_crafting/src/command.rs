//! # Plugin Commands
//!
//! String commands issued by the host's event/scripting layer:
//!
//! | Command        | Effect                          |
//! |----------------|---------------------------------|
//! | `open`         | presentation opens the menu     |
//! | `unlock <id>`  | ledger unlocks the rule         |
//! | `lock <id>`    | ledger locks the rule           |
//! | `reset`        | ledger locks every rule         |
//!
//! The older spellings `add`, `remove` and `complete` are accepted for
//! `unlock`, `lock` and `reset`. Anything else is ignored.

use crate::catalog::RuleId;
use crate::ledger::UnlockLedger;

/// Plugin name hosts address commands to by default.
pub const DEFAULT_NAMESPACE: &str = "Artisan";

/// A parsed crafting command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Open the crafting menu. No engine state changes.
    Open,
    /// Unlock a rule.
    Unlock(RuleId),
    /// Lock a rule.
    Lock(RuleId),
    /// Lock every rule.
    Reset,
}

/// What running a command did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandEffect {
    /// Presentation should push the crafting menu.
    OpenMenu,
    /// The ledger was updated.
    LedgerUpdated,
    /// The command was not for us or not understood.
    Ignored,
}

impl Command {
    /// Parses a sub-command and its arguments, e.g. `["unlock", "3"]`.
    ///
    /// Returns `None` for unknown sub-commands and for a missing or
    /// non-numeric rule id.
    #[must_use]
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Option<Self> {
        let (name, rest) = args.split_first()?;
        let command = match name.as_ref() {
            "open" => Self::Open,
            "unlock" | "add" => Self::Unlock(rule_argument(rest)?),
            "lock" | "remove" => Self::Lock(rule_argument(rest)?),
            "reset" | "complete" => Self::Reset,
            other => {
                tracing::warn!(command = other, "ignoring unknown crafting command");
                return None;
            }
        };
        Some(command)
    }

    /// Parses a whitespace-separated command line, e.g. `"lock 4"`.
    #[must_use]
    pub fn parse_line(line: &str) -> Option<Self> {
        let words: Vec<&str> = line.split_whitespace().collect();
        Self::parse(words.as_slice())
    }

    /// Parses a host plugin command, ignoring any addressed to another plugin.
    #[must_use]
    pub fn parse_plugin<S: AsRef<str>>(namespace: &str, command: &str, args: &[S]) -> Option<Self> {
        if command != namespace {
            return None;
        }
        Self::parse(args)
    }

    /// Applies the command's ledger effect.
    pub fn apply(self, ledger: &mut UnlockLedger) -> CommandEffect {
        match self {
            Self::Open => CommandEffect::OpenMenu,
            Self::Unlock(id) => {
                ledger.set_unlocked(id, true);
                CommandEffect::LedgerUpdated
            }
            Self::Lock(id) => {
                ledger.set_unlocked(id, false);
                CommandEffect::LedgerUpdated
            }
            Self::Reset => {
                ledger.clear();
                CommandEffect::LedgerUpdated
            }
        }
    }
}

fn rule_argument<S: AsRef<str>>(rest: &[S]) -> Option<RuleId> {
    let Some(raw) = rest.first() else {
        tracing::warn!("crafting command is missing its rule id");
        return None;
    };
    match raw.as_ref().trim().parse() {
        Ok(id) => Some(id),
        Err(_) => {
            tracing::warn!(argument = raw.as_ref(), "crafting command has a non-numeric rule id");
            None
        }
    }
}
