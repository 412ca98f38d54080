//! Session script format.
//!
//! One step per line; blank lines and `#` comments are skipped.
//!
//! ```text
//! give 5 2      # seed inventory: item 5, quantity 2
//! unlock 1      # plugin commands: open / unlock / lock / reset (+ aliases)
//! check 1
//! craft 1
//! list
//! show
//! ```

use artisan_crafting::{Command, ItemId, RuleId};
use thiserror::Error;

/// A single script step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// Adds items to the party inventory.
    Give {
        /// Item to add.
        item_id: ItemId,
        /// Quantity to add.
        quantity: u32,
    },
    /// A plugin command.
    Command(Command),
    /// Attempts a craft.
    Craft(RuleId),
    /// Dry-runs a craft.
    Check(RuleId),
    /// Prints the menu rows.
    List,
    /// Prints the inventory.
    Show,
    /// A line nothing understood; ignored like an unknown plugin command.
    Ignored(String),
}

/// A script line with a known keyword but unusable arguments.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: {message}")]
pub struct ScriptError {
    /// 1-based line number.
    pub line: usize,
    /// What was wrong.
    pub message: String,
}

/// Parses a whole script.
///
/// # Errors
///
/// Returns the first line whose arguments cannot be parsed.
pub fn parse_script(source: &str) -> Result<Vec<Step>, ScriptError> {
    source
        .lines()
        .enumerate()
        .filter_map(|(index, raw)| {
            let text = raw.split('#').next().unwrap_or("").trim();
            (!text.is_empty()).then(|| parse_line(text).map_err(|message| ScriptError {
                line: index + 1,
                message,
            }))
        })
        .collect()
}

fn parse_line(text: &str) -> Result<Step, String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    match words.as_slice() {
        ["give", item, quantity] => Ok(Step::Give {
            item_id: number(item)?,
            quantity: number(quantity)?,
        }),
        ["give", ..] => Err("usage: give <item> <quantity>".to_string()),
        ["craft", rule] => Ok(Step::Craft(number(rule)?)),
        ["check", rule] => Ok(Step::Check(number(rule)?)),
        ["craft" | "check", ..] => Err(format!("usage: {} <rule>", words[0])),
        ["list"] => Ok(Step::List),
        ["show"] => Ok(Step::Show),
        _ => Ok(Command::parse(words.as_slice()).map_or_else(|| Step::Ignored(text.to_string()), Step::Command)),
    }
}

fn number<T: std::str::FromStr>(word: &str) -> Result<T, String> {
    word.parse().map_err(|_| format!("{word:?} is not a valid number"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_script() {
        let script = "\
# seed
give 5 2
unlock 1   # trailing comment

check 1
craft 1
list
show
";
        let steps = parse_script(script).unwrap();
        assert_eq!(
            steps,
            vec![
                Step::Give { item_id: 5, quantity: 2 },
                Step::Command(Command::Unlock(1)),
                Step::Check(1),
                Step::Craft(1),
                Step::List,
                Step::Show,
            ]
        );
    }

    #[test]
    fn test_unknown_lines_are_ignored_not_errors() {
        let steps = parse_script("dance 3\nunlock x").unwrap();
        assert_eq!(
            steps,
            vec![
                Step::Ignored("dance 3".to_string()),
                Step::Ignored("unlock x".to_string()),
            ]
        );
    }

    #[test]
    fn test_bad_arguments_report_line() {
        let error = parse_script("give 5 2\ncraft potion").unwrap_err();
        assert_eq!(error.line, 2);

        let error = parse_script("give 5").unwrap_err();
        assert_eq!(error.line, 1);
        assert_eq!(error.to_string(), "line 1: usage: give <item> <quantity>");
    }
}
