//! # Save-State Integration
//!
//! The unlock ledger lives inside the host's save file. The host hands the
//! ledger a [`SaveHook`] to learn when the section changed, and embeds the
//! [`LedgerSave`] section in whatever blob it persists.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

use crate::catalog::RuleId;
use crate::error::SaveError;

/// Receives a notification whenever persisted crafting state changes.
pub trait SaveHook: Send + Sync + fmt::Debug {
    /// Marks the host save-state as needing a write.
    fn mark_dirty(&self);
}

/// Hook that ignores notifications.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoSave;

impl SaveHook for NoSave {
    fn mark_dirty(&self) {}
}

/// Hook backed by an atomic flag the host polls.
#[derive(Debug, Default)]
pub struct DirtyFlag(AtomicBool);

impl DirtyFlag {
    /// Creates a clean flag.
    #[must_use]
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    /// Whether a change is pending.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Clears the flag, returning whether it was set.
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }
}

impl SaveHook for DirtyFlag {
    fn mark_dirty(&self) {
        self.0.store(true, Ordering::Release);
    }
}

/// Persisted form of the unlock ledger.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSave {
    /// Unlocked rule ids, ascending.
    #[serde(default)]
    pub unlocked: Vec<RuleId>,
}

impl LedgerSave {
    /// Encodes the section as JSON.
    #[must_use]
    pub fn to_json(&self) -> String {
        // A struct holding a Vec<u32> always serializes.
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Decodes a section written by [`LedgerSave::to_json`].
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid section.
    pub fn from_json(source: &str) -> Result<Self, SaveError> {
        Ok(serde_json::from_str(source)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dirty_flag_take() {
        let flag = DirtyFlag::new();
        assert!(!flag.is_dirty());
        flag.mark_dirty();
        assert!(flag.is_dirty());
        assert!(flag.take());
        assert!(!flag.take());
    }

    #[test]
    fn test_section_json_shape() {
        let save = LedgerSave {
            unlocked: vec![1, 4, 9],
        };
        assert_eq!(save.to_json(), r#"{"unlocked":[1,4,9]}"#);
        assert_eq!(LedgerSave::from_json(r#"{"unlocked":[1,4,9]}"#).unwrap(), save);
    }

    #[test]
    fn test_missing_section_field_is_empty() {
        assert_eq!(LedgerSave::from_json("{}").unwrap(), LedgerSave::default());
    }

    #[test]
    fn test_malformed_section() {
        assert!(LedgerSave::from_json(r#"{"unlocked":["a"]}"#).is_err());
    }
}
