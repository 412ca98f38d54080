//! # Unlock Ledger
//!
//! The set of rule ids the player may craft. Part of the persisted game
//! state: every mutating call notifies the injected [`SaveHook`].
//!
//! The ledger is agnostic to catalog contents. Unlocking an id that no rule
//! uses is accepted and stored; stale ids are never pruned.

use std::collections::HashSet;
use std::sync::Arc;

use crate::catalog::RuleId;
use crate::persistence::{LedgerSave, NoSave, SaveHook};

/// Persisted set of unlocked rule ids.
#[derive(Debug)]
pub struct UnlockLedger {
    unlocked: HashSet<RuleId>,
    hook: Arc<dyn SaveHook>,
}

impl UnlockLedger {
    /// Creates an empty ledger reporting changes to `hook`.
    #[must_use]
    pub fn new(hook: Arc<dyn SaveHook>) -> Self {
        Self {
            unlocked: HashSet::new(),
            hook,
        }
    }

    /// Rebuilds a ledger from its persisted section.
    ///
    /// Restoring does not mark the save-state dirty.
    #[must_use]
    pub fn from_save(save: &LedgerSave, hook: Arc<dyn SaveHook>) -> Self {
        Self {
            unlocked: save.unlocked.iter().copied().collect(),
            hook,
        }
    }

    /// Persisted section, ids ascending.
    #[must_use]
    pub fn to_save(&self) -> LedgerSave {
        let mut unlocked: Vec<RuleId> = self.unlocked.iter().copied().collect();
        unlocked.sort_unstable();
        LedgerSave { unlocked }
    }

    /// Replaces the contents with a persisted section (save-file load).
    pub fn restore(&mut self, save: &LedgerSave) {
        self.unlocked = save.unlocked.iter().copied().collect();
    }

    /// Locks every rule.
    pub fn clear(&mut self) {
        self.unlocked.clear();
        self.hook.mark_dirty();
    }

    /// Unlocks or locks a rule. Both directions are idempotent.
    pub fn set_unlocked(&mut self, id: RuleId, unlocked: bool) {
        let changed = if unlocked {
            self.unlocked.insert(id)
        } else {
            self.unlocked.remove(&id)
        };
        tracing::debug!(rule = id, unlocked, changed, "ledger updated");
        self.hook.mark_dirty();
    }

    /// Whether the rule may be crafted.
    #[must_use]
    pub fn is_unlocked(&self, id: RuleId) -> bool {
        self.unlocked.contains(&id)
    }

    /// Number of unlocked ids, stale ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.unlocked.len()
    }

    /// Returns true if nothing is unlocked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.unlocked.is_empty()
    }
}

impl Default for UnlockLedger {
    fn default() -> Self {
        Self::new(Arc::new(NoSave))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::DirtyFlag;

    #[test]
    fn test_unlock_is_idempotent() {
        let mut ledger = UnlockLedger::default();
        ledger.set_unlocked(4, true);
        ledger.set_unlocked(4, true);
        assert!(ledger.is_unlocked(4));
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.to_save().unlocked, vec![4]);
    }

    #[test]
    fn test_lock_absent_is_noop() {
        let mut ledger = UnlockLedger::default();
        ledger.set_unlocked(2, false);
        assert!(ledger.is_empty());

        ledger.set_unlocked(2, true);
        ledger.set_unlocked(2, false);
        assert!(!ledger.is_unlocked(2));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut ledger = UnlockLedger::default();
        ledger.set_unlocked(1, true);
        ledger.set_unlocked(7, true);
        ledger.clear();
        ledger.clear();
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_mutations_mark_dirty() {
        let flag = Arc::new(DirtyFlag::new());
        let mut ledger = UnlockLedger::new(flag.clone());

        ledger.set_unlocked(1, true);
        assert!(flag.take());
        ledger.set_unlocked(1, false);
        assert!(flag.take());
        ledger.clear();
        assert!(flag.take());
        assert!(!ledger.is_unlocked(1));
    }

    #[test]
    fn test_save_round_trip_is_sorted_and_quiet() {
        let flag = Arc::new(DirtyFlag::new());
        let mut ledger = UnlockLedger::default();
        for id in [9, 2, 5] {
            ledger.set_unlocked(id, true);
        }
        let save = ledger.to_save();
        assert_eq!(save.unlocked, vec![2, 5, 9]);

        let restored = UnlockLedger::from_save(&save, flag.clone());
        assert!(restored.is_unlocked(5));
        assert!(!flag.is_dirty());
    }

    #[test]
    fn test_restore_drops_duplicates_and_keeps_stale_ids() {
        let mut ledger = UnlockLedger::default();
        ledger.set_unlocked(1, true);
        ledger.restore(&LedgerSave {
            unlocked: vec![3, 3, 404],
        });
        assert!(!ledger.is_unlocked(1));
        assert!(ledger.is_unlocked(404));
        assert_eq!(ledger.len(), 2);
    }
}
