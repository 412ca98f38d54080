//! Read-only menu queries for the presentation layer.

use crate::catalog::{CraftRule, RuleCatalog, RuleId};
use crate::ledger::UnlockLedger;

/// One row of the crafting menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuleEntry<'a> {
    /// An unlocked rule; everything may be shown.
    Known(&'a CraftRule),
    /// A locked rule; only a placeholder may be shown.
    Hidden {
        /// Id of the locked rule.
        id: RuleId,
    },
}

impl RuleEntry<'_> {
    /// Rule id of this row.
    #[must_use]
    pub fn id(&self) -> RuleId {
        match self {
            Self::Known(rule) => rule.id,
            Self::Hidden { id } => *id,
        }
    }

    /// Whether the row is unlocked.
    #[must_use]
    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }
}

/// Every catalog rule in declaration order, masked by unlock state.
#[must_use]
pub fn listing<'a>(catalog: &'a RuleCatalog, ledger: &UnlockLedger) -> Vec<RuleEntry<'a>> {
    catalog
        .iter()
        .map(|rule| {
            if ledger.is_unlocked(rule.id) {
                RuleEntry::Known(rule)
            } else {
                RuleEntry::Hidden { id: rule.id }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_masks_locked_rules_in_order() {
        let catalog = RuleCatalog::from_rules(vec![
            CraftRule::new(7, "Sword").with_material(1, 3).with_target(2, 1),
            CraftRule::new(2, "Shield").with_material(1, 4).with_target(3, 1),
        ])
        .unwrap();
        let mut ledger = UnlockLedger::default();
        ledger.set_unlocked(2, true);
        ledger.set_unlocked(99, true);

        let rows = listing(&catalog, &ledger);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], RuleEntry::Hidden { id: 7 });
        assert!(rows[1].is_known());
        assert_eq!(rows[1].id(), 2);
        match rows[1] {
            RuleEntry::Known(rule) => assert_eq!(rule.name, "Shield"),
            RuleEntry::Hidden { .. } => panic!("rule 2 is unlocked"),
        }
    }
}
