//! # Crafting Engine
//!
//! **Check everything, then mutate.**
//!
//! A craft attempt runs in two phases:
//!
//! 1. **Validate** - unlock state, rule lookup, material affordability and
//!    payout capacity are all checked against the current counts. Any failure
//!    returns a [`CraftFailure`] with nothing touched.
//! 2. **Apply** - every target item is paid out, then every material is
//!    deducted.
//!
//! Because no mutation happens until the whole rule is known to succeed,
//! there is nothing to roll back.
//!
//! ## Same item as material and target
//!
//! The capacity check uses the count before the transaction plus the payout,
//! ignoring the pending deduction. Deduction runs strictly after payout.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use artisan_crafting::{CraftRule, CraftingEngine, InventoryAdapter, PartyInventory,
//!     RuleCatalog, UnlockLedger};
//!
//! let rule = CraftRule::new(1, "Potion").with_material(5, 2).with_target(9, 1);
//! let engine = CraftingEngine::new(Arc::new(RuleCatalog::from_rules(vec![rule]).unwrap()));
//!
//! let mut ledger = UnlockLedger::default();
//! ledger.set_unlocked(1, true);
//!
//! let mut inventory = PartyInventory::new(100, 99);
//! inventory.set_count(5, 2);
//!
//! engine.craft(&ledger, &mut inventory, 1).unwrap();
//! assert_eq!(inventory.count(5), 0);
//! assert_eq!(inventory.count(9), 1);
//! ```

use std::sync::Arc;

use crate::catalog::{CraftRule, RuleCatalog, RuleId};
use crate::error::CraftFailure;
use crate::inventory::{InventoryAdapter, ItemId};
use crate::ledger::UnlockLedger;

/// Result of a craft attempt.
pub type CraftOutcome = Result<CraftReceipt, CraftFailure>;

/// What a successful craft changed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CraftReceipt {
    /// The rule that was applied.
    pub rule_id: RuleId,
    /// Materials deducted, ascending by item.
    pub consumed: Vec<(ItemId, u32)>,
    /// Target items paid out, ascending by item.
    pub produced: Vec<(ItemId, u32)>,
}

/// Applies catalog rules to an inventory.
///
/// Holds only the immutable catalog. The ledger and inventory are passed to
/// each call; `&mut` access to the inventory for the whole call is what keeps
/// a transaction exclusive.
#[derive(Clone, Debug)]
pub struct CraftingEngine {
    catalog: Arc<RuleCatalog>,
}

impl CraftingEngine {
    /// Creates an engine over a loaded catalog.
    #[must_use]
    pub fn new(catalog: Arc<RuleCatalog>) -> Self {
        Self { catalog }
    }

    /// The catalog this engine crafts from.
    #[must_use]
    pub fn catalog(&self) -> &RuleCatalog {
        &self.catalog
    }

    /// Runs every check `craft` would, without mutating anything.
    ///
    /// # Errors
    ///
    /// Returns the failure `craft` would return.
    pub fn check<I>(&self, ledger: &UnlockLedger, inventory: &I, rule_id: RuleId) -> Result<&CraftRule, CraftFailure>
    where
        I: InventoryAdapter + ?Sized,
    {
        let rule = self.resolve(ledger, rule_id)?;
        check_materials(rule, inventory)?;
        check_capacity(rule, inventory)?;
        Ok(rule)
    }

    /// Attempts to apply a rule.
    ///
    /// On success the payout has been added and the materials removed. On
    /// failure the inventory is exactly as it was.
    ///
    /// # Errors
    ///
    /// - `NotUnlocked` if the ledger does not hold `rule_id`; the inventory is
    ///   not even read.
    /// - `RuleNotFound` if the id is unlocked but not in the catalog.
    /// - `InvalidItemId` if the rule references an item the inventory rejects.
    /// - `InsufficientMaterials` if any material is short.
    /// - `CapacityExceeded` if any payout would pass the per-item cap.
    pub fn craft<I>(&self, ledger: &UnlockLedger, inventory: &mut I, rule_id: RuleId) -> CraftOutcome
    where
        I: InventoryAdapter + ?Sized,
    {
        let rule = match self.check(ledger, inventory, rule_id) {
            Ok(rule) => rule,
            Err(failure) => {
                log_failure(rule_id, &failure);
                return Err(failure);
            }
        };

        // Payout first, then deduction.
        for (&item_id, &quantity) in &rule.target_items {
            let current = inventory.count(item_id);
            inventory.set_count(item_id, current + quantity);
        }
        for (&item_id, &quantity) in &rule.materials {
            let current = inventory.count(item_id);
            inventory.set_count(item_id, current.saturating_sub(quantity));
        }

        tracing::debug!(rule = rule_id, name = %rule.name, "craft applied");

        Ok(CraftReceipt {
            rule_id,
            consumed: rule.materials.iter().map(|(&id, &qty)| (id, qty)).collect(),
            produced: rule.target_items.iter().map(|(&id, &qty)| (id, qty)).collect(),
        })
    }

    fn resolve(&self, ledger: &UnlockLedger, rule_id: RuleId) -> Result<&CraftRule, CraftFailure> {
        if !ledger.is_unlocked(rule_id) {
            return Err(CraftFailure::NotUnlocked(rule_id));
        }
        self.catalog
            .find(rule_id)
            .ok_or(CraftFailure::RuleNotFound(rule_id))
    }
}

/// Every material must be known and held in full.
fn check_materials<I>(rule: &CraftRule, inventory: &I) -> Result<(), CraftFailure>
where
    I: InventoryAdapter + ?Sized,
{
    for (&item_id, &required) in &rule.materials {
        if !inventory.is_known_item(item_id) {
            return Err(CraftFailure::InvalidItemId { item_id });
        }
        let available = inventory.count(item_id);
        if available < required {
            return Err(CraftFailure::InsufficientMaterials {
                item_id,
                required,
                available,
            });
        }
    }
    Ok(())
}

/// Every target must be known and fit under the cap after payout.
fn check_capacity<I>(rule: &CraftRule, inventory: &I) -> Result<(), CraftFailure>
where
    I: InventoryAdapter + ?Sized,
{
    let capacity = inventory.capacity();
    for (&item_id, &payout) in &rule.target_items {
        if !inventory.is_known_item(item_id) {
            return Err(CraftFailure::InvalidItemId { item_id });
        }
        let resulting = u64::from(inventory.count(item_id)) + u64::from(payout);
        if resulting > u64::from(capacity) {
            return Err(CraftFailure::CapacityExceeded {
                item_id,
                resulting,
                capacity,
            });
        }
    }
    Ok(())
}

fn log_failure(rule_id: RuleId, failure: &CraftFailure) {
    match failure {
        CraftFailure::RuleNotFound(_) => {
            tracing::warn!(rule = rule_id, "unlocked rule missing from catalog");
        }
        CraftFailure::InvalidItemId { item_id } => {
            tracing::error!(rule = rule_id, item = *item_id, "rule references unknown item");
        }
        other => tracing::debug!(rule = rule_id, reason = %other, "craft rejected"),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::inventory::PartyInventory;

    const HERB: ItemId = 5;
    const POTION: ItemId = 9;
    const WATER: ItemId = 6;
    const ELIXIR: ItemId = 10;

    fn engine(rules: Vec<CraftRule>) -> CraftingEngine {
        CraftingEngine::new(Arc::new(RuleCatalog::from_rules(rules).unwrap()))
    }

    fn unlocked(ids: &[RuleId]) -> UnlockLedger {
        let mut ledger = UnlockLedger::default();
        for &id in ids {
            ledger.set_unlocked(id, true);
        }
        ledger
    }

    fn potion_rule() -> CraftRule {
        CraftRule::new(1, "Potion")
            .with_material(HERB, 2)
            .with_target(POTION, 1)
    }

    #[test]
    fn test_craft_success() {
        let engine = engine(vec![potion_rule()]);
        let ledger = unlocked(&[1]);
        let mut inv = PartyInventory::new(100, 99);
        inv.set_count(HERB, 2);

        let receipt = engine.craft(&ledger, &mut inv, 1).unwrap();

        assert_eq!(inv.count(HERB), 0);
        assert_eq!(inv.count(POTION), 1);
        assert_eq!(receipt.consumed, vec![(HERB, 2)]);
        assert_eq!(receipt.produced, vec![(POTION, 1)]);
    }

    #[test]
    fn test_insufficient_materials_leaves_inventory() {
        let engine = engine(vec![potion_rule()]);
        let ledger = unlocked(&[1]);
        let mut inv = PartyInventory::new(100, 99);
        inv.set_count(HERB, 1);

        let result = engine.craft(&ledger, &mut inv, 1);

        assert_eq!(
            result,
            Err(CraftFailure::InsufficientMaterials {
                item_id: HERB,
                required: 2,
                available: 1,
            })
        );
        assert_eq!(inv.snapshot(), BTreeMap::from([(HERB, 1)]));
    }

    #[test]
    fn test_not_unlocked_dominates() {
        // Unknown items and missing materials would both fail too.
        let rule = CraftRule::new(1, "Broken")
            .with_material(5000, 3)
            .with_target(POTION, 1);
        let engine = engine(vec![rule]);
        let ledger = UnlockLedger::default();
        let mut inv = PartyInventory::new(100, 99);

        assert_eq!(
            engine.craft(&ledger, &mut inv, 1),
            Err(CraftFailure::NotUnlocked(1))
        );
        assert_eq!(
            engine.craft(&ledger, &mut inv, 77),
            Err(CraftFailure::NotUnlocked(77))
        );
    }

    #[test]
    fn test_unlocked_rule_missing_from_catalog() {
        let engine = engine(vec![potion_rule()]);
        let ledger = unlocked(&[42]);
        let mut inv = PartyInventory::new(100, 99);

        assert_eq!(
            engine.craft(&ledger, &mut inv, 42),
            Err(CraftFailure::RuleNotFound(42))
        );
    }

    #[test]
    fn test_unknown_material_item() {
        let rule = CraftRule::new(1, "Odd").with_material(500, 1).with_target(POTION, 1);
        let engine = engine(vec![rule]);
        let ledger = unlocked(&[1]);
        let mut inv = PartyInventory::new(100, 99);

        assert_eq!(
            engine.craft(&ledger, &mut inv, 1),
            Err(CraftFailure::InvalidItemId { item_id: 500 })
        );
    }

    #[test]
    fn test_unknown_target_item_after_affordable_materials() {
        let rule = CraftRule::new(1, "Odd").with_material(HERB, 1).with_target(500, 1);
        let engine = engine(vec![rule]);
        let ledger = unlocked(&[1]);
        let mut inv = PartyInventory::new(100, 99);
        inv.set_count(HERB, 1);

        assert_eq!(
            engine.craft(&ledger, &mut inv, 1),
            Err(CraftFailure::InvalidItemId { item_id: 500 })
        );
        assert_eq!(inv.count(HERB), 1);
    }

    #[test]
    fn test_capacity_failure_is_all_or_nothing() {
        let rule = CraftRule::new(1, "Brew")
            .with_material(HERB, 1)
            .with_material(WATER, 1)
            .with_target(POTION, 1)
            .with_target(ELIXIR, 5);
        let engine = engine(vec![rule]);
        let ledger = unlocked(&[1]);
        let mut inv = PartyInventory::new(100, 99);
        inv.set_count(HERB, 3);
        inv.set_count(WATER, 3);
        inv.set_count(ELIXIR, 95);
        let before = inv.snapshot();

        let result = engine.craft(&ledger, &mut inv, 1);

        assert_eq!(
            result,
            Err(CraftFailure::CapacityExceeded {
                item_id: ELIXIR,
                resulting: 100,
                capacity: 99,
            })
        );
        assert_eq!(inv.snapshot(), before);
    }

    #[test]
    fn test_payout_exactly_at_capacity() {
        let engine = engine(vec![potion_rule()]);
        let ledger = unlocked(&[1]);
        let mut inv = PartyInventory::new(100, 99);
        inv.set_count(HERB, 2);
        inv.set_count(POTION, 98);

        assert!(engine.craft(&ledger, &mut inv, 1).is_ok());
        assert_eq!(inv.count(POTION), 99);
    }

    #[test]
    fn test_empty_materials_always_affordable() {
        let rule = CraftRule::new(2, "Gift").with_target(POTION, 3);
        let engine = engine(vec![rule]);
        let ledger = unlocked(&[2]);
        let mut inv = PartyInventory::new(100, 99);

        assert!(engine.craft(&ledger, &mut inv, 2).is_ok());
        assert_eq!(inv.count(POTION), 3);
    }

    #[test]
    fn test_same_item_checks_capacity_before_deduction() {
        // Net change is -1, but the payout is checked against the full count.
        let rule = CraftRule::new(3, "Refine")
            .with_material(HERB, 2)
            .with_target(HERB, 1);
        let engine = engine(vec![rule]);
        let ledger = unlocked(&[3]);

        let mut inv = PartyInventory::new(100, 99);
        inv.set_count(HERB, 99);
        assert!(matches!(
            engine.craft(&ledger, &mut inv, 3),
            Err(CraftFailure::CapacityExceeded { item_id: HERB, .. })
        ));
        assert_eq!(inv.count(HERB), 99);

        inv.set_count(HERB, 10);
        assert!(engine.craft(&ledger, &mut inv, 3).is_ok());
        assert_eq!(inv.count(HERB), 9);
    }

    #[test]
    fn test_check_does_not_mutate() {
        let engine = engine(vec![potion_rule()]);
        let ledger = unlocked(&[1]);
        let mut inv = PartyInventory::new(100, 99);
        inv.set_count(HERB, 2);

        let rule = engine.check(&ledger, &inv, 1).unwrap();
        assert_eq!(rule.id, 1);
        assert_eq!(inv.count(HERB), 2);
        assert_eq!(inv.count(POTION), 0);
    }

    #[test]
    fn test_repeated_crafts_until_exhausted() {
        let engine = engine(vec![potion_rule()]);
        let ledger = unlocked(&[1]);
        let mut inv = PartyInventory::new(100, 99);
        inv.set_count(HERB, 7);

        let mut crafted = 0;
        while engine.craft(&ledger, &mut inv, 1).is_ok() {
            crafted += 1;
        }

        assert_eq!(crafted, 3);
        assert_eq!(inv.count(HERB), 1);
        assert_eq!(inv.count(POTION), 3);
    }
}
