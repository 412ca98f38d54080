//! # Workshop - Shared Crafting Facade
//!
//! The single point of contact for a host that shares crafting state across
//! threads or systems.
//!
//! ```text
//! event layer ──> run_plugin_command() ──> ledger
//! menu        ──> listing() / check()  ──> catalog + ledger + inventory (read)
//! confirm     ──> craft()              ──> lock ─> validate ─> apply ─> unlock
//! ```
//!
//! ## Thread Safety
//!
//! `Workshop` is `Send + Sync` when the inventory adapter is `Send`. The
//! ledger and inventory sit behind one `parking_lot::Mutex` held for the whole
//! of `craft()`, so no other writer can run between the checks and the
//! mutation.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::catalog::{RuleCatalog, RuleId};
use crate::command::{Command, CommandEffect};
use crate::engine::{CraftOutcome, CraftingEngine};
use crate::error::CraftFailure;
use crate::inventory::InventoryAdapter;
use crate::ledger::UnlockLedger;
use crate::listing::{listing, RuleEntry};
use crate::persistence::{LedgerSave, SaveHook};

/// Mutable crafting state guarded as one unit.
#[derive(Debug)]
struct WorkshopState<I> {
    ledger: UnlockLedger,
    inventory: I,
}

/// Catalog, ledger and inventory wired together.
#[derive(Debug)]
pub struct Workshop<I> {
    engine: CraftingEngine,
    namespace: String,
    state: Mutex<WorkshopState<I>>,
}

impl<I: InventoryAdapter> Workshop<I> {
    /// Creates a workshop with an empty ledger.
    #[must_use]
    pub fn new(catalog: Arc<RuleCatalog>, inventory: I, save_hook: Arc<dyn SaveHook>) -> Self {
        Self::with_ledger(catalog, inventory, UnlockLedger::new(save_hook))
    }

    /// Creates a workshop around an existing ledger.
    #[must_use]
    pub fn with_ledger(catalog: Arc<RuleCatalog>, inventory: I, ledger: UnlockLedger) -> Self {
        Self {
            engine: CraftingEngine::new(catalog),
            namespace: crate::command::DEFAULT_NAMESPACE.to_string(),
            state: Mutex::new(WorkshopState { ledger, inventory }),
        }
    }

    /// Sets the plugin name commands must be addressed to.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// The loaded catalog.
    #[must_use]
    pub fn catalog(&self) -> &RuleCatalog {
        self.engine.catalog()
    }

    /// Attempts to craft a rule. Holds the state lock for the whole call.
    ///
    /// # Errors
    ///
    /// See [`CraftingEngine::craft`].
    pub fn craft(&self, rule_id: RuleId) -> CraftOutcome {
        let mut state = self.state.lock();
        let WorkshopState { ledger, inventory } = &mut *state;
        self.engine.craft(ledger, inventory, rule_id)
    }

    /// Whether `craft(rule_id)` would currently succeed.
    ///
    /// # Errors
    ///
    /// Returns the failure `craft` would return.
    pub fn check(&self, rule_id: RuleId) -> Result<(), CraftFailure> {
        let state = self.state.lock();
        self.engine
            .check(&state.ledger, &state.inventory, rule_id)
            .map(|_| ())
    }

    /// Runs a parsed command.
    pub fn execute(&self, command: Command) -> CommandEffect {
        command.apply(&mut self.state.lock().ledger)
    }

    /// Runs a host plugin command such as `("Artisan", ["unlock", "3"])`.
    ///
    /// Commands for other plugins and unknown sub-commands are ignored.
    pub fn run_plugin_command<S: AsRef<str>>(&self, command: &str, args: &[S]) -> CommandEffect {
        match Command::parse_plugin(&self.namespace, command, args) {
            Some(parsed) => self.execute(parsed),
            None => CommandEffect::Ignored,
        }
    }

    /// Whether the rule is unlocked.
    #[must_use]
    pub fn is_unlocked(&self, rule_id: RuleId) -> bool {
        self.state.lock().ledger.is_unlocked(rule_id)
    }

    /// Menu rows in declaration order.
    #[must_use]
    pub fn listing(&self) -> Vec<RuleEntry<'_>> {
        let state = self.state.lock();
        listing(self.engine.catalog(), &state.ledger)
    }

    /// The ledger's persisted section.
    #[must_use]
    pub fn save(&self) -> LedgerSave {
        self.state.lock().ledger.to_save()
    }

    /// Replaces the ledger with a persisted section.
    pub fn restore(&self, save: &LedgerSave) {
        self.state.lock().ledger.restore(save);
    }

    /// Runs `f` with exclusive access to the inventory.
    pub fn with_inventory<R>(&self, f: impl FnOnce(&mut I) -> R) -> R {
        f(&mut self.state.lock().inventory)
    }

    /// Returns the inventory, consuming the workshop.
    #[must_use]
    pub fn into_inventory(self) -> I {
        self.state.into_inner().inventory
    }
}
