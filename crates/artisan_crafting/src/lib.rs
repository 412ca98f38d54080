//! # ARTISAN Crafting
//!
//! Rule-based crafting for role-playing game hosts.
//!
//! ## Design Principles
//!
//! 1. **Load once** - the rule catalog is validated at startup and never mutated
//! 2. **Set semantics** - the unlock ledger holds each rule id at most once
//! 3. **Check before mutate** - a craft validates the whole rule before touching any count
//! 4. **Typed outcomes** - every craft-time condition is a [`CraftFailure`] value, never a panic
//!
//! ## Collaborators
//!
//! The host supplies an [`InventoryAdapter`] over its item store and a
//! [`SaveHook`] that learns when the ledger changes. Rendering and input stay
//! on the host side; they read [`listing`] and call [`Workshop::craft`].
//!
//! ## Example
//!
//! ```rust,ignore
//! let catalog = Arc::new(RuleCatalog::load("data/craft_rules.toml")?);
//! let workshop = Workshop::new(catalog, party_inventory, Arc::new(DirtyFlag::new()));
//!
//! workshop.run_plugin_command("Artisan", &["unlock", "3"]);
//! match workshop.craft(3) {
//!     Ok(receipt) => show_gain(&receipt.produced),
//!     Err(reason) => show_rejection(&reason),
//! }
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod catalog;
pub mod command;
pub mod config;
pub mod engine;
pub mod error;
pub mod inventory;
pub mod ledger;
pub mod listing;
pub mod persistence;
pub mod workshop;

pub use catalog::{CraftRule, RuleCatalog, RuleId};
pub use command::{Command, CommandEffect, DEFAULT_NAMESPACE};
pub use config::CraftingConfig;
pub use engine::{CraftOutcome, CraftReceipt, CraftingEngine};
pub use error::{CatalogError, CatalogResult, ConfigError, CraftFailure, SaveError};
pub use inventory::{InventoryAdapter, ItemId, PartyInventory, DEFAULT_MAX_STACK};
pub use ledger::UnlockLedger;
pub use listing::{listing, RuleEntry};
pub use persistence::{DirtyFlag, LedgerSave, NoSave, SaveHook};
pub use workshop::Workshop;
