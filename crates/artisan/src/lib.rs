//! # ARTISAN
//!
//! Headless host for the crafting engine.
//!
//! ```text
//! crafting.toml ──> CraftingConfig ──> RuleCatalog
//!                                          │
//! save.json ─────> LedgerSave ──────> Workshop<PartyInventory> <── script lines
//!                                          │
//!                                          └──> report lines + save.json
//! ```
//!
//! ## Modules
//!
//! - `script`: Parsing of session script lines
//! - `session`: Running a script against a workshop

pub mod script;
pub mod session;

// Re-export the engine
pub use artisan_crafting as crafting;

pub use script::{parse_script, ScriptError, Step};
pub use session::Session;
