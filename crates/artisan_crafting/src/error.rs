//! # Crafting Error Types
//!
//! Load-time errors are fatal and returned as `Err`. Craft-time conditions are
//! ordinary outcomes and live in [`CraftFailure`].

use std::path::PathBuf;

use thiserror::Error;

use crate::catalog::RuleId;
use crate::inventory::ItemId;

/// Errors raised while loading the rule catalog.
///
/// Any of these aborts the load; no partial catalog is ever exposed.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("failed to read catalog {path:?}: {source}")]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file extension does not name a supported format.
    #[error("unsupported catalog format: {0:?} (expected .toml or .json)")]
    UnsupportedFormat(PathBuf),

    /// TOML syntax error or missing required field.
    #[error("malformed TOML catalog: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON syntax error or missing required field.
    #[error("malformed JSON catalog: {0}")]
    Json(#[from] serde_json::Error),

    /// A JSON object catalog without a `rules` (or `data`) array.
    #[error("JSON catalog object has no `rules` array")]
    MissingRules,

    /// Rule id is zero, negative, or too large.
    #[error("invalid rule id {0}: must be a positive 32-bit integer")]
    InvalidRuleId(i64),

    /// Two rules share the same id.
    #[error("duplicate rule id {0}")]
    DuplicateRuleId(RuleId),

    /// An item key that does not parse as a positive item id.
    #[error("rule {rule}: invalid item id {key:?}")]
    InvalidItemKey {
        /// Rule containing the key.
        rule: RuleId,
        /// The raw key text.
        key: String,
    },

    /// The same item id appears twice in one mapping (e.g. `"5"` and `"05"`).
    #[error("rule {rule}: item {item_id} listed more than once")]
    DuplicateItemKey {
        /// Rule containing the key.
        rule: RuleId,
        /// The repeated item.
        item_id: ItemId,
    },

    /// A material or payout quantity outside `1..=u32::MAX`.
    #[error("rule {rule}: quantity {quantity} for item {item_id} must be a positive integer")]
    InvalidQuantity {
        /// Rule containing the entry.
        rule: RuleId,
        /// Item the quantity belongs to.
        item_id: ItemId,
        /// The rejected quantity.
        quantity: i64,
    },
}

/// Result type for catalog loading.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors raised while loading the crafting configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config {path:?}: {source}")]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// TOML syntax error or wrong field type.
    #[error("malformed config: {0}")]
    Toml(#[from] toml::de::Error),

    /// A value that parses but cannot be used.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Errors raised while decoding the persisted ledger section.
#[derive(Error, Debug)]
pub enum SaveError {
    /// The save section is not valid JSON or has the wrong shape.
    #[error("malformed save data: {0}")]
    Json(#[from] serde_json::Error),
}

/// Why a craft attempt did not go through.
///
/// Every variant leaves the inventory untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CraftFailure {
    /// The rule has not been unlocked for the player.
    #[error("rule {0} is not unlocked")]
    NotUnlocked(RuleId),

    /// The rule id is unlocked but absent from the catalog.
    #[error("rule {0} is not in the catalog")]
    RuleNotFound(RuleId),

    /// A rule references an item the inventory does not know.
    #[error("item id {item_id} is invalid")]
    InvalidItemId {
        /// The unknown item.
        item_id: ItemId,
    },

    /// At least one material is short.
    #[error("insufficient materials: need {required} of item {item_id}, have {available}")]
    InsufficientMaterials {
        /// The first short material.
        item_id: ItemId,
        /// Quantity the rule consumes.
        required: u32,
        /// Quantity held.
        available: u32,
    },

    /// At least one payout would exceed the per-item capacity.
    #[error("capacity exceeded: item {item_id} would reach {resulting}, limit {capacity}")]
    CapacityExceeded {
        /// The first overflowing target item.
        item_id: ItemId,
        /// Count after the payout.
        resulting: u64,
        /// Per-item capacity.
        capacity: u32,
    },
}

impl CraftFailure {
    /// Returns true for conditions that signal a catalog/host data mismatch
    /// rather than a normal player-facing rejection.
    #[must_use]
    pub const fn is_integrity_fault(&self) -> bool {
        matches!(self, Self::RuleNotFound(_) | Self::InvalidItemId { .. })
    }
}
