//! # Rule Catalog
//!
//! Immutable, load-once table of crafting rules.
//!
//! Rules are defined in an external data file, either TOML:
//!
//! ```toml
//! [[rules]]
//! id = 1
//! name = "Potion"
//! materials = { "5" = 2 }
//! targetItems = { "9" = 1 }
//! description = "Two herbs make a potion."
//! ```
//!
//! or JSON (a bare array, or an object holding a `rules` array). JSON records
//! also accept the legacy keys `rid` and `desc`.
//!
//! Loading validates every record. Any malformed record, duplicate id,
//! repeated item key or non-positive quantity fails the whole load. Iteration
//! order is declaration order.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;

use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::error::{CatalogError, CatalogResult};
use crate::inventory::ItemId;

/// Unique identifier for a crafting rule.
pub type RuleId = u32;

/// A single crafting rule: a material cost and an item payout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CraftRule {
    /// Unique rule identifier.
    pub id: RuleId,
    /// Display label.
    pub name: String,
    /// Items consumed, by item id.
    pub materials: BTreeMap<ItemId, u32>,
    /// Items produced, by item id.
    pub target_items: BTreeMap<ItemId, u32>,
    /// Display description.
    pub description: String,
}

impl CraftRule {
    /// Creates a rule with no materials and no payout.
    #[must_use]
    pub fn new(id: RuleId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            materials: BTreeMap::new(),
            target_items: BTreeMap::new(),
            description: String::new(),
        }
    }

    /// Adds a material cost.
    #[must_use]
    pub fn with_material(mut self, item_id: ItemId, quantity: u32) -> Self {
        self.materials.insert(item_id, quantity);
        self
    }

    /// Adds a target item payout.
    #[must_use]
    pub fn with_target(mut self, item_id: ItemId, quantity: u32) -> Self {
        self.target_items.insert(item_id, quantity);
        self
    }

    fn validate(&self) -> CatalogResult<()> {
        if self.id == 0 {
            return Err(CatalogError::InvalidRuleId(0));
        }
        for (&item_id, &quantity) in self.materials.iter().chain(&self.target_items) {
            if item_id == 0 {
                return Err(CatalogError::InvalidItemKey {
                    rule: self.id,
                    key: "0".to_string(),
                });
            }
            if quantity == 0 {
                return Err(CatalogError::InvalidQuantity {
                    rule: self.id,
                    item_id,
                    quantity: 0,
                });
            }
        }
        Ok(())
    }
}

/// One record as written in the data file.
#[derive(Debug, Deserialize)]
struct RuleRecord {
    #[serde(alias = "rid")]
    id: i64,
    name: String,
    #[serde(deserialize_with = "item_entries")]
    materials: Vec<(String, i64)>,
    #[serde(rename = "targetItems", alias = "target_items", deserialize_with = "item_entries")]
    target_items: Vec<(String, i64)>,
    #[serde(alias = "desc")]
    description: String,
}

/// Top-level table form of a catalog file.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(alias = "data")]
    rules: Vec<RuleRecord>,
}

/// Reads an item map as written, keeping repeated keys so they can be
/// rejected instead of silently overwritten.
fn item_entries<'de, D>(deserializer: D) -> Result<Vec<(String, i64)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct EntriesVisitor;

    impl<'de> Visitor<'de> for EntriesVisitor {
        type Value = Vec<(String, i64)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of item id to quantity")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut entries = Vec::new();
            while let Some(entry) = map.next_entry::<String, i64>()? {
                entries.push(entry);
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(EntriesVisitor)
}

/// JSON catalog document: a bare record array, or an object whose `rules`
/// (or `data`) member holds one. `None` when the object has neither.
struct JsonCatalog(Option<Vec<RuleRecord>>);

impl<'de> Deserialize<'de> for JsonCatalog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DocumentVisitor;

        impl<'de> Visitor<'de> for DocumentVisitor {
            type Value = JsonCatalog;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an array of rules or an object with a `rules` array")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut records = Vec::new();
                while let Some(record) = seq.next_element::<RuleRecord>()? {
                    records.push(record);
                }
                Ok(JsonCatalog(Some(records)))
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut rules = None;
                let mut data = None;
                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "rules" if rules.is_none() => rules = Some(map.next_value()?),
                        "data" if data.is_none() => data = Some(map.next_value()?),
                        "rules" | "data" => {
                            return Err(de::Error::custom(format!("duplicate field `{key}`")));
                        }
                        _ => {
                            map.next_value::<IgnoredAny>()?;
                        }
                    }
                }
                Ok(JsonCatalog(rules.or(data)))
            }
        }

        deserializer.deserialize_any(DocumentVisitor)
    }
}

impl RuleRecord {
    fn into_rule(self) -> CatalogResult<CraftRule> {
        let id = RuleId::try_from(self.id)
            .ok()
            .filter(|&id| id > 0)
            .ok_or(CatalogError::InvalidRuleId(self.id))?;

        Ok(CraftRule {
            id,
            name: self.name,
            materials: parse_item_map(id, self.materials)?,
            target_items: parse_item_map(id, self.target_items)?,
            description: self.description,
        })
    }
}

fn parse_item_map(rule: RuleId, raw: Vec<(String, i64)>) -> CatalogResult<BTreeMap<ItemId, u32>> {
    let mut items = BTreeMap::new();
    for (key, quantity) in raw {
        let item_id = key
            .trim()
            .parse::<ItemId>()
            .ok()
            .filter(|&id| id > 0)
            .ok_or_else(|| CatalogError::InvalidItemKey {
                rule,
                key: key.clone(),
            })?;
        let quantity = u32::try_from(quantity)
            .ok()
            .filter(|&q| q > 0)
            .ok_or(CatalogError::InvalidQuantity {
                rule,
                item_id,
                quantity,
            })?;
        if items.insert(item_id, quantity).is_some() {
            return Err(CatalogError::DuplicateItemKey { rule, item_id });
        }
    }
    Ok(items)
}

/// The loaded rule table.
///
/// Never mutated after construction.
#[derive(Clone, Debug, Default)]
pub struct RuleCatalog {
    /// Rules in declaration order.
    rules: Vec<CraftRule>,
    /// Rule id to position in `rules`.
    index: HashMap<RuleId, usize>,
}

impl RuleCatalog {
    /// Builds a catalog from already-constructed rules.
    ///
    /// # Errors
    ///
    /// Returns an error on a zero id, zero quantity, zero item id, or a
    /// duplicate rule id.
    pub fn from_rules(rules: Vec<CraftRule>) -> CatalogResult<Self> {
        let mut index = HashMap::with_capacity(rules.len());
        for (position, rule) in rules.iter().enumerate() {
            rule.validate()?;
            if index.insert(rule.id, position).is_some() {
                return Err(CatalogError::DuplicateRuleId(rule.id));
            }
        }
        Ok(Self { rules, index })
    }

    /// Parses a TOML catalog with a `[[rules]]` array.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed or any record is invalid.
    pub fn from_toml_str(source: &str) -> CatalogResult<Self> {
        let file: CatalogFile = toml::from_str(source)?;
        Self::from_records(file.rules)
    }

    /// Parses a JSON catalog: a bare array of records, or an object holding
    /// a `rules` (or `data`) array.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed or any record is invalid.
    pub fn from_json_str(source: &str) -> CatalogResult<Self> {
        let JsonCatalog(records) = serde_json::from_str(source)?;
        Self::from_records(records.ok_or(CatalogError::MissingRules)?)
    }

    /// Reads a catalog file, picking the format from its extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, has an unknown
    /// extension, or fails validation.
    pub fn load(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let read = || {
            std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
                path: path.to_path_buf(),
                source,
            })
        };

        let catalog = match extension.as_deref() {
            Some("toml") => Self::from_toml_str(&read()?)?,
            Some("json") => Self::from_json_str(&read()?)?,
            _ => return Err(CatalogError::UnsupportedFormat(path.to_path_buf())),
        };

        tracing::info!(
            path = %path.display(),
            rules = catalog.len(),
            "loaded crafting catalog"
        );
        Ok(catalog)
    }

    fn from_records(records: Vec<RuleRecord>) -> CatalogResult<Self> {
        let rules = records
            .into_iter()
            .map(RuleRecord::into_rule)
            .collect::<CatalogResult<Vec<_>>>()?;
        Self::from_rules(rules)
    }

    /// Looks up a rule by id.
    #[must_use]
    pub fn find(&self, id: RuleId) -> Option<&CraftRule> {
        self.index.get(&id).map(|&position| &self.rules[position])
    }

    /// Iterates rules in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &CraftRule> {
        self.rules.iter()
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if the catalog has no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
