//! Runs a parsed script against a workshop and reports each outcome.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use artisan_crafting::{
    CommandEffect, CraftingConfig, DirtyFlag, InventoryAdapter, LedgerSave, PartyInventory,
    RuleCatalog, RuleEntry, UnlockLedger, Workshop,
};

use crate::script::Step;

/// A workshop plus the persistence wiring of one play session.
#[derive(Debug)]
pub struct Session {
    workshop: Workshop<PartyInventory>,
    dirty: Arc<DirtyFlag>,
    save_path: Option<PathBuf>,
}

impl Session {
    /// Loads the catalog named by `config` and restores the ledger from the
    /// save file when one exists.
    ///
    /// # Errors
    ///
    /// Fails if the catalog does not load or the save file is unreadable.
    pub fn open(config: &CraftingConfig) -> anyhow::Result<Self> {
        let catalog = RuleCatalog::load(&config.catalog_path)
            .with_context(|| format!("loading catalog {}", config.catalog_path.display()))?;

        let dirty = Arc::new(DirtyFlag::new());
        let ledger = match config.save_path.as_deref() {
            Some(path) if path.exists() => {
                let save = read_save(path)?;
                tracing::info!(path = %path.display(), unlocked = save.unlocked.len(), "restored ledger");
                UnlockLedger::from_save(&save, dirty.clone())
            }
            _ => UnlockLedger::new(dirty.clone()),
        };

        let inventory = PartyInventory::new(config.item_count, config.max_stack);
        let workshop = Workshop::with_ledger(Arc::new(catalog), inventory, ledger)
            .with_namespace(config.command_namespace.clone());

        Ok(Self {
            workshop,
            dirty,
            save_path: config.save_path.clone(),
        })
    }

    /// The underlying workshop.
    #[must_use]
    pub fn workshop(&self) -> &Workshop<PartyInventory> {
        &self.workshop
    }

    /// Runs every step, writing one report line per step to `out`.
    ///
    /// # Errors
    ///
    /// Fails only if `out` cannot be written.
    pub fn run(&self, steps: &[Step], out: &mut impl Write) -> std::io::Result<()> {
        for step in steps {
            self.run_step(step, out)?;
        }
        Ok(())
    }

    fn run_step(&self, step: &Step, out: &mut impl Write) -> std::io::Result<()> {
        match step {
            Step::Give { item_id, quantity } => {
                let added = self.workshop.with_inventory(|inv| inv.gain(*item_id, *quantity));
                writeln!(out, "give {item_id} x{quantity}: +{added}")
            }
            Step::Command(command) => {
                if self.workshop.execute(*command) == CommandEffect::OpenMenu {
                    writeln!(out, "open: menu requested")
                } else {
                    writeln!(out, "{command:?}: ledger updated")
                }
            }
            Step::Craft(rule_id) => match self.workshop.craft(*rule_id) {
                Ok(receipt) => writeln!(
                    out,
                    "craft {rule_id}: ok, spent {:?}, gained {:?}",
                    receipt.consumed, receipt.produced
                ),
                Err(reason) if reason.is_integrity_fault() => {
                    writeln!(out, "craft {rule_id}: DATA MISMATCH, {reason}")
                }
                Err(reason) => writeln!(out, "craft {rule_id}: failed, {reason}"),
            },
            Step::Check(rule_id) => match self.workshop.check(*rule_id) {
                Ok(()) => writeln!(out, "check {rule_id}: craftable"),
                Err(reason) => writeln!(out, "check {rule_id}: {reason}"),
            },
            Step::List => {
                writeln!(out, "rules: {}", self.workshop.catalog().len())?;
                for entry in self.workshop.listing() {
                    match entry {
                        RuleEntry::Known(rule) => writeln!(
                            out,
                            "  [{}] {} {:?} -> {:?}",
                            rule.id, rule.name, rule.materials, rule.target_items
                        )?,
                        RuleEntry::Hidden { id } => writeln!(out, "  [{id}] ???")?,
                    }
                }
                Ok(())
            }
            Step::Show => {
                let counts = self.workshop.with_inventory(|inv| inv.snapshot());
                writeln!(out, "inventory: {counts:?}")
            }
            Step::Ignored(line) => {
                tracing::warn!(line = line.as_str(), "ignoring unrecognized script line");
                writeln!(out, "{line}: ignored")
            }
        }
    }

    /// Writes the ledger to the save path if it changed since the last write.
    ///
    /// Returns whether a file was written.
    ///
    /// # Errors
    ///
    /// Fails if the save file cannot be written.
    pub fn persist(&self) -> anyhow::Result<bool> {
        let Some(path) = self.save_path.as_deref() else {
            return Ok(false);
        };
        if !self.dirty.take() {
            return Ok(false);
        }
        std::fs::write(path, self.workshop.save().to_json())
            .with_context(|| format!("writing save file {}", path.display()))?;
        tracing::info!(path = %path.display(), "ledger saved");
        Ok(true)
    }

    /// Count held of an item.
    #[must_use]
    pub fn count(&self, item_id: u32) -> u32 {
        self.workshop.with_inventory(|inv| inv.count(item_id))
    }
}

fn read_save(path: &Path) -> anyhow::Result<LedgerSave> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading save file {}", path.display()))?;
    LedgerSave::from_json(&text).with_context(|| format!("decoding save file {}", path.display()))
}
