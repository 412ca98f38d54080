//! # Craft Session
//!
//! Runs a crafting script against a rule catalog and prints each outcome.
//!
//! ```bash
//! craft_session --config demos/crafting.toml --script demos/session.txt
//! RUST_LOG=artisan_crafting=debug craft_session --config crafting.toml --script run.txt --save save.json
//! ```

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use artisan::crafting::CraftingConfig;
use artisan::{parse_script, Session};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "craft_session", about = "Run a crafting script against a rule catalog")]
struct Args {
    /// Crafting configuration (TOML).
    #[arg(long)]
    config: PathBuf,

    /// Script of give/unlock/craft/... lines.
    #[arg(long)]
    script: PathBuf,

    /// Save file for the unlock ledger; overrides `save_path` in the config.
    #[arg(long)]
    save: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = CraftingConfig::load(&args.config)?;
    if let Some(save) = args.save {
        config.save_path = Some(save);
    }

    let source = std::fs::read_to_string(&args.script)
        .with_context(|| format!("reading script {}", args.script.display()))?;
    let steps = parse_script(&source)?;

    let session = Session::open(&config)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    session.run(&steps, &mut out)?;
    out.flush()?;

    if session.persist()? {
        tracing::info!("unlock ledger written");
    }
    Ok(())
}
