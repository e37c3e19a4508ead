use crate::context::Context;
use crate::output::print_json;
use anyhow::Context as _;
use brewer_core::config::MirrorConfig;
use brewer_core::mirror::Mirror;
use clap::Subcommand;
use std::fs::File;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum MirrorSubcommand {
    /// Load a Scryfall "Oracle Cards" bulk JSON file into the mirror
    Import {
        /// Path to the bulk file (https://scryfall.com/docs/api/bulk-data)
        file: PathBuf,

        /// Also switch card lookup to the mirror in the config file
        #[arg(long)]
        enable: bool,
    },

    /// Show mirror location, size and import time
    Info,

    /// Resolve a card name against the mirror (exact, then fuzzy)
    Lookup { name: String },
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(ctx: &Context, subcmd: MirrorSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        MirrorSubcommand::Import { file, enable } => import(ctx, &file, enable, json),
        MirrorSubcommand::Info => info(ctx, json),
        MirrorSubcommand::Lookup { name } => lookup(ctx, &name, json),
    }
}

fn open(ctx: &Context) -> anyhow::Result<(Mirror, PathBuf)> {
    let path = ctx.mirror_path()?;
    let mirror =
        Mirror::open(&path).with_context(|| format!("failed to open mirror {}", path.display()))?;
    Ok((mirror, path))
}

// ---------------------------------------------------------------------------
// import
// ---------------------------------------------------------------------------

fn import(ctx: &Context, file: &std::path::Path, enable: bool, json: bool) -> anyhow::Result<()> {
    let (mut mirror, path) = open(ctx)?;
    let reader =
        File::open(file).with_context(|| format!("failed to open {}", file.display()))?;
    let count = mirror
        .import_json(reader)
        .with_context(|| format!("failed to import {}", file.display()))?;

    if enable {
        let mut config = ctx.config.clone();
        config.mirror = Some(MirrorConfig {
            path: path.clone(),
            enabled: true,
        });
        config
            .save(&ctx.config_path)
            .with_context(|| format!("failed to write {}", ctx.config_path.display()))?;
    }

    if json {
        print_json(&serde_json::json!({
            "path": path,
            "cards": count,
            "enabled": enable,
        }))?;
    } else {
        println!("Imported {count} cards into {}", path.display());
        if enable {
            println!("Mirror enabled in {}", ctx.config_path.display());
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// info
// ---------------------------------------------------------------------------

fn info(ctx: &Context, json: bool) -> anyhow::Result<()> {
    let (mirror, path) = open(ctx)?;
    let info = mirror.info()?;
    let enabled = ctx.config.active_mirror().is_some();

    if json {
        print_json(&serde_json::json!({
            "path": path,
            "enabled": enabled,
            "cards": info.cards,
            "imported_at": info.imported_at,
        }))?;
        return Ok(());
    }

    println!("Path:     {}", path.display());
    println!("Enabled:  {}", if enabled { "yes" } else { "no" });
    println!("Cards:    {}", info.cards);
    match info.imported_at {
        Some(t) => println!("Imported: {}", t.format("%Y-%m-%d %H:%M UTC")),
        None => println!("Imported: never"),
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// lookup
// ---------------------------------------------------------------------------

fn lookup(ctx: &Context, name: &str, json: bool) -> anyhow::Result<()> {
    let (mut mirror, _) = open(ctx)?;
    let Some(card) = mirror.lookup(name)? else {
        anyhow::bail!("no card matching '{name}'");
    };

    if json {
        return print_json(&card);
    }
    println!("{}", card.name);
    println!("  {}  {}", card.color_identity, card.type_line);
    println!(
        "  commander: {}{}",
        if card.is_commander_legal() { "legal" } else { "not legal" },
        if card.can_be_commander() { ", can be your commander" } else { "" }
    );
    if let Some(rank) = card.edhrec_rank {
        println!("  edhrec rank: {rank}");
    }
    Ok(())
}
