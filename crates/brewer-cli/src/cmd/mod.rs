pub mod brew;
pub mod commanders;
pub mod config;
pub mod identity;
pub mod mirror;
pub mod score;
pub mod slug;

use anyhow::Context;
use brewer_core::io::parse_card_list;
use clap::Args;
use std::io::Read;
use std::path::PathBuf;

/// Card names from the command line and/or a list file.
#[derive(Args)]
pub struct CardArgs {
    /// Card names (quote names containing spaces)
    pub names: Vec<String>,

    /// Read card names from FILE, one per line; `-` reads stdin
    #[arg(long, short = 'f', value_name = "FILE")]
    pub file: Option<PathBuf>,
}

impl CardArgs {
    /// Positional names first, then the file's, in order.
    pub fn collect(&self) -> anyhow::Result<Vec<String>> {
        let mut names: Vec<String> = self
            .names
            .iter()
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .collect();
        if let Some(path) = &self.file {
            let text = if path.as_os_str() == "-" {
                let mut buf = String::new();
                std::io::stdin()
                    .read_to_string(&mut buf)
                    .context("failed to read card list from stdin")?;
                buf
            } else {
                std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read card list {}", path.display()))?
            };
            names.extend(parse_card_list(&text));
        }
        Ok(names)
    }
}
