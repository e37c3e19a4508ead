mod cmd;
mod context;
mod output;

use clap::{Parser, Subcommand};
use cmd::{config::ConfigSubcommand, mirror::MirrorSubcommand, CardArgs};
use context::Context;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "brewer",
    about = "Find and rank Commander candidates for the cards you want to play",
    version,
    propagate_version = true
)]
struct Cli {
    /// Config file (default: ~/.config/brewer/config.yaml)
    #[arg(long, global = true, env = "BREWER_CONFIG")]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    /// More logging: -v info, -vv debug (RUST_LOG also honoured)
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use the local card mirror at PATH instead of Scryfall
    #[arg(long, global = true, env = "BREWER_MIRROR", value_name = "PATH")]
    mirror: Option<PathBuf>,

    /// Override scryfall.base_url
    #[arg(long, global = true, env = "BREWER_SCRYFALL_URL", hide = true)]
    scryfall_url: Option<String>,

    /// Override edhrec.base_url
    #[arg(long, global = true, env = "BREWER_EDHREC_URL", hide = true)]
    edhrec_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up cards and print their combined color identity
    Identity {
        #[command(flatten)]
        cards: CardArgs,
    },

    /// List commanders and commander pairs that cover a color identity
    Commanders {
        #[command(flatten)]
        cards: CardArgs,

        /// Target identity as letters (e.g. WUB) instead of looking up cards
        #[arg(long, value_name = "LETTERS")]
        colors: Option<String>,
    },

    /// Score one commander (or "A + B" pair) against a card pool
    Score {
        /// Commander display name
        commander: String,

        #[command(flatten)]
        cards: CardArgs,
    },

    /// Look up the pool, resolve candidates, score and rank them
    Brew {
        #[command(flatten)]
        cards: CardArgs,

        /// How many commanders to show (default: output.top)
        #[arg(long, short = 'n')]
        top: Option<usize>,

        /// Keep candidates that scored zero
        #[arg(long)]
        include_zero: bool,
    },

    /// Print the EDHREC slug and page for a commander name
    Slug { name: String },

    /// Manage the local card mirror
    Mirror {
        #[command(subcommand)]
        subcommand: MirrorSubcommand,
    },

    /// Inspect and validate the config file
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };

    // RUST_LOG, when set, replaces the -v level entirely.
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::default().add_directive(default_level.into()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = Context::load(
        cli.config.as_deref(),
        cli.mirror,
        cli.scryfall_url,
        cli.edhrec_url,
    )
    .and_then(|ctx| match cli.command {
        Commands::Identity { cards } => cmd::identity::run(&ctx, &cards, cli.json),
        Commands::Commanders { cards, colors } => {
            cmd::commanders::run(&ctx, &cards, colors.as_deref(), cli.json)
        }
        Commands::Score { commander, cards } => cmd::score::run(&ctx, &commander, &cards, cli.json),
        Commands::Brew {
            cards,
            top,
            include_zero,
        } => cmd::brew::run(&ctx, &cards, top, include_zero, cli.json),
        Commands::Slug { name } => cmd::slug::run(&name, cli.json),
        Commands::Mirror { subcommand } => cmd::mirror::run(&ctx, subcommand, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&ctx, subcommand, cli.json),
    });

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
