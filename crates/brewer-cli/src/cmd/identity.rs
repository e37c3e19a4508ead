use crate::cmd::CardArgs;
use crate::context::{runtime, Context};
use crate::output::print_json;
use brewer_client::lookup_pool;
use brewer_client::pipeline::{Pool, SkippedCard};

pub fn run(ctx: &Context, cards: &CardArgs, json: bool) -> anyhow::Result<()> {
    let names = cards.collect()?;
    if names.is_empty() {
        anyhow::bail!("no card names given: pass names or --file");
    }
    let source = ctx.card_backend()?;
    let pool = runtime()?.block_on(lookup_pool(&source, &names));

    if json {
        print_json(&serde_json::json!({
            "identity": pool.identity,
            "found": pool.names(),
            "skipped": pool.skipped,
        }))?;
    } else {
        print_pool(&pool);
    }
    Ok(())
}

fn print_pool(pool: &Pool) {
    for card in &pool.cards {
        println!("  {:<5} {}", card.color_identity.to_string(), card.name);
    }
    print_skipped(&pool.skipped);
    println!("Identity: {}", pool.identity);
}

pub fn print_skipped(skipped: &[SkippedCard]) {
    for s in skipped {
        println!("  skipped {} ({})", s.name, s.reason);
    }
}

/// Skipped cards as warnings on stderr, for commands whose stdout carries
/// other output.
pub fn warn_skipped(skipped: &[SkippedCard]) {
    for s in skipped {
        eprintln!("warning: skipped {} ({})", s.name, s.reason);
    }
}
