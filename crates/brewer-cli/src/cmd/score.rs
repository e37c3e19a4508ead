use crate::cmd::identity::warn_skipped;
use crate::cmd::CardArgs;
use crate::context::{runtime, Context};
use crate::output::print_json;
use anyhow::Context as _;
use brewer_client::{lookup_pool, score_name};
use brewer_core::slug::{edhrec_slug, edhrec_url};

pub fn run(ctx: &Context, commander: &str, cards: &CardArgs, json: bool) -> anyhow::Result<()> {
    let names = cards.collect()?;
    let source = ctx.card_backend()?;
    let stats = ctx.stats()?;
    let rt = runtime()?;

    let pool = rt.block_on(lookup_pool(&source, &names));
    warn_skipped(&pool.skipped);
    let synergy = rt
        .block_on(score_name(&stats, commander, &pool.cards, &ctx.config.scoring))
        .with_context(|| format!("failed to score {commander}"))?;

    if json {
        print_json(&serde_json::json!({
            "commander": commander,
            "slug": edhrec_slug(commander),
            "pool": pool.names(),
            "synergy": synergy,
        }))?;
        return Ok(());
    }

    println!("{commander}: {}/10 (raw {})", synergy.score, synergy.raw);
    if synergy.matched.is_empty() {
        println!("No pool cards appear on {}", edhrec_url(commander));
    } else {
        println!("Makes good use of: {}", synergy.matched.join(", "));
    }
    Ok(())
}
