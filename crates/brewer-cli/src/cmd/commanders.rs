use crate::cmd::identity::warn_skipped;
use crate::cmd::CardArgs;
use crate::context::{runtime, Context};
use crate::output::{print_diagnostics, print_json, print_table};
use anyhow::Context as _;
use brewer_client::{lookup_pool, resolve};
use brewer_core::candidate::CommanderCandidate;
use brewer_core::color::ColorIdentity;

pub fn run(ctx: &Context, cards: &CardArgs, colors: Option<&str>, json: bool) -> anyhow::Result<()> {
    let source = ctx.card_backend()?;
    let rt = runtime()?;

    let target = match colors {
        Some(letters) => letters
            .parse::<ColorIdentity>()
            .with_context(|| format!("invalid --colors '{letters}'"))?,
        None => {
            let names = cards.collect()?;
            if names.is_empty() {
                anyhow::bail!("pass card names, --file or --colors");
            }
            let pool = rt.block_on(lookup_pool(&source, &names));
            warn_skipped(&pool.skipped);
            pool.identity
        }
    };

    let resolution = rt.block_on(resolve(&source, target));
    print_diagnostics(&resolution.diagnostics);

    if json {
        print_json(&serde_json::json!({
            "identity": target,
            "candidates": resolution.candidates,
            "diagnostics": resolution.diagnostics,
        }))?;
        return Ok(());
    }

    let mut candidates = resolution.into_candidates();
    candidates.sort_by(|a, b| {
        a.rule
            .cmp(&b.rule)
            .then_with(|| popularity_key(a).cmp(&popularity_key(b)))
            .then_with(|| a.display_name.cmp(&b.display_name))
    });

    println!("Identity: {target}  ({} candidates)", candidates.len());
    let rows = candidates
        .iter()
        .map(|c| {
            vec![
                c.rule.to_string(),
                c.identity.to_string(),
                c.popularity.map(|p| p.to_string()).unwrap_or_else(|| "-".into()),
                c.display_name.clone(),
            ]
        })
        .collect();
    print_table(&["RULE", "COLORS", "RANK", "COMMANDER"], rows);
    Ok(())
}

fn popularity_key(c: &CommanderCandidate) -> u32 {
    c.popularity.unwrap_or(u32::MAX)
}
