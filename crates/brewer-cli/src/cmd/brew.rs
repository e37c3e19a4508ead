use crate::cmd::identity::print_skipped;
use crate::cmd::CardArgs;
use crate::context::{runtime, Context};
use crate::output::{print_diagnostics, print_json, print_table};
use brewer_client::{brew, BrewOptions};
use brewer_core::slug::edhrec_url;

pub fn run(
    ctx: &Context,
    cards: &CardArgs,
    top: Option<usize>,
    include_zero: bool,
    json: bool,
) -> anyhow::Result<()> {
    let names = cards.collect()?;
    if names.is_empty() {
        anyhow::bail!("no card names given: pass names or --file");
    }

    let opts = BrewOptions {
        weights: ctx.config.scoring.clone(),
        top: top.unwrap_or(ctx.config.output.top),
        include_zero: include_zero || ctx.config.output.include_zero,
    };
    let source = ctx.card_backend()?;
    let stats = ctx.stats()?;
    let report = runtime()?.block_on(brew(&source, &stats, &names, &opts));
    print_diagnostics(&report.diagnostics);

    if json {
        return print_json(&report);
    }

    println!("Pool: {} cards, identity {}", report.found.len(), report.identity);
    print_skipped(&report.skipped);
    if report.ranked.is_empty() {
        println!(
            "No commanders scored above zero ({} considered).",
            report.considered
        );
        return Ok(());
    }

    println!();
    let rows = report
        .ranked
        .iter()
        .enumerate()
        .map(|(i, c)| {
            vec![
                format!("{}", i + 1),
                c.synergy.score.to_string(),
                c.identity.to_string(),
                c.display_name.clone(),
                edhrec_url(&c.display_name),
            ]
        })
        .collect();
    print_table(&["#", "SCORE", "COLORS", "COMMANDER", "EDHREC"], rows);

    for c in &report.ranked {
        if !c.synergy.matched.is_empty() {
            println!();
            println!("{} makes good use of: {}", c.display_name, c.synergy.matched.join(", "));
        }
    }
    Ok(())
}
