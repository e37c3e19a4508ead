use crate::output::print_json;
use brewer_core::slug::{edhrec_slug, edhrec_url};

pub fn run(name: &str, json: bool) -> anyhow::Result<()> {
    let slug = edhrec_slug(name);
    if json {
        print_json(&serde_json::json!({
            "name": name,
            "slug": slug,
            "url": edhrec_url(name),
        }))?;
    } else {
        println!("{slug}");
        println!("{}", edhrec_url(name));
    }
    Ok(())
}
