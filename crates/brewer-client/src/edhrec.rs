use crate::http::{build_client, get_json};
use crate::source::StatsSource;
use crate::throttle::Throttle;
use crate::Result;
use brewer_core::config::Config;
use brewer_core::score::DeckStats;
use std::sync::Arc;

/// Client for EDHREC's static JSON pages.
#[derive(Clone)]
pub struct Edhrec {
    http: reqwest::Client,
    base_url: String,
    throttle: Arc<Throttle>,
}

impl Edhrec {
    pub fn new(cfg: &Config) -> Result<Self> {
        Ok(Self {
            http: build_client(&cfg.http)?,
            base_url: cfg.edhrec.base_url.trim_end_matches('/').to_string(),
            throttle: Arc::new(Throttle::from_millis(cfg.edhrec.request_delay_ms)),
        })
    }

    /// Raw commander page for `slug`, following one `redirect` hop (EDHREC
    /// redirects alternate names to the canonical page).
    pub async fn commander_page(&self, slug: &str) -> Result<Option<serde_json::Value>> {
        let url = format!("{}/pages/commanders/{slug}.json", self.base_url);
        let Some(page) = get_json::<serde_json::Value>(&self.http, &self.throttle, &url, &[]).await?
        else {
            return Ok(None);
        };

        match page.get("redirect").and_then(|r| r.as_str()) {
            Some(target) if page.get("cardlist").is_none() && page.get("container").is_none() => {
                let url = format!("{}/pages{}.json", self.base_url, target.trim_end_matches(".json"));
                tracing::debug!(slug, %url, "following redirect");
                get_json(&self.http, &self.throttle, &url, &[]).await
            }
            _ => Ok(Some(page)),
        }
    }
}

impl StatsSource for Edhrec {
    async fn deck_stats(&self, slug: &str) -> Result<Option<DeckStats>> {
        let Some(page) = self.commander_page(slug).await? else {
            tracing::debug!(slug, "no commander page");
            return Ok(None);
        };
        let stats = DeckStats::from_page(&page);
        if stats.is_none() {
            tracing::debug!(slug, "commander page has no card list");
        }
        Ok(stats)
    }
}
