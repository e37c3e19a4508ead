use crate::http::{build_client, get_json};
use crate::source::CardSource;
use crate::throttle::Throttle;
use crate::Result;
use brewer_core::card::Card;
use brewer_core::config::Config;
use brewer_core::rules::CardQuery;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct SearchPage {
    #[serde(default)]
    data: Vec<Card>,
    #[serde(default)]
    has_more: bool,
    next_page: Option<String>,
}

/// Scryfall REST client.
#[derive(Clone)]
pub struct Scryfall {
    http: reqwest::Client,
    base_url: String,
    throttle: Arc<Throttle>,
    max_pages: u32,
}

impl Scryfall {
    pub fn new(cfg: &Config) -> Result<Self> {
        Ok(Self {
            http: build_client(&cfg.http)?,
            base_url: cfg.scryfall.base_url.trim_end_matches('/').to_string(),
            throttle: Arc::new(Throttle::from_millis(cfg.scryfall.request_delay_ms)),
            max_pages: cfg.http.max_pages,
        })
    }

    /// Run a query in Scryfall search syntax, most popular first.
    ///
    /// Follows `next_page` up to the configured page limit. A 404 is
    /// Scryfall's way of saying "no cards matched".
    pub async fn search_syntax(&self, q: &str) -> Result<Vec<Card>> {
        let mut url = format!("{}/cards/search", self.base_url);
        let mut params = vec![("q", q), ("order", "edhrec")];
        let mut cards = Vec::new();

        for page in 1..=self.max_pages {
            let Some(body) = get_json::<SearchPage>(&self.http, &self.throttle, &url, &params).await?
            else {
                break;
            };
            cards.extend(body.data);
            match (body.has_more, body.next_page) {
                (true, Some(next)) if page < self.max_pages => {
                    url = next;
                    params.clear();
                }
                (true, _) => {
                    tracing::warn!(query = q, pages = page, "search truncated at page limit");
                    break;
                }
                _ => break,
            }
        }
        tracing::debug!(query = q, hits = cards.len(), "scryfall search");
        Ok(cards)
    }

    /// Fuzzy name lookup through `/cards/named`.
    pub async fn named(&self, name: &str) -> Result<Option<Card>> {
        let url = format!("{}/cards/named", self.base_url);
        get_json(&self.http, &self.throttle, &url, &[("fuzzy", name)]).await
    }
}

impl CardSource for Scryfall {
    async fn search(&self, query: &CardQuery) -> Result<Vec<Card>> {
        self.search_syntax(&query.to_scryfall()).await
    }

    async fn lookup(&self, name: &str) -> Result<Option<Card>> {
        self.named(name).await
    }
}
