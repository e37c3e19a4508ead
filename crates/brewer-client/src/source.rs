//! The seams between the pipeline and the outside world.

use crate::error::ClientError;
use crate::scryfall::Scryfall;
use crate::Result;
use brewer_core::card::Card;
use brewer_core::mirror::Mirror;
use brewer_core::rules::CardQuery;
use brewer_core::score::DeckStats;
use brewer_core::BrewError;
use std::future::Future;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Where card records come from.
pub trait CardSource: Send + Sync {
    fn search(&self, query: &CardQuery) -> impl Future<Output = Result<Vec<Card>>> + Send;

    /// Resolve a name as typed by a user. `Ok(None)` when nothing matches.
    fn lookup(&self, name: &str) -> impl Future<Output = Result<Option<Card>>> + Send;
}

/// Where per-commander deck statistics come from.
pub trait StatsSource: Send + Sync {
    /// `Ok(None)` when the commander has no statistics page.
    fn deck_stats(&self, slug: &str) -> impl Future<Output = Result<Option<DeckStats>>> + Send;
}

// ---------------------------------------------------------------------------
// MirrorSource
// ---------------------------------------------------------------------------

/// [`Mirror`] behind a mutex, queried on the blocking pool.
#[derive(Clone)]
pub struct MirrorSource {
    inner: Arc<Mutex<Mirror>>,
}

impl MirrorSource {
    pub fn new(mirror: Mirror) -> Self {
        Self {
            inner: Arc::new(Mutex::new(mirror)),
        }
    }

    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::new(Mirror::open(path)?))
    }

    async fn run<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Mirror) -> brewer_core::Result<T> + Send + 'static,
    {
        let inner = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let mut mirror = inner
                .lock()
                .map_err(|_| BrewError::Mirror("mirror lock poisoned".to_string()))?;
            f(&mut mirror).map_err(ClientError::from)
        })
        .await?
    }
}

impl CardSource for MirrorSource {
    async fn search(&self, query: &CardQuery) -> Result<Vec<Card>> {
        let query = query.clone();
        self.run(move |m| m.search(&query)).await
    }

    async fn lookup(&self, name: &str) -> Result<Option<Card>> {
        let name = name.to_string();
        self.run(move |m| m.lookup(&name)).await
    }
}

// ---------------------------------------------------------------------------
// CardBackend
// ---------------------------------------------------------------------------

/// The card source chosen at startup.
#[derive(Clone)]
pub enum CardBackend {
    Remote(Scryfall),
    Local(MirrorSource),
}

impl CardSource for CardBackend {
    async fn search(&self, query: &CardQuery) -> Result<Vec<Card>> {
        match self {
            CardBackend::Remote(s) => s.search(query).await,
            CardBackend::Local(m) => m.search(query).await,
        }
    }

    async fn lookup(&self, name: &str) -> Result<Option<Card>> {
        match self {
            CardBackend::Remote(s) => s.lookup(name).await,
            CardBackend::Local(m) => m.lookup(name).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brewer_core::rules::IdentityFilter;

    const BULK: &str = r#"[
      {"name": "Kaalia of the Vast", "color_identity": ["W", "B", "R"],
       "type_line": "Legendary Creature — Human Cleric", "oracle_text": "Flying",
       "legalities": {"commander": "legal"}, "edhrec_rank": 900},
      {"name": "Sol Ring", "color_identity": [], "type_line": "Artifact",
       "oracle_text": "{T}: Add {C}{C}.", "legalities": {"commander": "legal"}}
    ]"#;

    fn source() -> MirrorSource {
        let mut mirror = Mirror::open_in_memory().unwrap();
        mirror.import_json(BULK.as_bytes()).unwrap();
        MirrorSource::new(mirror)
    }

    #[tokio::test]
    async fn mirror_source_searches_off_thread() {
        let q = CardQuery {
            identity: IdentityFilter::AtLeast("R".parse().unwrap()),
            commander_eligible: true,
            ..CardQuery::commander_legal()
        };
        let cards = CardBackend::Local(source()).search(&q).await.unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].name, "Kaalia of the Vast");
    }

    #[tokio::test]
    async fn mirror_source_lookup_is_fuzzy() {
        let found = source().lookup("kalia of the vast").await.unwrap();
        assert_eq!(found.unwrap().name, "Kaalia of the Vast");
    }

    #[tokio::test]
    async fn empty_mirror_surfaces_core_error() {
        let src = MirrorSource::new(Mirror::open_in_memory().unwrap());
        let err = src.lookup("Sol Ring").await.unwrap_err();
        assert!(matches!(err, ClientError::Core(BrewError::MirrorEmpty)));
    }
}
