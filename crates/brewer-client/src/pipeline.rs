//! Card names in, ranked commanders out.

use crate::resolver::{resolve, Diagnostic};
use crate::scorer::score_candidates;
use crate::source::{CardSource, StatsSource};
use brewer_core::candidate::CommanderCandidate;
use brewer_core::card::{pool_identity, Card};
use brewer_core::color::ColorIdentity;
use brewer_core::rank::rank;
use brewer_core::score::ScoringWeights;
use futures::future::join_all;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "reason", content = "detail")]
pub enum SkipReason {
    NotFound,
    NotCommanderLegal,
    LookupFailed(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NotFound => f.write_str("not found"),
            SkipReason::NotCommanderLegal => f.write_str("not legal in commander"),
            SkipReason::LookupFailed(e) => write!(f, "lookup failed: {e}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedCard {
    pub name: String,
    #[serde(flatten)]
    pub reason: SkipReason,
}

/// The user's card names resolved to card records.
#[derive(Debug, Clone, Serialize)]
pub struct Pool {
    pub cards: Vec<Card>,
    pub skipped: Vec<SkippedCard>,
    pub identity: ColorIdentity,
}

impl Pool {
    pub fn names(&self) -> Vec<String> {
        self.cards.iter().map(|c| c.name.clone()).collect()
    }
}

/// Look up every name concurrently, keeping input order. Unknown, illegal
/// and repeated cards are left out of the pool.
pub async fn lookup_pool<S: CardSource>(source: &S, names: &[String]) -> Pool {
    let outcomes = join_all(names.iter().map(|n| source.lookup(n))).await;

    let mut seen = HashSet::new();
    let mut cards = Vec::new();
    let mut skipped = Vec::new();
    for (name, outcome) in names.iter().zip(outcomes) {
        let reason = match outcome {
            Ok(Some(card)) if card.is_commander_legal() => {
                if seen.insert(card.name.clone()) {
                    cards.push(card);
                } else {
                    tracing::debug!(%name, "duplicate card in pool");
                }
                continue;
            }
            Ok(Some(_)) => SkipReason::NotCommanderLegal,
            Ok(None) => SkipReason::NotFound,
            Err(e) => SkipReason::LookupFailed(e.to_string()),
        };
        tracing::warn!(%name, ?reason, "skipping card");
        skipped.push(SkippedCard {
            name: name.clone(),
            reason,
        });
    }

    let identity = pool_identity(&cards);
    tracing::info!(cards = cards.len(), skipped = skipped.len(), %identity, "pool resolved");
    Pool {
        cards,
        skipped,
        identity,
    }
}

#[derive(Debug, Clone)]
pub struct BrewOptions {
    pub weights: ScoringWeights,
    pub top: usize,
    pub include_zero: bool,
}

impl Default for BrewOptions {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            top: 10,
            include_zero: false,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BrewReport {
    pub found: Vec<String>,
    pub skipped: Vec<SkippedCard>,
    pub identity: ColorIdentity,
    /// Candidates resolved before ranking.
    pub considered: usize,
    pub ranked: Vec<CommanderCandidate>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Run the whole brew: look up the pool, resolve candidates for its
/// identity, score them and keep the best.
pub async fn brew<C: CardSource, T: StatsSource>(
    cards: &C,
    stats: &T,
    names: &[String],
    opts: &BrewOptions,
) -> BrewReport {
    let pool = lookup_pool(cards, names).await;
    let resolution = resolve(cards, pool.identity).await;
    let mut diagnostics = resolution.diagnostics;
    let candidates: Vec<_> = resolution.candidates.into_values().collect();
    let considered = candidates.len();

    let (scored, scoring_diagnostics) =
        score_candidates(stats, candidates, &pool.cards, &opts.weights).await;
    diagnostics.extend(scoring_diagnostics);

    BrewReport {
        found: pool.names(),
        skipped: pool.skipped,
        identity: pool.identity,
        considered,
        ranked: rank(scored, opts.top, opts.include_zero),
        diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::Result;
    use brewer_core::rules::CardQuery;
    use brewer_core::score::{DeckStats, StatEntry};
    use std::collections::HashMap;

    struct Library(Vec<Card>);

    impl CardSource for Library {
        async fn search(&self, query: &CardQuery) -> Result<Vec<Card>> {
            Ok(self.0.iter().filter(|c| query.matches(c)).cloned().collect())
        }

        async fn lookup(&self, name: &str) -> Result<Option<Card>> {
            if name == "Offline Card" {
                return Err(ClientError::Status {
                    status: 502,
                    url: "https://api.scryfall.com/cards/named".into(),
                });
            }
            Ok(self
                .0
                .iter()
                .find(|c| c.name.eq_ignore_ascii_case(name))
                .cloned())
        }
    }

    struct Pages(HashMap<String, DeckStats>);

    impl StatsSource for Pages {
        async fn deck_stats(&self, slug: &str) -> Result<Option<DeckStats>> {
            Ok(self.0.get(slug).cloned())
        }
    }

    fn legend(name: &str, colors: &str) -> Card {
        Card::new(name, colors.parse().unwrap(), "Legendary Creature — Human", "")
    }

    fn library() -> Library {
        let mut channel = Card::new("Channel", "G".parse().unwrap(), "Sorcery", "");
        channel.legalities.insert("commander".into(), "banned".into());
        let mut kaalia = legend("Kaalia of the Vast", "WBR");
        kaalia.edhrec_rank = Some(900);
        let mut edgar = legend("Edgar Markov", "WBR");
        edgar.edhrec_rank = Some(30);
        Library(vec![
            kaalia,
            edgar,
            legend("Najeela, the Blade-Blossom", "WUBRG"),
            Card::new("Master of Cruelties", "BR".parse().unwrap(), "Creature — Demon Assassin", ""),
            channel,
        ])
    }

    fn pages() -> Pages {
        let entry = |name: &str| StatEntry {
            name: name.into(),
            synergy: 0.5,
            num_decks: 50,
            potential_decks: 100,
        };
        let mut pages = HashMap::new();
        pages.insert(
            "kaalia-of-the-vast".to_string(),
            DeckStats::new(vec![entry("Master of Cruelties")]),
        );
        pages.insert(
            "edgar-markov".to_string(),
            DeckStats::new(vec![entry("Kaalia of the Vast")]),
        );
        Pages(pages)
    }

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn pool_lookup_reports_skips() {
        let pool = lookup_pool(
            &library(),
            &names(&["kaalia of the vast", "Channel", "Nope", "Offline Card", "Kaalia of the Vast"]),
        )
        .await;
        assert_eq!(pool.names(), vec!["Kaalia of the Vast"]);
        assert_eq!(pool.identity.letters(), "WBR");
        let reasons: Vec<_> = pool.skipped.iter().map(|s| &s.reason).collect();
        assert_eq!(reasons[0], &SkipReason::NotCommanderLegal);
        assert_eq!(reasons[1], &SkipReason::NotFound);
        assert!(matches!(reasons[2], SkipReason::LookupFailed(m) if m.contains("502")));
    }

    #[tokio::test]
    async fn kaalia_pool_ranks_kaalia_first() {
        let report = brew(
            &library(),
            &pages(),
            &names(&["Kaalia of the Vast", "Master of Cruelties"]),
            &BrewOptions::default(),
        )
        .await;

        assert_eq!(report.identity.letters(), "WBR");
        assert_eq!(report.considered, 3);
        let ranked: Vec<_> = report.ranked.iter().map(|c| c.display_name.as_str()).collect();
        // Kaalia: (4 + 2 + 1 + 1) / 2 * 2.5 = 10; Edgar: (2 + 1 + 1) / 2 * 2.5 = 5
        assert_eq!(ranked, vec!["Kaalia of the Vast", "Edgar Markov"]);
        assert_eq!(report.ranked[0].synergy.score, 10);
        assert!(report.diagnostics.is_empty());
    }

    #[tokio::test]
    async fn include_zero_keeps_unscored() {
        let opts = BrewOptions {
            include_zero: true,
            ..BrewOptions::default()
        };
        let report = brew(&library(), &pages(), &names(&["Kaalia of the Vast"]), &opts).await;
        let last = report.ranked.last().unwrap();
        assert_eq!(last.display_name, "Najeela, the Blade-Blossom");
        assert_eq!(last.synergy.score, 0);
    }

    #[tokio::test]
    async fn empty_pool_is_colorless() {
        let report = brew(&library(), &pages(), &[], &BrewOptions::default()).await;
        assert!(report.identity.is_colorless());
        assert!(report.found.is_empty());
        assert!(report.ranked.is_empty());
    }

    #[test]
    fn skip_reasons_read_as_text() {
        assert_eq!(SkipReason::NotFound.to_string(), "not found");
        assert_eq!(SkipReason::NotCommanderLegal.to_string(), "not legal in commander");
        assert_eq!(
            SkipReason::LookupFailed("timed out".into()).to_string(),
            "lookup failed: timed out"
        );
    }
}
