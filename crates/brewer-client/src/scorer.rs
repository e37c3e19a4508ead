use crate::resolver::Diagnostic;
use crate::source::StatsSource;
use crate::Result;
use brewer_core::candidate::{CommanderCandidate, Synergy};
use brewer_core::card::Card;
use brewer_core::score::{score_pool, ScoringWeights};
use brewer_core::slug::edhrec_slug;
use futures::future::join_all;

/// Score one commander display name against `pool`. A commander without a
/// statistics page scores zero.
pub async fn score_name<T: StatsSource>(
    stats: &T,
    display_name: &str,
    pool: &[Card],
    weights: &ScoringWeights,
) -> Result<Synergy> {
    let slug = edhrec_slug(display_name);
    match stats.deck_stats(&slug).await? {
        Some(deck) => Ok(score_pool(display_name, pool, &deck, weights)),
        None => {
            tracing::debug!(commander = display_name, %slug, "no statistics, scoring 0");
            Ok(Synergy::default())
        }
    }
}

/// Score every candidate concurrently. Failures score zero and are returned
/// as diagnostics; candidates come back in their input order.
pub async fn score_candidates<T: StatsSource>(
    stats: &T,
    mut candidates: Vec<CommanderCandidate>,
    pool: &[Card],
    weights: &ScoringWeights,
) -> (Vec<CommanderCandidate>, Vec<Diagnostic>) {
    let outcomes = join_all(
        candidates
            .iter()
            .map(|c| score_name(stats, &c.display_name, pool, weights)),
    )
    .await;

    let mut diagnostics = Vec::new();
    for (candidate, outcome) in candidates.iter_mut().zip(outcomes) {
        match outcome {
            Ok(synergy) => candidate.synergy = synergy,
            Err(e) => {
                tracing::warn!(commander = %candidate.display_name, error = %e, "scoring failed");
                diagnostics.push(Diagnostic::new(candidate.display_name.clone(), e.to_string()));
                candidate.synergy = Synergy::default();
            }
        }
    }
    tracing::info!(
        scored = candidates.len(),
        failed = diagnostics.len(),
        "candidates scored"
    );
    (candidates, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use brewer_core::color::ColorIdentity;
    use brewer_core::score::{DeckStats, StatEntry};
    use std::collections::HashMap;
    use std::sync::Arc;

    /// Serves canned pages by slug; slugs in `broken` fail.
    #[derive(Default)]
    struct FakeStats {
        pages: HashMap<String, DeckStats>,
        broken: Vec<String>,
    }

    impl StatsSource for FakeStats {
        async fn deck_stats(&self, slug: &str) -> Result<Option<DeckStats>> {
            if self.broken.iter().any(|b| b == slug) {
                return Err(ClientError::Malformed {
                    url: format!("https://json.edhrec.com/pages/commanders/{slug}.json"),
                    message: "expected value at line 1 column 1".into(),
                });
            }
            Ok(self.pages.get(slug).cloned())
        }
    }

    fn card(name: &str) -> Card {
        Card::new(name, ColorIdentity::COLORLESS, "Creature", "")
    }

    fn commander(name: &str) -> CommanderCandidate {
        CommanderCandidate::solo(Arc::new(Card::new(
            name,
            "WBR".parse().unwrap(),
            "Legendary Creature — Human",
            "",
        )))
    }

    fn kaalia_stats() -> DeckStats {
        DeckStats::new(vec![StatEntry {
            name: "Master of Cruelties".into(),
            synergy: 0.6,
            num_decks: 500,
            potential_decks: 1000,
        }])
    }

    #[tokio::test]
    async fn missing_page_scores_zero() {
        let stats = FakeStats::default();
        let s = score_name(&stats, "Kaalia of the Vast", &[card("Sol Ring")], &ScoringWeights::default())
            .await
            .unwrap();
        assert_eq!(s, Synergy::default());
    }

    #[tokio::test]
    async fn scores_through_slug() {
        let mut stats = FakeStats::default();
        stats.pages.insert("kaalia-of-the-vast".into(), kaalia_stats());
        let pool = vec![card("Master of Cruelties"), card("Island")];
        let s = score_name(&stats, "Kaalia of the Vast", &pool, &ScoringWeights::default())
            .await
            .unwrap();
        // (2 + 1 + 1) / 2 * 2.5 = 5
        assert_eq!(s.score, 5);
        assert_eq!(s.matched, vec!["Master of Cruelties"]);
    }

    #[tokio::test]
    async fn one_failure_does_not_block_others() {
        let mut stats = FakeStats::default();
        stats.pages.insert("kaalia-of-the-vast".into(), kaalia_stats());
        stats.broken.push("edgar-markov".into());

        let (scored, diagnostics) = score_candidates(
            &stats,
            vec![commander("Edgar Markov"), commander("Kaalia of the Vast")],
            &[card("Master of Cruelties")],
            &ScoringWeights::default(),
        )
        .await;

        assert_eq!(scored[0].display_name, "Edgar Markov");
        assert_eq!(scored[0].synergy.score, 0);
        assert_eq!(scored[1].synergy.score, 10);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].scope, "Edgar Markov");
    }
}
