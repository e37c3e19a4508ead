use crate::candidate::Synergy;
use crate::card::Card;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// ScoringWeights
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    /// Added when a pool card appears in the commander's statistics.
    #[serde(default = "default_match_base")]
    pub match_base: u32,
    /// Added when a pool card is the commander itself.
    #[serde(default = "default_card_is_commander")]
    pub card_is_commander: u32,
    #[serde(default = "default_bonus")]
    pub high_synergy: u32,
    #[serde(default = "default_bonus")]
    pub high_inclusion: u32,
    #[serde(default = "default_synergy_threshold")]
    pub synergy_threshold: f64,
    /// Minimum `num_decks / potential_decks` for the inclusion bonus.
    #[serde(default = "default_inclusion_threshold")]
    pub inclusion_threshold: f64,
    /// Multiplier applied to the per-card average.
    #[serde(default = "default_scale")]
    pub scale: f64,
}

fn default_match_base() -> u32 {
    2
}

fn default_card_is_commander() -> u32 {
    4
}

fn default_bonus() -> u32 {
    1
}

fn default_synergy_threshold() -> f64 {
    0.3
}

fn default_inclusion_threshold() -> f64 {
    0.4
}

fn default_scale() -> f64 {
    2.5
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            match_base: default_match_base(),
            card_is_commander: default_card_is_commander(),
            high_synergy: default_bonus(),
            high_inclusion: default_bonus(),
            synergy_threshold: default_synergy_threshold(),
            inclusion_threshold: default_inclusion_threshold(),
            scale: default_scale(),
        }
    }
}

// ---------------------------------------------------------------------------
// DeckStats
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatEntry {
    pub name: String,
    #[serde(default)]
    pub synergy: f64,
    #[serde(default)]
    pub num_decks: u64,
    #[serde(default)]
    pub potential_decks: u64,
}

impl StatEntry {
    /// Share of eligible decks that run this card; 0 when nothing is eligible.
    pub fn inclusion(&self) -> f64 {
        if self.potential_decks == 0 {
            0.0
        } else {
            self.num_decks as f64 / self.potential_decks as f64
        }
    }
}

/// Deck statistics for one commander page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeckStats {
    entries: HashMap<String, StatEntry>,
}

impl DeckStats {
    pub fn new(entries: Vec<StatEntry>) -> Self {
        Self {
            entries: entries.into_iter().map(|e| (e.name.clone(), e)).collect(),
        }
    }

    /// Parse a commander page. Accepts a top-level `cardlist` array or the
    /// nested `container.json_dict.cardlists[].cardviews[]` layout. Returns
    /// `None` when neither is present.
    pub fn from_page(page: &serde_json::Value) -> Option<Self> {
        if let Some(list) = page.get("cardlist").and_then(|v| v.as_array()) {
            return Some(Self::new(parse_entries(list)));
        }
        let lists = page
            .pointer("/container/json_dict/cardlists")
            .and_then(|v| v.as_array())?;
        let entries = lists
            .iter()
            .filter_map(|l| l.get("cardviews").and_then(|v| v.as_array()))
            .flat_map(|views| parse_entries(views))
            .collect();
        Some(Self::new(entries))
    }

    pub fn get(&self, name: &str) -> Option<&StatEntry> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn parse_entries(values: &[serde_json::Value]) -> Vec<StatEntry> {
    values
        .iter()
        .filter_map(|v| serde_json::from_value::<StatEntry>(v.clone()).ok())
        .collect()
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Score `pool` against the statistics of the commander named `display_name`.
///
/// Pool cards are compared by exact name. The weight sum is averaged over the
/// pool size and scaled; an empty pool scores 0.
pub fn score_pool(
    display_name: &str,
    pool: &[Card],
    stats: &DeckStats,
    weights: &ScoringWeights,
) -> Synergy {
    if pool.is_empty() {
        return Synergy::default();
    }

    let mut raw = 0u32;
    let mut matched = Vec::new();
    for card in pool {
        if card.name == display_name {
            raw += weights.card_is_commander;
        }
        if let Some(entry) = stats.get(&card.name) {
            raw += weights.match_base;
            if entry.synergy >= weights.synergy_threshold {
                raw += weights.high_synergy;
            }
            if entry.inclusion() >= weights.inclusion_threshold {
                raw += weights.high_inclusion;
            }
            matched.push(card.name.clone());
        }
    }

    let scaled = (raw as f64 / pool.len() as f64 * weights.scale).round_ties_even();
    Synergy {
        score: scaled.max(0.0) as u32,
        raw,
        matched,
    }
}
