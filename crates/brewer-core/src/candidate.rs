use crate::card::Card;
use crate::color::ColorIdentity;
use crate::rules::PairingRule;
use serde::Serialize;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Pairing
// ---------------------------------------------------------------------------

/// One commander, or two commanders played together.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Pairing {
    Solo { card: Arc<Card> },
    Pair { first: Arc<Card>, second: Arc<Card> },
}

impl Pairing {
    pub fn members(&self) -> Vec<&Card> {
        match self {
            Pairing::Solo { card } => vec![card.as_ref()],
            Pairing::Pair { first, second } => vec![first.as_ref(), second.as_ref()],
        }
    }

    pub fn identity(&self) -> ColorIdentity {
        self.members()
            .iter()
            .fold(ColorIdentity::COLORLESS, |acc, c| acc.union(c.color_identity))
    }
}

// ---------------------------------------------------------------------------
// Synergy
// ---------------------------------------------------------------------------

/// Outcome of scoring one candidate against a card pool.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Synergy {
    /// Normalized score, nominally 0-10.
    pub score: u32,
    /// Sum of weights before normalization.
    pub raw: u32,
    /// Pool cards that appear in the candidate's deck statistics.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub matched: Vec<String>,
}

// ---------------------------------------------------------------------------
// CommanderCandidate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommanderCandidate {
    pub display_name: String,
    pub rule: PairingRule,
    pub pairing: Pairing,
    pub identity: ColorIdentity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub popularity: Option<u32>,
    pub synergy: Synergy,
}

impl CommanderCandidate {
    pub fn solo(card: Arc<Card>) -> Self {
        let display_name = card.name.clone();
        let pairing = Pairing::Solo { card };
        Self::build(display_name, PairingRule::Solo, pairing)
    }

    /// A pair whose display order is lexicographic (partner, friends forever,
    /// partner with).
    pub fn sorted_pair(rule: PairingRule, a: Arc<Card>, b: Arc<Card>) -> Self {
        let (first, second) = if a.name <= b.name { (a, b) } else { (b, a) };
        Self::ordered_pair(rule, first, second)
    }

    /// A pair whose display order is fixed by the rule (creature + background,
    /// doctor + companion).
    pub fn ordered_pair(rule: PairingRule, first: Arc<Card>, second: Arc<Card>) -> Self {
        let display_name = format!("{} + {}", first.name, second.name);
        let pairing = Pairing::Pair { first, second };
        Self::build(display_name, rule, pairing)
    }

    fn build(display_name: String, rule: PairingRule, pairing: Pairing) -> Self {
        let identity = pairing.identity();
        // A pair is only as popular as its least popular member.
        let popularity = pairing
            .members()
            .iter()
            .map(|c| c.edhrec_rank)
            .try_fold(0u32, |worst, rank| rank.map(|r| worst.max(r)));
        Self {
            display_name,
            rule,
            pairing,
            identity,
            popularity,
            synergy: Synergy::default(),
        }
    }

    pub fn is_pair(&self) -> bool {
        matches!(self.pairing, Pairing::Pair { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(name: &str, colors: &str, rank: Option<u32>) -> Arc<Card> {
        let mut c = Card::new(name, colors.parse().unwrap(), "Legendary Creature", "Partner");
        c.edhrec_rank = rank;
        Arc::new(c)
    }

    #[test]
    fn solo_uses_card_name_and_identity() {
        let c = CommanderCandidate::solo(card("Kaalia of the Vast", "WBR", Some(40)));
        assert_eq!(c.display_name, "Kaalia of the Vast");
        assert_eq!(c.identity.letters(), "WBR");
        assert_eq!(c.popularity, Some(40));
        assert_eq!(c.synergy.score, 0);
        assert!(!c.is_pair());
    }

    #[test]
    fn sorted_pair_is_order_independent() {
        let a = card("Tymna the Weaver", "WB", Some(10));
        let b = card("Kraum, Ludevic's Opus", "UR", Some(30));
        let x = CommanderCandidate::sorted_pair(PairingRule::Partner, a.clone(), b.clone());
        let y = CommanderCandidate::sorted_pair(PairingRule::Partner, b, a);
        assert_eq!(x.display_name, "Kraum, Ludevic's Opus + Tymna the Weaver");
        assert_eq!(x.display_name, y.display_name);
        assert_eq!(x.identity.letters(), "WUBR");
        assert_eq!(x.popularity, Some(30));
    }

    #[test]
    fn ordered_pair_keeps_rule_order() {
        let creature = card("Wilson, Refined Grizzly", "G", None);
        let bg = card("Agent of the Iron Throne", "B", Some(5));
        let c = CommanderCandidate::ordered_pair(PairingRule::Background, creature, bg);
        assert_eq!(c.display_name, "Wilson, Refined Grizzly + Agent of the Iron Throne");
        assert_eq!(c.popularity, None);
        assert!(c.is_pair());
    }
}
