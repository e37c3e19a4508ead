//! Commander pairing rules.
//!
//! Each rule describes the card searches it needs ([`PairingRule::queries`])
//! and how to turn the search results into candidates
//! ([`PairingRule::combine`]). Searching itself happens elsewhere; everything
//! here is pure so the rules can be exercised without a network.

use crate::candidate::CommanderCandidate;
use crate::card::Card;
use crate::color::ColorIdentity;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// PairingRule
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairingRule {
    Solo,
    Partner,
    PartnerWith,
    Background,
    FriendsForever,
    DoctorWho,
}

impl PairingRule {
    /// All rules, in the order their results are merged.
    pub fn all() -> &'static [PairingRule] {
        &[
            PairingRule::Solo,
            PairingRule::Partner,
            PairingRule::PartnerWith,
            PairingRule::Background,
            PairingRule::FriendsForever,
            PairingRule::DoctorWho,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PairingRule::Solo => "solo",
            PairingRule::Partner => "partner",
            PairingRule::PartnerWith => "partner_with",
            PairingRule::Background => "background",
            PairingRule::FriendsForever => "friends_forever",
            PairingRule::DoctorWho => "doctor_who",
        }
    }

    /// Searches this rule needs. Background and Doctor Who need two disjoint
    /// sets; every other rule needs one.
    ///
    /// Pair searches are not color restricted: a member of a qualifying pair
    /// may contribute none of the target colors. Every member except a
    /// Background must be able to be a commander on its own.
    pub fn queries(self, target: ColorIdentity) -> Vec<CardQuery> {
        match self {
            PairingRule::Solo => vec![CardQuery {
                identity: IdentityFilter::AtLeast(target),
                commander_eligible: true,
                ..CardQuery::commander_legal()
            }],
            PairingRule::Partner => vec![CardQuery {
                commander_eligible: true,
                oracle: vec!["Partner".into()],
                oracle_excludes: vec!["Partner with".into()],
                ..CardQuery::commander_legal()
            }],
            PairingRule::PartnerWith => vec![CardQuery {
                commander_eligible: true,
                oracle: vec!["Partner with".into()],
                ..CardQuery::commander_legal()
            }],
            PairingRule::Background => vec![
                CardQuery {
                    commander_eligible: true,
                    oracle: vec!["Choose a Background".into()],
                    ..CardQuery::commander_legal()
                },
                CardQuery {
                    types: vec!["Background".into()],
                    ..CardQuery::commander_legal()
                },
            ],
            PairingRule::FriendsForever => vec![CardQuery {
                commander_eligible: true,
                oracle: vec!["Friends forever".into()],
                ..CardQuery::commander_legal()
            }],
            PairingRule::DoctorWho => vec![
                CardQuery {
                    commander_eligible: true,
                    types: vec!["Time Lord Doctor".into()],
                    ..CardQuery::commander_legal()
                },
                CardQuery {
                    commander_eligible: true,
                    oracle: vec!["Doctor's companion".into()],
                    ..CardQuery::commander_legal()
                },
            ],
        }
    }

    /// Build candidates from the results of [`PairingRule::queries`], one
    /// result list per query in the same order. Every member is re-checked
    /// locally for legality and the rule's keyword, and every candidate's
    /// identity covers `target`.
    pub fn combine(self, target: ColorIdentity, results: Vec<Vec<Card>>) -> Vec<CommanderCandidate> {
        let mut sets = results.into_iter().map(unique_legal);
        let first = sets.next().unwrap_or_default();
        let second = sets.next().unwrap_or_default();

        match self {
            PairingRule::Solo => first
                .into_iter()
                .filter(|c| c.can_be_commander() && c.color_identity.is_superset_of(target))
                .map(CommanderCandidate::solo)
                .collect(),
            PairingRule::Partner => {
                let partners: Vec<_> = first
                    .into_iter()
                    .filter(|c| c.has_partner() && c.can_be_commander())
                    .collect();
                open_pairs(self, target, &partners)
            }
            PairingRule::FriendsForever => {
                let friends: Vec<_> = first
                    .into_iter()
                    .filter(|c| c.has_friends_forever() && c.can_be_commander())
                    .collect();
                open_pairs(self, target, &friends)
            }
            PairingRule::PartnerWith => {
                let fixed: Vec<_> = first.into_iter().filter(|c| c.can_be_commander()).collect();
                fixed_pairs(target, fixed)
            }
            PairingRule::Background => {
                let creatures: Vec<_> = first
                    .into_iter()
                    .filter(|c| c.chooses_background() && c.can_be_commander())
                    .collect();
                let backgrounds: Vec<_> = second.into_iter().filter(|c| c.is_background()).collect();
                cross_pairs(self, target, &creatures, &backgrounds)
            }
            PairingRule::DoctorWho => {
                let doctors: Vec<_> = first
                    .into_iter()
                    .filter(|c| c.is_time_lord_doctor() && c.can_be_commander())
                    .collect();
                let companions: Vec<_> = second
                    .into_iter()
                    .filter(|c| c.is_doctors_companion() && c.can_be_commander())
                    .collect();
                cross_pairs(self, target, &doctors, &companions)
            }
        }
    }
}

impl fmt::Display for PairingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Drop illegal cards and repeated names (first occurrence wins).
fn unique_legal(cards: Vec<Card>) -> Vec<Arc<Card>> {
    let mut seen = HashSet::new();
    cards
        .into_iter()
        .filter(|c| c.is_commander_legal())
        .filter(|c| seen.insert(c.name.clone()))
        .map(Arc::new)
        .collect()
}

/// Every 2-combination of `cards` whose union covers `target`.
fn open_pairs(rule: PairingRule, target: ColorIdentity, cards: &[Arc<Card>]) -> Vec<CommanderCandidate> {
    let mut out = Vec::new();
    for (i, a) in cards.iter().enumerate() {
        for b in &cards[i + 1..] {
            if a.color_identity.union(b.color_identity).is_superset_of(target) {
                out.push(CommanderCandidate::sorted_pair(rule, a.clone(), b.clone()));
            }
        }
    }
    out
}

/// Every `left × right` combination whose union covers `target`, keeping the
/// left card first in the display name.
fn cross_pairs(
    rule: PairingRule,
    target: ColorIdentity,
    left: &[Arc<Card>],
    right: &[Arc<Card>],
) -> Vec<CommanderCandidate> {
    let mut out = Vec::new();
    for l in left {
        for r in right {
            if l.name == r.name {
                continue;
            }
            if l.color_identity.union(r.color_identity).is_superset_of(target) {
                out.push(CommanderCandidate::ordered_pair(rule, l.clone(), r.clone()));
            }
        }
    }
    out
}

/// "Partner with" pairs. Both cards name each other, so each pair is found
/// twice; keying by the sorted display name collapses them.
fn fixed_pairs(target: ColorIdentity, cards: Vec<Arc<Card>>) -> Vec<CommanderCandidate> {
    let by_name: BTreeMap<&str, &Arc<Card>> = cards.iter().map(|c| (c.name.as_str(), c)).collect();
    let mut pairs: BTreeMap<String, CommanderCandidate> = BTreeMap::new();

    for card in &cards {
        let Some(partner_name) = card.partner_with_name() else {
            tracing::debug!(card = %card.name, "no partner found for 'Partner with' card");
            continue;
        };
        if partner_name == card.name {
            continue;
        }
        let Some(partner) = by_name.get(partner_name.as_str()) else {
            continue;
        };
        if card.color_identity.union(partner.color_identity).is_superset_of(target) {
            let candidate =
                CommanderCandidate::sorted_pair(PairingRule::PartnerWith, card.clone(), (*partner).clone());
            pairs.insert(candidate.display_name.clone(), candidate);
        }
    }
    pairs.into_values().collect()
}

// ---------------------------------------------------------------------------
// CardQuery
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityFilter {
    Any,
    /// Identity must contain every color of the given set.
    AtLeast(ColorIdentity),
}

/// A structured card search, translated by each card source into its own
/// query language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardQuery {
    pub identity: IdentityFilter,
    /// Legal in the commander format.
    pub commander_legal: bool,
    /// Able to be a commander on its own.
    pub commander_eligible: bool,
    /// Type-line substrings, all required.
    pub types: Vec<String>,
    /// Oracle-text substrings, all required (case-insensitive).
    pub oracle: Vec<String>,
    /// Oracle-text substrings that must be absent.
    pub oracle_excludes: Vec<String>,
}

impl CardQuery {
    pub fn commander_legal() -> Self {
        Self {
            identity: IdentityFilter::Any,
            commander_legal: true,
            commander_eligible: false,
            types: Vec::new(),
            oracle: Vec::new(),
            oracle_excludes: Vec::new(),
        }
    }

    /// Scryfall search syntax, e.g. `id>=WB is:commander f:commander`.
    pub fn to_scryfall(&self) -> String {
        let mut parts = Vec::new();
        if let IdentityFilter::AtLeast(id) = self.identity {
            if !id.is_colorless() {
                parts.push(format!("id>={}", id.letters()));
            }
        }
        if self.commander_eligible {
            parts.push("is:commander".to_string());
        }
        if self.commander_legal {
            parts.push("f:commander".to_string());
        }
        for t in &self.types {
            parts.push(format!("t:{}", quote(t)));
        }
        for o in &self.oracle {
            parts.push(format!("o:{}", quote(o)));
        }
        for o in &self.oracle_excludes {
            parts.push(format!("-o:{}", quote(o)));
        }
        parts.join(" ")
    }

    /// Evaluate the query against a single card.
    pub fn matches(&self, card: &Card) -> bool {
        if let IdentityFilter::AtLeast(id) = self.identity {
            if !card.color_identity.is_superset_of(id) {
                return false;
            }
        }
        if self.commander_legal && !card.is_commander_legal() {
            return false;
        }
        if self.commander_eligible && !card.can_be_commander() {
            return false;
        }
        let oracle = card.oracle().to_lowercase();
        self.types.iter().all(|t| card.type_line.contains(t.as_str()))
            && self.oracle.iter().all(|o| oracle.contains(&o.to_lowercase()))
            && !self.oracle_excludes.iter().any(|o| oracle.contains(&o.to_lowercase()))
    }
}

fn quote(s: &str) -> String {
    if s.contains(' ') || s.contains('\'') {
        format!("\"{s}\"")
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::RelatedCard;

    fn cid(s: &str) -> ColorIdentity {
        s.parse().unwrap()
    }

    fn legend(name: &str, colors: &str, oracle: &str) -> Card {
        Card::new(name, cid(colors), "Legendary Creature — Human", oracle)
    }

    fn names(cands: &[CommanderCandidate]) -> Vec<&str> {
        cands.iter().map(|c| c.display_name.as_str()).collect()
    }

    #[test]
    fn solo_query_syntax() {
        let q = &PairingRule::Solo.queries(cid("WBR"))[0];
        assert_eq!(q.to_scryfall(), "id>=WBR is:commander f:commander");
    }

    #[test]
    fn colorless_target_has_no_identity_clause() {
        let q = &PairingRule::Solo.queries(ColorIdentity::COLORLESS)[0];
        assert_eq!(q.to_scryfall(), "is:commander f:commander");
    }

    #[test]
    fn pair_query_syntax() {
        let q = &PairingRule::Partner.queries(cid("U"))[0];
        assert_eq!(q.to_scryfall(), r#"is:commander f:commander o:Partner -o:"Partner with""#);
        let qs = PairingRule::DoctorWho.queries(cid("U"));
        assert_eq!(qs.len(), 2);
        assert_eq!(qs[0].to_scryfall(), r#"is:commander f:commander t:"Time Lord Doctor""#);
        assert_eq!(qs[1].to_scryfall(), r#"is:commander f:commander o:"Doctor's companion""#);
        let bg = PairingRule::Background.queries(cid("U"));
        assert_eq!(bg[0].to_scryfall(), r#"is:commander f:commander o:"Choose a Background""#);
        assert_eq!(bg[1].to_scryfall(), "f:commander t:Background");
    }

    #[test]
    fn query_matches_locally() {
        let q = &PairingRule::Partner.queries(cid("U"))[0];
        assert!(q.matches(&legend("Thrasios", "GU", "Partner")));
        assert!(!q.matches(&legend("Pir", "G", "Partner with Toothy")));
        let solo = &PairingRule::Solo.queries(cid("WB"))[0];
        assert!(solo.matches(&legend("Kaalia of the Vast", "WBR", "Flying")));
        assert!(!solo.matches(&legend("Tymna", "W", "")));
    }

    #[test]
    fn solo_contains_the_pool_commander_itself() {
        let target = cid("WBR");
        let results = vec![vec![
            legend("Kaalia of the Vast", "WBR", "Flying"),
            legend("Atraxa, Praetors' Voice", "WUBG", "Proliferate"),
            legend("Najeela, the Blade-Blossom", "WUBRG", "Whenever a Warrior attacks"),
        ]];
        let out = PairingRule::Solo.combine(target, results);
        assert_eq!(names(&out), vec!["Kaalia of the Vast", "Najeela, the Blade-Blossom"]);
        assert!(out.iter().all(|c| c.identity.is_superset_of(target)));
    }

    #[test]
    fn partner_pairs_cover_target_without_self_pairs() {
        let target = cid("WUB");
        let results = vec![vec![
            legend("Tymna the Weaver", "WB", "Partner"),
            legend("Thrasios, Triton Hero", "GU", "Partner"),
            legend("Kraum, Ludevic's Opus", "UR", "Partner"),
            legend("Tymna the Weaver", "WB", "Partner"),
        ]];
        let out = PairingRule::Partner.combine(target, results);
        assert_eq!(
            names(&out),
            vec![
                "Thrasios, Triton Hero + Tymna the Weaver",
                "Kraum, Ludevic's Opus + Tymna the Weaver",
            ]
        );
        for c in &out {
            let members = c.pairing.members();
            assert_ne!(members[0].name, members[1].name);
            assert!(c.identity.is_superset_of(target));
        }
    }

    #[test]
    fn partner_rule_skips_fixed_partners_and_illegal_cards() {
        let mut banned = legend("Banned Partner", "WUBRG", "Partner");
        banned.legalities.insert("commander".into(), "banned".into());
        let results = vec![vec![
            legend("Ishai, Ojutai Dragonspeaker", "WU", "Partner"),
            legend("Pir, Imaginative Rascal", "G", "Partner with Toothy, Imaginary Friend"),
            banned,
            legend("Reyhan, Last of the Abzan", "BG", "Partner"),
        ]];
        let out = PairingRule::Partner.combine(ColorIdentity::COLORLESS, results);
        assert_eq!(names(&out), vec!["Ishai, Ojutai Dragonspeaker + Reyhan, Last of the Abzan"]);
    }

    #[test]
    fn partner_with_resolves_once_from_both_directions() {
        let mut bruse = legend(
            "Bruse Tarl",
            "RW",
            "Partner with Thrasios, Triton Hero (When this creature enters...)",
        );
        let mut thrasios = legend(
            "Thrasios, Triton Hero",
            "GU",
            "Partner with Bruse Tarl (When this creature enters...)",
        );
        let link = |name: &str| RelatedCard {
            name: name.into(),
            component: "combo_piece".into(),
            type_line: "Legendary Creature".into(),
        };
        bruse.all_parts = vec![link("Bruse Tarl"), link("Thrasios, Triton Hero")];
        thrasios.all_parts = vec![link("Thrasios, Triton Hero"), link("Bruse Tarl")];

        let out = PairingRule::PartnerWith.combine(cid("WG"), vec![vec![bruse, thrasios]]);
        assert_eq!(names(&out), vec!["Bruse Tarl + Thrasios, Triton Hero"]);
        assert_eq!(out[0].rule, PairingRule::PartnerWith);
    }

    #[test]
    fn partner_with_skips_creatures_that_cannot_command() {
        let retriever = Card::new(
            "Chakram Retriever",
            cid("U"),
            "Creature — Elemental Hound",
            "Partner with Chakram Slinger",
        );
        let slinger = Card::new(
            "Chakram Slinger",
            cid("R"),
            "Creature — Human Warrior",
            "Partner with Chakram Retriever",
        );
        let q = &PairingRule::PartnerWith.queries(ColorIdentity::COLORLESS)[0];
        assert!(!q.matches(&retriever));
        let out = PairingRule::PartnerWith.combine(ColorIdentity::COLORLESS, vec![vec![retriever, slinger]]);
        assert!(out.is_empty(), "got {:?}", names(&out));
    }

    #[test]
    fn open_pairs_skip_members_that_cannot_command() {
        let vanilla = |name: &str, oracle: &str| Card::new(name, cid("W"), "Creature — Human", oracle);
        let out = PairingRule::Partner.combine(
            ColorIdentity::COLORLESS,
            vec![vec![legend("Tymna the Weaver", "WB", "Partner"), vanilla("Partner Grunt", "Partner")]],
        );
        assert!(out.is_empty());
        let out = PairingRule::FriendsForever.combine(
            ColorIdentity::COLORLESS,
            vec![vec![legend("Will the Wise", "U", "Friends forever"), vanilla("Pal", "Friends forever")]],
        );
        assert!(out.is_empty());
        let mut doctor = legend("The Tenth Doctor", "URG", "Allons-y!");
        doctor.type_line = "Legendary Creature — Time Lord Doctor".into();
        let out = PairingRule::DoctorWho.combine(
            ColorIdentity::COLORLESS,
            vec![vec![doctor], vec![vanilla("Extra", "Doctor's companion")]],
        );
        assert!(out.is_empty());
    }

    #[test]
    fn partner_with_needs_partner_in_results() {
        let pir = legend("Pir, Imaginative Rascal", "G", "Partner with Toothy, Imaginary Friend");
        let out = PairingRule::PartnerWith.combine(ColorIdentity::COLORLESS, vec![vec![pir]]);
        assert!(out.is_empty());
    }

    #[test]
    fn partner_with_filters_on_union() {
        let pir = legend("Pir, Imaginative Rascal", "G", "Partner with Toothy, Imaginary Friend");
        let toothy = legend("Toothy, Imaginary Friend", "U", "Partner with Pir, Imaginative Rascal");
        let out = PairingRule::PartnerWith.combine(cid("UB"), vec![vec![pir.clone(), toothy.clone()]]);
        assert!(out.is_empty());
        let out = PairingRule::PartnerWith.combine(cid("UG"), vec![vec![pir, toothy]]);
        assert_eq!(names(&out), vec!["Pir, Imaginative Rascal + Toothy, Imaginary Friend"]);
    }

    #[test]
    fn background_crosses_creatures_and_backgrounds() {
        let wilson = legend("Wilson, Refined Grizzly", "G", "Choose a Background");
        let karlach = legend("Karlach, Fury of Avernus", "R", "Choose a Background");
        let giants = Card::new("Raised by Giants", cid("G"), "Legendary Enchantment — Background", "");
        let cult = Card::new("Cult of the Hidden Order", cid("B"), "Legendary Enchantment — Background", "");
        let out = PairingRule::Background.combine(
            cid("RB"),
            vec![vec![wilson, karlach], vec![giants, cult]],
        );
        assert_eq!(names(&out), vec!["Karlach, Fury of Avernus + Cult of the Hidden Order"]);
    }

    #[test]
    fn doctor_who_puts_doctor_first() {
        let doctor = legend("The Tenth Doctor", "URG", "Allons-y!");
        let mut doctor = doctor;
        doctor.type_line = "Legendary Creature — Time Lord Doctor".into();
        let rose = legend("Rose Tyler", "W", "Doctor's companion");
        let out = PairingRule::DoctorWho.combine(cid("WU"), vec![vec![doctor], vec![rose]]);
        assert_eq!(names(&out), vec!["The Tenth Doctor + Rose Tyler"]);
    }

    #[test]
    fn friends_forever_requires_keyword_on_both() {
        let a = legend("Will the Wise", "U", "Friends forever");
        let b = legend("Mike, the Dungeon Master", "W", "Friends forever");
        let c = legend("Not a Friend", "B", "Flying");
        let out = PairingRule::FriendsForever.combine(cid("W"), vec![vec![a, b, c]]);
        assert_eq!(names(&out), vec!["Mike, the Dungeon Master + Will the Wise"]);
    }

    #[test]
    fn missing_result_lists_are_empty() {
        let out = PairingRule::Background.combine(ColorIdentity::COLORLESS, vec![]);
        assert!(out.is_empty());
    }
}
