use crate::color::ColorIdentity;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// RelatedCard / CardFace
// ---------------------------------------------------------------------------

/// An entry of Scryfall's `all_parts` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedCard {
    pub name: String,
    #[serde(default)]
    pub component: String,
    #[serde(default)]
    pub type_line: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardFace {
    pub name: String,
    #[serde(default)]
    pub type_line: String,
    #[serde(default)]
    pub oracle_text: String,
}

// ---------------------------------------------------------------------------
// Card
// ---------------------------------------------------------------------------

/// A card record as returned by Scryfall (or read back from the local mirror).
///
/// Unknown fields in the API payload are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub name: String,
    #[serde(default)]
    pub color_identity: ColorIdentity,
    #[serde(default)]
    pub type_line: String,
    #[serde(default)]
    pub oracle_text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub card_faces: Vec<CardFace>,
    #[serde(default)]
    pub legalities: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub all_parts: Vec<RelatedCard>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edhrec_rank: Option<u32>,
}

impl Card {
    /// Minimal constructor used by tests and the mirror; legal in commander.
    pub fn new(
        name: impl Into<String>,
        color_identity: ColorIdentity,
        type_line: impl Into<String>,
        oracle_text: impl Into<String>,
    ) -> Self {
        let mut legalities = BTreeMap::new();
        legalities.insert("commander".to_string(), "legal".to_string());
        Self {
            name: name.into(),
            color_identity,
            type_line: type_line.into(),
            oracle_text: oracle_text.into(),
            card_faces: Vec::new(),
            legalities,
            all_parts: Vec::new(),
            edhrec_rank: None,
        }
    }

    /// Oracle text of the card, joining faces for double-faced cards.
    pub fn oracle(&self) -> Cow<'_, str> {
        if !self.oracle_text.is_empty() || self.card_faces.is_empty() {
            return Cow::Borrowed(&self.oracle_text);
        }
        let joined = self
            .card_faces
            .iter()
            .map(|f| f.oracle_text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        Cow::Owned(joined)
    }

    fn oracle_has(&self, phrase: &str) -> bool {
        self.oracle()
            .to_lowercase()
            .contains(&phrase.to_lowercase())
    }

    pub fn is_commander_legal(&self) -> bool {
        self.legalities.get("commander").map(String::as_str) == Some("legal")
    }

    /// Legendary creatures and cards that say they can be your commander.
    pub fn can_be_commander(&self) -> bool {
        let front = self.type_line.split("//").next().unwrap_or("");
        (front.contains("Legendary") && front.contains("Creature"))
            || self.oracle_has("can be your commander")
    }

    /// Open partner: "Partner" without a fixed "Partner with" target.
    pub fn has_partner(&self) -> bool {
        self.oracle_has("partner") && !self.oracle_has("partner with")
    }

    pub fn chooses_background(&self) -> bool {
        self.oracle_has("choose a background")
    }

    pub fn is_background(&self) -> bool {
        self.type_line.contains("Background")
    }

    pub fn has_friends_forever(&self) -> bool {
        self.oracle_has("friends forever")
    }

    pub fn is_doctors_companion(&self) -> bool {
        self.oracle_has("doctor's companion") || self.oracle_has("doctor\u{2019}s companion")
    }

    pub fn is_time_lord_doctor(&self) -> bool {
        self.type_line.contains("Time Lord Doctor")
    }

    /// The fixed partner named by "Partner with <Name>".
    ///
    /// Related-card links are consulted first; when several legendary parts are
    /// linked the one matching the oracle text wins. Falls back to the name
    /// extracted from the oracle text.
    pub fn partner_with_name(&self) -> Option<String> {
        let from_text = partner_with_from_text(&self.oracle());
        let linked: Vec<&RelatedCard> = self
            .all_parts
            .iter()
            .filter(|p| p.name != self.name && p.type_line.contains("Legendary"))
            .collect();

        if let Some(name) = &from_text {
            if linked.iter().any(|p| &p.name == name) {
                return Some(name.clone());
            }
        }
        linked.first().map(|p| p.name.clone()).or(from_text)
    }
}

/// Combined color identity of a card pool; colorless when empty.
pub fn pool_identity(pool: &[Card]) -> ColorIdentity {
    pool.iter()
        .fold(ColorIdentity::COLORLESS, |acc, c| acc.union(c.color_identity))
}

static PARTNER_WITH_RE: OnceLock<Regex> = OnceLock::new();

fn partner_with_from_text(oracle: &str) -> Option<String> {
    let re = PARTNER_WITH_RE
        .get_or_init(|| Regex::new(r"(?m)Partner with ([^\n(]+?)\s*(?:\(|$)").unwrap());
    re.captures(oracle)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}
