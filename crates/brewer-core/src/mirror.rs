//! Local SQLite copy of Scryfall's "oracle cards" bulk file.
//!
//! The mirror answers the same questions as the remote API (card by name,
//! structured search) so the whole brew can run offline.

use crate::card::{Card, CardFace, RelatedCard};
use crate::color::ColorIdentity;
use crate::error::{BrewError, Result};
use crate::rules::{CardQuery, IdentityFilter};
use crate::search::NameIndex;
use chrono::{DateTime, Utc};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{BufReader, Read};
use std::path::Path;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS cards (
    name             TEXT PRIMARY KEY,
    color_identity   TEXT NOT NULL,
    type_line        TEXT NOT NULL,
    oracle_text      TEXT NOT NULL,
    commander_legal  INTEGER NOT NULL,
    can_be_commander INTEGER NOT NULL,
    edhrec_rank      INTEGER,
    related_json     TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS meta (
    key   TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
";

const COLUMNS: &str = "name, color_identity, type_line, oracle_text, commander_legal, \
                       can_be_commander, edhrec_rank, related_json";

/// Card parts that have no column of their own.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Related {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    card_faces: Vec<CardFace>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    all_parts: Vec<RelatedCard>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MirrorInfo {
    pub cards: usize,
    pub imported_at: Option<DateTime<Utc>>,
}

pub struct Mirror {
    conn: Connection,
    names: Option<NameIndex>,
}

impl Mirror {
    /// Open (or create) the mirror database at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        crate::io::ensure_parent(path)?;
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn, names: None })
    }

    // -----------------------------------------------------------------------
    // Import
    // -----------------------------------------------------------------------

    /// Replace the mirror's contents with a Scryfall bulk JSON array.
    /// Returns the number of distinct card names stored.
    pub fn import_json<R: Read>(&mut self, reader: R) -> Result<usize> {
        let cards: Vec<Card> = serde_json::from_reader(BufReader::new(reader))?;
        tracing::debug!(records = cards.len(), "parsed bulk file");

        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM cards", [])?;
        {
            // A legal printing replaces an illegal record of the same name
            // (tokens share names with real cards).
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO cards ({COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                 ON CONFLICT(name) DO UPDATE SET
                     color_identity = excluded.color_identity,
                     type_line = excluded.type_line,
                     oracle_text = excluded.oracle_text,
                     commander_legal = excluded.commander_legal,
                     can_be_commander = excluded.can_be_commander,
                     edhrec_rank = excluded.edhrec_rank,
                     related_json = excluded.related_json
                 WHERE excluded.commander_legal > cards.commander_legal"
            ))?;
            for card in &cards {
                let related = serde_json::to_string(&Related {
                    card_faces: card.card_faces.clone(),
                    all_parts: card.all_parts.clone(),
                })?;
                let oracle = card.oracle().into_owned();
                stmt.execute(params![
                    card.name,
                    card.color_identity.letters(),
                    card.type_line,
                    oracle,
                    card.is_commander_legal(),
                    card.can_be_commander(),
                    card.edhrec_rank,
                    related,
                ])?;
            }
        }
        let count: usize = tx.query_row("SELECT COUNT(*) FROM cards", [], |r| r.get(0))?;
        tx.execute(
            "INSERT OR REPLACE INTO meta (key, value) VALUES ('imported_at', ?1)",
            params![Utc::now().to_rfc3339()],
        )?;
        tx.commit()?;

        self.names = None;
        tracing::info!(cards = count, "mirror import complete");
        Ok(count)
    }

    pub fn info(&self) -> Result<MirrorInfo> {
        let imported_at: Option<String> = self
            .conn
            .query_row("SELECT value FROM meta WHERE key = 'imported_at'", [], |r| r.get(0))
            .optional()?;
        Ok(MirrorInfo {
            cards: self.count()?,
            imported_at: imported_at
                .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
                .map(|d| d.with_timezone(&Utc)),
        })
    }

    pub fn count(&self) -> Result<usize> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM cards", [], |r| r.get(0))?)
    }

    fn ensure_populated(&self) -> Result<()> {
        if self.count()? == 0 {
            return Err(BrewError::MirrorEmpty);
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Card by exact name.
    pub fn get(&self, name: &str) -> Result<Option<Card>> {
        let sql = format!("SELECT {COLUMNS} FROM cards WHERE name = ?1");
        let row = self
            .conn
            .query_row(&sql, params![name], read_row)
            .optional()?;
        row.transpose()
    }

    pub fn names(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT name FROM cards ORDER BY name")?;
        let names = stmt
            .query_map([], |r| r.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(names)
    }

    /// Run a structured search, most popular first.
    pub fn search(&self, query: &CardQuery) -> Result<Vec<Card>> {
        self.ensure_populated()?;

        let mut clauses: Vec<&str> = Vec::new();
        let mut args: Vec<String> = Vec::new();
        if let IdentityFilter::AtLeast(id) = query.identity {
            for color in id.colors() {
                clauses.push("color_identity LIKE ?");
                args.push(format!("%{}%", color.symbol()));
            }
        }
        if query.commander_legal {
            clauses.push("commander_legal = 1");
        }
        if query.commander_eligible {
            clauses.push("can_be_commander = 1");
        }
        for t in &query.types {
            clauses.push(r"type_line LIKE ? ESCAPE '\'");
            args.push(format!("%{}%", like_escape(t)));
        }
        for o in &query.oracle {
            clauses.push(r"oracle_text LIKE ? ESCAPE '\'");
            args.push(format!("%{}%", like_escape(o)));
        }
        for o in &query.oracle_excludes {
            clauses.push(r"oracle_text NOT LIKE ? ESCAPE '\'");
            args.push(format!("%{}%", like_escape(o)));
        }

        let filter = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };
        let sql = format!(
            "SELECT {COLUMNS} FROM cards {filter}
             ORDER BY edhrec_rank IS NULL, edhrec_rank, name"
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(args.iter()), read_row)?;
        let mut out = Vec::new();
        for row in rows {
            let card = row??;
            // LIKE is looser than the in-memory predicate (case, wildcards).
            if query.matches(&card) {
                out.push(card);
            }
        }
        tracing::debug!(query = %query.to_scryfall(), hits = out.len(), "mirror search");
        Ok(out)
    }

    /// Resolve a typed name: exact (case-insensitive), then front face of a
    /// multi-faced card, then fuzzy.
    pub fn lookup(&mut self, name: &str) -> Result<Option<Card>> {
        self.ensure_populated()?;
        let name = name.trim();

        let exact = format!("SELECT {COLUMNS} FROM cards WHERE name = ?1 COLLATE NOCASE");
        if let Some(card) = self.conn.query_row(&exact, params![name], read_row).optional()? {
            return card.map(Some);
        }
        let face = format!(r"SELECT {COLUMNS} FROM cards WHERE name LIKE ?1 ESCAPE '\' LIMIT 1");
        let pattern = format!("{} // %", like_escape(name));
        if let Some(card) = self.conn.query_row(&face, params![pattern], read_row).optional()? {
            return card.map(Some);
        }

        if self.names.is_none() {
            let names = self.names()?;
            self.names = Some(NameIndex::build(names.iter().map(String::as_str))?);
        }
        let best = match &self.names {
            Some(index) => index.best(name)?,
            None => None,
        };
        match best {
            Some(found) => {
                tracing::debug!(query = name, found = %found, "fuzzy name match");
                self.get(&found)
            }
            None => Ok(None),
        }
    }
}

/// Make `%`, `_` and `\` literal inside a `LIKE ... ESCAPE '\'` pattern.
fn like_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<Result<Card>> {
    Ok(card_from_row(row))
}

fn card_from_row(row: &Row<'_>) -> Result<Card> {
    let identity: String = row.get(1)?;
    let legal: bool = row.get(4)?;
    let related: Related = serde_json::from_str(&row.get::<_, String>(7)?)?;

    let mut legalities = BTreeMap::new();
    legalities.insert(
        "commander".to_string(),
        if legal { "legal" } else { "not_legal" }.to_string(),
    );
    Ok(Card {
        name: row.get(0)?,
        color_identity: identity.parse::<ColorIdentity>()?,
        type_line: row.get(2)?,
        oracle_text: row.get(3)?,
        card_faces: related.card_faces,
        legalities,
        all_parts: related.all_parts,
        edhrec_rank: row.get(6)?,
    })
}
