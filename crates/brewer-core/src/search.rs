use crate::error::{BrewError, Result};
use tantivy::{
    collector::TopDocs,
    query::{BooleanQuery, FuzzyTermQuery, Occur, Query, TermQuery},
    schema::{Field, IndexRecordOption, Schema, Value, STORED, TEXT},
    Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument, Term,
};

#[derive(Debug, Clone, PartialEq)]
pub struct NameMatch {
    pub name: String,
    pub score: f32,
}

/// In-RAM fuzzy index over card names.
///
/// Every token of the query must match a token of the name, allowing one edit
/// for tokens of four or more characters and two edits from eight.
pub struct NameIndex {
    reader: IndexReader,
    name: Field,
    len: usize,
}

impl NameIndex {
    pub fn build<'a>(names: impl IntoIterator<Item = &'a str>) -> Result<Self> {
        let mut builder = Schema::builder();
        let name = builder.add_text_field("name", TEXT | STORED);
        let index = Index::create_in_ram(builder.build());

        let mut writer: IndexWriter = index
            .writer(15_000_000)
            .map_err(|e| BrewError::Search(e.to_string()))?;

        let mut len = 0;
        for n in names {
            let mut doc = TantivyDocument::default();
            doc.add_text(name, n);
            writer
                .add_document(doc)
                .map_err(|e| BrewError::Search(e.to_string()))?;
            len += 1;
        }
        writer
            .commit()
            .map_err(|e| BrewError::Search(e.to_string()))?;

        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()
            .map_err(|e: tantivy::TantivyError| BrewError::Search(e.to_string()))?;

        Ok(Self { reader, name, len })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Best matches for `query`, highest score first.
    pub fn lookup(&self, query: &str, limit: usize) -> Result<Vec<NameMatch>> {
        let tokens = tokenize(query);
        if tokens.is_empty() {
            return Ok(vec![]);
        }

        // Fuzzy terms gate the match; exact terms rank closer names first.
        let mut clauses: Vec<(Occur, Box<dyn Query>)> = Vec::with_capacity(tokens.len() * 2);
        for token in &tokens {
            let term = Term::from_field_text(self.name, token);
            clauses.push((
                Occur::Must,
                Box::new(FuzzyTermQuery::new(term.clone(), edit_distance(token), true)) as Box<dyn Query>,
            ));
            clauses.push((
                Occur::Should,
                Box::new(TermQuery::new(term, IndexRecordOption::WithFreqs)) as Box<dyn Query>,
            ));
        }

        let searcher = self.reader.searcher();
        let top_docs = searcher
            .search(&BooleanQuery::new(clauses), &TopDocs::with_limit(limit))
            .map_err(|e| BrewError::Search(e.to_string()))?;

        let mut out = Vec::with_capacity(top_docs.len());
        for (score, addr) in top_docs {
            let doc: TantivyDocument = searcher
                .doc(addr)
                .map_err(|e| BrewError::Search(e.to_string()))?;
            if let Some(name) = doc.get_first(self.name).and_then(|v| v.as_str()) {
                out.push(NameMatch {
                    name: name.to_string(),
                    score,
                });
            }
        }
        Ok(out)
    }

    /// The single best match, if any.
    pub fn best(&self, query: &str) -> Result<Option<String>> {
        Ok(self.lookup(query, 1)?.into_iter().next().map(|m| m.name))
    }
}

// Mirrors tantivy's default tokenizer: split on non-alphanumerics, lowercase.
fn tokenize(s: &str) -> Vec<String> {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn edit_distance(token: &str) -> u8 {
    match token.chars().count() {
        0..=3 => 0,
        4..=7 => 1,
        _ => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> NameIndex {
        NameIndex::build([
            "Kaalia of the Vast",
            "Atraxa, Praetors' Voice",
            "Sol Ring",
            "Solemn Simulacrum",
            "Jötun Grunt",
        ])
        .unwrap()
    }

    #[test]
    fn exact_tokens_match() {
        assert_eq!(index().best("sol ring").unwrap().as_deref(), Some("Sol Ring"));
    }

    #[test]
    fn tolerates_typos_in_long_tokens() {
        let idx = index();
        assert_eq!(idx.best("Kalia of the Vast").unwrap().as_deref(), Some("Kaalia of the Vast"));
        assert_eq!(idx.best("atraxa praetor voice").unwrap().as_deref(), Some("Atraxa, Praetors' Voice"));
    }

    #[test]
    fn exact_spelling_ranks_first() {
        let idx = NameIndex::build(["Sol Ring", "Sol Rings"]).unwrap();
        assert_eq!(idx.best("sol ring").unwrap().as_deref(), Some("Sol Ring"));
    }

    #[test]
    fn short_tokens_must_be_exact() {
        assert!(index().best("sal ring").unwrap().is_none());
    }

    #[test]
    fn all_tokens_required() {
        assert!(index().best("kaalia ring").unwrap().is_none());
    }

    #[test]
    fn blank_query_matches_nothing() {
        assert!(index().lookup("  ,, ", 5).unwrap().is_empty());
    }

    #[test]
    fn counts_documents() {
        let idx = index();
        assert_eq!(idx.len(), 5);
        assert!(!idx.is_empty());
        assert!(NameIndex::build(std::iter::empty()).unwrap().is_empty());
    }

    #[test]
    fn distance_grows_with_length() {
        assert_eq!(edit_distance("sol"), 0);
        assert_eq!(edit_distance("ring"), 1);
        assert_eq!(edit_distance("praetors"), 2);
    }
}
