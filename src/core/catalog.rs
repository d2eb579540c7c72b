/// Quote catalog: loading literary quotes from CSV and theme queries.

use rustc_hash::FxHashSet;
use std::io::{self, Read};
use std::path::Path;
use thiserror::Error;

use crate::schema::quote::Quote;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// The in-memory quote store. Built once and only read afterwards, so it can
/// be shared freely between selectors and threads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuoteCatalog {
    quotes: Vec<Quote>,
}

impl QuoteCatalog {
    pub fn new(quotes: Vec<Quote>) -> Self {
        Self { quotes }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Load the catalog from a CSV file, degrading to an empty catalog on
    /// any failure. A missing file is expected during early content work and
    /// only warns; anything else is logged as an error. The game stays
    /// playable either way, with empty choice lists.
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(catalog) => {
                tracing::debug!(
                    path = %path.display(),
                    quotes = catalog.len(),
                    "loaded quote catalog"
                );
                catalog
            }
            Err(CatalogError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "quote catalog not found, starting empty");
                Self::empty()
            }
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "failed to read quote catalog, starting empty");
                Self::empty()
            }
        }
    }

    /// Load the catalog from a CSV file, reporting the first failure.
    pub fn try_load(path: &Path) -> Result<Self, CatalogError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Parse a catalog from CSV text.
    pub fn parse_csv(input: &str) -> Result<Self, CatalogError> {
        Self::from_reader(input.as_bytes())
    }

    /// Read every record from a CSV source. Each record must carry all the
    /// quote columns; the first bad record fails the whole read.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let mut quotes = Vec::new();
        for record in csv_reader.deserialize() {
            let quote: Quote = record?;
            quotes.push(quote);
        }
        Ok(Self { quotes })
    }

    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// All usable quotes filed under `theme`, in load order.
    pub fn filter_by_theme(&self, theme: &str) -> Vec<&Quote> {
        self.quotes
            .iter()
            .filter(|q| q.is_eligible_for(theme))
            .collect()
    }

    /// Distinct `(work_id, work_title)` pairs, in first-seen order.
    pub fn works(&self) -> Vec<(&str, &str)> {
        let mut seen = FxHashSet::default();
        self.quotes
            .iter()
            .filter(|q| seen.insert(q.work_id.as_str()))
            .map(|q| (q.work_id.as_str(), q.work_title.as_str()))
            .collect()
    }

    /// Distinct themes across all quotes (usable or not), in first-seen order.
    pub fn themes(&self) -> Vec<&str> {
        let mut seen = FxHashSet::default();
        self.quotes
            .iter()
            .map(|q| q.theme_tags.as_str())
            .filter(|t| seen.insert(*t))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
text,work_id,work_title,mood,theme_tags,allow_use
メロスは激怒した。,hashire,走れメロス,angry,友情,True
私は淋しい人間です。,kokoro,こころ,melancholic,孤独,True
檸檬などごくありふれている。,lemon,檸檬,calm,芸術,False
私は、信頼されている。,hashire,走れメロス,hopeful,友情,True
";

    #[test]
    fn parse_reads_every_record() {
        let catalog = QuoteCatalog::parse_csv(SAMPLE).unwrap();
        assert_eq!(catalog.len(), 4);
        let first = &catalog.quotes()[0];
        assert_eq!(first.work_id, "hashire");
        assert_eq!(first.work_title, "走れメロス");
        assert_eq!(first.theme_tags, "友情");
        assert!(first.allow_use);
        assert!(!catalog.quotes()[2].allow_use);
    }

    #[test]
    fn filter_by_theme_keeps_load_order() {
        let catalog = QuoteCatalog::parse_csv(SAMPLE).unwrap();
        let friendship = catalog.filter_by_theme("友情");
        assert_eq!(friendship.len(), 2);
        assert_eq!(friendship[0].text, "メロスは激怒した。");
        assert_eq!(friendship[1].text, "私は、信頼されている。");
    }

    #[test]
    fn filter_by_theme_skips_disabled_quotes() {
        let catalog = QuoteCatalog::parse_csv(SAMPLE).unwrap();
        assert!(catalog.filter_by_theme("芸術").is_empty());
    }

    #[test]
    fn filter_by_unknown_theme_is_empty() {
        let catalog = QuoteCatalog::parse_csv(SAMPLE).unwrap();
        assert!(catalog.filter_by_theme("絶望").is_empty());
    }

    #[test]
    fn only_exact_true_enables_a_quote() {
        let input = "\
text,work_id,work_title,mood,theme_tags,allow_use
A,a,Work A,calm,孤独,True
B,b,Work B,calm,孤独,true
C,c,Work C,calm,孤独,1
D,d,Work D,calm,孤独,TRUE
";
        let catalog = QuoteCatalog::parse_csv(input).unwrap();
        assert_eq!(catalog.len(), 4);
        let eligible = catalog.filter_by_theme("孤独");
        assert_eq!(eligible.len(), 1);
        assert_eq!(eligible[0].work_id, "a");
    }

    #[test]
    fn missing_column_is_an_error() {
        let input = "text,work_id,work_title,mood,allow_use\nA,a,Work A,calm,True\n";
        assert!(QuoteCatalog::parse_csv(input).is_err());
    }

    #[test]
    fn header_only_is_empty() {
        let input = "text,work_id,work_title,mood,theme_tags,allow_use\n";
        let catalog = QuoteCatalog::parse_csv(input).unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn load_missing_file_degrades_to_empty() {
        let catalog = QuoteCatalog::load(Path::new("tests/fixtures/no_such_quotes.csv"));
        assert!(catalog.is_empty());
    }

    #[test]
    fn try_load_missing_file_reports_not_found() {
        let err = QuoteCatalog::try_load(Path::new("tests/fixtures/no_such_quotes.csv"))
            .unwrap_err();
        assert!(matches!(err, CatalogError::Io(ref e) if e.kind() == io::ErrorKind::NotFound));
    }

    #[test]
    fn load_malformed_file_degrades_to_empty() {
        let catalog = QuoteCatalog::load(Path::new("tests/fixtures/malformed_quotes.csv"));
        assert!(catalog.is_empty());
    }

    #[test]
    fn invalid_utf8_is_an_error() {
        let bytes: &[u8] = b"text,work_id,work_title,mood,theme_tags,allow_use\n\xff\xfe,a,A,calm,x,True\n";
        assert!(QuoteCatalog::from_reader(bytes).is_err());
    }

    #[test]
    fn reload_is_idempotent() {
        let path = Path::new("tests/fixtures/quotes.csv");
        let first = QuoteCatalog::load(path);
        let second = QuoteCatalog::load(path);
        assert!(!first.is_empty());
        assert_eq!(first, second);
    }

    #[test]
    fn works_and_themes_are_distinct_in_first_seen_order() {
        let catalog = QuoteCatalog::parse_csv(SAMPLE).unwrap();
        assert_eq!(
            catalog.works(),
            vec![
                ("hashire", "走れメロス"),
                ("kokoro", "こころ"),
                ("lemon", "檸檬"),
            ]
        );
        assert_eq!(catalog.themes(), vec!["友情", "孤独", "芸術"]);
    }
}
