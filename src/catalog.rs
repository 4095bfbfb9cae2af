//! Word catalog loaded from a CSV file.

use crate::models::{WordId, WordItem};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// Marker for the gap in a prompt sentence.
pub const BLANK_MARKER: &str = "___";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog unreadable: {0}")]
    Csv(#[from] csv::Error),
    #[error("catalog row {line}: missing or empty field '{field}'")]
    MissingField { line: u64, field: &'static str },
    #[error("catalog row {line}: sentence has no '___' blank marker")]
    MissingBlank { line: u64 },
    #[error("catalog row {line}: duplicate entry for '{word}'")]
    Duplicate { line: u64, word: String },
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// One CSV row, before validation.
#[derive(Debug, Deserialize)]
struct CatalogRow {
    word: String,
    sentence: String,
    translation: String,
    gloss: String,
    sentence_translation: String,
}

impl CatalogRow {
    fn into_item(self, line: u64) -> CatalogResult<WordItem> {
        let required = [
            ("word", &self.word),
            ("sentence", &self.sentence),
            ("translation", &self.translation),
            ("gloss", &self.gloss),
            ("sentence_translation", &self.sentence_translation),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(CatalogError::MissingField { line, field });
            }
        }
        if !self.sentence.contains(BLANK_MARKER) {
            return Err(CatalogError::MissingBlank { line });
        }

        Ok(WordItem {
            id: WordItem::derive_id(&self.word, &self.sentence),
            prompt_sentence: self.sentence,
            target_answer: self.word,
            translation: self.translation,
            gloss: self.gloss,
            example_sentence: self.sentence_translation,
        })
    }
}

/// The immutable master word list, shared read-only for the life of the process.
#[derive(Debug, Clone)]
pub struct WordCatalog {
    items: Vec<WordItem>,
}

impl WordCatalog {
    /// Load and validate the whole catalog. Any malformed row fails the load;
    /// there is no partial catalog.
    pub fn load(path: &Path) -> CatalogResult<Self> {
        let mut reader = csv::Reader::from_path(path)?;
        let mut items = Vec::new();
        let mut seen = HashSet::new();

        for (i, row) in reader.deserialize::<CatalogRow>().enumerate() {
            let line = i as u64 + 2; // line 1 is the header
            let item = row?.into_item(line)?;
            if !seen.insert(item.id) {
                return Err(CatalogError::Duplicate {
                    line,
                    word: item.target_answer,
                });
            }
            items.push(item);
        }

        Ok(Self { items })
    }

    /// Build a catalog directly from items.
    pub fn from_items(items: Vec<WordItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[WordItem] {
        &self.items
    }

    pub fn get(&self, id: WordId) -> Option<&WordItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    const HEADER: &str = "word,sentence,translation,gloss,sentence_translation\n";

    #[test]
    fn test_load_valid_catalog() {
        let file = write_csv(&format!(
            "{}perro,El ___ ladra.,dog,noun,The dog barks.\n\
             gato,El ___ duerme.,cat,noun,The cat sleeps.\n",
            HEADER
        ));
        let catalog = WordCatalog::load(file.path()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.items()[0].target_answer, "perro");
        assert_eq!(catalog.items()[0].example_sentence, "The dog barks.");

        let id = catalog.items()[1].id;
        assert_eq!(catalog.get(id).unwrap().target_answer, "gato");
    }

    #[test]
    fn test_ids_stable_across_loads() {
        let content = format!("{}perro,El ___ ladra.,dog,noun,The dog barks.\n", HEADER);
        let first = WordCatalog::load(write_csv(&content).path()).unwrap();
        let second = WordCatalog::load(write_csv(&content).path()).unwrap();
        assert_eq!(first.items()[0].id, second.items()[0].id);
    }

    #[test]
    fn test_empty_field_fails_whole_load() {
        let file = write_csv(&format!(
            "{}perro,El ___ ladra.,dog,noun,The dog barks.\n\
             gato,El ___ duerme.,,noun,The cat sleeps.\n",
            HEADER
        ));
        let err = WordCatalog::load(file.path()).unwrap_err();
        match err {
            CatalogError::MissingField { line, field } => {
                assert_eq!(line, 3);
                assert_eq!(field, "translation");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_sentence_without_blank_is_malformed() {
        let file = write_csv(&format!("{}perro,El perro ladra.,dog,noun,The dog barks.\n", HEADER));
        assert!(matches!(
            WordCatalog::load(file.path()),
            Err(CatalogError::MissingBlank { line: 2 })
        ));
    }

    #[test]
    fn test_duplicate_row_rejected() {
        let file = write_csv(&format!(
            "{}perro,El ___ ladra.,dog,noun,The dog barks.\n\
             perro,El ___ ladra.,dog,noun,The dog barks.\n",
            HEADER
        ));
        assert!(matches!(
            WordCatalog::load(file.path()),
            Err(CatalogError::Duplicate { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(WordCatalog::load(Path::new("/nonexistent/words.csv")).is_err());
    }
}
