//! Data models for the vocabulary drill.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Unique identifier of a catalog word, derived from its content.
pub type WordId = Uuid;

/// A single drillable word with its carrier sentence.
///
/// Created once at catalog load and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordItem {
    /// Stable content-derived identifier.
    pub id: WordId,
    /// Sentence shown to the user, containing the blank marker.
    pub prompt_sentence: String,
    /// The word that fills the blank.
    pub target_answer: String,
    /// Translation of the word.
    pub translation: String,
    /// Short usage note (part of speech, register, ...).
    pub gloss: String,
    /// Translation of the carrier sentence.
    pub example_sentence: String,
}

impl WordItem {
    /// Derive the stable id from word and sentence content.
    ///
    /// The same word in a different sentence is a different item.
    pub fn derive_id(word: &str, sentence: &str) -> WordId {
        let name = format!("{}\n{}", word, sentence);
        Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes())
    }
}

/// Per-word mastery state for one user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasteryRecord {
    /// Correct exposures so far, capped at the mastery target.
    pub count: u32,
    /// Value of the global answer counter when this word was last shown.
    pub last_seen_index: Option<u64>,
}

impl MasteryRecord {
    /// One correct answer. Never exceeds `target`.
    pub fn bump(&mut self, target: u32) {
        self.count = (self.count + 1).min(target);
    }

    /// One failed card. Never drops below zero.
    pub fn drop_one(&mut self) {
        self.count = self.count.saturating_sub(1);
    }
}

/// The durable record for one user: mastery map plus the global answer counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProgress {
    pub mastery: BTreeMap<WordId, MasteryRecord>,
    /// Monotonic counter of resolved answers; the logical clock for spacing.
    pub current_index: u64,
    pub last_update: DateTime<Utc>,
}

impl UserProgress {
    pub fn new() -> Self {
        Self {
            mastery: BTreeMap::new(),
            current_index: 0,
            last_update: Utc::now(),
        }
    }
}

impl Default for UserProgress {
    fn default() -> Self {
        Self::new()
    }
}

/// Aggregate mastery counts for display.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MasteryStats {
    pub total_items: usize,
    /// Number of words at each mastery level, index 0 ..= target_count.
    pub per_level: Vec<usize>,
    /// Overall completion, 0.0 ..= 100.0.
    pub percent: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_ids_stable_and_distinct() {
        let a = WordItem::derive_id("perro", "El ___ ladra.");
        let b = WordItem::derive_id("perro", "El ___ ladra.");
        let c = WordItem::derive_id("perro", "Mi ___ duerme.");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_bump_saturates_at_target() {
        let mut record = MasteryRecord::default();
        for _ in 0..10 {
            record.bump(3);
        }
        assert_eq!(record.count, 3);
    }

    #[test]
    fn test_drop_saturates_at_zero() {
        let mut record = MasteryRecord::default();
        record.drop_one();
        assert_eq!(record.count, 0);

        record.bump(3);
        record.drop_one();
        record.drop_one();
        assert_eq!(record.count, 0);
    }
}
