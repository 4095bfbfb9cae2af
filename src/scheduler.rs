//! Adaptive word selection and mastery updates.
//!
//! Selection prefers words not shown within the last `min_gap` resolved
//! answers; when every unmastered word was shown recently it falls back to
//! the full unmastered set, so the drill never stalls. Ties are broken
//! uniformly at random so the ordering cannot be memorized positionally.

use crate::catalog::WordCatalog;
use crate::models::{MasteryStats, UserProgress, WordId, WordItem};
use chrono::Utc;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;

pub struct Scheduler {
    target_count: u32,
    min_gap: u64,
    rng: StdRng,
}

impl Scheduler {
    pub fn new(target_count: u32, min_gap: u64) -> Self {
        Self {
            target_count,
            min_gap,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic scheduler for tests.
    pub fn with_seed(target_count: u32, min_gap: u64, seed: u64) -> Self {
        Self {
            target_count,
            min_gap,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn target_count(&self) -> u32 {
        self.target_count
    }

    /// Pick the next word to drill, or `None` once every word is mastered.
    pub fn next_item<'a>(
        &mut self,
        catalog: &'a WordCatalog,
        progress: &UserProgress,
    ) -> Option<&'a WordItem> {
        let eligible: Vec<&WordItem> = catalog
            .items()
            .iter()
            .filter(|item| !self.is_mastered(progress, item.id))
            .collect();
        if eligible.is_empty() {
            return None;
        }

        let spaced: Vec<&WordItem> = eligible
            .iter()
            .copied()
            .filter(|item| self.gap_satisfied(progress, item.id))
            .collect();

        let pool = if spaced.is_empty() { &eligible } else { &spaced };
        pool.choose(&mut self.rng).copied()
    }

    /// Apply one resolved answer: adjust the mastery count, stamp the word as
    /// seen, and advance the global answer counter. One transition per
    /// resolved answer, never per attempt.
    pub fn record_answer(&self, progress: &mut UserProgress, id: WordId, correct: bool) {
        let index = progress.current_index;
        let record = progress.mastery.entry(id).or_default();
        if correct {
            record.bump(self.target_count);
        } else {
            record.drop_one();
        }
        record.last_seen_index = Some(index);
        progress.current_index += 1;
        progress.last_update = Utc::now();
    }

    /// True once every catalog word has reached the mastery target.
    pub fn is_finished(&self, catalog: &WordCatalog, progress: &UserProgress) -> bool {
        catalog
            .items()
            .iter()
            .all(|item| self.is_mastered(progress, item.id))
    }

    /// Zero every mastery count and clear seen indices. The answer counter is
    /// never rewound; cleared indices re-arm the spacing rule on their own.
    pub fn reset(&self, progress: &mut UserProgress) {
        for record in progress.mastery.values_mut() {
            record.count = 0;
            record.last_seen_index = None;
        }
        progress.last_update = Utc::now();
    }

    pub fn stats(&self, catalog: &WordCatalog, progress: &UserProgress) -> MasteryStats {
        let mut per_level = vec![0usize; self.target_count as usize + 1];
        let mut total_count = 0u64;
        for item in catalog.items() {
            let count = progress
                .mastery
                .get(&item.id)
                .map_or(0, |r| r.count.min(self.target_count));
            per_level[count as usize] += 1;
            total_count += u64::from(count);
        }

        let total_items = catalog.len();
        let percent = if total_items == 0 || self.target_count == 0 {
            0.0
        } else {
            total_count as f64 / (total_items as f64 * f64::from(self.target_count)) * 100.0
        };

        MasteryStats {
            total_items,
            per_level,
            percent,
        }
    }

    fn is_mastered(&self, progress: &UserProgress, id: WordId) -> bool {
        progress
            .mastery
            .get(&id)
            .map_or(false, |r| r.count >= self.target_count)
    }

    fn gap_satisfied(&self, progress: &UserProgress, id: WordId) -> bool {
        match progress.mastery.get(&id).and_then(|r| r.last_seen_index) {
            None => true,
            Some(seen) => progress.current_index.saturating_sub(seen) >= self.min_gap,
        }
    }
}
