//! Durable per-user mastery records.
//!
//! One JSON document per user. Writes are whole-record replacements via a
//! temp file and rename, so a crash mid-write never corrupts committed state.

use crate::catalog::WordCatalog;
use crate::models::{MasteryRecord, UserProgress};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt progress record: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("no progress record for user '{0}'")]
    UserNotFound(String),
    #[error("progress for user '{0}' advanced on disk; refusing stale write")]
    StaleWrite(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

pub struct ProgressStore {
    root: PathBuf,
}

impl ProgressStore {
    pub fn open(root: PathBuf) -> StoreResult<Self> {
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn user_path(&self, user: &str) -> PathBuf {
        self.root.join(format!("{}.json", user))
    }

    /// Idempotently create the user's record, with one zeroed mastery entry
    /// per catalog item. Words added to the catalog later get their entry on
    /// the next call; existing entries are never touched.
    pub fn ensure(&self, user: &str, catalog: &WordCatalog) -> StoreResult<()> {
        let (mut progress, existed) = match self.load(user) {
            Ok(p) => (p, true),
            Err(StoreError::UserNotFound(_)) => (UserProgress::new(), false),
            Err(e) => return Err(e),
        };

        let mut added = false;
        for item in catalog.items() {
            if !progress.mastery.contains_key(&item.id) {
                progress.mastery.insert(item.id, MasteryRecord::default());
                added = true;
            }
        }

        if !existed || added {
            self.write(user, &progress)?;
        }
        Ok(())
    }

    /// Load the user's full record. Corrupt JSON surfaces as an error rather
    /// than an empty record, so data loss is never masked.
    pub fn load(&self, user: &str) -> StoreResult<UserProgress> {
        let text = match fs::read_to_string(self.user_path(user)) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::UserNotFound(user.to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&text)?)
    }

    /// Persist the full record. Refuses to clobber a record whose answer
    /// counter has moved past the one being written (lost-update guard for a
    /// second session on the same user).
    pub fn save(&self, user: &str, progress: &UserProgress) -> StoreResult<()> {
        match self.load(user) {
            Ok(on_disk) if on_disk.current_index > progress.current_index => {
                return Err(StoreError::StaleWrite(user.to_string()));
            }
            Ok(_) | Err(StoreError::UserNotFound(_)) => {}
            Err(e) => return Err(e),
        }
        self.write(user, progress)
    }

    fn write(&self, user: &str, progress: &UserProgress) -> StoreResult<()> {
        let path = self.user_path(user);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(progress)?)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WordItem;
    use tempfile::TempDir;

    fn item(word: &str) -> WordItem {
        let sentence = format!("Dice ___ cada dia. ({})", word);
        WordItem {
            id: WordItem::derive_id(word, &sentence),
            prompt_sentence: sentence,
            target_answer: word.to_string(),
            translation: format!("{}-en", word),
            gloss: "noun".to_string(),
            example_sentence: format!("Says {} every day.", word),
        }
    }

    fn catalog(words: &[&str]) -> WordCatalog {
        WordCatalog::from_items(words.iter().map(|w| item(w)).collect())
    }

    #[test]
    fn test_ensure_creates_zeroed_records() {
        let dir = TempDir::new().unwrap();
        let store = ProgressStore::open(dir.path().to_path_buf()).unwrap();
        let catalog = catalog(&["uno", "dos"]);

        store.ensure("alice", &catalog).unwrap();
        let progress = store.load("alice").unwrap();

        assert_eq!(progress.mastery.len(), 2);
        assert_eq!(progress.current_index, 0);
        assert!(progress
            .mastery
            .values()
            .all(|r| r.count == 0 && r.last_seen_index.is_none()));
    }

    #[test]
    fn test_ensure_is_idempotent_and_syncs_new_words() {
        let dir = TempDir::new().unwrap();
        let store = ProgressStore::open(dir.path().to_path_buf()).unwrap();
        let small = catalog(&["uno"]);

        store.ensure("alice", &small).unwrap();
        let mut progress = store.load("alice").unwrap();
        let id = small.items()[0].id;
        progress.mastery.get_mut(&id).unwrap().count = 2;
        progress.current_index = 7;
        store.save("alice", &progress).unwrap();

        // Re-ensure with a grown catalog: existing entries untouched,
        // new word added zeroed.
        let grown = catalog(&["uno", "dos"]);
        store.ensure("alice", &grown).unwrap();
        let progress = store.load("alice").unwrap();
        assert_eq!(progress.mastery.len(), 2);
        assert_eq!(progress.mastery[&id].count, 2);
        assert_eq!(progress.current_index, 7);
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = ProgressStore::open(dir.path().to_path_buf()).unwrap();
        let catalog = catalog(&["uno", "dos", "tres"]);

        store.ensure("bob", &catalog).unwrap();
        let mut progress = store.load("bob").unwrap();
        progress.current_index = 42;
        for (i, record) in progress.mastery.values_mut().enumerate() {
            record.count = i as u32;
            record.last_seen_index = Some(i as u64 * 3);
        }

        store.save("bob", &progress).unwrap();
        assert_eq!(store.load("bob").unwrap(), progress);
    }

    #[test]
    fn test_load_unknown_user() {
        let dir = TempDir::new().unwrap();
        let store = ProgressStore::open(dir.path().to_path_buf()).unwrap();
        assert!(matches!(
            store.load("nobody"),
            Err(StoreError::UserNotFound(_))
        ));
    }

    #[test]
    fn test_corrupt_record_is_not_silently_reset() {
        let dir = TempDir::new().unwrap();
        let store = ProgressStore::open(dir.path().to_path_buf()).unwrap();
        fs::write(dir.path().join("carol.json"), "{ not json").unwrap();

        assert!(matches!(store.load("carol"), Err(StoreError::Corrupt(_))));

        // ensure must not paper over the corrupt record either
        let catalog = catalog(&["uno"]);
        assert!(store.ensure("carol", &catalog).is_err());
    }

    #[test]
    fn test_stale_write_refused() {
        let dir = TempDir::new().unwrap();
        let store = ProgressStore::open(dir.path().to_path_buf()).unwrap();
        let catalog = catalog(&["uno"]);
        store.ensure("dave", &catalog).unwrap();

        let stale = store.load("dave").unwrap();
        let mut fresh = stale.clone();
        fresh.current_index = 5;
        store.save("dave", &fresh).unwrap();

        assert!(matches!(
            store.save("dave", &stale),
            Err(StoreError::StaleWrite(_))
        ));
        // the advanced record survives intact
        assert_eq!(store.load("dave").unwrap().current_index, 5);
    }
}
