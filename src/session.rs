//! Drill session state machine.
//!
//! Explicit states driven by discrete input events; no hidden globals and no
//! timing. The between-card pause lives in the app layer.

use crate::catalog::WordCatalog;
use crate::models::{MasteryStats, UserProgress, WordItem};
use crate::scheduler::Scheduler;

/// Wrong answers allowed before a card resolves against the user.
pub const MAX_WRONG_ATTEMPTS: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrillState {
    /// Waiting for the scheduler to produce a card.
    AwaitingItem,
    /// A card is up; waiting for a typed answer.
    AwaitingAnswer,
    /// Last attempt was wrong; banner and hint are showing.
    ShowingError,
    /// Every word mastered; only a restart leaves this state.
    Finished,
}

/// Outcome of one answer submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Matched; the card resolved in the user's favor.
    Correct,
    /// Wrong with attempts remaining; same card stays up.
    Retry { hint: String },
    /// Wrong twice; answer revealed, card resolved against the user.
    Revealed { answer: String },
    /// Empty input, or a state that takes no answers.
    Ignored,
}

pub struct Session {
    state: DrillState,
    current_item: Option<WordItem>,
    wrong_attempts: u8,
    hint: Option<String>,
    last_answered: Option<WordItem>,
    show_last: bool,
}

/// Everything the renderer needs for one frame of the drill.
#[derive(Debug, Clone)]
pub struct CardView {
    pub state: DrillState,
    pub item: Option<WordItem>,
    pub hint: Option<String>,
    pub show_error: bool,
    /// The previous card with its answer, when toggled on.
    pub last_card: Option<WordItem>,
    pub stats: MasteryStats,
}

impl Session {
    pub fn new() -> Self {
        Self {
            state: DrillState::AwaitingItem,
            current_item: None,
            wrong_attempts: 0,
            hint: None,
            last_answered: None,
            show_last: false,
        }
    }

    pub fn state(&self) -> DrillState {
        self.state
    }

    pub fn current_item(&self) -> Option<&WordItem> {
        self.current_item.as_ref()
    }

    pub fn last_answered(&self) -> Option<&WordItem> {
        self.last_answered.as_ref()
    }

    /// Pull the next card from the scheduler, or finish the drill.
    pub fn advance(
        &mut self,
        scheduler: &mut Scheduler,
        catalog: &WordCatalog,
        progress: &UserProgress,
    ) {
        match scheduler.next_item(catalog, progress) {
            Some(item) => {
                self.current_item = Some(item.clone());
                self.wrong_attempts = 0;
                self.hint = None;
                self.state = DrillState::AwaitingAnswer;
            }
            None => {
                self.current_item = None;
                self.state = DrillState::Finished;
            }
        }
    }

    /// Handle a typed answer. Only resolved answers (correct, or the second
    /// wrong attempt) touch the scheduler; a first wrong attempt keeps the
    /// same card up with a hint.
    pub fn submit(
        &mut self,
        text: &str,
        scheduler: &mut Scheduler,
        progress: &mut UserProgress,
    ) -> Submission {
        if self.state != DrillState::AwaitingAnswer {
            return Submission::Ignored;
        }
        if text.trim().is_empty() {
            return Submission::Ignored;
        }
        let Some(item) = self.current_item.clone() else {
            return Submission::Ignored;
        };

        if normalize(text) == normalize(&item.target_answer) {
            scheduler.record_answer(progress, item.id, true);
            self.resolve(item);
            Submission::Correct
        } else {
            self.wrong_attempts += 1;
            if self.wrong_attempts < MAX_WRONG_ATTEMPTS {
                let hint = partial_hint(&item.target_answer, self.wrong_attempts);
                self.hint = Some(hint.clone());
                self.state = DrillState::ShowingError;
                Submission::Retry { hint }
            } else {
                scheduler.record_answer(progress, item.id, false);
                let answer = item.target_answer.clone();
                self.resolve(item);
                Submission::Revealed { answer }
            }
        }
    }

    /// Dismiss the error banner and take another attempt at the same card.
    pub fn acknowledge_error(&mut self) {
        if self.state == DrillState::ShowingError {
            self.state = DrillState::AwaitingAnswer;
        }
    }

    /// Start the word set over. Only honored once the drill has finished.
    pub fn restart(
        &mut self,
        scheduler: &mut Scheduler,
        catalog: &WordCatalog,
        progress: &mut UserProgress,
    ) {
        if self.state != DrillState::Finished {
            return;
        }
        scheduler.reset(progress);
        self.last_answered = None;
        self.show_last = false;
        self.advance(scheduler, catalog, progress);
    }

    /// Flip the previous-card view. Read-only with respect to scheduling.
    pub fn toggle_last_card(&mut self) {
        if self.last_answered.is_some() {
            self.show_last = !self.show_last;
        }
    }

    pub fn view(
        &self,
        scheduler: &Scheduler,
        catalog: &WordCatalog,
        progress: &UserProgress,
    ) -> CardView {
        CardView {
            state: self.state,
            item: self.current_item.clone(),
            hint: self.hint.clone(),
            show_error: self.state == DrillState::ShowingError,
            last_card: if self.show_last {
                self.last_answered.clone()
            } else {
                None
            },
            stats: scheduler.stats(catalog, progress),
        }
    }

    fn resolve(&mut self, item: WordItem) {
        self.last_answered = Some(item);
        self.current_item = None;
        self.wrong_attempts = 0;
        self.hint = None;
        self.state = DrillState::AwaitingItem;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Trimmed, case-folded comparison form.
fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// First `shown` characters of the answer.
fn partial_hint(answer: &str, shown: u8) -> String {
    answer.chars().take(shown as usize).collect()
}
