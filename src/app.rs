//! Application state and input handling.

use crate::catalog::WordCatalog;
use crate::config::Config;
use crate::models::UserProgress;
use crate::progress::ProgressStore;
use crate::scheduler::Scheduler;
use crate::session::{CardView, DrillState, Session, Submission};
use anyhow::Context;
use crossterm::event::{KeyCode, KeyEvent};
use std::time::{Duration, Instant};

/// Feedback flashed between cards during the pacing pause.
#[derive(Debug, Clone)]
pub enum Feedback {
    Correct,
    Revealed(String),
}

pub struct App {
    pub config: Config,
    catalog: WordCatalog,
    store: ProgressStore,
    user: String,
    progress: UserProgress,
    scheduler: Scheduler,
    session: Session,
    pub input_buffer: String,
    pub feedback: Option<Feedback>,
    advance_at: Option<Instant>,
    pub message: Option<String>,
    pub show_help: bool,
    should_quit: bool,
}

impl App {
    pub fn new(user: &str) -> anyhow::Result<Self> {
        let config = Config::load();

        let catalog_path = config.catalog_path();
        let catalog = WordCatalog::load(&catalog_path)
            .with_context(|| format!("loading word catalog from {}", catalog_path.display()))?;

        let store = ProgressStore::open(config.progress_dir())?;
        store.ensure(user, &catalog)?;
        let progress = store.load(user)?;

        let scheduler = Scheduler::new(config.study.target_count, config.study.min_gap);

        let mut app = Self {
            config,
            catalog,
            store,
            user: user.to_string(),
            progress,
            scheduler,
            session: Session::new(),
            input_buffer: String::new(),
            feedback: None,
            advance_at: None,
            message: None,
            show_help: false,
            should_quit: false,
        };
        app.session
            .advance(&mut app.scheduler, &app.catalog, &app.progress);
        Ok(app)
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn view(&self) -> CardView {
        self.session
            .view(&self.scheduler, &self.catalog, &self.progress)
    }

    /// Plain 'q' must still be typeable into an answer, and the error banner
    /// promises any key retries the card; 'q' only quits outside those
    /// states (Esc and Ctrl+C always work).
    pub fn can_quit(&self) -> bool {
        !matches!(
            self.session.state(),
            DrillState::AwaitingAnswer | DrillState::ShowingError
        )
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        self.message = None;

        // An open help popup takes the next key, whatever it is.
        if self.show_help {
            self.show_help = false;
            return;
        }

        if key.code == KeyCode::Esc {
            self.should_quit = true;
            return;
        }

        // Between cards: the pacing pause swallows drill input.
        if self.advance_at.is_some() {
            return;
        }

        match self.session.state() {
            DrillState::AwaitingAnswer => self.handle_answer_key(key),
            DrillState::ShowingError => self.session.acknowledge_error(),
            DrillState::Finished => self.handle_finished_key(key),
            DrillState::AwaitingItem => {}
        }
    }

    /// Advance past the between-card pause once its deadline passes. The
    /// next card is only computed here, after the pause completes.
    pub fn tick(&mut self) {
        if let Some(at) = self.advance_at {
            if Instant::now() >= at {
                self.advance_at = None;
                self.feedback = None;
                self.session
                    .advance(&mut self.scheduler, &self.catalog, &self.progress);
            }
        }
    }

    fn handle_answer_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('?') if self.input_buffer.is_empty() => self.show_help = true,
            KeyCode::Tab => self.session.toggle_last_card(),
            KeyCode::Enter => self.submit(),
            KeyCode::Backspace => {
                self.input_buffer.pop();
            }
            KeyCode::Char(c) => self.input_buffer.push(c),
            _ => {}
        }
    }

    fn handle_finished_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('r') => {
                self.session
                    .restart(&mut self.scheduler, &self.catalog, &mut self.progress);
                self.persist();
            }
            KeyCode::Tab => self.session.toggle_last_card(),
            KeyCode::Char('?') => self.show_help = true,
            _ => {}
        }
    }

    fn submit(&mut self) {
        let text = std::mem::take(&mut self.input_buffer);
        match self
            .session
            .submit(&text, &mut self.scheduler, &mut self.progress)
        {
            Submission::Correct => {
                self.persist();
                self.feedback = Some(Feedback::Correct);
                self.pause();
            }
            Submission::Revealed { answer } => {
                self.persist();
                self.feedback = Some(Feedback::Revealed(answer));
                self.pause();
            }
            Submission::Retry { .. } | Submission::Ignored => {}
        }
    }

    fn persist(&mut self) {
        if let Err(err) = self.store.save(&self.user, &self.progress) {
            self.message = Some(format!("Failed to save progress: {}", err));
        }
    }

    fn pause(&mut self) {
        let delay = Duration::from_millis(self.config.study.advance_delay_ms);
        self.advance_at = Some(Instant::now() + delay);
    }
}
