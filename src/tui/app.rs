use crate::reference::ReferenceData;
use crate::scoring::{answers_from_responses, compute_scores, ScoreResult, DEFAULT_RESPONSE, SCALE_MAX, SCALE_MIN};
use crate::session::{HistoryEntry, SessionId, SessionStore};
use crate::tui::theme::ThemeColors;
use chrono::{DateTime, Local, Utc};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Screen {
    Quiz,
    Result,
    History,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    Normal,
    Help,
}

pub struct App {
    pub reference: Arc<ReferenceData>,
    pub responses: Vec<u8>,
    pub list_state: ratatui::widgets::ListState,
    pub screen: Screen,
    pub input_mode: InputMode,
    pub last_result: Option<ScoreResult>,
    pub store: SessionStore,
    pub session: SessionId,
    pub export_dir: PathBuf,
    pub flash_message: Option<(String, Instant)>,
    pub should_quit: bool,
    pub theme: ThemeColors,
}

impl App {
    pub fn new(
        reference: Arc<ReferenceData>,
        mut store: SessionStore,
        export_dir: PathBuf,
        theme: ThemeColors,
    ) -> Self {
        let session = store.open(Utc::now());
        let responses = vec![DEFAULT_RESPONSE; reference.questions().len()];

        let mut list_state = ratatui::widgets::ListState::default();
        if !responses.is_empty() {
            list_state.select(Some(0));
        }

        Self {
            reference,
            responses,
            list_state,
            screen: Screen::Quiz,
            input_mode: InputMode::Normal,
            last_result: None,
            store,
            session,
            export_dir,
            flash_message: None,
            should_quit: false,
            theme,
        }
    }

    pub fn selected_question(&self) -> Option<usize> {
        self.list_state.selected()
    }

    pub fn next_question(&mut self) {
        if self.responses.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => {
                if i >= self.responses.len() - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn previous_question(&mut self) {
        if self.responses.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => {
                if i == 0 {
                    self.responses.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    /// Move the selected slider one step up, stopping at the top of the scale
    pub fn increase_response(&mut self) {
        if let Some(i) = self.selected_question() {
            self.responses[i] = (self.responses[i] + 1).min(SCALE_MAX);
        }
    }

    /// Move the selected slider one step down, stopping at the bottom of the scale
    pub fn decrease_response(&mut self) {
        if let Some(i) = self.selected_question() {
            self.responses[i] = self.responses[i].saturating_sub(1).max(SCALE_MIN);
        }
    }

    /// Set the selected slider directly; values off the scale are ignored
    pub fn set_response(&mut self, value: u8) {
        if !(SCALE_MIN..=SCALE_MAX).contains(&value) {
            return;
        }
        if let Some(i) = self.selected_question() {
            self.responses[i] = value;
        }
    }

    /// Score the current form, record it in the session history and show the
    /// result screen.
    pub fn submit(&mut self, now: DateTime<Utc>) {
        let responses: Vec<i64> = self.responses.iter().map(|&r| r as i64).collect();
        let answers = match answers_from_responses(self.reference.questions(), &responses) {
            Ok(a) => a,
            Err(e) => {
                self.show_flash(format!("Error: {}", e));
                return;
            }
        };

        let result = compute_scores(&answers);

        if !self.store.contains(self.session) {
            self.session = self.store.open(now);
        }
        if let Err(e) = self.store.record(self.session, &result, now) {
            warn!("Failed to record history: {}", e);
        }

        let message = format!(
            "Scored: dominant orientation is {}",
            self.reference.profile(result.dominant()).label
        );
        self.show_flash(message);
        info!(dominant = result.dominant().key(), "Submission scored");

        self.last_result = Some(result);
        self.screen = Screen::Result;
    }

    /// Reset every slider to its default and go back to the questions
    pub fn reset_form(&mut self) {
        self.responses.fill(DEFAULT_RESPONSE);
        self.list_state.select(if self.responses.is_empty() { None } else { Some(0) });
        self.screen = Screen::Quiz;
    }

    /// Export the latest result as CSV into the configured directory
    pub fn export_result(&mut self) {
        let Some(result) = &self.last_result else {
            self.show_flash("Nothing to export yet".to_string());
            return;
        };

        match crate::export::write_export(&self.export_dir, result, &Local::now()) {
            Ok(path) => self.show_flash(format!("Exported: {}", path.display())),
            Err(e) => self.show_flash(format!("Failed to export: {:#}", e)),
        }
    }

    /// Quiz -> Result (once there is one) -> History -> Quiz
    pub fn cycle_screen(&mut self) {
        self.screen = match self.screen {
            Screen::Quiz if self.last_result.is_some() => Screen::Result,
            Screen::Quiz => Screen::History,
            Screen::Result => Screen::History,
            Screen::History => Screen::Quiz,
        };
    }

    /// History of the current session
    pub fn history(&self) -> &[HistoryEntry] {
        self.store.history(self.session).unwrap_or(&[])
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.store.touch(self.session, now);
    }

    /// Periodic housekeeping: expire flash messages and idle sessions
    pub fn on_tick(&mut self, now: DateTime<Utc>) {
        self.update_flash();

        self.store.expire_idle(now);
        if !self.store.contains(self.session) {
            self.session = self.store.open(now);
            self.show_flash("Session expired; history cleared".to_string());
        }
    }

    pub fn update_flash(&mut self) {
        if let Some((_, timestamp)) = self.flash_message {
            if timestamp.elapsed().as_secs() >= 3 {
                self.flash_message = None;
            }
        }
    }

    pub fn show_flash(&mut self, msg: String) {
        self.flash_message = Some((msg, Instant::now()));
    }

    /// Show help overlay
    pub fn show_help(&mut self) {
        self.input_mode = InputMode::Help;
    }

    /// Dismiss help overlay
    pub fn dismiss_help(&mut self) {
        self.input_mode = InputMode::Normal;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::types::tests::sample_reference;
    use crate::reference::Dimension;
    use chrono::Duration;

    fn test_app() -> App {
        App::new(
            Arc::new(sample_reference()),
            SessionStore::new(Duration::minutes(30)),
            std::env::temp_dir(),
            ThemeColors::dark(),
        )
    }

    #[test]
    fn test_new_app_defaults() {
        let app = test_app();
        assert_eq!(app.responses, vec![3; 20]);
        assert_eq!(app.selected_question(), Some(0));
        assert_eq!(app.screen, Screen::Quiz);
        assert!(app.history().is_empty());
        assert_eq!(app.store.len(), 1);
    }

    #[test]
    fn test_navigation_wraps() {
        let mut app = test_app();
        app.previous_question();
        assert_eq!(app.selected_question(), Some(19));
        app.next_question();
        assert_eq!(app.selected_question(), Some(0));
        app.next_question();
        assert_eq!(app.selected_question(), Some(1));
    }

    #[test]
    fn test_slider_stays_on_scale() {
        let mut app = test_app();
        for _ in 0..5 {
            app.increase_response();
        }
        assert_eq!(app.responses[0], 5);
        for _ in 0..10 {
            app.decrease_response();
        }
        assert_eq!(app.responses[0], 1);

        app.set_response(4);
        assert_eq!(app.responses[0], 4);
        app.set_response(0);
        app.set_response(6);
        assert_eq!(app.responses[0], 4);
    }

    #[test]
    fn test_submit_scores_and_records_history() {
        let mut app = test_app();
        // Relation block is questions 6-10
        for i in 5..10 {
            app.list_state.select(Some(i));
            app.set_response(5);
        }

        app.submit(Utc::now());

        assert_eq!(app.screen, Screen::Result);
        let result = app.last_result.as_ref().unwrap();
        assert_eq!(result.dominant(), Dimension::Relation);
        assert_eq!(result.normalized().get(Dimension::Relation), 100.0);
        assert_eq!(result.normalized().get(Dimension::Outcome), 50.0);
        assert_eq!(app.history().len(), 1);
        assert!(app.flash_message.as_ref().unwrap().0.contains("Relation type"));
    }

    #[test]
    fn test_reset_form_keeps_history() {
        let mut app = test_app();
        app.set_response(1);
        app.submit(Utc::now());
        app.reset_form();

        assert_eq!(app.screen, Screen::Quiz);
        assert_eq!(app.responses, vec![3; 20]);
        assert_eq!(app.history().len(), 1);
        assert!(app.last_result.is_some());
    }

    #[test]
    fn test_cycle_screen() {
        let mut app = test_app();
        app.cycle_screen();
        assert_eq!(app.screen, Screen::History);
        app.cycle_screen();
        assert_eq!(app.screen, Screen::Quiz);

        app.submit(Utc::now());
        app.screen = Screen::Quiz;
        app.cycle_screen();
        assert_eq!(app.screen, Screen::Result);
        app.cycle_screen();
        assert_eq!(app.screen, Screen::History);
    }

    #[test]
    fn test_export_without_result() {
        let mut app = test_app();
        app.export_result();
        assert_eq!(app.flash_message.as_ref().unwrap().0, "Nothing to export yet");
    }

    #[test]
    fn test_export_writes_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut app = test_app();
        app.export_dir = dir.path().to_path_buf();
        app.submit(Utc::now());
        app.export_result();

        let msg = &app.flash_message.as_ref().unwrap().0;
        assert!(msg.starts_with("Exported: "), "unexpected flash: {}", msg);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_idle_session_replaced_on_tick() {
        let mut app = test_app();
        app.submit(Utc::now());
        let old_session = app.session;

        app.on_tick(Utc::now() + Duration::minutes(45));

        assert_ne!(app.session, old_session);
        assert!(app.history().is_empty());
        assert_eq!(
            app.flash_message.as_ref().unwrap().0,
            "Session expired; history cleared"
        );
    }

    #[test]
    fn test_tick_keeps_active_session() {
        let mut app = test_app();
        let session = app.session;
        app.on_tick(Utc::now() + Duration::minutes(5));
        assert_eq!(app.session, session);
    }

    #[test]
    fn test_help_toggle() {
        let mut app = test_app();
        app.show_help();
        assert_eq!(app.input_mode, InputMode::Help);
        app.dismiss_help();
        assert_eq!(app.input_mode, InputMode::Normal);
    }
}
