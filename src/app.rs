use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::config::Config;
use crate::keyboard::key::PhysicalKey;
use crate::keyboard::resolver::{KeyMapping, LayoutResolver};
use crate::session::engine::SessionEngine;
use crate::session::stats::SessionResult;
use crate::store::{JsonStore, ProfileData, SessionRecord};
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Typing,
    Results,
}

pub struct App {
    pub screen: AppScreen,
    pub engine: SessionEngine,
    pub mapping: Arc<KeyMapping>,
    pub theme: Theme,
    pub profile: ProfileData,
    pub store: Option<JsonStore>,
    pub last_result: Option<SessionResult>,
    pub show_keyboard: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: Config) -> Self {
        let store = JsonStore::new()
            .map_err(|err| log::warn!("profile store unavailable: {err}"))
            .ok();
        let profile = store
            .as_ref()
            .map(|s| s.load_profile())
            .unwrap_or_default();

        let effective = config.with_overrides(&profile.overrides);
        let theme = Theme::load(&effective.theme).unwrap_or_default();

        let mut resolver = LayoutResolver::from_layout_name(&effective.keyboard_layout);
        let mapping = Arc::new(KeyMapping::build(&mut resolver));

        let show_keyboard = effective.show_keyboard;
        let mut engine = SessionEngine::new(
            effective,
            Arc::clone(&mapping),
            profile.lesson_index,
            profile.wpm_record,
        );
        engine.start_session();

        Self {
            screen: AppScreen::Typing,
            engine,
            mapping,
            theme,
            profile,
            store,
            last_result: None,
            show_keyboard,
            should_quit: false,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        // Global controls
        match key.code {
            KeyCode::Esc => {
                self.quit();
                return;
            }
            KeyCode::Char('c') | KeyCode::Char('q')
                if key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                self.quit();
                return;
            }
            KeyCode::F(2) => {
                self.show_keyboard = !self.show_keyboard;
                return;
            }
            KeyCode::F(6) => {
                let mode = self.engine.cycle_mode();
                self.profile.overrides.practice_mode = Some(mode.as_str().to_string());
                self.save_profile();
                return;
            }
            _ => {}
        }

        match self.screen {
            AppScreen::Typing => self.handle_typing_key(key),
            AppScreen::Results => self.handle_results_key(key),
        }
    }

    fn handle_typing_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Backspace => self.engine.handle_backspace(),
            KeyCode::Enter => {
                self.engine.handle_keystroke('\n', Some(PhysicalKey::Enter));
            }
            KeyCode::Tab => {
                self.engine.handle_keystroke('\t', Some(PhysicalKey::Tab));
            }
            KeyCode::Char(ch) => {
                let pressed = self.mapping.key_for_char(ch);
                self.engine.handle_keystroke(ch, pressed);
            }
            _ => {}
        }
    }

    fn handle_results_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                self.engine.start_session();
                self.screen = AppScreen::Typing;
            }
            KeyCode::Char('r') => {
                self.engine.repeat_previous_lesson();
                self.engine.start_session();
                self.screen = AppScreen::Typing;
            }
            _ => {}
        }
    }

    /// Display tick: end the session once the configured duration elapses.
    pub fn on_tick(&mut self) {
        if self.screen == AppScreen::Typing && self.engine.tick(Instant::now()).time_up {
            self.finish_session();
        }
    }

    fn finish_session(&mut self) {
        let result = self.engine.end_session();
        self.persist_progress(&result);
        self.last_result = Some(result);
        self.screen = AppScreen::Results;
    }

    /// Hand the session outcome to the persistence collaborator.
    fn persist_progress(&mut self, result: &SessionResult) {
        self.profile.lesson_index = self.engine.lesson_index();
        self.profile.wpm_record = self.engine.wpm_record();
        self.profile.total_drills += 1;
        self.profile.push_record(SessionRecord {
            timestamp: Utc::now(),
            mode: self.engine.mode().as_str().to_string(),
            wpm: result.wpm,
            accuracy: result.accuracy,
            errors: result.errors,
            passed: result.passed,
        });
        self.save_profile();
    }

    fn save_profile(&self) {
        if let Some(store) = &self.store {
            if let Err(err) = store.save_profile(&self.profile) {
                log::warn!("failed to save profile: {err}");
            }
        }
    }

    fn quit(&mut self) {
        self.profile.overrides.practice_mode = Some(self.engine.mode().as_str().to_string());
        self.save_profile();
        self.should_quit = true;
    }
}
