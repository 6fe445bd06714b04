use crate::catalog::{ChangeType, CHANGE_TYPES};
use crate::classify::CommitOutcome;
use crate::config::Config;
use crate::message::{build_commit_message, is_blank};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    TypeSelect,
    Scope,
    Message,
    Error,
}

/// What the session loop has to do after a key was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    Commit(String),
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEnd {
    Committed(String),
    Aborted,
}

/// Single-line text input with a character cap.
#[derive(Debug, Clone)]
pub struct TextField {
    value: String,
    limit: usize,
}

impl TextField {
    pub fn new(limit: usize) -> Self {
        Self {
            value: String::new(),
            limit,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn push(&mut self, c: char) {
        if self.value.chars().count() < self.limit {
            self.value.push(c);
        }
    }

    pub fn pop(&mut self) {
        self.value.pop();
    }
}

#[derive(Debug, Clone)]
pub struct Flow {
    pub step: Step,
    pub filter: String,
    pub selected_type: usize,
    pub scope: TextField,
    pub message: TextField,
    pub result: Option<CommitOutcome>,
    pub show_error: bool,
    pub committing: bool,
}

fn is_abort(key: &KeyEvent) -> bool {
    key.code == KeyCode::Esc
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

fn is_bare(key: &KeyEvent, c: char) -> bool {
    key.code == KeyCode::Char(c) && key.modifiers.difference(KeyModifiers::SHIFT).is_empty()
}

impl Flow {
    pub fn new(config: &Config) -> Self {
        Self {
            step: Step::TypeSelect,
            filter: String::new(),
            selected_type: 0,
            scope: TextField::new(config.scope_char_limit),
            message: TextField::new(config.message_char_limit),
            result: None,
            show_error: false,
            committing: false,
        }
    }

    /// Catalog entries that survive the current filter, in catalog order.
    pub fn visible_types(&self) -> Vec<&'static ChangeType> {
        CHANGE_TYPES.iter().filter(|t| t.matches(&self.filter)).collect()
    }

    pub fn selected(&self) -> Option<&'static ChangeType> {
        self.visible_types().get(self.selected_type).copied()
    }

    /// Header shown in front of the message input, e.g. `feat(auth): `.
    pub fn prefix(&self) -> String {
        let tag = self.selected().map(|t| t.tag).unwrap_or_default();
        build_commit_message(tag, self.scope.value(), "")
    }

    pub fn commit_message(&self) -> Option<String> {
        let ty = self.selected()?;
        Some(build_commit_message(ty.tag, self.scope.value(), self.message.value()))
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Effect {
        if key.kind != KeyEventKind::Press {
            return Effect::None;
        }
        if is_abort(&key) {
            return Effect::Quit;
        }
        if self.committing {
            return Effect::None;
        }

        match self.step {
            Step::TypeSelect => self.on_type_select(key),
            Step::Scope => self.on_scope(key),
            Step::Message => self.on_message(key),
            Step::Error => self.on_error(key),
        }
    }

    fn on_type_select(&mut self, key: KeyEvent) -> Effect {
        if self.filter.is_empty() && is_bare(&key, 'q') {
            return Effect::Quit;
        }
        match key.code {
            KeyCode::Down => {
                if self.selected_type + 1 < self.visible_types().len() {
                    self.selected_type += 1;
                }
            }
            KeyCode::Up => {
                self.selected_type = self.selected_type.saturating_sub(1);
            }
            KeyCode::Enter => {
                if self.selected().is_some() {
                    self.step = Step::Scope;
                }
            }
            KeyCode::Backspace => {
                self.filter.pop();
                self.selected_type = 0;
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.filter.push(c);
                self.selected_type = 0;
            }
            _ => {}
        }
        Effect::None
    }

    fn on_scope(&mut self, key: KeyEvent) -> Effect {
        match key.code {
            KeyCode::Enter => self.step = Step::Message,
            KeyCode::BackTab => self.step = Step::TypeSelect,
            KeyCode::Backspace => self.scope.pop(),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => self.scope.push(c),
            _ => {}
        }
        Effect::None
    }

    fn on_message(&mut self, key: KeyEvent) -> Effect {
        match key.code {
            KeyCode::Enter => {
                if is_blank(self.message.value()) {
                    return Effect::None;
                }
                if let Some(message) = self.commit_message() {
                    self.committing = true;
                    return Effect::Commit(message);
                }
            }
            KeyCode::BackTab => self.step = Step::Scope,
            KeyCode::Backspace => self.message.pop(),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => self.message.push(c),
            _ => {}
        }
        Effect::None
    }

    fn on_error(&mut self, key: KeyEvent) -> Effect {
        if is_bare(&key, 'q') {
            return Effect::Quit;
        }
        if is_bare(&key, 'r') && self.show_error {
            self.step = Step::Message;
            self.show_error = false;
        }
        Effect::None
    }

    /// Feeds back the result of the attempt started by `Effect::Commit`.
    pub fn record_outcome(&mut self, outcome: CommitOutcome) -> Option<SessionEnd> {
        self.committing = false;
        debug!("commit outcome: {}", outcome.reason.label());

        let end = if outcome.succeeded() {
            self.commit_message().map(SessionEnd::Committed)
        } else {
            self.step = Step::Error;
            self.show_error = true;
            None
        };
        self.result = Some(outcome);
        end
    }
}
