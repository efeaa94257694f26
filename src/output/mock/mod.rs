use anyhow::{anyhow, Result};
use parking_lot::RwLock;
use std::sync::Arc;

use crate::bank::{Choice, Question};
use crate::output::{NarrationHandle, NarrationStatus, Narrator, Position, Presenter};

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Message {
    Question(Position, Question, Option<Choice>),
    Reveal(String, bool),
    Empty,
}

#[derive(Clone, Default)]
pub struct MockPresenter {
    messages: Arc<RwLock<Vec<Message>>>,
    selection: Arc<RwLock<Option<Choice>>>,
}

impl MockPresenter {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn flush(&self) -> Vec<Message> {
        std::mem::replace(&mut *self.messages.write(), Vec::new())
    }

    pub fn contains_message(&self, message: &Message) -> bool {
        self.messages.read().iter().any(|m| m == message)
    }

    pub fn questions_rendered(&self) -> usize {
        self.messages
            .read()
            .iter()
            .filter(|m| matches!(m, Message::Question(..)))
            .count()
    }

    pub fn last_reveal(&self) -> Option<(String, bool)> {
        self.messages.read().iter().rev().find_map(|m| match m {
            Message::Reveal(text, visible) => Some((text.clone(), *visible)),
            _ => None,
        })
    }
}

impl Presenter for MockPresenter {
    fn render_question(&self, position: Position, question: &Question, restored: Option<Choice>) {
        *self.selection.write() = restored;
        self.messages
            .write()
            .push(Message::Question(position, question.clone(), restored));
    }

    fn current_selection(&self) -> Option<Choice> {
        *self.selection.read()
    }

    fn check(&self, choice: Choice) {
        *self.selection.write() = Some(choice);
    }

    fn render_reveal(&self, text: &str, visible: bool) {
        self.messages
            .write()
            .push(Message::Reveal(text.to_owned(), visible));
    }

    fn render_empty(&self) {
        self.messages.write().push(Message::Empty);
    }
}

#[derive(Clone)]
pub struct MockNarration {
    status: Arc<RwLock<NarrationStatus>>,
}

impl NarrationHandle for MockNarration {
    fn status(&self) -> NarrationStatus {
        *self.status.read()
    }
}

#[derive(Clone)]
pub struct MockNarrator {
    available: bool,
    fail_to_speak: bool,
    spoken: Arc<RwLock<Vec<String>>>,
    current: Arc<RwLock<Option<MockNarration>>>,
    stop_count: Arc<RwLock<usize>>,
}

impl MockNarrator {
    pub fn new() -> Self {
        MockNarrator {
            available: true,
            fail_to_speak: false,
            spoken: Arc::new(RwLock::new(Vec::new())),
            current: Arc::new(RwLock::new(None)),
            stop_count: Arc::new(RwLock::new(0)),
        }
    }

    pub fn unavailable() -> Self {
        MockNarrator {
            available: false,
            ..MockNarrator::new()
        }
    }

    pub fn failing() -> Self {
        MockNarrator {
            fail_to_speak: true,
            ..MockNarrator::new()
        }
    }

    pub fn spoken(&self) -> Vec<String> {
        self.spoken.read().clone()
    }

    pub fn stop_count(&self) -> usize {
        *self.stop_count.read()
    }

    pub fn is_speaking(&self) -> bool {
        self.current
            .read()
            .as_ref()
            .map(|n| n.status() == NarrationStatus::Speaking)
            .unwrap_or(false)
    }

    pub fn finish(&self) {
        self.set_status(NarrationStatus::Finished);
    }

    pub fn fail(&self) {
        self.set_status(NarrationStatus::Failed);
    }

    fn set_status(&self, status: NarrationStatus) {
        if let Some(narration) = self.current.read().as_ref() {
            *narration.status.write() = status;
        }
    }
}

impl Narrator for MockNarrator {
    type Handle = MockNarration;

    fn is_available(&self) -> bool {
        self.available
    }

    fn speak(&self, text: &str) -> Result<MockNarration> {
        if !self.available || self.fail_to_speak {
            return Err(anyhow!("Speech engine refused {:?}", text));
        }
        self.spoken.write().push(text.to_owned());
        let narration = MockNarration {
            status: Arc::new(RwLock::new(NarrationStatus::Speaking)),
        };
        *self.current.write() = Some(narration.clone());
        Ok(narration)
    }

    fn stop(&self) -> Result<()> {
        *self.stop_count.write() += 1;
        if let Some(narration) = self.current.write().take() {
            *narration.status.write() = NarrationStatus::Finished;
        }
        Ok(())
    }
}
