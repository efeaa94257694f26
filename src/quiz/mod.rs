use std::time::Duration;

use self::autoplay::*;
use self::reveal::Reveal;
use self::session::Session;
use crate::bank::{Choice, QuestionBank};
use crate::output::{NarrationHandle, NarrationStatus, Narrator, Position, Presenter};

pub mod autoplay;
pub mod reveal;
pub mod script;
pub mod session;
pub mod settings;

pub use self::settings::Settings;


/// Narration in flight and the auto-play step it belongs to.
struct Narration<H> {
    ticket: Ticket,
    handle: H,
}

/// Drives one quiz session: navigation, answer reveal and auto-play over a
/// presenter and a narrator.
pub struct Quiz<P: Presenter, N: Narrator> {
    session: Session,
    reveal: Reveal,
    sequencer: Sequencer,
    narration: Option<Narration<N::Handle>>,
    settings: Settings,
    presenter: P,
    narrator: N,
}

impl<P: Presenter, N: Narrator> Quiz<P, N> {
    pub fn new(bank: QuestionBank, settings: Settings, presenter: P, narrator: N) -> Self {
        let mut quiz = Quiz {
            session: Session::new(bank),
            reveal: Reveal::default(),
            sequencer: Sequencer::new(&settings),
            narration: None,
            settings,
            presenter,
            narrator,
        };
        if quiz.session.is_empty() {
            quiz.presenter.render_empty();
        } else {
            quiz.show(0);
        }
        quiz
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn current_index(&self) -> usize {
        self.session.current_index()
    }

    pub fn is_auto_playing(&self) -> bool {
        self.sequencer.is_running()
    }

    pub fn is_narrating(&self) -> bool {
        self.narration.is_some()
    }

    pub fn is_reveal_visible(&self) -> bool {
        self.reveal.is_visible()
    }

    /// Displays the question at `index`, restoring its recorded selection.
    pub fn show(&mut self, index: usize) -> bool {
        if !self.session.show(index) {
            return false;
        }
        self.render_current();
        self.interrupt_narration();
        if self.sequencer.is_running() {
            self.reveal();
            self.sequencer.rearm(index);
        } else {
            self.hide();
        }
        true
    }

    pub fn next(&mut self) -> bool {
        let pending = self.presenter.current_selection();
        match self.session.next(pending) {
            Some(index) => self.show(index),
            None => false,
        }
    }

    pub fn previous(&mut self) -> bool {
        let pending = self.presenter.current_selection();
        match self.session.previous(pending) {
            Some(index) => self.show(index),
            None => false,
        }
    }

    /// Records `choice` for the question at `index`. The selection control
    /// follows when that question is on screen.
    pub fn select(&mut self, index: usize, choice: Choice) -> bool {
        if !self.session.select(index, choice) {
            return false;
        }
        if index == self.session.current_index() {
            self.presenter.check(choice);
        }
        true
    }

    /// Records `choice` for the question on screen.
    pub fn choose(&mut self, choice: Choice) -> bool {
        let index = self.session.current_index();
        self.select(index, choice)
    }

    pub fn reveal(&mut self) {
        let index = self.session.current_index();
        let selection = self.session.selection(index);
        if let Some(question) = self.session.question(index) {
            let text = self.reveal.reveal(question, selection);
            self.presenter.render_reveal(text, true);
        }
    }

    pub fn hide(&mut self) {
        self.reveal.hide();
        self.presenter.render_reveal(self.reveal.text(), false);
    }

    pub fn toggle_reveal(&mut self) {
        let index = self.session.current_index();
        let selection = self.session.selection(index);
        if let Some(question) = self.session.question(index) {
            let visible = self.reveal.toggle(question, selection);
            self.presenter.render_reveal(self.reveal.text(), visible);
        }
    }

    pub fn start_auto_play(&mut self) -> bool {
        if self.session.is_empty() || self.sequencer.is_running() {
            return false;
        }
        log::info!("Auto-play started");
        self.reveal();
        self.sequencer.start(self.session.current_index());
        true
    }

    pub fn stop_auto_play(&mut self) -> bool {
        if !self.sequencer.is_running() {
            return false;
        }
        log::info!("Auto-play stopped");
        self.sequencer.stop();
        self.interrupt_narration();
        true
    }

    pub fn toggle_auto_play(&mut self) -> bool {
        if self.sequencer.is_running() {
            self.stop_auto_play();
        } else {
            self.start_auto_play();
        }
        self.sequencer.is_running()
    }

    pub fn tick(&mut self, dt: Duration) {
        self.poll_narration();
        let cue = self.sequencer.tick(dt, self.session.current_index());
        match cue {
            Some(Cue::Narrate(ticket)) => self.narrate(ticket),
            Some(Cue::Advance(_ticket)) => {
                self.next();
            }
            None => (),
        }
    }

    fn render_current(&self) {
        let index = self.session.current_index();
        if let Some(question) = self.session.question(index) {
            let position = Position {
                index,
                total: self.session.len(),
            };
            self.presenter
                .render_question(position, question, self.session.selection(index));
        }
    }

    fn narrate(&mut self, ticket: Ticket) {
        if !self.narrator.is_available() {
            log::debug!("Narration unavailable, waiting instead");
            self.sequencer.narration_unavailable(ticket);
            return;
        }
        let text = match self.session.question(ticket.index) {
            Some(question) => script::narration_script(question, self.settings.narrate_analysis),
            None => return,
        };
        match self.narrator.speak(&text) {
            Ok(handle) => self.narration = Some(Narration { ticket, handle }),
            Err(e) => {
                log::warn!("Narration failed: {:#}", e);
                self.sequencer.narration_unavailable(ticket);
            }
        }
    }

    fn poll_narration(&mut self) {
        let status = match &self.narration {
            Some(narration) => narration.handle.status(),
            None => return,
        };
        if status == NarrationStatus::Speaking {
            return;
        }
        if let Some(Narration { ticket, .. }) = self.narration.take() {
            if status == NarrationStatus::Finished {
                self.sequencer.narration_finished(ticket);
            } else {
                log::warn!("Narration of question {} broke off", ticket.index);
                self.sequencer.narration_unavailable(ticket);
            }
        }
    }

    fn interrupt_narration(&mut self) {
        if self.narration.take().is_some() {
            if let Err(e) = self.narrator.stop() {
                log::warn!("Could not stop narration: {:#}", e);
            }
        }
    }
}
