use anyhow::Result;

use crate::bank::{Choice, Question};

#[cfg(test)]
pub mod mock;
pub mod speech;
pub mod terminal;

/// Where a question sits in the bank, for "question i / n" counters.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Position {
    pub index: usize,
    pub total: usize,
}

/// Renders quiz state. Implementations own the widgets the user clicks on.
pub trait Presenter {
    /// Shows a question. The selection control is set to `restored`, or
    /// cleared when it is `None`.
    fn render_question(&self, position: Position, question: &Question, restored: Option<Choice>);

    /// The option checked since the last `render_question`.
    fn current_selection(&self) -> Option<Choice>;

    /// Checks `choice` on the question on screen.
    fn check(&self, choice: Choice);

    fn render_reveal(&self, text: &str, visible: bool);

    fn render_empty(&self);
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NarrationStatus {
    Speaking,
    Finished,
    Failed,
}

pub trait NarrationHandle {
    fn status(&self) -> NarrationStatus;
}

/// Text-to-speech capability. Availability is decided once at startup.
pub trait Narrator {
    type Handle: NarrationHandle;

    fn is_available(&self) -> bool;

    fn speak(&self, text: &str) -> Result<Self::Handle>;

    fn stop(&self) -> Result<()>;
}
