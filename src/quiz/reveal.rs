use std::fmt;

use crate::bank::{Choice, Question};


#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Outcome {
    Unanswered,
    Correct(Choice),
    Incorrect(Choice),
}

/// What the answer panel says about one question.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Verdict {
    pub answer: String,
    pub outcome: Outcome,
    pub analysis: Option<String>,
}

impl Verdict {
    pub fn new(question: &Question, selection: Option<Choice>) -> Self {
        let outcome = match selection {
            None => Outcome::Unanswered,
            Some(choice) if question.is_correct(choice) => Outcome::Correct(choice),
            Some(choice) => Outcome::Incorrect(choice),
        };
        Verdict {
            answer: question.answer.clone(),
            outcome,
            analysis: question.analysis.clone(),
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "正确答案：{}", self.answer)?;
        match self.outcome {
            Outcome::Unanswered => (),
            Outcome::Correct(choice) => write!(f, "\n✓ 您的选择：{} (正确)", choice)?,
            Outcome::Incorrect(choice) => write!(f, "\n✗ 您的选择：{} (错误)", choice)?,
        }
        if let Some(analysis) = &self.analysis {
            write!(f, "\n\n解析：\n{}", analysis)?;
        }
        Ok(())
    }
}

/// Visibility and last computed text of the answer panel.
#[derive(Debug, Default)]
pub struct Reveal {
    text: String,
    visible: bool,
}

impl Reveal {
    pub fn reveal(&mut self, question: &Question, selection: Option<Choice>) -> &str {
        self.text = Verdict::new(question, selection).to_string();
        self.visible = true;
        &self.text
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// Flips visibility and returns the new state.
    pub fn toggle(&mut self, question: &Question, selection: Option<Choice>) -> bool {
        if self.visible {
            self.hide();
        } else {
            self.reveal(question, selection);
        }
        self.visible
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}
