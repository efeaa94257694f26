use std::collections::HashMap;

use crate::bank::{Choice, Question, QuestionBank};


/// Navigation position and per-question answers over a question bank.
#[derive(Debug)]
pub struct Session {
    bank: QuestionBank,
    current_index: usize,
    user_answers: HashMap<usize, Choice>,
}

impl Session {
    pub fn new(bank: QuestionBank) -> Self {
        Session {
            bank,
            current_index: 0,
            user_answers: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.bank.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bank.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn question(&self, index: usize) -> Option<&Question> {
        self.bank.get(index)
    }

    /// Moves to `index`. Returns false and leaves the position alone when
    /// there is no such question.
    pub fn show(&mut self, index: usize) -> bool {
        if index >= self.bank.len() {
            return false;
        }
        self.current_index = index;
        true
    }

    /// Commits `pending` for the current question, then moves forward with
    /// wraparound.
    pub fn next(&mut self, pending: Option<Choice>) -> Option<usize> {
        if self.bank.is_empty() {
            return None;
        }
        self.commit(pending);
        self.current_index = (self.current_index + 1) % self.bank.len();
        Some(self.current_index)
    }

    /// Commits `pending` for the current question, then moves backward with
    /// wraparound.
    pub fn previous(&mut self, pending: Option<Choice>) -> Option<usize> {
        if self.bank.is_empty() {
            return None;
        }
        self.commit(pending);
        self.current_index = match self.current_index {
            0 => self.bank.len() - 1,
            i => i - 1,
        };
        Some(self.current_index)
    }

    pub fn select(&mut self, index: usize, choice: Choice) -> bool {
        if index >= self.bank.len() {
            return false;
        }
        self.user_answers.insert(index, choice);
        true
    }

    pub fn selection(&self, index: usize) -> Option<Choice> {
        self.user_answers.get(&index).copied()
    }

    pub fn answered_count(&self) -> usize {
        self.user_answers.len()
    }

    fn commit(&mut self, pending: Option<Choice>) {
        if let Some(choice) = pending {
            self.user_answers.insert(self.current_index, choice);
        }
    }
}
