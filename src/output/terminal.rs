use itertools::Itertools;
use parking_lot::RwLock;
use std::io::{self, Write};

use crate::bank::{Choice, Question};
use crate::output::{Position, Presenter};

/// Plain-text front-end on stdout. Holds the checked option the way a radio
/// button group would.
#[derive(Default)]
pub struct TerminalPresenter {
    selection: RwLock<Option<Choice>>,
}

impl TerminalPresenter {
    pub fn new() -> Self {
        Default::default()
    }

    fn format_question(position: Position, question: &Question, restored: Option<Choice>) -> String {
        let header = format!(
            "题目 {} / {} (ID: {})",
            position.index + 1,
            position.total,
            question.id.as_deref().unwrap_or("N/A")
        );
        let options = question
            .options()
            .iter()
            .map(|(choice, text)| {
                let mark = if restored == Some(*choice) { "(•)" } else { "( )" };
                format!("{} {}. {}", mark, choice, text)
            })
            .join("\n");
        format!("\n{}\n{}\n{}", header, question.title, options)
    }
}

impl Presenter for TerminalPresenter {
    fn render_question(&self, position: Position, question: &Question, restored: Option<Choice>) {
        *self.selection.write() = restored;
        println!("{}", Self::format_question(position, question, restored));
        io::stdout().flush().ok();
    }

    fn current_selection(&self) -> Option<Choice> {
        *self.selection.read()
    }

    fn check(&self, choice: Choice) {
        *self.selection.write() = Some(choice);
        println!("已选择：{}", choice);
    }

    fn render_reveal(&self, text: &str, visible: bool) {
        if visible {
            println!("\n{}", text);
        } else {
            println!("(答案已隐藏)");
        }
    }

    fn render_empty(&self) {
        println!("没有可用的题目。");
    }
}
