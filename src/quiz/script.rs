use lazy_static::lazy_static;
use regex::Regex;

use crate::bank::Question;

lazy_static! {
    static ref WHITESPACE_REGEX: Regex = Regex::new(r"\s+").unwrap();
}

fn flatten(text: &str) -> String {
    WHITESPACE_REGEX.replace_all(text.trim(), " ").into()
}

/// Builds the text read aloud for a question.
pub fn narration_script(question: &Question, include_analysis: bool) -> String {
    let mut script = format!("题目：{}。", flatten(&question.title));
    if !question.options().is_empty() {
        script += "选项：";
        for (choice, text) in question.options() {
            script += &format!("{}，{}。", choice, flatten(text));
        }
    }
    script += &format!("答案：{}。", question.answer);
    if include_analysis {
        if let Some(analysis) = &question.analysis {
            script += &format!("解析：{}。", flatten(analysis));
        }
    }
    script
}
