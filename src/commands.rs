use std::str::FromStr;
use thiserror::Error;

use crate::bank::Choice;

pub const HELP: &str = "命令: n 下一题 | p 上一题 | a-d 选择 | r 查看/隐藏答案 | auto 自动轮播 | q 退出";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Command {
    Next,
    Previous,
    Choose(Choice),
    ToggleReveal,
    ToggleAutoPlay,
    Quit,
}

#[derive(Debug, Error, PartialEq)]
#[error("Unknown command {0:?}")]
pub struct UnknownCommand(pub String);

impl FromStr for Command {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim().to_lowercase();
        let command = match input.as_str() {
            "n" | "next" => Command::Next,
            "p" | "prev" | "previous" => Command::Previous,
            "r" | "reveal" => Command::ToggleReveal,
            "auto" => Command::ToggleAutoPlay,
            "q" | "quit" | "exit" => Command::Quit,
            other => match other.parse::<Choice>() {
                Ok(choice) => Command::Choose(choice),
                Err(_) => return Err(UnknownCommand(s.trim().to_owned())),
            },
        };
        Ok(command)
    }
}
