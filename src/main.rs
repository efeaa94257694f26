use anyhow::Result;
use std::env;
use std::io::{self, BufRead};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Instant;

mod bank;
mod commands;
mod config;
mod output;
mod quiz;

use crate::bank::QuestionBank;
use crate::commands::{Command, HELP};
use crate::config::Config;
use crate::output::speech::SpeechNarrator;
use crate::output::terminal::TerminalPresenter;
use crate::quiz::Quiz;

type TerminalQuiz = Quiz<TerminalPresenter, SpeechNarrator>;

fn spawn_input_reader() -> Receiver<String> {
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if sender.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    log::error!("Could not read input: {}", e);
                    break;
                }
            }
        }
    });
    receiver
}

// Returns false once the user asked to quit.
fn handle_input(quiz: &mut TerminalQuiz, line: &str) -> bool {
    if line.trim().is_empty() {
        return true;
    }
    match line.parse::<Command>() {
        Ok(Command::Next) => {
            quiz.next();
        }
        Ok(Command::Previous) => {
            quiz.previous();
        }
        Ok(Command::Choose(choice)) => {
            quiz.choose(choice);
        }
        Ok(Command::ToggleReveal) => quiz.toggle_reveal(),
        Ok(Command::ToggleAutoPlay) => {
            if quiz.toggle_auto_play() {
                println!("自动轮播已开启");
            } else {
                println!("自动轮播已停止");
            }
        }
        Ok(Command::Quit) => return false,
        Err(e) => {
            println!("{}", e);
            println!("{}", HELP);
        }
    }
    true
}

fn main() -> Result<()> {
    if env::var_os("RUST_LOG").is_none() {
        env::set_var("RUST_LOG", "info");
    }
    pretty_env_logger::init();

    let config = Config::from_env()?;
    log::info!("Reading questions from {:?}", config.questions_path);
    let bank = QuestionBank::load(&config.questions_path);
    let tick_interval = config.settings.tick_interval;
    let narrator = SpeechNarrator::new(config.engine);
    let mut quiz = Quiz::new(bank, config.settings, TerminalPresenter::new(), narrator);
    println!("{}", HELP);

    let input = spawn_input_reader();
    let mut last_tick = Instant::now();
    'main: loop {
        loop {
            match input.try_recv() {
                Ok(line) => {
                    if !handle_input(&mut quiz, &line) {
                        break 'main;
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => break 'main,
            }
        }

        let now = Instant::now();
        quiz.tick(now.duration_since(last_tick));
        last_tick = now;
        thread::sleep(tick_interval);
    }

    quiz.stop_auto_play();
    log::info!(
        "Answered {} of {} questions",
        quiz.session().answered_count(),
        quiz.session().len()
    );
    Ok(())
}
