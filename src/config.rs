use anyhow::{Context, Result};
use directories_next::BaseDirs;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::output::speech::Engine;
use crate::quiz::Settings;

const QUESTIONS_FILE: &str = "questions.json";
const APP_DIR: &str = "exam-flashcards";

/// Everything decided once at startup.
#[derive(Debug)]
pub struct Config {
    pub questions_path: PathBuf,
    pub engine: Option<Engine>,
    pub settings: Settings,
}

impl Config {
    pub fn from_env() -> Result<Config> {
        let mut settings = Settings::default();
        if let Some(duration) = duration_var("QUIZ_FALLBACK_MS")? {
            settings.fallback_duration = duration;
        }
        if let Some(duration) = duration_var("QUIZ_NARRATION_DELAY_MS")? {
            settings.narration_delay = duration;
        }

        Ok(Config {
            questions_path: questions_path(env::var_os("QUIZ_QUESTIONS").map(PathBuf::from)),
            engine: engine(env::var("QUIZ_TTS").ok()),
            settings,
        })
    }
}

fn duration_var(name: &str) -> Result<Option<Duration>> {
    match env::var(name) {
        Ok(value) => {
            let millis: u64 = value
                .trim()
                .parse()
                .with_context(|| format!("{} must be a number of milliseconds, got {:?}", name, value))?;
            Ok(Some(Duration::from_millis(millis)))
        }
        Err(_) => Ok(None),
    }
}

fn questions_path(explicit: Option<PathBuf>) -> PathBuf {
    if let Some(path) = explicit {
        return path;
    }
    let local = PathBuf::from(QUESTIONS_FILE);
    if local.exists() {
        return local;
    }
    match BaseDirs::new() {
        Some(dirs) => {
            let mut path = dirs.data_dir().to_path_buf();
            path.push(APP_DIR);
            path.push(QUESTIONS_FILE);
            path
        }
        None => local,
    }
}

fn engine(requested: Option<String>) -> Option<Engine> {
    match requested.as_deref().map(str::trim) {
        Some("off") | Some("none") | Some("0") => None,
        Some("") | None => Engine::detect(),
        Some(program) => Some(Engine::new(PathBuf::from(program))),
    }
}
