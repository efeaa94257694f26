use anyhow::{Context, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::Value;
use std::convert::TryFrom;
use std::fs;
use std::path::Path;
use thiserror::Error;

pub mod question;

pub use question::{Choice, Question, RawQuestion, RecordError};

#[cfg(test)]
mod tests;

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("payload is neither a list of questions nor an object with a `questions` list")]
    UnexpectedShape,
    #[error("payload is not valid JSON: {0}")]
    Syntax(#[from] serde_json::Error),
}

#[derive(Debug)]
pub struct SkippedRecord {
    pub position: usize,
    pub id: Option<String>,
    pub reason: RecordError,
}

#[derive(Debug, Default)]
pub struct LoadReport {
    pub total: usize,
    pub skipped: Vec<SkippedRecord>,
}

impl LoadReport {
    pub fn admitted(&self) -> usize {
        self.total - self.skipped.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

/// Extracts the list of raw records from a source payload.
pub fn records(payload: Value) -> Result<Vec<Value>, PayloadError> {
    match payload {
        Value::Array(records) => Ok(records),
        Value::Object(mut fields) => match fields.remove("questions") {
            Some(Value::Array(records)) => Ok(records),
            _ => Err(PayloadError::UnexpectedShape),
        },
        _ => Err(PayloadError::UnexpectedShape),
    }
}

fn record_id(record: &Value) -> Option<String> {
    match record.get("id")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Keeps the records that are usable questions, in source order.
pub fn admit(records: Vec<Value>) -> (Vec<Question>, LoadReport) {
    let mut report = LoadReport {
        total: records.len(),
        skipped: Vec::new(),
    };
    let mut questions = Vec::with_capacity(records.len());

    for (position, record) in records.into_iter().enumerate() {
        let id = record_id(&record);
        let admitted = RawQuestion::from_record(record).and_then(Question::try_from);
        match admitted {
            Ok(question) => {
                if question.correct_choice().is_none() {
                    log::warn!(
                        "Question {} (ID: {}) has answer {:?} which is not one of its options",
                        position,
                        id.as_deref().unwrap_or("N/A"),
                        question.answer
                    );
                }
                questions.push(question);
            }
            Err(reason) => {
                log::warn!(
                    "Skipping question {} (ID: {}): {}",
                    position,
                    id.as_deref().unwrap_or("N/A"),
                    reason
                );
                report.skipped.push(SkippedRecord {
                    position,
                    id,
                    reason,
                });
            }
        }
    }

    (questions, report)
}

/// The shuffled questions of one session. Order is fixed once built.
#[derive(Clone, Debug, Default)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    pub fn new(questions: Vec<Question>) -> Self {
        QuestionBank { questions }
    }

    pub fn from_payload<R: Rng + ?Sized>(
        payload: Value,
        rng: &mut R,
    ) -> Result<(QuestionBank, LoadReport), PayloadError> {
        let (mut questions, report) = admit(records(payload)?);
        questions.shuffle(rng);
        log::info!(
            "Loaded {} valid questions (out of {})",
            report.admitted(),
            report.total
        );
        Ok((QuestionBank::new(questions), report))
    }

    pub fn from_json<R: Rng + ?Sized>(
        source: &str,
        rng: &mut R,
    ) -> Result<(QuestionBank, LoadReport), PayloadError> {
        let payload: Value = serde_json::from_str(source)?;
        Self::from_payload(payload, rng)
    }

    pub fn open<R: Rng + ?Sized>(source: &Path, rng: &mut R) -> Result<(QuestionBank, LoadReport)> {
        let content = fs::read_to_string(source)
            .with_context(|| format!("Could not read question file {:?}", source))?;
        let loaded = Self::from_json(&content, rng)
            .with_context(|| format!("Could not load questions from {:?}", source))?;
        Ok(loaded)
    }

    /// Loads the bank at `source`, falling back to an empty bank on any error.
    pub fn load(source: &Path) -> QuestionBank {
        if !source.exists() {
            log::warn!("Question file does not exist: {:?}", source);
            return QuestionBank::default();
        }
        match Self::open(source, &mut rand::thread_rng()) {
            Ok((bank, report)) => {
                if report.skipped_count() > 0 {
                    log::warn!(
                        "Skipped {} of {} questions in {:?}",
                        report.skipped_count(),
                        report.total,
                        source
                    );
                }
                bank
            }
            Err(e) => {
                log::warn!("{:#}", e);
                QuestionBank::default()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }
}
