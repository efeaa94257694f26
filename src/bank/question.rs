use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Choice {
    A,
    B,
    C,
    D,
}

impl Choice {
    pub fn as_str(self) -> &'static str {
        match self {
            Choice::A => "A",
            Choice::B => "B",
            Choice::C => "C",
            Choice::D => "D",
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("{0:?} is not an option key")]
pub struct InvalidChoice(pub String);

impl FromStr for Choice {
    type Err = InvalidChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "A" => Ok(Choice::A),
            "B" => Ok(Choice::B),
            "C" => Ok(Choice::C),
            "D" => Ok(Choice::D),
            _ => Err(InvalidChoice(s.to_owned())),
        }
    }
}

/// Reasons a source record is kept out of the question bank.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("record is not an object")]
    NotARecord,
    #[error("record has no `options` field")]
    MissingOptions,
    #[error("`options` is not an object")]
    OptionsNotARecord,
    #[error("`options` has no text for any of A, B, C, D")]
    NoUsableOptions,
    #[error("record could not be read: {0}")]
    Malformed(#[from] serde_json::Error),
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn optional_scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(Value::deserialize(deserializer)?))
}

fn scalar_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(Value::deserialize(deserializer)?)
        .map(|s| s.trim().to_owned())
        .unwrap_or_default())
}

#[derive(Debug, Deserialize)]
pub struct RawQuestion {
    #[serde(default, deserialize_with = "optional_scalar")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "scalar_or_empty")]
    pub title: String,
    pub options: BTreeMap<String, Value>,
    #[serde(default, deserialize_with = "scalar_or_empty")]
    pub answer: String,
    #[serde(default, deserialize_with = "scalar_or_empty")]
    pub analysis: String,
}

impl RawQuestion {
    /// Checks the shape of one source record and reads it.
    pub fn from_record(record: Value) -> Result<RawQuestion, RecordError> {
        let fields = match &record {
            Value::Object(fields) => fields,
            _ => return Err(RecordError::NotARecord),
        };
        match fields.get("options") {
            None => return Err(RecordError::MissingOptions),
            Some(Value::Object(_)) => (),
            Some(_) => return Err(RecordError::OptionsNotARecord),
        }
        Ok(serde_json::from_value(record)?)
    }
}

/// An exam item. Immutable once admitted into a bank.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Question {
    pub id: Option<String>,
    pub title: String,
    options: Vec<(Choice, String)>,
    pub answer: String,
    pub analysis: Option<String>,
}

impl Question {
    #[cfg(test)]
    pub fn new(
        id: Option<String>,
        title: &str,
        options: &[(Choice, &str)],
        answer: &str,
        analysis: &str,
    ) -> Self {
        let mut options: Vec<(Choice, String)> = options
            .iter()
            .map(|(choice, text)| (*choice, (*text).to_owned()))
            .collect();
        options.sort_by_key(|(choice, _)| *choice);
        options.dedup_by_key(|(choice, _)| *choice);
        Question {
            id,
            title: title.to_owned(),
            options,
            answer: answer.trim().to_owned(),
            analysis: Some(analysis.trim().to_owned()).filter(|a| !a.is_empty()),
        }
    }

    /// Visible options in alphabet order.
    pub fn options(&self) -> &[(Choice, String)] {
        &self.options
    }

    pub fn option_text(&self, choice: Choice) -> Option<&str> {
        self.options
            .iter()
            .find(|(c, _)| *c == choice)
            .map(|(_, text)| text.as_str())
    }

    /// The answer as one of this question's visible options, if it is one.
    pub fn correct_choice(&self) -> Option<Choice> {
        self.answer
            .parse::<Choice>()
            .ok()
            .filter(|choice| self.option_text(*choice).is_some())
    }

    pub fn is_correct(&self, choice: Choice) -> bool {
        self.correct_choice() == Some(choice)
    }
}

impl std::convert::TryFrom<RawQuestion> for Question {
    type Error = RecordError;

    fn try_from(raw_question: RawQuestion) -> Result<Self, Self::Error> {
        let mut options = Vec::new();
        for (key, value) in raw_question.options {
            match (key.parse::<Choice>(), value) {
                (Ok(choice), Value::String(text)) => options.push((choice, text)),
                (_, value) => log::debug!("Ignoring option {:?}: {}", key, value),
            }
        }
        if options.is_empty() {
            return Err(RecordError::NoUsableOptions);
        }
        options.sort_by_key(|(choice, _)| *choice);
        options.dedup_by_key(|(choice, _)| *choice);

        let analysis = Some(raw_question.analysis).filter(|a| !a.is_empty());
        Ok(Question {
            id: raw_question.id,
            title: raw_question.title,
            options,
            answer: raw_question.answer,
            analysis,
        })
    }
}
