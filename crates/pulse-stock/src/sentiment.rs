//! Per-source classification and aggregate verdicts
//!
//! A source votes -1, 0 or +1 depending on its sentiment reading. The votes
//! are averaged into a single [`Verdict`].

use crate::error::{PulseError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Readings at or below this magnitude are too flat to count either way
pub const NEUTRAL_MAGNITUDE_CEILING: f64 = 1.0;

/// A score must move strictly past this distance from zero to vote
pub const SCORE_THRESHOLD: f64 = 0.2;

/// An average must fall strictly below `-VERDICT_THRESHOLD` to be negative,
/// and reach `VERDICT_THRESHOLD` to be positive
pub const VERDICT_THRESHOLD: f64 = 0.33;

/// Document-level sentiment for one piece of text
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentReading {
    /// Overall emotional intensity, 0..inf
    pub magnitude: f64,
    /// Polarity, -1..1
    pub score: f64,
}

impl SentimentReading {
    pub fn new(magnitude: f64, score: f64) -> Self {
        Self { magnitude, score }
    }

    /// Classify this reading into a per-source label
    pub fn classify(&self) -> Label {
        if self.magnitude <= NEUTRAL_MAGNITUDE_CEILING {
            Label::Neutral
        } else if self.score < -SCORE_THRESHOLD {
            Label::Negative
        } else if self.score > SCORE_THRESHOLD {
            Label::Positive
        } else {
            Label::Neutral
        }
    }
}

/// Three-level sentiment label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Negative,
    Neutral,
    Positive,
}

impl Label {
    /// The integer vote this label contributes to an average
    pub fn vote(self) -> i32 {
        match self {
            Self::Negative => -1,
            Self::Neutral => 0,
            Self::Positive => 1,
        }
    }

    /// Map an average of votes onto a label
    pub fn from_average(average: f64) -> Self {
        if average < -VERDICT_THRESHOLD {
            Self::Negative
        } else if average < VERDICT_THRESHOLD {
            Self::Neutral
        } else {
            Self::Positive
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Negative => "negative",
            Self::Neutral => "neutral",
            Self::Positive => "positive",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregate verdict over every scored source
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub average: f64,
    pub label: Label,
    pub sources: usize,
}

impl Verdict {
    /// Average a list of votes.
    ///
    /// An empty list has no mean and is rejected with
    /// [`PulseError::NoSources`].
    pub fn from_votes(votes: &[i32]) -> Result<Self> {
        if votes.is_empty() {
            return Err(PulseError::NoSources("an empty vote list".to_string()));
        }

        let total: i32 = votes.iter().sum();
        let average = f64::from(total) / votes.len() as f64;

        Ok(Self {
            average,
            label: Label::from_average(average),
            sources: votes.len(),
        })
    }

    /// Average the votes behind a list of per-source labels
    pub fn from_labels(labels: &[Label]) -> Result<Self> {
        let votes: Vec<i32> = labels.iter().map(|label| label.vote()).collect();
        Self::from_votes(&votes)
    }
}
