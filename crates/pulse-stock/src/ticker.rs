//! Ticker input parsing

use crate::error::{PulseError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::BufRead;

/// A stock ticker symbol, upper-cased
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ticker(String);

impl Ticker {
    /// Take the first whitespace-delimited token of `input`
    pub fn parse(input: &str) -> Result<Self> {
        let token = input
            .split_whitespace()
            .next()
            .ok_or_else(|| PulseError::InvalidTicker(input.to_string()))?;

        if token.chars().any(char::is_control) {
            return Err(PulseError::InvalidTicker(token.to_string()));
        }

        Ok(Self(token.to_uppercase()))
    }

    /// Read one line from `reader` and parse it
    pub fn read_from<R: BufRead>(mut reader: R) -> Result<Self> {
        let mut line = String::new();
        reader.read_line(&mut line)?;
        Self::parse(&line)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
