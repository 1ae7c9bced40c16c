// PMID handling: the identifier newtype and validation of what the user
// types at the "next PMID" prompt.

use crate::error::PmidError;
use std::fmt;

/// Largest PMID accepted (8 digits).
pub const MAX_PMID: u32 = 99_999_999;

/// Word that ends the add loop.
pub const DONE_SENTINEL: &str = "done";

/// A PubMed identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pmid(u32);

impl Pmid {
    /// Returns `None` for values with more than 8 digits.
    pub fn new(value: u32) -> Option<Self> {
        (value <= MAX_PMID).then_some(Self(value))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Pmid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One entry at the PMID prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PmidInput {
    Id(Pmid),
    Done,
}

impl PmidInput {
    /// Parse a line typed by the user.
    ///
    /// Accepts `done` (any case) or an optional `+` followed by digits whose
    /// value fits in 8 digits. Leading zeros do not count towards the limit.
    pub fn parse(input: &str) -> Result<Self, PmidError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(PmidError::Empty);
        }
        if trimmed.eq_ignore_ascii_case(DONE_SENTINEL) {
            return Ok(Self::Done);
        }

        let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PmidError::NotANumber(trimmed.to_string()));
        }

        let significant = digits.trim_start_matches('0');
        if significant.len() > 8 {
            return Err(PmidError::TooLong(trimmed.to_string()));
        }
        // at most 8 digits, so this always fits in a u32
        let value = if significant.is_empty() {
            0
        } else {
            significant
                .parse::<u32>()
                .map_err(|_| PmidError::NotANumber(trimmed.to_string()))?
        };
        Pmid::new(value)
            .map(Self::Id)
            .ok_or_else(|| PmidError::TooLong(trimmed.to_string()))
    }
}
