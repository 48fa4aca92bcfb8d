//! KNX group addresses: the identifiers of bus datapoints.
//!
//! Two notations are accepted:
//!
//! | Notation | Form | Ranges |
//! |----------|------|--------|
//! | three-level | `main/middle/sub` | `0..=31` / `0..=7` / `0..=255` |
//! | two-level | `main/sub` | `0..=31` / `0..=2047` |
//!
//! Both encode the same 16-bit value, so `1/2/3` and `1/515` compare equal.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Notation {
    ThreeLevel,
    TwoLevel,
}

/// A validated KNX group address.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GroupAddress {
    raw: u16,
    notation: Notation,
}

impl PartialEq for GroupAddress {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for GroupAddress {}

impl Hash for GroupAddress {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl fmt::Display for GroupAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let main = self.raw >> 11;
        match self.notation {
            Notation::ThreeLevel => {
                let middle = (self.raw >> 8) & 0x07;
                let sub = self.raw & 0xFF;
                write!(f, "{main}/{middle}/{sub}")
            }
            Notation::TwoLevel => write!(f, "{main}/{}", self.raw & 0x07FF),
        }
    }
}

impl FromStr for GroupAddress {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ValidationError::EmptyGroupAddress);
        }
        let invalid = || ValidationError::InvalidGroupAddress(s.to_string());

        let parts = s
            .split('/')
            .map(|part| part.parse::<u16>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>, _>>()?;

        match *parts.as_slice() {
            [main, middle, sub] if main <= 31 && middle <= 7 && sub <= 255 => Ok(Self {
                raw: (main << 11) | (middle << 8) | sub,
                notation: Notation::ThreeLevel,
            }),
            [main, sub] if main <= 31 && sub <= 2047 => Ok(Self {
                raw: (main << 11) | sub,
                notation: Notation::TwoLevel,
            }),
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for GroupAddress {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<GroupAddress> for String {
    fn from(value: GroupAddress) -> Self {
        value.to_string()
    }
}
