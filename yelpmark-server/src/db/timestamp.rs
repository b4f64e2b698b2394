//! Deserialization policy for `timestamp without time zone` columns
//!
//! The schema stores naive timestamps. The policy says which offset they are
//! written in, so rows can be turned into `DateTime<Utc>` without guessing.
//! Writes go through the same policy so new rows sort with legacy ones.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeDelta, Utc};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimestampPolicy {
    /// Naive values are UTC wall-clock times
    #[default]
    Utc,
    /// Naive values are wall-clock times at a fixed offset
    Offset(FixedOffset),
}

impl TimestampPolicy {
    /// Interpret a naive column value under this policy.
    pub fn resolve(&self, naive: NaiveDateTime) -> DateTime<Utc> {
        match self {
            Self::Utc => naive.and_utc(),
            Self::Offset(offset) => {
                (naive - TimeDelta::seconds(i64::from(offset.local_minus_utc()))).and_utc()
            }
        }
    }

    /// Wall-clock value to store for `at` under this policy.
    pub fn to_naive(&self, at: DateTime<Utc>) -> NaiveDateTime {
        match self {
            Self::Utc => at.naive_utc(),
            Self::Offset(offset) => at.with_timezone(offset).naive_local(),
        }
    }

    /// Current time as a column value.
    pub fn now(&self) -> NaiveDateTime {
        self.to_naive(Utc::now())
    }
}

impl FromStr for TimestampPolicy {
    type Err = String;

    /// Accepts `utc`, `z`, or an offset such as `+02:00` / `-05:30`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("utc") || s.eq_ignore_ascii_case("z") {
            return Ok(Self::Utc);
        }

        let offset = FixedOffset::from_str(s)
            .map_err(|e| format!("invalid timestamp offset '{}': {}", s, e))?;
        if offset.local_minus_utc() == 0 {
            Ok(Self::Utc)
        } else {
            Ok(Self::Offset(offset))
        }
    }
}

impl fmt::Display for TimestampPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Utc => write!(f, "UTC"),
            Self::Offset(offset) => write!(f, "{}", offset),
        }
    }
}
