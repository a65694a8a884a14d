//! cronspec: cron recurrence rules as bitsets.
//!
//! A [`Spec`] is an immutable set of per-field bitsets (seconds, minutes,
//! hours, days of the month, days counted from the end of the month, months
//! and weekdays). It is built programmatically with [`SpecBuilder`] or parsed
//! from a cron expression, and resolved against a time-zone-aware instant to
//! find the next matching instant.
//!
//! Beyond plain cron, day-of-month items may be counted from the end of the
//! month (`^1` is the last day) and weekday items may restrict the selected
//! days instead of adding to them (`&Mon`).
//!
//! # Examples
//!
//! ```
//! use cronspec::Spec;
//! use jiff::Zoned;
//!
//! // last Monday of every month, at midnight
//! let spec: Spec = "0 0 ^1-7 * &Mon".parse().unwrap();
//! let from: Zoned = "2025-01-01T00:00:00+00:00[UTC]".parse().unwrap();
//! let next = spec.next_after(&from).unwrap();
//! assert_eq!(next.date(), jiff::civil::date(2025, 1, 27));
//! ```

pub mod bits;
pub mod builder;
pub mod display;
pub mod error;
pub mod eval;
pub mod field;
pub mod lexer;
pub mod parser;
pub mod spec;

pub use builder::SpecBuilder;
pub use error::{CronError, Position, Span, ValueError};
pub use eval::{BoundedOccurrences, Occurrences};
pub use field::Field;
pub use parser::{ParseOptions, SecondsField};
pub use spec::Spec;

use jiff::Zoned;
#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

// --- Spec convenience methods ---

impl Spec {
    /// Parse a cron expression with the default options.
    pub fn parse(input: &str) -> Result<Self, CronError> {
        parser::parse(input)
    }

    /// Parse a cron expression with explicit options.
    pub fn parse_with(input: &str, options: &ParseOptions) -> Result<Self, CronError> {
        parser::parse_with(input, options)
    }

    /// Start a [`SpecBuilder`].
    pub fn builder() -> SpecBuilder {
        SpecBuilder::new()
    }

    /// Compute the next occurrence strictly after `after`, in its time zone.
    /// `None` if the rule can never be satisfied.
    pub fn next_after(&self, after: &Zoned) -> Option<Zoned> {
        eval::next_after(self, after)
    }

    /// Compute the next `n` occurrences after `after`.
    pub fn next_n_after(&self, after: &Zoned, n: usize) -> Vec<Zoned> {
        eval::next_n_after(self, after, n)
    }

    /// Lazily iterate over the occurrences after `after`.
    pub fn occurrences(&self, after: &Zoned) -> Occurrences {
        Occurrences::new(*self, after.clone())
    }

    /// Occurrences in the range `(from, to]`.
    pub fn between(&self, from: &Zoned, to: &Zoned) -> BoundedOccurrences {
        eval::between(self, from, to)
    }

    /// Check if a datetime matches this rule.
    pub fn matches(&self, datetime: &Zoned) -> bool {
        eval::matches(self, datetime)
    }
}

impl FromStr for Spec {
    type Err = CronError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(feature = "serde")]
impl Serialize for Spec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Spec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Spec::parse(&s).map_err(serde::de::Error::custom)
    }
}
