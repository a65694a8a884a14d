//! Programmatic construction of a [`Spec`].
//!
//! ```
//! use cronspec::SpecBuilder;
//!
//! // 09:30 on weekdays
//! let spec = SpecBuilder::new()
//!     .minutes([30])
//!     .hours([9])
//!     .weekday_range(1, 5, 1)
//!     .build()
//!     .unwrap();
//! assert_eq!(spec.to_string(), "30 9 * * 1-5");
//! ```

use crate::error::CronError;
use crate::field::Field;
use crate::spec::{Spec, ALL_DAYS, ALL_HOURS, ALL_MINUTES, ALL_MONTHS};

/// Accumulates per-field bitset unions; defaulting happens once, in
/// [`build`](SpecBuilder::build).
///
/// Calls may come in any order. The first invalid value is remembered and
/// reported by `build`; later calls are ignored once an error is recorded.
#[derive(Debug, Clone, Default)]
pub struct SpecBuilder {
    sets: [u64; 8],
    error: Option<CronError>,
}

impl SpecBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add explicit values to a field.
    pub fn values(mut self, field: Field, values: impl IntoIterator<Item = u8>) -> Self {
        for value in values {
            if self.error.is_some() {
                break;
            }
            match field.validate(i64::from(value), i64::from(value), 0) {
                Ok((low, high)) => self.union(field, field.to_bits(low, high, 0)),
                Err(kind) => self.error = Some(CronError::builder(field, kind)),
            }
        }
        self
    }

    /// Add `low, low+step, ...` up to `high` to a field.
    ///
    /// A negative `high` stands for the field's maximum; a `step` of zero or
    /// less selects the single value `low`.
    pub fn range(mut self, field: Field, low: i32, high: i32, step: i32) -> Self {
        if self.error.is_some() {
            return self;
        }
        let (high, step) = if step <= 0 {
            (low, 0)
        } else if high < 0 {
            (i32::from(field.max()), step)
        } else {
            (high, step)
        };
        match field.validate(i64::from(low), i64::from(high), step as u32) {
            Ok((low, high)) => self.union(field, field.to_bits(low, high, step as u32)),
            Err(kind) => self.error = Some(CronError::builder(field, kind)),
        }
        self
    }

    pub fn seconds(self, values: impl IntoIterator<Item = u8>) -> Self {
        self.values(Field::Second, values)
    }

    pub fn second_range(self, low: i32, high: i32, step: i32) -> Self {
        self.range(Field::Second, low, high, step)
    }

    pub fn minutes(self, values: impl IntoIterator<Item = u8>) -> Self {
        self.values(Field::Minute, values)
    }

    pub fn minute_range(self, low: i32, high: i32, step: i32) -> Self {
        self.range(Field::Minute, low, high, step)
    }

    pub fn hours(self, values: impl IntoIterator<Item = u8>) -> Self {
        self.values(Field::Hour, values)
    }

    pub fn hour_range(self, low: i32, high: i32, step: i32) -> Self {
        self.range(Field::Hour, low, high, step)
    }

    pub fn days(self, values: impl IntoIterator<Item = u8>) -> Self {
        self.values(Field::DayOfMonth, values)
    }

    pub fn day_range(self, low: i32, high: i32, step: i32) -> Self {
        self.range(Field::DayOfMonth, low, high, step)
    }

    /// Days counted from the end of the month: 1 = last day.
    pub fn last_days(self, values: impl IntoIterator<Item = u8>) -> Self {
        self.values(Field::LastDayOfMonth, values)
    }

    pub fn last_day_range(self, low: i32, high: i32, step: i32) -> Self {
        self.range(Field::LastDayOfMonth, low, high, step)
    }

    /// Months 1-12.
    pub fn months(self, values: impl IntoIterator<Item = u8>) -> Self {
        self.values(Field::Month, values)
    }

    pub fn month_range(self, low: i32, high: i32, step: i32) -> Self {
        self.range(Field::Month, low, high, step)
    }

    /// Weekdays 0-7, Sunday = 0 = 7.
    pub fn weekdays(self, values: impl IntoIterator<Item = u8>) -> Self {
        self.values(Field::Weekday, values)
    }

    pub fn weekday_range(self, low: i32, high: i32, step: i32) -> Self {
        self.range(Field::Weekday, low, high, step)
    }

    /// Weekdays that filter the day-of-month selection instead of adding to it.
    pub fn strict_weekdays(self, values: impl IntoIterator<Item = u8>) -> Self {
        self.values(Field::StrictWeekday, values)
    }

    pub fn strict_weekday_range(self, low: i32, high: i32, step: i32) -> Self {
        self.range(Field::StrictWeekday, low, high, step)
    }

    /// Merge a precomputed bitset into a field. The parser feeds its
    /// already-validated value-expressions through here.
    pub(crate) fn union(&mut self, field: Field, bits: u64) {
        self.sets[field.index()] |= bits & field.all_bits();
    }

    /// Apply the zero-value defaults and produce the immutable [`Spec`].
    pub fn build(self) -> Result<Spec, CronError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        let set = |field: Field| self.sets[field.index()];

        let mut weekdays = fold_sunday(set(Field::Weekday));
        let mut weekdays_strict = fold_sunday(set(Field::StrictWeekday));
        let mut days = set(Field::DayOfMonth) as u32;
        let last_days = set(Field::LastDayOfMonth) as u32;

        if days == 0 && last_days == 0 {
            if weekdays == 0 && weekdays_strict == 0 {
                days = ALL_DAYS;
            } else {
                // nothing to filter, so the restriction is just a weekday set
                weekdays |= weekdays_strict;
                weekdays_strict = 0;
            }
        }

        let or_all = |value: u64, all: u64| if value == 0 { all } else { value };

        Ok(Spec {
            months: or_all(set(Field::Month), u64::from(ALL_MONTHS)) as u16,
            days,
            last_days,
            weekdays,
            weekdays_strict,
            hours: or_all(set(Field::Hour), u64::from(ALL_HOURS)) as u32,
            minutes: or_all(set(Field::Minute), ALL_MINUTES),
            seconds: set(Field::Second),
        })
    }
}

/// Fold the bit-7 alias for Sunday into bit 0.
fn fold_sunday(weekdays: u64) -> u8 {
    let weekdays = weekdays as u8;
    (weekdays & 0x7f) | (weekdays >> 7)
}
