use std::fmt;

use crate::bits;
use crate::error::ValueError;

/// One of the constrained dimensions of a [`Spec`](crate::Spec).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Second,
    Minute,
    Hour,
    DayOfMonth,
    /// Day counted from the end of the month: 1 = last day.
    LastDayOfMonth,
    Month,
    /// Weekday alternative: 0 = Sunday, 7 is accepted as Sunday too.
    Weekday,
    /// Weekday filter applied to the day-of-month selection.
    StrictWeekday,
}

const MONTH_NAMES: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

const WEEKDAY_NAMES: [&str; 7] = ["sun", "mon", "tue", "wed", "thu", "fri", "sat"];

impl Field {
    pub const ALL: [Field; 8] = [
        Field::Second,
        Field::Minute,
        Field::Hour,
        Field::DayOfMonth,
        Field::LastDayOfMonth,
        Field::Month,
        Field::Weekday,
        Field::StrictWeekday,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Second => "second",
            Self::Minute => "minute",
            Self::Hour => "hour",
            Self::DayOfMonth => "day-of-month",
            Self::LastDayOfMonth => "last-day-of-month",
            Self::Month => "month",
            Self::Weekday => "weekday",
            Self::StrictWeekday => "restricted weekday",
        }
    }

    /// Smallest accepted value.
    pub fn min(self) -> u8 {
        match self {
            Self::Second | Self::Minute | Self::Hour | Self::Weekday | Self::StrictWeekday => 0,
            Self::DayOfMonth | Self::LastDayOfMonth | Self::Month => 1,
        }
    }

    /// Largest accepted value.
    pub fn max(self) -> u8 {
        match self {
            Self::Second | Self::Minute => 59,
            Self::Hour => 23,
            Self::DayOfMonth | Self::LastDayOfMonth => 31,
            Self::Month => 12,
            Self::Weekday | Self::StrictWeekday => 7,
        }
    }

    /// Position of this field in the builder's accumulator array.
    pub(crate) fn index(self) -> usize {
        match self {
            Self::Second => 0,
            Self::Minute => 1,
            Self::Hour => 2,
            Self::DayOfMonth => 3,
            Self::LastDayOfMonth => 4,
            Self::Month => 5,
            Self::Weekday => 6,
            Self::StrictWeekday => 7,
        }
    }

    /// Every valid value of the field as a bitset.
    pub fn all_bits(self) -> u64 {
        self.to_bits(self.min(), self.max(), 1)
    }

    /// Convert a validated range into this field's bitset encoding.
    pub fn to_bits(self, low: u8, high: u8, step: u32) -> u64 {
        let (low, high) = (u32::from(low), u32::from(high));
        match self {
            Self::DayOfMonth | Self::Month => bits::range_to_set(low - 1, high - 1, step),
            Self::LastDayOfMonth => bits::range_to_set_reverse(low, high, step, 31),
            _ => bits::range_to_set(low, high, step),
        }
    }

    /// Check a `low-high/step` triple against the field bounds.
    ///
    /// A step of 0 means "single value at `low`" and skips the span check.
    pub fn validate(self, low: i64, high: i64, step: u32) -> Result<(u8, u8), ValueError> {
        let (min, max) = (self.min(), self.max());
        for value in [low, high] {
            if value < i64::from(min) {
                return Err(ValueError::BelowMinimum { value, min });
            }
            if value > i64::from(max) {
                return Err(ValueError::AboveMaximum { value, max });
            }
        }
        // both bounds are inside [min, max] and fit in u8 now
        let (low, high) = (low as u8, high as u8);
        if low > high {
            return Err(ValueError::InvertedRange { low, high });
        }
        if step > 0 && step > u32::from(high - low) && high != low {
            return Err(ValueError::StepTooLarge {
                step,
                span: high - low,
            });
        }
        Ok((low, high))
    }

    /// Parse a single literal: a decimal number, or a three-letter name for
    /// the month and weekday fields. Range checking is left to [`validate`].
    ///
    /// [`validate`]: Field::validate
    pub fn parse_value(self, text: &str) -> Result<i64, ValueError> {
        if text.is_empty() {
            return Err(ValueError::Empty);
        }
        if text.bytes().all(|b| b.is_ascii_digit()) {
            return text
                .parse::<i64>()
                .map_err(|_| ValueError::NotANumber(text.to_string()));
        }
        let names: &[&str] = match self {
            Self::Month => &MONTH_NAMES,
            Self::Weekday | Self::StrictWeekday => &WEEKDAY_NAMES,
            _ => &[],
        };
        let lower = text.to_ascii_lowercase();
        names
            .iter()
            .position(|name| *name == lower)
            .map(|i| i as i64 + i64::from(self.min()))
            .ok_or_else(|| ValueError::NotANumber(text.to_string()))
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
