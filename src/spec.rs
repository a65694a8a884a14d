use jiff::civil::Date;

use crate::bits;

/// Every month, bit 0 = January.
pub const ALL_MONTHS: u16 = 0x0fff;
/// Every day of the month, bit 0 = the 1st.
pub const ALL_DAYS: u32 = 0x7fff_ffff;
/// Every hour, bit 0 = midnight.
pub const ALL_HOURS: u32 = 0x00ff_ffff;
/// Every minute (and every second), exactly 60 bits.
pub const ALL_MINUTES: u64 = (1 << 60) - 1;

/// Length of each month in the longest year, used by the feasibility scan.
const MAX_MONTH_LEN: [u8; 12] = [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// An immutable recurrence rule: one bitset per field, with the zero-value
/// defaults already applied.
///
/// Construct one with [`Spec::parse`] or [`SpecBuilder`](crate::SpecBuilder).
/// Day selection combines three sets: `days` and `last_days` are
/// alternatives, `weekdays` adds further alternatives, and `weekdays_strict`
/// filters whatever `days`/`last_days` selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Spec {
    pub(crate) months: u16,
    pub(crate) days: u32,
    pub(crate) last_days: u32,
    pub(crate) weekdays: u8,
    pub(crate) weekdays_strict: u8,
    pub(crate) hours: u32,
    pub(crate) minutes: u64,
    pub(crate) seconds: u64,
}

impl Spec {
    /// Bit i = month i+1.
    pub fn months(&self) -> u16 {
        self.months
    }

    /// Bit i = day-of-month i+1.
    pub fn days(&self) -> u32 {
        self.days
    }

    /// End-anchored: bit 30 = last day, bit 29 = second-to-last, ...
    pub fn last_days(&self) -> u32 {
        self.last_days
    }

    /// Bit i = weekday i, Sunday = 0.
    pub fn weekdays(&self) -> u8 {
        self.weekdays
    }

    /// Weekdays that filter the selected days, Sunday = 0.
    pub fn weekdays_strict(&self) -> u8 {
        self.weekdays_strict
    }

    /// Bit i = hour i.
    pub fn hours(&self) -> u32 {
        self.hours
    }

    /// Bit i = minute i.
    pub fn minutes(&self) -> u64 {
        self.minutes
    }

    /// Zero means "second :00 only"; see [`has_seconds`](Spec::has_seconds).
    pub fn seconds(&self) -> u64 {
        self.seconds
    }

    /// Whether the rule resolves at second granularity.
    pub fn has_seconds(&self) -> bool {
        self.seconds != 0
    }

    /// The days of the given month selected by this rule, bit 0 = the 1st.
    pub fn day_set(&self, year: i16, month: i8) -> u32 {
        let Ok(first) = Date::new(year, month, 1) else {
            return 0;
        };
        let len = first.days_in_month() as u8;
        let valid = bits::month_mask(len);

        let mut anchored =
            (self.days & valid) | bits::last_days_to_days(self.last_days, len);
        if self.weekdays_strict != 0 {
            let first_weekday = first.weekday().to_sunday_zero_offset() as u8;
            anchored &= bits::weekdays_to_days(self.weekdays_strict, first_weekday);
        }
        let alternatives = if self.weekdays != 0 {
            let first_weekday = first.weekday().to_sunday_zero_offset() as u8;
            bits::weekdays_to_days(self.weekdays, first_weekday)
        } else {
            0
        };
        (anchored | alternatives) & valid
    }

    /// Whether any instant can ever satisfy the rule.
    ///
    /// Weekday filters never make a rule infeasible on their own, because
    /// every day-of-month eventually falls on every weekday. What can fail is
    /// a day constraint that no allowed month is long enough to contain.
    pub fn is_feasible(&self) -> bool {
        if self.weekdays != 0 {
            return self.months != 0;
        }
        (0..12usize).filter(|&m| self.months & (1 << m) != 0).any(|m| {
            let len = MAX_MONTH_LEN[m];
            let days = self.days & bits::month_mask(len);
            let last = bits::last_days_to_days(self.last_days, len);
            days | last != 0
        })
    }
}
