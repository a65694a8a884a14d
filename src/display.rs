use std::fmt;

use crate::bits::iter_bits;
use crate::spec::{Spec, ALL_DAYS, ALL_HOURS, ALL_MINUTES, ALL_MONTHS};

/// Renders the canonical expression: five fields, or six when seconds are
/// active. The output parses back to an equal `Spec`.
impl fmt::Display for Spec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_seconds() {
            write_set(f, self.seconds, ALL_MINUTES, 0)?;
            f.write_str(" ")?;
        }
        write_set(f, self.minutes, ALL_MINUTES, 0)?;
        f.write_str(" ")?;
        write_set(f, u64::from(self.hours), u64::from(ALL_HOURS), 0)?;
        f.write_str(" ")?;
        self.write_days(f)?;
        f.write_str(" ")?;
        write_set(f, u64::from(self.months), u64::from(ALL_MONTHS), 1)?;
        f.write_str(" ")?;
        self.write_weekdays(f)
    }
}

impl Spec {
    fn write_days(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let is_default = self.days == ALL_DAYS
            && self.last_days == 0
            && self.weekdays == 0
            && self.weekdays_strict == 0;
        if is_default || (self.days == 0 && self.last_days == 0) {
            return f.write_str("*");
        }
        let mut items = Vec::new();
        if self.days != 0 {
            items.extend(runs(u64::from(self.days), 1).map(|r| r.render("")));
        }
        if self.last_days != 0 {
            // bit 30 is "1 from the end", so read the set from the top down
            let reversed = u64::from(self.last_days.reverse_bits() >> 1);
            items.extend(runs(reversed, 1).map(|r| r.render("^")));
        }
        f.write_str(&items.join(","))
    }

    fn write_weekdays(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.weekdays == 0 && self.weekdays_strict == 0 {
            return f.write_str("*");
        }
        let mut items: Vec<String> = runs(u64::from(self.weekdays), 0)
            .map(|r| r.render(""))
            .collect();
        items.extend(runs(u64::from(self.weekdays_strict), 0).map(|r| r.render("&")));
        f.write_str(&items.join(","))
    }
}

/// Write a plain numeric field, `*` when every value is selected.
fn write_set(
    f: &mut fmt::Formatter<'_>,
    set: u64,
    all: u64,
    offset: u32,
) -> fmt::Result {
    if set == all {
        return f.write_str("*");
    }
    let items: Vec<String> = runs(set, offset).map(|r| r.render("")).collect();
    f.write_str(&items.join(","))
}

/// An inclusive run of consecutive values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Run {
    start: u32,
    end: u32,
}

impl Run {
    fn render(self, prefix: &str) -> String {
        if self.start == self.end {
            format!("{prefix}{}", self.start)
        } else {
            format!("{prefix}{}-{}", self.start, self.end)
        }
    }
}

/// Group the set bits into runs, shifting each bit index by `offset`.
fn runs(set: u64, offset: u32) -> impl Iterator<Item = Run> {
    let mut bits = iter_bits(set).peekable();
    std::iter::from_fn(move || {
        let start = bits.next()?;
        let mut end = start;
        while bits.peek() == Some(&(end + 1)) {
            end += 1;
            bits.next();
        }
        Some(Run {
            start: start + offset,
            end: end + offset,
        })
    })
}
