use std::iter::FusedIterator;

use jiff::civil::{Date, DateTime, Time};
use jiff::tz::{AmbiguousOffset, TimeZone};
use jiff::Zoned;
use tracing::{debug, trace};

use crate::bits::next_set_bit;
use crate::spec::Spec;

/// Dates and weekdays repeat exactly every 400 Gregorian years; a rule with no
/// match inside one cycle has none at all.
const CALENDAR_CYCLE_YEARS: i16 = 400;

/// Outcome of one pass over the fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// A field had no candidate left at the current position; resume from
    /// this later wall-clock time.
    Carry(DateTime),
    /// Every field accepts this wall-clock time.
    Match(DateTime),
}

fn midnight(date: Date) -> DateTime {
    date.to_datetime(Time::midnight())
}

fn at(date: Date, hour: i8, minute: i8, second: i8) -> Option<DateTime> {
    Time::new(hour, minute, second, 0)
        .ok()
        .map(|time| date.to_datetime(time))
}

/// The 1st of the month after `date`'s.
fn first_of_next_month(date: Date) -> Option<Date> {
    if date.month() == 12 {
        Date::new(date.year().checked_add(1)?, 1, 1).ok()
    } else {
        Date::new(date.year(), date.month() + 1, 1).ok()
    }
}

/// Step size of the rule: one second when seconds are active, else a minute.
fn unit(spec: &Spec) -> jiff::Span {
    if spec.has_seconds() {
        jiff::Span::new().seconds(1)
    } else {
        jiff::Span::new().minutes(1)
    }
}

/// Drop everything below the rule's unit.
fn truncate(dt: DateTime, spec: &Spec) -> Option<DateTime> {
    let second = if spec.has_seconds() { dt.second() } else { 0 };
    at(dt.date(), dt.hour(), dt.minute(), second)
}

/// Whether the whole wall-clock hour is skipped by a daylight-saving gap.
///
/// Re-derives the hour from the instant each end of the hour resolves to; in
/// a gap the resolved time is pushed forward out of the intended hour.
fn hour_skipped(date: Date, hour: i8, tz: &TimeZone) -> bool {
    let leaves_hour = |minute: i8, second: i8| {
        at(date, hour, minute, second)
            .and_then(|dt| dt.to_zoned(tz.clone()).ok())
            .is_some_and(|zdt| zdt.hour() != hour)
    };
    leaves_hour(0, 0) && leaves_hour(59, 59)
}

/// One pass of month, day, hour, minute and second resolution.
///
/// Any field that has to move forward returns a carry; the caller restarts
/// from the month, since the move may cross into a disallowed month or a
/// month with a different day layout. `None` means the calendar ran out.
fn resolve(spec: &Spec, cur: DateTime, tz: &TimeZone) -> Option<Step> {
    let date = cur.date();

    let month = (cur.month() - 1) as u32;
    match next_set_bit(u64::from(spec.months), month) {
        Some(m) if m == month => {}
        Some(m) => {
            let first = Date::new(cur.year(), m as i8 + 1, 1).ok()?;
            return Some(Step::Carry(midnight(first)));
        }
        None => {
            let m = spec.months.trailing_zeros() as i8;
            let first = Date::new(cur.year().checked_add(1)?, m + 1, 1).ok()?;
            return Some(Step::Carry(midnight(first)));
        }
    }

    let day = (cur.day() - 1) as u32;
    let days = spec.day_set(cur.year(), cur.month());
    match next_set_bit(u64::from(days), day) {
        Some(d) if d == day => {}
        Some(d) => {
            let next = Date::new(cur.year(), cur.month(), d as i8 + 1).ok()?;
            return Some(Step::Carry(midnight(next)));
        }
        None => return Some(Step::Carry(midnight(first_of_next_month(date)?))),
    }

    let hour = cur.hour();
    match next_set_bit(u64::from(spec.hours), hour as u32) {
        Some(h) if h == hour as u32 => {}
        Some(h) => return Some(Step::Carry(at(date, h as i8, 0, 0)?)),
        None => return Some(Step::Carry(midnight(date.tomorrow().ok()?))),
    }
    if hour_skipped(date, hour, tz) {
        // the rest of a spring-forward day is given up along with the hour
        return Some(Step::Carry(midnight(date.tomorrow().ok()?)));
    }

    let minute = cur.minute();
    match next_set_bit(spec.minutes, minute as u32) {
        Some(m) if m == minute as u32 => {}
        Some(m) => return Some(Step::Carry(at(date, hour, m as i8, 0)?)),
        None => {
            let next_hour = at(date, hour, 0, 0)?
                .checked_add(jiff::Span::new().hours(1))
                .ok()?;
            return Some(Step::Carry(next_hour));
        }
    }

    let second = cur.second();
    let second_ok = if spec.has_seconds() {
        match next_set_bit(spec.seconds, second as u32) {
            Some(s) if s == second as u32 => true,
            Some(s) => return Some(Step::Carry(at(date, hour, minute, s as i8)?)),
            None => false,
        }
    } else {
        second == 0
    };
    if !second_ok {
        let next_minute = at(date, hour, minute, 0)?
            .checked_add(jiff::Span::new().minutes(1))
            .ok()?;
        return Some(Step::Carry(next_minute));
    }

    Some(Step::Match(cur))
}

/// Earliest instant for wall-clock time `dt` that is later than `after`.
///
/// A time inside a gap has no instant; a time inside a fold has two.
fn earliest_instant(dt: DateTime, tz: &TimeZone, after: &Zoned) -> Option<Zoned> {
    let offsets = match tz.to_ambiguous_zoned(dt).offset() {
        AmbiguousOffset::Unambiguous { offset } => [Some(offset), None],
        AmbiguousOffset::Gap { .. } => [None, None],
        AmbiguousOffset::Fold { before, after } => [Some(before), Some(after)],
    };
    offsets
        .into_iter()
        .flatten()
        .filter_map(|offset| offset.to_timestamp(dt).ok())
        .map(|ts| ts.to_zoned(tz.clone()))
        .find(|zdt| zdt > after)
}

/// When `after` sits in the first pass through a repeated wall-clock hour,
/// the wall-clock time the repeat starts counting from: `after` read with the
/// offset that follows the transition.
fn fold_rewind(after: &Zoned) -> Option<DateTime> {
    match after.time_zone().to_ambiguous_zoned(after.datetime()).offset() {
        AmbiguousOffset::Fold { before, after: later } if after.offset() == before => {
            Some(later.to_datetime(after.timestamp()))
        }
        _ => None,
    }
}

/// Walk wall-clock time forward from `cur` until a match has an instant later
/// than `after`. With `stop`, give up once the wall clock passes it.
fn search(
    spec: &Spec,
    tz: &TimeZone,
    after: &Zoned,
    mut cur: DateTime,
    stop: Option<DateTime>,
) -> Option<Zoned> {
    let unit = unit(spec);
    let last_year = cur.year().saturating_add(CALENDAR_CYCLE_YEARS);

    loop {
        if cur.year() > last_year {
            debug!(spec = %spec, from = %after, "no occurrence within a full calendar cycle");
            return None;
        }
        if stop.is_some_and(|stop| cur > stop) {
            return None;
        }
        match resolve(spec, cur, tz)? {
            Step::Carry(next) => {
                trace!(from = %cur, to = %next, "carry");
                cur = next;
            }
            Step::Match(candidate) => {
                if stop.is_some_and(|stop| candidate > stop) {
                    return None;
                }
                if let Some(found) = earliest_instant(candidate, tz, after) {
                    return Some(found);
                }
                trace!(at = %candidate, "wall-clock time does not exist here, skipping");
                cur = candidate.checked_add(unit).ok()?;
            }
        }
    }
}

/// Compute the earliest instant strictly after `after` that satisfies `spec`,
/// in `after`'s time zone.
///
/// `None` means no such instant exists: either the rule can never be
/// satisfied (day 30 of February) or the answer lies beyond the range of
/// representable dates.
pub fn next_after(spec: &Spec, after: &Zoned) -> Option<Zoned> {
    if !spec.is_feasible() {
        debug!(spec = %spec, "rule can never be satisfied");
        return None;
    }

    let tz = after.time_zone().clone();
    let start = truncate(after.datetime(), spec)?.checked_add(unit(spec)).ok()?;
    let found = search(spec, &tz, after, start, None);

    // Inside the first pass of a repeated hour, the second pass may hold an
    // earlier instant than anything later on the wall clock.
    let repeat = fold_rewind(after).and_then(|rewound| {
        let start = truncate(rewound, spec)?.checked_add(unit(spec)).ok()?;
        search(spec, &tz, after, start, Some(after.datetime()))
    });

    match (found, repeat) {
        (Some(found), Some(repeat)) if repeat < found => Some(repeat),
        (None, Some(repeat)) => Some(repeat),
        (found, _) => found,
    }
}

/// Compute the next `n` occurrences after `after`.
pub fn next_n_after(spec: &Spec, after: &Zoned, n: usize) -> Vec<Zoned> {
    Occurrences::new(*spec, after.clone()).take(n).collect()
}

/// Whether `datetime`, read in its own time zone, satisfies every field.
///
/// Sub-second precision is ignored. Without an explicit seconds field only
/// second :00 matches.
pub fn matches(spec: &Spec, datetime: &Zoned) -> bool {
    let contains = |set: u64, index: i8| set & (1u64 << index) != 0;
    let days = spec.day_set(datetime.year(), datetime.month());

    let second_ok = if spec.has_seconds() {
        contains(spec.seconds, datetime.second())
    } else {
        datetime.second() == 0
    };

    contains(u64::from(spec.months), datetime.month() - 1)
        && contains(u64::from(days), datetime.day() - 1)
        && contains(u64::from(spec.hours), datetime.hour())
        && contains(spec.minutes, datetime.minute())
        && second_ok
}

/// Lazy iterator over the occurrences of a rule after a given instant.
#[derive(Debug, Clone)]
pub struct Occurrences {
    spec: Spec,
    current: Option<Zoned>,
}

impl Occurrences {
    /// Create a new iterator starting after `from`.
    pub fn new(spec: Spec, from: Zoned) -> Self {
        Self {
            spec,
            current: Some(from),
        }
    }
}

impl Iterator for Occurrences {
    type Item = Zoned;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current.take()?;
        let next = next_after(&self.spec, &current)?;
        self.current = Some(next.clone());
        Some(next)
    }
}

impl FusedIterator for Occurrences {}

/// Occurrences in the range `(from, to]`.
#[derive(Debug, Clone)]
pub struct BoundedOccurrences {
    inner: Occurrences,
    to: Zoned,
}

impl BoundedOccurrences {
    pub fn new(spec: Spec, from: Zoned, to: Zoned) -> Self {
        Self {
            inner: Occurrences::new(spec, from),
            to,
        }
    }
}

impl Iterator for BoundedOccurrences {
    type Item = Zoned;

    fn next(&mut self) -> Option<Self::Item> {
        match self.inner.next() {
            Some(dt) if dt <= self.to => Some(dt),
            Some(_) => {
                // past the end bound; stop for good
                self.inner.current = None;
                None
            }
            None => None,
        }
    }
}

impl FusedIterator for BoundedOccurrences {}

/// Create a bounded iterator of occurrences in the range `(from, to]`.
pub fn between(spec: &Spec, from: &Zoned, to: &Zoned) -> BoundedOccurrences {
    BoundedOccurrences::new(*spec, from.clone(), to.clone())
}
