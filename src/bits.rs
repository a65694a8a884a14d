//! Fixed-width bitset helpers shared by the builder, parser and resolver.
//!
//! Every field of a [`Spec`](crate::Spec) is a plain unsigned integer. These
//! helpers operate on `u64` so a single implementation covers all widths; the
//! callers narrow the result to the field's storage type.

/// Build the set `{low, low+step, low+2*step, ...} ∩ [low, high]`.
///
/// A `step` of 0 yields the singleton `{low}`. Callers guarantee
/// `low <= high <= 62`.
pub fn range_to_set(low: u32, high: u32, step: u32) -> u64 {
    match step {
        0 => 1 << low,
        1 => ((1u64 << (high + 1)) - 1) & !((1u64 << low) - 1),
        _ => {
            let mut set = 0u64;
            let mut i = low;
            while i <= high {
                set |= 1 << i;
                i += step;
            }
            set
        }
    }
}

/// Like [`range_to_set`], but value `i` is stored at bit `max - i`.
///
/// Used for end-anchored fields such as the last day of the month, where
/// value 1 (the last day) lands on the highest bit. Callers guarantee
/// `low <= high <= max <= 62`.
pub fn range_to_set_reverse(low: u32, high: u32, step: u32, max: u32) -> u64 {
    match step {
        0 => 1 << (max - low),
        1 => ((1u64 << (max - low + 1)) - 1) & !((1u64 << (max - high)) - 1),
        _ => {
            let mut set = 0u64;
            let mut i = low;
            while i <= high {
                set |= 1 << (max - i);
                i += step;
            }
            set
        }
    }
}

/// Index of the lowest set bit at or above `from`, if any.
pub fn next_set_bit(set: u64, from: u32) -> Option<u32> {
    if from >= 64 {
        return None;
    }
    let masked = set & (u64::MAX << from);
    if masked == 0 {
        None
    } else {
        Some(masked.trailing_zeros())
    }
}

/// Mask covering the first `len` days of a month.
pub fn month_mask(len: u8) -> u32 {
    if len >= 32 {
        u32::MAX
    } else {
        (1u32 << len) - 1
    }
}

/// Expand a weekday set (bit 0 = Sunday) into a day-of-month set for a month
/// whose first day falls on `first_weekday`.
///
/// Day `d` has weekday `(first_weekday + d - 1) mod 7`, so rotating the seven
/// weekday bits right by `first_weekday` gives the pattern for days 1..=7; the
/// pattern then repeats every seven bits. Bits past the end of the month are
/// left for the caller to mask off.
pub fn weekdays_to_days(weekdays: u8, first_weekday: u8) -> u32 {
    let week = u32::from(weekdays & 0x7f);
    let shift = u32::from(first_weekday % 7);
    let pattern = ((week >> shift) | (week << (7 - shift))) & 0x7f;
    pattern | pattern << 7 | pattern << 14 | pattern << 21 | pattern << 28
}

/// Align an end-anchored last-day set (bit 30 = last day) with day-of-month
/// indexing for a month of `month_len` days.
pub fn last_days_to_days(last_days: u32, month_len: u8) -> u32 {
    let shift = 31u32.saturating_sub(u32::from(month_len));
    (last_days >> shift) & month_mask(month_len)
}

/// Iterate over the indices of the set bits, lowest first.
pub fn iter_bits(set: u64) -> impl Iterator<Item = u32> {
    let mut rest = set;
    std::iter::from_fn(move || {
        if rest == 0 {
            return None;
        }
        let bit = rest.trailing_zeros();
        rest &= rest - 1;
        Some(bit)
    })
}
