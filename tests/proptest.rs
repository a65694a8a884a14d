use cronspec::{Spec, SpecBuilder};
use jiff::Zoned;
use proptest::prelude::*;

/// A single list item for a numeric field with bounds `min..=max`.
fn arb_item(min: u8, max: u8) -> impl Strategy<Value = String> {
    prop_oneof![
        (min..=max).prop_map(|v| v.to_string()),
        (min..=max, min..=max).prop_map(|(a, b)| {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            format!("{lo}-{hi}")
        }),
        (1u8..=10).prop_map(|s| format!("*/{s}")),
    ]
}

/// A field: `*` or a comma list of one to three items.
fn arb_field(min: u8, max: u8) -> impl Strategy<Value = String> {
    prop_oneof![
        1 => Just("*".to_string()),
        3 => prop::collection::vec(arb_item(min, max), 1..=3).prop_map(|items| items.join(",")),
    ]
}

fn arb_day_item() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => (1u8..=28).prop_map(|d| d.to_string()),
        1 => (1u8..=31).prop_map(|d| d.to_string()),
        2 => (1u8..=7).prop_map(|d| format!("^{d}")),
        1 => (1u8..=7, 0u8..=6).prop_map(|(d, n)| format!("^{d}-{}", d + n)),
        1 => (1u8..=21).prop_map(|d| format!("{d}-{}", d + 6)),
    ]
}

fn arb_days() -> impl Strategy<Value = String> {
    prop_oneof![
        1 => Just("*".to_string()),
        3 => prop::collection::vec(arb_day_item(), 1..=2).prop_map(|items| items.join(",")),
    ]
}

fn arb_weekdays() -> impl Strategy<Value = String> {
    prop_oneof![
        2 => Just("*".to_string()),
        1 => (0u8..=6).prop_map(|d| d.to_string()),
        1 => (0u8..=6).prop_map(|d| format!("&{d}")),
        1 => (0u8..=6, 0u8..=6).prop_map(|(a, b)| format!("{a},&{b}")),
        1 => Just("Mon-Fri".to_string()),
    ]
}

/// Generate a valid cron expression, with or without seconds.
fn arb_expression() -> impl Strategy<Value = String> {
    (
        prop::option::of(arb_field(0, 59)),
        arb_field(0, 59),
        arb_field(0, 23),
        arb_days(),
        arb_field(1, 12),
        arb_weekdays(),
    )
        .prop_map(|(sec, min, hour, dom, month, dow)| match sec {
            Some(sec) => format!("{sec} {min} {hour} {dom} {month} {dow}"),
            None => format!("{min} {hour} {dom} {month} {dow}"),
        })
}

fn arb_zone() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("UTC"),
        Just("America/New_York"),
        Just("Europe/London"),
        Just("Australia/Lord_Howe"),
        Just("Asia/Kolkata"),
    ]
}

/// Zones that never skip a whole wall-clock hour. A skipped hour gives up the
/// rest of its day, so only these keep every later match on that day.
fn arb_gapless_hour_zone() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("UTC"),
        Just("Australia/Lord_Howe"),
        Just("Asia/Kolkata"),
    ]
}

/// An instant between 2024 and 2030 in one of a few zones.
fn arb_now() -> impl Strategy<Value = Zoned> {
    arb_now_in(arb_zone())
}

fn arb_now_in(zone: impl Strategy<Value = &'static str>) -> impl Strategy<Value = Zoned> {
    (1_704_067_200i64..1_893_456_000, zone).prop_map(|(secs, tz)| {
        jiff::Timestamp::from_second(secs)
            .unwrap()
            .in_tz(tz)
            .unwrap()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Rendering then re-parsing gives back the same spec.
    #[test]
    fn display_roundtrip(expr in arb_expression()) {
        let spec = Spec::parse(&expr).unwrap();
        let displayed = spec.to_string();
        let reparsed = Spec::parse(&displayed)
            .unwrap_or_else(|e| panic!("re-parse failed for '{displayed}': {e}"));
        prop_assert_eq!(spec, reparsed,
            "roundtrip changed the rule: '{}' -> '{}'", expr, displayed);
    }

    /// next_after must always return a time strictly after its input.
    #[test]
    fn temporal_ordering(expr in arb_expression(), now in arb_now()) {
        let spec = Spec::parse(&expr).unwrap();
        if let Some(next) = spec.next_after(&now) {
            prop_assert!(next > now,
                "next_after returned {} which is not after {} for '{}'", next, now, expr);
        }
    }

    /// Whatever next_after returns satisfies the rule.
    #[test]
    fn self_consistency(expr in arb_expression(), now in arb_now()) {
        let spec = Spec::parse(&expr).unwrap();
        if let Some(next) = spec.next_after(&now) {
            prop_assert!(spec.matches(&next),
                "next_after returned {} but matches() is false for '{}'", next, expr);
            prop_assert_eq!(next.time_zone(), now.time_zone());
        }
    }

    /// No matching instant lies strictly between the input and the result.
    #[test]
    fn nothing_skipped(expr in arb_expression(), now in arb_now_in(arb_gapless_hour_zone())) {
        let spec = Spec::parse(&expr).unwrap();
        if let Some(next) = spec.next_after(&now) {
            let step = if spec.has_seconds() { 1 } else { 60 };
            let start = now.timestamp().as_second().div_euclid(step) * step + step;
            let end = next.timestamp().as_second();
            // bounded walk; long gaps are covered by the other properties
            for secs in (start..end).step_by(step as usize).take(2_000) {
                let t = jiff::Timestamp::from_second(secs)
                    .unwrap()
                    .to_zoned(now.time_zone().clone());
                prop_assert!(!spec.matches(&t),
                    "'{}' skipped {} between {} and {}", expr, t, now, next);
            }
        }
    }

    /// Feeding a result back in gives the next one, and results only grow.
    #[test]
    fn sequence_consistency(expr in arb_expression(), now in arb_now()) {
        let spec = Spec::parse(&expr).unwrap();
        let seq = spec.next_n_after(&now, 5);
        for pair in seq.windows(2) {
            prop_assert!(pair[0] < pair[1]);
            let next = spec.next_after(&pair[0]);
            prop_assert_eq!(next.as_ref(), Some(&pair[1]));
        }
    }

    /// The result never depends on sub-unit precision of the input.
    #[test]
    fn idempotent_advancement(expr in arb_expression(), now in arb_now()) {
        let spec = Spec::parse(&expr).unwrap();
        if let Some(next) = spec.next_after(&now) {
            let nudged = now.checked_add(jiff::Span::new().milliseconds(1)).unwrap();
            if nudged < next {
                prop_assert_eq!(spec.next_after(&nudged), Some(next));
            }
        }
    }

    /// Builder and parser agree on single-value fields.
    #[test]
    fn builder_matches_parser(
        minute in 0u8..60,
        hour in 0u8..24,
        day in 1u8..=31,
        month in 1u8..=12,
    ) {
        let built = SpecBuilder::new()
            .minutes([minute])
            .hours([hour])
            .days([day])
            .months([month])
            .build()
            .unwrap();
        let parsed = Spec::parse(&format!("{minute} {hour} {day} {month} *")).unwrap();
        prop_assert_eq!(built, parsed);
    }
}
