//! API surface check: if any public method is missing or changes its
//! signature, this file stops compiling. The runtime assertions pin the
//! return values for a simple rule.

use cronspec::{
    BoundedOccurrences, CronError, Field, Occurrences, ParseOptions, Position, SecondsField,
    Span, Spec, SpecBuilder, ValueError,
};
use jiff::Zoned;

fn now() -> Zoned {
    "2026-02-06T12:00:00+00:00[UTC]".parse().unwrap()
}

#[test]
fn static_parse() {
    let result: Result<Spec, CronError> = Spec::parse("0 9 * * *");
    assert!(result.is_ok());
}

#[test]
fn static_parse_with() {
    let options = ParseOptions {
        seconds: SecondsField::Required,
        weekday_optional: false,
        presets: true,
    };
    assert_eq!(options, ParseOptions::with_seconds());
    let result = Spec::parse_with("0 0 9 * * *", &options);
    assert!(result.is_ok());
}

#[test]
fn from_str() {
    let spec: Spec = "@daily".parse().unwrap();
    assert_eq!(spec, Spec::parse("0 0 * * *").unwrap());
}

#[test]
fn builder_entry_points() {
    let a: SpecBuilder = Spec::builder();
    let b = SpecBuilder::new();
    assert_eq!(
        a.values(Field::Hour, [9]).build().unwrap(),
        b.range(Field::Hour, 9, 9, 0).build().unwrap()
    );
}

#[test]
fn instance_next_after() {
    let spec = Spec::parse("0 9 * * *").unwrap();
    let result: Option<Zoned> = spec.next_after(&now());
    assert_eq!(
        result,
        Some("2026-02-07T09:00:00+00:00[UTC]".parse().unwrap())
    );
}

#[test]
fn instance_next_n_after() {
    let spec = Spec::parse("0 9 * * *").unwrap();
    let results: Vec<Zoned> = spec.next_n_after(&now(), 3);
    assert_eq!(results.len(), 3);
}

#[test]
fn instance_occurrences_and_between() {
    let spec = Spec::parse("0 9 * * *").unwrap();
    let iter: Occurrences = spec.occurrences(&now());
    assert_eq!(iter.take(2).count(), 2);

    let to: Zoned = "2026-02-08T12:00:00+00:00[UTC]".parse().unwrap();
    let bounded: BoundedOccurrences = spec.between(&now(), &to);
    assert_eq!(bounded.count(), 2);
}

#[test]
fn instance_matches() {
    let spec = Spec::parse("0 9 * * *").unwrap();
    let dt: Zoned = "2026-02-07T09:00:00+00:00[UTC]".parse().unwrap();
    let result: bool = spec.matches(&dt);
    assert!(result);
}

#[test]
fn instance_to_string() {
    let spec = Spec::parse("0 9 * * MON-FRI").unwrap();
    let result: String = spec.to_string();
    assert_eq!(result, "0 9 * * 1-5");
}

#[test]
fn accessors() {
    let spec = Spec::parse("10 0 9 ^1 1 &5").unwrap();
    let _: u64 = spec.seconds();
    let _: u64 = spec.minutes();
    let _: u32 = spec.hours();
    let _: u32 = spec.days();
    let _: u32 = spec.last_days();
    let _: u16 = spec.months();
    let _: u8 = spec.weekdays();
    let _: u8 = spec.weekdays_strict();
    assert!(spec.has_seconds());
    assert!(spec.is_feasible());
}

#[test]
fn error_details() {
    let err = Spec::parse("0 0 1,40 * *").unwrap_err();
    match &err {
        CronError::Value {
            field,
            position,
            kind,
            span,
            ..
        } => {
            assert_eq!(*field, Field::DayOfMonth);
            assert_eq!(*position, Position(2));
            assert_eq!(*kind, ValueError::AboveMaximum { value: 40, max: 31 });
            assert_eq!(*span, Span::new(6, 8));
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(err.span(), Some(Span::new(6, 8)));
    assert!(err.display_rich().ends_with("^^"));
}

#[test]
fn spec_is_copy_send_sync() {
    fn assert_traits<T: Copy + Send + Sync + std::hash::Hash + Eq>() {}
    assert_traits::<Spec>();
    fn assert_error<T: std::error::Error + Send + Sync + 'static>() {}
    assert_error::<CronError>();
    assert_error::<ValueError>();
}
