// Field-splitting parser for cron expressions.
//
// Grammar, per whitespace-separated field:
//   field   = item ("," item)*
//   item    = marker? range ("/" step)?
//   marker  = "^" (day-of-month only) | "&" (weekday only)
//   range   = "*" | "?" | value ("-" value)?
//   value   = number | name

use tracing::debug;

use crate::builder::SpecBuilder;
use crate::error::{CronError, Span, ValueError};
use crate::field::Field;
use crate::lexer::{split_list, Lexer, Token};
use crate::spec::Spec;

/// Whether the leading seconds field is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SecondsField {
    /// Five-field cron only.
    Never,
    /// Six fields start with seconds; five are plain cron.
    #[default]
    Optional,
    Required,
}

/// Which field layouts the parser accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ParseOptions {
    pub seconds: SecondsField,
    /// Accept expressions without the trailing weekday field.
    pub weekday_optional: bool,
    /// Accept `@daily` and friends.
    pub presets: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            seconds: SecondsField::Optional,
            weekday_optional: false,
            presets: true,
        }
    }
}

impl ParseOptions {
    /// Classic five-field cron: `min hour dom month dow`.
    pub fn standard() -> Self {
        Self {
            seconds: SecondsField::Never,
            ..Self::default()
        }
    }

    /// Six fields, seconds first.
    pub fn with_seconds() -> Self {
        Self {
            seconds: SecondsField::Required,
            ..Self::default()
        }
    }

    /// Smallest and largest accepted field counts.
    fn field_counts(&self) -> (usize, usize) {
        let min = 4
            + usize::from(self.seconds == SecondsField::Required)
            + usize::from(!self.weekday_optional);
        let max = 5 + usize::from(self.seconds != SecondsField::Never);
        (min, max)
    }

    /// Field layout for `count` tokens. Missing optional fields are taken
    /// from the seconds position first, then the weekday position.
    fn layout(&self, count: usize) -> Vec<Field> {
        let (_, max) = self.field_counts();
        let mut missing = max - count;
        let mut has_seconds = self.seconds != SecondsField::Never;
        if has_seconds && self.seconds == SecondsField::Optional && missing > 0 {
            has_seconds = false;
            missing -= 1;
        }
        let has_weekday = !(self.weekday_optional && missing > 0);

        let mut fields = Vec::with_capacity(6);
        if has_seconds {
            fields.push(Field::Second);
        }
        fields.extend([Field::Minute, Field::Hour, Field::DayOfMonth, Field::Month]);
        if has_weekday {
            fields.push(Field::Weekday);
        }
        fields
    }
}

/// One value-expression of a field, before it becomes a bitset.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ParsedField {
    low: i64,
    high: Option<i64>,
    step: Option<u32>,
    wildcard: bool,
    /// Leading `^`: counted from the end of the month.
    reverse: bool,
    /// Leading `&`: filters instead of adding alternatives.
    strict: bool,
}

impl ParsedField {
    /// The field whose bitset this item lands in.
    fn target(&self, field: Field) -> Field {
        if self.reverse {
            Field::LastDayOfMonth
        } else if self.strict {
            Field::StrictWeekday
        } else {
            field
        }
    }

    /// Validate against the target field and convert to its bitset.
    fn into_bits(self, field: Field) -> Result<u64, ValueError> {
        if self.wildcard && self.step.is_none() {
            // "any": days and weekdays leave the choice to the other field
            return Ok(match field {
                Field::DayOfMonth | Field::Weekday => 0,
                _ => field.all_bits(),
            });
        }
        let high = self.high.unwrap_or(self.low);
        let step = self.step.unwrap_or(u32::from(high > self.low));
        let (low, high) = field.validate(self.low, high, step)?;
        Ok(field.to_bits(low, high, step))
    }
}

struct Parser<'a> {
    input: &'a str,
    options: &'a ParseOptions,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str, options: &'a ParseOptions) -> Self {
        Self { input, options }
    }

    fn parse(&self) -> Result<Spec, CronError> {
        let tokens = Lexer::new(self.input).tokenize();

        if let Some(first) = tokens.first().filter(|t| t.text.starts_with('@')) {
            if tokens.len() != 1 {
                return Err(CronError::syntax(
                    "a preset must be the only token",
                    first.span,
                    self.input,
                ));
            }
            return self.parse_preset(*first);
        }

        let (min, max) = self.options.field_counts();
        if tokens.len() < min || tokens.len() > max {
            let expected = if min == max {
                min.to_string()
            } else {
                format!("{min} to {max}")
            };
            return Err(CronError::FieldCount {
                expected,
                found: tokens.len(),
                span: Span::new(0, self.input.len()),
                input: self.input.to_string(),
            });
        }

        let mut builder = SpecBuilder::new();
        for (field, token) in self.options.layout(tokens.len()).into_iter().zip(tokens) {
            self.parse_field(&mut builder, field, token)?;
        }
        builder.build()
    }

    fn parse_preset(&self, token: Token<'_>) -> Result<Spec, CronError> {
        if !self.options.presets {
            return Err(CronError::syntax(
                "presets are disabled",
                token.span,
                self.input,
            ));
        }
        let builder = match token.text.to_ascii_lowercase().as_str() {
            "@hourly" => SpecBuilder::new().minutes([0]),
            // @midnigth is a long-standing misspelling kept for compatibility
            "@daily" | "@midnight" | "@midnigth" => SpecBuilder::new().minutes([0]).hours([0]),
            "@weekly" => SpecBuilder::new().minutes([0]).hours([0]).weekdays([0]),
            "@monthly" => SpecBuilder::new().minutes([0]).hours([0]).days([1]),
            "@yearly" | "@annually" => SpecBuilder::new()
                .minutes([0])
                .hours([0])
                .days([1])
                .months([1]),
            _ => {
                return Err(CronError::UnknownPreset {
                    name: token.text.to_string(),
                    span: token.span,
                    input: self.input.to_string(),
                })
            }
        };
        builder.build()
    }

    fn parse_field(
        &self,
        builder: &mut SpecBuilder,
        field: Field,
        token: Token<'_>,
    ) -> Result<(), CronError> {
        for (i, item) in split_list(token).enumerate() {
            let parsed = parse_item(field, item.text)
                .map_err(|kind| CronError::value(field, i + 1, kind, item.span, self.input))?;
            let target = parsed.target(field);
            let bits = parsed
                .into_bits(target)
                .map_err(|kind| CronError::value(target, i + 1, kind, item.span, self.input))?;
            builder.union(target, bits);
        }
        Ok(())
    }
}

/// Parse one list item of `field` into its parts.
fn parse_item(field: Field, text: &str) -> Result<ParsedField, ValueError> {
    if text.is_empty() {
        return Err(ValueError::Empty);
    }

    let mut parsed = ParsedField {
        low: 0,
        high: None,
        step: None,
        wildcard: false,
        reverse: false,
        strict: false,
    };

    let mut rest = text;
    if let Some(stripped) = rest.strip_prefix('^') {
        if field != Field::DayOfMonth {
            return Err(ValueError::MisplacedMarker('^'));
        }
        parsed.reverse = true;
        rest = stripped;
    } else if let Some(stripped) = rest.strip_prefix('&') {
        if field != Field::Weekday {
            return Err(ValueError::MisplacedMarker('&'));
        }
        parsed.strict = true;
        rest = stripped;
    }
    let target = parsed.target(field);

    let range = match rest.split_once('/') {
        Some((range, step)) => {
            if step.is_empty() || !step.bytes().all(|b| b.is_ascii_digit()) {
                return Err(ValueError::NotANumber(step.to_string()));
            }
            let step: u32 = step
                .parse()
                .map_err(|_| ValueError::NotANumber(step.to_string()))?;
            if step == 0 {
                return Err(ValueError::ZeroStep);
            }
            parsed.step = Some(step);
            range
        }
        None => rest,
    };

    let is_wildcard = |s: &str| s == "*" || s == "?";

    if is_wildcard(range) {
        if parsed.reverse {
            return Err(ValueError::MarkedWildcard('^'));
        }
        if parsed.strict {
            return Err(ValueError::MarkedWildcard('&'));
        }
        parsed.wildcard = true;
        parsed.low = i64::from(target.min());
        parsed.high = Some(i64::from(target.max()));
    } else if let Some((low, high)) = range.split_once('-') {
        if is_wildcard(low) || is_wildcard(high) {
            return Err(ValueError::WildcardRange);
        }
        parsed.low = target.parse_value(low)?;
        parsed.high = Some(target.parse_value(high)?);
    } else {
        parsed.low = target.parse_value(range)?;
        if parsed.step.is_some() {
            // N/S runs from N to the end of the field
            parsed.high = Some(i64::from(target.max()));
        }
    }
    Ok(parsed)
}

/// Parse a cron expression with the default [`ParseOptions`]: five fields, or
/// six with leading seconds, or a single `@preset`.
pub fn parse(input: &str) -> Result<Spec, CronError> {
    parse_with(input, &ParseOptions::default())
}

/// Parse a cron expression with explicit field-layout options.
pub fn parse_with(input: &str, options: &ParseOptions) -> Result<Spec, CronError> {
    let spec = Parser::new(input, options).parse()?;
    debug!(expression = input, spec = %spec, "parsed cron expression");
    Ok(spec)
}
