use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::{Date, Month, OffsetDateTime};

use crate::value::{FieldValue, number_of, text_of};

static CALENDAR_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4})[-/](\d{1,2})[-/](\d{1,2})(?:\D|$)").expect("date pattern compiles")
});

/// Named computation a derived field can use.
///
/// The set is closed: there is no way to run caller-supplied code. Names that
/// are not recognized survive a load/save cycle unchanged and evaluate like
/// [`ExpressionName::Custom`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ExpressionName {
    AgeFromDob,
    Sum,
    Concat,
    Custom,
    Other(String),
}

impl ExpressionName {
    pub fn as_str(&self) -> &str {
        match self {
            ExpressionName::AgeFromDob => "ageFromDOB",
            ExpressionName::Sum => "sum",
            ExpressionName::Concat => "concat",
            ExpressionName::Custom => "custom",
            ExpressionName::Other(name) => name,
        }
    }

    /// Runs the computation with `today` as the reference date.
    pub fn evaluate_on(&self, parents: &[Option<FieldValue>], today: Date) -> FieldValue {
        match self {
            ExpressionName::AgeFromDob => {
                age_from_dob(parents.first().and_then(Option::as_ref), today)
            }
            ExpressionName::Sum => FieldValue::Number(
                parents
                    .iter()
                    .filter_map(|value| number_of(value.as_ref()))
                    .sum(),
            ),
            ExpressionName::Concat => FieldValue::Text(
                parents
                    .iter()
                    .map(|value| text_of(value.as_ref()))
                    .collect::<Vec<_>>()
                    .join(" "),
            ),
            ExpressionName::Custom | ExpressionName::Other(_) => {
                FieldValue::Text(String::new())
            }
        }
    }

    pub fn evaluate(&self, parents: &[Option<FieldValue>]) -> FieldValue {
        self.evaluate_on(parents, today())
    }
}

impl From<&str> for ExpressionName {
    fn from(name: &str) -> Self {
        match name {
            "ageFromDOB" => ExpressionName::AgeFromDob,
            "sum" => ExpressionName::Sum,
            "concat" => ExpressionName::Concat,
            "custom" => ExpressionName::Custom,
            other => ExpressionName::Other(other.to_string()),
        }
    }
}

impl From<String> for ExpressionName {
    fn from(name: String) -> Self {
        ExpressionName::from(name.as_str())
    }
}

impl From<ExpressionName> for String {
    fn from(name: ExpressionName) -> Self {
        match name {
            ExpressionName::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ExpressionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Evaluates a registry function by name against today's date.
pub fn evaluate(name: &str, parents: &[Option<FieldValue>]) -> FieldValue {
    ExpressionName::from(name).evaluate(parents)
}

/// Evaluates a registry function by name against a fixed reference date.
pub fn evaluate_on(name: &str, parents: &[Option<FieldValue>], today: Date) -> FieldValue {
    ExpressionName::from(name).evaluate_on(parents, today)
}

/// Today's date in local time, or UTC when the local offset is unavailable.
pub fn today() -> Date {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
}

fn age_from_dob(dob: Option<&FieldValue>, today: Date) -> FieldValue {
    match dob.and_then(parse_date) {
        Some(birth) => FieldValue::Number(f64::from(whole_years_between(birth, today))),
        None => FieldValue::Text(String::new()),
    }
}

/// Accepts RFC 3339 timestamps, text that starts with a `YYYY-MM-DD` calendar
/// date (month and day may drop the leading zero, `/` may replace `-`), and
/// epoch milliseconds.
fn parse_date(value: &FieldValue) -> Option<Date> {
    match value {
        FieldValue::Text(text) => {
            let text = text.trim();
            if text.is_empty() {
                return None;
            }
            if let Ok(timestamp) = OffsetDateTime::parse(text, &Rfc3339) {
                return Some(timestamp.date());
            }
            let parts = CALENDAR_DATE.captures(text)?;
            let year = parts[1].parse().ok()?;
            let month = Month::try_from(parts[2].parse::<u8>().ok()?).ok()?;
            Date::from_calendar_date(year, month, parts[3].parse().ok()?).ok()
        }
        FieldValue::Number(millis) if millis.is_finite() => {
            let nanos = (*millis as i128).checked_mul(1_000_000)?;
            OffsetDateTime::from_unix_timestamp_nanos(nanos)
                .ok()
                .map(|timestamp| timestamp.date())
        }
        _ => None,
    }
}

/// Completed calendar years from `from` to `to`; negative when `from` is later.
pub(crate) fn whole_years_between(from: Date, to: Date) -> i32 {
    if from > to {
        return -whole_years_between(to, from);
    }
    let mut years = to.year() - from.year();
    // A Feb 29 birthday falls on Feb 28 in common years.
    let anniversary_day = if from.month() == Month::February
        && from.day() == 29
        && !time::util::is_leap_year(to.year())
    {
        28
    } else {
        from.day()
    };
    let anniversary_pending =
        (u8::from(to.month()), to.day()) < (u8::from(from.month()), anniversary_day);
    if anniversary_pending {
        years -= 1;
    }
    years
}
