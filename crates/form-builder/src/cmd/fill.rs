use std::collections::BTreeMap;

use anyhow::{Result, bail};
use clap::Args;
use form_spec::{FieldValue, FormSession, ValueMap};
use serde::Serialize;
use time::Date;
use time::macros::format_description;
use tracing::debug;

use super::{Context, resolve_field};

#[derive(Args, Debug, Clone)]
pub struct FillArgs {
    /// Saved form to fill in; defaults to the working form
    #[arg(value_name = "FORM_ID")]
    pub form_id: Option<String>,
    /// Field value as FIELD=VALUE, applied in order; repeat for several
    #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
    pub set: Vec<(String, String)>,
    /// Clear a field's value. Every --unset runs before the first --set
    #[arg(long = "unset", value_name = "FIELD")]
    pub unset: Vec<String>,
    /// Reference date for age calculations (YYYY-MM-DD)
    #[arg(long = "today", value_name = "DATE", value_parser = parse_date)]
    pub today: Option<Date>,
    /// Exit with an error when the submission is invalid
    #[arg(long = "strict", default_value_t = false)]
    pub strict: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FillReport<'a> {
    form_id: &'a str,
    valid: bool,
    values: &'a ValueMap,
    errors: BTreeMap<&'a str, &'a str>,
}

pub fn run(ctx: &Context, args: FillArgs) -> Result<()> {
    let schema = match &args.form_id {
        Some(id) => match ctx.catalog().get(id) {
            Some(form) => form.clone(),
            None => bail!("no saved form with id '{id}'"),
        },
        None => ctx.load_draft()?.into_schema(),
    };

    let mut session = FormSession::new(schema);
    if let Some(today) = args.today {
        session = session.with_reference_date(today);
    }
    // All clears run before any assignment.
    for field in &args.unset {
        let id = resolve_field(session.schema(), field)?.id.clone();
        session.set_value(&id, None)?;
    }
    for (field, raw) in &args.set {
        let found = resolve_field(session.schema(), field)?;
        let (id, value) = (found.id.clone(), FieldValue::from_input(found.kind, raw));
        debug!(field_id = %id, value = %value, "setting field");
        session.set_value(&id, Some(value))?;
    }

    let result = session.submit();
    let report = FillReport {
        form_id: &session.schema().id,
        valid: result.valid,
        values: session.values(),
        errors: session
            .errors()
            .iter()
            .filter(|(_, message)| !message.is_empty())
            .map(|(id, message)| (id.as_str(), message.as_str()))
            .collect(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    if args.strict && !result.valid {
        bail!(
            "form-fill: {} field(s) failed validation (--strict)",
            result.errors.len()
        );
    }
    Ok(())
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((field, value)) if !field.trim().is_empty() => {
            Ok((field.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected FIELD=VALUE, got '{raw}'")),
    }
}

fn parse_date(raw: &str) -> Result<Date, String> {
    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .map_err(|err| format!("invalid date '{raw}': {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignment_splits_on_first_equals() {
        assert_eq!(
            parse_assignment("note=a=b").expect("valid"),
            ("note".to_string(), "a=b".to_string())
        );
        assert_eq!(
            parse_assignment("first=").expect("valid"),
            ("first".to_string(), String::new())
        );
        assert!(parse_assignment("=x").is_err());
        assert!(parse_assignment("missing").is_err());
    }

    #[test]
    fn dates_use_iso_calendar_format() {
        let date = parse_date("2026-10-19").expect("valid date");
        assert_eq!(date.to_string(), "2026-10-19");
        assert!(parse_date("19/10/2026").is_err());
    }
}
