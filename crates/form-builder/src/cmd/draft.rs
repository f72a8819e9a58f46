use anyhow::{Result, bail};
use clap::Args;
use form_spec::{FormField, FormSchema, WorkingForm};
use tracing::info;

use super::Context;

#[derive(Args, Debug, Clone)]
pub struct NewArgs {
    /// Name of the new form
    #[arg(long = "name", value_name = "NAME")]
    pub name: Option<String>,
    /// Discard an existing working form
    #[arg(long = "force", default_value_t = false)]
    pub force: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ShowArgs {
    /// Saved form to show instead of the working form
    #[arg(value_name = "FORM_ID")]
    pub form_id: Option<String>,
    /// Print the stored JSON layout
    #[arg(long = "json", default_value_t = false)]
    pub json: bool,
}

pub fn new(ctx: &Context, args: NewArgs) -> Result<()> {
    if !args.force && ctx.draft_exists()? {
        bail!("a working form already exists; save it first or pass --force");
    }
    let form = WorkingForm::new(args.name.as_deref());
    ctx.store_draft(&form)?;
    info!(form_id = %form.schema().id, "started working form");
    println!("{}", form.schema().id);
    Ok(())
}

pub fn show(ctx: &Context, args: ShowArgs) -> Result<()> {
    let schema = match &args.form_id {
        Some(id) => match ctx.catalog().get(id) {
            Some(form) => form.clone(),
            None => bail!("no saved form with id '{id}'"),
        },
        None => ctx.load_draft()?.into_schema(),
    };
    if args.json {
        println!("{}", serde_json::to_string_pretty(&schema)?);
    } else {
        print!("{}", render(&schema));
    }
    Ok(())
}

/// Human-readable outline: one line per field, in display order.
pub fn render(schema: &FormSchema) -> String {
    let mut out = format!("{} ({})\n", schema.name, schema.id);
    if schema.fields.is_empty() {
        out.push_str("  (no fields)\n");
    }
    for (index, field) in schema.fields.iter().enumerate() {
        out.push_str(&format!("  {}. {}\n", index + 1, describe(field)));
    }
    out
}

fn describe(field: &FormField) -> String {
    let mut line = format!("{} [{}] {}", field.id, field.kind, field.label);
    if field.required {
        line.push_str(" *");
    }
    if !field.options.is_empty() {
        line.push_str(&format!(" options: {}", field.options.join(" | ")));
    }
    if let Some(default) = &field.default_value
        && !default.to_string().is_empty()
    {
        line.push_str(&format!(" default: {default}"));
    }
    if field.is_derived() {
        let expression = field
            .derived
            .expression_name
            .as_ref()
            .map(|name| name.as_str())
            .unwrap_or("?");
        line.push_str(&format!(
            " = {expression}({})",
            field.derived.parent_field_ids.join(", ")
        ));
    }
    line
}
