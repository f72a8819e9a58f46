use anyhow::{Result, bail};
use clap::Args;
use form_spec::WorkingForm;
use tracing::info;

use super::Context;

#[derive(Args, Debug, Clone)]
pub struct SaveArgs {
    /// Save under this name instead of the working form's name
    #[arg(long = "name", value_name = "NAME")]
    pub name: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct EditArgs {
    #[arg(value_name = "FORM_ID")]
    pub form_id: String,
}

#[derive(Args, Debug, Clone)]
pub struct DeleteArgs {
    #[arg(value_name = "FORM_ID")]
    pub form_id: String,
}

pub fn save(ctx: &Context, args: SaveArgs) -> Result<()> {
    let draft = ctx.load_draft()?;
    let duplicates = draft.schema().duplicate_field_ids();
    if !duplicates.is_empty() {
        bail!("field ids must be unique: {}", duplicates.join(", "));
    }
    let saved = draft.to_saved(args.name.as_deref());
    let mut catalog = ctx.catalog();
    catalog.save(saved.clone());
    // Keep editing the copy that was just saved.
    ctx.store_draft(&WorkingForm::from_schema(saved.clone()))?;
    println!("saved {} ({})", saved.name, saved.id);
    Ok(())
}

pub fn edit(ctx: &Context, args: EditArgs) -> Result<()> {
    let catalog = ctx.catalog();
    let Some(form) = catalog.get(&args.form_id) else {
        bail!("no saved form with id '{}'", args.form_id);
    };
    ctx.store_draft(&WorkingForm::from_schema(form.clone()))?;
    info!(form_id = %form.id, "loaded saved form for editing");
    println!("editing {} ({})", form.name, form.id);
    Ok(())
}

pub fn list(ctx: &Context) -> Result<()> {
    let catalog = ctx.catalog();
    if catalog.forms().is_empty() {
        eprintln!("no saved forms");
    }
    for form in catalog.forms() {
        println!(
            "{}\t{}\t{}\t{} field(s)",
            form.id,
            form.name,
            form.created_at,
            form.fields.len()
        );
    }
    Ok(())
}

pub fn delete(ctx: &Context, args: DeleteArgs) -> Result<()> {
    let mut catalog = ctx.catalog();
    if !catalog.delete(&args.form_id) {
        bail!("no saved form with id '{}'", args.form_id);
    }
    println!("deleted {}", args.form_id);
    Ok(())
}
