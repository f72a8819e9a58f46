use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use form_spec::{DerivedConfig, ExpressionName, FieldType, FieldValue, PasswordRule, ValidationRules};

use super::{Context, position_index, resolve_field};

#[derive(Subcommand, Debug, Clone)]
pub enum FieldCommand {
    /// Append a field to the working form
    Add(AddArgs),
    /// Remove a field
    Remove(FieldRef),
    /// Move a field to another position (1-based)
    Move(MoveArgs),
    /// Change label, required flag or default value
    Edit(EditArgs),
    /// Set validation rules
    Rules(RulesArgs),
    /// Make a field derived from other fields, or turn that off
    Derive(DeriveArgs),
    /// Manage options of select, radio and checkbox fields
    #[command(subcommand)]
    Option(OptionCommand),
}

#[derive(Args, Debug, Clone)]
pub struct FieldRef {
    /// Field id, or its label when that is unique
    #[arg(value_name = "FIELD")]
    pub field: String,
}

#[derive(Args, Debug, Clone)]
pub struct AddArgs {
    /// text, number, textarea, select, radio, checkbox or date
    #[arg(value_name = "TYPE")]
    pub kind: FieldType,
    #[arg(long = "label", value_name = "LABEL")]
    pub label: Option<String>,
    #[arg(long = "required", default_value_t = false)]
    pub required: bool,
    /// Replaces the placeholder option; repeat for several
    #[arg(long = "option", value_name = "LABEL")]
    pub options: Vec<String>,
    #[arg(long = "default", value_name = "VALUE")]
    pub default: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct MoveArgs {
    #[arg(value_name = "FROM")]
    pub from: usize,
    #[arg(value_name = "TO")]
    pub to: usize,
}

#[derive(Args, Debug, Clone)]
pub struct EditArgs {
    #[arg(value_name = "FIELD")]
    pub field: String,
    #[arg(long = "label", value_name = "LABEL")]
    pub label: Option<String>,
    #[arg(long = "required", conflicts_with = "optional")]
    pub required: bool,
    #[arg(long = "optional")]
    pub optional: bool,
    #[arg(long = "default", value_name = "VALUE", conflicts_with = "clear_default")]
    pub default: Option<String>,
    #[arg(long = "clear-default")]
    pub clear_default: bool,
}

#[derive(Args, Debug, Clone)]
pub struct RulesArgs {
    #[arg(value_name = "FIELD")]
    pub field: String,
    /// Drop all existing rules before applying the flags
    #[arg(long = "clear")]
    pub clear: bool,
    #[arg(long = "not-empty")]
    pub not_empty: bool,
    #[arg(long = "min-length", value_name = "N")]
    pub min_length: Option<usize>,
    #[arg(long = "max-length", value_name = "N")]
    pub max_length: Option<usize>,
    #[arg(long = "email")]
    pub email: bool,
    #[arg(long = "password-min", value_name = "N")]
    pub password_min: Option<usize>,
    /// Requires --password-min or an existing password rule
    #[arg(long = "password-number")]
    pub password_number: bool,
    #[arg(long = "min-value", value_name = "N", allow_negative_numbers = true)]
    pub min_value: Option<f64>,
    #[arg(long = "max-value", value_name = "N", allow_negative_numbers = true)]
    pub max_value: Option<f64>,
}

#[derive(Args, Debug, Clone)]
pub struct DeriveArgs {
    #[arg(value_name = "FIELD")]
    pub field: String,
    /// ageFromDOB, sum, concat or custom
    #[arg(long = "expression", value_name = "NAME", required_unless_present = "off")]
    pub expression: Option<String>,
    /// Parent field, in argument order; repeat for several
    #[arg(long = "parent", value_name = "FIELD")]
    pub parents: Vec<String>,
    #[arg(long = "off", conflicts_with_all = ["expression", "parents"])]
    pub off: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum OptionCommand {
    /// Append an option
    Add {
        #[arg(value_name = "FIELD")]
        field: String,
        #[arg(value_name = "LABEL")]
        label: Option<String>,
    },
    /// Relabel the option at a 1-based position
    Set {
        #[arg(value_name = "FIELD")]
        field: String,
        #[arg(value_name = "POSITION")]
        position: usize,
        #[arg(value_name = "LABEL")]
        label: String,
    },
    /// Remove the option at a 1-based position
    Remove {
        #[arg(value_name = "FIELD")]
        field: String,
        #[arg(value_name = "POSITION")]
        position: usize,
    },
}

pub fn run(ctx: &Context, command: FieldCommand) -> Result<()> {
    match command {
        FieldCommand::Add(args) => add(ctx, args),
        FieldCommand::Remove(args) => ctx.edit_draft(|form| {
            let id = resolve_field(form.schema(), &args.field)?.id.clone();
            let removed = form.remove_field(&id)?;
            let dependents: Vec<_> = form
                .schema()
                .derived_fields()
                .filter(|field| field.derived.depends_on(&removed.id))
                .map(|field| field.id.clone())
                .collect();
            if !dependents.is_empty() {
                eprintln!(
                    "warning: {} still list '{}' as a parent",
                    dependents.join(", "),
                    removed.id
                );
            }
            println!("removed {}", removed.id);
            Ok(())
        }),
        FieldCommand::Move(args) => ctx.edit_draft(|form| {
            form.move_field(position_index(args.from)?, position_index(args.to)?)?;
            Ok(())
        }),
        FieldCommand::Edit(args) => edit(ctx, args),
        FieldCommand::Rules(args) => rules(ctx, args),
        FieldCommand::Derive(args) => derive(ctx, args),
        FieldCommand::Option(command) => option(ctx, command),
    }
}

fn add(ctx: &Context, args: AddArgs) -> Result<()> {
    if !args.options.is_empty() && !args.kind.has_options() {
        bail!("{} fields do not take options", args.kind);
    }
    ctx.edit_draft(|form| {
        let mut field = form.add_field(args.kind).clone();
        if let Some(label) = args.label {
            field.label = label;
        }
        field.required = args.required;
        if !args.options.is_empty() {
            field.options = args.options;
        }
        if let Some(raw) = &args.default {
            field.default_value = Some(FieldValue::from_input(field.kind, raw));
        }
        let id = field.id.clone();
        form.update_field(field)?;
        println!("{id}");
        Ok(())
    })
}

fn edit(ctx: &Context, args: EditArgs) -> Result<()> {
    ctx.edit_draft(|form| {
        let mut field = resolve_field(form.schema(), &args.field)?.clone();
        if let Some(label) = args.label {
            field.label = label;
        }
        if args.required {
            field.required = true;
        }
        if args.optional {
            field.required = false;
        }
        if args.clear_default {
            field.default_value = None;
        }
        if let Some(raw) = &args.default {
            field.default_value = Some(FieldValue::from_input(field.kind, raw));
        }
        form.update_field(field)?;
        Ok(())
    })
}

fn rules(ctx: &Context, args: RulesArgs) -> Result<()> {
    ctx.edit_draft(|form| {
        let mut field = resolve_field(form.schema(), &args.field)?.clone();
        let rules = &mut field.validation;
        if args.clear {
            *rules = ValidationRules::default();
        }
        rules.not_empty |= args.not_empty;
        rules.email |= args.email;
        if args.min_length.is_some() {
            rules.min_length = args.min_length;
        }
        if args.max_length.is_some() {
            rules.max_length = args.max_length;
        }
        if args.min_value.is_some() {
            rules.min_value = args.min_value;
        }
        if args.max_value.is_some() {
            rules.max_value = args.max_value;
        }
        if let Some(min_length) = args.password_min {
            let must_contain_number = rules
                .password_rule
                .as_ref()
                .is_some_and(|rule| rule.must_contain_number);
            rules.password_rule = Some(PasswordRule {
                min_length,
                must_contain_number,
            });
        }
        if args.password_number {
            match rules.password_rule.as_mut() {
                Some(rule) => rule.must_contain_number = true,
                None => bail!("--password-number needs --password-min"),
            }
        }
        form.update_field(field)?;
        Ok(())
    })
}

fn derive(ctx: &Context, args: DeriveArgs) -> Result<()> {
    ctx.edit_draft(|form| {
        let mut field = resolve_field(form.schema(), &args.field)?.clone();
        if args.off {
            field.derived = DerivedConfig::default();
        } else {
            let Some(name) = args.expression.as_deref() else {
                bail!("--expression is required");
            };
            let expression = ExpressionName::from(name);
            if let ExpressionName::Other(unknown) = &expression {
                bail!("unknown expression '{unknown}'; expected ageFromDOB, sum, concat or custom");
            }
            let parents = args
                .parents
                .iter()
                .map(|parent| match resolve_field(form.schema(), parent) {
                    Ok(found) => found.id.clone(),
                    // Let the builder report the unknown parent by id.
                    Err(_) => parent.clone(),
                })
                .collect::<Vec<_>>();
            field.derived = DerivedConfig::new(expression, parents);
        }
        form.update_field(field)?;
        Ok(())
    })
}

fn option(ctx: &Context, command: OptionCommand) -> Result<()> {
    ctx.edit_draft(|form| match command {
        OptionCommand::Add { field, label } => {
            let id = resolve_field(form.schema(), &field)?.id.clone();
            let index = form.add_option(&id)?;
            if let Some(label) = label {
                form.set_option(&id, index, label)?;
            }
            Ok(())
        }
        OptionCommand::Set {
            field,
            position,
            label,
        } => {
            let id = resolve_field(form.schema(), &field)?.id.clone();
            form.set_option(&id, position_index(position)?, label)?;
            Ok(())
        }
        OptionCommand::Remove { field, position } => {
            let id = resolve_field(form.schema(), &field)?.id.clone();
            let removed = form.remove_option(&id, position_index(position)?)?;
            println!("removed option '{removed}'");
            Ok(())
        }
    })
}
