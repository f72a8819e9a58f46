use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;

use crate::cmd::{
    self, Context,
    draft::{NewArgs, ShowArgs},
    field::FieldCommand,
    fill::FillArgs,
    forms::{DeleteArgs, EditArgs, SaveArgs},
};
use crate::config::FormBuilderConfig;
use crate::logging;

#[derive(Parser, Debug)]
#[command(
    name = "form-builder",
    about = "Design, save and fill in validated forms",
    version,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Config file to read instead of the platform default
    #[arg(long = "config", value_name = "config.toml", global = true)]
    config: Option<PathBuf>,

    /// Directory holding saved forms and the working draft
    #[arg(long = "data-dir", value_name = "DIR", global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start a new working form
    New(NewArgs),
    /// Edit fields of the working form
    #[command(subcommand)]
    Field(FieldCommand),
    /// Print the working form or a saved form
    Show(ShowArgs),
    /// Save the working form into the saved-forms list
    Save(SaveArgs),
    /// Load a saved form as the working form
    Edit(EditArgs),
    /// List saved forms
    List,
    /// Delete a saved form
    Delete(DeleteArgs),
    /// Fill in a form, recompute derived fields and validate it
    Fill(FillArgs),
    /// Print the JSON Schema of the stored form layout
    Schema,
}

pub fn main() -> Result<()> {
    run(Cli::parse())
}

pub fn run(cli: Cli) -> Result<()> {
    let config = FormBuilderConfig::load(cli.config.as_deref())?.with_data_dir(cli.data_dir);
    logging::init(&config.log_filter);
    debug!(data_dir = %config.data_dir.display(), "resolved configuration");

    let ctx = Context::new(config);
    match cli.command {
        Commands::New(args) => cmd::draft::new(&ctx, args),
        Commands::Field(command) => cmd::field::run(&ctx, command),
        Commands::Show(args) => cmd::draft::show(&ctx, args),
        Commands::Save(args) => cmd::forms::save(&ctx, args),
        Commands::Edit(args) => cmd::forms::edit(&ctx, args),
        Commands::List => cmd::forms::list(&ctx),
        Commands::Delete(args) => cmd::forms::delete(&ctx, args),
        Commands::Fill(args) => cmd::fill::run(&ctx, args),
        Commands::Schema => cmd::schema::run(),
    }
}
