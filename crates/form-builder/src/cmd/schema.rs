use anyhow::Result;
use form_spec::FormSchema;

pub fn run() -> Result<()> {
    let schema = schemars::schema_for!(FormSchema);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
