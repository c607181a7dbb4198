use crate::commands::{self, SelectArgs};
use crate::output;

use clap::{Args, ValueEnum};
use color_eyre::Result;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

/// Print the finalized workflows with native jobs and artifact provenance
#[derive(Args, Debug)]
pub struct AssembleArgs {
    #[command(flatten)]
    pub select: SelectArgs,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Yaml)]
    pub format: OutputFormat,
}

pub fn execute(args: AssembleArgs) -> Result<()> {
    let assembly = commands::assemble(&args.select)?;

    let rendered = match args.format {
        OutputFormat::Yaml => serde_yaml::to_string(&assembly)?,
        OutputFormat::Json => serde_json::to_string_pretty(&assembly)?,
    };
    println!("{}", rendered.trim_end());

    output::success(format!(
        "{} workflow(s) assembled, {} warning(s)",
        assembly.workflows.len(),
        assembly.diagnostics.len()
    ));
    Ok(())
}
