pub mod assemble;
pub mod plan;

use crate::output;

use std::path::PathBuf;

use clap::Args;
use color_eyre::Result;

use workflow_service::{assemble_repository, find_repo_root, Assembly, Selection, Settings};

/// Options shared by commands that assemble workflows
#[derive(Args, Debug)]
pub struct SelectArgs {
    /// Assemble only the workflow with this exact name
    #[arg(long, short = 'n', value_name = "NAME")]
    pub name: Option<String>,

    /// Only read workflow files whose path contains this text
    #[arg(long, short = 'f', value_name = "FILE")]
    pub file: Option<String>,

    /// Directory holding workflow definitions (default from settings)
    #[arg(long, value_name = "DIR")]
    pub workflows_dir: Option<PathBuf>,
}

impl SelectArgs {
    fn selection(&self) -> Selection {
        Selection {
            name: self.name.clone(),
            file: self.file.clone(),
        }
    }
}

/// Resolve settings for the current repository and assemble the selected workflows.
///
/// Diagnostics reach stderr through the library's warn-level log lines;
/// fatal errors are returned.
pub fn assemble(args: &SelectArgs) -> Result<Assembly> {
    let cwd = std::env::current_dir()?;
    let repo_root = find_repo_root(&cwd).unwrap_or(cwd);
    tracing::debug!(repo_root = %repo_root.display(), "resolved repository root");

    let mut settings = Settings::load(&repo_root)?;
    if let Some(dir) = &args.workflows_dir {
        settings.workflows_dir = dir.clone();
    }

    output::status(
        "Assembling",
        settings.workflows_dir_in(&repo_root).display(),
    );
    let assembly = assemble_repository(&settings, &repo_root, &args.selection())?;
    if let Some(summary) = diagnostics_summary(&assembly) {
        output::warning(summary);
    }

    Ok(assembly)
}

/// One-line count of the diagnostics already logged during assembly
fn diagnostics_summary(assembly: &Assembly) -> Option<String> {
    match assembly.diagnostics.len() {
        0 => None,
        1 => Some("1 diagnostic recorded during assembly".to_string()),
        n => Some(format!("{} diagnostics recorded during assembly", n)),
    }
}
