// Workflow assembly
// Native job injection, artifact provenance, and workflow selection

pub mod artifacts;
pub mod diagnostics;
pub mod injector;
pub mod native_jobs;
pub mod selector;

pub use artifacts::ArtifactResolver;
pub use diagnostics::{Diagnostic, Diagnostics};
pub use injector::NativeJobInjector;
pub use native_jobs::{NativeJob, NativeJobFactory};
pub use selector::{Assembly, Selection, WorkflowSelector};

use crate::error::AssemblyResult;
use crate::settings::Settings;
use crate::source::discover_sources;

use std::path::Path;

/// Assemble the selected workflows of the repository rooted at `repo_root`.
///
/// Workflow files are discovered in the settings' workflows directory; a
/// missing directory is fatal.
pub fn assemble_repository(
    settings: &Settings,
    repo_root: &Path,
    selection: &Selection,
) -> AssemblyResult<Assembly> {
    let sources = discover_sources(&settings.workflows_dir_in(repo_root))?;
    WorkflowSelector::new(settings).assemble(&sources, selection)
}
