// Workflow sources
// Where raw workflow definitions come from: YAML files on disk or in-process registration

use crate::error::{AssemblyError, AssemblyResult, LoadError};
use crate::workflow::models::Workflow;
use crate::workflow::parser::WorkflowParser;

use std::fs;
use std::path::{Path, PathBuf};

/// A unit that yields raw workflows.
///
/// Loading may fail per source; callers treat such failures as recoverable
/// and continue with the remaining sources.
pub trait WorkflowSource {
    /// Identifier matched by the file filter of a `Selection`
    fn id(&self) -> &str;

    fn load(&self) -> Result<Vec<Workflow>, LoadError>;
}

impl<T: WorkflowSource + ?Sized> WorkflowSource for Box<T> {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn load(&self) -> Result<Vec<Workflow>, LoadError> {
        (**self).load()
    }
}

/// A YAML file declaring workflows under a top-level `workflows:` list
#[derive(Debug, Clone)]
pub struct YamlFileSource {
    path: PathBuf,
    id: String,
}

impl YamlFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let id = path.display().to_string();
        Self { path, id }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl WorkflowSource for YamlFileSource {
    fn id(&self) -> &str {
        &self.id
    }

    fn load(&self) -> Result<Vec<Workflow>, LoadError> {
        let content = fs::read_to_string(&self.path).map_err(|source| LoadError::Io {
            path: self.path.clone(),
            source,
        })?;
        Ok(WorkflowParser::parse_and_validate(&content)?)
    }
}

/// Workflows registered directly in code
#[derive(Debug, Clone)]
pub struct StaticSource {
    id: String,
    workflows: Vec<Workflow>,
}

impl StaticSource {
    pub fn new(id: impl Into<String>, workflows: Vec<Workflow>) -> Self {
        Self {
            id: id.into(),
            workflows,
        }
    }
}

impl WorkflowSource for StaticSource {
    fn id(&self) -> &str {
        &self.id
    }

    fn load(&self) -> Result<Vec<Workflow>, LoadError> {
        for workflow in &self.workflows {
            WorkflowParser::validate(workflow)?;
        }
        Ok(self.workflows.clone())
    }
}

/// Find workflow definition files directly inside `dir`.
///
/// Sources are returned sorted by file name so that name-based selection
/// across several files does not depend on directory enumeration order.
pub fn discover_sources(dir: &Path) -> AssemblyResult<Vec<YamlFileSource>> {
    if !dir.is_dir() {
        return Err(AssemblyError::WorkflowsDirNotFound(dir.to_path_buf()));
    }

    let io_error = |source| AssemblyError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        let is_yaml = matches!(
            path.extension().and_then(|ext| ext.to_str()),
            Some("yml" | "yaml")
        );
        if is_yaml && path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    tracing::debug!(dir = %dir.display(), count = paths.len(), "discovered workflow files");
    Ok(paths.into_iter().map(YamlFileSource::new).collect())
}
