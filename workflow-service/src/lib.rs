// Workflow Service Library
// Assembles CI workflow job graphs: native job injection and artifact provenance

pub mod assembly;
pub mod error;
pub mod settings;
pub mod source;
pub mod workflow;

// Re-export commonly used types
pub use error::{AssemblyError, AssemblyResult, LoadError, SettingsError};

// Re-export assembly types
pub use assembly::{
    assemble_repository, Assembly, Diagnostic, NativeJob, NativeJobInjector, Selection,
    WorkflowSelector,
};

// Re-export model and parser types
pub use workflow::{
    Artifact, ArtifactType, CacheDigestConfig, DockerConfig, GraphError, Job, JobGraph,
    ParseError, Workflow, WorkflowParser,
};

pub use settings::{find_repo_root, Settings};
pub use source::{discover_sources, StaticSource, WorkflowSource, YamlFileSource};
