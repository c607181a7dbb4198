pub mod error;
pub mod graph;
pub mod models;
pub mod parser;

pub use error::{ParseError, ParseErrorKind};
pub use graph::{GraphError, JobGraph};
pub use models::{Artifact, ArtifactType, CacheDigestConfig, DockerConfig, Job, Workflow};
pub use parser::WorkflowParser;
