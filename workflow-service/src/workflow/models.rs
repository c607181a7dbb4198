use serde::{Deserialize, Deserializer, Serialize};

/// A CI workflow definition.
///
/// Jobs are kept in an ordered sequence: the order reflects the intended
/// scheduling priority, and native jobs are inserted at fixed positions in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Workflow {
    /// Workflow name, unique across all discovered sources
    pub name: String,

    /// Jobs in priority order
    #[serde(default)]
    pub jobs: Vec<Job>,

    /// Artifacts exchanged between jobs
    #[serde(default)]
    pub artifacts: Vec<Artifact>,

    /// Docker images built by the workflow
    #[serde(default)]
    pub dockers: Vec<DockerConfig>,

    /// Enable job result caching (requires the config job)
    #[serde(default)]
    pub enable_cache: bool,

    /// Enable the workflow report (requires the config job)
    #[serde(default)]
    pub enable_report: bool,

    /// Post a merge-ready commit status once every job has finished
    #[serde(default)]
    pub enable_merge_ready_status: bool,
}

impl Workflow {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            jobs: Vec::new(),
            artifacts: Vec::new(),
            dockers: Vec::new(),
            enable_cache: false,
            enable_report: false,
            enable_merge_ready_status: false,
        }
    }

    pub fn with_job(mut self, job: Job) -> Self {
        self.jobs.push(job);
        self
    }

    pub fn with_artifact(mut self, artifact: Artifact) -> Self {
        self.artifacts.push(artifact);
        self
    }

    pub fn with_docker(mut self, docker: DockerConfig) -> Self {
        self.dockers.push(docker);
        self
    }

    pub fn job(&self, name: &str) -> Option<&Job> {
        self.jobs.iter().find(|j| j.name == name)
    }

    pub fn artifact(&self, name: &str) -> Option<&Artifact> {
        self.artifacts.iter().find(|a| a.name == name)
    }

    pub fn job_names(&self) -> Vec<&str> {
        self.jobs.iter().map(|j| j.name.as_str()).collect()
    }

    /// Whether the shared workflow-config job is needed
    pub fn needs_config_job(&self) -> bool {
        self.enable_cache || self.enable_report || self.enable_merge_ready_status
    }
}

/// Read a `requires` list, dropping repeated names while keeping first-seen order
fn deserialize_requirements<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let names = Vec::<String>::deserialize(deserializer)?;
    let mut requires = Vec::with_capacity(names.len());
    for name in names {
        if !requires.contains(&name) {
            requires.push(name);
        }
    }
    Ok(requires)
}

/// A job within a workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Job {
    /// Job name, unique within the workflow
    pub name: String,

    /// Names of jobs that must complete before this one starts
    #[serde(
        default,
        deserialize_with = "deserialize_requirements",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub requires: Vec<String>,

    /// Names of artifacts this job produces
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub provides: Vec<String>,

    /// Runner labels the job is scheduled on
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub runs_on: Vec<String>,

    /// Command executed by the job
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    /// Timeout in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    /// Docker image the command runs in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_in_docker: Option<String>,

    /// Inputs hashed into the job's cache key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest_config: Option<CacheDigestConfig>,
}

impl Job {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            requires: Vec::new(),
            provides: Vec::new(),
            runs_on: Vec::new(),
            command: None,
            timeout: None,
            run_in_docker: None,
            digest_config: None,
        }
    }

    pub fn with_requires<I, S>(mut self, requires: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in requires {
            self.add_requirement(name);
        }
        self
    }

    pub fn with_provides<I, S>(mut self, provides: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.provides.extend(provides.into_iter().map(Into::into));
        self
    }

    pub fn with_runs_on<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.runs_on = labels.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    /// Add a dependency on `name`. `requires` has set semantics, so adding an
    /// existing dependency is a no-op. Returns whether the edge was new.
    pub fn add_requirement(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.requires.contains(&name) {
            return false;
        }
        self.requires.push(name);
        true
    }

    pub fn requires_job(&self, name: &str) -> bool {
        self.requires.iter().any(|r| r == name)
    }

    pub fn provides_artifact(&self, name: &str) -> bool {
        self.provides.iter().any(|p| p == name)
    }
}

/// Cache key configuration for a job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheDigestConfig {
    /// Paths hashed into the digest
    #[serde(default)]
    pub include_paths: Vec<String>,

    /// Paths excluded from the digest
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude_paths: Vec<String>,

    /// Hash git submodule state as well
    #[serde(default)]
    pub with_git_submodules: bool,
}

/// An artifact produced by one job and consumed by others.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Artifact {
    /// Artifact name, unique within the workflow
    pub name: String,

    /// Storage kind
    #[serde(default, rename = "type")]
    pub artifact_type: ArtifactType,

    /// Location of the artifact, relative to the job's working directory
    #[serde(default)]
    pub path: String,

    /// Name of the job that produces this artifact. Filled in during
    /// assembly and never read from workflow definitions.
    #[serde(default, skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub provided_by: Option<String>,
}

impl Artifact {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            artifact_type: ArtifactType::default(),
            path: String::new(),
            provided_by: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_type(mut self, artifact_type: ArtifactType) -> Self {
        self.artifact_type = artifact_type;
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactType {
    /// Plain file uploaded to the artifact store
    #[default]
    File,
    /// Object stored in S3
    S3,
    /// Ordering-only artifact with no payload
    Phony,
}

/// A docker image built as part of the workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DockerConfig {
    /// Image name
    #[serde(default)]
    pub name: String,

    /// Directory containing the Dockerfile; hashed into the build digest
    pub path: String,

    /// Target platforms, e.g. `linux/amd64`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub platforms: Vec<String>,

    /// Images that must be built first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
}

impl DockerConfig {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            platforms: Vec::new(),
            depends_on: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_requirement_is_idempotent() {
        let mut job = Job::new("build");
        assert!(job.add_requirement("config"));
        assert!(!job.add_requirement("config"));
        assert_eq!(job.requires, vec!["config"]);
    }

    #[test]
    fn test_needs_config_job() {
        let mut workflow = Workflow::new("PR");
        assert!(!workflow.needs_config_job());

        workflow.enable_report = true;
        assert!(workflow.needs_config_job());
    }

    #[test]
    fn test_artifact_defaults() {
        let yaml = r#"
name: binary
path: ./build/binary
"#;
        let artifact: Artifact = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(artifact.provided_by, None);
        assert_eq!(artifact.artifact_type, ArtifactType::File);
    }

    #[test]
    fn test_artifact_builder() {
        let artifact = Artifact::new("release")
            .with_type(ArtifactType::S3)
            .with_path("s3://bucket/release");
        assert_eq!(artifact.artifact_type, ArtifactType::S3);
        assert_eq!(artifact.path, "s3://bucket/release");
        assert_eq!(artifact.provided_by, None);
    }

    #[test]
    fn test_requires_deduplicated() {
        let job: Job = serde_yaml::from_str("name: Tests\nrequires: [Build, Style, Build]").unwrap();
        assert_eq!(job.requires, vec!["Build", "Style"]);
    }

    #[test]
    fn test_workflow_defaults() {
        let workflow: Workflow = serde_yaml::from_str("name: Nightly").unwrap();
        assert!(workflow.jobs.is_empty());
        assert!(!workflow.enable_cache);
        assert!(!workflow.enable_report);
        assert!(!workflow.enable_merge_ready_status);
    }
}
