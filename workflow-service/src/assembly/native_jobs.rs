// Native job templates
// Synthetic jobs the assembler adds to user workflows

use crate::settings::NativeJobSettings;
use crate::workflow::models::Job;

use std::fmt;

pub const WORKFLOW_CONFIG_JOB_NAME: &str = "Config Workflow";
pub const DOCKER_BUILD_JOB_NAME: &str = "Dockers Build";
pub const FINAL_JOB_NAME: &str = "Finish Workflow";

/// Kinds of jobs injected by the assembler rather than declared by users
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeJob {
    /// Emits shared workflow configuration and report scaffolding
    WorkflowConfig,
    /// Builds every docker image the workflow declares
    DockerBuild,
    /// Merge-readiness gate that waits on every other job
    Final,
}

impl NativeJob {
    pub const ALL: [NativeJob; 3] = [
        NativeJob::WorkflowConfig,
        NativeJob::DockerBuild,
        NativeJob::Final,
    ];

    pub fn name(self) -> &'static str {
        match self {
            NativeJob::WorkflowConfig => WORKFLOW_CONFIG_JOB_NAME,
            NativeJob::DockerBuild => DOCKER_BUILD_JOB_NAME,
            NativeJob::Final => FINAL_JOB_NAME,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    pub fn is_native(name: &str) -> bool {
        Self::from_name(name).is_some()
    }
}

impl fmt::Display for NativeJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Builds native jobs from settings.
///
/// Every call returns a new `Job` value, so a job customized for one
/// workflow is never observed by another.
#[derive(Debug, Clone, Default)]
pub struct NativeJobFactory {
    settings: NativeJobSettings,
}

impl NativeJobFactory {
    pub fn new(settings: NativeJobSettings) -> Self {
        Self { settings }
    }

    pub fn build(&self, kind: NativeJob) -> Job {
        let runs_on = match kind {
            NativeJob::WorkflowConfig => &self.settings.config_runs_on,
            NativeJob::DockerBuild => &self.settings.docker_build_runs_on,
            NativeJob::Final => &self.settings.final_runs_on,
        };

        Job::new(kind.name())
            .with_runs_on(runs_on.iter().cloned())
            .with_command(format!("{} '{}'", self.settings.command, kind.name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_job_names_round_trip() {
        for kind in NativeJob::ALL {
            assert_eq!(NativeJob::from_name(kind.name()), Some(kind));
        }
        assert!(!NativeJob::is_native("Build"));
    }

    #[test]
    fn test_build_uses_settings() {
        let settings = NativeJobSettings {
            command: "./ci/native".to_string(),
            final_runs_on: vec!["style-checker".to_string()],
            ..NativeJobSettings::default()
        };
        let job = NativeJobFactory::new(settings).build(NativeJob::Final);

        assert_eq!(job.name, FINAL_JOB_NAME);
        assert_eq!(job.runs_on, vec!["style-checker"]);
        assert_eq!(job.command.as_deref(), Some("./ci/native 'Finish Workflow'"));
        assert!(job.requires.is_empty());
        assert!(job.digest_config.is_none());
    }

    #[test]
    fn test_build_returns_fresh_values() {
        let factory = NativeJobFactory::default();
        let mut first = factory.build(NativeJob::DockerBuild);
        first.add_requirement("Config Workflow");

        let second = factory.build(NativeJob::DockerBuild);
        assert!(second.requires.is_empty());
    }
}
