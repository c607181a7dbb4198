use crate::assembly::native_jobs::NativeJob;
use crate::workflow::error::{ParseError, ParseErrorKind};
use crate::workflow::models::Workflow;

use std::collections::HashSet;

use serde::Deserialize;

/// Top-level layout of a workflow definition file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct WorkflowFile {
    workflows: Vec<Workflow>,
}

/// Parser for workflow definition YAML.
///
/// A definition file exposes its workflows under a top-level `workflows:` list.
pub struct WorkflowParser;

impl WorkflowParser {
    /// Parse the workflows declared in a YAML document.
    pub fn parse(content: &str) -> Result<Vec<Workflow>, ParseError> {
        let file: WorkflowFile =
            serde_yaml::from_str(content).map_err(|e| ParseError::from_yaml_error(&e, content))?;
        Ok(file.workflows)
    }

    /// Parse and validate the workflows declared in a YAML document.
    pub fn parse_and_validate(content: &str) -> Result<Vec<Workflow>, ParseError> {
        let workflows = Self::parse(content)?;

        let mut seen = HashSet::new();
        for workflow in &workflows {
            Self::validate(workflow)?;
            if !seen.insert(workflow.name.as_str()) {
                return Err(ParseError::unlocated(
                    format!("workflow '{}' is declared more than once", workflow.name),
                    ParseErrorKind::DuplicateName,
                ));
            }
        }

        Ok(workflows)
    }

    /// Check the naming rules a workflow must satisfy before assembly.
    pub fn validate(workflow: &Workflow) -> Result<(), ParseError> {
        if workflow.name.trim().is_empty() {
            return Err(ParseError::unlocated(
                "workflow name must not be empty",
                ParseErrorKind::EmptyName,
            ));
        }

        let mut job_names = HashSet::new();
        for (idx, job) in workflow.jobs.iter().enumerate() {
            if job.name.trim().is_empty() {
                return Err(ParseError::unlocated(
                    format!("job {} in workflow '{}' has an empty name", idx, workflow.name),
                    ParseErrorKind::EmptyName,
                ));
            }
            if NativeJob::is_native(&job.name) {
                return Err(ParseError::unlocated(
                    format!(
                        "job '{}' in workflow '{}' uses a reserved native job name",
                        job.name, workflow.name
                    ),
                    ParseErrorKind::ReservedName,
                )
                .with_suggestion("native jobs are added automatically; rename the job"));
            }
            if !job_names.insert(job.name.as_str()) {
                return Err(ParseError::unlocated(
                    format!(
                        "job '{}' is declared more than once in workflow '{}'",
                        job.name, workflow.name
                    ),
                    ParseErrorKind::DuplicateName,
                )
                .with_suggestion("job names must be unique within a workflow"));
            }

            let mut requirements = HashSet::new();
            if let Some(dup) = job.requires.iter().find(|&r| !requirements.insert(r.as_str())) {
                return Err(ParseError::unlocated(
                    format!("job '{}' requires '{}' more than once", job.name, dup),
                    ParseErrorKind::DuplicateName,
                ));
            }
        }

        let mut artifact_names = HashSet::new();
        for artifact in &workflow.artifacts {
            if artifact.name.trim().is_empty() {
                return Err(ParseError::unlocated(
                    format!("workflow '{}' declares an artifact with an empty name", workflow.name),
                    ParseErrorKind::EmptyName,
                ));
            }
            if !artifact_names.insert(artifact.name.as_str()) {
                return Err(ParseError::unlocated(
                    format!(
                        "artifact '{}' is declared more than once in workflow '{}'",
                        artifact.name, workflow.name
                    ),
                    ParseErrorKind::DuplicateName,
                ));
            }
        }

        Ok(())
    }
}
