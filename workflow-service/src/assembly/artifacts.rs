use crate::assembly::diagnostics::{Diagnostic, Diagnostics};
use crate::workflow::models::Workflow;

use std::collections::HashMap;

/// Fills in `provided_by` for every artifact of a workflow.
pub struct ArtifactResolver;

impl ArtifactResolver {
    /// Map each provided artifact name to its producing job.
    ///
    /// Jobs are scanned in sequence order; when two jobs provide the same
    /// artifact the later one wins.
    pub fn producers(workflow: &Workflow) -> HashMap<&str, &str> {
        let mut producers = HashMap::new();
        for job in &workflow.jobs {
            for artifact in &job.provides {
                producers.insert(artifact.as_str(), job.name.as_str());
            }
        }
        producers
    }

    /// Resolve artifact provenance. Artifacts without a producer keep
    /// `provided_by` unset and are recorded as orphaned; resolution never fails.
    pub fn resolve(mut workflow: Workflow, diagnostics: &mut Diagnostics) -> Workflow {
        let resolved: Vec<Option<String>> = {
            let producers = Self::producers(&workflow);
            workflow
                .artifacts
                .iter()
                .map(|a| producers.get(a.name.as_str()).map(|job| job.to_string()))
                .collect()
        };

        for (artifact, provided_by) in workflow.artifacts.iter_mut().zip(resolved) {
            match provided_by {
                Some(job) => artifact.provided_by = Some(job),
                None => {
                    artifact.provided_by = None;
                    diagnostics.record(Diagnostic::OrphanedArtifact {
                        workflow: workflow.name.clone(),
                        artifact: artifact.name.clone(),
                    });
                }
            }
        }

        workflow
    }
}
