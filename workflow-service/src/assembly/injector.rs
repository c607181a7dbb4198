// Native job injection
// Adds synthetic jobs to a workflow and wires their dependency edges

use crate::assembly::native_jobs::{NativeJob, NativeJobFactory};
use crate::settings::NativeJobSettings;
use crate::workflow::models::{CacheDigestConfig, Workflow};

/// One injection stage: consumes a workflow and returns the next snapshot
type Stage = fn(&NativeJobFactory, Workflow) -> Workflow;

/// Stages in application order.
///
/// Docker build runs before workflow config, and both insert at the front of
/// the job list, so the config job ends up first and the docker job requires
/// it. The final gate runs last so it sees every other job.
const STAGES: [Stage; 3] = [docker_build_stage, workflow_config_stage, final_gate_stage];

/// Inserts native jobs into workflows.
///
/// The result starts with up to two native jobs (`Config Workflow`, then
/// `Dockers Build`), followed by the original jobs, and optionally ends with
/// `Finish Workflow`. Input is not validated here: a workflow that already
/// contains a cycle keeps it, and reserved job names are rejected when
/// sources load.
#[derive(Debug, Clone, Default)]
pub struct NativeJobInjector {
    factory: NativeJobFactory,
}

impl NativeJobInjector {
    pub fn new(settings: NativeJobSettings) -> Self {
        Self {
            factory: NativeJobFactory::new(settings),
        }
    }

    pub fn inject(&self, workflow: Workflow) -> Workflow {
        STAGES
            .iter()
            .fold(workflow, |workflow, stage| stage(&self.factory, workflow))
    }
}

fn docker_build_stage(factory: &NativeJobFactory, mut workflow: Workflow) -> Workflow {
    if workflow.dockers.is_empty() {
        return workflow;
    }

    let mut job = factory.build(NativeJob::DockerBuild);
    tracing::info!("Enable native job [{}] for [{}]", job.name, workflow.name);

    if workflow.enable_cache {
        tracing::info!("Add automatic digest config for [{}] job", job.name);
        job.digest_config = Some(CacheDigestConfig {
            include_paths: workflow.dockers.iter().map(|d| d.path.clone()).collect(),
            ..CacheDigestConfig::default()
        });
    }

    require_from_all(&mut workflow, job.name.clone());
    workflow.jobs.insert(0, job);
    workflow
}

fn workflow_config_stage(factory: &NativeJobFactory, mut workflow: Workflow) -> Workflow {
    if !workflow.needs_config_job() {
        return workflow;
    }

    let job = factory.build(NativeJob::WorkflowConfig);
    tracing::info!("Enable native job [{}] for [{}]", job.name, workflow.name);

    require_from_all(&mut workflow, job.name.clone());
    workflow.jobs.insert(0, job);
    workflow
}

fn final_gate_stage(factory: &NativeJobFactory, mut workflow: Workflow) -> Workflow {
    if !workflow.enable_merge_ready_status {
        return workflow;
    }

    let job = factory
        .build(NativeJob::Final)
        .with_requires(workflow.jobs.iter().map(|j| j.name.clone()));
    tracing::info!("Enable native job [{}] for [{}]", job.name, workflow.name);

    workflow.jobs.push(job);
    workflow
}

/// Make every job currently in the workflow require `name`
fn require_from_all(workflow: &mut Workflow, name: String) {
    for job in &mut workflow.jobs {
        if job.add_requirement(name.as_str()) {
            tracing::debug!("[{}] now requires [{}]", job.name, name);
        }
    }
}
