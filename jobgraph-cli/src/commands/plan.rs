use crate::commands::{self, SelectArgs};
use crate::output;

use clap::Args;
use color_eyre::Result;

use workflow_service::{JobGraph, NativeJob};

/// Show the order in which each workflow's jobs can run
#[derive(Args, Debug)]
pub struct PlanArgs {
    #[command(flatten)]
    pub select: SelectArgs,
}

pub fn execute(args: PlanArgs) -> Result<()> {
    let assembly = commands::assemble(&args.select)?;

    for workflow in &assembly.workflows {
        output::header(format!("Workflow '{}' ({} jobs)", workflow.name, workflow.jobs.len()));

        let graph = JobGraph::from_workflow(workflow)
            .map_err(|e| color_eyre::eyre::eyre!("workflow '{}': {}", workflow.name, e))?;
        let levels = graph
            .execution_levels()
            .map_err(|e| color_eyre::eyre::eyre!("workflow '{}': {}", workflow.name, e))?;

        for (i, level) in levels.iter().enumerate() {
            let jobs: Vec<String> = level
                .iter()
                .map(|job| {
                    if NativeJob::is_native(&job.name) {
                        format!("{} (native)", job.name)
                    } else {
                        job.name.clone()
                    }
                })
                .collect();
            println!("{:>4}. {}", i + 1, jobs.join(", "));
        }
        println!();
    }

    output::success("All workflow graphs are acyclic");
    Ok(())
}
