// Job dependency graph
// Orders a workflow's jobs by their `requires` edges and groups them into parallel levels

use crate::workflow::models::{Job, Workflow};

use std::collections::{HashMap, VecDeque};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("job '{job}' requires unknown job '{dependency}'")]
    UnknownDependency { job: String, dependency: String },

    #[error("circular dependency detected between jobs: {}", .0.join(", "))]
    CyclicDependency(Vec<String>),
}

/// Dependency graph over the jobs of one workflow.
///
/// Edges point from a required job to the jobs that require it.
#[derive(Debug)]
pub struct JobGraph<'a> {
    jobs: &'a [Job],
    adjacency: Vec<Vec<usize>>,
    in_degree: Vec<usize>,
}

impl<'a> JobGraph<'a> {
    /// Build the graph, failing if any job requires a job the workflow lacks
    pub fn from_workflow(workflow: &'a Workflow) -> Result<Self, GraphError> {
        let jobs = workflow.jobs.as_slice();
        let job_indices: HashMap<&str, usize> = jobs
            .iter()
            .enumerate()
            .map(|(i, j)| (j.name.as_str(), i))
            .collect();

        let mut adjacency = vec![Vec::new(); jobs.len()];
        let mut in_degree = vec![0; jobs.len()];

        for (i, job) in jobs.iter().enumerate() {
            for dep in &job.requires {
                let Some(&dep_index) = job_indices.get(dep.as_str()) else {
                    return Err(GraphError::UnknownDependency {
                        job: job.name.clone(),
                        dependency: dep.clone(),
                    });
                };
                adjacency[dep_index].push(i);
                in_degree[i] += 1;
            }
        }

        Ok(Self {
            jobs,
            adjacency,
            in_degree,
        })
    }

    /// Topological sort using Kahn's algorithm.
    ///
    /// Ties are broken by position in the workflow's job sequence, so the
    /// result is stable for a given workflow.
    pub fn topological_order(&self) -> Result<Vec<&'a Job>, GraphError> {
        let mut in_degree = self.in_degree.clone();
        let mut queue: VecDeque<usize> = (0..self.jobs.len())
            .filter(|&i| in_degree[i] == 0)
            .collect();

        let mut result = Vec::with_capacity(self.jobs.len());
        while let Some(node) = queue.pop_front() {
            result.push(&self.jobs[node]);
            for &next in &self.adjacency[node] {
                in_degree[next] -= 1;
                if in_degree[next] == 0 {
                    queue.push_back(next);
                }
            }
        }

        if result.len() != self.jobs.len() {
            return Err(GraphError::CyclicDependency(self.blocked(&in_degree)));
        }

        Ok(result)
    }

    /// Group jobs into levels; jobs within one level can run in parallel.
    pub fn execution_levels(&self) -> Result<Vec<Vec<&'a Job>>, GraphError> {
        let mut in_degree = self.in_degree.clone();
        let mut processed = vec![false; self.jobs.len()];
        let mut remaining = self.jobs.len();
        let mut levels = Vec::new();

        while remaining > 0 {
            let current_level: Vec<usize> = (0..self.jobs.len())
                .filter(|&i| !processed[i] && in_degree[i] == 0)
                .collect();

            if current_level.is_empty() {
                return Err(GraphError::CyclicDependency(self.blocked(&in_degree)));
            }

            for &node in &current_level {
                processed[node] = true;
                for &next in &self.adjacency[node] {
                    in_degree[next] -= 1;
                }
            }
            remaining -= current_level.len();
            levels.push(current_level.into_iter().map(|i| &self.jobs[i]).collect());
        }

        Ok(levels)
    }

    pub fn is_acyclic(&self) -> bool {
        self.topological_order().is_ok()
    }

    fn blocked(&self, in_degree: &[usize]) -> Vec<String> {
        (0..self.jobs.len())
            .filter(|&i| in_degree[i] > 0)
            .map(|i| self.jobs[i].name.clone())
            .collect()
    }
}
