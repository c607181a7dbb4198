use crate::assembly::artifacts::ArtifactResolver;
use crate::assembly::diagnostics::{Diagnostic, Diagnostics};
use crate::assembly::injector::NativeJobInjector;
use crate::error::{AssemblyError, AssemblyResult};
use crate::settings::Settings;
use crate::source::WorkflowSource;
use crate::workflow::models::Workflow;

use serde::Serialize;

/// Which discovered workflows to assemble.
///
/// With neither field set, every workflow is selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Exact workflow name; the first match across sources wins
    pub name: Option<String>,
    /// Substring of the source identifier (e.g. part of a file path)
    pub file: Option<String>,
}

impl Selection {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            file: None,
        }
    }

    pub fn by_file(file: impl Into<String>) -> Self {
        Self {
            name: None,
            file: Some(file.into()),
        }
    }

    fn admits_source(&self, source_id: &str) -> bool {
        self.file
            .as_deref()
            .map_or(true, |filter| source_id.contains(filter))
    }

    /// Human-readable criterion for error messages
    pub fn criterion(&self) -> &str {
        self.name
            .as_deref()
            .or(self.file.as_deref())
            .unwrap_or("any")
    }
}

/// Finalized workflows together with the non-fatal findings of the pass
#[derive(Debug, Clone, Serialize)]
pub struct Assembly {
    pub workflows: Vec<Workflow>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Selects workflows from sources and assembles each one.
#[derive(Debug, Clone, Default)]
pub struct WorkflowSelector {
    injector: NativeJobInjector,
}

impl WorkflowSelector {
    pub fn new(settings: &Settings) -> Self {
        Self {
            injector: NativeJobInjector::new(settings.native_jobs.clone()),
        }
    }

    /// Pick the workflows matching `selection` from `sources`, in order.
    ///
    /// A source that fails to load is recorded as a diagnostic and skipped.
    /// Finding nothing is fatal.
    pub fn select<S: WorkflowSource>(
        &self,
        sources: &[S],
        selection: &Selection,
        diagnostics: &mut Diagnostics,
    ) -> AssemblyResult<Vec<Workflow>> {
        let mut selected = Vec::new();

        'sources: for source in sources {
            if !selection.admits_source(source.id()) {
                continue;
            }

            let workflows = match source.load() {
                Ok(workflows) => workflows,
                Err(e) => {
                    diagnostics.record(Diagnostic::SourceLoadFailed {
                        source: source.id().to_string(),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            for workflow in workflows {
                match &selection.name {
                    Some(name) if *name == workflow.name => {
                        tracing::info!("Read workflow [{}] config from [{}]", name, source.id());
                        selected = vec![workflow];
                        break 'sources;
                    }
                    Some(_) => continue,
                    None => {
                        tracing::info!(
                            "Read workflow configs from [{}], workflow name [{}]",
                            source.id(),
                            workflow.name
                        );
                        selected.push(workflow);
                    }
                }
            }
        }

        if selected.is_empty() {
            return Err(AssemblyError::NoMatchingWorkflow(
                selection.criterion().to_string(),
            ));
        }

        Ok(selected)
    }

    /// Select workflows, then inject native jobs and resolve artifact
    /// provenance for each of them.
    pub fn assemble<S: WorkflowSource>(
        &self,
        sources: &[S],
        selection: &Selection,
    ) -> AssemblyResult<Assembly> {
        let mut diagnostics = Diagnostics::new();
        let workflows = self
            .select(sources, selection, &mut diagnostics)?
            .into_iter()
            .map(|workflow| {
                let workflow = self.injector.inject(workflow);
                ArtifactResolver::resolve(workflow, &mut diagnostics)
            })
            .collect();

        Ok(Assembly {
            workflows,
            diagnostics: diagnostics.into_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembly::native_jobs::{
        DOCKER_BUILD_JOB_NAME as DOCKER, FINAL_JOB_NAME as FINAL,
        WORKFLOW_CONFIG_JOB_NAME as CONFIG,
    };
    use crate::source::{StaticSource, YamlFileSource};
    use crate::workflow::models::{Artifact, Job};

    use std::fs;

    fn static_source(id: &str, names: &[&str]) -> Box<dyn WorkflowSource> {
        let workflows = names
            .iter()
            .map(|n| Workflow::new(*n).with_job(Job::new(format!("{} job", n))))
            .collect();
        Box::new(StaticSource::new(id, workflows))
    }

    fn broken_source(dir: &std::path::Path) -> Box<dyn WorkflowSource> {
        let path = dir.join("broken.yml");
        fs::write(&path, "workflows:\n  - name: Broken\n    jobz: []\n").unwrap();
        Box::new(YamlFileSource::new(path))
    }

    #[test]
    fn test_select_all() {
        let sources = vec![
            static_source("ci/workflows/pr.yml", &["PR", "Docs"]),
            static_source("ci/workflows/master.yml", &["Master"]),
        ];

        let mut diagnostics = Diagnostics::new();
        let selected = WorkflowSelector::default()
            .select(&sources, &Selection::all(), &mut diagnostics)
            .unwrap();

        let names: Vec<_> = selected.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, vec!["PR", "Docs", "Master"]);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_select_by_name_first_match_wins() {
        let mut first = Workflow::new("PR").with_job(Job::new("from first"));
        first.enable_report = true;
        let sources: Vec<Box<dyn WorkflowSource>> = vec![
            static_source("a.yml", &["Docs"]),
            Box::new(StaticSource::new("b.yml", vec![first])),
            static_source("c.yml", &["PR"]),
        ];

        let mut diagnostics = Diagnostics::new();
        let selected = WorkflowSelector::default()
            .select(&sources, &Selection::by_name("PR"), &mut diagnostics)
            .unwrap();

        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].job_names(), vec!["from first"]);
    }

    #[test]
    fn test_select_by_name_skips_later_sources() {
        // A source after the match is never loaded, so its failure is not reported
        let temp = tempfile::tempdir().unwrap();
        let sources = vec![static_source("a.yml", &["PR"]), broken_source(temp.path())];

        let mut diagnostics = Diagnostics::new();
        WorkflowSelector::default()
            .select(&sources, &Selection::by_name("PR"), &mut diagnostics)
            .unwrap();
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_select_missing_name_is_fatal() {
        let sources = vec![static_source("a.yml", &["PR"])];

        let mut diagnostics = Diagnostics::new();
        let err = WorkflowSelector::default()
            .select(&sources, &Selection::by_name("Nightly"), &mut diagnostics)
            .unwrap_err();

        assert!(matches!(err, AssemblyError::NoMatchingWorkflow(ref c) if c == "Nightly"));
        assert_eq!(err.to_string(), "failed to find workflow [Nightly]");
    }

    #[test]
    fn test_select_by_file_filter() {
        let sources = vec![
            static_source("ci/workflows/pull_request.yml", &["PR"]),
            static_source("ci/workflows/master.yml", &["Master"]),
        ];

        let mut diagnostics = Diagnostics::new();
        let selected = WorkflowSelector::default()
            .select(&sources, &Selection::by_file("master"), &mut diagnostics)
            .unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].name, "Master");

        let err = WorkflowSelector::default()
            .select(&sources, &Selection::by_file("nightly"), &mut diagnostics)
            .unwrap_err();
        assert_eq!(err.to_string(), "failed to find workflow [nightly]");
    }

    #[test]
    fn test_select_name_within_file_filter() {
        let sources = vec![
            static_source("pull_request.yml", &["PR"]),
            static_source("release.yml", &["PR"]),
        ];
        let selection = Selection {
            name: Some("PR".into()),
            file: Some("release".into()),
        };

        let mut diagnostics = Diagnostics::new();
        let selected = WorkflowSelector::default()
            .select(&sources, &selection, &mut diagnostics)
            .unwrap();
        assert_eq!(selected[0].job_names(), vec!["PR job"]);
        assert_eq!(selection.criterion(), "PR");
    }

    #[test]
    fn test_failed_source_is_skipped() {
        let temp = tempfile::tempdir().unwrap();
        let sources = vec![broken_source(temp.path()), static_source("ok.yml", &["PR"])];

        let mut diagnostics = Diagnostics::new();
        let selected = WorkflowSelector::default()
            .select(&sources, &Selection::all(), &mut diagnostics)
            .unwrap();

        assert_eq!(selected.len(), 1);
        assert_eq!(diagnostics.len(), 1);
        let diagnostic = diagnostics.iter().next().unwrap();
        assert!(
            matches!(diagnostic, Diagnostic::SourceLoadFailed { source, .. } if source.ends_with("broken.yml"))
        );
    }

    #[test]
    fn test_reserved_job_name_fails_source() {
        let shadowing = Workflow::new("PR")
            .with_job(Job::new(DOCKER))
            .with_docker(crate::workflow::models::DockerConfig::new("base", "./docker/base"));
        let sources: Vec<Box<dyn WorkflowSource>> = vec![
            Box::new(StaticSource::new("shadow.yml", vec![shadowing])),
            static_source("ok.yml", &["Master"]),
        ];

        let assembly = WorkflowSelector::default()
            .assemble(&sources, &Selection::all())
            .unwrap();

        assert_eq!(assembly.workflows.len(), 1);
        assert_eq!(assembly.workflows[0].name, "Master");
        assert!(matches!(
            &assembly.diagnostics[..],
            [Diagnostic::SourceLoadFailed { source, reason }]
                if source == "shadow.yml" && reason.contains("reserved")
        ));
    }

    #[test]
    fn test_only_failed_sources_is_fatal() {
        let temp = tempfile::tempdir().unwrap();
        let sources = vec![broken_source(temp.path())];

        let mut diagnostics = Diagnostics::new();
        let err = WorkflowSelector::default()
            .select(&sources, &Selection::all(), &mut diagnostics)
            .unwrap_err();
        assert!(matches!(err, AssemblyError::NoMatchingWorkflow(ref c) if c == "any"));
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_assemble_injects_then_resolves() {
        let mut workflow = Workflow::new("PR")
            .with_job(Job::new("Build").with_provides(["binary"]))
            .with_job(Job::new("Tests").with_requires(["Build"]))
            .with_artifact(Artifact::new("binary"))
            .with_artifact(Artifact::new("coverage"));
        workflow.enable_merge_ready_status = true;
        let sources = vec![StaticSource::new("pr.yml", vec![workflow])];

        let assembly = WorkflowSelector::default()
            .assemble(&sources, &Selection::all())
            .unwrap();

        let pr = &assembly.workflows[0];
        assert_eq!(pr.job_names(), vec![CONFIG, "Build", "Tests", FINAL]);
        assert_eq!(
            pr.artifact("binary").unwrap().provided_by.as_deref(),
            Some("Build")
        );
        assert_eq!(pr.artifact("coverage").unwrap().provided_by, None);
        assert_eq!(
            assembly.diagnostics,
            vec![Diagnostic::OrphanedArtifact {
                workflow: "PR".into(),
                artifact: "coverage".into(),
            }]
        );
    }

    #[test]
    fn test_assemble_uses_native_job_settings() {
        let mut settings = Settings::default();
        settings.native_jobs.docker_build_runs_on = vec!["arm-builder".to_string()];

        let workflow = Workflow::new("PR")
            .with_job(Job::new("Build"))
            .with_docker(crate::workflow::models::DockerConfig::new("base", "./docker/base"));
        let sources = vec![StaticSource::new("pr.yml", vec![workflow])];

        let assembly = WorkflowSelector::new(&settings)
            .assemble(&sources, &Selection::all())
            .unwrap();
        let docker = assembly.workflows[0].job(DOCKER).unwrap();
        assert_eq!(docker.runs_on, vec!["arm-builder"]);
    }
}
