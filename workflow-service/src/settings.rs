// Assembler settings
// Loaded from the repository's .jobgraph.yml, the user config dir, or defaults

use crate::error::SettingsError;

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Settings file looked up at the repository root
pub const REPO_SETTINGS_FILE: &str = ".jobgraph.yml";

/// Environment variable overriding `workflows_dir`
pub const WORKFLOWS_DIR_ENV: &str = "JOBGRAPH_WORKFLOWS_DIR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Directory holding workflow definition files, relative to the repository root
    pub workflows_dir: PathBuf,

    /// Runner configuration for injected native jobs
    pub native_jobs: NativeJobSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            workflows_dir: PathBuf::from("ci/workflows"),
            native_jobs: NativeJobSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NativeJobSettings {
    /// Command prefix that runs a native job; the job name is appended
    pub command: String,

    /// Runner labels for the workflow-config job
    pub config_runs_on: Vec<String>,

    /// Runner labels for the docker build job
    pub docker_build_runs_on: Vec<String>,

    /// Runner labels for the final merge-ready job
    pub final_runs_on: Vec<String>,
}

impl Default for NativeJobSettings {
    fn default() -> Self {
        Self {
            command: "./ci/native_job".to_string(),
            config_runs_on: vec!["ubuntu-latest".to_string()],
            docker_build_runs_on: vec!["ubuntu-latest".to_string()],
            final_runs_on: vec!["ubuntu-latest".to_string()],
        }
    }
}

impl Settings {
    /// Read settings from a YAML file. Missing keys take their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(&content).map_err(|source| SettingsError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load settings for a repository.
    ///
    /// Lookup order: `<repo_root>/.jobgraph.yml`, then
    /// `<config dir>/jobgraph/config.yml`, then defaults. The
    /// `JOBGRAPH_WORKFLOWS_DIR` environment variable overrides the directory.
    pub fn load(repo_root: &Path) -> Result<Self, SettingsError> {
        let user_dir = dirs::config_dir();
        let settings = match Self::settings_file(repo_root, user_dir.as_deref()) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading settings");
                Self::from_file(path)?
            }
            None => Self::default(),
        };

        Ok(settings.with_workflows_dir_override(std::env::var(WORKFLOWS_DIR_ENV).ok()))
    }

    /// Replace `workflows_dir` with `dir` unless it is unset or empty
    pub fn with_workflows_dir_override(mut self, dir: Option<String>) -> Self {
        if let Some(dir) = dir.filter(|d| !d.is_empty()) {
            self.workflows_dir = PathBuf::from(dir);
        }
        self
    }

    /// Settings file to read: the repository's own, else the one under the
    /// user config dir.
    fn settings_file(repo_root: &Path, user_config_dir: Option<&Path>) -> Option<PathBuf> {
        let repo_file = repo_root.join(REPO_SETTINGS_FILE);
        if repo_file.is_file() {
            return Some(repo_file);
        }

        let user_file = user_config_dir?.join("jobgraph").join("config.yml");
        user_file.is_file().then_some(user_file)
    }

    /// Absolute workflows directory, resolving a relative one against `repo_root`
    pub fn workflows_dir_in(&self, repo_root: &Path) -> PathBuf {
        if self.workflows_dir.is_absolute() {
            self.workflows_dir.clone()
        } else {
            repo_root.join(&self.workflows_dir)
        }
    }
}

/// Find the repository root by walking up from `start`.
///
/// The nearest ancestor holding either a `.jobgraph.yml` settings file or a
/// `.git` entry wins. Returns `None` when neither is found.
pub fn find_repo_root(start: &Path) -> Option<PathBuf> {
    let start = start.canonicalize().ok()?;
    start
        .ancestors()
        .find(|dir| dir.join(REPO_SETTINGS_FILE).is_file() || dir.join(".git").exists())
        .map(Path::to_path_buf)
}
