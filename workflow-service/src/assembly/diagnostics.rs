use std::fmt;

use serde::Serialize;

/// A non-fatal finding produced while assembling workflows.
///
/// Diagnostics are returned with the assembled workflows and also logged at
/// warn level as they are recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A workflow source could not be loaded and was skipped
    SourceLoadFailed { source: String, reason: String },

    /// No job in the workflow provides the artifact
    OrphanedArtifact { workflow: String, artifact: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::SourceLoadFailed { source, reason } => {
                write!(f, "failed to add workflows from [{}]: {}", source, reason)
            }
            Diagnostic::OrphanedArtifact { workflow, artifact } => write!(
                f,
                "artifact [{}] in workflow [{}] has no job that provides it",
                artifact, workflow
            ),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, diagnostic: Diagnostic) {
        tracing::warn!("{}", diagnostic);
        self.entries.push(diagnostic);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let diagnostic = Diagnostic::OrphanedArtifact {
            workflow: "PR".into(),
            artifact: "binary".into(),
        };
        assert_eq!(
            diagnostic.to_string(),
            "artifact [binary] in workflow [PR] has no job that provides it"
        );
    }

    #[test]
    fn test_serialize_tagged() {
        let diagnostic = Diagnostic::SourceLoadFailed {
            source: "ci/workflows/pr.yml".into(),
            reason: "unknown field 'needs'".into(),
        };
        let json = serde_json::to_value(&diagnostic).unwrap();
        assert_eq!(json["kind"], "source_load_failed");
        assert_eq!(json["source"], "ci/workflows/pr.yml");
    }

    #[test]
    fn test_record() {
        let mut diagnostics = Diagnostics::new();
        assert!(diagnostics.is_empty());

        diagnostics.record(Diagnostic::OrphanedArtifact {
            workflow: "PR".into(),
            artifact: "binary".into(),
        });
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics.into_vec().len(), 1);
    }
}
