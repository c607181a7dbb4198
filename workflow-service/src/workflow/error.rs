// Workflow definition parse errors
// Carries line/column info, surrounding source, and fix suggestions

use std::fmt;

/// Detailed parse error with location and context
#[derive(Debug, Clone)]
pub struct ParseError {
    /// Error message
    pub message: String,
    /// Line number (1-indexed, 0 when unknown)
    pub line: usize,
    /// Column number (1-indexed, 0 when unknown)
    pub column: usize,
    /// Surrounding context (a few lines around the error)
    pub context: String,
    /// Optional suggestion for fixing the error
    pub suggestion: Option<String>,
    /// The kind of error
    pub kind: ParseErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// YAML syntax error
    YamlSyntax,
    /// Invalid schema (wrong types, missing fields)
    InvalidSchema,
    /// Two jobs or two artifacts share a name
    DuplicateName,
    /// A required name is empty
    EmptyName,
    /// A job uses a name reserved for injected native jobs
    ReservedName,
}

impl ParseError {
    pub fn new(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            message: message.into(),
            line,
            column,
            context: String::new(),
            suggestion: None,
            kind: ParseErrorKind::InvalidSchema,
        }
    }

    /// Error without a source location, for semantic checks after parsing
    pub fn unlocated(message: impl Into<String>, kind: ParseErrorKind) -> Self {
        Self::new(message, 0, 0).with_kind(kind)
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_kind(mut self, kind: ParseErrorKind) -> Self {
        self.kind = kind;
        self
    }

    fn with_suggestion_opt(mut self, suggestion: Option<String>) -> Self {
        self.suggestion = suggestion;
        self
    }

    /// Create context from source content
    pub fn with_source_context(mut self, source: &str, context_lines: usize) -> Self {
        let lines: Vec<&str> = source.lines().collect();
        let start = self.line.saturating_sub(context_lines + 1);
        let end = (self.line + context_lines).min(lines.len());

        let mut context = String::new();
        for (i, line) in lines.iter().enumerate().take(end).skip(start) {
            let line_num = i + 1;
            let prefix = if line_num == self.line { ">" } else { " " };
            context.push_str(&format!("{} {:4} | {}\n", prefix, line_num, line));

            if line_num == self.line && self.column > 0 {
                let indicator = " ".repeat(self.column + 7) + "^";
                context.push_str(&format!("       | {}\n", indicator));
            }
        }

        self.context = context;
        self
    }

    /// Create from serde_yaml error
    pub fn from_yaml_error(err: &serde_yaml::Error, source: &str) -> Self {
        let (line, column) = err
            .location()
            .map(|loc| (loc.line(), loc.column()))
            .unwrap_or((1, 1));

        let kind = if err.to_string().contains("missing field")
            || err.to_string().contains("unknown field")
            || err.to_string().contains("invalid type")
        {
            ParseErrorKind::InvalidSchema
        } else {
            ParseErrorKind::YamlSyntax
        };

        ParseError::new(format_yaml_error_message(err), line, column)
            .with_kind(kind)
            .with_source_context(source, 2)
            .with_suggestion_opt(suggest_yaml_fix(err, source, line))
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if self.line > 0 {
            write!(f, " (line {}:{})", self.line, self.column)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, "; help: {}", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

/// Format serde_yaml error message into something more readable
fn format_yaml_error_message(err: &serde_yaml::Error) -> String {
    let msg = err.to_string();
    match yaml_path(&msg) {
        Some(path) => format!("{}: {}", path, describe_yaml_error(&msg)),
        None => describe_yaml_error(&msg),
    }
}

/// Document path serde_yaml prefixes to errors, e.g. `workflows[0].jobs[1]`
fn yaml_path(msg: &str) -> Option<&str> {
    let (path, _) = msg.split_once(": ")?;
    (!path.is_empty() && !path.contains(' ')).then_some(path)
}

fn describe_yaml_error(msg: &str) -> String {
    let msg = match yaml_path(msg) {
        Some(path) => &msg[path.len() + 2..],
        None => msg,
    };

    if msg.contains("missing field") {
        if let Some(field) = extract_field_name(msg, "missing field `", "`") {
            return format!("missing required field '{}'", field);
        }
    }

    if msg.contains("unknown field") {
        if let Some(field) = extract_field_name(msg, "unknown field `", "`") {
            return format!("unknown field '{}'", field);
        }
    }

    if msg.contains("invalid type") {
        if let (Some(expected), Some(found)) = (
            extract_field_name(msg, "expected ", " at"),
            extract_field_name(msg, "invalid type: ", ","),
        ) {
            return format!("expected {}, but found {}", expected, found);
        }
    }

    // serde_yaml appends " at line X column Y"; the location is reported separately
    match msg.find(" at line ") {
        Some(idx) => msg[..idx].to_string(),
        None => msg.to_string(),
    }
}

fn extract_field_name(msg: &str, prefix: &str, suffix: &str) -> Option<String> {
    let start = msg.find(prefix)? + prefix.len();
    let end = msg[start..].find(suffix)? + start;
    Some(msg[start..end].to_string())
}

/// Suggest fixes for common mistakes in workflow definitions
fn suggest_yaml_fix(err: &serde_yaml::Error, source: &str, line: usize) -> Option<String> {
    let msg = err.to_string();
    let lines: Vec<&str> = source.lines().collect();
    let error_line = lines.get(line.saturating_sub(1)).unwrap_or(&"");

    if msg.contains("missing field `workflows`") {
        return Some("a workflow file must define a top-level 'workflows:' list".to_string());
    }

    if msg.contains("missing field `name`") {
        return Some("every workflow and job needs a 'name:'".to_string());
    }

    if msg.contains("missing field `path`") {
        return Some("docker entries need a 'path:' to the image directory".to_string());
    }

    if error_line.starts_with('\t') {
        return Some(
            "YAML prefers spaces over tabs for indentation. Replace tabs with spaces.".to_string(),
        );
    }

    let typo_suggestions = [
        ("require:", "requires"),
        ("needs:", "requires"),
        ("provide:", "provides"),
        ("enable-cache", "enable_cache"),
        ("enable-report", "enable_report"),
        ("enable-merge-ready-status", "enable_merge_ready_status"),
        ("runs-on", "runs_on"),
        ("docker:", "dockers"),
    ];

    let lower_line = error_line.to_lowercase();
    for (typo, correct) in typo_suggestions {
        if lower_line.trim_start().trim_start_matches("- ").starts_with(typo) {
            return Some(format!("did you mean '{}'?", correct));
        }
    }

    None
}
