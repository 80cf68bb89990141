//! Error types for Curadoria
//!
//! Provides structured error types with enough context (fragment file,
//! record title, field) for contributors to fix their submissions.

use std::path::PathBuf;
use thiserror::Error;

use crate::validation::FieldViolation;

/// The main error type for Curadoria operations
#[derive(Debug, Error)]
pub enum Error {
    // ==========================================================================
    // Fragment Errors
    // ==========================================================================
    #[error("Materials directory '{path}' does not exist")]
    MaterialsDirNotFound { path: PathBuf },

    #[error("Failed to list materials directory '{path}': {message}")]
    MaterialsDirUnreadable { path: PathBuf, message: String },

    #[error("Failed to parse fragment '{source_path}': {message}")]
    FragmentParse { source_path: String, message: String },

    // ==========================================================================
    // Record Errors
    // ==========================================================================
    #[error("Duplicated title '{title}' in {source_path} (entry {position}), already defined in {first_seen_in}")]
    DuplicateTitle {
        title: String,
        source_path: String,
        position: usize,
        first_seen_in: String,
    },

    #[error("Invalid material {} in {source_path} (entry {position}): {}", describe_title(.title), join_violations(.violations))]
    SchemaViolation {
        title: Option<String>,
        source_path: String,
        position: usize,
        violations: Vec<FieldViolation>,
    },

    // ==========================================================================
    // Aggregate Errors
    // ==========================================================================
    #[error("Failed to write file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize aggregate: {message}")]
    SerializeError { message: String },

    #[error("Aggregate '{path}' does not exist")]
    AggregateNotFound { path: PathBuf },

    #[error("Failed to read file '{path}': {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse aggregate '{path}': {message}")]
    AggregateParse { path: PathBuf, message: String },

    // ==========================================================================
    // Configuration Errors
    // ==========================================================================
    #[error("Invalid configuration '{path}': {message}")]
    ConfigParse { path: PathBuf, message: String },

    // ==========================================================================
    // Query Errors
    // ==========================================================================
    #[error("Invalid query: {message}")]
    InvalidQuery { message: String },
}

/// Result type alias for Curadoria operations
pub type Result<T> = std::result::Result<T, Error>;

fn describe_title(title: &Option<String>) -> String {
    match title {
        Some(title) => format!("'{}'", title),
        None => "(untitled)".to_string(),
    }
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

// =============================================================================
// Error Display Helpers
// =============================================================================

impl Error {
    /// Returns a user-friendly suggestion for fixing the error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Error::MaterialsDirNotFound { .. } => {
                Some("Pass --materials or set 'materials_dir' in curadoria.yaml")
            }
            Error::FragmentParse { .. } => {
                Some("Each fragment must be a YAML list of materials; check indentation and quoting")
            }
            Error::DuplicateTitle { .. } => {
                Some("Titles are unique regardless of case; add your name to 'recomendado_por' of the existing entry instead")
            }
            Error::SchemaViolation { .. } => {
                Some("Run `curadoria tokens` to list the allowed values for each field")
            }
            Error::AggregateNotFound { .. } => {
                Some("Build the aggregate first with: curadoria collect")
            }
            _ => None,
        }
    }

    /// Returns true if collect mode may skip this error and keep going
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::FragmentParse { .. }
                | Error::DuplicateTitle { .. }
                | Error::SchemaViolation { .. }
        )
    }

    /// Fragment (`<directory>/<file>`) the error originated from, if any
    pub fn source_path(&self) -> Option<&str> {
        match self {
            Error::FragmentParse { source_path, .. }
            | Error::DuplicateTitle { source_path, .. }
            | Error::SchemaViolation { source_path, .. } => Some(source_path),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Problem;

    #[test]
    fn test_error_display() {
        let err = Error::DuplicateTitle {
            title: "Intro".to_string(),
            source_path: "materials/b.yml".to_string(),
            position: 2,
            first_seen_in: "materials/a.yml".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Duplicated title 'Intro' in materials/b.yml (entry 2), already defined in materials/a.yml"
        );
    }

    #[test]
    fn test_schema_violation_lists_every_field() {
        let err = Error::SchemaViolation {
            title: None,
            source_path: "materials/a.yml".to_string(),
            position: 1,
            violations: vec![
                FieldViolation::new("titulo", Problem::Missing),
                FieldViolation::new("assuntos", Problem::Empty),
            ],
        };
        let message = err.to_string();
        assert!(message.contains("(untitled)"));
        assert!(message.contains("'titulo': missing required field"));
        assert!(message.contains("'assuntos': must not be empty"));
    }

    #[test]
    fn test_recoverable_kinds() {
        let parse = Error::FragmentParse {
            source_path: "materials/a.yml".to_string(),
            message: "bad indent".to_string(),
        };
        assert!(parse.is_recoverable());
        assert!(parse.suggestion().is_some());
        assert_eq!(parse.source_path(), Some("materials/a.yml"));

        let write = Error::WriteError {
            path: PathBuf::from("all_materials.yml"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(!write.is_recoverable());
        assert_eq!(write.source_path(), None);
    }
}
