//! Error adapter for converting FlowboardError to miette diagnostics.
//!
//! This module bridges the library's error type and miette's report
//! rendering used by the CLI. Each error variant gets a stable code and,
//! where there is something the user can do about it, a help line.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use flowboard::FlowboardError;

/// Adapter that renders a [`FlowboardError`] as a miette diagnostic.
pub struct ErrorAdapter<'a>(pub &'a FlowboardError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            FlowboardError::Io(_) => "flowboard::io",
            FlowboardError::Json(_) => "flowboard::json",
            FlowboardError::Transport(_) => "flowboard::transport",
            FlowboardError::LockConflict { .. } => "flowboard::lock_conflict",
            FlowboardError::NotFound(_) => "flowboard::not_found",
            FlowboardError::Config(_) => "flowboard::config",
            FlowboardError::Rejected(_) => "flowboard::rejected",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help: &str = match &self.0 {
            FlowboardError::LockConflict { .. } => {
                "the lock holder must unlock the diagram before it can be edited"
            }
            FlowboardError::NotFound(_) => "check the diagram id and the --store directory",
            FlowboardError::Config(_) => "check the configuration file passed with --config",
            _ => return None,
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

/// Wrap a [`FlowboardError`] for rendering.
pub fn to_reportable(err: &FlowboardError) -> ErrorAdapter<'_> {
    ErrorAdapter(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        let err = FlowboardError::NotFound(4);
        let adapter = to_reportable(&err);

        assert_eq!(adapter.code().unwrap().to_string(), "flowboard::not_found");
        assert_eq!(adapter.to_string(), "Diagram 4 not found");
        assert!(adapter.help().is_some());
    }

    #[test]
    fn test_lock_conflict_has_help() {
        let err = FlowboardError::LockConflict {
            diagram_id: 1,
            holder: "Bob".to_string(),
        };
        let adapter = to_reportable(&err);

        assert_eq!(adapter.code().unwrap().to_string(), "flowboard::lock_conflict");
        assert!(adapter.help().unwrap().to_string().contains("unlock"));
    }

    #[test]
    fn test_transport_has_no_help() {
        let err = FlowboardError::transport("connection refused");
        let adapter = to_reportable(&err);

        assert_eq!(adapter.to_string(), "Transport error: connection refused");
        assert!(adapter.help().is_none());
        assert!(adapter.labels().is_none());
    }
}
