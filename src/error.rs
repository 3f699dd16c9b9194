//! Typed domain errors.
//!
//! Orchestration code works with `anyhow::Error`; these types exist so that
//! callers (and tests) can tell the domain failures apart with `downcast_ref`.

use thiserror::Error;

/// A version string did not contain a recognisable version.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid version: {input:?}")]
pub struct ParseError {
    pub input: String,
}

impl ParseError {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }
}

/// An enable/disable pattern matched no entry in the mod list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{pattern} not found in the mod list")]
pub struct NotFoundError {
    pub pattern: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::new("abc");
        assert_eq!(err.to_string(), "Invalid version: \"abc\"");
    }

    #[test]
    fn test_not_found_error_display() {
        let err = NotFoundError {
            pattern: "^rail".into(),
        };
        assert_eq!(err.to_string(), "^rail not found in the mod list");
    }

    #[test]
    fn test_errors_survive_anyhow_downcast() {
        let err = anyhow::Error::from(NotFoundError {
            pattern: "x".into(),
        });
        assert!(err.downcast_ref::<NotFoundError>().is_some());
        assert!(err.downcast_ref::<ParseError>().is_none());
    }
}
