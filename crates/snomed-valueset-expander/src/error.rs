//! Error types for ValueSet expansion.

use snomed_valueset::DefinitionError;
use thiserror::Error;

/// Errors that can occur during ValueSet expansion.
///
/// All variants except [`Internal`](ExpansionError::Internal) are terminal
/// validation failures raised before or during orchestration; none are
/// retried. `Internal` carries collaborator failures through unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExpansionError {
    /// Definition-layer error from the snomed-valueset crate.
    #[error(transparent)]
    Definition(#[from] DefinitionError),

    /// Malformed request parameter, e.g. a non-numeric offset or count.
    #[error("bad parameter: {0}")]
    BadParameter(String),

    /// Both the stored value set's own URL and a request URL were supplied.
    #[error("cannot expand both '{stored_url}' in '{id}' and '{request_url}' in request")]
    ConflictingDefinition {
        /// URL carried by the stored value set.
        stored_url: String,
        /// URL supplied with the request.
        request_url: String,
        /// Identifier of the stored value set.
        id: String,
    },

    /// A stored value set or code system version could not be found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Neither a compose element nor a URL defines the value set.
    #[error("compose element(s) or 'url' parameter is expected to be present for an expansion, \
             containing eg http://snomed.info/sct?fhir_vs=ecl/ or \
             http://snomed.info/sct/45991000052106?fhir_vs=ecl/")]
    NotExpandable,

    /// Failure inside a collaborator, passed through unchanged.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type for expansion operations.
pub type ExpansionResult<T> = std::result::Result<T, ExpansionError>;

/// Issue codes for structured error reporting, following the FHIR
/// OperationOutcome issue types the transport layer maps onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum IssueType {
    /// An element value is invalid.
    Value,
    /// The request is outside what the server supports.
    NotSupported,
    /// The referenced resource or version does not exist.
    NotFound,
    /// An unexpected internal failure.
    Exception,
}

impl ExpansionError {
    /// The issue code for this error.
    pub fn issue_type(&self) -> IssueType {
        match self {
            ExpansionError::Definition(definition) => match definition {
                DefinitionError::InvalidComposition
                | DefinitionError::MalformedImplicitUrl { .. } => IssueType::Value,
                DefinitionError::UnsupportedSystem { .. }
                | DefinitionError::InconsistentSystem { .. }
                | DefinitionError::InconsistentVersion { .. } => IssueType::NotSupported,
                DefinitionError::Translation(_) => IssueType::Exception,
            },
            ExpansionError::BadParameter(_) | ExpansionError::ConflictingDefinition { .. } => {
                IssueType::Value
            }
            ExpansionError::NotExpandable => IssueType::Value,
            ExpansionError::NotFound(_) => IssueType::NotFound,
            ExpansionError::Internal(_) => IssueType::Exception,
        }
    }

    /// The protocol status code this error maps onto.
    pub fn status_code(&self) -> u16 {
        match self.issue_type() {
            IssueType::Value | IssueType::NotSupported => 400,
            IssueType::NotFound => 404,
            IssueType::Exception => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definition_error_wraps_transparently() {
        let err: ExpansionError = DefinitionError::InvalidComposition.into();
        assert_eq!(
            err.to_string(),
            "invalid use of exclude without include in ValueSet compose element"
        );
        assert_eq!(err.issue_type(), IssueType::Value);
    }

    #[test]
    fn test_inconsistent_system_is_not_supported() {
        let err: ExpansionError = DefinitionError::InconsistentSystem {
            first: "a".to_string(),
            other: "b".to_string(),
        }
        .into();
        assert_eq!(err.issue_type(), IssueType::NotSupported);
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let err = ExpansionError::NotFound("ValueSet 'vs-1'".to_string());
        assert_eq!(err.issue_type(), IssueType::NotFound);
        assert_eq!(err.status_code(), 404);
    }

    #[test]
    fn test_internal_maps_to_500() {
        let err = ExpansionError::Internal("index unavailable".to_string());
        assert_eq!(err.issue_type(), IssueType::Exception);
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn test_conflicting_definition_message() {
        let err = ExpansionError::ConflictingDefinition {
            stored_url: "http://example.org/vs".to_string(),
            request_url: "http://snomed.info/sct?fhir_vs".to_string(),
            id: "vs-1".to_string(),
        };
        assert!(err.to_string().contains("http://example.org/vs"));
        assert!(err.to_string().contains("vs-1"));
        assert_eq!(err.status_code(), 400);
    }
}
