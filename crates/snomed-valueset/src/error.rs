//! Error types for ValueSet definitions.

use thiserror::Error;

/// Errors that can occur while validating or compiling a ValueSet definition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    /// Compose element uses exclude rules without any include rule.
    #[error("invalid use of exclude without include in ValueSet compose element")]
    InvalidComposition,

    /// Compose rule names a code system other than SNOMED CT.
    #[error("compose elements are limited to the SNOMED CT code system, found '{system}'")]
    UnsupportedSystem {
        /// The unsupported code system URI.
        system: String,
    },

    /// Compose rules name more than one code system.
    #[error("compose element code systems must be consistent, found both '{first}' and '{other}'")]
    InconsistentSystem {
        /// The first code system encountered.
        first: String,
        /// The conflicting code system.
        other: String,
    },

    /// Compose rules name more than one code system version.
    #[error("compose element code system versions must be consistent, found both '{first}' and '{other}'")]
    InconsistentVersion {
        /// The first version encountered.
        first: String,
        /// The conflicting version.
        other: String,
    },

    /// Implicit value set URL does not match any known form.
    #[error("malformed implicit value set URL '{url}': {reason}")]
    MalformedImplicitUrl {
        /// The offending URL.
        url: String,
        /// Why it failed to parse.
        reason: String,
    },

    /// The external rule translator rejected a compose rule.
    #[error("compose rule translation failed: {0}")]
    Translation(String),
}

/// Result type for ValueSet definition operations.
pub type DefinitionResult<T> = std::result::Result<T, DefinitionError>;
