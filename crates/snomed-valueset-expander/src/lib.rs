//! # snomed-valueset-expander
//!
//! FHIR ValueSet expansion engine for SNOMED CT.
//!
//! This crate bridges the [`snomed-valueset`] definition layer and any
//! terminology backend to expand a value set definition into a paginated,
//! language-aware page of concepts.
//!
//! ## Key Properties
//!
//! - **Backend agnostic** - the repository, version lookup, search, refset
//!   aggregation and detail lookup collaborators are capability traits
//! - **Stateless** - one borrowed expander serves concurrent calls; no
//!   caches, no retries, no cross-request state
//! - **Both definition shapes** - stored compose elements and implicit
//!   `?fhir_vs` URLs expand through the same orchestration
//!
//! ## Quick Start
//!
//! ```ignore
//! use snomed_valueset_expander::{ExpansionRequest, ValueSetExpander};
//!
//! // Wire up your backend (implements the collaborator traits)
//! let expander = ValueSetExpander::new(
//!     &repository, &versions, &translator, &search, &refsets, &details,
//! );
//!
//! // Expand an implicit value set
//! let request = ExpansionRequest::for_url("http://snomed.info/sct?fhir_vs=isa/73211009")
//!     .with_active_only(true)
//!     .with_count("100");
//! let expansion = expander.expand(&request)?;
//! println!("{} of {} concepts", expansion.count(), expansion.total);
//!
//! // Expand a stored value set
//! let expansion = expander.expand(&ExpansionRequest::for_instance("dm-concepts"))?;
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                   snomed-valueset-expander                   │
//! │                                                              │
//! │  ValueSetExpander::expand                                    │
//! │  ├── resolve target (ValueSetRepository)                     │
//! │  ├── resolve dialects + paging (snomed-valueset)             │
//! │  ├── compile definition → ECL (snomed-valueset)              │
//! │  ├── resolve branch (CodeSystemVersionResolver)              │
//! │  ├── run search (ConceptSearch / ReferenceSetAggregator)     │
//! │  ├── fetch page details (ConceptDetailLookup)                │
//! │  └── assemble ValueSetExpansion                              │
//! │                                                              │
//! │  Dependencies:                                               │
//! │  └── snomed-valueset - compose model, implicit URL grammar   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Within one call the steps are strictly sequential: each consumes the
//! previous step's output, and consistency relies on collaborators
//! presenting an immutable snapshot per branch path.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod config;
mod error;
mod expander;
mod operation;
mod request;
mod result;
mod traits;

// Public re-exports
pub use config::{default_language_dialects, ExpanderConfig, ExpanderConfigBuilder, DEFAULT_PAGE_SIZE};
pub use error::{ExpansionError, ExpansionResult, IssueType};
pub use expander::ValueSetExpander;
pub use operation::{dispatch, OperationRoute, OperationScope, EXPAND};
pub use request::{ExpansionRequest, PageRequest};
pub use result::{ExpansionEntry, ValueSetExpansion};
pub use traits::{
    BranchPath, CodeSystemVersionResolver, ConceptDetail, ConceptDetailLookup, ConceptPage,
    ConceptSearch, ConceptSearchRequest, Designation, DialectTerm, ReferenceSetAggregator,
    StoredValueSet, ValueSetRepository,
};

// Re-export commonly used types from the definition layer for convenience
pub use snomed_valueset::{
    ConceptId, ConceptSetRule, LanguageDialect, RuleTranslator, ValueSetCompose,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_api_accessible() {
        // Verify all public types are accessible
        let _: Option<ExpanderConfig> = None;
        let _: Option<ExpansionRequest> = None;
        let _: Option<ValueSetExpansion> = None;
        let _: Option<ExpansionResult<()>> = None;
        let _: Option<BranchPath> = None;
    }

    #[test]
    fn test_re_exports() {
        // Verify re-exports from the definition layer work
        let _compose = ValueSetCompose::default();
        let _dialect = LanguageDialect::new("en");
        assert_eq!(EXPAND, "$expand");
    }
}
