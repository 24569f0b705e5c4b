//! Collaborator traits for ValueSet expansion.
//!
//! This module defines the capability traits the expander drives during one
//! expansion call. Each trait covers a single concern; any backend
//! satisfying them plugs in without touching the orchestration logic.
//!
//! # Architecture Note
//!
//! This crate intentionally does NOT depend on a concrete store, index or
//! repository implementation. The traits are defined here, but
//! implementations for concrete backends belong in the consuming crate.
//!
//! All fallible operations return [`ExpansionResult`]; a collaborator
//! failure propagates to the caller unchanged, usually as
//! [`ExpansionError::Internal`](crate::ExpansionError::Internal). "Absent"
//! outcomes are `Ok(None)` so the expander owns the not-found message.

use snomed_valueset::{ConceptId, LanguageDialect, ValueSetCompose};

use crate::error::ExpansionResult;

/// A hierarchical path identifying one versioned snapshot of content,
/// e.g. `MAIN` or `MAIN/SNOMEDCT-SE/2021-05-31`.
///
/// Branch paths are only produced by a [`CodeSystemVersionResolver`]; the
/// expander treats them as opaque.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BranchPath(pub String);

impl BranchPath {
    /// Creates a branch path from any string-like value.
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }
}

impl std::fmt::Display for BranchPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stored ValueSet resource, as returned by the repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StoredValueSet {
    /// Resource identifier.
    pub id: String,
    /// Canonical URL of the value set, if the resource carries one.
    #[cfg_attr(feature = "serde", serde(default))]
    pub url: Option<String>,
    /// Compose element, if the resource carries one.
    #[cfg_attr(feature = "serde", serde(default))]
    pub compose: Option<ValueSetCompose>,
}

/// Repository of stored ValueSet resources.
pub trait ValueSetRepository: Send + Sync {
    /// Loads a stored value set by resource id.
    ///
    /// Returns `Ok(None)` when no resource with that id exists.
    fn find_by_id(&self, id: &str) -> ExpansionResult<Option<StoredValueSet>>;
}

/// Resolves a `<system>/<version>` URI to the branch holding that release.
pub trait CodeSystemVersionResolver: Send + Sync {
    /// Resolves a code system version URI to a branch path.
    ///
    /// Returns `Ok(None)` when the version is unknown.
    fn branch_for_version(&self, version_uri: &str) -> ExpansionResult<Option<BranchPath>>;
}

/// One page of concept search results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConceptPage {
    /// Concept identifiers on this page, in result order.
    pub concept_ids: Vec<ConceptId>,
    /// Total number of matches, independent of page size.
    pub total: u64,
}

impl ConceptPage {
    /// Creates an empty page.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Parameters for one concept search call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConceptSearchRequest {
    /// ECL expression to evaluate.
    pub ecl: String,
    /// Restrict to active (`Some(true)`) or inactive (`Some(false)`)
    /// concepts; `None` places no constraint.
    pub active_only: Option<bool>,
    /// Free-text filter over description terms.
    pub term_filter: Option<String>,
    /// Result dialects, in preference order.
    pub dialects: Vec<LanguageDialect>,
    /// Number of matches to skip.
    pub offset: usize,
    /// Maximum number of matches to return.
    pub limit: usize,
}

/// Concept search engine evaluating ECL against branch-scoped content.
///
/// Results must be stable for a fixed branch snapshot: repeated calls with
/// the same arguments during one expansion see the same data.
pub trait ConceptSearch: Send + Sync {
    /// Runs an ECL search on a branch, returning one page plus the total.
    fn search(
        &self,
        branch: &BranchPath,
        request: &ConceptSearchRequest,
    ) -> ExpansionResult<ConceptPage>;
}

/// Aggregates active reference set members by owning reference set.
pub trait ReferenceSetAggregator: Send + Sync {
    /// Returns `(reference set id, active member count)` pairs for every
    /// reference set with active members on the branch, in a stable
    /// collaborator-defined order.
    fn active_member_counts_by_refset(
        &self,
        branch: &BranchPath,
    ) -> ExpansionResult<Vec<(ConceptId, u64)>>;
}

/// A preferred term in one dialect.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DialectTerm {
    /// The dialect the term is preferred in.
    pub dialect: LanguageDialect,
    /// The term text.
    pub term: String,
}

/// A description attached to a concept, in FHIR designation shape.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Designation {
    /// Language code of the designation.
    pub language: String,
    /// Description type or acceptability concept, if known.
    #[cfg_attr(feature = "serde", serde(default))]
    pub use_concept: Option<ConceptId>,
    /// The designation text.
    pub value: String,
}

/// Display details for one concept, scoped to the requested dialects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConceptDetail {
    /// The concept the details belong to.
    pub concept_id: ConceptId,
    /// Preferred terms per requested dialect, detail-source order.
    pub preferred_terms: Vec<DialectTerm>,
    /// All designations in the requested dialects.
    pub designations: Vec<Designation>,
}

impl ConceptDetail {
    /// Returns the preferred term in the given dialect, if any.
    pub fn preferred_term_in(&self, dialect: &LanguageDialect) -> Option<&str> {
        self.preferred_terms
            .iter()
            .find(|t| &t.dialect == dialect)
            .map(|t| t.term.as_str())
    }
}

/// Batch lookup of concept display details.
pub trait ConceptDetailLookup: Send + Sync {
    /// Fetches details for the given concepts, restricted to the given
    /// dialects. Unknown ids are simply absent from the result.
    fn find_details(
        &self,
        branch: &BranchPath,
        concept_ids: &[ConceptId],
        dialects: &[LanguageDialect],
    ) -> ExpansionResult<Vec<ConceptDetail>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branch_path_display() {
        let branch = BranchPath::new("MAIN/SNOMEDCT-SE");
        assert_eq!(branch.to_string(), "MAIN/SNOMEDCT-SE");
    }

    #[test]
    fn test_preferred_term_lookup() {
        let en_us = LanguageDialect::with_refset("en", "900000000000509007");
        let sv = LanguageDialect::new("sv");
        let detail = ConceptDetail {
            concept_id: "73211009".to_string(),
            preferred_terms: vec![
                DialectTerm {
                    dialect: en_us.clone(),
                    term: "Diabetes mellitus".to_string(),
                },
                DialectTerm {
                    dialect: sv.clone(),
                    term: "Diabetes".to_string(),
                },
            ],
            designations: vec![],
        };

        assert_eq!(detail.preferred_term_in(&en_us), Some("Diabetes mellitus"));
        assert_eq!(detail.preferred_term_in(&sv), Some("Diabetes"));
        assert_eq!(detail.preferred_term_in(&LanguageDialect::new("fr")), None);
    }

    #[test]
    fn test_empty_concept_page() {
        let page = ConceptPage::empty();
        assert!(page.concept_ids.is_empty());
        assert_eq!(page.total, 0);
    }
}
