//! # snomed-valueset
//!
//! A Rust library for FHIR ValueSet definitions over SNOMED CT.
//!
//! A FHIR ValueSet selects a set of concepts from a code system. Over
//! SNOMED CT there are two ways to define that selection:
//!
//! - **Compose**: a persisted include/exclude rule set on the ValueSet
//!   resource, compiled here into a single ECL expression.
//! - **Implicit URL**: a URL-encoded definition that is never persisted,
//!   interpreted here into an ECL expression or an all-reference-sets
//!   directive.
//!
//! This crate is the pure definition layer: data model, compilation and
//! validation. Executing the resulting ECL against versioned content is the
//! job of `snomed-valueset-expander`.
//!
//! ## Compose Usage
//!
//! ```rust
//! use snomed_valueset::{compose_to_ecl, ConceptSetRule, RuleTranslator, ValueSetCompose};
//! use snomed_valueset::DefinitionResult;
//!
//! struct EclPassthrough;
//!
//! impl RuleTranslator for EclPassthrough {
//!     fn rule_to_ecl(&self, rule: &ConceptSetRule) -> DefinitionResult<String> {
//!         Ok(rule.concepts.join(" OR "))
//!     }
//! }
//!
//! let compose = ValueSetCompose {
//!     include: vec![ConceptSetRule::for_concepts(["<<404684003"])],
//!     exclude: vec![ConceptSetRule::for_concepts(["<<272379006"])],
//! };
//! let ecl = compose_to_ecl(&compose, &EclPassthrough).unwrap();
//! assert_eq!(ecl, "( <<404684003 ) MINUS ( <<272379006 )");
//! ```
//!
//! ## Implicit URL Quick Reference
//!
//! See [HL7 FHIR: implicit SNOMED CT value sets](https://www.hl7.org/fhir/snomedct.html#implicit).
//!
//! | URL suffix | Meaning | Result |
//! |------------|---------|--------|
//! | `?fhir_vs` | whole code system | ECL `*` |
//! | `?fhir_vs=refset` | all reference sets | all-reference-sets directive |
//! | `?fhir_vs=isa/<id>` | concept and descendants | ECL `<<<id>` |
//! | `?fhir_vs=refset/<id>` | members of a reference set | ECL `^<id>` |
//! | `?fhir_vs=ecl/<expr>` | arbitrary constraint | ECL `<expr>` verbatim |
//!
//! ```rust
//! use snomed_valueset::{parse_implicit_url, ImplicitQuery};
//!
//! let implicit = parse_implicit_url("http://snomed.info/sct?fhir_vs=isa/73211009").unwrap();
//! assert_eq!(implicit.system_version_uri, "http://snomed.info/sct");
//! assert_eq!(implicit.query, ImplicitQuery::Ecl("<<73211009".to_string()));
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod compose;
mod dialect;
mod error;
mod implicit;

pub use compose::{
    compose_to_ecl, consistent_system_version, ConceptSetRule, RuleFilter, RuleTranslator,
    ValueSetCompose,
};
pub use dialect::{
    resolve_language_dialects, DialectResolution, LanguageDialect, GB_ENGLISH_LANGUAGE_REFSET,
    US_ENGLISH_LANGUAGE_REFSET,
};
pub use error::{DefinitionError, DefinitionResult};
pub use implicit::{parse_implicit_url, ImplicitQuery, ImplicitValueSet};

/// Canonical URI of the SNOMED CT code system.
///
/// Compose rules must name this code system (optionally qualified with a
/// module or version suffix, e.g. `http://snomed.info/sct/45991000052106`).
pub const SNOMED_CT_URI: &str = "http://snomed.info/sct";

/// Concept identifier type.
///
/// Identifiers are kept as opaque strings: they arrive URL-encoded or inside
/// FHIR resources and are passed verbatim into ECL expressions.
pub type ConceptId = String;
