//! Implicit value set URL interpretation.
//!
//! An implicit value set is never persisted: its whole definition is encoded
//! in a URL such as `http://snomed.info/sct?fhir_vs=isa/73211009`, following
//! the [FHIR SNOMED CT conventions](https://www.hl7.org/fhir/snomedct.html#implicit).
//!
//! The text before the `?` names the code system version (resolved to a
//! branch by the expansion layer); the text after it selects one of five
//! forms, checked in fixed priority order against the form table below.

use crate::error::{DefinitionError, DefinitionResult};

/// An interpreted implicit value set URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImplicitValueSet {
    /// The code system version URI, i.e. the URL up to the `?`.
    pub system_version_uri: String,
    /// The concept selection the URL encodes.
    pub query: ImplicitQuery,
}

/// The concept selection encoded by an implicit value set URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImplicitQuery {
    /// An ECL expression to run against the concept search engine.
    Ecl(String),
    /// One entry per known reference set, bypassing ECL entirely.
    AllReferenceSets,
}

// ============================================================================
// Form table
// ============================================================================

struct FormRule {
    /// Parameter text selecting this form.
    marker: &'static str,
    /// Whether the marker must match the whole parameter string.
    exact: bool,
    /// Builds the query from the text after the marker. `None` rejects the
    /// remainder (the form needs an identifier and none was given).
    build: fn(&str) -> Option<ImplicitQuery>,
    /// Error reason used when `build` rejects the remainder.
    reject_reason: &'static str,
}

/// The five URL forms, in priority order. Exact forms outrank the prefixed
/// forms that share their marker text.
const FORMS: &[FormRule] = &[
    FormRule {
        marker: "fhir_vs",
        exact: true,
        build: build_whole_system,
        reject_reason: "",
    },
    FormRule {
        marker: "fhir_vs=refset",
        exact: true,
        build: build_all_refsets,
        reject_reason: "",
    },
    FormRule {
        marker: "fhir_vs=isa/",
        exact: false,
        build: build_isa,
        reject_reason: "missing concept identifier after 'fhir_vs=isa/'",
    },
    FormRule {
        marker: "fhir_vs=refset/",
        exact: false,
        build: build_refset_members,
        reject_reason: "missing reference set identifier after 'fhir_vs=refset/'",
    },
    FormRule {
        marker: "fhir_vs=ecl/",
        exact: false,
        build: build_ecl,
        reject_reason: "missing expression after 'fhir_vs=ecl/'",
    },
];

fn build_whole_system(_: &str) -> Option<ImplicitQuery> {
    Some(ImplicitQuery::Ecl("*".to_string()))
}

fn build_all_refsets(_: &str) -> Option<ImplicitQuery> {
    Some(ImplicitQuery::AllReferenceSets)
}

fn build_isa(id: &str) -> Option<ImplicitQuery> {
    (!id.is_empty()).then(|| ImplicitQuery::Ecl(format!("<<{id}")))
}

fn build_refset_members(id: &str) -> Option<ImplicitQuery> {
    (!id.is_empty()).then(|| ImplicitQuery::Ecl(format!("^{id}")))
}

fn build_ecl(ecl: &str) -> Option<ImplicitQuery> {
    (!ecl.is_empty()).then(|| ImplicitQuery::Ecl(ecl.to_string()))
}

/// Interprets an implicit value set URL.
///
/// Splits at the first `?` and matches the parameter text against the form
/// table. Any URL that matches no form is rejected; the code system part is
/// not validated here.
///
/// # Examples
///
/// ```rust
/// use snomed_valueset::{parse_implicit_url, ImplicitQuery};
///
/// let vs = parse_implicit_url("http://snomed.info/sct?fhir_vs").unwrap();
/// assert_eq!(vs.query, ImplicitQuery::Ecl("*".to_string()));
///
/// let vs = parse_implicit_url("http://snomed.info/sct?fhir_vs=refset").unwrap();
/// assert_eq!(vs.query, ImplicitQuery::AllReferenceSets);
/// ```
pub fn parse_implicit_url(url: &str) -> DefinitionResult<ImplicitValueSet> {
    let Some((system_version_uri, params)) = url.split_once('?') else {
        return Err(malformed(url, "missing '?' parameter separator"));
    };

    for form in FORMS {
        let remainder = if form.exact {
            (params == form.marker).then_some("")
        } else {
            params.strip_prefix(form.marker)
        };
        if let Some(remainder) = remainder {
            let query =
                (form.build)(remainder).ok_or_else(|| malformed(url, form.reject_reason))?;
            return Ok(ImplicitValueSet {
                system_version_uri: system_version_uri.to_string(),
                query,
            });
        }
    }

    Err(malformed(
        url,
        "expected a parameter such as 'fhir_vs=ecl/'",
    ))
}

fn malformed(url: &str, reason: &str) -> DefinitionError {
    DefinitionError::MalformedImplicitUrl {
        url: url.to_string(),
        reason: reason.to_string(),
    }
}
