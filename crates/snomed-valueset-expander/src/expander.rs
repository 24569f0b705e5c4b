//! ValueSet expansion orchestration.

use std::collections::HashMap;

use tracing::{info, warn};

use snomed_valueset::{
    compose_to_ecl, consistent_system_version, parse_implicit_url, resolve_language_dialects,
    ConceptId, DialectResolution, ImplicitQuery, LanguageDialect, RuleTranslator, ValueSetCompose,
};

use crate::config::ExpanderConfig;
use crate::error::{ExpansionError, ExpansionResult};
use crate::request::{ExpansionRequest, PageRequest};
use crate::result::{ExpansionEntry, ValueSetExpansion};
use crate::traits::{
    BranchPath, CodeSystemVersionResolver, ConceptDetail, ConceptDetailLookup, ConceptPage,
    ConceptSearch, ConceptSearchRequest, ReferenceSetAggregator, StoredValueSet,
    ValueSetRepository,
};

/// The ValueSet expansion engine.
///
/// Turns a value set definition, either a stored compose element or an
/// implicit URL, into one paginated, language-aware page of concepts. The
/// expander is stateless per call: it borrows its collaborators, holds no
/// caches and performs no retries, so one instance may serve concurrent
/// calls.
///
/// # Example
///
/// ```ignore
/// use snomed_valueset_expander::{ExpansionRequest, ValueSetExpander};
///
/// // Assumes the collaborator traits are implemented by your backend.
/// let expander = ValueSetExpander::new(
///     &repository, &versions, &translator, &search, &refsets, &details,
/// );
///
/// let request = ExpansionRequest::for_url("http://snomed.info/sct?fhir_vs=isa/73211009");
/// let expansion = expander.expand(&request)?;
/// println!("{} of {} concepts", expansion.count(), expansion.total);
/// ```
pub struct ValueSetExpander<'a> {
    repository: &'a dyn ValueSetRepository,
    version_resolver: &'a dyn CodeSystemVersionResolver,
    translator: &'a dyn RuleTranslator,
    search: &'a dyn ConceptSearch,
    refset_aggregator: &'a dyn ReferenceSetAggregator,
    details: &'a dyn ConceptDetailLookup,
    config: ExpanderConfig,
}

/// Where one search pass ended up: the branch it ran on, the page it
/// produced, and whether detail lookup applies to the page entries.
struct SearchOutcome {
    branch: BranchPath,
    page: ConceptPage,
    with_details: bool,
}

impl<'a> ValueSetExpander<'a> {
    /// Creates an expander with default configuration.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        repository: &'a dyn ValueSetRepository,
        version_resolver: &'a dyn CodeSystemVersionResolver,
        translator: &'a dyn RuleTranslator,
        search: &'a dyn ConceptSearch,
        refset_aggregator: &'a dyn ReferenceSetAggregator,
        details: &'a dyn ConceptDetailLookup,
    ) -> Self {
        Self::with_config(
            repository,
            version_resolver,
            translator,
            search,
            refset_aggregator,
            details,
            ExpanderConfig::default(),
        )
    }

    /// Creates an expander with custom configuration.
    #[allow(clippy::too_many_arguments)]
    pub fn with_config(
        repository: &'a dyn ValueSetRepository,
        version_resolver: &'a dyn CodeSystemVersionResolver,
        translator: &'a dyn RuleTranslator,
        search: &'a dyn ConceptSearch,
        refset_aggregator: &'a dyn ReferenceSetAggregator,
        details: &'a dyn ConceptDetailLookup,
        config: ExpanderConfig,
    ) -> Self {
        Self {
            repository,
            version_resolver,
            translator,
            search,
            refset_aggregator,
            details,
            config,
        }
    }

    /// Returns a reference to the expander configuration.
    pub fn config(&self) -> &ExpanderConfig {
        &self.config
    }

    /// Expands a value set definition into one result page.
    ///
    /// The steps run strictly in order, each consuming the previous result:
    /// target resolution, dialect resolution, paging validation, definition
    /// compilation and branch resolution, search, detail lookup, assembly.
    /// Validation failures are terminal; no partial expansion is returned.
    pub fn expand(&self, request: &ExpansionRequest) -> ExpansionResult<ValueSetExpansion> {
        // Are we expanding a specific stored value set?
        let mut stored: Option<StoredValueSet> = None;
        let mut url = request.url.clone();
        if let Some(id) = request.value_set_id.as_deref() {
            info!(id = %id, "expanding stored value set");
            let vs = self
                .repository
                .find_by_id(id)?
                .ok_or_else(|| ExpansionError::NotFound(format!("ValueSet '{id}'")))?;
            // Expanding both the stored URL and a request URL is ambiguous.
            if let (Some(stored_url), Some(request_url)) = (vs.url.as_deref(), url.as_deref()) {
                return Err(ExpansionError::ConflictingDefinition {
                    stored_url: stored_url.to_string(),
                    request_url: request_url.to_string(),
                    id: id.to_string(),
                });
            }
            if url.is_none() {
                url = vs.url.clone();
            }
            stored = Some(vs);
        }

        let DialectResolution {
            dialects,
            include_designations,
        } = resolve_language_dialects(
            request.designations.as_deref(),
            request.display_language.as_deref(),
            request.include_designations,
            &self.config.default_dialects,
        );
        // The preferred term is always needed, so term lookups never run
        // with an empty dialect list.
        let term_dialects: &[LanguageDialect] = if dialects.is_empty() {
            &self.config.default_dialects
        } else {
            &dialects
        };

        let page = PageRequest::parse(
            request.offset.as_deref(),
            request.count.as_deref(),
            self.config.default_page_size,
        )?;

        let outcome = match url.as_deref() {
            // The code system is the URL up to where the parameters start,
            // eg http://snomed.info/sct?fhir_vs=ecl/ or
            // http://snomed.info/sct/45991000052106?fhir_vs=ecl/
            Some(url) if url.contains('?') => {
                self.implicit_expansion(url, request, term_dialects, page)?
            }
            _ => {
                let compose = stored
                    .as_ref()
                    .and_then(|vs| vs.compose.as_ref())
                    .filter(|compose| !compose.is_empty());
                match compose {
                    Some(compose) => {
                        self.explicit_expansion(compose, request, term_dialects, page)?
                    }
                    // A named value set without a compose is not an error:
                    // it simply has no matches.
                    None => match stored.as_ref() {
                        Some(vs) => {
                            warn!(
                                id = %vs.id,
                                "no compose element or 'url' parameter present, returning empty expansion"
                            );
                            return Ok(ValueSetExpansion::empty(page.offset));
                        }
                        None => return Err(ExpansionError::NotExpandable),
                    },
                }
            }
        };

        let details = if outcome.with_details && !outcome.page.concept_ids.is_empty() {
            self.details
                .find_details(&outcome.branch, &outcome.page.concept_ids, term_dialects)?
        } else {
            Vec::new()
        };
        let detail_map: HashMap<&ConceptId, &ConceptDetail> =
            details.iter().map(|d| (&d.concept_id, d)).collect();

        let attach_designations = outcome.with_details && include_designations;
        let entries = outcome
            .page
            .concept_ids
            .iter()
            .map(|concept_id| {
                let detail = detail_map.get(concept_id).copied();
                ExpansionEntry {
                    concept_id: concept_id.clone(),
                    display: detail.and_then(|d| best_display(d, term_dialects)),
                    designations: attach_designations
                        .then(|| detail.map(|d| d.designations.clone()).unwrap_or_default()),
                }
            })
            .collect();

        Ok(ValueSetExpansion {
            total: outcome.page.total,
            offset: page.offset,
            entries,
        })
    }

    /// Expands a stored compose element: validate system/version
    /// consistency, resolve the branch, compile to ECL, search.
    fn explicit_expansion(
        &self,
        compose: &ValueSetCompose,
        request: &ExpansionRequest,
        dialects: &[LanguageDialect],
        page: PageRequest,
    ) -> ExpansionResult<SearchOutcome> {
        let version_uri = consistent_system_version(compose)?;
        let branch = self.resolve_branch(&version_uri)?;
        let ecl = compose_to_ecl(compose, self.translator)?;
        let concept_page = self.ecl_search(&branch, &ecl, request, dialects, page)?;
        info!(
            count = concept_page.concept_ids.len(),
            branch = %branch,
            ecl = %ecl,
            "recovered concepts from compose",
        );
        Ok(SearchOutcome {
            branch,
            page: concept_page,
            with_details: true,
        })
    }

    /// Expands an implicit value set URL: interpret the URL, resolve the
    /// branch, then either search the encoded ECL or enumerate all
    /// reference sets.
    fn implicit_expansion(
        &self,
        url: &str,
        request: &ExpansionRequest,
        dialects: &[LanguageDialect],
        page: PageRequest,
    ) -> ExpansionResult<SearchOutcome> {
        let implicit = parse_implicit_url(url)?;
        let branch = self.resolve_branch(&implicit.system_version_uri)?;
        match implicit.query {
            ImplicitQuery::Ecl(ecl) => {
                let concept_page = self.ecl_search(&branch, &ecl, request, dialects, page)?;
                info!(
                    count = concept_page.concept_ids.len(),
                    branch = %branch,
                    ecl = %ecl,
                    "recovered concepts from implicit url",
                );
                Ok(SearchOutcome {
                    branch,
                    page: concept_page,
                    with_details: true,
                })
            }
            ImplicitQuery::AllReferenceSets => {
                let page = self.all_refsets_page(&branch, page)?;
                Ok(SearchOutcome {
                    branch,
                    page,
                    // Reference set entries carry no display term.
                    with_details: false,
                })
            }
        }
    }

    /// One entry per reference set with active members; total counts the
    /// distinct reference sets, not their members.
    fn all_refsets_page(&self, branch: &BranchPath, page: PageRequest) -> ExpansionResult<ConceptPage> {
        let refsets = self.refset_aggregator.active_member_counts_by_refset(branch)?;
        let total = refsets.len() as u64;
        let concept_ids = refsets
            .into_iter()
            .map(|(refset_id, _member_count)| refset_id)
            .skip(page.offset)
            .take(page.limit)
            .collect();
        Ok(ConceptPage { concept_ids, total })
    }

    fn resolve_branch(&self, version_uri: &str) -> ExpansionResult<BranchPath> {
        self.version_resolver
            .branch_for_version(version_uri)?
            .ok_or_else(|| {
                ExpansionError::NotFound(format!("code system version '{version_uri}'"))
            })
    }

    fn ecl_search(
        &self,
        branch: &BranchPath,
        ecl: &str,
        request: &ExpansionRequest,
        dialects: &[LanguageDialect],
        page: PageRequest,
    ) -> ExpansionResult<ConceptPage> {
        let search_request = ConceptSearchRequest {
            ecl: ecl.to_string(),
            active_only: request.active_only,
            term_filter: request.filter.clone(),
            dialects: dialects.to_vec(),
            offset: page.offset,
            limit: page.limit,
        };
        self.search.search(branch, &search_request)
    }
}

/// Picks the display term for one concept: the first dialect in preference
/// order with a preferred term wins; failing that, any remaining preferred
/// term the detail source returned; failing that, no display.
fn best_display(detail: &ConceptDetail, dialects: &[LanguageDialect]) -> Option<String> {
    for dialect in dialects {
        if let Some(term) = detail.preferred_term_in(dialect) {
            return Some(term.to_string());
        }
    }
    detail.preferred_terms.first().map(|t| t.term.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::DialectTerm;

    fn detail(terms: &[(LanguageDialect, &str)]) -> ConceptDetail {
        ConceptDetail {
            concept_id: "73211009".to_string(),
            preferred_terms: terms
                .iter()
                .map(|(dialect, term)| DialectTerm {
                    dialect: dialect.clone(),
                    term: term.to_string(),
                })
                .collect(),
            designations: vec![],
        }
    }

    #[test]
    fn test_best_display_prefers_dialect_order() {
        let sv = LanguageDialect::new("sv");
        let en = LanguageDialect::new("en");
        let d = detail(&[(en.clone(), "Diabetes mellitus"), (sv.clone(), "Diabetes")]);

        let display = best_display(&d, &[sv, en]);
        assert_eq!(display.as_deref(), Some("Diabetes"));
    }

    #[test]
    fn test_best_display_falls_back_to_any_returned_term() {
        let sv = LanguageDialect::new("sv");
        let en = LanguageDialect::new("en");
        let d = detail(&[(en, "Diabetes mellitus")]);

        let display = best_display(&d, &[sv]);
        assert_eq!(display.as_deref(), Some("Diabetes mellitus"));
    }

    #[test]
    fn test_best_display_none_when_no_terms() {
        let d = detail(&[]);
        assert_eq!(best_display(&d, &[LanguageDialect::new("en")]), None);
    }
}
