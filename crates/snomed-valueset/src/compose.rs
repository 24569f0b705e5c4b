//! ValueSet compose model and compilation to ECL.
//!
//! A compose element defines a concept set declaratively as an ordered list
//! of include rules and an ordered list of exclude rules. This module
//! compiles a compose into a single ECL expression and validates that all
//! rules agree on one code system and version.
//!
//! Rule criteria (`concepts`, `filters`) are opaque to this crate: a
//! [`RuleTranslator`] implementation owns the translation of one rule into
//! an ECL fragment.

use crate::error::{DefinitionError, DefinitionResult};
use crate::{ConceptId, SNOMED_CT_URI};

/// The compose element of a ValueSet: ordered include and exclude rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValueSetCompose {
    /// Rules whose concepts are included, in definition order.
    #[cfg_attr(feature = "serde", serde(default))]
    pub include: Vec<ConceptSetRule>,

    /// Rules whose concepts are excluded, in definition order.
    #[cfg_attr(feature = "serde", serde(default))]
    pub exclude: Vec<ConceptSetRule>,
}

impl ValueSetCompose {
    /// Returns true if the compose has no rules at all.
    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }

    /// Iterates include rules then exclude rules, in definition order.
    pub fn all_rules(&self) -> impl Iterator<Item = &ConceptSetRule> {
        self.include.iter().chain(self.exclude.iter())
    }
}

/// One include or exclude rule of a compose element.
///
/// `system` and `version` scope the rule to a code system release. The
/// `concepts` and `filters` payload is carried verbatim to the
/// [`RuleTranslator`]; this crate never interprets it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConceptSetRule {
    /// Code system URI, e.g. `http://snomed.info/sct`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub system: Option<String>,

    /// Code system version URI segment.
    #[cfg_attr(feature = "serde", serde(default))]
    pub version: Option<String>,

    /// Explicitly listed concepts.
    #[cfg_attr(feature = "serde", serde(default))]
    pub concepts: Vec<ConceptId>,

    /// Property filters, e.g. `constraint = << 404684003`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub filters: Vec<RuleFilter>,
}

impl ConceptSetRule {
    /// Creates a SNOMED CT rule listing the given concepts.
    pub fn for_concepts<I, S>(concepts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ConceptId>,
    {
        Self {
            system: Some(SNOMED_CT_URI.to_string()),
            concepts: concepts.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Sets the code system version.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Adds a property filter.
    pub fn with_filter(mut self, filter: RuleFilter) -> Self {
        self.filters.push(filter);
        self
    }
}

/// A property filter within a compose rule.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RuleFilter {
    /// Filtered property name, e.g. `constraint` or `concept`.
    pub property: String,
    /// Filter operator, e.g. `=` or `is-a`.
    pub op: String,
    /// Filter value.
    pub value: String,
}

/// Translates one compose rule into an ECL fragment.
///
/// This is a capability trait for the concept-set rule language, which is
/// outside this crate's scope. Translation must be a pure function of the
/// rule content: the same rule always yields the same fragment.
pub trait RuleTranslator: Send + Sync {
    /// Translates a single include or exclude rule into an ECL fragment.
    fn rule_to_ecl(&self, rule: &ConceptSetRule) -> DefinitionResult<String>;
}

/// Compiles a compose element into a single ECL expression.
///
/// Successive include rules are joined with `OR`; every exclude rule appends
/// a `MINUS` clause. Rule order is preserved, so two semantically equivalent
/// composes with different rule order compile to different literal
/// expressions.
///
/// # Errors
///
/// [`DefinitionError::InvalidComposition`] when there is nothing to include,
/// or any error the translator raises for an individual rule.
pub fn compose_to_ecl(
    compose: &ValueSetCompose,
    translator: &dyn RuleTranslator,
) -> DefinitionResult<String> {
    // We need something to minus!
    if compose.include.is_empty() {
        return Err(DefinitionError::InvalidComposition);
    }

    let mut ecl = String::new();
    for (i, include) in compose.include.iter().enumerate() {
        if i > 0 {
            ecl.push_str(" OR ");
        }
        ecl.push_str("( ");
        ecl.push_str(&translator.rule_to_ecl(include)?);
        ecl.push_str(" )");
    }

    for exclude in &compose.exclude {
        ecl.push_str(" MINUS ( ");
        ecl.push_str(&translator.rule_to_ecl(exclude)?);
        ecl.push_str(" )");
    }

    Ok(ecl)
}

/// Validates code system and version consistency across a compose element
/// and returns the `<system>/<version>` URI for branch resolution.
///
/// Walks include rules then exclude rules, holding the first non-null system
/// and version seen. Every rule system must belong to SNOMED CT, and no rule
/// may contradict an already-seen system or version. Absent sides contribute
/// an empty string to the returned URI.
pub fn consistent_system_version(compose: &ValueSetCompose) -> DefinitionResult<String> {
    let mut system: Option<&str> = None;
    let mut version: Option<&str> = None;

    for rule in compose.all_rules() {
        if let Some(rule_system) = rule.system.as_deref() {
            if !rule_system.starts_with(SNOMED_CT_URI) {
                return Err(DefinitionError::UnsupportedSystem {
                    system: rule_system.to_string(),
                });
            }
            match system {
                None => system = Some(rule_system),
                Some(first) if first != rule_system => {
                    return Err(DefinitionError::InconsistentSystem {
                        first: first.to_string(),
                        other: rule_system.to_string(),
                    });
                }
                Some(_) => {}
            }
        }
        if let Some(rule_version) = rule.version.as_deref() {
            match version {
                None => version = Some(rule_version),
                Some(first) if first != rule_version => {
                    return Err(DefinitionError::InconsistentVersion {
                        first: first.to_string(),
                        other: rule_version.to_string(),
                    });
                }
                Some(_) => {}
            }
        }
    }

    Ok(format!(
        "{}/{}",
        system.unwrap_or_default(),
        version.unwrap_or_default()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Translator that joins a rule's listed concepts with OR.
    struct ConceptListTranslator;

    impl RuleTranslator for ConceptListTranslator {
        fn rule_to_ecl(&self, rule: &ConceptSetRule) -> DefinitionResult<String> {
            if rule.concepts.is_empty() {
                return Err(DefinitionError::Translation(
                    "rule has no concepts".to_string(),
                ));
            }
            Ok(rule.concepts.join(" OR "))
        }
    }

    fn sct_rule(concept: &str) -> ConceptSetRule {
        ConceptSetRule::for_concepts([concept])
    }

    #[test]
    fn test_single_include() {
        let compose = ValueSetCompose {
            include: vec![sct_rule("<<404684003")],
            exclude: vec![],
        };
        let ecl = compose_to_ecl(&compose, &ConceptListTranslator).unwrap();
        assert_eq!(ecl, "( <<404684003 )");
        assert!(!ecl.contains("MINUS"));
    }

    #[test]
    fn test_includes_joined_with_or() {
        let compose = ValueSetCompose {
            include: vec![sct_rule("<<404684003"), sct_rule("<<123037004")],
            exclude: vec![],
        };
        let ecl = compose_to_ecl(&compose, &ConceptListTranslator).unwrap();
        assert_eq!(ecl, "( <<404684003 ) OR ( <<123037004 )");
    }

    #[test]
    fn test_exclude_appends_exactly_one_minus_clause() {
        let mut compose = ValueSetCompose {
            include: vec![sct_rule("<<404684003")],
            exclude: vec![],
        };
        let without_exclude = compose_to_ecl(&compose, &ConceptListTranslator).unwrap();

        compose.exclude.push(sct_rule("<<272379006"));
        let with_exclude = compose_to_ecl(&compose, &ConceptListTranslator).unwrap();

        assert_eq!(
            with_exclude,
            format!("{} MINUS ( <<272379006 )", without_exclude)
        );
        assert_eq!(with_exclude.matches("MINUS").count(), 1);
    }

    #[test]
    fn test_exclude_without_include_fails() {
        let compose = ValueSetCompose {
            include: vec![],
            exclude: vec![sct_rule("<<272379006")],
        };
        let err = compose_to_ecl(&compose, &ConceptListTranslator).unwrap_err();
        assert_eq!(err, DefinitionError::InvalidComposition);
    }

    #[test]
    fn test_rule_order_changes_expression() {
        let forward = ValueSetCompose {
            include: vec![sct_rule("<<404684003"), sct_rule("<<123037004")],
            exclude: vec![],
        };
        let reversed = ValueSetCompose {
            include: vec![sct_rule("<<123037004"), sct_rule("<<404684003")],
            exclude: vec![],
        };
        assert_ne!(
            compose_to_ecl(&forward, &ConceptListTranslator).unwrap(),
            compose_to_ecl(&reversed, &ConceptListTranslator).unwrap()
        );
    }

    #[test]
    fn test_filters_reach_the_translator() {
        struct ConstraintFilterTranslator;

        impl RuleTranslator for ConstraintFilterTranslator {
            fn rule_to_ecl(&self, rule: &ConceptSetRule) -> DefinitionResult<String> {
                rule.filters
                    .iter()
                    .find(|f| f.property == "constraint")
                    .map(|f| f.value.clone())
                    .ok_or_else(|| {
                        DefinitionError::Translation("no constraint filter".to_string())
                    })
            }
        }

        let compose = ValueSetCompose {
            include: vec![ConceptSetRule::default().with_filter(RuleFilter {
                property: "constraint".to_string(),
                op: "=".to_string(),
                value: "<< 404684003".to_string(),
            })],
            exclude: vec![],
        };
        let ecl = compose_to_ecl(&compose, &ConstraintFilterTranslator).unwrap();
        assert_eq!(ecl, "( << 404684003 )");
    }

    #[test]
    fn test_translator_error_propagates() {
        let compose = ValueSetCompose {
            include: vec![ConceptSetRule::default()],
            exclude: vec![],
        };
        let err = compose_to_ecl(&compose, &ConceptListTranslator).unwrap_err();
        assert!(matches!(err, DefinitionError::Translation(_)));
    }

    #[test]
    fn test_consistent_system_version() {
        let compose = ValueSetCompose {
            include: vec![sct_rule("<<404684003").with_version("20210131")],
            exclude: vec![sct_rule("<<272379006")],
        };
        let uri = consistent_system_version(&compose).unwrap();
        assert_eq!(uri, "http://snomed.info/sct/20210131");
    }

    #[test]
    fn test_absent_system_and_version_yield_empty_sides() {
        let compose = ValueSetCompose {
            include: vec![ConceptSetRule {
                concepts: vec!["404684003".to_string()],
                ..ConceptSetRule::default()
            }],
            exclude: vec![],
        };
        assert_eq!(consistent_system_version(&compose).unwrap(), "/");
    }

    #[test]
    fn test_unsupported_system() {
        let compose = ValueSetCompose {
            include: vec![ConceptSetRule {
                system: Some("http://loinc.org".to_string()),
                ..ConceptSetRule::default()
            }],
            exclude: vec![],
        };
        let err = consistent_system_version(&compose).unwrap_err();
        assert!(matches!(err, DefinitionError::UnsupportedSystem { system } if system == "http://loinc.org"));
    }

    #[test]
    fn test_module_qualified_system_is_supported() {
        let compose = ValueSetCompose {
            include: vec![ConceptSetRule {
                system: Some("http://snomed.info/sct/45991000052106".to_string()),
                ..ConceptSetRule::default()
            }],
            exclude: vec![],
        };
        assert!(consistent_system_version(&compose).is_ok());
    }

    #[test]
    fn test_inconsistent_system_regardless_of_rule_order() {
        let plain = ConceptSetRule {
            system: Some(SNOMED_CT_URI.to_string()),
            ..ConceptSetRule::default()
        };
        let qualified = ConceptSetRule {
            system: Some("http://snomed.info/sct/45991000052106".to_string()),
            ..ConceptSetRule::default()
        };

        for (first, second) in [(plain.clone(), qualified.clone()), (qualified, plain)] {
            let compose = ValueSetCompose {
                include: vec![first, second],
                exclude: vec![],
            };
            let err = consistent_system_version(&compose).unwrap_err();
            assert!(matches!(err, DefinitionError::InconsistentSystem { .. }));
        }
    }

    #[test]
    fn test_inconsistent_version_across_include_and_exclude() {
        let compose = ValueSetCompose {
            include: vec![sct_rule("404684003").with_version("20200731")],
            exclude: vec![sct_rule("272379006").with_version("20210131")],
        };
        let err = consistent_system_version(&compose).unwrap_err();
        assert!(
            matches!(err, DefinitionError::InconsistentVersion { first, other }
                if first == "20200731" && other == "20210131")
        );
    }

    #[test]
    fn test_rules_with_null_system_do_not_conflict() {
        let compose = ValueSetCompose {
            include: vec![
                sct_rule("404684003"),
                ConceptSetRule {
                    concepts: vec!["272379006".to_string()],
                    ..ConceptSetRule::default()
                },
            ],
            exclude: vec![],
        };
        let uri = consistent_system_version(&compose).unwrap();
        assert_eq!(uri, format!("{}/", SNOMED_CT_URI));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_compose_deserializes_with_defaults() {
        let compose: ValueSetCompose = serde_json::from_str(
            r#"{"include": [{"system": "http://snomed.info/sct", "concepts": ["404684003"]}]}"#,
        )
        .unwrap();
        assert_eq!(compose.include.len(), 1);
        assert!(compose.exclude.is_empty());
    }
}
