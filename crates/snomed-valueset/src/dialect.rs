//! Language and dialect handling for display terms and designations.
//!
//! A dialect is a language code plus an optional language reference set
//! that selects which synonym is preferred in that context, written
//! `en-x-900000000000509007` in request parameters. The shorthands `en-us`
//! and `en-gb` resolve to the US and GB English language reference sets.

use crate::ConceptId;

/// US English language reference set.
pub const US_ENGLISH_LANGUAGE_REFSET: &str = "900000000000509007";

/// GB English language reference set.
pub const GB_ENGLISH_LANGUAGE_REFSET: &str = "900000000000508004";

/// A language code with an optional language reference set qualifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LanguageDialect {
    /// ISO language code, e.g. `en`.
    pub language_code: String,
    /// Language reference set selecting preferred terms, if any.
    #[cfg_attr(feature = "serde", serde(default))]
    pub language_refset: Option<ConceptId>,
}

impl LanguageDialect {
    /// Creates a dialect with a bare language code.
    pub fn new(language_code: impl Into<String>) -> Self {
        Self {
            language_code: language_code.into(),
            language_refset: None,
        }
    }

    /// Creates a dialect qualified by a language reference set.
    pub fn with_refset(language_code: impl Into<String>, refset: impl Into<ConceptId>) -> Self {
        Self {
            language_code: language_code.into(),
            language_refset: Some(refset.into()),
        }
    }

    /// Parses a dialect string.
    ///
    /// Accepts a bare language code (`en`), the extension form
    /// `en-x-900000000000509007`, and the `en-us` / `en-gb` shorthands.
    /// Anything else is kept as a bare language code.
    pub fn parse(dialect: &str) -> Self {
        if let Some((language, refset)) = dialect.split_once("-x-") {
            if !refset.is_empty() {
                return Self::with_refset(language, refset);
            }
            return Self::new(language);
        }
        match dialect.to_ascii_lowercase().as_str() {
            "en-us" => Self::with_refset("en", US_ENGLISH_LANGUAGE_REFSET),
            "en-gb" => Self::with_refset("en", GB_ENGLISH_LANGUAGE_REFSET),
            _ => Self::new(dialect),
        }
    }
}

/// Outcome of resolving request language parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialectResolution {
    /// Dialects in preference order, unique by language code.
    pub dialects: Vec<LanguageDialect>,
    /// Whether designations should be attached to expansion entries.
    pub include_designations: bool,
}

/// Resolves the requested designation languages and display language into an
/// ordered dialect preference list.
///
/// `designations` distinguishes a parameter that was never present (`None`)
/// from one present with no values (`Some(&[])`): with no explicit
/// `include_designations` flag, the former resolves to `false` and the
/// latter to `true`. When designations end up included but no dialect was
/// requested, the configured `defaults` fill the list.
pub fn resolve_language_dialects(
    designations: Option<&[String]>,
    display_language: Option<&str>,
    include_designations: Option<bool>,
    defaults: &[LanguageDialect],
) -> DialectResolution {
    let mut dialects: Vec<LanguageDialect> = Vec::new();
    for designation in designations.unwrap_or_default() {
        let dialect = LanguageDialect::parse(designation);
        if !contains_language(&dialects, &dialect.language_code) {
            dialects.push(dialect);
        }
    }

    if let Some(display_language) = display_language {
        let dialect = LanguageDialect::parse(display_language);
        if !contains_language(&dialects, &dialect.language_code) {
            dialects.push(dialect);
        }
    }

    let include_designations = match include_designations {
        Some(explicit) => explicit,
        None => designations.is_some(),
    };

    if include_designations && dialects.is_empty() {
        dialects.extend(defaults.iter().cloned());
    }

    DialectResolution {
        dialects,
        include_designations,
    }
}

fn contains_language(dialects: &[LanguageDialect], language_code: &str) -> bool {
    dialects.iter().any(|d| d.language_code == language_code)
}
