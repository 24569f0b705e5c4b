//! Configuration for the ValueSet expander.

use snomed_valueset::{LanguageDialect, US_ENGLISH_LANGUAGE_REFSET};

/// Default number of entries per expansion page.
pub const DEFAULT_PAGE_SIZE: usize = 1000;

/// Configuration for [`ValueSetExpander`](crate::ValueSetExpander).
///
/// # Example
///
/// ```rust
/// use snomed_valueset_expander::ExpanderConfig;
/// use snomed_valueset::LanguageDialect;
///
/// let config = ExpanderConfig::builder()
///     .with_default_page_size(100)
///     .with_default_dialects(vec![LanguageDialect::new("sv"), LanguageDialect::new("en")])
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct ExpanderConfig {
    /// Page size applied when the request does not supply a count.
    pub default_page_size: usize,
    /// Dialects used when designations are included but none were requested,
    /// and as the last display-term fallback.
    pub default_dialects: Vec<LanguageDialect>,
}

impl Default for ExpanderConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            default_dialects: default_language_dialects(),
        }
    }
}

impl ExpanderConfig {
    /// Creates a new builder for ExpanderConfig.
    pub fn builder() -> ExpanderConfigBuilder {
        ExpanderConfigBuilder::default()
    }
}

/// The process-wide default dialect set: US English preferred terms first,
/// then any English description.
pub fn default_language_dialects() -> Vec<LanguageDialect> {
    vec![
        LanguageDialect::with_refset("en", US_ENGLISH_LANGUAGE_REFSET),
        LanguageDialect::new("en"),
    ]
}

/// Builder for ExpanderConfig.
#[derive(Debug, Clone, Default)]
pub struct ExpanderConfigBuilder {
    default_page_size: Option<usize>,
    default_dialects: Option<Vec<LanguageDialect>>,
}

impl ExpanderConfigBuilder {
    /// Sets the page size used when the request supplies no count.
    pub fn with_default_page_size(mut self, page_size: usize) -> Self {
        self.default_page_size = Some(page_size);
        self
    }

    /// Sets the default dialect set.
    pub fn with_default_dialects(mut self, dialects: Vec<LanguageDialect>) -> Self {
        self.default_dialects = Some(dialects);
        self
    }

    /// Builds the ExpanderConfig.
    pub fn build(self) -> ExpanderConfig {
        ExpanderConfig {
            default_page_size: self.default_page_size.unwrap_or(DEFAULT_PAGE_SIZE),
            default_dialects: self.default_dialects.unwrap_or_else(default_language_dialects),
        }
    }
}
