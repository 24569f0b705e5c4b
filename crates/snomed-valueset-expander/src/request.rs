//! Normalized expansion request parameters.

use crate::config::DEFAULT_PAGE_SIZE;
use crate::error::{ExpansionError, ExpansionResult};

/// Normalized parameters of one `$expand` call.
///
/// Offset and count stay in their raw string form as received from the
/// transport layer; [`PageRequest::parse`] validates and defaults them.
/// The `designations` field keeps the tri-state of the wire parameter:
/// `None` means the parameter was never present, `Some(vec![])` means it
/// was present without values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExpansionRequest {
    /// Identifier of a stored value set to expand, if any.
    #[cfg_attr(feature = "serde", serde(default))]
    pub value_set_id: Option<String>,
    /// Value set URL supplied with the request.
    #[cfg_attr(feature = "serde", serde(default))]
    pub url: Option<String>,
    /// Free-text filter over description terms.
    #[cfg_attr(feature = "serde", serde(default))]
    pub filter: Option<String>,
    /// Restrict results by concept active state.
    #[cfg_attr(feature = "serde", serde(default))]
    pub active_only: Option<bool>,
    /// Explicit include-designations flag, if supplied.
    #[cfg_attr(feature = "serde", serde(default))]
    pub include_designations: Option<bool>,
    /// Requested designation dialects, in preference order.
    #[cfg_attr(feature = "serde", serde(default))]
    pub designations: Option<Vec<String>>,
    /// Display language for entry display terms.
    #[cfg_attr(feature = "serde", serde(default))]
    pub display_language: Option<String>,
    /// Raw offset parameter.
    #[cfg_attr(feature = "serde", serde(default))]
    pub offset: Option<String>,
    /// Raw count parameter.
    #[cfg_attr(feature = "serde", serde(default))]
    pub count: Option<String>,
}

impl ExpansionRequest {
    /// Creates a request expanding a stored value set by id.
    pub fn for_instance(id: impl Into<String>) -> Self {
        Self {
            value_set_id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Creates a request expanding a value set URL.
    pub fn for_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    /// Sets the free-text filter.
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Sets the active-only flag.
    pub fn with_active_only(mut self, active_only: bool) -> Self {
        self.active_only = Some(active_only);
        self
    }

    /// Sets the include-designations flag.
    pub fn with_include_designations(mut self, include: bool) -> Self {
        self.include_designations = Some(include);
        self
    }

    /// Sets the designation dialect list.
    pub fn with_designations<I, S>(mut self, designations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.designations = Some(designations.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the display language.
    pub fn with_display_language(mut self, language: impl Into<String>) -> Self {
        self.display_language = Some(language.into());
        self
    }

    /// Sets the raw offset parameter.
    pub fn with_offset(mut self, offset: impl Into<String>) -> Self {
        self.offset = Some(offset.into());
        self
    }

    /// Sets the raw count parameter.
    pub fn with_count(mut self, count: impl Into<String>) -> Self {
        self.count = Some(count.into());
        self
    }
}

/// A validated offset/page-size pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Number of matches to skip.
    pub offset: usize,
    /// Page size, always greater than zero.
    pub limit: usize,
}

impl PageRequest {
    /// Parses raw offset and count parameters.
    ///
    /// Absent or empty parameters take the defaults (offset 0, the given
    /// page size). Non-numeric values and a zero count are rejected with
    /// [`ExpansionError::BadParameter`].
    pub fn parse(
        offset: Option<&str>,
        count: Option<&str>,
        default_page_size: usize,
    ) -> ExpansionResult<Self> {
        let offset = match offset.filter(|s| !s.is_empty()) {
            None => 0,
            Some(raw) => raw.parse::<usize>().map_err(|_| {
                ExpansionError::BadParameter(format!("offset '{raw}' is not a whole number"))
            })?,
        };

        let limit = match count.filter(|s| !s.is_empty()) {
            None => default_page_size,
            Some(raw) => {
                let limit = raw.parse::<usize>().map_err(|_| {
                    ExpansionError::BadParameter(format!("count '{raw}' is not a whole number"))
                })?;
                if limit == 0 {
                    return Err(ExpansionError::BadParameter(
                        "count must be greater than zero".to_string(),
                    ));
                }
                limit
            }
        };

        Ok(Self { offset, limit })
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_parameters_take_defaults() {
        let page = PageRequest::parse(None, None, 1000).unwrap();
        assert_eq!(page, PageRequest { offset: 0, limit: 1000 });
    }

    #[test]
    fn test_empty_strings_count_as_absent() {
        let page = PageRequest::parse(Some(""), Some(""), 1000).unwrap();
        assert_eq!(page, PageRequest { offset: 0, limit: 1000 });
    }

    #[test]
    fn test_valid_parameters() {
        let page = PageRequest::parse(Some("20"), Some("10"), 1000).unwrap();
        assert_eq!(page, PageRequest { offset: 20, limit: 10 });
    }

    #[test]
    fn test_non_numeric_count_is_bad_parameter() {
        let err = PageRequest::parse(None, Some("ten"), 1000).unwrap_err();
        assert!(matches!(err, ExpansionError::BadParameter(_)));
    }

    #[test]
    fn test_negative_offset_is_bad_parameter() {
        let err = PageRequest::parse(Some("-1"), None, 1000).unwrap_err();
        assert!(matches!(err, ExpansionError::BadParameter(_)));
    }

    #[test]
    fn test_zero_count_is_bad_parameter() {
        let err = PageRequest::parse(None, Some("0"), 1000).unwrap_err();
        assert!(matches!(err, ExpansionError::BadParameter(_)));
    }

    #[test]
    fn test_request_builders() {
        let request = ExpansionRequest::for_instance("vs-1")
            .with_filter("diab")
            .with_active_only(true)
            .with_designations(["en-x-900000000000509007"])
            .with_display_language("en")
            .with_offset("0")
            .with_count("100");

        assert_eq!(request.value_set_id.as_deref(), Some("vs-1"));
        assert!(request.url.is_none());
        assert_eq!(request.filter.as_deref(), Some("diab"));
        assert_eq!(request.active_only, Some(true));
        assert_eq!(request.designations.as_deref().map(|d| d.len()), Some(1));
    }
}
