//! Expansion result types.

use snomed_valueset::ConceptId;

use crate::traits::Designation;

/// One page of an expanded value set.
///
/// `total` counts every match of the definition, independent of the page
/// size; `entries` holds only the requested page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValueSetExpansion {
    /// Total number of matching concepts.
    pub total: u64,
    /// The requested offset, echoed back.
    pub offset: usize,
    /// Entries on this page, in result order.
    pub entries: Vec<ExpansionEntry>,
}

impl ValueSetExpansion {
    /// Creates an empty expansion echoing the requested offset.
    pub fn empty(offset: usize) -> Self {
        Self {
            total: 0,
            offset,
            entries: Vec::new(),
        }
    }

    /// Returns the number of entries on this page.
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if this page carries no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One concept in an expansion page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExpansionEntry {
    /// The concept identifier.
    pub concept_id: ConceptId,
    /// Best-match display term, if one was found in the requested dialects.
    #[cfg_attr(feature = "serde", serde(default))]
    pub display: Option<String>,
    /// Full designation list, present only when designations were requested.
    #[cfg_attr(feature = "serde", serde(default))]
    pub designations: Option<Vec<Designation>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_expansion_echoes_offset() {
        let expansion = ValueSetExpansion::empty(40);
        assert_eq!(expansion.total, 0);
        assert_eq!(expansion.offset, 40);
        assert!(expansion.is_empty());
        assert_eq!(expansion.count(), 0);
    }

    #[test]
    fn test_total_is_independent_of_page() {
        let expansion = ValueSetExpansion {
            total: 12345,
            offset: 0,
            entries: vec![ExpansionEntry {
                concept_id: "73211009".to_string(),
                display: Some("Diabetes mellitus".to_string()),
                designations: None,
            }],
        };
        assert_eq!(expansion.count(), 1);
        assert_eq!(expansion.total, 12345);
    }
}
