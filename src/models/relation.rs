//! Citation relation models.

use serde::{Deserialize, Serialize};

/// Separator the citation index uses between DOIs in a relation field
pub const DOI_SEPARATOR: &str = "; ";

/// Which side of the citation graph to walk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    /// Works the seed cites (outgoing references)
    Citing,
    /// Works that cite the seed (incoming citations)
    CitedBy,
}

impl Direction {
    /// Name of the field the citation index uses for this relation
    pub fn label(&self) -> &'static str {
        match self {
            Direction::Citing => "reference",
            Direction::CitedBy => "citation",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Citing => write!(f, "citing"),
            Direction::CitedBy => write!(f, "cited-by"),
        }
    }
}

/// Ordered list of raw DOIs reported for one relation
///
/// Entries are kept exactly as the service wrote them: duplicates, the seed
/// itself and empty strings all survive and are filtered during expansion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedDoiList(Vec<String>);

impl RelatedDoiList {
    /// Build a list from already-split entries
    pub fn new(entries: Vec<String>) -> Self {
        Self(entries)
    }

    /// Split a delimited relation field
    ///
    /// A missing or blank field means the service knows of no related works.
    pub fn parse(field: Option<&str>) -> Self {
        match field {
            Some(value) if !value.trim().is_empty() => Self(
                value
                    .split(DOI_SEPARATOR)
                    .map(str::to_string)
                    .collect(),
            ),
            _ => Self::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl IntoIterator for RelatedDoiList {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl From<Vec<String>> for RelatedDoiList {
    fn from(entries: Vec<String>) -> Self {
        Self::new(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_labels() {
        assert_eq!(Direction::Citing.label(), "reference");
        assert_eq!(Direction::CitedBy.label(), "citation");
        assert_eq!(Direction::CitedBy.to_string(), "cited-by");
    }

    #[test]
    fn test_parse_keeps_raw_entries() {
        let list = RelatedDoiList::parse(Some("10.1/X; 10.1/A; ; 10.1/B"));
        let entries: Vec<&str> = list.iter().collect();
        assert_eq!(entries, vec!["10.1/X", "10.1/A", "", "10.1/B"]);
    }

    #[test]
    fn test_parse_missing_or_blank_field_is_empty() {
        assert!(RelatedDoiList::parse(None).is_empty());
        assert!(RelatedDoiList::parse(Some("")).is_empty());
        assert!(RelatedDoiList::parse(Some("   ")).is_empty());
    }

    #[test]
    fn test_parse_single_entry() {
        let list = RelatedDoiList::parse(Some("10.1000/xyz123"));
        assert_eq!(list.len(), 1);
        assert_eq!(list.iter().next(), Some("10.1000/xyz123"));
    }

    #[test]
    fn test_separator_is_literal() {
        // Only "; " separates; a bare ';' stays inside the entry
        let list = RelatedDoiList::parse(Some("10.1/a;b; 10.1/c"));
        let entries: Vec<&str> = list.iter().collect();
        assert_eq!(entries, vec!["10.1/a;b", "10.1/c"]);
    }
}
