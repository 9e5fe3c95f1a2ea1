//! Paper model representing a resolved bibliographic record.

use serde::{Deserialize, Serialize};

/// The service a paper's metadata came from
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    CrossRef,
    #[serde(untagged)]
    Other(String),
}

impl SourceType {
    /// Returns the display name of the source
    pub fn name(&self) -> &str {
        match self {
            SourceType::CrossRef => "CrossRef",
            SourceType::Other(s) => s,
        }
    }

    /// Returns the source identifier
    pub fn id(&self) -> &str {
        match self {
            SourceType::CrossRef => "crossref",
            SourceType::Other(s) => s,
        }
    }
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A bibliographic record produced by a DOI lookup
///
/// Records are opaque to the relation pipeline apart from their DOI; every
/// other field is filled in by whichever [`DoiFetcher`](crate::sources::DoiFetcher)
/// produced the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paper {
    /// Unique identifier (the DOI for CrossRef records)
    pub paper_id: String,

    /// Paper title
    pub title: String,

    /// Authors (semicolon-separated)
    pub authors: String,

    /// Abstract text
    pub r#abstract: String,

    /// Digital Object Identifier
    pub doi: Option<String>,

    /// Publication date (ISO-like, as precise as the source allows)
    pub published_date: Option<String>,

    /// Journal, proceedings or book title
    pub venue: Option<String>,

    /// Paper page URL
    pub url: String,

    /// Source the metadata came from
    pub source: SourceType,

    /// Number of works citing this one, when the source reports it
    pub citations: Option<u32>,
}

impl Paper {
    /// Create a new paper with required fields
    pub fn new(paper_id: String, title: String, url: String, source: SourceType) -> Self {
        Self {
            paper_id,
            title,
            authors: String::new(),
            r#abstract: String::new(),
            doi: None,
            published_date: None,
            venue: None,
            url,
            source,
            citations: None,
        }
    }

    /// Returns the primary identifier for this paper (DOI if available, else paper_id)
    pub fn primary_id(&self) -> &str {
        self.doi.as_ref().unwrap_or(&self.paper_id)
    }
}

/// Builder for constructing Paper objects
#[derive(Debug, Clone)]
pub struct PaperBuilder {
    paper: Paper,
}

impl PaperBuilder {
    /// Create a new builder with required fields
    pub fn new(
        paper_id: impl Into<String>,
        title: impl Into<String>,
        url: impl Into<String>,
        source: SourceType,
    ) -> Self {
        Self {
            paper: Paper::new(paper_id.into(), title.into(), url.into(), source),
        }
    }

    /// Set authors
    pub fn authors(mut self, authors: impl Into<String>) -> Self {
        self.paper.authors = authors.into();
        self
    }

    /// Set abstract
    pub fn abstract_text(mut self, abstract_text: impl Into<String>) -> Self {
        self.paper.r#abstract = abstract_text.into();
        self
    }

    /// Set DOI
    pub fn doi(mut self, doi: impl Into<String>) -> Self {
        self.paper.doi = Some(doi.into());
        self
    }

    /// Set publication date
    pub fn published_date(mut self, date: impl Into<String>) -> Self {
        self.paper.published_date = Some(date.into());
        self
    }

    /// Set venue
    pub fn venue(mut self, venue: impl Into<String>) -> Self {
        self.paper.venue = Some(venue.into());
        self
    }

    /// Set citation count
    pub fn citations(mut self, count: u32) -> Self {
        self.paper.citations = Some(count);
        self
    }

    /// Build the Paper
    pub fn build(self) -> Paper {
        self.paper
    }
}

/// Read access to the DOI of a bibliographic record
///
/// This is the only thing the relation pipeline needs to know about the
/// record under investigation.
pub trait DoiField {
    /// The record's DOI, if it has one
    fn doi(&self) -> Option<&str>;
}

impl DoiField for Paper {
    fn doi(&self) -> Option<&str> {
        self.doi.as_deref()
    }
}

impl DoiField for str {
    fn doi(&self) -> Option<&str> {
        Some(self)
    }
}

impl DoiField for String {
    fn doi(&self) -> Option<&str> {
        Some(self.as_str())
    }
}

impl DoiField for Option<String> {
    fn doi(&self) -> Option<&str> {
        self.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paper_builder() {
        let paper = PaperBuilder::new(
            "10.1234/test.1234",
            "Test Paper",
            "https://doi.org/10.1234/test.1234",
            SourceType::CrossRef,
        )
        .authors("John Doe; Jane Smith")
        .abstract_text("This is a test abstract.")
        .doi("10.1234/test.1234")
        .venue("Journal of Tests")
        .citations(42)
        .build();

        assert_eq!(paper.paper_id, "10.1234/test.1234");
        assert_eq!(paper.title, "Test Paper");
        assert_eq!(paper.authors, "John Doe; Jane Smith");
        assert_eq!(paper.doi, Some("10.1234/test.1234".to_string()));
        assert_eq!(paper.venue.as_deref(), Some("Journal of Tests"));
        assert_eq!(paper.citations, Some(42));
    }

    #[test]
    fn test_primary_id() {
        let with_doi = PaperBuilder::new("1234", "Test", "https://example.com", SourceType::CrossRef)
            .doi("10.1234/test")
            .build();
        assert_eq!(with_doi.primary_id(), "10.1234/test");

        let without_doi = Paper::new(
            "1234".to_string(),
            "Test".to_string(),
            "https://example.com".to_string(),
            SourceType::CrossRef,
        );
        assert_eq!(without_doi.primary_id(), "1234");
    }

    #[test]
    fn test_doi_field() {
        let paper = PaperBuilder::new("p", "Test", "https://example.com", SourceType::CrossRef)
            .doi("10.1/X")
            .build();
        assert_eq!(DoiField::doi(&paper), Some("10.1/X"));

        let bare = Paper::new(
            "p".to_string(),
            "Test".to_string(),
            "https://example.com".to_string(),
            SourceType::CrossRef,
        );
        assert_eq!(DoiField::doi(&bare), None);

        assert_eq!(DoiField::doi("10.1/Y"), Some("10.1/Y"));
        assert_eq!(DoiField::doi(&None::<String>), None);
    }

    #[test]
    fn test_source_type_names() {
        assert_eq!(SourceType::CrossRef.id(), "crossref");
        assert_eq!(SourceType::CrossRef.to_string(), "CrossRef");
        assert_eq!(SourceType::Other("mock".to_string()).id(), "mock");
    }
}
