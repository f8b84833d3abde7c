use serde::{Deserialize, Serialize};

/// PubMed identifier as returned by ESearch, kept in response order
pub type ArticleId = String;

/// Placeholder used when an article has no title
pub const MISSING_TITLE: &str = "N/A";

/// Placeholder used when an article has no publication year
pub const MISSING_YEAR: &str = "Unknown";

/// Placeholder used when an author has no usable name
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// One article as fetched from EFetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawArticleRecord {
    /// PubMed ID
    pub pmid: ArticleId,
    /// Article title, or [`MISSING_TITLE`]
    pub title: String,
    /// Publication year, or [`MISSING_YEAR`]
    pub publication_year: String,
    /// Authors in document order
    pub authors: Vec<Author>,
}

/// An article author with the affiliations listed for them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Display name ("ForeName LastName"), or [`UNKNOWN_AUTHOR`]
    pub full_name: String,
    /// Affiliation strings in document order
    pub affiliations: Vec<String>,
}

impl Author {
    pub fn new<S: Into<String>>(full_name: S, affiliations: Vec<String>) -> Self {
        Self {
            full_name: full_name.into(),
            affiliations,
        }
    }
}
