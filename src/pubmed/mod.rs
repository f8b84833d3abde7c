//! PubMed E-utilities access: ESearch for identifiers, EFetch for records
//!
//! This module covers the first two pipeline stages. [`PubMedClient`] issues
//! the HTTP requests and [`parse_articles_from_xml`] turns EFetch documents
//! into [`RawArticleRecord`]s.

pub mod client;
pub mod models;
pub mod parser;
pub(crate) mod responses;

// Re-export public types
pub use client::{MAX_SEARCH_RESULTS, PubMedClient};
pub use models::{ArticleId, Author, RawArticleRecord};
pub use parser::parse_articles_from_xml;
