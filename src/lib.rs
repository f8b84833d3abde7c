//! # PubMed Paper Fetcher
//!
//! Finds PubMed articles with at least one author affiliated to a
//! pharmaceutical or biotech company and reports them as a table.
//!
//! The crate is a single forward pipeline:
//!
//! 1. [`PubMedClient::search_articles`] runs an ESearch query and returns PMIDs
//! 2. [`PubMedClient::fetch_details`] fetches the records with batched EFetch calls
//! 3. [`AffiliationClassifier::classify`] labels each author affiliation
//! 4. [`RecordAssembler::assemble`] builds one [`ReportRow`] per qualifying article
//! 5. [`report::sink::render`] prints the rows or writes them as CSV
//!
//! [`PaperFetcher`] runs steps 1 to 4.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pubmed_paper_fetcher::{ClientConfig, KeywordSets, AffiliationClassifier, PaperFetcher, PubMedClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = PubMedClient::with_config(ClientConfig::new().with_email("me@example.com"))?;
//!     let classifier = AffiliationClassifier::new(KeywordSets::default());
//!     let fetcher = PaperFetcher::with_classifier(client, classifier);
//!
//!     for row in fetcher.run("mRNA vaccine", 20).await? {
//!         println!("{}: {}", row.pmid, row.companies_joined());
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod classifier;
pub mod config;
pub mod error;
pub mod keywords;
pub mod pipeline;
pub mod pubmed;
pub mod report;

// Re-export main types for convenience
pub use classifier::{AffiliationClassifier, ClassifiedAffiliation};
pub use config::ClientConfig;
pub use error::{PaperFetchError, Result};
pub use keywords::KeywordSets;
pub use pipeline::PaperFetcher;
pub use pubmed::{ArticleId, Author, PubMedClient, RawArticleRecord};
pub use report::{RecordAssembler, RenderOutcome, ReportRow};
