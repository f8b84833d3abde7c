//! Report rows and the stages that build and emit them
//!
//! [`RecordAssembler`] turns a fetched article into at most one [`ReportRow`];
//! [`sink`] renders the rows to the console or to a CSV file.

pub mod assemble;
pub mod sink;

use serde::{Deserialize, Serialize};

pub use assemble::RecordAssembler;
pub use sink::{CSV_HEADER, NO_QUALIFYING_PAPERS, RenderOutcome};

/// Separator used when a list field is rendered as one cell
pub const LIST_SEPARATOR: &str = "; ";

/// One qualifying article in the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    /// PubMed ID
    pub pmid: String,
    pub title: String,
    /// Publication year as found in the record
    pub publication_date: String,
    /// Names of authors with a company affiliation, once per qualifying affiliation
    pub authors: Vec<String>,
    /// Distinct cleaned company names, in first-seen order
    pub companies: Vec<String>,
    /// Distinct email addresses, in first-seen order
    pub emails: Vec<String>,
}

impl ReportRow {
    pub fn authors_joined(&self) -> String {
        self.authors.join(LIST_SEPARATOR)
    }

    pub fn companies_joined(&self) -> String {
        self.companies.join(LIST_SEPARATOR)
    }

    pub fn emails_joined(&self) -> String {
        self.emails.join(LIST_SEPARATOR)
    }

    /// Cells in [`CSV_HEADER`] order
    pub fn to_record(&self) -> [String; 6] {
        [
            self.pmid.clone(),
            self.title.clone(),
            self.publication_date.clone(),
            self.authors_joined(),
            self.companies_joined(),
            self.emails_joined(),
        ]
    }
}
