use tracing::{debug, instrument};

use crate::classifier::AffiliationClassifier;
use crate::pubmed::models::RawArticleRecord;
use crate::report::ReportRow;

/// Builds report rows from fetched articles
#[derive(Debug, Clone, Default)]
pub struct RecordAssembler {
    classifier: AffiliationClassifier,
}

impl RecordAssembler {
    pub fn new(classifier: AffiliationClassifier) -> Self {
        Self { classifier }
    }

    pub fn classifier(&self) -> &AffiliationClassifier {
        &self.classifier
    }

    /// Build the report row for one article
    ///
    /// Every author affiliation is classified. Each company, non-academic
    /// affiliation adds the author's name (repeats allowed), its cleaned
    /// company name and its email (both deduplicated). Returns `None` when no
    /// affiliation qualifies.
    #[instrument(skip(self, record), fields(pmid = %record.pmid))]
    pub fn assemble(&self, record: &RawArticleRecord) -> Option<ReportRow> {
        let mut authors = Vec::new();
        let mut companies: Vec<String> = Vec::new();
        let mut emails: Vec<String> = Vec::new();

        for author in &record.authors {
            for affiliation in &author.affiliations {
                let classified = self.classifier.classify(affiliation);
                if !classified.is_non_academic_company() {
                    continue;
                }

                authors.push(author.full_name.clone());

                if let Some(company) = classified.company_name {
                    if !companies.contains(&company) {
                        companies.push(company);
                    }
                }
                if let Some(email) = classified.email {
                    if !emails.contains(&email) {
                        emails.push(email);
                    }
                }
            }
        }

        if authors.is_empty() {
            debug!("No company-affiliated authors");
            return None;
        }

        debug!(
            authors = authors.len(),
            companies = companies.len(),
            emails = emails.len(),
            "Article qualifies"
        );

        Some(ReportRow {
            pmid: record.pmid.clone(),
            title: record.title.clone(),
            publication_date: record.publication_year.clone(),
            authors,
            companies,
            emails,
        })
    }

    /// Assemble every record, keeping input order and dropping non-qualifying ones
    pub fn assemble_all(&self, records: &[RawArticleRecord]) -> Vec<ReportRow> {
        records.iter().filter_map(|r| self.assemble(r)).collect()
    }
}
