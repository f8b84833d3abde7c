//! End-to-end pipeline: search, fetch, classify and assemble

use tracing::{debug, info, instrument};

use crate::classifier::AffiliationClassifier;
use crate::error::{PaperFetchError, Result};
use crate::pubmed::PubMedClient;
use crate::report::{RecordAssembler, ReportRow};

/// Runs one query through every stage up to (not including) rendering
///
/// # Example
///
/// ```no_run
/// use pubmed_paper_fetcher::{PaperFetcher, PubMedClient, report};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let fetcher = PaperFetcher::new(PubMedClient::new()?);
///     let rows = fetcher.run("cancer immunotherapy", 50).await?;
///     report::sink::render(&rows, None)?;
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct PaperFetcher {
    client: PubMedClient,
    assembler: RecordAssembler,
}

impl PaperFetcher {
    /// Create a fetcher with the built-in keyword sets
    pub fn new(client: PubMedClient) -> Self {
        Self::with_classifier(client, AffiliationClassifier::default())
    }

    pub fn with_classifier(client: PubMedClient, classifier: AffiliationClassifier) -> Self {
        Self {
            client,
            assembler: RecordAssembler::new(classifier),
        }
    }

    /// Search, fetch and assemble the report rows for `query`
    ///
    /// Rows come out in search order whatever order EFetch returns records in,
    /// since [`PubMedClient::fetch_details`] restores the requested order.
    /// A search with no hits stops here with [`PaperFetchError::EmptyResult`]
    /// and no EFetch request is made.
    #[instrument(skip(self), fields(query = %query, max_results = max_results))]
    pub async fn run(&self, query: &str, max_results: usize) -> Result<Vec<ReportRow>> {
        let keywords = self.assembler.classifier().keywords();
        debug!(
            company_keywords = keywords.company().len(),
            academic_keywords = keywords.academic().len(),
            "Searching PubMed for: {}",
            query
        );
        let pmids = self.client.search_articles(query, max_results).await?;

        if pmids.is_empty() {
            return Err(PaperFetchError::EmptyResult {
                query: query.to_string(),
            });
        }
        debug!("Found {} papers", pmids.len());

        let records = self.client.fetch_details(&pmids).await?;
        debug!(records = records.len(), "Fetched article details");

        let rows = self.assembler.assemble_all(&records);
        info!(
            searched = pmids.len(),
            fetched = records.len(),
            qualifying = rows.len(),
            "Pipeline completed"
        );

        Ok(rows)
    }
}
