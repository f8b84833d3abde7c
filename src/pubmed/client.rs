use std::collections::HashMap;

use reqwest::{Client, Response};
use tracing::{debug, info, instrument, warn};

use crate::config::ClientConfig;
use crate::error::{PaperFetchError, Result};
use crate::pubmed::models::{ArticleId, RawArticleRecord};
use crate::pubmed::parser::parse_articles_from_xml;
use crate::pubmed::responses::ESearchResult;

/// ESearch refuses `retmax` values above this
pub const MAX_SEARCH_RESULTS: usize = 10_000;

/// Client for the two E-utilities calls the pipeline needs: ESearch and EFetch
#[derive(Clone)]
pub struct PubMedClient {
    client: Client,
    base_url: String,
    config: ClientConfig,
}

impl PubMedClient {
    /// Create a new PubMed client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::new())
    }

    /// Create a new PubMed client with custom configuration
    ///
    /// # Example
    ///
    /// ```
    /// use pubmed_paper_fetcher::{ClientConfig, PubMedClient};
    ///
    /// let config = ClientConfig::new().with_email("researcher@example.com");
    /// let client = PubMedClient::with_config(config).unwrap();
    /// ```
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.effective_user_agent())
            .build()?;

        Ok(Self::with_client(client, config))
    }

    /// Create a client around an existing reqwest client
    pub fn with_client(client: Client, config: ClientConfig) -> Self {
        let base_url = config.effective_base_url().to_string();

        Self {
            client,
            base_url,
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Search PubMed and return matching PMIDs in response order
    ///
    /// The query is passed to ESearch uninterpreted. An empty result is
    /// returned as an empty `Vec`; deciding whether that is fatal is left to
    /// the caller.
    ///
    /// # Errors
    ///
    /// * `PaperFetchError::InvalidQuery` - If the query is blank
    /// * `PaperFetchError::SearchLimitExceeded` - If `limit` exceeds 10,000
    /// * `PaperFetchError::RequestError` / `ApiError` - If the request fails
    /// * `PaperFetchError::JsonError` - If the response is not valid ESearch JSON
    ///
    /// # Example
    ///
    /// ```no_run
    /// use pubmed_paper_fetcher::PubMedClient;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = PubMedClient::new()?;
    ///     let pmids = client.search_articles("cancer immunotherapy", 10).await?;
    ///     println!("Found {} articles", pmids.len());
    ///     Ok(())
    /// }
    /// ```
    #[instrument(skip(self), fields(query = %query, limit = limit))]
    pub async fn search_articles(&self, query: &str, limit: usize) -> Result<Vec<ArticleId>> {
        if query.trim().is_empty() {
            warn!("Empty query provided");
            return Err(PaperFetchError::InvalidQuery(
                "search query must not be empty".to_string(),
            ));
        }

        if limit > MAX_SEARCH_RESULTS {
            return Err(PaperFetchError::SearchLimitExceeded {
                requested: limit,
                maximum: MAX_SEARCH_RESULTS,
            });
        }

        let url = self.search_url(query, limit);

        debug!("Making ESearch API request");
        let response = self.make_request(&url).await?;
        let body = response.text().await?;
        let search_result: ESearchResult = serde_json::from_str(&body)?;

        let data = search_result.esearchresult;
        if let Some(message) = data.error {
            if data.idlist.is_empty() {
                warn!(error = %message, "ESearch reported an error");
                return Err(PaperFetchError::ApiError {
                    status: 200,
                    message,
                });
            }
        }

        info!(
            results_found = data.idlist.len(),
            total_count = data.count.as_deref().unwrap_or("0"),
            "Search completed successfully"
        );
        debug!(pmids = ?data.idlist, "Search returned identifiers");

        Ok(data.idlist)
    }

    /// Fetch article records for the given PMIDs
    ///
    /// Identifiers are sent in chunks of at most
    /// [`ClientConfig::effective_batch_size`], one EFetch request per chunk, in
    /// input order. Records come back in the order of `pmids`, at most one per
    /// identifier. An empty input makes no request. Records without a PMID,
    /// with a PMID that was not requested, or repeating one already seen are
    /// dropped.
    ///
    /// # Errors
    ///
    /// * `PaperFetchError::RequestError` / `ApiError` - If any request fails
    /// * `PaperFetchError::XmlParseError` - If a response is blank, is not
    ///   well-formed XML, or is not a `PubmedArticleSet` document
    #[instrument(skip(self, pmids), fields(requested = pmids.len()))]
    pub async fn fetch_details(&self, pmids: &[ArticleId]) -> Result<Vec<RawArticleRecord>> {
        if pmids.is_empty() {
            return Ok(Vec::new());
        }

        let batch_size = self.config.effective_batch_size();
        let mut records = Vec::with_capacity(pmids.len());

        for chunk in pmids.chunks(batch_size) {
            let mut pending: HashMap<&str, usize> = chunk
                .iter()
                .enumerate()
                .map(|(index, id)| (id.as_str(), index))
                .collect();
            let url = self.fetch_url(chunk);

            debug!(batch_size = chunk.len(), "Making batch EFetch API request");
            let response = self.make_request(&url).await?;
            let xml_text = response.text().await?;

            if xml_text.trim().is_empty() {
                warn!(batch_size = chunk.len(), "EFetch returned an empty body");
                return Err(PaperFetchError::XmlParseError {
                    message: "EFetch returned an empty body".to_string(),
                });
            }

            let parsed = parse_articles_from_xml(&xml_text)?;
            let parsed_count = parsed.len();

            let mut batch: Vec<(usize, RawArticleRecord)> = Vec::with_capacity(parsed_count);
            for record in parsed {
                match pending.remove(record.pmid.as_str()) {
                    Some(index) => batch.push((index, record)),
                    None => warn!(
                        pmid = %record.pmid,
                        "Dropping record that was not requested or already returned"
                    ),
                }
            }
            batch.sort_by_key(|(index, _)| *index);

            info!(
                requested = chunk.len(),
                parsed = parsed_count,
                kept = batch.len(),
                "Batch fetch completed"
            );
            records.extend(batch.into_iter().map(|(_, record)| record));
        }

        Ok(records)
    }

    fn search_url(&self, query: &str, limit: usize) -> String {
        format!(
            "{}/esearch.fcgi?db=pubmed&term={}&retmax={}&retmode=json",
            self.base_url,
            urlencoding::encode(query),
            limit
        )
    }

    fn fetch_url(&self, pmids: &[ArticleId]) -> String {
        let id_list = pmids
            .iter()
            .map(|id| urlencoding::encode(id).into_owned())
            .collect::<Vec<_>>()
            .join(",");

        format!(
            "{}/efetch.fcgi?db=pubmed&id={}&retmode=xml",
            self.base_url, id_list
        )
    }

    /// Send a GET request with the NCBI API parameters appended
    async fn make_request(&self, url: &str) -> Result<Response> {
        let mut final_url = url.to_string();

        for (key, value) in self.config.build_api_params() {
            let separator = if final_url.contains('?') { '&' } else { '?' };
            final_url.push(separator);
            final_url.push_str(&key);
            final_url.push('=');
            final_url.push_str(&urlencoding::encode(&value));
        }

        let response = self.client.get(&final_url).send().await?;

        if !response.status().is_success() {
            warn!("API request failed with status: {}", response.status());
            return Err(PaperFetchError::ApiError {
                status: response.status().as_u16(),
                message: response
                    .status()
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string(),
            });
        }

        Ok(response)
    }
}
