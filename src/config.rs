//! Client configuration for the NCBI E-utilities endpoints

use std::time::Duration;

/// Default NCBI E-utilities base URL
pub const DEFAULT_BASE_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";

/// NCBI recommends batches of up to 200 IDs per EFetch request
pub const DEFAULT_BATCH_SIZE: usize = 200;

/// Default number of identifiers requested from ESearch
pub const DEFAULT_MAX_RESULTS: usize = 100;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for [`PubMedClient`](crate::pubmed::PubMedClient)
///
/// # Example
///
/// ```
/// use pubmed_paper_fetcher::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::new()
///     .with_email("researcher@example.com")
///     .with_timeout(Duration::from_secs(10))
///     .with_batch_size(50);
///
/// assert_eq!(config.effective_batch_size(), 50);
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Override for the E-utilities base URL (used by tests and mirrors)
    pub base_url: Option<String>,
    /// Contact email sent with each request
    pub email: Option<String>,
    /// Tool name sent with each request
    pub tool: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
    /// Maximum number of identifiers per EFetch request
    pub batch_size: usize,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self {
            base_url: None,
            email: None,
            tool: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_email<S: Into<String>>(mut self, email: S) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_tool<S: Into<String>>(mut self, tool: S) -> Self {
        self.tool = Some(tool.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Base URL without a trailing slash
    pub fn effective_base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
    }

    pub fn effective_user_agent(&self) -> String {
        format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    }

    pub fn effective_tool(&self) -> &str {
        self.tool.as_deref().unwrap_or(env!("CARGO_PKG_NAME"))
    }

    /// Batch size, never zero
    pub fn effective_batch_size(&self) -> usize {
        self.batch_size.max(1)
    }

    /// Query parameters NCBI asks every client to send
    pub fn build_api_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();

        if let Some(email) = &self.email {
            params.push(("email".to_string(), email.clone()));
        }
        params.push(("tool".to_string(), self.effective_tool().to_string()));

        params
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}
