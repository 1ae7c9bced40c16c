// API client module: a small blocking client for the NCBI Entrez
// E-utilities. Only `efetch` is used, one PMID at a time.

use crate::config::Config;
use crate::error::FetchError;
use crate::pmid::Pmid;
use crate::record::{parse_efetch, Citation};
use anyhow::{Context, Result};
use reqwest::blocking::Client;
use std::time::Duration;
use tracing::{debug, instrument};

/// Default E-utilities root.
pub const DEFAULT_BASE_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";

/// Name reported to NCBI in the `tool` parameter.
pub const TOOL_NAME: &str = "pubmed-sheet";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Anything that can turn a PMID into a citation. The UI only talks to this
/// trait so that sessions can run against canned records.
pub trait RecordSource {
    /// `Ok(None)` when the PMID does not resolve to an article.
    fn fetch_citation(&self, pmid: Pmid) -> Result<Option<Citation>, FetchError>;
}

/// Blocking Entrez client. NCBI asks callers to identify themselves with a
/// contact email, so one is required to build it.
#[derive(Clone)]
pub struct EntrezClient {
    client: Client,
    base_url: String,
    email: String,
    api_key: Option<String>,
}

impl EntrezClient {
    pub fn new(config: &Config, email: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("pubmed-sheet/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(EntrezClient {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            email: email.into(),
            api_key: config.api_key.clone(),
        })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    fn efetch_url(&self) -> String {
        format!("{}/efetch.fcgi", self.base_url)
    }

    /// Query string for a single-record efetch.
    fn efetch_params(&self, pmid: Pmid) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("db", "pubmed".to_string()),
            ("retmode", "xml".to_string()),
            ("id", pmid.to_string()),
            ("tool", TOOL_NAME.to_string()),
            ("email", self.email.clone()),
        ];
        if let Some(key) = &self.api_key {
            params.push(("api_key", key.clone()));
        }
        params
    }
}

impl RecordSource for EntrezClient {
    #[instrument(skip(self))]
    fn fetch_citation(&self, pmid: Pmid) -> Result<Option<Citation>, FetchError> {
        let res = self
            .client
            .get(self.efetch_url())
            .query(&self.efetch_params(pmid))
            .send()?;
        if !res.status().is_success() {
            let status = res.status();
            let txt = res.text().unwrap_or_else(|_| "".into());
            return Err(FetchError::Status {
                status: status.as_u16(),
                message: txt.trim().to_string(),
            });
        }
        let body = res.text()?;
        debug!(bytes = body.len(), "efetch response received");
        parse_efetch(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn config(api_key: Option<&str>) -> Config {
        Config {
            base_url: "http://localhost:9000/eutils/".to_string(),
            api_key: api_key.map(str::to_string),
            ..Config::default()
        }
    }

    #[test]
    fn test_efetch_url_strips_trailing_slash() {
        let client = EntrezClient::new(&config(None), "me@example.org").unwrap();
        assert_eq!(client.efetch_url(), "http://localhost:9000/eutils/efetch.fcgi");
    }

    #[test]
    fn test_efetch_params() {
        let client = EntrezClient::new(&config(None), "me@example.org").unwrap();
        let params = client.efetch_params(Pmid::new(123).unwrap());
        assert_eq!(
            params,
            vec![
                ("db", "pubmed".to_string()),
                ("retmode", "xml".to_string()),
                ("id", "123".to_string()),
                ("tool", "pubmed-sheet".to_string()),
                ("email", "me@example.org".to_string()),
            ]
        );
    }

    #[test]
    fn test_efetch_params_with_api_key() {
        let client = EntrezClient::new(&config(Some("secret")), "me@example.org").unwrap();
        let params = client.efetch_params(Pmid::new(1).unwrap());
        assert_eq!(params.last(), Some(&("api_key", "secret".to_string())));
    }
}
