//! Graph HTTP client and cursor pagination

use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

use crate::config::api;
use crate::error::{AgentError, Phase, Result};

/// Proxy selection for outgoing requests
///
/// Mirrors the three proxy descriptors the monitoring system can hand to the
/// agent: an explicit URL, "use whatever the environment configures", or
/// "no proxy at all".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyConfig {
    /// Honor proxy settings from the process environment
    FromEnvironment,
    /// Disable proxying entirely
    NoProxy,
    /// Explicit proxy URL
    Url(String),
}

impl ProxyConfig {
    /// Parse the CLI proxy descriptor
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            None | Some("FROM_ENVIRONMENT") => ProxyConfig::FromEnvironment,
            Some("NO_PROXY") => ProxyConfig::NoProxy,
            Some(url) => ProxyConfig::Url(url.to_string()),
        }
    }
}

/// Build the shared HTTP client.
///
/// One client serves the token request and every page of every service, so
/// the timeout and proxy settings apply uniformly to all of them.
pub fn build_http_client(timeout: Duration, proxy: &ProxyConfig) -> Result<Client> {
    let builder = Client::builder().timeout(timeout);
    let builder = match proxy {
        ProxyConfig::FromEnvironment => builder,
        ProxyConfig::NoProxy => builder.no_proxy(),
        ProxyConfig::Url(url) => builder.proxy(reqwest::Proxy::all(url).map_err(|e| {
            AgentError::Config(format!("invalid proxy URL '{}': {}", url, e))
        })?),
    };
    builder
        .build()
        .map_err(|e| AgentError::Config(format!("failed to build HTTP client: {}", e)))
}

/// One page of a Graph list response
#[derive(Deserialize, Debug)]
pub struct ListResponse<T> {
    pub value: Vec<T>,
    #[serde(rename = "@odata.nextLink")]
    pub next_link: Option<String>,
}

/// Bearer-authenticated Graph API client
pub struct GraphClient {
    http: Client,
    token: String,
    base_url: String,
}

impl GraphClient {
    /// Create a client for the given Graph host using an acquired token
    pub fn new(http: Client, token: String, graph_url: &str) -> Self {
        Self {
            http,
            token,
            base_url: format!("{}{}", graph_url.trim_end_matches('/'), api::BASE_PATH),
        }
    }

    /// Create a GET request builder with the bearer auth header
    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.http
            .get(url)
            .header("Authorization", format!("Bearer {}", self.token))
    }

    /// Issue one GET and parse the page, classifying transport failures,
    /// non-2xx statuses and malformed bodies.
    async fn fetch_page<T>(&self, url: &str, phase: Phase) -> Result<ListResponse<T>>
    where
        T: DeserializeOwned,
    {
        debug!("GET {}", url);

        let response = self
            .get(url)
            .send()
            .await
            .map_err(|e| AgentError::from_reqwest(e, phase))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::Request {
                phase,
                status: Some(status.as_u16()),
                message: api_error_message(status.as_u16(), &body),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| AgentError::from_reqwest(e, phase))?;
        serde_json::from_str(&body).map_err(|e| AgentError::Shape {
            phase,
            message: e.to_string(),
        })
    }

    /// Fetch a single page for queries where the API returns the complete
    /// result at once; any continuation link is ignored.
    pub async fn fetch_value<T>(&self, path_and_query: &str, phase: Phase) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path_and_query);
        Ok(self.fetch_page(&url, phase).await?.value)
    }

    /// Fetch all pages of a paginated query.
    ///
    /// Follows the server-supplied continuation link until the server stops
    /// sending one, accumulating every record. All-or-nothing: a failure on
    /// a later page discards the pages fetched before it. Fetching stops
    /// with an error once `MAX_PAGES` is exceeded, since the continuation
    /// link is server-controlled and must not be followed forever.
    pub async fn fetch_all_pages<T>(&self, path_and_query: &str, phase: Phase) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let mut items: Vec<T> = Vec::new();
        let mut next = Some(format!("{}{}", self.base_url, path_and_query));
        let mut pages = 0u32;

        while let Some(url) = next {
            pages += 1;
            if pages > api::MAX_PAGES {
                return Err(AgentError::Request {
                    phase,
                    status: None,
                    message: format!(
                        "pagination did not terminate after {} pages (next link: {})",
                        api::MAX_PAGES, url
                    ),
                });
            }

            let page: ListResponse<T> = self.fetch_page(&url, phase).await?;
            debug!("page {} returned {} records", pages, page.value.len());
            items.extend(page.value);
            next = page.next_link;
        }

        debug!("fetched {} records over {} pages", items.len(), pages);
        Ok(items)
    }
}

/// Build a request-failure message refined by the HTTP status.
///
/// The status only changes the wording; the exit code stays phase-specific.
/// The response body is appended verbatim when the API supplied one.
fn api_error_message(status: u16, body: &str) -> String {
    let hint = match status {
        403 => "Access denied, check the application API permissions",
        429 => "Request throttled by the API",
        _ => "API request failed",
    };
    if body.is_empty() {
        hint.to_string()
    } else {
        format!("{}: {}", hint, body)
    }
}
