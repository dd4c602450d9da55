//! Paginated fetcher for the listing API.
//!
//! One call fetches one page. There is no retry here: the aggregator decides
//! what a failed page means.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::Value;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{MagangError, Result};
use crate::models::LiveCounters;
use crate::pagination::PaginationMeta;

/// User agent string identifying this client.
const USER_AGENT: &str = concat!("maganghub/", env!("CARGO_PKG_VERSION"));

/// One page request against a collection endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub endpoint: String,
    /// Query filters such as `("id_posisi", "...")` or `("email", "...")`.
    pub filters: Vec<(String, String)>,
    /// 1-based.
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    pub fn new(endpoint: impl Into<String>, page_size: u32) -> Self {
        Self {
            endpoint: endpoint.into(),
            filters: Vec::new(),
            page: 1,
            page_size,
        }
    }

    #[must_use]
    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((key.into(), value.into()));
        self
    }

    /// Same query, different page.
    #[must_use]
    pub fn at_page(&self, page: u32) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }

    fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = self.filters.clone();
        pairs.push(("page".into(), self.page.to_string()));
        pairs.push(("limit".into(), self.page_size.to_string()));
        pairs
    }
}

/// Reason given when a body has no `data` key at all.
pub(crate) const MISSING_DATA: &str = "response has no 'data' field";

/// One fetched page: raw records plus the pagination metadata it carried.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub records: Vec<Value>,
    pub pagination: PaginationMeta,
}

impl Page {
    /// Split a response body into records and pagination metadata.
    ///
    /// A missing `data` key or a non-array `data` is malformed; `data: null`
    /// is an empty page.
    pub fn from_body(body: &Value) -> Result<Self> {
        let records = match body.get("data") {
            None => {
                return Err(MagangError::MalformedResponse(MISSING_DATA.into()))
            }
            Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items.clone(),
            Some(_) => {
                return Err(MagangError::MalformedResponse(
                    "'data' is not a list".into(),
                ))
            }
        };

        Ok(Self {
            records,
            pagination: PaginationMeta::from_body(body),
        })
    }
}

/// Source of collection pages, enabling test doubles for the aggregator.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Page>;
}

/// Source of live counters for a single position.
#[async_trait]
pub trait DetailSource: Send + Sync {
    /// `Ok(None)` when the API knows nothing about the position.
    async fn fetch_detail(&self, position_id: &str) -> Result<Option<LiveCounters>>;
}

/// reqwest-backed client for the listing API.
///
/// NOTE: Do NOT derive `Debug` on this struct, the default headers carry the
/// API token.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    vacancies_url: String,
    timeout: Duration,
    lookup_timeout: Duration,
}

impl ApiClient {
    /// Create a client. The token, when configured, goes out as the
    /// `Authorization` header on every request.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &config.api_token {
            let mut value = HeaderValue::from_str(&authorization_value(token))
                .map_err(|_| MagangError::Config("API token is not a valid header value".into()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            vacancies_url: config.vacancies_url(),
            timeout: config.timeout,
            lookup_timeout: config.lookup_timeout,
        })
    }

    /// GET a URL and decode the JSON body, mapping non-2xx to `RemoteService`.
    async fn get_json(&self, url: &str, query: &[(String, String)], timeout: Duration) -> Result<Value> {
        let response = self
            .http
            .get(url)
            .query(query)
            .timeout(timeout)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(MagangError::RemoteService {
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str(&text)
            .map_err(|e| MagangError::MalformedResponse(format!("invalid JSON body: {e}")))
    }
}

/// Use the token as-is when it already names a scheme, otherwise as a bearer token.
fn authorization_value(token: &str) -> String {
    let token = token.trim();
    if token.contains(' ') {
        token.to_string()
    } else {
        format!("Bearer {token}")
    }
}

#[async_trait]
impl PageSource for ApiClient {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Page> {
        debug!(endpoint = %request.endpoint, page = request.page, "fetching page");
        let body = self
            .get_json(&request.endpoint, &request.query_pairs(), self.timeout)
            .await?;
        Page::from_body(&body)
    }
}

#[async_trait]
impl DetailSource for ApiClient {
    async fn fetch_detail(&self, position_id: &str) -> Result<Option<LiveCounters>> {
        debug!(position_id, "fetching live counters");
        let query = [("id_posisi".to_string(), position_id.to_string())];
        let body = self
            .get_json(&self.vacancies_url, &query, self.lookup_timeout)
            .await?;

        Ok(body
            .get("data")
            .and_then(Value::as_array)
            .and_then(|items| items.first())
            .map(LiveCounters::from_detail))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_client() {
        let config = ClientConfig::builder("http://127.0.0.1:1").api_token("abc").build();
        assert!(ApiClient::new(&config).is_ok());
    }

    #[test]
    fn test_invalid_token_is_config_error() {
        let config = ClientConfig::builder("http://127.0.0.1:1").api_token("bad\ntoken").build();
        assert!(matches!(ApiClient::new(&config), Err(MagangError::Config(_))));
    }

    #[test]
    fn test_authorization_value() {
        assert_eq!(authorization_value("abc123"), "Bearer abc123");
        assert_eq!(authorization_value("Bearer abc123"), "Bearer abc123");
        assert_eq!(authorization_value(" Token xyz "), "Token xyz");
    }

    #[test]
    fn test_query_pairs_order() {
        let request = PageRequest::new("http://x/list", 20)
            .filter("id_posisi", "p-1")
            .at_page(3);
        assert_eq!(
            request.query_pairs(),
            vec![
                ("id_posisi".to_string(), "p-1".to_string()),
                ("page".to_string(), "3".to_string()),
                ("limit".to_string(), "20".to_string()),
            ]
        );
    }

    #[test]
    fn test_page_from_body() {
        let page = Page::from_body(&json!({
            "data": [{"a": 1}, {"a": 2}],
            "meta": {"pagination": {"total": 2, "per_page": 20}}
        }))
        .unwrap();
        assert_eq!(page.records.len(), 2);
        assert!(matches!(page.pagination, PaginationMeta::Totals { .. }));
    }

    #[test]
    fn test_page_null_data_is_empty() {
        let page = Page::from_body(&json!({"data": null})).unwrap();
        assert!(page.records.is_empty());
        assert_eq!(page.pagination, PaginationMeta::Absent);
    }

    #[test]
    fn test_page_missing_or_invalid_data_is_malformed() {
        assert!(Page::from_body(&json!({"message": "ok"})).is_err());
        assert!(Page::from_body(&json!({"data": {"a": 1}})).is_err());
    }
}
