//! Search execution against the hosted engine

use crate::error::{Error, Result};
use crate::query::{QueryBuilder, SearchRequest};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Raw `_search` response, reduced to the parts the dashboard reads
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub hits: ResponseHits,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseHits {
    #[serde(default)]
    pub total: Option<TotalHits>,
    #[serde(default)]
    pub hits: Vec<RawHit>,
}

/// Hit count; older engines send a bare number instead of an object
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TotalHits {
    Object { value: u64 },
    Count(u64),
}

impl TotalHits {
    pub fn value(&self) -> u64 {
        match self {
            TotalHits::Object { value } => *value,
            TotalHits::Count(value) => *value,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawHit {
    #[serde(rename = "_score", default)]
    pub score: Option<f64>,
    #[serde(rename = "_source", default)]
    pub source: Map<String, Value>,
}

/// A scored document in engine order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredDocument {
    pub score: f64,
    pub source: Map<String, Value>,
}

impl ScoredDocument {
    /// Field value, treating JSON null the same as an absent key
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.source.get(name).filter(|v| !v.is_null())
    }
}

/// One page of results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// Engine's estimate of all matching documents
    pub total_estimated_matches: u64,
    /// Hits ordered by descending combined score
    pub hits: Vec<ScoredDocument>,
}

impl From<SearchResponse> for SearchResult {
    fn from(response: SearchResponse) -> Self {
        SearchResult {
            total_estimated_matches: response.hits.total.map(|t| t.value()).unwrap_or(0),
            hits: response
                .hits
                .hits
                .into_iter()
                .map(|hit| ScoredDocument {
                    score: hit.score.unwrap_or(0.0),
                    source: hit.source,
                })
                .collect(),
        }
    }
}

/// Query-and-respond call to a search engine
#[async_trait]
pub trait SearchTransport: Send + Sync {
    /// Run `body` against `index`
    async fn search(&self, index: &str, body: &Value) -> Result<SearchResponse>;
}

/// Transport speaking the Elasticsearch `_search` REST API
pub struct HttpTransport {
    base_url: String,
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> Self {
        HttpTransport {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl SearchTransport for HttpTransport {
    async fn search(&self, index: &str, body: &Value) -> Result<SearchResponse> {
        let url = format!("{}/{}/_search", self.base_url, index);
        tracing::debug!("POST {}", url);

        let resp = self.client.post(&url).json(body).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Http {
                status: status.as_u16(),
                body,
            });
        }

        Ok(resp.json::<SearchResponse>().await?)
    }
}

/// Builds requests and runs them through a transport
pub struct Searcher<T> {
    transport: T,
    builder: QueryBuilder,
}

impl<T: SearchTransport> Searcher<T> {
    pub fn new(transport: T, builder: QueryBuilder) -> Self {
        Searcher { transport, builder }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Execute one page of a search
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResult> {
        let body = self.builder.body(request);
        tracing::debug!(
            "Searching '{}' in {} (page {}, size {})",
            request.query_text,
            request.target_index,
            request.page_number,
            request.page_size
        );

        let response = self.transport.search(&request.target_index, &body).await?;
        let result = SearchResult::from(response);

        tracing::info!(
            "Query '{}' matched {} documents, {} on page {}",
            request.query_text,
            result.total_estimated_matches,
            result.hits.len(),
            request.page_number
        );
        Ok(result)
    }
}
