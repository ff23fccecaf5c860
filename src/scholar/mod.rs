//! 文献检索服务 (Semantic Scholar Graph API)

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Deserialize;
use std::time::Duration;

use crate::config::ScholarConfig;
use crate::types::{Publication, PublicationDetails};

pub mod error;

pub use error::SearchError;

/// 检索接口请求的字段
pub const SEARCH_FIELDS: &str =
    "title,abstract,authors,year,citationCount,publicationDate,url,paperId,tldr,openAccessPdf";

/// 详情接口请求的字段
pub const DETAIL_FIELDS: &str =
    "title,abstract,authors,year,citationCount,references,citations,url,tldr,openAccessPdf,externalIds";

/// 单次检索的服务端上限
pub const SERVICE_MAX_LIMIT: usize = 100;

/// 文献检索能力
#[async_trait]
pub trait PaperSearch: Send + Sync {
    /// 是否携带了API KEY（仅用于向操作者反馈）
    fn has_credential(&self) -> bool;

    /// 关键词检索，结果顺序即服务端的相关性排序
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Publication>, SearchError>;

    /// 按标识查询文献详情
    async fn fetch_details(&self, paper_id: &str) -> Result<PublicationDetails, SearchError>;
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<Publication>,
}

/// Semantic Scholar 客户端
#[derive(Clone)]
pub struct SemanticScholarClient {
    http: reqwest::Client,
    base_url: String,
    has_key: bool,
}

impl SemanticScholarClient {
    pub fn new(config: &ScholarConfig) -> anyhow::Result<Self> {
        Self::with_builder(config, reqwest::Client::builder())
    }

    fn with_builder(
        config: &ScholarConfig,
        builder: reqwest::ClientBuilder,
    ) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        let key = config.api_key.as_ref().filter(|key| !key.is_blank());
        if let Some(key) = key {
            let mut value = HeaderValue::from_str(key.expose())?;
            value.set_sensitive(true);
            headers.insert("x-api-key", value);
        }

        let http = builder
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            has_key: key.is_some(),
        })
    }

    async fn get_json<T>(
        &self,
        url: &str,
        params: &[(&str, String)],
        resource: &str,
    ) -> Result<T, SearchError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let response = self.http.get(url).query(params).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), resource, "search service rejected request");
            return Err(SearchError::from_status(status, resource));
        }

        response.json::<T>().await.map_err(SearchError::from)
    }
}

#[async_trait]
impl PaperSearch for SemanticScholarClient {
    fn has_credential(&self) -> bool {
        self.has_key
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Publication>, SearchError> {
        let limit = limit.clamp(1, SERVICE_MAX_LIMIT);
        let url = format!("{}/paper/search", self.base_url);
        let params = [
            ("query", query.to_string()),
            ("limit", limit.to_string()),
            ("fields", SEARCH_FIELDS.to_string()),
        ];

        let response: SearchResponse = self.get_json(&url, &params, query).await?;
        tracing::debug!(hits = response.data.len(), "search completed");
        Ok(response.data)
    }

    async fn fetch_details(&self, paper_id: &str) -> Result<PublicationDetails, SearchError> {
        let url = format!("{}/paper/{}", self.base_url, paper_id);
        let params = [("fields", DETAIL_FIELDS.to_string())];
        self.get_json(&url, &params, paper_id).await
    }
}
