//! 单元测试使用的脚本化后端

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use crate::llm::{GenerationError, TextGenerator};
use crate::scholar::{PaperSearch, SearchError};
use crate::types::{Publication, PublicationDetails};

/// 按顺序返回预设结果的生成器，记录收到的prompt
pub struct ScriptedGenerator {
    responses: Mutex<VecDeque<Result<String, GenerationError>>>,
    fallback: Result<String, GenerationError>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    /// 每次调用都返回同一个结果
    pub fn always(response: Result<String, GenerationError>) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            fallback: response,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// 依次返回给定结果，用完后返回空响应
    pub fn scripted(responses: Vec<Result<String, GenerationError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            fallback: Err(GenerationError::EmptyResponse),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    fn model_name(&self) -> &str {
        "scripted-model"
    }

    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

/// 返回固定检索结果的检索服务
pub struct StaticSearch {
    results: Result<Vec<Publication>, SearchError>,
    details: HashMap<String, Result<PublicationDetails, SearchError>>,
    queries: Mutex<Vec<(String, usize)>>,
    detail_calls: Mutex<Vec<String>>,
}

impl StaticSearch {
    pub fn new(results: Result<Vec<Publication>, SearchError>) -> Self {
        Self {
            results,
            details: HashMap::new(),
            queries: Mutex::new(Vec::new()),
            detail_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_details(
        mut self,
        paper_id: &str,
        details: Result<PublicationDetails, SearchError>,
    ) -> Self {
        self.details.insert(paper_id.to_string(), details);
        self
    }

    pub fn queries(&self) -> Vec<(String, usize)> {
        self.queries.lock().unwrap().clone()
    }

    pub fn detail_calls(&self) -> Vec<String> {
        self.detail_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaperSearch for StaticSearch {
    fn has_credential(&self) -> bool {
        false
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Publication>, SearchError> {
        self.queries
            .lock()
            .unwrap()
            .push((query.to_string(), limit));
        self.results.clone()
    }

    async fn fetch_details(&self, paper_id: &str) -> Result<PublicationDetails, SearchError> {
        self.detail_calls.lock().unwrap().push(paper_id.to_string());
        self.details
            .get(paper_id)
            .cloned()
            .unwrap_or_else(|| Err(SearchError::NotFound(paper_id.to_string())))
    }
}

/// 构造一条文献
pub fn publication(paper_id: &str, title: &str) -> Publication {
    Publication {
        paper_id: paper_id.to_string(),
        title: Some(title.to_string()),
        ..Default::default()
    }
}
