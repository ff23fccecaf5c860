//! LLM客户端 - 提供统一的文本生成接口

use async_trait::async_trait;
use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;
use thiserror::Error;

use crate::config::{ApiKey, LLMConfig, ModelPreference};

mod providers;

use providers::ProviderClient;

/// 文本生成失败的分类，两类都不是致命错误，由调用方决定回退还是中止
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GenerationError {
    /// 后端没有返回可用文本（例如被内容过滤）
    #[error("the model returned no usable text")]
    EmptyResponse,
    /// 传输、鉴权、配额或超时等失败
    #[error("model backend error: {0}")]
    Backend(String),
}

/// 文本生成能力。新增后端即新增一个实现
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// 当前使用的模型标识
    fn model_name(&self) -> &str;

    /// 提交一个prompt，返回完整的生成文本
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// 按顺序拼接后端返回的多个文本片段，全部为空白时视为空响应
pub fn join_text_parts<'a, I>(parts: I) -> Result<String, GenerationError>
where
    I: IntoIterator<Item = &'a str>,
{
    let text: String = parts.into_iter().collect();
    if text.trim().is_empty() {
        Err(GenerationError::EmptyResponse)
    } else {
        Ok(text)
    }
}

/// URL查询参数中的凭据，例如 Gemini 的 `?key=`
static CREDENTIAL_PARAM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)([?&](?:key|api_key|apikey|access_token|token)=)[^&\s)\]"']+"#)
        .expect("credential pattern is a valid literal")
});

/// 后端错误文本在展示或记录前去掉凭据
pub fn redact_credentials(message: &str, api_key: Option<&ApiKey>) -> String {
    let mut redacted = CREDENTIAL_PARAM
        .replace_all(message, "${1}***")
        .into_owned();
    if let Some(key) = api_key.filter(|key| !key.is_blank()) {
        redacted = redacted.replace(key.expose(), "***");
    }
    redacted
}

/// LLM客户端 - 提供统一的LLM服务接口
#[derive(Clone)]
pub struct LLMClient {
    config: LLMConfig,
    client: ProviderClient,
}

impl LLMClient {
    /// 创建新的LLM客户端
    pub fn new(config: LLMConfig) -> anyhow::Result<Self> {
        let client = ProviderClient::new(&config)?;
        Ok(Self { client, config })
    }

    /// 切换到另一档模型，复用同一个provider客户端
    pub fn with_preference(&self, preference: ModelPreference) -> Self {
        let mut config = self.config.clone();
        config.model_preference = preference;
        Self {
            config,
            client: self.client.clone(),
        }
    }

    pub fn preference(&self) -> ModelPreference {
        self.config.model_preference
    }
}

#[async_trait]
impl TextGenerator for LLMClient {
    fn model_name(&self) -> &str {
        self.config.active_model()
    }

    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let model = self.config.active_model();
        let timeout = Duration::from_secs(self.config.timeout_seconds);
        tracing::debug!(model, prompt_chars = prompt.chars().count(), "calling model");

        match tokio::time::timeout(timeout, self.client.complete(model, prompt, &self.config))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(GenerationError::Backend(format!(
                "request to {} timed out after {}s",
                model, self.config.timeout_seconds
            ))),
        }
    }
}
