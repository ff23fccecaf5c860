//! LLM Provider支持模块

use anyhow::{Result, anyhow};
use rig::{
    client::CompletionClient,
    completion::{CompletionModel, message::AssistantContent},
    providers::gemini::completion::gemini_api_types::{AdditionalParameters, GenerationConfig},
};

use super::{GenerationError, join_text_parts, redact_credentials};
use crate::config::{LLMConfig, LLMProvider};

/// 统一的Provider客户端枚举
#[derive(Clone)]
pub enum ProviderClient {
    Gemini(rig::providers::gemini::Client),
}

impl ProviderClient {
    /// 根据配置创建相应的provider客户端
    pub fn new(config: &LLMConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .as_ref()
            .filter(|key| !key.is_blank())
            .ok_or_else(|| anyhow!("LLM API key is not configured"))?;

        match config.provider {
            LLMProvider::Gemini => {
                let client = rig::providers::gemini::Client::builder(api_key.expose()).build()?;
                Ok(ProviderClient::Gemini(client))
            }
        }
    }

    /// 单轮补全，返回按顺序拼接的全部文本片段
    pub async fn complete(
        &self,
        model: &str,
        prompt: &str,
        config: &LLMConfig,
    ) -> Result<String, GenerationError> {
        match self {
            ProviderClient::Gemini(client) => {
                let gen_cfg = GenerationConfig::default();
                let params = serde_json::to_value(AdditionalParameters::default().with_config(gen_cfg))
                    .map_err(|e| GenerationError::Backend(e.to_string()))?;

                let response = client
                    .completion_model(model)
                    .completion_request(prompt.to_owned())
                    .max_tokens(config.max_tokens)
                    .temperature(config.temperature)
                    .additional_params(params)
                    .send()
                    .await
                    .map_err(|e| {
                        GenerationError::Backend(redact_credentials(
                            &e.to_string(),
                            config.api_key.as_ref(),
                        ))
                    })?;

                join_text_parts(response.choice.iter().filter_map(|content| match content {
                    AssistantContent::Text(text) => Some(text.text.as_str()),
                    _ => None,
                }))
            }
        }
    }
}
