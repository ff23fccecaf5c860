use std::sync::Arc;

use anyhow::Result;

use crate::config::{Config, ModelPreference};
use crate::llm::{LLMClient, TextGenerator};
use crate::scholar::{PaperSearch, SemanticScholarClient};

#[derive(Clone)]
pub struct GeneratorContext {
    /// 配置
    pub config: Config,
    /// 文本生成后端
    pub generator: Arc<dyn TextGenerator>,
    /// 文献检索后端
    pub search: Arc<dyn PaperSearch>,
    /// 真实LLM客户端，用于切换模型档位；注入的后端没有该项
    llm_client: Option<LLMClient>,
}

impl GeneratorContext {
    /// 根据配置创建真实的后端
    pub fn new(config: Config) -> Result<Self> {
        let llm_client = LLMClient::new(config.llm.clone())?;
        let search = SemanticScholarClient::new(&config.scholar)?;

        Ok(Self {
            generator: Arc::new(llm_client.clone()),
            search: Arc::new(search),
            llm_client: Some(llm_client),
            config,
        })
    }

    /// 使用给定的后端
    pub fn with_backends(
        config: Config,
        generator: Arc<dyn TextGenerator>,
        search: Arc<dyn PaperSearch>,
    ) -> Self {
        Self {
            config,
            generator,
            search,
            llm_client: None,
        }
    }

    /// 切换到另一档模型后的文本生成后端
    pub fn generator_for(&self, preference: ModelPreference) -> Arc<dyn TextGenerator> {
        match &self.llm_client {
            Some(client) => Arc::new(client.with_preference(preference)),
            None => self.generator.clone(),
        }
    }

    /// 当前使用的模型档位
    pub fn preference(&self) -> ModelPreference {
        self.llm_client
            .as_ref()
            .map(LLMClient::preference)
            .unwrap_or(self.config.llm.model_preference)
    }
}
