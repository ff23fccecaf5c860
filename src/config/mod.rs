use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use crate::i18n::TargetLanguage;

/// 检索结果数量的允许范围
pub const MIN_RESULTS: usize = 5;
pub const MAX_RESULTS: usize = 30;

/// LLM Provider类型
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub enum LLMProvider {
    #[serde(rename = "gemini")]
    #[default]
    Gemini,
}

impl std::fmt::Display for LLMProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLMProvider::Gemini => write!(f, "gemini"),
        }
    }
}

impl std::str::FromStr for LLMProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gemini" => Ok(LLMProvider::Gemini),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}

/// 选用哪一档模型
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModelPreference {
    /// 高能效模型
    #[default]
    Efficient,
    /// 高质量模型
    Powerful,
}

impl ModelPreference {
    /// 另一档模型，用于综述失败后的换模型重试
    pub fn other(&self) -> Self {
        match self {
            ModelPreference::Efficient => ModelPreference::Powerful,
            ModelPreference::Powerful => ModelPreference::Efficient,
        }
    }
}

impl std::str::FromStr for ModelPreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "efficient" | "flash" => Ok(ModelPreference::Efficient),
            "powerful" | "pro" => Ok(ModelPreference::Powerful),
            _ => Err(format!("Unknown model preference: {}", s)),
        }
    }
}

/// 密钥。Debug与Display均不输出明文
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// 从环境变量读取，按顺序取第一个非空值
    pub fn from_env(vars: &[&str]) -> Option<Self> {
        vars.iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|value| !value.trim().is_empty())
            .map(Self)
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ApiKey(***)")
    }
}

impl std::fmt::Display for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "***")
    }
}

/// 应用程序配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct Config {
    /// 输出路径
    pub output_path: PathBuf,

    /// 目标语言
    pub target_language: TargetLanguage,

    /// 检索的文献数量上限
    pub max_results: usize,

    /// 逐篇摘要之间的间隔（毫秒）
    pub pacing_ms: u64,

    /// 是否在缺少摘要信息时查询文献详情
    pub enrich_details: bool,

    /// 是否调用LLM生成逐篇摘要，关闭时只使用回退链
    pub summarize_items: bool,

    /// 选择界面中默认展开的条目数
    pub preview_expanded: usize,

    /// 综述缺少章节时是否判定为失败
    pub strict_sections: bool,

    /// 截断配置
    pub truncation: TruncationConfig,

    /// LLM模型配置
    pub llm: LLMConfig,

    /// 文献检索服务配置
    pub scholar: ScholarConfig,

    /// 是否启用详细日志
    pub verbose: bool,
}

/// LLM模型配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LLMConfig {
    /// LLM Provider类型
    pub provider: LLMProvider,

    /// LLM API KEY
    pub api_key: Option<ApiKey>,

    /// 高能效模型，用于常规调用
    pub model_efficient: String,

    /// 高质量模型，可在综述失败后切换
    pub model_powerful: String,

    /// 当前选用的模型档位
    pub model_preference: ModelPreference,

    /// 最大tokens
    pub max_tokens: u64,

    /// 温度
    pub temperature: f64,

    /// 超时时间（秒）
    pub timeout_seconds: u64,
}

/// 文献检索服务配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ScholarConfig {
    /// API基地址
    pub api_base_url: String,

    /// 可选的API KEY
    pub api_key: Option<ApiKey>,

    /// 超时时间（秒）
    pub timeout_seconds: u64,
}

/// 各处提示词中摘要的截断长度（字符数）
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct TruncationConfig {
    /// 逐篇摘要提示词中的摘要长度
    pub summary_prompt_chars: usize,
    /// 综述提示词中每篇文献的描述长度
    pub review_prompt_chars: usize,
    /// 生成失败时直接展示的摘要长度
    pub fallback_chars: usize,
}

impl Config {
    /// 从文件加载配置
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let mut file =
            File::open(path).context(format!("Failed to open config file: {:?}", path))?;
        let mut content = String::new();
        file.read_to_string(&mut content)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// 在发起任何网络请求前校验配置
    pub fn validate(&self) -> Result<()> {
        match &self.llm.api_key {
            Some(key) if !key.is_blank() => {}
            _ => bail!(
                "LLM API key is missing: set LITREVIEW_LLM_API_KEY (or GEMINI_API_KEY) or pass --llm-api-key"
            ),
        }
        if !(MIN_RESULTS..=MAX_RESULTS).contains(&self.max_results) {
            bail!(
                "max_results must be between {} and {}, got {}",
                MIN_RESULTS,
                MAX_RESULTS,
                self.max_results
            );
        }
        if self.llm.model_efficient.trim().is_empty() || self.llm.model_powerful.trim().is_empty()
        {
            bail!("model identifiers must not be empty");
        }
        Ok(())
    }

    /// 是否配置了检索服务的API KEY
    pub fn has_scholar_key(&self) -> bool {
        self.scholar
            .api_key
            .as_ref()
            .is_some_and(|key| !key.is_blank())
    }
}

impl LLMConfig {
    /// 当前档位对应的模型标识
    pub fn active_model(&self) -> &str {
        match self.model_preference {
            ModelPreference::Efficient => &self.model_efficient,
            ModelPreference::Powerful => &self.model_powerful,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("./litreview.docs"),
            target_language: TargetLanguage::default(),
            max_results: 15,
            pacing_ms: 1000,
            enrich_details: true,
            summarize_items: true,
            preview_expanded: 3,
            strict_sections: true,
            truncation: TruncationConfig::default(),
            llm: LLMConfig::default(),
            scholar: ScholarConfig::default(),
            verbose: false,
        }
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: LLMProvider::default(),
            api_key: ApiKey::from_env(&["LITREVIEW_LLM_API_KEY", "GEMINI_API_KEY"]),
            model_efficient: String::from("gemini-2.5-flash"),
            model_powerful: String::from("gemini-2.5-pro"),
            model_preference: ModelPreference::default(),
            max_tokens: 8192,
            temperature: 0.3,
            timeout_seconds: 120,
        }
    }
}

impl Default for ScholarConfig {
    fn default() -> Self {
        Self {
            api_base_url: String::from("https://api.semanticscholar.org/graph/v1"),
            api_key: ApiKey::from_env(&["SEMANTIC_SCHOLAR_API_KEY"]),
            timeout_seconds: 30,
        }
    }
}

impl Default for TruncationConfig {
    fn default() -> Self {
        Self {
            summary_prompt_chars: 1000,
            review_prompt_chars: 800,
            fallback_chars: 300,
        }
    }
}
