use crate::config::{ApiKey, Config, MAX_RESULTS, MIN_RESULTS, ModelPreference};
use crate::generator::selection::{IndexSelection, SelectionMode};
use crate::i18n::TargetLanguage;
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

/// 默认配置文件名
pub const DEFAULT_CONFIG_FILE: &str = "litreview.toml";

/// litreview-rs - 由Rust与AI驱动的文献综述生成引擎
#[derive(Parser, Debug)]
#[command(name = "litreview")]
#[command(
    about = "AI-based literature review generator. It turns a research question into search keywords, retrieves publications from Semantic Scholar, and synthesizes a structured state-of-the-art review."
)]
#[command(version)]
pub struct Args {
    /// 研究问题
    pub question: String,

    /// 输出路径
    #[arg(short, long)]
    pub output_path: Option<PathBuf>,

    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 目标语言 (en, fr, de, zh)
    #[arg(short = 'l', long)]
    pub target_language: Option<String>,

    /// 检索的文献数量上限
    #[arg(short = 'n', long, value_parser = clap::value_parser!(u64).range(MIN_RESULTS as u64..=MAX_RESULTS as u64))]
    pub max_results: Option<u64>,

    /// 模型档位 (efficient, powerful)
    #[arg(short, long)]
    pub model: Option<String>,

    /// 高能效模型
    #[arg(long)]
    pub model_efficient: Option<String>,

    /// 高质量模型
    #[arg(long)]
    pub model_powerful: Option<String>,

    /// LLM API KEY
    #[arg(long)]
    pub llm_api_key: Option<String>,

    /// Semantic Scholar API KEY
    #[arg(long)]
    pub scholar_api_key: Option<String>,

    /// 逐篇处理之间的间隔（毫秒）
    #[arg(long)]
    pub pacing_ms: Option<u64>,

    /// 不调用LLM生成逐篇摘要
    #[arg(long)]
    pub no_summaries: bool,

    /// 不查询文献详情
    #[arg(long)]
    pub no_details: bool,

    /// 选中全部检索结果，不进入交互界面
    #[arg(short, long, conflicts_with = "select")]
    pub yes: bool,

    /// 预先指定选中的序号，例如 1,3,5
    #[arg(long)]
    pub select: Option<String>,

    /// 是否启用详细日志
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// 将CLI参数转换为配置
    pub fn into_config(&self) -> Result<Config> {
        let mut config = if let Some(config_path) = &self.config {
            // 显式指定的配置文件必须可读
            Config::from_file(config_path)?
        } else {
            // 没有显式指定时尝试默认位置
            let default_config_path = std::env::current_dir()
                .unwrap_or_else(|_| PathBuf::from("."))
                .join(DEFAULT_CONFIG_FILE);

            if default_config_path.exists() {
                Config::from_file(&default_config_path)?
            } else {
                Config::default()
            }
        };

        if let Some(output_path) = &self.output_path {
            config.output_path = output_path.clone();
        }

        // 目标语言配置
        if let Some(target_language_str) = &self.target_language {
            if let Ok(target_language) = target_language_str.parse::<TargetLanguage>() {
                config.target_language = target_language;
            } else {
                eprintln!(
                    "⚠️ 警告: 未知的目标语言: {}，使用 {}",
                    target_language_str, config.target_language
                );
            }
        }

        if let Some(max_results) = self.max_results {
            config.max_results = max_results as usize;
        }

        // 覆盖LLM配置
        if let Some(model) = &self.model {
            if let Ok(preference) = model.parse::<ModelPreference>() {
                config.llm.model_preference = preference;
            } else {
                eprintln!("⚠️ 警告: 未知的模型档位: {}，使用默认档位", model);
            }
        }
        if let Some(model_efficient) = &self.model_efficient {
            config.llm.model_efficient = model_efficient.clone();
        }
        if let Some(model_powerful) = &self.model_powerful {
            config.llm.model_powerful = model_powerful.clone();
        }
        if let Some(llm_api_key) = &self.llm_api_key {
            config.llm.api_key = Some(ApiKey::new(llm_api_key.as_str()));
        }
        if let Some(scholar_api_key) = &self.scholar_api_key {
            config.scholar.api_key = Some(ApiKey::new(scholar_api_key.as_str()));
        }

        // 其他配置
        if let Some(pacing_ms) = self.pacing_ms {
            config.pacing_ms = pacing_ms;
        }
        if self.no_summaries {
            config.summarize_items = false;
        }
        if self.no_details {
            config.enrich_details = false;
        }
        config.verbose = config.verbose || self.verbose;

        Ok(config)
    }

    /// 根据参数决定筛选方式
    pub fn selection_mode(&self) -> Result<SelectionMode> {
        if self.yes {
            return Ok(SelectionMode::AcceptAll);
        }
        match &self.select {
            Some(positions) => Ok(SelectionMode::Indices(IndexSelection::parse(positions)?)),
            None => Ok(SelectionMode::Interactive),
        }
    }
}
