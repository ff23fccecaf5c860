use anyhow::Result;
use dialoguer::{Confirm, Select};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::config::{Config, ModelPreference};
use crate::generator::context::GeneratorContext;
use crate::generator::outlet::{DiskOutlet, Outlet};
use crate::generator::planner::QueryPlanner;
use crate::generator::resolver::SourceResolver;
use crate::generator::selection::{SelectionMode, SelectionSurface};
use crate::generator::synthesis::{ReviewDocument, ReviewSynthesizer, SynthesisError};
use crate::llm::TextGenerator;
use crate::scholar::{SERVICE_MAX_LIMIT, SearchError};
use crate::types::Publication;

mod run;

pub use run::ReviewRun;

/// 时间跟踪作用域，按阶段开始的顺序记录耗时
pub struct TimingScope {
    start_time: Instant,
    phase_start_times: Vec<(String, Instant)>,
    phase_durations: Vec<(String, Duration)>,
}

impl Default for TimingScope {
    fn default() -> Self {
        Self::new()
    }
}

impl TimingScope {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            phase_start_times: Vec::new(),
            phase_durations: Vec::new(),
        }
    }

    /// 开始一个新的阶段计时
    pub fn start_phase(&mut self, phase_name: &str) {
        self.phase_start_times
            .push((phase_name.to_string(), Instant::now()));
    }

    /// 结束一个阶段的计时，同名阶段多次执行时累加
    pub fn end_phase(&mut self, phase_name: &str) -> Option<Duration> {
        let position = self
            .phase_start_times
            .iter()
            .position(|(name, _)| name == phase_name)?;
        let (_, start_time) = self.phase_start_times.remove(position);
        let duration = start_time.elapsed();

        match self
            .phase_durations
            .iter_mut()
            .find(|(name, _)| name == phase_name)
        {
            Some((_, total)) => *total += duration,
            None => self
                .phase_durations
                .push((phase_name.to_string(), duration)),
        }
        Some(duration)
    }

    /// 获取总执行时间
    pub fn get_total_duration(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn get_phase_durations(&self) -> &[(String, Duration)] {
        &self.phase_durations
    }

    /// 获取格式化的执行时间报告
    pub fn generate_timing_report(&self) -> String {
        let mut report = format!(
            "总执行时间: {:.2}秒\n",
            self.get_total_duration().as_secs_f64()
        );

        if !self.phase_durations.is_empty() {
            report.push_str("\n各阶段执行时间:\n");
            for (phase, duration) in &self.phase_durations {
                report.push_str(&format!("- {}: {:.3}秒\n", phase, duration.as_secs_f64()));
            }
        }

        report
    }
}

/// 时间跟踪常量
pub struct TimingKeys;

impl TimingKeys {
    pub const KEYWORDS: &'static str = "keywords";
    pub const SEARCH: &'static str = "search";
    pub const SUMMARIES: &'static str = "summaries";
    pub const SYNTHESIS: &'static str = "synthesis";
}

/// 流水线级别的失败，每一种都有面向操作者的处理建议
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PipelineError {
    #[error("publication search failed: {0}")]
    Search(SearchError),
    #[error("no publication found for query '{query}'")]
    NoResults { query: String },
    #[error("no publication selected")]
    EmptySelection,
    #[error("selection failed: {0}")]
    Selection(String),
    #[error("{0}")]
    Synthesis(SynthesisError),
}

impl PipelineError {
    /// 给操作者的处理建议
    pub fn remedy(&self) -> &'static str {
        match self {
            PipelineError::Search(SearchError::RateLimited) => {
                "The search service is rate limiting requests. Wait a minute and retry with fewer results, or configure SEMANTIC_SCHOLAR_API_KEY."
            }
            PipelineError::Search(SearchError::NotFound(_)) => {
                "Check the search service base URL in the configuration."
            }
            PipelineError::Search(SearchError::Transport(_)) => {
                "Check the network connection and retry."
            }
            PipelineError::Search(SearchError::Decode(_)) => {
                "The search service returned an unexpected response. Retry later."
            }
            PipelineError::NoResults { .. } => {
                "Rephrase the question with broader or different terms."
            }
            PipelineError::EmptySelection => "Select at least one publication.",
            PipelineError::Selection(_) => "Check the selected positions against the candidate list.",
            PipelineError::Synthesis(_) => {
                "Retry, or switch to the other model (--model efficient|powerful)."
            }
        }
    }
}

/// 文献综述流水线：关键词、检索、逐篇摘要、人工筛选、综述
pub struct PipelineOrchestrator {
    context: GeneratorContext,
    planner: QueryPlanner,
    synthesizer: ReviewSynthesizer,
    resolver: SourceResolver,
    timing: TimingScope,
}

impl PipelineOrchestrator {
    pub fn new(context: GeneratorContext) -> Self {
        let generator = context.generator.clone();
        Self::build(context, generator)
    }

    fn build(context: GeneratorContext, generator: Arc<dyn TextGenerator>) -> Self {
        let config = &context.config;
        let synthesizer = ReviewSynthesizer::new(
            generator.clone(),
            config.target_language,
            config.truncation.clone(),
        )
        .with_strict_sections(config.strict_sections);

        Self {
            planner: QueryPlanner::new(generator),
            synthesizer,
            resolver: SourceResolver::new(config.target_language),
            timing: TimingScope::new(),
            context,
        }
    }

    /// 替换文本生成后端，已有的检索结果不受影响
    pub fn with_generator(self, generator: Arc<dyn TextGenerator>) -> Self {
        let timing = self.timing;
        Self {
            timing,
            ..Self::build(self.context, generator)
        }
    }

    pub fn context(&self) -> &GeneratorContext {
        &self.context
    }

    pub fn timing(&self) -> &TimingScope {
        &self.timing
    }

    /// 关键词提取、检索与逐篇摘要
    pub async fn discover(&mut self, question: &str) -> Result<ReviewRun, PipelineError> {
        let config = &self.context.config;

        println!("🔑 正在提取关键词...");
        self.timing.start_phase(TimingKeys::KEYWORDS);
        let keywords = self.planner.extract_keywords(question).await;
        self.timing.end_phase(TimingKeys::KEYWORDS);
        println!("🔑 关键词: {}", keywords);

        let query = keywords.query();
        let limit = config.max_results.min(SERVICE_MAX_LIMIT);
        println!("🔍 正在检索文献 (最多 {} 篇)...", limit);
        self.timing.start_phase(TimingKeys::SEARCH);
        let result = self.context.search.search(&query, limit).await;
        self.timing.end_phase(TimingKeys::SEARCH);

        let mut publications = result.map_err(|e| {
            tracing::warn!(error = %e, "search failed");
            PipelineError::Search(e)
        })?;
        if publications.is_empty() {
            return Err(PipelineError::NoResults { query });
        }
        println!("📚 找到 {} 篇文献", publications.len());

        self.timing.start_phase(TimingKeys::SUMMARIES);
        self.summarize_all(&mut publications).await;
        self.timing.end_phase(TimingKeys::SUMMARIES);

        Ok(ReviewRun::new(question, keywords, publications))
    }

    /// 逐篇补全详情并生成摘要。单篇失败不影响其他文献
    async fn summarize_all(&self, publications: &mut [Publication]) {
        let config = &self.context.config;
        let pacing = Duration::from_millis(config.pacing_ms);
        let total = publications.len();

        for (i, publication) in publications.iter_mut().enumerate() {
            if i > 0 && !pacing.is_zero() {
                tokio::time::sleep(pacing).await;
            }

            println!(
                "📝 [{}/{}] {}",
                i + 1,
                total,
                publication.title_or_default()
            );

            if config.enrich_details && publication.needs_details() && !publication.paper_id.is_empty() {
                match self.context.search.fetch_details(&publication.paper_id).await {
                    Ok(details) => publication.merge_details(details),
                    Err(e) => tracing::warn!(
                        paper_id = %publication.paper_id,
                        error = %e,
                        "failed to fetch publication details"
                    ),
                }
            }

            let summary = if config.summarize_items {
                self.synthesizer.summarize_one(publication).await
            } else {
                self.resolver.resolve(publication)
            };
            if !publication.set_resolved_summary(summary) {
                publication.set_resolved_summary(self.resolver.resolve(publication));
            }
        }
    }

    /// 通过筛选界面选出参与综述的文献
    pub fn curate(
        &self,
        run: &ReviewRun,
        surface: &dyn SelectionSurface,
    ) -> Result<Vec<Publication>, PipelineError> {
        let indices = surface
            .select(run.publications())
            .map_err(|e| PipelineError::Selection(e.to_string()))?;

        let selection = run.pick(&indices);
        if selection.is_empty() {
            return Err(PipelineError::EmptySelection);
        }
        Ok(selection)
    }

    /// 基于选中的文献生成综述
    pub async fn synthesize(
        &mut self,
        run: &ReviewRun,
        selection: &[Publication],
    ) -> Result<ReviewDocument, PipelineError> {
        if selection.is_empty() {
            return Err(PipelineError::EmptySelection);
        }

        println!(
            "✍️ 正在基于 {} 篇文献生成综述 (模型: {})...",
            selection.len(),
            self.synthesizer.model_name()
        );
        self.timing.start_phase(TimingKeys::SYNTHESIS);
        let result = self
            .synthesizer
            .synthesize_review(selection, run.question())
            .await;
        self.timing.end_phase(TimingKeys::SYNTHESIS);

        let document = result.map_err(PipelineError::Synthesis)?;
        println!("✅ 综述生成完成 ({} 词)", document.word_count());
        Ok(document)
    }

    /// 从问题到综述的完整流程
    pub async fn execute(
        &mut self,
        question: &str,
        surface: &dyn SelectionSurface,
    ) -> Result<(ReviewRun, ReviewDocument), PipelineError> {
        let run = self.discover(question).await?;
        let selection = self.curate(&run, surface)?;
        let document = self.synthesize(&run, &selection).await?;
        Ok((run, document))
    }
}

fn report_failure(err: &PipelineError, config: &Config) {
    if let PipelineError::Synthesis(synthesis_error) = err {
        eprintln!("❌ {}", synthesis_error.failure_marker(config.target_language));
        tracing::warn!(error = %synthesis_error, "review synthesis failed");
    } else {
        eprintln!("❌ {}", err);
    }
    eprintln!("💡 {}", err.remedy());
}

/// 综述失败后询问是否重试，返回下一次使用的模型档位
fn ask_retry(current: ModelPreference, config: &Config) -> Result<Option<ModelPreference>> {
    let retry = Confirm::new()
        .with_prompt("Retry the review with a new selection?")
        .default(true)
        .interact()?;
    if !retry {
        return Ok(None);
    }

    let other = current.other();
    let options = [
        format!("Keep {}", model_label(current, config)),
        format!("Switch to {}", model_label(other, config)),
    ];
    let choice = Select::new()
        .with_prompt("Model for the next attempt")
        .items(&options)
        .default(0)
        .interact()?;
    Ok(Some(if choice == 0 { current } else { other }))
}

fn model_label(preference: ModelPreference, config: &Config) -> String {
    let model = match preference {
        ModelPreference::Efficient => &config.llm.model_efficient,
        ModelPreference::Powerful => &config.llm.model_powerful,
    };
    format!("{:?} ({})", preference, model)
}

/// 启动文献综述工作流
pub async fn launch(config: &Config, question: &str, mode: &SelectionMode) -> Result<()> {
    config.validate()?;

    let context = GeneratorContext::new(config.clone())?;
    println!("🔐 LLM API key: configured (model {})", config.llm.active_model());
    println!("🌐 输出语言: {}", config.target_language.display_name());
    if context.search.has_credential() {
        println!("🔐 Semantic Scholar API key: configured");
    } else {
        println!("🔓 Semantic Scholar API key: not configured, public rate limits apply");
    }

    let mut preference = context.preference();
    let mut orchestrator = PipelineOrchestrator::new(context.clone());

    let run = match orchestrator.discover(question).await {
        Ok(run) => run,
        Err(e) => {
            report_failure(&e, config);
            return Err(e.into());
        }
    };
    tracing::info!(run_id = %run.id(), hits = run.publications().len(), "discovery finished");

    let document = loop {
        let surface = mode.surface(config.target_language, config.preview_expanded);
        let attempt = match orchestrator.curate(&run, surface.as_ref()) {
            Ok(selection) => orchestrator.synthesize(&run, &selection).await,
            Err(e) => Err(e),
        };

        let err = match attempt {
            Ok(document) => break document,
            Err(e) => e,
        };
        report_failure(&err, config);

        if !mode.is_interactive() {
            return Err(err.into());
        }
        match ask_retry(preference, config)? {
            Some(next) => {
                if next != preference {
                    println!("🔄 切换模型: {}", model_label(next, config));
                    orchestrator = orchestrator.with_generator(context.generator_for(next));
                    preference = next;
                }
            }
            None => return Err(err.into()),
        }
    };

    if !document.is_complete() {
        println!("⚠️ 综述缺少章节: {:?}", document.missing_sections());
    }

    let outlet = DiskOutlet::new(config.output_path.clone(), config.target_language);
    outlet.save(&document).await?;

    if config.verbose {
        println!("\n{}", orchestrator.timing().generate_timing_report());
    }

    Ok(())
}
