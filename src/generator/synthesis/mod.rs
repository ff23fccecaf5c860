//! 逐篇摘要与综述生成

use std::sync::Arc;
use thiserror::Error;

use crate::config::TruncationConfig;
use crate::generator::prompt::PromptTemplate;
use crate::generator::resolver::{SourceResolver, SummarySource};
use crate::i18n::{ReviewSection, TargetLanguage};
use crate::llm::{GenerationError, TextGenerator};
use crate::types::Publication;
use crate::utils::text::{excerpt_with_marker, truncate_chars};

pub mod document;

pub use document::ReviewDocument;

/// 综述中每篇文献最多列出的作者数
pub const MAX_LISTED_AUTHORS: usize = 3;

/// 截断标记
const ELLIPSIS: &str = "...";

/// 综述生成失败的分类，调用方应展示固定的失败提示而不是残缺文档
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SynthesisError {
    #[error("no publication was selected for the review")]
    EmptySelection,
    #[error("review generation failed: {0}")]
    Generation(GenerationError),
    #[error("the model returned an empty review")]
    EmptyOutput,
    #[error("the review is missing mandatory sections: {0:?}")]
    MissingSections(Vec<ReviewSection>),
}

impl SynthesisError {
    /// 替代文档展示给操作者的固定提示
    pub fn failure_marker(&self, language: TargetLanguage) -> &'static str {
        language.review_failure_marker()
    }
}

impl From<GenerationError> for SynthesisError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::EmptyResponse => SynthesisError::EmptyOutput,
            other => SynthesisError::Generation(other),
        }
    }
}

/// 逐篇摘要与最终综述的生成器
pub struct ReviewSynthesizer {
    generator: Arc<dyn TextGenerator>,
    resolver: SourceResolver,
    language: TargetLanguage,
    truncation: TruncationConfig,
    strict_sections: bool,
}

impl ReviewSynthesizer {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        language: TargetLanguage,
        truncation: TruncationConfig,
    ) -> Self {
        Self {
            generator,
            resolver: SourceResolver::new(language),
            language,
            truncation,
            strict_sections: true,
        }
    }

    pub fn with_strict_sections(mut self, strict: bool) -> Self {
        self.strict_sections = strict;
        self
    }

    pub fn model_name(&self) -> &str {
        self.generator.model_name()
    }

    /// 生成非空文本，失败时返回生成结果以外的非空回退
    async fn generate_or(&self, prompt: &str, fallback: impl FnOnce() -> String) -> String {
        match self.generator.generate(prompt).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => fallback(),
            Err(e) => {
                tracing::warn!(error = %e, "per-item summarization failed, using fallback text");
                fallback()
            }
        }
    }

    /// 为单篇文献生成简短摘要，总是返回非空文本
    pub async fn summarize_one(&self, publication: &Publication) -> String {
        match SummarySource::pick(publication) {
            SummarySource::Abstract(text) => {
                let prompt = self.abstract_prompt(publication, text);
                self.generate_or(&prompt, || {
                    excerpt_with_marker(text, self.truncation.fallback_chars, ELLIPSIS)
                })
                .await
            }
            SummarySource::Tldr(text) => {
                let prompt = self.tldr_prompt(publication, text);
                self.generate_or(&prompt, || text.to_string()).await
            }
            link_or_nothing => self.resolver.describe(link_or_nothing),
        }
    }

    fn abstract_prompt(&self, publication: &Publication, text: &str) -> String {
        let template = PromptTemplate {
            opening_instruction: "Summarize this scientific article in 2-3 sentences at most. Focus on the main contribution and the key results.".to_string(),
            closing_instruction: self.language.prompt_instruction().to_string(),
        };
        template.render(&format!(
            "Title: {}\nYear: {}\nAbstract: {}",
            publication.title_or_default(),
            publication.year_label(self.language.not_available()),
            truncate_chars(text, self.truncation.summary_prompt_chars)
        ))
    }

    fn tldr_prompt(&self, publication: &Publication, text: &str) -> String {
        let template = PromptTemplate {
            opening_instruction: "Translate and rephrase this summary in 2-3 sentences."
                .to_string(),
            closing_instruction: self.language.prompt_instruction().to_string(),
        };
        template.render(&format!(
            "Title: {}\nTLDR: {}",
            publication.title_or_default(),
            text
        ))
    }

    /// 综述提示词中单篇文献的描述：截断摘要 > 自动摘要 > 已生成的摘要
    fn review_description(&self, publication: &Publication) -> String {
        let limit = self.truncation.review_prompt_chars;
        if let Some(text) = publication.abstract_text() {
            truncate_chars(text, limit).to_string()
        } else if let Some(text) = publication.tldr_text() {
            text.to_string()
        } else if let Some(text) = publication.resolved_summary() {
            truncate_chars(text, limit).to_string()
        } else {
            self.language.not_available().to_string()
        }
    }

    fn format_articles(&self, publications: &[Publication]) -> String {
        let unknown = self.language.not_available();
        publications
            .iter()
            .enumerate()
            .map(|(i, publication)| {
                format!(
                    "Article {}:\n- Title: {}\n- Authors: {}\n- Year: {}\n- Citations: {}\n- Summary: {}",
                    i + 1,
                    publication.title_or_default(),
                    publication.author_line(MAX_LISTED_AUTHORS, self.language.more_authors_suffix()),
                    publication.year_label(unknown),
                    publication.citation_count,
                    self.review_description(publication)
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// 构建综述提示词
    pub fn build_review_prompt(&self, publications: &[Publication], question: &str) -> String {
        let heading = |section| self.language.section_heading(section);

        let template = PromptTemplate {
            opening_instruction: format!(
                r#"You are an expert researcher. Write a complete and structured scientific literature review on the following question: "{}"

Use the scientific articles below as the basis of the review."#,
                question
            ),
            closing_instruction: format!(
                r#"Structure the review in FOUR mandatory sections, each introduced by a Markdown heading exactly as written below:

## 1. {}  (1 paragraph)
   - Set the scene for the problem
   - Explain why the topic matters

## 2. {}  (about 60% of the content)
   - Present the major contributions of each article
   - Organize them by theme or approach
   - Cite authors and years in parentheses
   - Compare methods and results

## 3. {}  (about 20% of the content)
   - Identify the limits of current approaches
   - Unresolved points in the literature
   - Contradictions or debates

## 4. {}  (about 20% of the content)
   - Promising future directions
   - Open questions
   - Recommendations for future work

GUIDELINES:
- Length: about 1000-1200 words of prose
- Style: academic but accessible
- Synthesis: group similar works together
- Citations: mention authors and years
- Objectivity: present strengths AND weaknesses

{}

Write the complete literature review now."#,
                heading(ReviewSection::Introduction),
                heading(ReviewSection::ExistingWork),
                heading(ReviewSection::Limitations),
                heading(ReviewSection::Perspectives),
                self.language.prompt_instruction()
            ),
        };

        template.render(&self.format_articles(publications))
    }

    /// 基于人工筛选的文献生成综述
    pub async fn synthesize_review(
        &self,
        publications: &[Publication],
        question: &str,
    ) -> Result<ReviewDocument, SynthesisError> {
        if publications.is_empty() {
            return Err(SynthesisError::EmptySelection);
        }

        let prompt = self.build_review_prompt(publications, question);
        let text = self.generator.generate(&prompt).await?;
        if text.trim().is_empty() {
            return Err(SynthesisError::EmptyOutput);
        }

        let document = ReviewDocument::new(text, self.language);
        if !document.is_complete() {
            tracing::warn!(missing = ?document.missing_sections(), "review is missing sections");
            if self.strict_sections {
                return Err(SynthesisError::MissingSections(
                    document.missing_sections().to_vec(),
                ));
            }
        }
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::testing::{ScriptedGenerator, publication};
    use crate::types::{Author, OpenAccessPdf, Tldr};

    const REVIEW: &str = "## 1. Introduction\nA.\n## 2. Existing Work\nB.\n## 3. Limitations\nC.\n## 4. Perspectives\nD.\n";

    fn synthesizer(generator: &Arc<ScriptedGenerator>) -> ReviewSynthesizer {
        ReviewSynthesizer::new(
            generator.clone(),
            TargetLanguage::English,
            TruncationConfig::default(),
        )
    }

    fn with_abstract(text: &str) -> Publication {
        Publication {
            r#abstract: Some(text.to_string()),
            ..publication("p1", "Paper")
        }
    }

    fn with_tldr(text: &str) -> Publication {
        Publication {
            r#abstract: Some(String::new()),
            tldr: Some(Tldr {
                model: None,
                text: Some(text.to_string()),
            }),
            ..publication("p2", "Paper")
        }
    }

    #[tokio::test]
    async fn test_abstract_branch_uses_generated_synopsis() {
        let generator = Arc::new(ScriptedGenerator::always(Ok("Generated synopsis.".into())));

        let summary = synthesizer(&generator)
            .summarize_one(&with_abstract("We study robots."))
            .await;

        assert_eq!(summary, "Generated synopsis.");
        let prompts = generator.prompts();
        assert!(prompts[0].contains("Abstract: We study robots."));
        assert!(prompts[0].contains("2-3 sentences"));
    }

    #[tokio::test]
    async fn test_abstract_prompt_is_bounded() {
        let generator = Arc::new(ScriptedGenerator::always(Ok("ok".into())));
        let long_abstract = "x".repeat(5000);

        synthesizer(&generator)
            .summarize_one(&with_abstract(&long_abstract))
            .await;

        let prompt = &generator.prompts()[0];
        assert!(prompt.contains(&"x".repeat(1000)));
        assert!(!prompt.contains(&"x".repeat(1001)));
    }

    #[tokio::test]
    async fn test_abstract_failure_falls_back_to_truncated_abstract() {
        let generator = Arc::new(ScriptedGenerator::always(Err(GenerationError::Backend(
            "down".into(),
        ))));
        let long_abstract = "word ".repeat(200);

        let summary = synthesizer(&generator)
            .summarize_one(&with_abstract(&long_abstract))
            .await;

        assert_eq!(summary.chars().count(), 300 + ELLIPSIS.len());
        assert!(summary.ends_with(ELLIPSIS));
    }

    #[tokio::test]
    async fn test_short_abstract_fallback_still_marked_as_excerpt() {
        let generator = Arc::new(ScriptedGenerator::always(Err(GenerationError::EmptyResponse)));

        let summary = synthesizer(&generator)
            .summarize_one(&with_abstract("We study robots."))
            .await;

        assert_eq!(summary, "We study robots....");
    }

    #[tokio::test]
    async fn test_empty_abstract_takes_tldr_branch() {
        let generator = Arc::new(ScriptedGenerator::always(Ok("Reformulated.".into())));

        let summary = synthesizer(&generator)
            .summarize_one(&with_tldr("Short auto summary."))
            .await;

        assert_eq!(summary, "Reformulated.");
        let prompt = &generator.prompts()[0];
        assert!(prompt.contains("TLDR: Short auto summary."));
        assert!(!prompt.contains("Abstract:"));
    }

    #[tokio::test]
    async fn test_tldr_failure_returns_raw_tldr() {
        let generator = Arc::new(ScriptedGenerator::always(Ok("   ".into())));

        let summary = synthesizer(&generator)
            .summarize_one(&with_tldr("Short auto summary."))
            .await;

        assert_eq!(summary, "Short auto summary.");
    }

    #[tokio::test]
    async fn test_link_tiers_never_call_the_model() {
        let generator = Arc::new(ScriptedGenerator::always(Ok("invented prose".into())));
        let synthesizer = synthesizer(&generator);

        let pdf_only = Publication {
            open_access_pdf: Some(OpenAccessPdf {
                url: Some("https://example.org/p.pdf".into()),
                status: None,
            }),
            ..publication("p3", "Paper")
        };
        let url_only = Publication {
            url: Some("https://example.org/p".into()),
            ..publication("p4", "Paper")
        };

        let pdf_summary = synthesizer.summarize_one(&pdf_only).await;
        let url_summary = synthesizer.summarize_one(&url_only).await;
        let nothing = synthesizer.summarize_one(&publication("p5", "Paper")).await;

        assert_eq!(generator.calls(), 0);
        assert!(pdf_summary.ends_with("https://example.org/p.pdf"));
        assert!(url_summary.contains("See the full article: https://example.org/p"));
        assert_eq!(nothing, TargetLanguage::English.summary_unavailable());
    }

    #[tokio::test]
    async fn test_tier_decision_is_deterministic() {
        let generator = Arc::new(ScriptedGenerator::always(Err(GenerationError::EmptyResponse)));
        let synthesizer = synthesizer(&generator);
        let item = with_tldr("Stable.");

        let first = synthesizer.summarize_one(&item).await;
        let second = synthesizer.summarize_one(&item).await;

        assert_eq!(first, second);
        let prompts = generator.prompts();
        assert_eq!(prompts[0], prompts[1]);
    }

    #[test]
    fn test_review_prompt_lists_authors_and_priorities() {
        let generator = Arc::new(ScriptedGenerator::always(Ok(REVIEW.into())));
        let synthesizer = synthesizer(&generator);

        let mut first = with_abstract(&"a".repeat(900));
        first.authors = ["Ada", "Grace", "Alan", "Edsger"]
            .iter()
            .map(|n| Author {
                author_id: None,
                name: Some(n.to_string()),
            })
            .collect();
        first.year = Some(2021);
        first.citation_count = 42;

        let second = with_tldr("Auto summary.");

        let mut third = publication("p6", "Linked only");
        third.set_resolved_summary("Previously resolved text.");

        let prompt = synthesizer.build_review_prompt(&[first, second, third], "robot learning");

        assert!(prompt.contains("\"robot learning\""));
        assert!(prompt.contains("- Authors: Ada, Grace, Alan et al."));
        assert!(prompt.contains("- Year: 2021"));
        assert!(prompt.contains("- Citations: 42"));
        assert!(prompt.contains(&format!("- Summary: {}\n", "a".repeat(800))));
        assert!(prompt.contains("- Summary: Auto summary."));
        assert!(prompt.contains("- Summary: Previously resolved text."));
        assert!(prompt.contains("Article 3:"));
        for heading in ["## 1. Introduction", "## 2. Existing Work", "## 3. Limitations", "## 4. Perspectives"] {
            assert!(prompt.contains(heading));
        }
        assert!(prompt.contains("1000-1200 words"));
    }

    #[tokio::test]
    async fn test_synthesize_review_success() {
        let generator = Arc::new(ScriptedGenerator::always(Ok(REVIEW.into())));

        let items = vec![
            with_abstract("One."),
            with_abstract("Two."),
            with_tldr("Three."),
        ];
        let document = synthesizer(&generator)
            .synthesize_review(&items, "question")
            .await
            .unwrap();

        assert_eq!(document.text(), REVIEW);
        assert!(document.is_complete());
    }

    #[tokio::test]
    async fn test_synthesize_review_empty_output_is_failure() {
        let generator = Arc::new(ScriptedGenerator::always(Ok("  \n".into())));

        let result = synthesizer(&generator)
            .synthesize_review(&[with_abstract("One.")], "question")
            .await;

        let err = result.unwrap_err();
        assert_eq!(err, SynthesisError::EmptyOutput);
        assert!(!err.failure_marker(TargetLanguage::English).is_empty());
    }

    #[tokio::test]
    async fn test_synthesize_review_backend_error() {
        let generator = Arc::new(ScriptedGenerator::always(Err(GenerationError::EmptyResponse)));

        let result = synthesizer(&generator)
            .synthesize_review(&[with_abstract("One.")], "question")
            .await;

        assert_eq!(result.unwrap_err(), SynthesisError::EmptyOutput);
    }

    #[tokio::test]
    async fn test_synthesize_review_missing_section() {
        let partial = REVIEW.replace("## 4. Perspectives\nD.\n", "");
        let generator = Arc::new(ScriptedGenerator::always(Ok(partial.clone())));

        let strict = synthesizer(&generator)
            .synthesize_review(&[with_abstract("One.")], "q")
            .await;
        assert_eq!(
            strict.unwrap_err(),
            SynthesisError::MissingSections(vec![ReviewSection::Perspectives])
        );

        let lenient = synthesizer(&generator)
            .with_strict_sections(false)
            .synthesize_review(&[with_abstract("One.")], "q")
            .await
            .unwrap();
        assert_eq!(lenient.text(), partial);
    }

    #[tokio::test]
    async fn test_synthesize_review_rejects_empty_selection() {
        let generator = Arc::new(ScriptedGenerator::always(Ok(REVIEW.into())));

        let result = synthesizer(&generator).synthesize_review(&[], "q").await;

        assert_eq!(result.unwrap_err(), SynthesisError::EmptySelection);
        assert_eq!(generator.calls(), 0);
    }
}
