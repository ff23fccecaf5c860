use std::sync::Arc;

use crate::generator::prompt::PromptTemplate;
use crate::llm::TextGenerator;

/// 关键词数量上限
pub const MAX_KEYWORDS: usize = 5;

/// 一次提问得到的检索关键词，保证非空且不超过上限
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordSet(Vec<String>);

impl KeywordSet {
    /// 仅包含原始问题的关键词集合
    pub fn from_question(question: &str) -> Self {
        Self(vec![question.to_string()])
    }

    /// 解析逗号分隔的模型输出，没有可用项时返回None
    pub fn parse(response: &str) -> Option<Self> {
        let keywords: Vec<String> = response
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .take(MAX_KEYWORDS)
            .map(str::to_string)
            .collect();

        if keywords.is_empty() {
            None
        } else {
            Some(Self(keywords))
        }
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// 检索使用的查询串
    pub fn query(&self) -> String {
        self.0.join(" ")
    }
}

impl std::fmt::Display for KeywordSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.join(", "))
    }
}

/// 把自然语言问题转为检索关键词
pub struct QueryPlanner {
    generator: Arc<dyn TextGenerator>,
}

impl QueryPlanner {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    fn prompt_template() -> PromptTemplate {
        PromptTemplate {
            opening_instruction: r#"Analyze the following technical question and extract 3-5 keywords or key phrases in English, suitable for searching scientific articles."#
                .to_string(),
            closing_instruction: r#"Answer only with the keywords separated by commas, without numbering.
Example: deep learning, neural networks, image classification"#
                .to_string(),
        }
    }

    pub fn build_prompt(question: &str) -> String {
        Self::prompt_template().render(&format!("Question: {}", question))
    }

    /// 提取关键词。调用失败或输出不可用时回退为原始问题
    pub async fn extract_keywords(&self, question: &str) -> KeywordSet {
        let prompt = Self::build_prompt(question);

        match self.generator.generate(&prompt).await {
            Ok(response) => KeywordSet::parse(&response).unwrap_or_else(|| {
                tracing::warn!("keyword extraction produced no usable entries");
                println!("⚠️ 无法提取关键词，使用完整问题进行检索");
                KeywordSet::from_question(question)
            }),
            Err(e) => {
                tracing::warn!(error = %e, "keyword extraction failed");
                println!("⚠️ 关键词提取失败，使用完整问题进行检索: {}", e);
                KeywordSet::from_question(question)
            }
        }
    }
}
