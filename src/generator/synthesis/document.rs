use regex::Regex;
use std::sync::LazyLock;

use crate::i18n::{ReviewSection, TargetLanguage};

/// 标题后允许附带的限定词数量上限，例如 "Perspectives and research directions"
const MAX_QUALIFIER_WORDS: usize = 6;

/// 标题行：Markdown标题、整行加粗，或仅由编号加标题组成的行。编号支持阿拉伯数字与罗马数字
static HEADING_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[ \t]*(?P<hashes>#{1,6})?[ \t]*(?P<open>\*\*|__)?[ \t]*(?P<number>(?:\d+|[IVXLC]+|[ivxlc]+)[.)])?[ \t]*(?P<title>.*?)[ \t]*(?P<close>\*\*|__)?[ \t]*:?[ \t]*$",
    )
    .expect("heading pattern is a valid literal")
});

/// 生成成功的综述文档，原样保留模型输出
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewDocument {
    text: String,
    missing_sections: Vec<ReviewSection>,
}

impl ReviewDocument {
    pub fn new(text: String, language: TargetLanguage) -> Self {
        let missing_sections = missing_sections(&text, language);
        Self {
            text,
            missing_sections,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn missing_sections(&self) -> &[ReviewSection] {
        &self.missing_sections
    }

    pub fn is_complete(&self) -> bool {
        self.missing_sections.is_empty()
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// 标题行去掉标记与编号后的文本（小写）；正文行返回None
fn heading_title(line: &str) -> Option<String> {
    let caps = HEADING_LINE.captures(line)?;
    let is_heading = caps.name("hashes").is_some()
        || caps.name("number").is_some()
        || (caps.name("open").is_some() && caps.name("close").is_some());
    if !is_heading {
        return None;
    }

    let title = caps
        .name("title")
        .map_or("", |m| m.as_str())
        .trim_matches(|c: char| c == '*' || c == '_' || c == ':' || c.is_whitespace());
    if title.is_empty() {
        None
    } else {
        Some(title.to_lowercase())
    }
}

/// 标题文本以章节名开头，其后只允许简短的限定词，不允许整句正文
fn title_matches(title: &str, heading: &str) -> bool {
    let Some(rest) = title.strip_prefix(heading.to_lowercase().as_str()) else {
        return false;
    };
    if rest.chars().next().is_some_and(|c| c.is_ascii_alphanumeric()) {
        return false;
    }
    let rest = rest.trim();
    !rest.contains(['.', '!', '?']) && rest.split_whitespace().count() <= MAX_QUALIFIER_WORDS
}

/// 检查四个必备章节，返回缺失的章节
pub fn missing_sections(text: &str, language: TargetLanguage) -> Vec<ReviewSection> {
    let titles: Vec<String> = text.lines().filter_map(heading_title).collect();

    ReviewSection::ALL
        .into_iter()
        .filter(|section| {
            let heading = language.section_heading(*section);
            !titles.iter().any(|title| title_matches(title, heading))
        })
        .collect()
}
