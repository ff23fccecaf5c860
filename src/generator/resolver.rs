use crate::i18n::TargetLanguage;
use crate::types::Publication;

/// 回退链中第一个可用的信息来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummarySource<'a> {
    /// 原始摘要
    Abstract(&'a str),
    /// 检索服务自动生成的简短摘要
    Tldr(&'a str),
    /// 开放获取PDF链接
    OpenAccessPdf(&'a str),
    /// 文章页面链接
    ArticleUrl(&'a str),
    /// 没有任何可用信息
    Unavailable,
}

impl<'a> SummarySource<'a> {
    /// 按固定顺序选择来源，遇到第一个可用信号即停止
    pub fn pick(publication: &'a Publication) -> Self {
        if let Some(text) = publication.abstract_text() {
            SummarySource::Abstract(text)
        } else if let Some(text) = publication.tldr_text() {
            SummarySource::Tldr(text)
        } else if let Some(url) = publication.pdf_url() {
            SummarySource::OpenAccessPdf(url)
        } else if let Some(url) = publication.article_url() {
            SummarySource::ArticleUrl(url)
        } else {
            SummarySource::Unavailable
        }
    }
}

/// 为单篇文献解析描述文本，总是返回非空文本
#[derive(Debug, Clone, Copy)]
pub struct SourceResolver {
    language: TargetLanguage,
}

impl SourceResolver {
    pub fn new(language: TargetLanguage) -> Self {
        Self { language }
    }

    pub fn resolve(&self, publication: &Publication) -> String {
        self.describe(SummarySource::pick(publication))
    }

    /// 将来源转为文本。链接类来源只给出链接，不生成任何概述
    pub fn describe(&self, source: SummarySource<'_>) -> String {
        match source {
            SummarySource::Abstract(text) | SummarySource::Tldr(text) => text.to_string(),
            SummarySource::OpenAccessPdf(url) => self.language.open_access_notice(url),
            SummarySource::ArticleUrl(url) => self.language.see_article_notice(url),
            SummarySource::Unavailable => self.language.summary_unavailable().to_string(),
        }
    }
}
