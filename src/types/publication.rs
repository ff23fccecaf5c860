//! Semantic Scholar 文献记录

use serde::{Deserialize, Deserializer, Serialize};

/// 作者引用
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    #[serde(default)]
    pub author_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// 检索服务自动生成的简短摘要
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tldr {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

/// 开放获取PDF信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenAccessPdf {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// 外部标识
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExternalIds {
    #[serde(rename = "DOI", default)]
    pub doi: Option<String>,
    #[serde(rename = "ArXiv", default)]
    pub arxiv: Option<String>,
    #[serde(rename = "PubMed", default)]
    pub pubmed: Option<String>,
    #[serde(rename = "CorpusId", default)]
    pub corpus_id: Option<i64>,
}

/// 一条检索到的文献
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Publication {
    /// 详情查询使用的稳定标识
    #[serde(default)]
    pub paper_id: String,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub authors: Vec<Author>,

    #[serde(default)]
    pub year: Option<i32>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub citation_count: u32,

    #[serde(default)]
    pub publication_date: Option<String>,

    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub r#abstract: Option<String>,

    #[serde(default)]
    pub tldr: Option<Tldr>,

    #[serde(default)]
    pub open_access_pdf: Option<OpenAccessPdf>,

    #[serde(default)]
    pub external_ids: Option<ExternalIds>,

    #[serde(default)]
    pub reference_count: Option<u32>,

    /// 回退链或逐篇摘要得到的描述，赋值后必不为空
    #[serde(skip_deserializing, default)]
    pub(crate) resolved_summary: Option<String>,
}

/// 详情接口返回的引用条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperRef {
    #[serde(default)]
    pub paper_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

/// 详情接口的扩展字段
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicationDetails {
    #[serde(flatten)]
    pub publication: Publication,
    #[serde(default, deserialize_with = "null_as_default")]
    pub references: Vec<PaperRef>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub citations: Vec<PaperRef>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

impl Publication {
    pub fn title_or_default(&self) -> &str {
        non_blank(self.title.as_deref()).unwrap_or("Untitled")
    }

    /// 年份，缺失时返回给定的占位文本
    pub fn year_label(&self, unknown: &str) -> String {
        self.year
            .map(|y| y.to_string())
            .unwrap_or_else(|| unknown.to_string())
    }

    /// 非空白的摘要
    pub fn abstract_text(&self) -> Option<&str> {
        non_blank(self.r#abstract.as_deref())
    }

    /// 非空白的自动摘要
    pub fn tldr_text(&self) -> Option<&str> {
        non_blank(self.tldr.as_ref()?.text.as_deref())
    }

    pub fn pdf_url(&self) -> Option<&str> {
        non_blank(self.open_access_pdf.as_ref()?.url.as_deref())
    }

    pub fn article_url(&self) -> Option<&str> {
        non_blank(self.url.as_deref())
    }

    pub fn doi(&self) -> Option<&str> {
        self.external_ids.as_ref()?.doi.as_deref()
    }

    /// 作者列表，最多显示 `limit` 位，超出时追加后缀
    pub fn author_line(&self, limit: usize, suffix: &str) -> String {
        let names: Vec<&str> = self
            .authors
            .iter()
            .filter_map(|a| a.name.as_deref())
            .collect();
        let mut line = names
            .iter()
            .take(limit)
            .copied()
            .collect::<Vec<_>>()
            .join(", ");
        if names.len() > limit {
            line.push_str(suffix);
        }
        line
    }

    /// 摘要、自动摘要、开放获取链接全部缺失，需要查询详情
    pub fn needs_details(&self) -> bool {
        self.abstract_text().is_none() && self.tldr_text().is_none() && self.pdf_url().is_none()
    }

    pub fn resolved_summary(&self) -> Option<&str> {
        self.resolved_summary.as_deref()
    }

    /// 写入描述文本。空白文本被拒绝，返回是否写入
    pub fn set_resolved_summary(&mut self, summary: impl Into<String>) -> bool {
        let summary = summary.into();
        if summary.trim().is_empty() {
            return false;
        }
        self.resolved_summary = Some(summary);
        true
    }

    /// 用详情接口的数据补全缺失字段，已有字段保持不变
    pub fn merge_details(&mut self, details: PublicationDetails) {
        let PublicationDetails {
            publication: mut extra,
            references,
            ..
        } = details;

        if self.abstract_text().is_none() && extra.abstract_text().is_some() {
            self.r#abstract = extra.r#abstract.take();
        }
        if self.tldr_text().is_none() && extra.tldr_text().is_some() {
            self.tldr = extra.tldr.take();
        }
        if self.pdf_url().is_none() && extra.pdf_url().is_some() {
            self.open_access_pdf = extra.open_access_pdf.take();
        }
        if self.article_url().is_none() && extra.article_url().is_some() {
            self.url = extra.url.take();
        }
        if self.external_ids.is_none() {
            self.external_ids = extra.external_ids;
        }
        if self.year.is_none() {
            self.year = extra.year;
        }
        self.citation_count = self.citation_count.max(extra.citation_count);
        if self.reference_count.is_none() && !references.is_empty() {
            self.reference_count = Some(references.len() as u32);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author(name: &str) -> Author {
        Author {
            author_id: None,
            name: Some(name.to_string()),
        }
    }

    #[test]
    fn test_deserialize_search_item_with_nulls() {
        let json = r#"{
            "paperId": "abc123",
            "title": "Deep RL for Manipulation",
            "abstract": null,
            "authors": [{"authorId": "1", "name": "Ada Lovelace"}],
            "year": null,
            "citationCount": null,
            "url": "https://www.semanticscholar.org/paper/abc123",
            "tldr": {"model": "tldr@v2.0.0", "text": "A short summary."},
            "openAccessPdf": null
        }"#;

        let publication: Publication = serde_json::from_str(json).unwrap();

        assert_eq!(publication.paper_id, "abc123");
        assert_eq!(publication.citation_count, 0);
        assert_eq!(publication.year_label("unknown"), "unknown");
        assert!(publication.abstract_text().is_none());
        assert_eq!(publication.tldr_text(), Some("A short summary."));
        assert!(publication.pdf_url().is_none());
        assert!(publication.resolved_summary().is_none());
    }

    #[test]
    fn test_whitespace_fields_count_as_missing() {
        let publication = Publication {
            paper_id: "p".into(),
            r#abstract: Some("   \n".into()),
            url: Some(" ".into()),
            tldr: Some(Tldr {
                model: None,
                text: Some("".into()),
            }),
            ..Default::default()
        };

        assert!(publication.abstract_text().is_none());
        assert!(publication.tldr_text().is_none());
        assert!(publication.article_url().is_none());
        assert!(publication.needs_details());
    }

    #[test]
    fn test_author_line_truncates_with_suffix() {
        let mut publication = Publication::default();
        publication.authors = vec![author("A"), author("B"), author("C"), author("D")];
        assert_eq!(publication.author_line(3, " et al."), "A, B, C et al.");

        publication.authors.truncate(3);
        assert_eq!(publication.author_line(3, " et al."), "A, B, C");
    }

    #[test]
    fn test_resolved_summary_rejects_blank() {
        let mut publication = Publication::default();

        assert!(!publication.set_resolved_summary("  "));
        assert!(publication.resolved_summary().is_none());

        assert!(publication.set_resolved_summary("A synopsis."));
        assert_eq!(publication.resolved_summary(), Some("A synopsis."));
    }

    #[test]
    fn test_merge_details_fills_only_missing_fields() {
        let mut publication = Publication {
            paper_id: "p1".into(),
            url: Some("https://example.org/original".into()),
            citation_count: 3,
            ..Default::default()
        };

        let json = r#"{
            "paperId": "p1",
            "url": "https://example.org/other",
            "citationCount": 7,
            "tldr": {"text": "Detail summary."},
            "openAccessPdf": {"url": "https://example.org/p1.pdf", "status": "GREEN"},
            "externalIds": {"DOI": "10.1000/xyz"},
            "references": [{"paperId": "r1", "title": "Ref"}],
            "citations": null
        }"#;
        let details: PublicationDetails = serde_json::from_str(json).unwrap();

        publication.merge_details(details);

        assert_eq!(publication.article_url(), Some("https://example.org/original"));
        assert_eq!(publication.tldr_text(), Some("Detail summary."));
        assert_eq!(publication.pdf_url(), Some("https://example.org/p1.pdf"));
        assert_eq!(publication.doi(), Some("10.1000/xyz"));
        assert_eq!(publication.citation_count, 7);
        assert_eq!(publication.reference_count, Some(1));
    }
}
