//! 候选文献的人工筛选

use anyhow::{Result, bail};
use dialoguer::MultiSelect;

use crate::i18n::TargetLanguage;
use crate::types::Publication;

/// 筛选界面。返回被选中条目的下标（从0开始），顺序与候选列表一致
pub trait SelectionSurface {
    fn select(&self, candidates: &[Publication]) -> Result<Vec<usize>>;
}

/// 全部选中，用于非交互运行
pub struct AcceptAllSelection;

impl SelectionSurface for AcceptAllSelection {
    fn select(&self, candidates: &[Publication]) -> Result<Vec<usize>> {
        Ok((0..candidates.len()).collect())
    }
}

/// 按预先给定的序号选择（序号从1开始）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSelection {
    positions: Vec<usize>,
}

impl IndexSelection {
    pub fn new(positions: Vec<usize>) -> Self {
        Self { positions }
    }

    /// 解析逗号分隔的序号，例如 "1,3,5"
    pub fn parse(input: &str) -> Result<Self> {
        let mut positions = Vec::new();
        for part in input.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            match part.parse::<usize>() {
                Ok(0) | Err(_) => bail!("invalid selection entry '{}': expected a number starting at 1", part),
                Ok(position) => positions.push(position),
            }
        }
        Ok(Self { positions })
    }
}

impl SelectionSurface for IndexSelection {
    fn select(&self, candidates: &[Publication]) -> Result<Vec<usize>> {
        let mut indices = Vec::with_capacity(self.positions.len());
        for &position in &self.positions {
            if position == 0 || position > candidates.len() {
                bail!(
                    "selection entry {} is out of range: {} candidates available",
                    position,
                    candidates.len()
                );
            }
            indices.push(position - 1);
        }
        indices.sort_unstable();
        indices.dedup();
        Ok(indices)
    }
}

/// 终端多选界面，默认全部选中
pub struct TerminalSelection {
    language: TargetLanguage,
    preview_expanded: usize,
}

impl TerminalSelection {
    pub fn new(language: TargetLanguage, preview_expanded: usize) -> Self {
        Self {
            language,
            preview_expanded,
        }
    }

    /// 候选列表预览，前 `preview_expanded` 条附带摘要与DOI
    pub fn render_preview(&self, candidates: &[Publication]) -> String {
        let mut preview = format!("\n📚 候选文献 ({} 篇):\n", candidates.len());
        for (i, publication) in candidates.iter().enumerate() {
            preview.push_str(&candidate_label(i, publication, self.language));
            preview.push('\n');
            if i < self.preview_expanded {
                if let Some(summary) = publication.resolved_summary() {
                    preview.push_str(&format!("     {}\n", summary.replace('\n', "\n     ")));
                }
                if let Some(doi) = publication.doi() {
                    preview.push_str(&format!("     DOI: {}\n", doi));
                }
            }
        }
        preview
    }
}

impl SelectionSurface for TerminalSelection {
    fn select(&self, candidates: &[Publication]) -> Result<Vec<usize>> {
        println!("{}", self.render_preview(candidates));

        let labels: Vec<String> = candidates
            .iter()
            .enumerate()
            .map(|(i, publication)| candidate_label(i, publication, self.language))
            .collect();
        let defaults = vec![true; labels.len()];

        let selection = MultiSelect::new()
            .with_prompt("Select the publications to include (space toggles, enter confirms)")
            .items(&labels)
            .defaults(&defaults)
            .interact()?;
        Ok(selection)
    }
}

/// 运行时采用的筛选方式
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionMode {
    /// 终端交互
    Interactive,
    /// 全部选中
    AcceptAll,
    /// 预先给定的序号
    Indices(IndexSelection),
}

impl SelectionMode {
    pub fn is_interactive(&self) -> bool {
        matches!(self, SelectionMode::Interactive)
    }

    pub fn surface(
        &self,
        language: TargetLanguage,
        preview_expanded: usize,
    ) -> Box<dyn SelectionSurface> {
        match self {
            SelectionMode::Interactive => {
                Box::new(TerminalSelection::new(language, preview_expanded))
            }
            SelectionMode::AcceptAll => Box::new(AcceptAllSelection),
            SelectionMode::Indices(selection) => Box::new(selection.clone()),
        }
    }
}

/// 候选条目的单行描述
pub fn candidate_label(index: usize, publication: &Publication, language: TargetLanguage) -> String {
    format!(
        "{:>2}. {} ({}) · {} citations",
        index + 1,
        publication.title_or_default(),
        publication.year_label(language.not_available()),
        publication.citation_count
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::testing::publication;
    use crate::types::ExternalIds;

    fn candidates() -> Vec<Publication> {
        (1..=4)
            .map(|i| publication(&format!("p{}", i), &format!("Paper {}", i)))
            .collect()
    }

    #[test]
    fn test_accept_all_keeps_order() {
        let selected = AcceptAllSelection.select(&candidates()).unwrap();
        assert_eq!(selected, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_index_selection_is_one_based_and_ordered() {
        let selection = IndexSelection::parse("3, 1,3").unwrap();
        assert_eq!(selection.select(&candidates()).unwrap(), vec![0, 2]);
    }

    #[test]
    fn test_index_selection_rejects_bad_input() {
        assert!(IndexSelection::parse("0").is_err());
        assert!(IndexSelection::parse("one").is_err());
        assert!(IndexSelection::new(vec![5]).select(&candidates()).is_err());
    }

    #[test]
    fn test_empty_index_selection_selects_nothing() {
        let selection = IndexSelection::parse(" ").unwrap();
        assert!(selection.select(&candidates()).unwrap().is_empty());
    }

    #[test]
    fn test_preview_expands_only_leading_items() {
        let mut items = candidates();
        for item in items.iter_mut() {
            let summary = format!("Summary of {}", item.paper_id);
            item.set_resolved_summary(summary);
            item.external_ids = Some(ExternalIds {
                doi: Some(format!("10.1000/{}", item.paper_id)),
                ..Default::default()
            });
        }

        let preview = TerminalSelection::new(TargetLanguage::English, 2).render_preview(&items);

        assert!(preview.contains("Summary of p1"));
        assert!(preview.contains("DOI: 10.1000/p2"));
        assert!(!preview.contains("Summary of p3"));
        assert!(!preview.contains("DOI: 10.1000/p4"));
        assert!(preview.contains(" 4. Paper 4"));
    }

    #[test]
    fn test_candidate_label() {
        let mut item = publication("p1", "Attention Is All You Need");
        item.year = Some(2017);
        item.citation_count = 90000;

        assert_eq!(
            candidate_label(0, &item, TargetLanguage::English),
            " 1. Attention Is All You Need (2017) · 90000 citations"
        );
    }
}
