use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::generator::planner::KeywordSet;
use crate::types::Publication;

/// 一次检索的结果，重新筛选或更换模型重试时复用，不会重新检索
#[derive(Debug, Clone)]
pub struct ReviewRun {
    id: Uuid,
    question: String,
    keywords: KeywordSet,
    publications: Vec<Publication>,
    created_at: DateTime<Utc>,
}

impl ReviewRun {
    pub fn new(question: &str, keywords: KeywordSet, publications: Vec<Publication>) -> Self {
        Self {
            id: Uuid::new_v4(),
            question: question.to_string(),
            keywords,
            publications,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn keywords(&self) -> &KeywordSet {
        &self.keywords
    }

    /// 按检索服务的相关性顺序排列的候选文献
    pub fn publications(&self) -> &[Publication] {
        &self.publications
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// 按下标取出选中的文献，保持候选顺序
    pub fn pick(&self, indices: &[usize]) -> Vec<Publication> {
        indices
            .iter()
            .filter_map(|&i| self.publications.get(i))
            .cloned()
            .collect()
    }
}
