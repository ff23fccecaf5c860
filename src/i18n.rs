use serde::{Deserialize, Serialize};

/// 目标语言类型
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetLanguage {
    #[serde(rename = "en")]
    #[default]
    English,
    #[serde(rename = "fr")]
    French,
    #[serde(rename = "de")]
    German,
    #[serde(rename = "zh")]
    Chinese,
}

impl std::fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetLanguage::English => write!(f, "en"),
            TargetLanguage::French => write!(f, "fr"),
            TargetLanguage::German => write!(f, "de"),
            TargetLanguage::Chinese => write!(f, "zh"),
        }
    }
}

impl std::str::FromStr for TargetLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "en" | "english" | "英文" => Ok(TargetLanguage::English),
            "fr" | "french" | "français" | "法文" => Ok(TargetLanguage::French),
            "de" | "german" | "deutsch" | "德文" => Ok(TargetLanguage::German),
            "zh" | "chinese" | "中文" => Ok(TargetLanguage::Chinese),
            _ => Err(format!("Unknown target language: {}", s)),
        }
    }
}

/// 综述的四个必备章节
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReviewSection {
    Introduction,
    ExistingWork,
    Limitations,
    Perspectives,
}

impl ReviewSection {
    pub const ALL: [ReviewSection; 4] = [
        ReviewSection::Introduction,
        ReviewSection::ExistingWork,
        ReviewSection::Limitations,
        ReviewSection::Perspectives,
    ];
}

impl TargetLanguage {
    /// 获取语言的描述性名称
    pub fn display_name(&self) -> &'static str {
        match self {
            TargetLanguage::English => "English",
            TargetLanguage::French => "Français",
            TargetLanguage::German => "Deutsch",
            TargetLanguage::Chinese => "中文",
        }
    }

    /// 获取语言的提示词指令
    pub fn prompt_instruction(&self) -> &'static str {
        match self {
            TargetLanguage::English => "Write your answer in English.",
            TargetLanguage::French => "Rédige ta réponse en français.",
            TargetLanguage::German => "Verfasse deine Antwort auf Deutsch.",
            TargetLanguage::Chinese => "请使用中文回答。",
        }
    }

    /// 章节标题，综述提示词与章节校验共用同一份文本
    pub fn section_heading(&self, section: ReviewSection) -> &'static str {
        match self {
            TargetLanguage::English => match section {
                ReviewSection::Introduction => "Introduction",
                ReviewSection::ExistingWork => "Existing Work",
                ReviewSection::Limitations => "Limitations",
                ReviewSection::Perspectives => "Perspectives",
            },
            TargetLanguage::French => match section {
                ReviewSection::Introduction => "Introduction",
                ReviewSection::ExistingWork => "Travaux existants",
                ReviewSection::Limitations => "Limitations",
                ReviewSection::Perspectives => "Perspectives",
            },
            TargetLanguage::German => match section {
                ReviewSection::Introduction => "Einleitung",
                ReviewSection::ExistingWork => "Bestehende Arbeiten",
                ReviewSection::Limitations => "Einschränkungen",
                ReviewSection::Perspectives => "Perspektiven",
            },
            TargetLanguage::Chinese => match section {
                ReviewSection::Introduction => "引言",
                ReviewSection::ExistingWork => "现有工作",
                ReviewSection::Limitations => "局限性",
                ReviewSection::Perspectives => "展望",
            },
        }
    }

    /// 作者超过上限时追加的后缀
    pub fn more_authors_suffix(&self) -> &'static str {
        match self {
            TargetLanguage::Chinese => " 等",
            _ => " et al.",
        }
    }

    /// 缺失字段时的占位文本
    pub fn not_available(&self) -> &'static str {
        match self {
            TargetLanguage::English => "N/A",
            TargetLanguage::French => "Non disponible",
            TargetLanguage::German => "Nicht verfügbar",
            TargetLanguage::Chinese => "暂无",
        }
    }

    /// 仅有开放获取PDF时的说明，只给出链接，不编造内容
    pub fn open_access_notice(&self, url: &str) -> String {
        match self {
            TargetLanguage::English => format!(
                "⚠️ Summary not available through the API. Open-access PDF available at: {}",
                url
            ),
            TargetLanguage::French => format!(
                "⚠️ Résumé non disponible dans l'API. PDF Open Access disponible à: {}",
                url
            ),
            TargetLanguage::German => format!(
                "⚠️ Zusammenfassung über die API nicht verfügbar. Open-Access-PDF verfügbar unter: {}",
                url
            ),
            TargetLanguage::Chinese => format!("⚠️ API未提供摘要。开放获取PDF地址: {}", url),
        }
    }

    /// 仅有文章链接时的说明
    pub fn see_article_notice(&self, url: &str) -> String {
        match self {
            TargetLanguage::English => {
                format!("⚠️ Summary not available. See the full article: {}", url)
            }
            TargetLanguage::French => format!(
                "⚠️ Résumé non disponible. Consultez l'article complet: {}",
                url
            ),
            TargetLanguage::German => format!(
                "⚠️ Zusammenfassung nicht verfügbar. Siehe den vollständigen Artikel: {}",
                url
            ),
            TargetLanguage::Chinese => format!("⚠️ 暂无摘要。请查阅原文: {}", url),
        }
    }

    /// 完全没有可用信息时的固定标记
    pub fn summary_unavailable(&self) -> &'static str {
        match self {
            TargetLanguage::English => "⚠️ Summary not available for this article.",
            TargetLanguage::French => "⚠️ Résumé non disponible pour cet article.",
            TargetLanguage::German => "⚠️ Für diesen Artikel ist keine Zusammenfassung verfügbar.",
            TargetLanguage::Chinese => "⚠️ 该文章暂无摘要。",
        }
    }

    /// 综述生成失败时替代文档的固定提示
    pub fn review_failure_marker(&self) -> &'static str {
        match self {
            TargetLanguage::English => {
                "Error during generation. Please retry or switch to another LLM model."
            }
            TargetLanguage::French => {
                "Erreur lors de la génération. Veuillez réessayer ou changer de modèle LLM."
            }
            TargetLanguage::German => {
                "Fehler bei der Generierung. Bitte erneut versuchen oder ein anderes LLM-Modell wählen."
            }
            TargetLanguage::Chinese => "生成失败。请重试或更换LLM模型。",
        }
    }

    /// 输出文件名
    pub fn review_filename(&self) -> &'static str {
        match self {
            TargetLanguage::English => "literature_review.txt",
            TargetLanguage::French => "etat_de_lart.txt",
            TargetLanguage::German => "literaturuebersicht.txt",
            TargetLanguage::Chinese => "文献综述.txt",
        }
    }
}
