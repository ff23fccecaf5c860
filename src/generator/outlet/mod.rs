use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::generator::synthesis::ReviewDocument;
use crate::i18n::TargetLanguage;

/// 综述的输出目标
pub trait Outlet {
    /// 保存综述，返回写入的位置
    async fn save(&self, document: &ReviewDocument) -> Result<PathBuf>;
}

/// 将综述原样写入输出目录下的固定文件名
pub struct DiskOutlet {
    output_dir: PathBuf,
    language: TargetLanguage,
}

impl DiskOutlet {
    pub fn new(output_dir: impl Into<PathBuf>, language: TargetLanguage) -> Self {
        Self {
            output_dir: output_dir.into(),
            language,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// 输出文件的完整路径
    pub fn target_path(&self) -> PathBuf {
        self.output_dir.join(self.language.review_filename())
    }
}

impl Outlet for DiskOutlet {
    async fn save(&self, document: &ReviewDocument) -> Result<PathBuf> {
        println!("\n🖊️ 综述存储中...");

        fs::create_dir_all(&self.output_dir).with_context(|| {
            format!(
                "Failed to create output directory: {}",
                self.output_dir.display()
            )
        })?;

        let path = self.target_path();
        fs::write(&path, document.text())
            .with_context(|| format!("Failed to write review: {}", path.display()))?;

        println!("💾 已保存综述: {}", path.display());
        Ok(path)
    }
}
