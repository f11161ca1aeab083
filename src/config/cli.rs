use crate::domain::ports::Storage;
use crate::utils::error::{FormatterError, Result};
use std::path::{Path, PathBuf};

/// 以工作目錄（模擬的測試輸出資料夾）為根的本機檔案系統
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn full_path(&self, path: &str) -> PathBuf {
        self.base_path.join(path)
    }
}

impl Storage for LocalStorage {
    fn root(&self) -> &Path {
        &self.base_path
    }

    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let data = tokio::fs::read(self.full_path(path)).await?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.full_path(path);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(full_path, data).await?;
        Ok(())
    }

    async fn copy_file(&self, from: &str, to: &str) -> Result<u64> {
        let dest = self.full_path(to);
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::copy(self.full_path(from), &dest)
            .await
            .map_err(|source| match source.kind() {
                std::io::ErrorKind::NotFound => FormatterError::SourceMissing {
                    path: from.to_string(),
                },
                _ => FormatterError::CopyFailed {
                    from: from.to_string(),
                    to: to.to_string(),
                    source,
                },
            })
    }
}
