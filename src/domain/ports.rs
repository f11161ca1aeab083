use crate::domain::model::PlotJob;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// 以工作目錄為根的檔案存取，路徑一律為相對路徑
pub trait Storage: Send + Sync {
    fn root(&self) -> &Path;

    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;

    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    /// 來源不存在時回傳 `SourceMissing`
    fn copy_file(&self, from: &str, to: &str)
        -> impl std::future::Future<Output = Result<u64>> + Send;
}

/// 外部繪圖程式，以腳本檔名為唯一參數，在 `work_dir` 中執行
pub trait Renderer: Send + Sync {
    fn command(&self) -> &str;

    fn render(
        &self,
        script: &str,
        work_dir: &Path,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    fn name(&self) -> &str;

    fn work_dir(&self) -> &Path;

    /// 依模型為主、量測種類為次的順序列出所有工作
    fn plan(&self) -> Result<Vec<PlotJob>>;

    async fn stage(&self, job: &PlotJob) -> Result<()>;

    async fn compose(&self, job: &PlotJob) -> Result<()>;

    /// 未執行繪圖時回傳 `false`
    async fn render(&self, job: &PlotJob) -> Result<bool>;
}
