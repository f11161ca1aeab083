use crate::domain::ports::Renderer;
use crate::utils::error::{FormatterError, Result};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

/// 以子行程執行 gnuplot（或相容程式），腳本檔名為唯一參數
#[derive(Debug, Clone)]
pub struct GnuplotRenderer {
    command: String,
}

impl GnuplotRenderer {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl Default for GnuplotRenderer {
    fn default() -> Self {
        Self::new("gnuplot")
    }
}

impl Renderer for GnuplotRenderer {
    fn command(&self) -> &str {
        &self.command
    }

    async fn render(&self, script: &str, work_dir: &Path) -> Result<()> {
        tracing::debug!("🎨 Running {} {} in {}", self.command, script, work_dir.display());

        let output = Command::new(&self.command)
            .arg(script)
            .current_dir(work_dir)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => {
                    FormatterError::RendererNotFound {
                        command: self.command.clone(),
                        reason: e.to_string(),
                    }
                }
                _ => FormatterError::IoError(e),
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        if !output.status.success() {
            return Err(FormatterError::RenderFailed {
                command: self.command.clone(),
                script: script.to_string(),
                code: output.status.code(),
                stderr,
            });
        }

        // gnuplot 的警告只寫到 stderr，結束碼仍為 0
        if !stderr.is_empty() {
            tracing::warn!("⚠️ {} reported on {}: {}", self.command, script, stderr);
        }

        Ok(())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_renderer() {
        let temp_dir = TempDir::new().unwrap();
        let renderer = GnuplotRenderer::new("crypt-plots-no-such-renderer");

        let err = renderer.render("plot.gp", temp_dir.path()).await.unwrap_err();
        assert!(matches!(err, FormatterError::RendererNotFound { .. }));
    }

    #[tokio::test]
    async fn test_runs_in_work_dir() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("plot.gp"), "set output 'x.eps'\n").unwrap();

        // `cat` 只有在工作目錄正確時才找得到相對路徑的腳本
        let renderer = GnuplotRenderer::new("cat");
        assert!(renderer.render("plot.gp", temp_dir.path()).await.is_ok());
    }

    #[tokio::test]
    async fn test_failed_render_reports_exit_code() {
        let temp_dir = TempDir::new().unwrap();
        let renderer = GnuplotRenderer::new("cat");

        let err = renderer.render("missing.gp", temp_dir.path()).await.unwrap_err();
        match err {
            FormatterError::RenderFailed { code, script, stderr, .. } => {
                assert_eq!(code, Some(1));
                assert_eq!(script, "missing.gp");
                assert!(stderr.contains("missing.gp"));
            }
            other => panic!("expected RenderFailed, got {:?}", other),
        }
    }
}
