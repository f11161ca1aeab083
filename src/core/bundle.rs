use crate::domain::model::{JobStatus, RunReport};
use crate::domain::ports::Storage;
use crate::utils::error::{FormatterError, Result};
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

/// 應放入壓縮檔的檔案：已繪圖的組合含圖檔，略過繪圖的只含腳本與資料
pub fn bundle_entries(report: &RunReport) -> Vec<String> {
    let mut entries = Vec::new();

    for job in &report.jobs {
        match job.status {
            JobStatus::Succeeded => {
                entries.push(job.output.clone());
                entries.push(job.script.clone());
                entries.push(job.data.clone());
            }
            JobStatus::RenderSkipped => {
                entries.push(job.script.clone());
                entries.push(job.data.clone());
            }
            JobStatus::Failed { .. } => {}
        }
    }

    entries
}

/// 將完成的圖檔打包成 zip，回傳收錄的檔案數
pub async fn write_bundle<S: Storage>(
    storage: &S,
    report: &RunReport,
    bundle_name: &str,
) -> Result<usize> {
    let entries = bundle_entries(report);

    let mut contents = Vec::with_capacity(entries.len());
    for entry in entries {
        match storage.read_file(&entry).await {
            Ok(data) => contents.push((entry, data)),
            // 自訂模板可能把圖輸出到別處
            Err(FormatterError::IoError(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!("⚠️ {} not found, left out of the bundle", entry);
            }
            Err(e) => return Err(e),
        }
    }

    tracing::debug!("Creating ZIP file with {} files", contents.len());

    let zip_data = {
        let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

        for (name, data) in &contents {
            zip.start_file::<_, ()>(name.as_str(), FileOptions::default())?;
            zip.write_all(data)?;
        }

        let cursor = zip.finish()?;
        cursor.into_inner()
    };

    tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
    storage.write_file(bundle_name, &zip_data).await?;

    Ok(contents.len())
}
