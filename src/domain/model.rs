use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 模擬模型：`key` 用於輸出檔名，`name` 用於標題與來源資料夾
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    pub key: String,
    pub name: String,
}

/// 量測種類；`title` 有值時所有模型共用同一標題，否則使用字母編號標題
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlotKind {
    pub key: String,
    pub ylabel: String,
    #[serde(default)]
    pub title: Option<String>,
}

/// 模擬輸出的資料夾配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceLayout {
    /// `model{N}/`，N 為模型在清單中的索引
    #[default]
    Indexed,
    /// `{顯示名稱，空白改為底線}/`
    Named,
}

/// 來源與目的地路徑模板，支援 `{{dir}}`、`{{model}}`、`{{plot}}`、`{{index}}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyMapping {
    pub source: String,
    pub dest: String,
}

/// 已解析的單一複製動作，路徑相對於工作目錄
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileCopy {
    pub from: String,
    pub to: String,
}

/// 填入繪圖腳本模板的值（尚未做 gnuplot 跳脫）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubstitutionRecord {
    pub csv: String,
    pub eps: String,
    pub title: String,
    pub ylabel: String,
    pub key_title: String,
}

/// 一個 (模型, 量測種類) 組合的完整工作描述
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotJob {
    pub model_index: usize,
    pub plot_index: usize,
    pub model: Model,
    pub plot: PlotKind,
    pub copies: Vec<FileCopy>,
    pub script: String,
    pub record: SubstitutionRecord,
}

impl PlotJob {
    pub fn label(&self) -> String {
        format!("{}-{}", self.model.key, self.plot.key)
    }

    /// 複製後的資料檔，也是腳本中每條曲線的資料來源
    pub fn data_file(&self) -> &str {
        &self.record.csv
    }

    pub fn output_file(&self) -> &str {
        &self.record.eps
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStage {
    Stage,
    Compose,
    Render,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JobStatus {
    Succeeded,
    RenderSkipped,
    Failed { stage: JobStage, message: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct JobOutcome {
    pub model: String,
    pub plot: String,
    pub script: String,
    pub data: String,
    pub output: String,
    #[serde(flatten)]
    pub status: JobStatus,
    pub duration_ms: u64,
}

impl JobOutcome {
    pub fn new(job: &PlotJob, status: JobStatus, duration: Duration) -> Self {
        Self {
            model: job.model.key.clone(),
            plot: job.plot.key.clone(),
            script: job.script.clone(),
            data: job.data_file().to_string(),
            output: job.output_file().to_string(),
            status,
            duration_ms: duration.as_millis() as u64,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, JobStatus::Failed { .. })
    }
}

/// 單次執行的摘要，可輸出為 JSON
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub variant: String,
    pub work_dir: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub jobs: Vec<JobOutcome>,
}

impl RunReport {
    pub fn succeeded_count(&self) -> usize {
        self.jobs
            .iter()
            .filter(|j| j.status == JobStatus::Succeeded)
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.jobs.iter().filter(|j| j.is_failed()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &JobOutcome> {
        self.jobs.iter().filter(|j| j.is_failed())
    }

    pub fn is_success(&self) -> bool {
        self.failed_count() == 0
    }

    pub fn to_json(&self) -> crate::utils::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_job() -> PlotJob {
        PlotJob {
            model_index: 0,
            plot_index: 1,
            model: Model {
                key: "UniformWnt".to_string(),
                name: "Uniform Wnt".to_string(),
            },
            plot: PlotKind {
                key: "Cell_division_locations".to_string(),
                ylabel: "Number of divisions per box".to_string(),
                title: None,
            },
            copies: Vec::new(),
            script: "UniformWnt-Cell_division_locations_script.gp".to_string(),
            record: SubstitutionRecord {
                csv: "UniformWnt-Cell_division_locations_data.csv".to_string(),
                eps: "UniformWnt-Cell_division_locations.eps".to_string(),
                title: "a) Uniform Wnt".to_string(),
                ylabel: "Number of divisions per box".to_string(),
                key_title: "Crypt height".to_string(),
            },
        }
    }

    #[test]
    fn test_report_counts_and_json() {
        let job = sample_job();
        let report = RunReport {
            variant: "literate-paper".to_string(),
            work_dir: ".".to_string(),
            started_at: Utc::now(),
            finished_at: Utc::now(),
            jobs: vec![
                JobOutcome::new(&job, JobStatus::Succeeded, Duration::from_millis(12)),
                JobOutcome::new(
                    &job,
                    JobStatus::Failed {
                        stage: JobStage::Stage,
                        message: "Source file not found: model0/x.eps".to_string(),
                    },
                    Duration::from_millis(1),
                ),
            ],
        };

        assert_eq!(report.succeeded_count(), 1);
        assert_eq!(report.failed_count(), 1);
        assert!(!report.is_success());

        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["jobs"][0]["status"], "succeeded");
        assert_eq!(json["jobs"][1]["status"], "failed");
        assert_eq!(json["jobs"][1]["stage"], "stage");
        assert_eq!(json["jobs"][0]["duration_ms"], 12);
    }
}
