use crate::domain::model::{JobOutcome, JobStage, JobStatus, PlotJob, RunReport};
use crate::domain::ports::Pipeline;
use crate::utils::error::{FormatterError, Result};
use chrono::Utc;
use std::time::Instant;

/// 單一組合失敗時的處理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// 記錄失敗並繼續下一個組合
    #[default]
    BestEffort,
    /// 第一個失敗即中止
    FailFast,
}

pub struct FormatterEngine<P: Pipeline> {
    pipeline: P,
    policy: ErrorPolicy,
}

impl<P: Pipeline> FormatterEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self {
            pipeline,
            policy: ErrorPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub async fn run(&self) -> Result<RunReport> {
        let started_at = Utc::now();
        let jobs = self.pipeline.plan()?;

        tracing::info!(
            "🚀 Formatting {} plots for '{}' in {}",
            jobs.len(),
            self.pipeline.name(),
            self.pipeline.work_dir().display()
        );

        let mut outcomes = Vec::with_capacity(jobs.len());

        for (index, job) in jobs.iter().enumerate() {
            let start = Instant::now();
            tracing::info!("📊 [{}/{}] {}", index + 1, jobs.len(), job.label());

            let status = match self.run_job(job).await {
                Ok(true) => JobStatus::Succeeded,
                Ok(false) => JobStatus::RenderSkipped,
                Err((stage, e)) => {
                    tracing::error!(
                        "❌ {} failed during {:?}: {} (Category: {:?}, Severity: {:?})",
                        job.label(),
                        stage,
                        e,
                        e.category(),
                        e.severity()
                    );

                    if self.policy == ErrorPolicy::FailFast {
                        return Err(e);
                    }

                    JobStatus::Failed {
                        stage,
                        message: e.to_string(),
                    }
                }
            };

            outcomes.push(JobOutcome::new(job, status, start.elapsed()));
        }

        let report = RunReport {
            variant: self.pipeline.name().to_string(),
            work_dir: self.pipeline.work_dir().display().to_string(),
            started_at,
            finished_at: Utc::now(),
            jobs: outcomes,
        };

        tracing::info!(
            "✅ {} of {} plots finished, {} failed",
            report.jobs.len() - report.failed_count(),
            report.jobs.len(),
            report.failed_count()
        );

        Ok(report)
    }

    /// 依序複製、寫腳本、繪圖；任一步失敗即結束此組合
    async fn run_job(&self, job: &PlotJob) -> std::result::Result<bool, (JobStage, FormatterError)> {
        self.pipeline
            .stage(job)
            .await
            .map_err(|e| (JobStage::Stage, e))?;

        self.pipeline
            .compose(job)
            .await
            .map_err(|e| (JobStage::Compose, e))?;

        self.pipeline
            .render(job)
            .await
            .map_err(|e| (JobStage::Render, e))
    }
}
