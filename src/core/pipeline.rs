use crate::config::toml_config::FormatterConfig;
use crate::core::naming;
use crate::core::template::{render_series, script_values, ScriptTemplate};
use crate::domain::model::{FileCopy, Model, PlotJob, PlotKind, SubstitutionRecord};
use crate::domain::ports::{Pipeline, Renderer, Storage};
use crate::utils::error::Result;
use crate::utils::validation::count_data_columns;
use std::collections::HashMap;
use std::path::Path;

/// 將自動產生的圖與資料改名，並以論文用的標題重新繪圖
pub struct PublicationPipeline<S: Storage, R: Renderer> {
    storage: S,
    renderer: R,
    config: FormatterConfig,
    script_template: ScriptTemplate,
    series_template: ScriptTemplate,
    render_enabled: bool,
}

impl<S: Storage, R: Renderer> PublicationPipeline<S, R> {
    pub fn new(storage: S, renderer: R, config: FormatterConfig) -> Result<Self> {
        let script_template = config.script_template()?;
        let series_template = config.series_template()?;

        Ok(Self {
            storage,
            renderer,
            config,
            script_template,
            series_template,
            render_enabled: true,
        })
    }

    pub fn with_render(mut self, enabled: bool) -> Self {
        self.render_enabled = enabled;
        self
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn config(&self) -> &FormatterConfig {
        &self.config
    }

    fn build_job(
        &self,
        model_index: usize,
        model: &Model,
        plot_index: usize,
        plot: &PlotKind,
    ) -> Result<PlotJob> {
        let mut path_values = HashMap::new();
        path_values.insert(
            "dir",
            naming::source_dir(self.config.layout(), model_index, model),
        );
        path_values.insert("model", model.key.clone());
        path_values.insert("plot", plot.key.clone());
        path_values.insert("index", model_index.to_string());

        let copies = self
            .config
            .copy_mappings()
            .iter()
            .map(|mapping| -> Result<FileCopy> {
                Ok(FileCopy {
                    from: ScriptTemplate::new(mapping.source.as_str()).render(&path_values)?,
                    to: ScriptTemplate::new(mapping.dest.as_str()).render(&path_values)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let record = SubstitutionRecord {
            csv: naming::data_file_name(model, plot),
            eps: naming::output_image_name(model, plot),
            title: naming::plot_title(plot, model_index, model)?,
            ylabel: naming::plot_ylabel(plot).to_string(),
            key_title: self.config.series.key_title.clone(),
        };

        Ok(PlotJob {
            model_index,
            plot_index,
            model: model.clone(),
            plot: plot.clone(),
            copies,
            script: naming::script_file_name(model, plot),
            record,
        })
    }

    /// 產生完整腳本內容
    pub fn script_for(&self, job: &PlotJob) -> Result<String> {
        let series = render_series(
            &self.series_template,
            job.data_file(),
            &self.config.series.labels,
            self.config.series.first_column,
        )?;

        let mut values = script_values(&job.record);
        values.insert("series", series);

        self.script_template.render(&values)
    }

    /// 資料欄位不足時只發出警告，交給繪圖程式決定
    async fn inspect_data(&self, job: &PlotJob) {
        let series = self.config.series.labels.len();

        let data = match self.storage.read_file(job.data_file()).await {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!("⚠️ {}: cannot read staged data: {}", job.label(), e);
                return;
            }
        };

        match count_data_columns(&data) {
            Ok(0) => tracing::warn!("⚠️ {}: {} has no data rows", job.label(), job.data_file()),
            Ok(columns) => match missing_columns(columns, self.config.series.first_column, series) {
                Some(short) => tracing::warn!(
                    "⚠️ {}: {} has {} columns, {} series need {} more",
                    job.label(),
                    job.data_file(),
                    columns,
                    series,
                    short
                ),
                None => tracing::debug!("{}: {} data columns", job.label(), columns),
            },
            Err(e) => tracing::warn!("⚠️ {}: cannot parse {}: {}", job.label(), job.data_file(), e),
        }
    }
}

/// 曲線從 `first_column` 起各佔一欄；回傳不足的欄數
pub fn missing_columns(columns: usize, first_column: usize, series: usize) -> Option<usize> {
    let needed = (first_column + series).saturating_sub(1);
    needed.checked_sub(columns).filter(|&short| short > 0)
}

#[async_trait::async_trait]
impl<S: Storage, R: Renderer> Pipeline for PublicationPipeline<S, R> {
    fn name(&self) -> &str {
        self.config.name()
    }

    fn work_dir(&self) -> &Path {
        self.storage.root()
    }

    fn plan(&self) -> Result<Vec<PlotJob>> {
        let mut jobs = Vec::with_capacity(self.config.job_count());

        for (model_index, model) in self.config.models.iter().enumerate() {
            for (plot_index, plot) in self.config.plots.iter().enumerate() {
                jobs.push(self.build_job(model_index, model, plot_index, plot)?);
            }
        }

        Ok(jobs)
    }

    async fn stage(&self, job: &PlotJob) -> Result<()> {
        for copy in &job.copies {
            let bytes = self.storage.copy_file(&copy.from, &copy.to).await?;
            tracing::debug!("📄 Copied {} -> {} ({} bytes)", copy.from, copy.to, bytes);
        }

        self.inspect_data(job).await;
        Ok(())
    }

    async fn compose(&self, job: &PlotJob) -> Result<()> {
        let script = self.script_for(job)?;
        self.storage.write_file(&job.script, script.as_bytes()).await?;
        tracing::debug!("📝 Wrote {}", job.script);
        Ok(())
    }

    async fn render(&self, job: &PlotJob) -> Result<bool> {
        if !self.render_enabled {
            tracing::debug!("⏭️ Skipping render of {}", job.script);
            return Ok(false);
        }

        self.renderer.render(&job.script, self.storage.root()).await?;
        tracing::debug!("🎨 Rendered {} via {}", job.output_file(), self.renderer.command());
        Ok(true)
    }
}
