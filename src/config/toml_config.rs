use crate::core::naming::{self, TITLE_LETTERS};
use crate::core::template::{
    ScriptTemplate, DEFAULT_SCRIPT_TEMPLATE, DEFAULT_SERIES_TEMPLATE, PATH_PLACEHOLDERS,
    SCRIPT_PLACEHOLDERS, SERIES_PLACEHOLDERS,
};
use crate::domain::model::{CopyMapping, Model, PlotKind, SourceLayout};
use crate::utils::error::{FormatterError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 內建的論文圖組
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Preset {
    /// 四個模型、年齡分布與分裂位置兩種圖（`model{N}/`）
    LiteratePaper,
    /// 三個模型、分裂位置、五種隱窩高度（依模型名稱的資料夾）
    CryptHeightSweep,
}

impl Preset {
    pub fn toml(self) -> &'static str {
        match self {
            Preset::LiteratePaper => include_str!("../../presets/literate_paper.toml"),
            Preset::CryptHeightSweep => include_str!("../../presets/crypt_height_sweep.toml"),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Preset::LiteratePaper => "literate-paper",
            Preset::CryptHeightSweep => "crypt-height-sweep",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatterConfig {
    pub variant: VariantConfig,
    pub models: Vec<Model>,
    pub plots: Vec<PlotKind>,
    pub series: SeriesConfig,
    #[serde(default)]
    pub sources: SourceConfig,
    #[serde(default)]
    pub renderer: RendererConfig,
    /// 設定檔所在資料夾，用來解析相對的模板路徑
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantConfig {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub layout: SourceLayout,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesConfig {
    pub labels: Vec<String>,
    #[serde(default = "default_key_title")]
    pub key_title: String,
    /// 第一條曲線使用的資料欄位（第 1 欄為 x 軸）
    #[serde(default = "default_first_column")]
    pub first_column: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_image_source")]
    pub image: String,
    #[serde(default = "default_data_source")]
    pub data: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RendererConfig {
    #[serde(default = "default_renderer_command")]
    pub command: String,
    pub template: Option<String>,
    pub series_template: Option<String>,
}

fn default_key_title() -> String {
    "Crypt height".to_string()
}

fn default_first_column() -> usize {
    2
}

fn default_image_source() -> String {
    naming::DEFAULT_IMAGE_SOURCE.to_string()
}

fn default_data_source() -> String {
    naming::DEFAULT_DATA_SOURCE.to_string()
}

fn default_renderer_command() -> String {
    "gnuplot".to_string()
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            image: default_image_source(),
            data: default_data_source(),
        }
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            command: default_renderer_command(),
            template: None,
            series_template: None,
        }
    }
}

impl FormatterConfig {
    /// 載入內建圖組
    pub fn preset(preset: Preset) -> Result<Self> {
        Self::from_toml_str(preset.toml())
    }

    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(FormatterError::IoError)?;
        let mut config = Self::from_toml_str(&content)?;
        config.base_dir = path.as_ref().parent().map(Path::to_path_buf);
        Ok(config)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| FormatterError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${PLOT_RENDERER})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| FormatterError::TemplateError {
            message: format!("Invalid environment pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    pub fn name(&self) -> &str {
        &self.variant.name
    }

    pub fn layout(&self) -> SourceLayout {
        self.variant.layout
    }

    pub fn copy_mappings(&self) -> Vec<CopyMapping> {
        naming::copy_mappings(&self.sources.image, &self.sources.data)
    }

    pub fn job_count(&self) -> usize {
        self.models.len() * self.plots.len()
    }

    fn resolve(&self, path: &str) -> PathBuf {
        match &self.base_dir {
            Some(base) => base.join(path),
            None => PathBuf::from(path),
        }
    }

    fn load_template(&self, path: Option<&str>, fallback: &str) -> Result<ScriptTemplate> {
        match path {
            Some(path) => {
                let resolved = self.resolve(path);
                let text = std::fs::read_to_string(&resolved).map_err(|e| {
                    FormatterError::TemplateError {
                        message: format!("Cannot read template '{}': {}", resolved.display(), e),
                    }
                })?;
                Ok(ScriptTemplate::new(text))
            }
            None => Ok(ScriptTemplate::new(fallback)),
        }
    }

    /// 繪圖腳本模板（未設定時使用內建模板）
    pub fn script_template(&self) -> Result<ScriptTemplate> {
        self.load_template(self.renderer.template.as_deref(), DEFAULT_SCRIPT_TEMPLATE)
    }

    pub fn series_template(&self) -> Result<ScriptTemplate> {
        self.load_template(
            self.renderer.series_template.as_deref(),
            DEFAULT_SERIES_TEMPLATE,
        )
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("variant.name", &self.variant.name)?;

        if self.models.is_empty() {
            return Err(FormatterError::MissingConfigError {
                field: "models".to_string(),
            });
        }
        validation::validate_range("models", self.models.len(), 1, TITLE_LETTERS.len())?;
        validation::validate_unique_keys("models.key", self.models.iter().map(|m| m.key.as_str()))?;
        for model in &self.models {
            validation::validate_non_empty_string("models.name", &model.name)?;
        }

        if self.plots.is_empty() {
            return Err(FormatterError::MissingConfigError {
                field: "plots".to_string(),
            });
        }
        validation::validate_unique_keys("plots.key", self.plots.iter().map(|p| p.key.as_str()))?;
        for plot in &self.plots {
            validation::validate_non_empty_string("plots.ylabel", &plot.ylabel)?;
        }

        if self.series.labels.is_empty() {
            return Err(FormatterError::MissingConfigError {
                field: "series.labels".to_string(),
            });
        }
        if self.series.first_column < 2 {
            return Err(FormatterError::InvalidConfigValueError {
                field: "series.first_column".to_string(),
                value: self.series.first_column.to_string(),
                reason: "Column 1 holds the x axis (height up the crypt)".to_string(),
            });
        }

        validation::validate_non_empty_string("renderer.command", &self.renderer.command)?;

        // 路徑模板
        validation::validate_path("sources.image", &self.sources.image)?;
        validation::validate_path("sources.data", &self.sources.data)?;
        for (field, source) in [("sources.image", &self.sources.image), ("sources.data", &self.sources.data)] {
            ScriptTemplate::new(source.as_str())
                .check_placeholders(PATH_PLACEHOLDERS)
                .map_err(|e| FormatterError::ConfigValidationError {
                    field: field.to_string(),
                    message: e.to_string(),
                })?;
        }

        self.script_template()?.check_placeholders(SCRIPT_PLACEHOLDERS)?;
        self.series_template()?.check_placeholders(SERIES_PLACEHOLDERS)?;

        Ok(())
    }
}

impl Validate for FormatterConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
