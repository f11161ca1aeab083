//! 發表用檔名慣例與標題規則。

use crate::domain::model::{CopyMapping, Model, PlotKind, SourceLayout};
use crate::utils::error::{FormatterError, Result};

pub const DEFAULT_IMAGE_SOURCE: &str = "{{dir}}/{{plot}}.eps";
pub const DEFAULT_DATA_SOURCE: &str = "{{dir}}/outputs_{{plot}}_gnuplot_data.csv";

pub const AUTO_IMAGE_DEST: &str = "{{model}}-{{plot}}_auto.eps";
pub const DATA_DEST: &str = "{{model}}-{{plot}}_data.csv";

/// 標題字母，依模型索引取用
pub const TITLE_LETTERS: &str = "abcdefghijklmnopqrstuvwxyz";

pub fn job_stem(model: &Model, plot: &PlotKind) -> String {
    format!("{}-{}", model.key, plot.key)
}

pub fn auto_image_name(model: &Model, plot: &PlotKind) -> String {
    format!("{}_auto.eps", job_stem(model, plot))
}

pub fn data_file_name(model: &Model, plot: &PlotKind) -> String {
    format!("{}_data.csv", job_stem(model, plot))
}

pub fn script_file_name(model: &Model, plot: &PlotKind) -> String {
    format!("{}_script.gp", job_stem(model, plot))
}

pub fn output_image_name(model: &Model, plot: &PlotKind) -> String {
    format!("{}.eps", job_stem(model, plot))
}

/// 模擬輸出所在的子資料夾
pub fn source_dir(layout: SourceLayout, model_index: usize, model: &Model) -> String {
    match layout {
        SourceLayout::Indexed => format!("model{}", model_index),
        SourceLayout::Named => model.name.replace(' ', "_"),
    }
}

/// 影像與資料檔各一組；目的地名稱固定
pub fn copy_mappings(image_source: &str, data_source: &str) -> Vec<CopyMapping> {
    vec![
        CopyMapping {
            source: image_source.to_string(),
            dest: AUTO_IMAGE_DEST.to_string(),
        },
        CopyMapping {
            source: data_source.to_string(),
            dest: DATA_DEST.to_string(),
        },
    ]
}

pub fn title_letter(model_index: usize) -> Option<char> {
    TITLE_LETTERS.chars().nth(model_index)
}

pub fn plot_title(plot: &PlotKind, model_index: usize, model: &Model) -> Result<String> {
    if let Some(title) = &plot.title {
        return Ok(title.clone());
    }

    let letter = title_letter(model_index).ok_or_else(|| FormatterError::InvalidConfigValueError {
        field: "models".to_string(),
        value: model.key.clone(),
        reason: format!(
            "Only {} models can receive lettered titles",
            TITLE_LETTERS.len()
        ),
    })?;

    Ok(format!("{}) {}", letter, model.name))
}

/// y 軸標籤只取決於量測種類
pub fn plot_ylabel(plot: &PlotKind) -> &str {
    &plot.ylabel
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(key: &str, name: &str) -> Model {
        Model {
            key: key.to_string(),
            name: name.to_string(),
        }
    }

    fn plot(key: &str, ylabel: &str, title: Option<&str>) -> PlotKind {
        PlotKind {
            key: key.to_string(),
            ylabel: ylabel.to_string(),
            title: title.map(str::to_string),
        }
    }

    #[test]
    fn test_file_names() {
        let m = model("UniformWnt", "Uniform Wnt");
        let p = plot("Cell_division_locations", "Number of divisions per box", None);

        assert_eq!(auto_image_name(&m, &p), "UniformWnt-Cell_division_locations_auto.eps");
        assert_eq!(data_file_name(&m, &p), "UniformWnt-Cell_division_locations_data.csv");
        assert_eq!(script_file_name(&m, &p), "UniformWnt-Cell_division_locations_script.gp");
        assert_eq!(output_image_name(&m, &p), "UniformWnt-Cell_division_locations.eps");
    }

    #[test]
    fn test_source_dir_by_layout() {
        let m = model("StochasticGenerationBased", "Stochastic Generation-based");
        assert_eq!(source_dir(SourceLayout::Indexed, 2, &m), "model2");
        assert_eq!(source_dir(SourceLayout::Named, 2, &m), "Stochastic_Generation-based");
    }

    #[test]
    fn test_lettered_and_fixed_titles() {
        let age = plot(
            "Cell_age_distribution",
            "Mean cell age at division (hours)",
            Some("Cell age distribution"),
        );
        let divisions = plot("Cell_division_locations", "Number of divisions per box", None);
        let uniform = model("UniformWnt", "Uniform Wnt");
        let contact = model("ContactInhibition", "Contact Inhibition");

        assert_eq!(plot_title(&age, 3, &contact).unwrap(), "Cell age distribution");
        assert_eq!(plot_title(&divisions, 0, &uniform).unwrap(), "a) Uniform Wnt");
        assert_eq!(plot_title(&divisions, 3, &contact).unwrap(), "d) Contact Inhibition");
        assert!(plot_title(&divisions, 26, &contact).is_err());
    }

    #[test]
    fn test_ylabel_ignores_model() {
        let divisions = plot("Cell_division_locations", "Number of divisions per box", None);
        assert_eq!(plot_ylabel(&divisions), "Number of divisions per box");
    }
}
