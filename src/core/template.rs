use crate::domain::model::SubstitutionRecord;
use crate::utils::error::{FormatterError, Result};
use regex::Regex;
use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;

/// 論文用的 gnuplot 腳本模板
pub const DEFAULT_SCRIPT_TEMPLATE: &str = include_str!("../../templates/crypt_plot.gp");

/// 每條曲線一行，`{{column}}` 為資料欄位（從 1 起算）
pub const DEFAULT_SERIES_TEMPLATE: &str =
    r#""{{csv}}" using 1:{{column}} title "{{label}}" with linespoints pointtype 7"#;

pub const SCRIPT_PLACEHOLDERS: &[&str] = &["csv", "eps", "title", "ylabel", "key_title", "series"];
pub const SERIES_PLACEHOLDERS: &[&str] = &["csv", "column", "label"];
pub const PATH_PLACEHOLDERS: &[&str] = &["dir", "model", "plot", "index"];

const SERIES_SEPARATOR: &str = ",\\\n     ";

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("placeholder pattern is valid")
});

/// `{{name}}` 佔位符模板
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptTemplate {
    text: String,
}

impl ScriptTemplate {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// 模板中出現的佔位符名稱（排序、去重）
    pub fn placeholders(&self) -> BTreeSet<String> {
        PLACEHOLDER
            .captures_iter(&self.text)
            .map(|caps| caps[1].to_string())
            .collect()
    }

    /// 確認模板只使用允許的佔位符
    pub fn check_placeholders(&self, allowed: &[&str]) -> Result<()> {
        match self
            .placeholders()
            .into_iter()
            .find(|name| !allowed.contains(&name.as_str()))
        {
            Some(name) => Err(FormatterError::UnresolvedPlaceholder { name }),
            None => Ok(()),
        }
    }

    /// 單次替換；替換後的值不會再被展開
    pub fn render(&self, values: &HashMap<&str, String>) -> Result<String> {
        if let Some(name) = PLACEHOLDER
            .captures_iter(&self.text)
            .map(|caps| caps[1].to_string())
            .find(|name| !values.contains_key(name.as_str()))
        {
            return Err(FormatterError::UnresolvedPlaceholder { name });
        }

        let rendered = PLACEHOLDER.replace_all(&self.text, |caps: &regex::Captures| {
            values.get(&caps[1]).cloned().unwrap_or_default()
        });

        Ok(rendered.into_owned())
    }
}

/// 組出 `plot` 指令的曲線清單，每條曲線都引用同一個資料檔
pub fn render_series(
    series_template: &ScriptTemplate,
    csv: &str,
    labels: &[String],
    first_column: usize,
) -> Result<String> {
    let mut lines = Vec::with_capacity(labels.len());

    for (offset, label) in labels.iter().enumerate() {
        let mut values = HashMap::new();
        values.insert("csv", quote_double(csv));
        values.insert("column", (first_column + offset).to_string());
        values.insert("label", quote_double(label));
        lines.push(series_template.render(&values)?);
    }

    Ok(lines.join(SERIES_SEPARATOR))
}

/// 依 gnuplot 引號規則跳脫後的腳本模板值；`series` 由呼叫端另外加入
pub fn script_values(record: &SubstitutionRecord) -> HashMap<&'static str, String> {
    let mut values = HashMap::new();
    values.insert("csv", quote_double(&record.csv));
    values.insert("eps", quote_double(&record.eps));
    values.insert("title", quote_single(&record.title));
    values.insert("ylabel", quote_single(&record.ylabel));
    values.insert("key_title", quote_double(&record.key_title));
    values
}

/// gnuplot 單引號字串中 `'` 以 `''` 表示
pub fn quote_single(value: &str) -> String {
    value.replace('\'', "''")
}

/// gnuplot 雙引號字串會處理反斜線跳脫
pub fn quote_double(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
