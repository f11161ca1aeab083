use crate::utils::error::{FormatterError, Result};
use std::collections::HashSet;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(FormatterError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(FormatterError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(FormatterError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(FormatterError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// 鍵值會成為檔名的一部分，不可重複也不可含路徑分隔符
pub fn validate_unique_keys<'a, I>(field_name: &str, keys: I) -> Result<()>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    for key in keys {
        validate_non_empty_string(field_name, key)?;
        if key.contains('/') || key.contains('\\') {
            return Err(FormatterError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: key.to_string(),
                reason: "Key is used in file names and cannot contain path separators".to_string(),
            });
        }
        if !seen.insert(key) {
            return Err(FormatterError::ConfigValidationError {
                field: field_name.to_string(),
                message: format!("Duplicate key '{}'", key),
            });
        }
    }
    Ok(())
}

/// 讀取 gnuplot 資料檔，回傳第一筆資料列的欄位數
///
/// 以 `#` 開頭的行視為註解。空檔案回傳 0。
pub fn count_data_columns(data: &[u8]) -> Result<usize> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .comment(Some(b'#'))
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(data);

    match reader.records().next() {
        Some(record) => Ok(record?.len()),
        None => Ok(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("work_dir", "./results").is_ok());
        assert!(validate_path("work_dir", "").is_err());
        assert!(validate_path("work_dir", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_unique_keys() {
        assert!(validate_unique_keys("models", ["UniformWnt", "VariableWnt"]).is_ok());
        assert!(validate_unique_keys("models", ["UniformWnt", "UniformWnt"]).is_err());
        assert!(validate_unique_keys("models", ["model/0"]).is_err());
        assert!(validate_unique_keys("models", ["  "]).is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("models", 4, 1, 26).is_ok());
        assert!(validate_range("models", 27, 1, 26).is_err());
    }

    #[test]
    fn test_count_data_columns_skips_comments() {
        let data = b"# Crypt height sweep\n# x, h10, h12\n0.0, 1.5, 2.5\n5.0, 1.0, 2.0\n";
        assert_eq!(count_data_columns(data).unwrap(), 3);
    }

    #[test]
    fn test_count_data_columns_empty() {
        assert_eq!(count_data_columns(b"").unwrap(), 0);
    }
}
