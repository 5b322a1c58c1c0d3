// ==========================================
// 钢结构材料清单转录 - 配置管理器
// ==========================================
// 职责: 配置加载、默认值回填、取值校验
// 存储: 可选 JSON 文件（缺省字段使用默认值）
// ==========================================

use crate::config::layout::AppConfig;
use crate::error::{ConvertError, ConvertResult};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    config: AppConfig,
}

impl ConfigManager {
    /// 使用默认配置
    pub fn with_defaults() -> Self {
        Self {
            config: AppConfig::default(),
        }
    }

    /// 加载配置
    ///
    /// # 参数
    /// - path: JSON 配置文件路径；None 时使用默认配置
    ///
    /// # 返回
    /// - Ok(ConfigManager): 已通过校验的配置
    /// - Err: 文件读取失败、JSON 格式错误、取值非法
    pub fn load(path: Option<&Path>) -> ConvertResult<Self> {
        let config = match path {
            None => {
                debug!("未指定配置文件，使用默认配置");
                AppConfig::default()
            }
            Some(path) => {
                let raw = fs::read_to_string(path).map_err(|e| ConvertError::ConfigReadError {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })?;
                let config = Self::parse(&raw).map_err(|e| match e {
                    ConvertError::ConfigReadError { message, .. } => {
                        ConvertError::ConfigReadError {
                            path: path.display().to_string(),
                            message,
                        }
                    }
                    other => other,
                })?;
                info!(path = %path.display(), "配置文件已加载");
                config
            }
        };

        Ok(Self { config })
    }

    /// 从 JSON 文本解析并校验配置
    pub fn parse(raw: &str) -> ConvertResult<AppConfig> {
        let config: AppConfig =
            serde_json::from_str(raw).map_err(|e| ConvertError::ConfigReadError {
                path: "<inline>".to_string(),
                message: e.to_string(),
            })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// 校验配置取值
    pub fn validate(config: &AppConfig) -> ConvertResult<()> {
        let layout = &config.layout;

        if layout.first_data_row == 0 {
            return Err(value_error("layout.first_data_row", "行号从 1 开始"));
        }
        for (key, column) in layout.columns.entries() {
            if column == 0 {
                return Err(value_error(key, "列号从 1 开始"));
            }
        }
        if layout.summary_reveal_rows == 0 {
            return Err(value_error(
                "layout.summary_reveal_rows",
                "至少为 1，否则汇总行会被隐藏",
            ));
        }
        if layout.output_suffix.trim().is_empty() {
            return Err(value_error(
                "layout.output_suffix",
                "后缀不能为空，否则会覆盖模板文件",
            ));
        }

        let import = &config.import;
        if !(import.length_column_divisor > 0.0) {
            return Err(value_error("import.length_column_divisor", "必须大于 0"));
        }
        if !(import.length_text_divisor > 0.0) {
            return Err(value_error("import.length_text_divisor", "必须大于 0"));
        }
        if import.default_steel_grade.trim().is_empty() {
            return Err(value_error("import.default_steel_grade", "不能为空"));
        }

        Ok(())
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn into_config(self) -> AppConfig {
        self.config
    }
}

fn value_error(key: &str, message: &str) -> ConvertError {
    ConvertError::ConfigValueError {
        key: key.to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let manager = ConfigManager::with_defaults();
        let config = manager.config();
        assert_eq!(config.layout.first_data_row, 4);
        assert_eq!(config.layout.columns.length, 10);
        assert_eq!(config.layout.columns.weight, 17);
        assert_eq!(config.layout.output_suffix, "_processado");
        assert_eq!(config.import.default_steel_grade, "A36");
        assert!(ConfigManager::validate(config).is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            ConfigManager::parse(r#"{"layout": {"first_data_row": 6}, "import": {"default_steel_grade": "A572"}}"#)
                .unwrap();
        assert_eq!(config.layout.first_data_row, 6);
        assert_eq!(config.layout.columns.code, 1);
        assert_eq!(config.layout.summary_reveal_rows, 25);
        assert_eq!(config.import.default_steel_grade, "A572");
        assert_eq!(config.import.length_column_divisor, 100.0);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = ConfigManager::parse(r#"{"layout": {"columns": {"length": 0}}}"#).unwrap_err();
        match err {
            ConvertError::ConfigValueError { key, .. } => assert_eq!(key, "layout.columns.length"),
            other => panic!("unexpected error: {:?}", other),
        }

        let err = ConfigManager::parse(r#"{"layout": {"output_suffix": "  "}}"#).unwrap_err();
        assert!(matches!(err, ConvertError::ConfigValueError { .. }));

        let err = ConfigManager::parse(r#"{"import": {"length_column_divisor": 0}}"#).unwrap_err();
        assert!(matches!(err, ConvertError::ConfigValueError { .. }));
    }

    #[test]
    fn test_summary_reveal_rows_must_be_positive() {
        let err = ConfigManager::parse(r#"{"layout": {"summary_reveal_rows": 0}}"#).unwrap_err();
        match err {
            ConvertError::ConfigValueError { key, .. } => {
                assert_eq!(key, "layout.summary_reveal_rows")
            }
            other => panic!("unexpected error: {:?}", other),
        }

        let config = ConfigManager::parse(r#"{"layout": {"summary_reveal_rows": 1}}"#).unwrap();
        assert_eq!(config.layout.summary_reveal_rows, 1);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"layout": {{"output_suffix": "_filled"}}}}"#).unwrap();

        let manager = ConfigManager::load(Some(file.path())).unwrap();
        assert_eq!(manager.config().layout.output_suffix, "_filled");
    }

    #[test]
    fn test_load_malformed_file_reports_path() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = ConfigManager::load(Some(file.path())).err().unwrap();
        match err {
            ConvertError::ConfigReadError { path, .. } => {
                assert_eq!(path, file.path().display().to_string())
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
