// ==========================================
// 钢结构材料清单转录 - 错误类型
// ==========================================
// 工具: thiserror 派生宏
// 分类: 无数据可处理（警告） / 文件与格式错误（中止）
// 数值解析失败不在此列：一律按 0 处理
// ==========================================

use thiserror::Error;

/// 转录流程错误类型
#[derive(Error, Debug)]
pub enum ConvertError {
    // ===== 无数据可处理（调用方按警告展示）=====
    #[error("Word 文件中没有表格")]
    NoTableFound,

    #[error("材料表行数不足: 共 {rows} 行，至少需要表头 + 1 行数据")]
    TableTooShort { rows: usize },

    #[error("材料表型材列为空，没有可处理的材料")]
    EmptyExtraction,

    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("文件写入失败: {0}")]
    FileWriteError(String),

    // ===== 格式解析错误 =====
    #[error("Word 文档解析失败: {0}")]
    DocumentParseError(String),

    #[error("Excel 解析失败: {0}")]
    SpreadsheetParseError(String),

    #[error("工作表不存在: {0}")]
    SheetNotFound(String),

    // ===== 配置错误 =====
    #[error("配置读取失败 (path: {path}): {message}")]
    ConfigReadError { path: String, message: String },

    #[error("配置值错误 (key: {key}): {message}")]
    ConfigValueError { key: String, message: String },

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ConvertError {
    /// 是否属于"没有可处理的数据"（警告而非失败）
    pub fn is_nothing_to_process(&self) -> bool {
        matches!(
            self,
            ConvertError::NoTableFound
                | ConvertError::TableTooShort { .. }
                | ConvertError::EmptyExtraction
        )
    }
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ConvertError {
    fn from(err: std::io::Error) -> Self {
        ConvertError::FileReadError(err.to_string())
    }
}

// 实现 From<zip::result::ZipError>
impl From<zip::result::ZipError> for ConvertError {
    fn from(err: zip::result::ZipError) -> Self {
        ConvertError::UnsupportedFormat(format!("不是有效的 Office 压缩包: {}", err))
    }
}

// 实现 From<quick_xml::Error>
impl From<quick_xml::Error> for ConvertError {
    fn from(err: quick_xml::Error) -> Self {
        ConvertError::SpreadsheetParseError(format!("XML 解析失败: {}", err))
    }
}

// 实现 From<calamine::XlsxError>
impl From<calamine::XlsxError> for ConvertError {
    fn from(err: calamine::XlsxError) -> Self {
        ConvertError::SpreadsheetParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ConvertResult<T> = Result<T, ConvertError>;
