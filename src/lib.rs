// ==========================================
// 钢结构材料清单转录 - 核心库
// ==========================================
// 功能: 读取 Word 材料表，填充 Excel 钢材模板
// 技术栈: Rust + zip / quick-xml / calamine
// 输出: 模板同目录下的 <文件名>_processado.xlsx（模板本身不修改）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 材料条目与处理报告
pub mod domain;

// 错误类型
pub mod error;

// 配置层 - 模板布局与导入参数
pub mod config;

// 引擎层 - 解析、分类、行匹配
pub mod engine;

// 导入层 - Word 材料表
pub mod importer;

// 工作簿层 - Excel 模板读写
pub mod workbook;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    Dimensions, ItemOutcome, ItemReport, MaterialItem, ProcessReport, ProcessSummary,
    ProfileCategory, UnmatchedReason,
};

// 错误
pub use error::{ConvertError, ConvertResult};

// 配置
pub use config::{AppConfig, ConfigManager};

// 引擎
pub use engine::{process_files, FillOrchestrator};

// ==========================================
// 常量定义
// ==========================================

// 版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 名称
pub const APP_NAME: &str = "钢结构材料清单转录工具";
