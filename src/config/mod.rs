// ==========================================
// 钢结构材料清单转录 - 配置层
// ==========================================
// 职责: 模板布局与导入参数，支持 JSON 文件覆写
// ==========================================

pub mod config_manager;
pub mod layout;

// 重导出核心配置
pub use config_manager::ConfigManager;
pub use layout::{AppConfig, ColumnLayout, ImportSettings, TemplateLayout};
