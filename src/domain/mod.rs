// ==========================================
// 钢结构材料清单转录 - 领域模型层
// ==========================================
// 职责: 定义材料条目、型材类别、处理报告
// 红线: 不含文件读写逻辑,不含匹配逻辑
// ==========================================

pub mod material;
pub mod report;
pub mod types;

// 重导出核心类型
pub use material::{Dimensions, MaterialItem};
pub use report::{ItemOutcome, ItemReport, ProcessReport, ProcessSummary, UnmatchedReason};
pub use types::ProfileCategory;
