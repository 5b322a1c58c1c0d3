// ==========================================
// 钢结构材料清单转录 - 引擎层
// ==========================================
// 职责: 材料描述解析、型材分类、模板行匹配与写入
// 红线: 引擎不做文件读写（由导入层与工作簿层负责）
//       每个未写入的条目都必须输出原因
// ==========================================

pub mod classifier;
pub mod descriptor;
pub mod dimension;
pub mod length;
pub mod name_normalizer;
pub mod orchestrator;
pub mod row_matcher;
pub mod visibility;

// 重导出核心引擎
pub use classifier::classify_profile;
pub use descriptor::{extract_dimensions, numeric_tokens};
pub use dimension::{parse_dimension_mm, MM_PER_INCH};
pub use length::{extract_text_length_m, parse_column_length_m, resolve_length_m};
pub use name_normalizer::{comparison_key, normalize_w_beam_name};
pub use orchestrator::{process_files, process_items, FillOrchestrator};
pub use row_matcher::{RowAllocator, SheetFiller};
pub use visibility::{apply_row_visibility, VisibilityOutcome};
