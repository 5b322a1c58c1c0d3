// ==========================================
// 钢结构材料清单转录 - 工作簿层
// ==========================================
// 职责: Excel 模板的读取、单元格修改、另存为
// 红线: 不含材料分类与行匹配逻辑
// ==========================================

pub mod cell_ref;
pub mod grid;
pub mod package;
pub mod template;
pub mod xml_patch;

// 重导出核心类型
pub use cell_ref::{cell_reference, column_letters, parse_cell_reference};
pub use grid::{CellValue, SheetGrid};
pub use package::{read_relationships, resolve_part_path, OfficePackage, PackageEntry, Relationship};
pub use template::{output_path_for, resolve_active_sheet, SheetLocation, TemplateWorkbook};
