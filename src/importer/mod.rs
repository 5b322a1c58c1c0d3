// ==========================================
// 钢结构材料清单转录 - 导入层
// ==========================================
// 职责: Word 材料表 → 材料条目
// 管道: 文件解析（TableParser）→ 字段映射（FieldMapper）
// ==========================================

// 模块声明
pub mod docx_reader;
pub mod field_mapper;
pub mod material_reader;
pub mod material_reader_trait;

// 重导出核心类型
pub use docx_reader::{parse_first_table_xml, DocxTableParser};
pub use field_mapper::{split_lines, MaterialFieldMapper};
pub use material_reader::MaterialListReader;

// 重导出 Trait 接口
pub use material_reader_trait::{FieldMapper, TableParser};
