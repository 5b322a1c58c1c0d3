// ==========================================
// 钢结构材料清单转录 - 材料表读取 Trait
// ==========================================
// 职责: 定义材料表读取接口（不包含实现）
// 管道: 文件 → 表格文本（TableParser）→ 材料条目（FieldMapper）
// ==========================================

use crate::domain::MaterialItem;
use crate::error::ConvertResult;
use std::path::Path;

// ==========================================
// TableParser Trait
// ==========================================
// 用途: 文档解析接口（阶段 0）
// 实现者: DocxTableParser
pub trait TableParser: Send + Sync {
    /// 读取文档中的第一个表格
    ///
    /// # 参数
    /// - file_path: 文档路径
    ///
    /// # 返回
    /// - Ok(Vec<Vec<String>>): 行 → 单元格文本（段落以 '\n' 连接）
    /// - Err: 文件不存在、格式错误、文档中没有表格
    fn parse_first_table(&self, file_path: &Path) -> ConvertResult<Vec<Vec<String>>>;
}

// ==========================================
// FieldMapper Trait
// ==========================================
// 用途: 字段映射接口（阶段 1）
// 实现者: MaterialFieldMapper
pub trait FieldMapper: Send + Sync {
    /// 将表格文本映射为材料条目
    ///
    /// # 参数
    /// - rows: 表格全部行（第 1 行为表头）
    ///
    /// # 返回
    /// - Ok(Vec<MaterialItem>): 至少一个条目
    /// - Err: 行数不足、型材列为空
    fn map_to_materials(&self, rows: &[Vec<String>]) -> ConvertResult<Vec<MaterialItem>>;
}
