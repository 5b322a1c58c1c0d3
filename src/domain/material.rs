// ==========================================
// 钢结构材料清单转录 - 材料领域模型
// ==========================================
// 依据: Word 材料表第 2 行（型材 / 钢种 / 总长 / 重量 四列）
// 用途: 导入层生成，引擎层只读，写入后即丢弃
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// MaterialItem - 材料条目
// ==========================================
// 对齐: 型材列的每一个非空行生成一个条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialItem {
    pub line_number: usize,  // 型材列中的行号（从 1 开始）
    pub description: String, // 型材描述原文（已 TRIM）
    pub steel_grade: String, // 钢种（列不足时取首个值或默认值）
    pub length_m: f64,       // 总长（米），0 表示未知
    pub weight: f64,         // 重量，解析失败为 0
}

// ==========================================
// Dimensions - 型材尺寸（毫米）
// ==========================================
// 仅对定义了提取规则的类别填充，其余保持 0
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub thickness: f64,
}
