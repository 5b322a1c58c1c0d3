// ==========================================
// 钢结构材料清单转录 - 模板布局与导入参数
// ==========================================
// 职责: 定义模板列位置、数据起始行、输出命名等参数
// 默认值: 与现行钢材模板一致（表头占 1~3 行）
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// ColumnLayout - 模板列位置（从 1 开始）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnLayout {
    pub code: u32,      // 分区代码 / W 型钢规格名称
    pub dim_a: u32,     // 尺寸 A
    pub dim_b: u32,     // 尺寸 B
    pub dim_c: u32,     // 尺寸 C
    pub thickness: u32, // 厚度
    pub grade: u32,     // 钢种
    pub length: u32,    // 总长（米）
    pub weight: u32,    // 重量
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            code: 1,
            dim_a: 2,
            dim_b: 4,
            dim_c: 6,
            thickness: 8,
            grade: 9,
            length: 10,
            weight: 17,
        }
    }
}

impl ColumnLayout {
    /// 以 (配置键, 列号) 形式列出全部列，用于校验
    pub fn entries(&self) -> [(&'static str, u32); 8] {
        [
            ("layout.columns.code", self.code),
            ("layout.columns.dim_a", self.dim_a),
            ("layout.columns.dim_b", self.dim_b),
            ("layout.columns.dim_c", self.dim_c),
            ("layout.columns.thickness", self.thickness),
            ("layout.columns.grade", self.grade),
            ("layout.columns.length", self.length),
            ("layout.columns.weight", self.weight),
        ]
    }
}

// ==========================================
// TemplateLayout - 模板布局
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateLayout {
    pub first_data_row: u32,
    pub columns: ColumnLayout,
    pub summary_markers: Vec<String>, // 汇总区标记（第 1 列包含即视为汇总区）
    pub summary_reveal_rows: u32,     // 从汇总标记行起保持可见的行数
    pub output_suffix: String,        // 输出文件名后缀（插在扩展名之前）
}

impl Default for TemplateLayout {
    fn default() -> Self {
        Self {
            first_data_row: 4,
            columns: ColumnLayout::default(),
            summary_markers: vec![
                "TOTAL".to_string(),
                "ATIVO FINAL".to_string(),
                "RESUMO".to_string(),
            ],
            summary_reveal_rows: 25,
            output_suffix: "_processado".to_string(),
        }
    }
}

// ==========================================
// ImportSettings - 材料表导入参数
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportSettings {
    pub default_steel_grade: String,
    pub length_column_divisor: f64,  // 表格长度列单位换算（厘米 → 米）
    pub length_text_divisor: f64,    // 描述中长度单位换算（毫米 → 米）
    pub double_length_marker: String, // 描述包含此标记时长度翻倍
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            default_steel_grade: "A36".to_string(),
            length_column_divisor: 100.0,
            length_text_divisor: 1000.0,
            double_length_marker: "CA ".to_string(),
        }
    }
}

// ==========================================
// AppConfig - 全部配置
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub layout: TemplateLayout,
    pub import: ImportSettings,
}
