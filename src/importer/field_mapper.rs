// ==========================================
// 钢结构材料清单转录 - 字段映射器实现
// ==========================================
// 职责: 材料表第 2 行（型材 / 钢种 / 总长 / 重量）→ MaterialItem
// 规则: 四列按行位置对齐；空白行丢弃
//       钢种不足取首个钢种（无则默认钢种）
//       重量不足取首个重量（无则 0）
// ==========================================

use crate::config::ImportSettings;
use crate::domain::MaterialItem;
use crate::engine::length::resolve_length_m;
use crate::error::{ConvertError, ConvertResult};
use crate::importer::material_reader_trait::FieldMapper;
use tracing::debug;

/// 数据所在行（第 1 行为表头）
const DATA_ROW: usize = 1;

const PROFILE_COLUMN: usize = 0;
const GRADE_COLUMN: usize = 1;
const LENGTH_COLUMN: usize = 2;
const WEIGHT_COLUMN: usize = 3;

pub struct MaterialFieldMapper {
    settings: ImportSettings,
}

impl MaterialFieldMapper {
    pub fn new(settings: ImportSettings) -> Self {
        Self { settings }
    }
}

impl FieldMapper for MaterialFieldMapper {
    fn map_to_materials(&self, rows: &[Vec<String>]) -> ConvertResult<Vec<MaterialItem>> {
        if rows.len() < DATA_ROW + 1 {
            return Err(ConvertError::TableTooShort { rows: rows.len() });
        }
        let data_row = &rows[DATA_ROW];
        let column = |idx: usize| split_lines(data_row.get(idx).map(String::as_str).unwrap_or(""));

        let profiles = column(PROFILE_COLUMN);
        if profiles.is_empty() {
            return Err(ConvertError::EmptyExtraction);
        }
        let grades = column(GRADE_COLUMN);
        let lengths = column(LENGTH_COLUMN);
        let weights = column(WEIGHT_COLUMN);

        debug!(
            profiles = profiles.len(),
            grades = grades.len(),
            lengths = lengths.len(),
            weights = weights.len(),
            "材料表各列行数"
        );

        let items = profiles
            .iter()
            .enumerate()
            .map(|(idx, description)| {
                let steel_grade = grades
                    .get(idx)
                    .or_else(|| grades.first())
                    .cloned()
                    .unwrap_or_else(|| self.settings.default_steel_grade.clone());
                let length_value = lengths.get(idx).map(String::as_str).unwrap_or("");
                let weight = weights
                    .get(idx)
                    .or_else(|| weights.first())
                    .map(|value| parse_weight(value))
                    .unwrap_or(0.0);

                MaterialItem {
                    line_number: idx + 1,
                    description: description.clone(),
                    steel_grade,
                    length_m: resolve_length_m(length_value, description, &self.settings),
                    weight,
                }
            })
            .collect();

        Ok(items)
    }
}

/// 单元格文本按行拆分（TRIM 后丢弃空行）
pub fn split_lines(text: &str) -> Vec<String> {
    text.split(|c| c == '\n' || c == '\r')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// 解析重量（',' 视为小数点）；无法解析时为 0
fn parse_weight(value: &str) -> f64 {
    match value.trim().replace(',', ".").parse::<f64>() {
        Ok(weight) if weight.is_finite() => weight,
        _ => {
            debug!(value = %value, "重量无法解析，按 0 处理");
            0.0
        }
    }
}
