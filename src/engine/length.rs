// ==========================================
// 钢结构材料清单转录 - 长度解析
// ==========================================
// 职责: 确定材料总长（米）
// 优先级: 1. 表格长度列（厘米）  2. 描述中的长度标记（毫米）
// 注意: 两条路径单位不同（÷100 与 ÷1000），按现行材料表口径保留
// ==========================================

use crate::config::ImportSettings;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// 描述中的长度标记：C=4500 / L:3000 / COMPR 6000 / 4500mm
static TEXT_LENGTH_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:C|L|COMPR)[\s=:]*(\d{3,5})|(?:^|\s)(\d{3,5})\s*mm")
        .expect("长度标记正则无效")
});

/// 解析表格长度列（厘米 → 米）；空值、无法解析或非有限值时返回 0.0
pub fn parse_column_length_m(column_value: &str, divisor: f64) -> f64 {
    let trimmed = column_value.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed.replace(',', ".").parse::<f64>() {
        Ok(value) if value.is_finite() => value / divisor,
        _ => {
            debug!(value = %trimmed, "长度列无法解析，改用描述中的长度");
            0.0
        }
    }
}

/// 从描述中提取长度（毫米 → 米）；未找到标记时返回 0.0
pub fn extract_text_length_m(description: &str, divisor: f64) -> f64 {
    TEXT_LENGTH_PATTERN
        .captures(description)
        .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .map(|mm| mm / divisor)
        .unwrap_or(0.0)
}

/// 确定材料总长（米）
///
/// 表格值非 0 时优先使用，否则回退到描述中的长度标记
pub fn resolve_length_m(column_value: &str, description: &str, settings: &ImportSettings) -> f64 {
    let from_column = parse_column_length_m(column_value, settings.length_column_divisor);
    if from_column != 0.0 {
        return from_column;
    }
    extract_text_length_m(description, settings.length_text_divisor)
}
