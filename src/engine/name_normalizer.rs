// ==========================================
// 钢结构材料清单转录 - W 型钢名称规范化
// ==========================================
// 职责: "W 150 x 22.5" / "W150 22,5" → "W150X22,5"
// 对齐: 模板第 1 列的 W 型钢规格写法（小数逗号）
// ==========================================

use once_cell::sync::Lazy;
use regex::Regex;

/// W + 高度 + 分隔符（x / 空白）+ 单重
static W_BEAM_NAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)W\s*(\d+)\s*[x\s]*\s*([\d.,]+)").expect("W 型钢名称正则无效")
});

/// 规范化 W 型钢名称
///
/// 单重的小数点统一为逗号，整数单重去掉末尾 ",0"；
/// 无法识别时返回 TRIM + UPPER 后的原文
pub fn normalize_w_beam_name(description: &str) -> String {
    match W_BEAM_NAME_PATTERN.captures(description) {
        Some(caps) => {
            let height = &caps[1];
            let mut weight = caps[2].replace('.', ",");
            if weight.ends_with(",0") {
                weight.truncate(weight.len() - 2);
            }
            format!("W{}X{}", height, weight)
        }
        None => description.trim().to_uppercase(),
    }
}

/// 比较用键：TRIM + UPPER + 去掉所有空格
pub fn comparison_key(value: &str) -> String {
    value.trim().to_uppercase().replace(' ', "")
}
