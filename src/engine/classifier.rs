// ==========================================
// 钢结构材料清单转录 - 型材分类器
// ==========================================
// 职责: 型材描述 → (分区代码, 型材类别)
// 规则: 按顺序匹配，先命中者生效；W 型钢优先于所有规则
// ==========================================

use crate::domain::types::ProfileCategory;
use once_cell::sync::Lazy;
use regex::Regex;

/// W 后接（可选空白）数字
static W_BEAM_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"W\s*\d").expect("W 型钢正则无效"));

/// 檩条标记
const PURLIN_MARKERS: [&str; 4] = ["UENR", "IENR", "CART", "CA "];

type RulePredicate = fn(&str) -> bool;

/// 分类规则表（顺序即优先级），谓词接收已转大写的描述
const CLASSIFICATION_RULES: [(RulePredicate, ProfileCategory); 6] = [
    (is_w_beam, ProfileCategory::WBeam),
    (is_u_channel, ProfileCategory::UChannel),
    (is_purlin, ProfileCategory::Purlin),
    (is_angle, ProfileCategory::Angle),
    (is_round_bar, ProfileCategory::RoundBar),
    (is_tube, ProfileCategory::Tube),
];

fn is_w_beam(desc: &str) -> bool {
    W_BEAM_PATTERN.is_match(desc)
}

fn is_u_channel(desc: &str) -> bool {
    desc.contains('[')
}

fn is_purlin(desc: &str) -> bool {
    PURLIN_MARKERS.iter().any(|marker| desc.contains(marker))
}

fn is_angle(desc: &str) -> bool {
    desc.contains("L DOBRADO") || desc.starts_with("L ")
}

fn is_round_bar(desc: &str) -> bool {
    desc.contains("RED")
}

fn is_tube(desc: &str) -> bool {
    desc.contains("TUBO")
}

/// 分类型材描述
///
/// # 返回
/// - (分区代码, 类别)；无规则命中时为 ("N/D", Unclassified)
pub fn classify_profile(description: &str) -> (&'static str, ProfileCategory) {
    let upper = description.to_uppercase();
    let category = CLASSIFICATION_RULES
        .iter()
        .find(|(matches, _)| matches(&upper))
        .map(|(_, category)| *category)
        .unwrap_or(ProfileCategory::Unclassified);
    (category.section_code(), category)
}
