// ==========================================
// 钢结构材料清单转录 - 型材尺寸提取
// ==========================================
// 职责: 型材描述 + 类别 → 尺寸 (a, b, c, 厚度)
// 规则: 按出现顺序取数字记号，按类别映射位置
// ==========================================

use crate::domain::material::Dimensions;
use crate::domain::types::ProfileCategory;
use crate::engine::dimension::parse_dimension_mm;
use once_cell::sync::Lazy;
use regex::Regex;

/// 数字记号：数字、小数点、分数线、逗号的连续串
static NUMERIC_TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\d./,]+").expect("数字记号正则无效"));

/// 按出现顺序提取数字记号
pub fn numeric_tokens(description: &str) -> Vec<&str> {
    NUMERIC_TOKEN_PATTERN
        .find_iter(description)
        .map(|m| m.as_str())
        .collect()
}

/// 提取型材尺寸
///
/// # 映射
/// - U 型槽钢: a, b, 厚度
/// - 檩条: a, b, c, 厚度
/// - 角钢: 边长 → a 与 b, 厚度
/// - 钢管 / 圆钢: 第一个数字 → 厚度列
/// - W 型钢 / 未识别: 不提取
///
/// 数字个数不足时全部保持 0.0
pub fn extract_dimensions(description: &str, category: ProfileCategory) -> Dimensions {
    let tokens = numeric_tokens(description);
    let required = category.required_tokens();
    if required == 0 || tokens.len() < required {
        return Dimensions::default();
    }

    let mm = |idx: usize| parse_dimension_mm(tokens[idx]);
    match category {
        ProfileCategory::UChannel => Dimensions {
            a: mm(0),
            b: mm(1),
            thickness: mm(2),
            ..Dimensions::default()
        },
        ProfileCategory::Purlin => Dimensions {
            a: mm(0),
            b: mm(1),
            c: mm(2),
            thickness: mm(3),
        },
        ProfileCategory::Angle => {
            let leg = mm(0);
            Dimensions {
                a: leg,
                b: leg,
                thickness: mm(1),
                ..Dimensions::default()
            }
        }
        ProfileCategory::RoundBar | ProfileCategory::Tube => Dimensions {
            thickness: mm(0),
            ..Dimensions::default()
        },
        ProfileCategory::WBeam | ProfileCategory::Unclassified => Dimensions::default(),
    }
}
