// ==========================================
// 钢结构材料清单转录 - 领域类型定义
// ==========================================
// 依据: 模板 Excel 第 1 列的分区代码
// 红线: 每个材料只属于一个型材类别
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 型材类别 (Profile Category)
// ==========================================
// 序列化格式: SCREAMING_SNAKE_CASE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProfileCategory {
    WBeam,        // W 型钢（按名称匹配）
    UChannel,     // U 型槽钢 [
    Purlin,       // 檩条 / 卷边槽钢
    Angle,        // 折弯角钢
    RoundBar,     // 圆钢
    Tube,         // 钢管
    Unclassified, // 未识别
}

impl ProfileCategory {
    /// 模板第 1 列对应的分区代码
    pub fn section_code(&self) -> &'static str {
        match self {
            ProfileCategory::WBeam => "VIGA W",
            ProfileCategory::UChannel => "U.s",
            ProfileCategory::Purlin => "U.e",
            ProfileCategory::Angle => "L DOBRADO",
            ProfileCategory::RoundBar => "FERRO MECANICO RED.",
            ProfileCategory::Tube => "TUBO",
            ProfileCategory::Unclassified => "N/D",
        }
    }

    /// W 型钢按规格名称定位行，不使用分区游标
    pub fn is_w_beam(&self) -> bool {
        matches!(self, ProfileCategory::WBeam)
    }

    /// 描述中至少需要的数字个数（不足时尺寸全部保持 0）
    pub fn required_tokens(&self) -> usize {
        match self {
            ProfileCategory::UChannel => 3,
            ProfileCategory::Purlin => 4,
            ProfileCategory::Angle => 2,
            ProfileCategory::RoundBar | ProfileCategory::Tube => 1,
            ProfileCategory::WBeam | ProfileCategory::Unclassified => 0,
        }
    }
}

impl fmt::Display for ProfileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileCategory::WBeam => write!(f, "W_BEAM"),
            ProfileCategory::UChannel => write!(f, "U_CHANNEL"),
            ProfileCategory::Purlin => write!(f, "PURLIN"),
            ProfileCategory::Angle => write!(f, "ANGLE"),
            ProfileCategory::RoundBar => write!(f, "ROUND_BAR"),
            ProfileCategory::Tube => write!(f, "TUBE"),
            ProfileCategory::Unclassified => write!(f, "UNCLASSIFIED"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_codes() {
        assert_eq!(ProfileCategory::WBeam.section_code(), "VIGA W");
        assert_eq!(ProfileCategory::Purlin.section_code(), "U.e");
        assert_eq!(ProfileCategory::Unclassified.section_code(), "N/D");
    }

    #[test]
    fn test_category_serialization() {
        let json = serde_json::to_string(&ProfileCategory::RoundBar).unwrap();
        assert_eq!(json, "\"ROUND_BAR\"");
        assert_eq!(ProfileCategory::UChannel.to_string(), "U_CHANNEL");
    }
}
