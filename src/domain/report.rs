// ==========================================
// 钢结构材料清单转录 - 处理报告模型
// ==========================================
// 职责: 逐条记录写入结果，未匹配条目必须带原因返回
// 红线: 不允许静默丢弃材料
// ==========================================

use crate::domain::material::MaterialItem;
use crate::domain::types::ProfileCategory;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// UnmatchedReason - 未匹配原因
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnmatchedReason {
    /// W 型钢：模板中没有同名且长度为空的行
    NameNotFound { key: String },
    /// 其他类别：分区内已无可用行
    NoAvailableRow { section: String },
}

impl fmt::Display for UnmatchedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnmatchedReason::NameNotFound { key } => {
                write!(f, "模板中未找到可用的 W 型钢行: {}", key)
            }
            UnmatchedReason::NoAvailableRow { section } => {
                write!(f, "分区 {} 已无可用行", section)
            }
        }
    }
}

// ==========================================
// ItemOutcome - 单条材料的处理结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemOutcome {
    Written {
        row: u32,              // 目标行号（从 1 开始）
        length_written: bool, // 长度为 0 时不写第 10 列
    },
    Unmatched {
        reason: UnmatchedReason,
    },
}

impl ItemOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, ItemOutcome::Written { .. })
    }

    pub fn row(&self) -> Option<u32> {
        match self {
            ItemOutcome::Written { row, .. } => Some(*row),
            ItemOutcome::Unmatched { .. } => None,
        }
    }
}

// ==========================================
// ItemReport - 单条材料报告
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemReport {
    pub line_number: usize,
    pub description: String,
    pub category: ProfileCategory,
    pub section_code: String,
    pub lookup_key: String, // W 型钢为规范化名称，其余为分区代码
    pub length_m: f64,      // 实际写入的长度（已含倍长规则）
    pub weight: f64,
    pub outcome: ItemOutcome,
}

impl ItemReport {
    pub fn new(
        item: &MaterialItem,
        category: ProfileCategory,
        lookup_key: String,
        length_m: f64,
        outcome: ItemOutcome,
    ) -> Self {
        Self {
            line_number: item.line_number,
            description: item.description.clone(),
            category,
            section_code: category.section_code().to_string(),
            lookup_key,
            length_m,
            weight: item.weight,
            outcome,
        }
    }
}

// ==========================================
// ProcessSummary - 汇总统计
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessSummary {
    pub total_items: usize,
    pub written: usize,
    pub unmatched: usize,
    pub hidden_rows: usize,
    pub summary_row: Option<u32>, // 汇总区起始行（未找到为 None）
}

// ==========================================
// ProcessReport - 一次转录的完整报告
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessReport {
    pub batch_id: String,
    pub document_path: String,
    pub template_path: String,
    pub output_path: String,
    pub sheet_name: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub items: Vec<ItemReport>,
    pub summary: ProcessSummary,
}

impl ProcessReport {
    /// 未写入模板的条目
    pub fn unmatched_items(&self) -> impl Iterator<Item = &ItemReport> {
        self.items.iter().filter(|item| !item.outcome.is_written())
    }

    pub fn is_complete(&self) -> bool {
        self.summary.unmatched == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_serialization() {
        let outcome = ItemOutcome::Unmatched {
            reason: UnmatchedReason::NoAvailableRow {
                section: "U.e".to_string(),
            },
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "UNMATCHED");
        assert_eq!(json["reason"]["kind"], "NO_AVAILABLE_ROW");
        assert_eq!(json["reason"]["section"], "U.e");
    }

    #[test]
    fn test_outcome_row() {
        let written = ItemOutcome::Written {
            row: 7,
            length_written: true,
        };
        assert!(written.is_written());
        assert_eq!(written.row(), Some(7));
    }
}
