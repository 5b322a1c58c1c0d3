// ==========================================
// 钢结构材料清单转录 - 工作表单元格网格
// ==========================================
// 职责: 活动工作表的内存视图（值 + 本次修改 + 行可见性）
// 约定: 行号、列号均从 1 开始
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ==========================================
// CellValue - 单元格值
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Text(String),
    Number(f64),
}

impl CellValue {
    /// 长度列"可用"判定：空串、"0"、数值 0
    pub fn is_blank_or_zero(&self) -> bool {
        match self {
            CellValue::Text(text) => text.is_empty() || text == "0",
            CellValue::Number(value) => *value == 0.0,
        }
    }

    /// 是否有实际内容（空串与数值 0 视为无内容）
    pub fn is_present(&self) -> bool {
        match self {
            CellValue::Text(text) => !text.is_empty(),
            CellValue::Number(value) => *value != 0.0,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(text) => write!(f, "{}", text),
            CellValue::Number(value) => write!(f, "{}", value),
        }
    }
}

// ==========================================
// SheetGrid - 工作表网格
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct SheetGrid {
    cells: BTreeMap<(u32, u32), CellValue>,
    edits: BTreeMap<(u32, u32), CellValue>,
    row_hidden: BTreeMap<u32, bool>,
    max_row: u32,
}

impl SheetGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// 由模板中已有的单元格构建（不计入修改）
    pub fn from_cells<I>(cells: I) -> Self
    where
        I: IntoIterator<Item = ((u32, u32), CellValue)>,
    {
        let mut grid = Self::new();
        for ((row, col), value) in cells {
            grid.max_row = grid.max_row.max(row);
            grid.cells.insert((row, col), value);
        }
        grid
    }

    pub fn value(&self, row: u32, col: u32) -> Option<&CellValue> {
        self.cells.get(&(row, col))
    }

    /// 单元格文本（TRIM 后）；空单元格返回空串
    pub fn text(&self, row: u32, col: u32) -> String {
        self.value(row, col)
            .map(|value| value.to_string().trim().to_string())
            .unwrap_or_default()
    }

    /// 单元格为空、空串、"0" 或数值 0
    pub fn is_blank_or_zero(&self, row: u32, col: u32) -> bool {
        self.value(row, col).map_or(true, CellValue::is_blank_or_zero)
    }

    /// 单元格有实际内容
    pub fn is_present(&self, row: u32, col: u32) -> bool {
        self.value(row, col).map_or(false, CellValue::is_present)
    }

    /// 写入单元格（同时记录为本次修改）
    pub fn set(&mut self, row: u32, col: u32, value: CellValue) {
        self.max_row = self.max_row.max(row);
        self.cells.insert((row, col), value.clone());
        self.edits.insert((row, col), value);
    }

    pub fn set_number(&mut self, row: u32, col: u32, value: f64) {
        self.set(row, col, CellValue::Number(value));
    }

    pub fn set_text(&mut self, row: u32, col: u32, value: &str) {
        self.set(row, col, CellValue::Text(value.to_string()));
    }

    pub fn set_row_hidden(&mut self, row: u32, hidden: bool) {
        self.row_hidden.insert(row, hidden);
    }

    /// 本次设置过的行可见性（未设置为 None）
    pub fn row_hidden(&self, row: u32) -> Option<bool> {
        self.row_hidden.get(&row).copied()
    }

    /// 最大有值行号（空表为 0）
    pub fn max_row(&self) -> u32 {
        self.max_row
    }

    pub fn edits(&self) -> &BTreeMap<(u32, u32), CellValue> {
        &self.edits
    }

    pub fn row_visibility(&self) -> &BTreeMap<u32, bool> {
        &self.row_hidden
    }

    pub fn hidden_row_count(&self) -> usize {
        self.row_hidden.values().filter(|hidden| **hidden).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_or_zero() {
        assert!(CellValue::Text(String::new()).is_blank_or_zero());
        assert!(CellValue::Text("0".to_string()).is_blank_or_zero());
        assert!(CellValue::Number(0.0).is_blank_or_zero());
        assert!(!CellValue::Number(4.5).is_blank_or_zero());
        assert!(!CellValue::Text(" ".to_string()).is_blank_or_zero());
    }

    #[test]
    fn test_grid_text_and_edits() {
        let mut grid = SheetGrid::from_cells(vec![
            ((4, 1), CellValue::Text("  U.e ".to_string())),
            ((5, 1), CellValue::Number(100.0)),
        ]);
        assert_eq!(grid.max_row(), 5);
        assert_eq!(grid.text(4, 1), "U.e");
        assert_eq!(grid.text(5, 1), "100");
        assert_eq!(grid.text(6, 1), "");
        assert!(grid.edits().is_empty());

        grid.set_number(4, 10, 6.0);
        assert!(!grid.is_blank_or_zero(4, 10));
        assert_eq!(grid.edits().len(), 1);

        grid.set_text(9, 9, "A36");
        assert_eq!(grid.max_row(), 9);
    }

    #[test]
    fn test_row_visibility() {
        let mut grid = SheetGrid::new();
        grid.set_row_hidden(4, true);
        grid.set_row_hidden(5, false);
        assert_eq!(grid.row_hidden(4), Some(true));
        assert_eq!(grid.row_hidden(6), None);
        assert_eq!(grid.hidden_row_count(), 1);
    }
}
