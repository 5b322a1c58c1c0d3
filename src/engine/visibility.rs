// ==========================================
// 钢结构材料清单转录 - 行可见性
// ==========================================
// 职责: 隐藏未填写长度的数据行，保持汇总区可见
// 规则: 从数据起始行向下扫描
//       第 1 列包含汇总标记 → 该行起 N 行（不超过末行）设为可见，停止扫描
//       第 1 列有值且长度列为空 / 0 → 隐藏；其余 → 可见
// ==========================================

use crate::config::TemplateLayout;
use crate::workbook::SheetGrid;
use tracing::debug;

/// 可见性处理结果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VisibilityOutcome {
    pub hidden_rows: usize,
    pub summary_row: Option<u32>,
}

/// 设置数据行可见性
pub fn apply_row_visibility(grid: &mut SheetGrid, layout: &TemplateLayout) -> VisibilityOutcome {
    let columns = &layout.columns;
    let markers: Vec<String> = layout
        .summary_markers
        .iter()
        .map(|marker| marker.to_uppercase())
        .collect();
    let max_row = grid.max_row();
    let mut outcome = VisibilityOutcome::default();

    for row in layout.first_data_row..=max_row {
        let code = grid.text(row, columns.code).to_uppercase();
        if markers.iter().any(|marker| code.contains(marker.as_str())) {
            let end = row.saturating_add(layout.summary_reveal_rows).min(max_row + 1);
            for summary_row in row..end {
                grid.set_row_hidden(summary_row, false);
            }
            outcome.summary_row = Some(row);
            break;
        }

        let hidden = grid.is_present(row, columns.code) && grid.is_blank_or_zero(row, columns.length);
        grid.set_row_hidden(row, hidden);
        if hidden {
            outcome.hidden_rows += 1;
        }
    }

    debug!(
        hidden_rows = outcome.hidden_rows,
        summary_row = ?outcome.summary_row,
        "行可见性已更新"
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workbook::CellValue;

    fn text(value: &str) -> CellValue {
        CellValue::Text(value.to_string())
    }

    #[test]
    fn test_hide_rows_without_length() {
        let mut grid = SheetGrid::from_cells(vec![
            ((4, 1), text("U.e")),
            ((4, 10), CellValue::Number(4.5)),
            ((5, 1), text("U.e")),
            ((6, 2), CellValue::Number(1.0)),
            ((7, 1), text("TUBO")),
            ((7, 10), text("0")),
        ]);
        let outcome = apply_row_visibility(&mut grid, &TemplateLayout::default());

        assert_eq!(grid.row_hidden(4), Some(false));
        assert_eq!(grid.row_hidden(5), Some(true));
        assert_eq!(grid.row_hidden(6), Some(false)); // 第 1 列为空
        assert_eq!(grid.row_hidden(7), Some(true));
        assert_eq!(outcome.hidden_rows, 2);
        assert_eq!(outcome.summary_row, None);
    }

    #[test]
    fn test_summary_block_stays_visible() {
        let mut cells = vec![((4, 1), text("U.e")), ((5, 1), text("Peso total"))];
        for row in 6..=40 {
            cells.push(((row, 1), text("U.e")));
        }
        let mut grid = SheetGrid::from_cells(cells);
        let outcome = apply_row_visibility(&mut grid, &TemplateLayout::default());

        assert_eq!(outcome.summary_row, Some(5));
        assert_eq!(grid.row_hidden(4), Some(true));
        assert_eq!(grid.row_hidden(5), Some(false));
        assert_eq!(grid.row_hidden(29), Some(false));
        // 汇总区窗口之后的行不再处理
        assert_eq!(grid.row_hidden(30), None);
        assert_eq!(grid.row_hidden(40), None);
    }

    #[test]
    fn test_summary_window_clamped_to_last_row() {
        let mut grid = SheetGrid::from_cells(vec![
            ((4, 1), text("RESUMO")),
            ((6, 1), text("x")),
        ]);
        apply_row_visibility(&mut grid, &TemplateLayout::default());
        assert_eq!(grid.row_hidden(6), Some(false));
        assert_eq!(grid.row_hidden(7), None);
    }
}
