// ==========================================
// 钢结构材料清单转录 - 流程编排器
// ==========================================
// 主流程: 读取材料表 → 打开模板 → 逐条写入 → 行可见性 → 另存为
// 红线: 材料表无可处理数据时不打开模板、不写任何文件
//       结构性错误在写出前中止
// ==========================================

use crate::config::AppConfig;
use crate::domain::{ItemReport, MaterialItem, ProcessReport, ProcessSummary};
use crate::engine::row_matcher::SheetFiller;
use crate::engine::visibility::{apply_row_visibility, VisibilityOutcome};
use crate::error::{ConvertError, ConvertResult};
use crate::importer::MaterialListReader;
use crate::workbook::{output_path_for, SheetGrid, TemplateWorkbook};
use chrono::Utc;
use std::path::Path;
use tracing::{info, instrument, warn};
use uuid::Uuid;

// ==========================================
// FillOrchestrator - 转录编排器
// ==========================================
pub struct FillOrchestrator {
    config: AppConfig,
}

impl FillOrchestrator {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// 执行一次完整转录
    ///
    /// # 参数
    /// - document: Word 材料表（.docx）
    /// - template: Excel 模板（.xlsx），不会被修改
    ///
    /// # 返回
    /// - Ok(ProcessReport): 结果文件已写出，含逐条处理结果
    /// - Err: 无可处理数据（is_nothing_to_process）或文件 / 格式错误
    #[instrument(skip_all, fields(document = %document.display(), template = %template.display()))]
    pub fn run(&self, document: &Path, template: &Path) -> ConvertResult<ProcessReport> {
        let started_at = Utc::now();
        let batch_id = Uuid::new_v4().to_string();

        for path in [document, template] {
            if !path.exists() {
                return Err(ConvertError::FileNotFound(path.display().to_string()));
            }
        }

        // 1. 读取材料表（失败时模板保持未打开）
        let items = MaterialListReader::docx(self.config.import.clone()).read(document)?;

        // 2. 打开模板并写入
        let mut workbook = TemplateWorkbook::open(template)?;
        let (reports, visibility) = process_items(workbook.grid_mut(), &items, &self.config);

        // 3. 另存为
        let output = output_path_for(template, &self.config.layout.output_suffix);
        workbook.save_as(&output)?;

        let written = reports.iter().filter(|r| r.outcome.is_written()).count();
        let summary = ProcessSummary {
            total_items: reports.len(),
            written,
            unmatched: reports.len() - written,
            hidden_rows: visibility.hidden_rows,
            summary_row: visibility.summary_row,
        };

        if summary.unmatched > 0 {
            warn!(unmatched = summary.unmatched, "部分材料未写入模板");
        }
        info!(
            batch_id = %batch_id,
            output = %output.display(),
            total = summary.total_items,
            written = summary.written,
            hidden_rows = summary.hidden_rows,
            "转录完成"
        );

        Ok(ProcessReport {
            batch_id,
            document_path: document.display().to_string(),
            template_path: template.display().to_string(),
            output_path: output.display().to_string(),
            sheet_name: workbook.sheet_name().to_string(),
            started_at,
            finished_at: Utc::now(),
            items: reports,
            summary,
        })
    }
}

/// 转录入口（使用给定配置）
pub fn process_files(
    document: &Path,
    template: &Path,
    config: &AppConfig,
) -> ConvertResult<ProcessReport> {
    FillOrchestrator::new(config.clone()).run(document, template)
}

/// 按文档顺序写入全部条目，再设置行可见性
///
/// 分区游标在每次调用时重新开始
pub fn process_items(
    grid: &mut SheetGrid,
    items: &[MaterialItem],
    config: &AppConfig,
) -> (Vec<ItemReport>, VisibilityOutcome) {
    let mut filler = SheetFiller::new(&config.layout, &config.import);
    let reports: Vec<ItemReport> = items.iter().map(|item| filler.fill(grid, item)).collect();
    let visibility = apply_row_visibility(grid, &config.layout);
    (reports, visibility)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workbook::CellValue;

    fn item(line: usize, description: &str, length_m: f64) -> MaterialItem {
        MaterialItem {
            line_number: line,
            description: description.to_string(),
            steel_grade: "A36".to_string(),
            length_m,
            weight: 1.0,
        }
    }

    #[test]
    fn test_process_items_resets_cursors_per_call() {
        let config = AppConfig::default();
        let template = SheetGrid::from_cells(vec![
            ((4, 1), CellValue::Text("TUBO".to_string())),
            ((5, 1), CellValue::Text("TUBO".to_string())),
            ((6, 1), CellValue::Text("TOTAL".to_string())),
        ]);

        let mut grid = template.clone();
        let (reports, visibility) = process_items(&mut grid, &[item(1, "TUBO 2", 6.0)], &config);
        assert_eq!(reports[0].outcome.row(), Some(4));
        assert_eq!(visibility.hidden_rows, 1);
        assert_eq!(visibility.summary_row, Some(6));
        assert_eq!(grid.row_hidden(4), Some(false));
        assert_eq!(grid.row_hidden(5), Some(true));

        let mut grid = template;
        let (reports, _) = process_items(&mut grid, &[item(1, "TUBO 2", 6.0)], &config);
        assert_eq!(reports[0].outcome.row(), Some(4));
    }

    #[test]
    fn test_missing_inputs_rejected_before_reading() {
        let dir = tempfile::tempdir().unwrap();
        let err = process_files(
            &dir.path().join("lista.docx"),
            &dir.path().join("modelo.xlsx"),
            &AppConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ConvertError::FileNotFound(_)));
    }
}
