// ==========================================
// 钢结构材料清单转录 - Excel 模板
// ==========================================
// 职责: 打开模板、读取活动工作表、另存为结果文件
// 读取: calamine（单元格值）+ quick-xml（工作簿结构）
// 写出: 只改写活动工作表与 workbook.xml，其余部件原样保留
// ==========================================

use crate::error::{ConvertError, ConvertResult};
use crate::workbook::grid::{CellValue, SheetGrid};
use crate::workbook::package::{read_relationships, resolve_part_path, OfficePackage};
use crate::workbook::xml_patch::{patch_sheet_xml, patch_workbook_full_calc};
use calamine::{Data, Reader, Xlsx};
use quick_xml::events::{BytesStart, Event};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const WORKBOOK_PART: &str = "xl/workbook.xml";
const WORKBOOK_RELS_PART: &str = "xl/_rels/workbook.xml.rels";

/// 支持的模板扩展名
pub const TEMPLATE_EXTENSIONS: [&str; 4] = ["xlsx", "xlsm", "xltx", "xltm"];

/// 活动工作表位置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetLocation {
    pub name: String,
    pub path: String, // 压缩包内路径，如 xl/worksheets/sheet1.xml
}

// ==========================================
// TemplateWorkbook - 内存中的模板工作簿
// ==========================================
#[derive(Debug)]
pub struct TemplateWorkbook {
    path: PathBuf,
    package: OfficePackage,
    sheet: SheetLocation,
    grid: SheetGrid,
}

impl TemplateWorkbook {
    /// 打开模板文件
    ///
    /// # 参数
    /// - path: .xlsx / .xlsm / .xltx / .xltm 文件
    ///
    /// # 返回
    /// - Ok(TemplateWorkbook): 活动工作表已读入网格
    /// - Err: 文件不存在、格式不支持或解析失败
    pub fn open(path: &Path) -> ConvertResult<Self> {
        if !path.exists() {
            return Err(ConvertError::FileNotFound(path.display().to_string()));
        }
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();
        if !TEMPLATE_EXTENSIONS.contains(&extension.as_str()) {
            return Err(ConvertError::UnsupportedFormat(format!(
                "模板必须是 Excel 工作簿: {}",
                path.display()
            )));
        }

        let bytes = std::fs::read(path)
            .map_err(|e| ConvertError::FileReadError(format!("{}: {}", path.display(), e)))?;
        let package = OfficePackage::from_bytes(&bytes)?;
        let sheet = resolve_active_sheet(&package)?;
        let grid = read_grid(&bytes, &sheet.name)?;

        info!(
            template = %path.display(),
            sheet = %sheet.name,
            max_row = grid.max_row(),
            "模板已读取"
        );

        Ok(Self {
            path: path.to_path_buf(),
            package,
            sheet,
            grid,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn sheet_name(&self) -> &str {
        &self.sheet.name
    }

    pub fn grid(&self) -> &SheetGrid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut SheetGrid {
        &mut self.grid
    }

    /// 另存为新文件（模板本身不被修改）
    pub fn save_as(&self, output: &Path) -> ConvertResult<()> {
        let mut package = self.package.clone();

        let sheet_xml = package.require_entry(&self.sheet.path)?;
        let patched_sheet =
            patch_sheet_xml(sheet_xml, self.grid.edits(), self.grid.row_visibility())?;
        package.replace_entry(&self.sheet.path, patched_sheet);

        let workbook_xml = package.require_entry(WORKBOOK_PART)?;
        let patched_workbook = patch_workbook_full_calc(workbook_xml)?;
        package.replace_entry(WORKBOOK_PART, patched_workbook);

        package.write_to(output)?;
        debug!(
            output = %output.display(),
            edits = self.grid.edits().len(),
            hidden_rows = self.grid.hidden_row_count(),
            "结果文件已写出"
        );
        Ok(())
    }
}

/// 结果文件路径：模板同目录，文件名插入后缀
///
/// 例: `/data/modelo.xlsx` + `_processado` → `/data/modelo_processado.xlsx`
pub fn output_path_for(template: &Path, suffix: &str) -> PathBuf {
    let stem = template
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = match template.extension() {
        Some(ext) => format!("{}{}.{}", stem, suffix, ext.to_string_lossy()),
        None => format!("{}{}", stem, suffix),
    };
    template.with_file_name(file_name)
}

/// 确定活动工作表（workbookView activeTab，缺省为第一个工作表）
pub fn resolve_active_sheet(package: &OfficePackage) -> ConvertResult<SheetLocation> {
    let workbook = package.require_entry(WORKBOOK_PART)?;
    let (active_tab, sheets) = read_workbook_sheets(workbook)?;

    let (name, rel_id) = sheets
        .get(active_tab)
        .or_else(|| sheets.first())
        .cloned()
        .ok_or_else(|| ConvertError::SheetNotFound("工作簿中没有工作表".to_string()))?;

    let rels = package.require_entry(WORKBOOK_RELS_PART)?;
    let relationship = read_relationships(rels)?
        .into_iter()
        .find(|rel| rel.id == rel_id)
        .ok_or_else(|| ConvertError::SheetNotFound(format!("{} (关系 {} 缺失)", name, rel_id)))?;

    Ok(SheetLocation {
        name,
        path: resolve_part_path("xl", &relationship.target),
    })
}

/// 读取 workbook.xml: (activeTab, [(工作表名, 关系 Id)])
fn read_workbook_sheets(xml: &[u8]) -> ConvertResult<(usize, Vec<(String, String)>)> {
    let mut reader = quick_xml::Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut active_tab = 0usize;
    let mut sheets = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Eof => break,
            Event::Start(e) | Event::Empty(e) => match e.local_name().as_ref() {
                b"workbookView" => {
                    if let Some(tab) = attribute(&reader, &e, b"activeTab")? {
                        active_tab = tab.trim().parse().unwrap_or(0);
                    }
                }
                b"sheet" => {
                    let name = attribute(&reader, &e, b"name")?.unwrap_or_default();
                    let rel_id = attribute(&reader, &e, b"id")?.unwrap_or_default();
                    sheets.push((name, rel_id));
                }
                _ => {}
            },
            _ => {}
        }
        buf.clear();
    }

    Ok((active_tab, sheets))
}

fn attribute<R>(
    reader: &quick_xml::Reader<R>,
    e: &BytesStart<'_>,
    key: &[u8],
) -> ConvertResult<Option<String>> {
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        if attr.key.local_name().as_ref() == key {
            return Ok(Some(attr.decode_and_unescape_value(reader)?.into_owned()));
        }
    }
    Ok(None)
}

/// 用 calamine 读取工作表单元格值（公式取缓存结果）
fn read_grid(bytes: &[u8], sheet_name: &str) -> ConvertResult<SheetGrid> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range(sheet_name)
        .map_err(|e| ConvertError::SheetNotFound(format!("{}: {}", sheet_name, e)))?;

    let (start_row, start_col) = match range.start() {
        Some(start) => start,
        None => return Ok(SheetGrid::new()),
    };

    let cells = range.cells().filter_map(|(row, col, data)| {
        let value = to_cell_value(data)?;
        let row = start_row + row as u32 + 1;
        let col = start_col + col as u32 + 1;
        Some(((row, col), value))
    });

    Ok(SheetGrid::from_cells(cells))
}

fn to_cell_value(data: &Data) -> Option<CellValue> {
    match data {
        Data::Empty => None,
        Data::String(text) => Some(CellValue::Text(text.clone())),
        Data::Float(value) => Some(CellValue::Number(*value)),
        Data::Int(value) => Some(CellValue::Number(*value as f64)),
        Data::DateTime(value) => Some(CellValue::Number(value.as_f64())),
        other => Some(CellValue::Text(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORKBOOK: &str = r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><bookViews><workbookView activeTab="1"/></bookViews><sheets><sheet name="Capa" sheetId="1" r:id="rId1"/><sheet name="Materiais" sheetId="2" r:id="rId2"/></sheets></workbook>"#;

    const RELS: &str = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="worksheet" Target="/xl/worksheets/sheet2.xml"/></Relationships>"#;

    fn package(workbook: &str) -> OfficePackage {
        let mut package = OfficePackage::default();
        package.replace_entry(WORKBOOK_PART, workbook.as_bytes().to_vec());
        package.replace_entry(WORKBOOK_RELS_PART, RELS.as_bytes().to_vec());
        package
    }

    #[test]
    fn test_active_sheet_from_active_tab() {
        let location = resolve_active_sheet(&package(WORKBOOK)).unwrap();
        assert_eq!(location.name, "Materiais");
        assert_eq!(location.path, "xl/worksheets/sheet2.xml");
    }

    #[test]
    fn test_active_sheet_defaults_to_first() {
        let workbook = WORKBOOK.replace(r#" activeTab="1""#, "");
        let location = resolve_active_sheet(&package(&workbook)).unwrap();
        assert_eq!(location.name, "Capa");
        assert_eq!(location.path, "xl/worksheets/sheet1.xml");
    }

    #[test]
    fn test_output_path_for() {
        assert_eq!(
            output_path_for(Path::new("/data/modelo.xlsx"), "_processado"),
            PathBuf::from("/data/modelo_processado.xlsx")
        );
        assert_eq!(
            output_path_for(Path::new("lista.v2.xlsm"), "_out"),
            PathBuf::from("lista.v2_out.xlsm")
        );
    }

    #[test]
    fn test_open_rejects_missing_and_wrong_extension() {
        let err = TemplateWorkbook::open(Path::new("/nonexistent/modelo.xlsx")).unwrap_err();
        assert!(matches!(err, ConvertError::FileNotFound(_)));

        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("modelo.csv");
        std::fs::write(&csv, "a,b").unwrap();
        let err = TemplateWorkbook::open(&csv).unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedFormat(_)));
    }
}
