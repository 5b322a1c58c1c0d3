// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 生成测试用的 .docx 材料表与 .xlsx 模板，读取结果文件
// ==========================================

#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};
use steel_bom_filler::workbook::{CellValue, OfficePackage, SheetGrid, TemplateWorkbook};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const SS_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const PKG_REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

fn write_zip(path: &Path, parts: &[(&str, String)]) {
    let file = std::fs::File::create(path).unwrap();
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default();
    for (name, content) in parts {
        zip.start_file(*name, options).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }
    zip.finish().unwrap();
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// 生成 Word 材料表
///
/// # 参数
/// - rows: 表格行；单元格中的 '\n' 生成独立段落
pub fn write_docx(dir: &Path, name: &str, rows: &[&[&str]]) -> PathBuf {
    let mut table = String::from("<w:tbl>");
    for row in rows {
        table.push_str("<w:tr>");
        for cell in row.iter() {
            table.push_str("<w:tc>");
            for paragraph in cell.split('\n') {
                table.push_str(&format!(
                    r#"<w:p><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
                    escape(paragraph)
                ));
            }
            table.push_str("</w:tc>");
        }
        table.push_str("</w:tr>");
    }
    table.push_str("</w:tbl>");
    write_docx_body(dir, name, &table)
}

/// 生成不含表格的 Word 文档
pub fn write_docx_without_table(dir: &Path, name: &str) -> PathBuf {
    write_docx_body(dir, name, "")
}

fn write_docx_body(dir: &Path, name: &str, content: &str) -> PathBuf {
    let body = format!(
        r#"<w:p><w:r><w:t>LISTA DE MATERIAIS</w:t></w:r></w:p>{}"#,
        content
    );

    let document = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="{}"><w:body>{}<w:sectPr/></w:body></w:document>"#,
        W_NS, body
    );
    let content_types = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;
    let rels = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="{}"><Relationship Id="rId1" Type="{}/officeDocument" Target="word/document.xml"/></Relationships>"#,
        PKG_REL_NS, REL_NS
    );

    let path = dir.join(name);
    write_zip(
        &path,
        &[
            ("[Content_Types].xml", content_types.to_string()),
            ("_rels/.rels", rels),
            ("word/document.xml", document),
        ],
    );
    path
}

fn sheet_cell(row: u32, col: u32, value: &CellValue) -> String {
    let reference = steel_bom_filler::workbook::cell_reference(row, col);
    match value {
        CellValue::Text(text) => format!(
            r#"<c r="{}" t="inlineStr"><is><t>{}</t></is></c>"#,
            reference,
            escape(text)
        ),
        CellValue::Number(number) => format!(r#"<c r="{}"><v>{}</v></c>"#, reference, number),
    }
}

/// 生成单工作表 Excel 模板
///
/// # 参数
/// - cells: (行, 列, 值)，行列从 1 开始
pub fn write_xlsx(dir: &Path, name: &str, cells: &[(u32, u32, CellValue)]) -> PathBuf {
    let mut sorted: Vec<&(u32, u32, CellValue)> = cells.iter().collect();
    sorted.sort_by_key(|(row, col, _)| (*row, *col));

    let mut sheet_data = String::new();
    let mut current_row = 0;
    for (row, col, value) in sorted {
        if *row != current_row {
            if current_row != 0 {
                sheet_data.push_str("</row>");
            }
            sheet_data.push_str(&format!(r#"<row r="{}">"#, row));
            current_row = *row;
        }
        sheet_data.push_str(&sheet_cell(*row, *col, value));
    }
    if current_row != 0 {
        sheet_data.push_str("</row>");
    }

    let sheet = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="{}" xmlns:r="{}"><sheetData>{}</sheetData></worksheet>"#,
        SS_NS, REL_NS, sheet_data
    );
    let workbook = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><workbook xmlns="{}" xmlns:r="{}"><bookViews><workbookView activeTab="0"/></bookViews><sheets><sheet name="Materiais" sheetId="1" r:id="rId1"/></sheets></workbook>"#,
        SS_NS, REL_NS
    );
    let workbook_rels = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="{}"><Relationship Id="rId1" Type="{}/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#,
        PKG_REL_NS, REL_NS
    );
    let rels = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="{}"><Relationship Id="rId1" Type="{}/officeDocument" Target="xl/workbook.xml"/></Relationships>"#,
        PKG_REL_NS, REL_NS
    );
    let content_types = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#;

    let path = dir.join(name);
    write_zip(
        &path,
        &[
            ("[Content_Types].xml", content_types.to_string()),
            ("_rels/.rels", rels),
            ("xl/workbook.xml", workbook),
            ("xl/_rels/workbook.xml.rels", workbook_rels),
            ("xl/worksheets/sheet1.xml", sheet),
        ],
    );
    path
}

pub fn text(value: &str) -> CellValue {
    CellValue::Text(value.to_string())
}

pub fn number(value: f64) -> CellValue {
    CellValue::Number(value)
}

/// 读取结果文件的活动工作表
pub fn read_grid(path: &Path) -> SheetGrid {
    TemplateWorkbook::open(path).unwrap().grid().clone()
}

/// 读取压缩包中的部件文本
pub fn read_part(path: &Path, part: &str) -> String {
    let bytes = std::fs::read(path).unwrap();
    let package = OfficePackage::from_bytes(&bytes).unwrap();
    String::from_utf8(package.require_entry(part).unwrap().to_vec()).unwrap()
}
