// ==========================================
// 钢结构材料清单转录 - Word 表格读取
// ==========================================
// 职责: 从 .docx 读取正文中的第一个表格
// 规则: 只取正文顶层表格；单元格文本 = 直属段落以 '\n' 连接
//       w:br / w:cr → '\n'，w:tab → '\t'（仅限 run 内）
//       合并单元格（gridSpan）按所跨列数重复
//       run 内嵌的文本框 / 图形内容不计入单元格文本
// ==========================================

use crate::error::{ConvertError, ConvertResult};
use crate::importer::material_reader_trait::TableParser;
use crate::workbook::package::{read_relationships, resolve_part_path, OfficePackage};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::path::Path;
use tracing::{debug, info};

const ROOT_RELS_PART: &str = "_rels/.rels";
const DEFAULT_DOCUMENT_PART: &str = "word/document.xml";
const OFFICE_DOCUMENT_REL: &str = "/officeDocument";

/// run 内嵌内容（文本框、图形、兼容块），其中的段落不属于单元格
const EMBEDDED_CONTENT: [&[u8]; 6] = [
    b"pict",
    b"drawing",
    b"object",
    b"AlternateContent",
    b"txbxContent",
    b"txbx",
];

/// 支持的文档扩展名
pub const DOCUMENT_EXTENSIONS: [&str; 2] = ["docx", "docm"];

// ==========================================
// DocxTableParser - Word 表格解析器
// ==========================================
#[derive(Debug, Default)]
pub struct DocxTableParser;

impl DocxTableParser {
    pub fn new() -> Self {
        Self
    }
}

impl TableParser for DocxTableParser {
    fn parse_first_table(&self, file_path: &Path) -> ConvertResult<Vec<Vec<String>>> {
        if !file_path.exists() {
            return Err(ConvertError::FileNotFound(file_path.display().to_string()));
        }
        let extension = file_path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();
        if !DOCUMENT_EXTENSIONS.contains(&extension.as_str()) {
            return Err(ConvertError::UnsupportedFormat(format!(
                "材料表必须是 Word 文档: {}",
                file_path.display()
            )));
        }

        let bytes = std::fs::read(file_path)
            .map_err(|e| ConvertError::FileReadError(format!("{}: {}", file_path.display(), e)))?;
        let package = OfficePackage::from_bytes(&bytes)?;
        let part = main_document_part(&package)?;
        debug!(document = %file_path.display(), part = %part, "读取文档正文");

        let xml = package.require_entry(&part)?;
        let rows = parse_first_table_xml(xml)?.ok_or(ConvertError::NoTableFound)?;

        info!(document = %file_path.display(), rows = rows.len(), "材料表已读取");
        Ok(rows)
    }
}

/// 正文部件路径：按 _rels/.rels 中的 officeDocument 关系，缺省 word/document.xml
fn main_document_part(package: &OfficePackage) -> ConvertResult<String> {
    let rels = match package.entry(ROOT_RELS_PART) {
        Some(rels) => rels,
        None => return Ok(DEFAULT_DOCUMENT_PART.to_string()),
    };
    let part = read_relationships(rels)
        .map_err(doc_error)?
        .into_iter()
        .find(|rel| rel.rel_type.ends_with(OFFICE_DOCUMENT_REL))
        .map(|rel| resolve_part_path("", &rel.target))
        .unwrap_or_else(|| DEFAULT_DOCUMENT_PART.to_string());
    Ok(part)
}

fn doc_error(err: quick_xml::Error) -> ConvertError {
    ConvertError::DocumentParseError(err.to_string())
}

/// 表格读取状态
#[derive(Default)]
struct TableState {
    rows: Vec<Vec<String>>,
    row: Vec<String>,
    paragraphs: Vec<String>,
    paragraph: String,
    span: usize,
}

/// 从 document.xml 读取第一个顶层表格；没有表格时返回 None
pub fn parse_first_table_xml(xml: &[u8]) -> ConvertResult<Option<Vec<Vec<String>>>> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();

    let mut table_depth = 0usize;
    let mut body_paragraph_depth = 0usize; // 表格外的段落（文本框中的表格不计）
    let mut run_depth = 0usize;
    let mut in_text = false;
    let mut skip_depth = 0usize;
    let mut state = TableState::default();

    loop {
        match reader.read_event_into(&mut buf).map_err(doc_error)? {
            Event::Eof => break,
            // 单元格中的内嵌内容
            Event::Start(_) if skip_depth > 0 => skip_depth += 1,
            Event::End(_) if skip_depth > 0 => skip_depth -= 1,
            _ if skip_depth > 0 => {}

            Event::Start(e) => match e.local_name().as_ref() {
                b"tbl" if table_depth > 0 || body_paragraph_depth == 0 => table_depth += 1,
                b"p" if table_depth == 0 => body_paragraph_depth += 1,
                _ if table_depth != 1 => {}
                name if EMBEDDED_CONTENT.contains(&name) => skip_depth = 1,
                b"tr" => state.row.clear(),
                b"tc" => {
                    state.paragraphs.clear();
                    state.span = 1;
                }
                b"p" => state.paragraph.clear(),
                b"r" => run_depth += 1,
                b"t" if run_depth > 0 => in_text = true,
                _ => {}
            },
            Event::Empty(e) if table_depth == 1 => match e.local_name().as_ref() {
                b"gridSpan" => state.span = grid_span(&reader, &e)?,
                b"tab" if run_depth > 0 => state.paragraph.push('\t'),
                b"br" | b"cr" if run_depth > 0 => state.paragraph.push('\n'),
                b"p" => state.paragraphs.push(String::new()),
                _ => {}
            },
            Event::Text(text) if in_text => {
                let text = text.unescape().map_err(doc_error)?;
                state.paragraph.push_str(&text);
            }
            Event::CData(data) if in_text => {
                state.paragraph.push_str(&String::from_utf8_lossy(&data));
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"tbl" if table_depth > 0 => {
                    table_depth -= 1;
                    if table_depth == 0 {
                        return Ok(Some(state.rows));
                    }
                }
                b"p" if table_depth == 0 => {
                    body_paragraph_depth = body_paragraph_depth.saturating_sub(1)
                }
                _ if table_depth != 1 => {}
                b"t" => in_text = false,
                b"r" => run_depth = run_depth.saturating_sub(1),
                b"p" => {
                    let paragraph = std::mem::take(&mut state.paragraph);
                    state.paragraphs.push(paragraph);
                }
                b"tc" => {
                    let text = state.paragraphs.join("\n");
                    for _ in 0..state.span.max(1) {
                        state.row.push(text.clone());
                    }
                }
                b"tr" => {
                    let row = std::mem::take(&mut state.row);
                    state.rows.push(row);
                }
                _ => {}
            },
            _ => {}
        }
        buf.clear();
    }

    Ok(None)
}

fn grid_span<R>(reader: &Reader<R>, e: &BytesStart<'_>) -> ConvertResult<usize> {
    for attr in e.attributes() {
        let attr = attr.map_err(|e| doc_error(e.into()))?;
        if attr.key.local_name().as_ref() == b"val" {
            let value = attr.decode_and_unescape_value(reader).map_err(doc_error)?;
            return Ok(value.trim().parse::<usize>().unwrap_or(1).max(1));
        }
    }
    Ok(1)
}
