// ==========================================
// 钢结构材料清单转录 - 工作表 XML 补丁
// ==========================================
// 职责: 把网格中的修改写回 sheetN.xml / workbook.xml
// 方式: quick-xml 流式读写，未触及的节点原样输出
// 红线: 只改被写入的单元格与被设置可见性的行
// ==========================================

use crate::error::ConvertResult;
use crate::workbook::cell_ref::{cell_reference, parse_cell_reference};
use crate::workbook::grid::CellValue;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::collections::BTreeMap;

type RowEdits = BTreeMap<u32, CellValue>;

/// workbook.xml 中位于 calcPr 之后的元素（按 schema 顺序）
const ELEMENTS_AFTER_CALC_PR: [&[u8]; 9] = [
    b"oleSize",
    b"customWorkbookViews",
    b"pivotCaches",
    b"smartTagPr",
    b"smartTagTypes",
    b"webPublishing",
    b"fileRecoveryPr",
    b"webPublishObjects",
    b"extLst",
];

/// 将单元格修改与行可见性写入工作表 XML
///
/// # 参数
/// - xml: 原 sheetN.xml
/// - edits: (行, 列) → 新值
/// - row_hidden: 行 → 是否隐藏（未出现的行保持原样）
///
/// # 说明
/// - 已有单元格被整体替换，保留原样式 `s`
/// - 缺失的单元格按列顺序插入；缺失的行按行顺序插入
/// - 文本以 inlineStr 写入，不改动 sharedStrings.xml
pub fn patch_sheet_xml(
    xml: &[u8],
    edits: &BTreeMap<(u32, u32), CellValue>,
    row_hidden: &BTreeMap<u32, bool>,
) -> ConvertResult<Vec<u8>> {
    let mut pending: BTreeMap<u32, RowEdits> = BTreeMap::new();
    for ((row, col), value) in edits {
        pending.entry(*row).or_default().insert(*col, value.clone());
    }

    let mut reader = Reader::from_reader(xml);
    let mut out = SheetWriter::new();
    let mut buf = Vec::new();

    let mut in_sheet_data = false;
    let mut open_row: Option<(u32, RowEdits)> = None;
    let (mut last_row, mut last_col) = (0u32, 0u32);
    let mut skip_depth = 0usize;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Eof => break,
            // 被替换单元格的原内容
            Event::Start(_) if skip_depth > 0 => skip_depth += 1,
            Event::End(_) if skip_depth > 0 => skip_depth -= 1,
            _ if skip_depth > 0 => {}

            Event::Start(e) if e.local_name().as_ref() == b"sheetData" => {
                out.prefix = element_prefix(&e);
                in_sheet_data = true;
                out.writer.write_event(Event::Start(e))?;
            }
            Event::Empty(e) if e.local_name().as_ref() == b"sheetData" => {
                if pending.is_empty() {
                    out.writer.write_event(Event::Empty(e))?;
                } else {
                    out.prefix = element_prefix(&e);
                    let name = qualified_name(&e);
                    out.writer.write_event(Event::Start(e))?;
                    out.write_new_rows(std::mem::take(&mut pending), row_hidden)?;
                    out.writer.write_event(Event::End(BytesEnd::new(name)))?;
                }
            }
            Event::End(e) if e.local_name().as_ref() == b"sheetData" => {
                out.write_new_rows(std::mem::take(&mut pending), row_hidden)?;
                in_sheet_data = false;
                out.writer.write_event(Event::End(e))?;
            }

            Event::Start(e) if in_sheet_data && e.local_name().as_ref() == b"row" => {
                let row = row_number(&reader, &e, last_row)?;
                out.write_new_rows(split_before(&mut pending, row), row_hidden)?;
                let row_edits = pending.remove(&row).unwrap_or_default();
                out.write_row_start(&reader, e, row, row_hidden.get(&row).copied(), false)?;
                open_row = Some((row, row_edits));
                last_row = row;
                last_col = 0;
            }
            Event::Empty(e) if in_sheet_data && e.local_name().as_ref() == b"row" => {
                let row = row_number(&reader, &e, last_row)?;
                out.write_new_rows(split_before(&mut pending, row), row_hidden)?;
                let row_edits = pending.remove(&row).unwrap_or_default();
                let hidden = row_hidden.get(&row).copied();
                if row_edits.is_empty() {
                    out.write_row_start(&reader, e, row, hidden, true)?;
                } else {
                    let name = qualified_name(&e);
                    out.write_row_start(&reader, e, row, hidden, false)?;
                    out.write_cells(row, &row_edits)?;
                    out.writer.write_event(Event::End(BytesEnd::new(name)))?;
                }
                last_row = row;
            }
            Event::End(e) if in_sheet_data && e.local_name().as_ref() == b"row" => {
                if let Some((row, row_edits)) = open_row.take() {
                    out.write_cells(row, &row_edits)?;
                }
                out.writer.write_event(Event::End(e))?;
            }

            Event::Start(e) if open_row.is_some() && e.local_name().as_ref() == b"c" => {
                let col = cell_column(&reader, &e, last_col)?;
                last_col = col;
                if let Some((row, row_edits)) = open_row.as_mut() {
                    out.write_cells(*row, &split_before(row_edits, col))?;
                    match row_edits.remove(&col) {
                        Some(value) => {
                            let style = attr_value(&reader, &e, b"s")?;
                            out.write_cell(*row, col, style.as_deref(), &value)?;
                            skip_depth = 1;
                        }
                        None => out.writer.write_event(Event::Start(e))?,
                    }
                }
            }
            Event::Empty(e) if open_row.is_some() && e.local_name().as_ref() == b"c" => {
                let col = cell_column(&reader, &e, last_col)?;
                last_col = col;
                if let Some((row, row_edits)) = open_row.as_mut() {
                    out.write_cells(*row, &split_before(row_edits, col))?;
                    match row_edits.remove(&col) {
                        Some(value) => {
                            let style = attr_value(&reader, &e, b"s")?;
                            out.write_cell(*row, col, style.as_deref(), &value)?;
                        }
                        None => out.writer.write_event(Event::Empty(e))?,
                    }
                }
            }

            event => out.writer.write_event(event)?,
        }
        buf.clear();
    }

    Ok(out.writer.into_inner())
}

/// 在 workbook.xml 中设置 `calcPr fullCalcOnLoad="1"`，让 Excel 打开时重算公式
pub fn patch_workbook_full_calc(xml: &[u8]) -> ConvertResult<Vec<u8>> {
    let mut reader = Reader::from_reader(xml);
    let mut writer = Writer::new(Vec::new());
    let mut buf = Vec::new();
    let mut depth = 0usize;
    let mut prefix = String::new();
    let mut done = false;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Eof => break,
            Event::Start(e) => {
                if depth == 0 {
                    prefix = element_prefix(&e);
                }
                let event = if depth == 1 && !done {
                    let is_calc_pr = e.local_name().as_ref() == b"calcPr";
                    let is_after = ELEMENTS_AFTER_CALC_PR.contains(&e.local_name().as_ref());
                    if is_calc_pr {
                        done = true;
                        Event::Start(with_attribute(&reader, &e, "fullCalcOnLoad", "1")?)
                    } else {
                        if is_after {
                            write_calc_pr(&mut writer, &prefix)?;
                            done = true;
                        }
                        Event::Start(e)
                    }
                } else {
                    Event::Start(e)
                };
                depth += 1;
                writer.write_event(event)?;
            }
            Event::Empty(e) if depth == 1 && !done => {
                let is_calc_pr = e.local_name().as_ref() == b"calcPr";
                let is_after = ELEMENTS_AFTER_CALC_PR.contains(&e.local_name().as_ref());
                if is_calc_pr {
                    done = true;
                    writer.write_event(Event::Empty(with_attribute(&reader, &e, "fullCalcOnLoad", "1")?))?;
                } else {
                    if is_after {
                        write_calc_pr(&mut writer, &prefix)?;
                        done = true;
                    }
                    writer.write_event(Event::Empty(e))?;
                }
            }
            Event::End(e) => {
                depth = depth.saturating_sub(1);
                if depth == 0 && !done {
                    write_calc_pr(&mut writer, &prefix)?;
                    done = true;
                }
                writer.write_event(Event::End(e))?;
            }
            event => writer.write_event(event)?,
        }
        buf.clear();
    }

    Ok(writer.into_inner())
}

// ==========================================
// SheetWriter - 带命名空间前缀的输出器
// ==========================================
struct SheetWriter {
    writer: Writer<Vec<u8>>,
    prefix: String,
}

impl SheetWriter {
    fn new() -> Self {
        Self {
            writer: Writer::new(Vec::new()),
            prefix: String::new(),
        }
    }

    fn name(&self, local: &str) -> String {
        format!("{}{}", self.prefix, local)
    }

    fn write_row_start<R>(
        &mut self,
        reader: &Reader<R>,
        e: BytesStart<'_>,
        row: u32,
        hidden: Option<bool>,
        empty: bool,
    ) -> ConvertResult<()> {
        let start = match hidden {
            None => e,
            Some(hidden) => row_with_visibility(reader, &e, row, hidden)?,
        };
        let event = if empty {
            Event::Empty(start)
        } else {
            Event::Start(start)
        };
        self.writer.write_event(event)?;
        Ok(())
    }

    /// 插入模板中不存在的行
    fn write_new_rows(
        &mut self,
        rows: BTreeMap<u32, RowEdits>,
        row_hidden: &BTreeMap<u32, bool>,
    ) -> ConvertResult<()> {
        for (row, row_edits) in rows {
            let name = self.name("row");
            let mut start = BytesStart::new(name.clone());
            start.push_attribute(("r", row.to_string().as_str()));
            if row_hidden.get(&row).copied() == Some(true) {
                start.push_attribute(("hidden", "1"));
            }
            self.writer.write_event(Event::Start(start))?;
            self.write_cells(row, &row_edits)?;
            self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        }
        Ok(())
    }

    fn write_cells(&mut self, row: u32, cells: &RowEdits) -> ConvertResult<()> {
        for (col, value) in cells {
            self.write_cell(row, *col, None, value)?;
        }
        Ok(())
    }

    fn write_cell(
        &mut self,
        row: u32,
        col: u32,
        style: Option<&str>,
        value: &CellValue,
    ) -> ConvertResult<()> {
        let cell_name = self.name("c");
        let reference = cell_reference(row, col);
        let mut start = BytesStart::new(cell_name.clone());
        start.push_attribute(("r", reference.as_str()));
        if let Some(style) = style {
            start.push_attribute(("s", style));
        }

        match value {
            CellValue::Number(number) => {
                let v_name = self.name("v");
                self.writer.write_event(Event::Start(start))?;
                self.writer
                    .write_event(Event::Start(BytesStart::new(v_name.clone())))?;
                self.writer
                    .write_event(Event::Text(BytesText::new(&format_number(*number))))?;
                self.writer.write_event(Event::End(BytesEnd::new(v_name)))?;
            }
            CellValue::Text(text) => {
                let (is_name, t_name) = (self.name("is"), self.name("t"));
                start.push_attribute(("t", "inlineStr"));
                self.writer.write_event(Event::Start(start))?;
                self.writer
                    .write_event(Event::Start(BytesStart::new(is_name.clone())))?;
                let mut t_start = BytesStart::new(t_name.clone());
                if text.trim() != text {
                    t_start.push_attribute(("xml:space", "preserve"));
                }
                self.writer.write_event(Event::Start(t_start))?;
                self.writer.write_event(Event::Text(BytesText::new(text)))?;
                self.writer.write_event(Event::End(BytesEnd::new(t_name)))?;
                self.writer.write_event(Event::End(BytesEnd::new(is_name)))?;
            }
        }

        self.writer.write_event(Event::End(BytesEnd::new(cell_name)))?;
        Ok(())
    }
}

fn write_calc_pr(writer: &mut Writer<Vec<u8>>, prefix: &str) -> ConvertResult<()> {
    let mut calc_pr = BytesStart::new(format!("{}calcPr", prefix));
    calc_pr.push_attribute(("fullCalcOnLoad", "1"));
    writer.write_event(Event::Empty(calc_pr))?;
    Ok(())
}

/// 取出键小于 `limit` 的部分，其余留在原处
fn split_before<V>(map: &mut BTreeMap<u32, V>, limit: u32) -> BTreeMap<u32, V> {
    let rest = map.split_off(&limit);
    std::mem::replace(map, rest)
}

fn element_prefix(e: &BytesStart<'_>) -> String {
    let name = e.name();
    let raw = name.as_ref();
    match raw.iter().position(|b| *b == b':') {
        Some(idx) => String::from_utf8_lossy(&raw[..=idx]).into_owned(),
        None => String::new(),
    }
}

fn qualified_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

/// 按本地名读取属性值
fn attr_value<R>(reader: &Reader<R>, e: &BytesStart<'_>, key: &[u8]) -> ConvertResult<Option<String>> {
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        if attr.key.local_name().as_ref() == key {
            return Ok(Some(attr.decode_and_unescape_value(reader)?.into_owned()));
        }
    }
    Ok(None)
}

fn row_number<R>(reader: &Reader<R>, e: &BytesStart<'_>, last_row: u32) -> ConvertResult<u32> {
    Ok(attr_value(reader, e, b"r")?
        .and_then(|r| r.trim().parse::<u32>().ok())
        .unwrap_or(last_row + 1))
}

fn cell_column<R>(reader: &Reader<R>, e: &BytesStart<'_>, last_col: u32) -> ConvertResult<u32> {
    Ok(attr_value(reader, e, b"r")?
        .and_then(|r| parse_cell_reference(&r))
        .map(|(_, col)| col)
        .unwrap_or(last_col + 1))
}

/// 复制元素并设置（替换）一个属性
fn with_attribute<R>(
    reader: &Reader<R>,
    e: &BytesStart<'_>,
    key: &str,
    value: &str,
) -> ConvertResult<BytesStart<'static>> {
    let mut start = BytesStart::new(qualified_name(e));
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let attr_key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        if attr_key == key {
            continue;
        }
        let attr_value = attr.decode_and_unescape_value(reader)?.into_owned();
        start.push_attribute((attr_key.as_str(), attr_value.as_str()));
    }
    start.push_attribute((key, value));
    Ok(start)
}

/// 复制 row 元素并改写 hidden 属性
fn row_with_visibility<R>(
    reader: &Reader<R>,
    e: &BytesStart<'_>,
    row: u32,
    hidden: bool,
) -> ConvertResult<BytesStart<'static>> {
    let mut start = BytesStart::new(qualified_name(e));
    let mut has_reference = false;
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let attr_key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        if attr_key == "hidden" {
            continue;
        }
        has_reference |= attr_key == "r";
        let attr_value = attr.decode_and_unescape_value(reader)?.into_owned();
        start.push_attribute((attr_key.as_str(), attr_value.as_str()));
    }
    if !has_reference {
        start.push_attribute(("r", row.to_string().as_str()));
    }
    if hidden {
        start.push_attribute(("hidden", "1"));
    }
    Ok(start)
}

fn format_number(value: f64) -> String {
    if value.is_finite() {
        value.to_string()
    } else {
        "0".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHEET: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><dimension ref="A1:Q6"/><sheetData><row r="4" spans="1:17"><c r="A4" t="inlineStr"><is><t>U.e</t></is></c><c r="J4" s="3"><v>0</v></c></row><row r="5"><c r="A5" t="inlineStr"><is><t>U.e</t></is></c></row><row r="6" hidden="1"/></sheetData><pageMargins left="0.7"/></worksheet>"#;

    fn patch(edits: Vec<((u32, u32), CellValue)>, hidden: Vec<(u32, bool)>) -> String {
        let edits: BTreeMap<_, _> = edits.into_iter().collect();
        let hidden: BTreeMap<_, _> = hidden.into_iter().collect();
        String::from_utf8(patch_sheet_xml(SHEET.as_bytes(), &edits, &hidden).unwrap()).unwrap()
    }

    #[test]
    fn test_no_changes_keeps_xml() {
        assert_eq!(patch(vec![], vec![]), SHEET);
    }

    #[test]
    fn test_replace_existing_cell_keeps_style() {
        let xml = patch(vec![((4, 10), CellValue::Number(6.0))], vec![]);
        assert!(xml.contains(r#"<c r="J4" s="3"><v>6</v></c>"#));
        assert!(!xml.contains("<v>0</v>"));
    }

    #[test]
    fn test_insert_cells_in_column_order() {
        let xml = patch(
            vec![
                ((5, 2), CellValue::Number(150.0)),
                ((5, 9), CellValue::Text("A36".to_string())),
                ((5, 17), CellValue::Number(12.5)),
            ],
            vec![],
        );
        let expected = concat!(
            r#"<row r="5"><c r="A5" t="inlineStr"><is><t>U.e</t></is></c>"#,
            r#"<c r="B5"><v>150</v></c>"#,
            r#"<c r="I5" t="inlineStr"><is><t>A36</t></is></c>"#,
            r#"<c r="Q5"><v>12.5</v></c></row>"#
        );
        assert!(xml.contains(expected), "{}", xml);
    }

    #[test]
    fn test_row_visibility() {
        let xml = patch(vec![], vec![(4, true), (6, false)]);
        assert!(xml.contains(r#"<row r="4" spans="1:17" hidden="1">"#));
        assert!(xml.contains(r#"<row r="6"/>"#));
    }

    #[test]
    fn test_missing_rows_are_inserted() {
        let xml = patch(
            vec![
                ((2, 1), CellValue::Text("X".to_string())),
                ((8, 10), CellValue::Number(1.5)),
            ],
            vec![],
        );
        let row2 = xml.find(r#"<row r="2">"#).unwrap();
        let row4 = xml.find(r#"<row r="4""#).unwrap();
        let row8 = xml.find(r#"<row r="8"><c r="J8"><v>1.5</v></c></row>"#).unwrap();
        let end = xml.find("</sheetData>").unwrap();
        assert!(row2 < row4 && row4 < row8 && row8 < end);
    }

    #[test]
    fn test_empty_row_with_edits_expanded() {
        let xml = patch(vec![((6, 10), CellValue::Number(3.0))], vec![]);
        assert!(xml.contains(r#"<row r="6" hidden="1"><c r="J6"><v>3</v></c></row>"#));
    }

    #[test]
    fn test_text_is_escaped() {
        let xml = patch(vec![((4, 9), CellValue::Text("A36 & <B>".to_string()))], vec![]);
        assert!(xml.contains("<t>A36 &amp; &lt;B&gt;</t>"));
    }

    #[test]
    fn test_full_calc_existing_calc_pr() {
        let xml = r#"<workbook><sheets><sheet name="A" sheetId="1"/></sheets><calcPr calcId="191029"/></workbook>"#;
        let patched = String::from_utf8(patch_workbook_full_calc(xml.as_bytes()).unwrap()).unwrap();
        assert!(patched.contains(r#"<calcPr calcId="191029" fullCalcOnLoad="1"/>"#));
    }

    #[test]
    fn test_full_calc_inserted_in_order() {
        let xml = r#"<x:workbook xmlns:x="ns"><x:sheets/><x:extLst/></x:workbook>"#;
        let patched = String::from_utf8(patch_workbook_full_calc(xml.as_bytes()).unwrap()).unwrap();
        assert_eq!(
            patched,
            r#"<x:workbook xmlns:x="ns"><x:sheets/><x:calcPr fullCalcOnLoad="1"/><x:extLst/></x:workbook>"#
        );

        let xml = r#"<workbook><sheets/></workbook>"#;
        let patched = String::from_utf8(patch_workbook_full_calc(xml.as_bytes()).unwrap()).unwrap();
        assert_eq!(patched, r#"<workbook><sheets/><calcPr fullCalcOnLoad="1"/></workbook>"#);
    }
}
