// ==========================================
// 钢结构材料清单转录 - Office 压缩包
// ==========================================
// 职责: 整包读入内存、按名称取出/替换部件、整包写出
// 约定: 保持原有部件顺序；未修改部件的内容原样写回
// ==========================================

use crate::error::{ConvertError, ConvertResult};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs::File;
use std::io::{BufWriter, Cursor, Read, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipArchive, ZipWriter};

/// 包关系文件（.rels）中的一条关系
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
}

/// 压缩包中的一个部件
#[derive(Debug, Clone)]
pub struct PackageEntry {
    pub name: String,
    pub data: Vec<u8>,
}

// ==========================================
// OfficePackage - 内存中的 .docx / .xlsx 压缩包
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct OfficePackage {
    entries: Vec<PackageEntry>,
}

impl OfficePackage {
    /// 从字节读取全部部件
    pub fn from_bytes(bytes: &[u8]) -> ConvertResult<Self> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        let mut entries = Vec::with_capacity(archive.len());

        for idx in 0..archive.len() {
            let mut file = archive.by_index(idx)?;
            if file.is_dir() {
                continue;
            }
            let name = file.name().to_string();
            let mut data = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut data)?;
            entries.push(PackageEntry { name, data });
        }

        Ok(Self { entries })
    }

    /// 按名称取部件内容（忽略大小写与开头的 '/'）
    pub fn entry(&self, name: &str) -> Option<&[u8]> {
        let wanted = name.trim_start_matches('/');
        self.entries
            .iter()
            .find(|entry| entry.name.eq_ignore_ascii_case(wanted))
            .map(|entry| entry.data.as_slice())
    }

    /// 读取必需部件，不存在时报错
    pub fn require_entry(&self, name: &str) -> ConvertResult<&[u8]> {
        self.entry(name)
            .ok_or_else(|| ConvertError::UnsupportedFormat(format!("压缩包缺少部件: {}", name)))
    }

    /// 替换已有部件；不存在时追加
    pub fn replace_entry(&mut self, name: &str, data: Vec<u8>) {
        let wanted = name.trim_start_matches('/');
        match self
            .entries
            .iter_mut()
            .find(|entry| entry.name.eq_ignore_ascii_case(wanted))
        {
            Some(entry) => entry.data = data,
            None => self.entries.push(PackageEntry {
                name: wanted.to_string(),
                data,
            }),
        }
    }

    pub fn entries(&self) -> &[PackageEntry] {
        &self.entries
    }

    /// 整包序列化为字节
    ///
    /// 固定修改时间，保证相同输入得到相同输出
    pub fn to_bytes(&self) -> ConvertResult<Vec<u8>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default());

        for entry in &self.entries {
            writer
                .start_file(entry.name.as_str(), options)
                .map_err(|e| ConvertError::FileWriteError(e.to_string()))?;
            writer
                .write_all(&entry.data)
                .map_err(|e| ConvertError::FileWriteError(e.to_string()))?;
        }

        let cursor = writer
            .finish()
            .map_err(|e| ConvertError::FileWriteError(e.to_string()))?;
        Ok(cursor.into_inner())
    }

    /// 写出到文件（直接覆盖目标路径）
    pub fn write_to(&self, path: &Path) -> ConvertResult<()> {
        let bytes = self.to_bytes()?;
        let file = File::create(path)
            .map_err(|e| ConvertError::FileWriteError(format!("{}: {}", path.display(), e)))?;
        let mut writer = BufWriter::new(file);
        writer
            .write_all(&bytes)
            .and_then(|_| writer.flush())
            .map_err(|e| ConvertError::FileWriteError(format!("{}: {}", path.display(), e)))?;
        Ok(())
    }
}

/// 读取 .rels 文件中的全部关系
pub fn read_relationships(xml: &[u8]) -> Result<Vec<Relationship>, quick_xml::Error> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut relationships = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Eof => break,
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                let mut relationship = Relationship {
                    id: String::new(),
                    rel_type: String::new(),
                    target: String::new(),
                };
                for attr in e.attributes() {
                    let attr = attr?;
                    let value = attr.decode_and_unescape_value(&reader)?.into_owned();
                    match attr.key.local_name().as_ref() {
                        b"Id" => relationship.id = value,
                        b"Type" => relationship.rel_type = value,
                        b"Target" => relationship.target = value,
                        _ => {}
                    }
                }
                relationships.push(relationship);
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(relationships)
}

/// 关系目标 → 压缩包内路径（绝对路径去掉开头的 '/'，相对路径基于 base 目录）
pub fn resolve_part_path(base: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }
    let mut parts: Vec<&str> = base.split('/').filter(|p| !p.is_empty()).collect();
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            other => parts.push(other),
        }
    }
    parts.join("/")
}
