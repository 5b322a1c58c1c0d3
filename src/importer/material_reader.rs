// ==========================================
// 钢结构材料清单转录 - 材料表读取器
// ==========================================
// 职责: 组合 TableParser 与 FieldMapper，文件 → 材料条目
// ==========================================

use crate::config::ImportSettings;
use crate::domain::MaterialItem;
use crate::error::ConvertResult;
use crate::importer::docx_reader::DocxTableParser;
use crate::importer::field_mapper::MaterialFieldMapper;
use crate::importer::material_reader_trait::{FieldMapper, TableParser};
use std::path::Path;
use tracing::info;

// ==========================================
// MaterialListReader - 材料表读取器
// ==========================================
pub struct MaterialListReader<P = DocxTableParser, M = MaterialFieldMapper>
where
    P: TableParser,
    M: FieldMapper,
{
    parser: P,
    mapper: M,
}

impl MaterialListReader {
    /// Word 材料表读取器
    pub fn docx(settings: ImportSettings) -> Self {
        Self {
            parser: DocxTableParser::new(),
            mapper: MaterialFieldMapper::new(settings),
        }
    }
}

impl<P, M> MaterialListReader<P, M>
where
    P: TableParser,
    M: FieldMapper,
{
    pub fn new(parser: P, mapper: M) -> Self {
        Self { parser, mapper }
    }

    /// 读取文档中的材料条目
    ///
    /// # 返回
    /// - Ok(Vec<MaterialItem>): 按文档顺序的材料条目
    /// - Err: 文件错误，或"无数据可处理"类错误（NoTableFound / TableTooShort / EmptyExtraction）
    pub fn read(&self, file_path: &Path) -> ConvertResult<Vec<MaterialItem>> {
        let rows = self.parser.parse_first_table(file_path)?;
        let items = self.mapper.map_to_materials(&rows)?;
        info!(document = %file_path.display(), items = items.len(), "材料条目已提取");
        Ok(items)
    }
}
