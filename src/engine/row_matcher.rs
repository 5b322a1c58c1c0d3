// ==========================================
// 钢结构材料清单转录 - 行匹配与写入
// ==========================================
// 职责: 为每个材料条目定位模板行并写入各列
// 定位: W 型钢按规格名称；其余按分区代码 + 分区游标
// 可用行: 长度列为空 / 0，且本次运行中未被占用
// 红线: 未匹配的条目必须带原因返回，不允许静默丢弃
// ==========================================

use crate::config::{ImportSettings, TemplateLayout};
use crate::domain::{ItemOutcome, ItemReport, MaterialItem, ProfileCategory, UnmatchedReason};
use crate::engine::classifier::classify_profile;
use crate::engine::descriptor::extract_dimensions;
use crate::engine::name_normalizer::{comparison_key, normalize_w_beam_name};
use crate::workbook::SheetGrid;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, warn};

// ==========================================
// RowAllocator - 行分配器（每次运行新建）
// ==========================================
#[derive(Debug)]
pub struct RowAllocator {
    first_data_row: u32,
    code_column: u32,
    length_column: u32,
    cursors: HashMap<String, u32>, // 分区代码 → 下一次搜索起始行
    claimed: BTreeSet<u32>,
}

impl RowAllocator {
    pub fn new(layout: &TemplateLayout) -> Self {
        Self {
            first_data_row: layout.first_data_row,
            code_column: layout.columns.code,
            length_column: layout.columns.length,
            cursors: HashMap::new(),
            claimed: BTreeSet::new(),
        }
    }

    /// 分区当前游标（未使用过的分区为数据起始行）
    pub fn cursor(&self, section: &str) -> u32 {
        self.cursors
            .get(section)
            .copied()
            .unwrap_or(self.first_data_row)
    }

    fn is_available(&self, grid: &SheetGrid, row: u32) -> bool {
        !self.claimed.contains(&row) && grid.is_blank_or_zero(row, self.length_column)
    }

    /// 按 W 型钢规格名称查找可用行（从数据起始行扫描）
    pub fn find_named_row(&self, grid: &SheetGrid, name: &str) -> Option<u32> {
        let key = comparison_key(name);
        (self.first_data_row..=grid.max_row()).find(|row| {
            comparison_key(&grid.text(*row, self.code_column)) == key && self.is_available(grid, *row)
        })
    }

    /// 从分区游标起查找分区代码相同的可用行
    pub fn find_section_row(&self, grid: &SheetGrid, section: &str) -> Option<u32> {
        (self.cursor(section)..=grid.max_row()).find(|row| {
            grid.text(*row, self.code_column) == section && self.is_available(grid, *row)
        })
    }

    /// 占用行；给定分区时游标移到该行之后
    pub fn claim(&mut self, row: u32, section: Option<&str>) {
        self.claimed.insert(row);
        if let Some(section) = section {
            self.cursors.insert(section.to_string(), row + 1);
        }
    }

    pub fn claimed_rows(&self) -> usize {
        self.claimed.len()
    }
}

// ==========================================
// SheetFiller - 材料条目写入器
// ==========================================
pub struct SheetFiller<'a> {
    layout: &'a TemplateLayout,
    settings: &'a ImportSettings,
    allocator: RowAllocator,
}

impl<'a> SheetFiller<'a> {
    pub fn new(layout: &'a TemplateLayout, settings: &'a ImportSettings) -> Self {
        Self {
            layout,
            settings,
            allocator: RowAllocator::new(layout),
        }
    }

    pub fn allocator(&self) -> &RowAllocator {
        &self.allocator
    }

    /// 写入长度（含倍长规则）：描述包含倍长标记时长度翻倍，不区分大小写
    pub fn effective_length_m(&self, item: &MaterialItem) -> f64 {
        let marker = self.settings.double_length_marker.to_uppercase();
        if !marker.is_empty() && item.description.to_uppercase().contains(&marker) {
            item.length_m * 2.0
        } else {
            item.length_m
        }
    }

    /// 处理一个材料条目
    ///
    /// # 返回
    /// - ItemReport: Written（目标行）或 Unmatched（原因）
    pub fn fill(&mut self, grid: &mut SheetGrid, item: &MaterialItem) -> ItemReport {
        let (section, category) = classify_profile(&item.description);
        let length_m = self.effective_length_m(item);

        let (lookup_key, target) = if category.is_w_beam() {
            let name = normalize_w_beam_name(&item.description);
            let target = self.allocator.find_named_row(grid, &name);
            (name, target)
        } else {
            (section.to_string(), self.allocator.find_section_row(grid, section))
        };

        let row = match target {
            Some(row) => row,
            None => {
                let reason = if category.is_w_beam() {
                    UnmatchedReason::NameNotFound {
                        key: lookup_key.clone(),
                    }
                } else {
                    UnmatchedReason::NoAvailableRow {
                        section: section.to_string(),
                    }
                };
                warn!(
                    line = item.line_number,
                    description = %item.description,
                    reason = %reason,
                    "材料未写入模板"
                );
                return ItemReport::new(
                    item,
                    category,
                    lookup_key,
                    length_m,
                    ItemOutcome::Unmatched { reason },
                );
            }
        };

        let length_written = self.write_row(grid, row, item, category, length_m);
        let cursor_section = (!category.is_w_beam()).then_some(section);
        self.allocator.claim(row, cursor_section);

        debug!(
            line = item.line_number,
            row,
            category = %category,
            length_m,
            "材料已写入"
        );
        ItemReport::new(
            item,
            category,
            lookup_key,
            length_m,
            ItemOutcome::Written {
                row,
                length_written,
            },
        )
    }

    /// 写入目标行，返回是否写了长度列
    fn write_row(
        &self,
        grid: &mut SheetGrid,
        row: u32,
        item: &MaterialItem,
        category: ProfileCategory,
        length_m: f64,
    ) -> bool {
        let columns = &self.layout.columns;

        if !category.is_w_beam() {
            let dims = extract_dimensions(&item.description, category);
            match category {
                ProfileCategory::UChannel | ProfileCategory::Purlin => {
                    grid.set_number(row, columns.dim_a, dims.a);
                    grid.set_number(row, columns.dim_b, dims.b);
                    grid.set_number(row, columns.dim_c, dims.c);
                }
                ProfileCategory::Angle => {
                    grid.set_number(row, columns.dim_b, dims.a);
                    grid.set_number(row, columns.dim_c, dims.b);
                }
                _ => {}
            }
            grid.set_number(row, columns.thickness, dims.thickness);
        }

        grid.set_text(row, columns.grade, &item.steel_grade);
        let length_written = length_m > 0.0;
        if length_written {
            grid.set_number(row, columns.length, length_m);
        }
        grid.set_number(row, columns.weight, item.weight);
        length_written
    }
}
