// ==========================================
// 空压机节能改造 - 表格导入器
// ==========================================
// 职责: 设备清单 / 供应商目录文件 → 领域记录
// 流程: 文件解析 → 字段映射 → 不变量校验
// 红线: 任一行失败即整体失败,错误携带行号
// ==========================================

use crate::domain::machine::{CandidateUnit, ExistingMachine};
use crate::importer::error::ImportResult;
use crate::importer::field_mapper::FieldMapper;
use crate::importer::file_parser::{RawRow, UniversalFileParser};
use std::path::Path;
use tracing::{info, instrument};

pub struct TableImporter {
    parser: UniversalFileParser,
    mapper: FieldMapper,
}

impl TableImporter {
    pub fn new() -> Self {
        Self {
            parser: UniversalFileParser,
            mapper: FieldMapper,
        }
    }

    /// 导入客户原有设备清单
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn import_machines<P: AsRef<Path>>(&self, path: P) -> ImportResult<Vec<ExistingMachine>> {
        let rows = self.parser.parse(path.as_ref())?;
        let machines = self.map_machines(&rows)?;
        info!(count = machines.len(), "原有设备导入完成");
        Ok(machines)
    }

    /// 导入供应商机型目录
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn import_catalogue<P: AsRef<Path>>(&self, path: P) -> ImportResult<Vec<CandidateUnit>> {
        let rows = self.parser.parse(path.as_ref())?;
        let units = self.map_catalogue(&rows)?;
        info!(count = units.len(), "供应商机型导入完成");
        Ok(units)
    }

    /// 原始行 → 原有设备（行号从 1 开始）
    pub fn map_machines(&self, rows: &[RawRow]) -> ImportResult<Vec<ExistingMachine>> {
        rows.iter()
            .enumerate()
            .map(|(idx, row)| self.mapper.map_existing_machine(row, idx + 1))
            .collect()
    }

    /// 原始行 → 供应商机型
    pub fn map_catalogue(&self, rows: &[RawRow]) -> ImportResult<Vec<CandidateUnit>> {
        rows.iter()
            .enumerate()
            .map(|(idx, row)| self.mapper.map_candidate_unit(row, idx + 1))
            .collect()
    }
}

impl Default for TableImporter {
    fn default() -> Self {
        Self::new()
    }
}
