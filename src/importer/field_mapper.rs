// ==========================================
// 空压机节能改造 - 字段映射器
// ==========================================
// 职责: 原始行 → ExistingMachine / CandidateUnit（表头别名 + 类型转换）
// 缺省: 品牌缺失记为“其他”; 额定压力缺失取 0.8; 实际压力缺失同额定压力
// ==========================================

use crate::domain::machine::{CandidateUnit, ExistingMachine, DEFAULT_PRESSURE_MPA};
use crate::domain::types::ControlMode;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::RawRow;
use chrono::NaiveDate;

// ==========================================
// 标准字段键
// ==========================================
pub mod field_keys {
    pub const NO: &str = "no";
    pub const MODEL: &str = "model";
    pub const BRAND: &str = "brand";
    pub const RATED_POWER: &str = "ori_power";
    pub const AIRFLOW: &str = "air";
    pub const RUN_TIME: &str = "run_time";
    pub const LOAD_TIME: &str = "load_time";
    pub const IS_FC: &str = "is_FC";
    pub const RATED_PRESSURE: &str = "origin_pre";
    pub const ACTUAL_PRESSURE: &str = "actual_pre";
    pub const ENERGY_CON: &str = "energy_con";
    pub const ENERGY_CON_MIN: &str = "energy_con_min";
    pub const COLLECT_DATE: &str = "collect_date";
}

pub struct FieldMapper;

impl FieldMapper {
    /// 映射客户原有设备
    ///
    /// # 参数
    /// - row: 原始行
    /// - row_number: 数据行号（从 1 开始,缺少编号时用作设备编号）
    pub fn map_existing_machine(&self, row: &RawRow, row_number: usize) -> ImportResult<ExistingMachine> {
        use field_keys::*;

        let no = self.parse_i64(row, NO, row_number)?.unwrap_or(row_number as i64);
        let rated_pressure = self
            .parse_f64(row, RATED_PRESSURE, row_number)?
            .unwrap_or(DEFAULT_PRESSURE_MPA);
        let actual_pressure = self
            .parse_f64(row, ACTUAL_PRESSURE, row_number)?
            .or(Some(rated_pressure));

        let machine = ExistingMachine::new(
            no,
            &self.get_string(row, MODEL).unwrap_or_default(),
            &self.get_string(row, BRAND).unwrap_or_default(),
            self.require_f64(row, RATED_POWER, row_number)?,
            self.require_f64(row, AIRFLOW, row_number)?,
            self.parse_control_mode(row, row_number)?,
            self.parse_hours(row, RUN_TIME, row_number)?,
            self.parse_hours(row, LOAD_TIME, row_number)?,
            rated_pressure,
            actual_pressure,
        )
        .map_err(|source| ImportError::InvalidRecord {
            row: row_number,
            source,
        })?;

        Ok(match self.parse_date(row, COLLECT_DATE, row_number)? {
            Some(date) => machine.with_collect_date(date),
            None => machine,
        })
    }

    /// 映射供应商候选机型
    pub fn map_candidate_unit(&self, row: &RawRow, row_number: usize) -> ImportResult<CandidateUnit> {
        use field_keys::*;

        let model = self
            .get_string(row, MODEL)
            .ok_or_else(|| ImportError::MissingField {
                row: row_number,
                field: MODEL.to_string(),
            })?;

        CandidateUnit::new(
            &self.get_string(row, BRAND).unwrap_or_default(),
            &model,
            self.parse_f64(row, RATED_POWER, row_number)?.unwrap_or(0.0),
            self.require_f64(row, AIRFLOW, row_number)?,
            self.parse_control_mode(row, row_number)?,
            self.parse_f64(row, RATED_PRESSURE, row_number)?
                .unwrap_or(DEFAULT_PRESSURE_MPA),
            self.require_f64(row, ENERGY_CON, row_number)?,
            self.parse_f64(row, ENERGY_CON_MIN, row_number)?,
        )
        .map_err(|source| ImportError::InvalidRecord {
            row: row_number,
            source,
        })
    }

    /// 提取字符串字段（返回 Option），支持多个可能的列名（别名）
    fn get_string(&self, row: &RawRow, key: &str) -> Option<String> {
        let aliases: &[&str] = match key {
            field_keys::NO => &["编号", "序号", "no", "No"],
            field_keys::MODEL => &["型号", "model", "Model"],
            field_keys::BRAND => &["品牌", "brand", "Brand"],
            field_keys::RATED_POWER => &["额定功率", "额定功率(kW)", "功率", "ori_power"],
            field_keys::AIRFLOW => &["额定排量", "气量", "排气量", "额定排量(m³/min)", "air"],
            field_keys::RUN_TIME => &["运行时间", "运行时间(h)", "run_time"],
            field_keys::LOAD_TIME => &["加载时间", "加载时间(h)", "load_time"],
            field_keys::IS_FC => &["控制方式", "变频", "是否变频", "变频/工频", "is_FC"],
            field_keys::RATED_PRESSURE => &["额定压力", "额定压力(MPa)", "压力", "origin_pre"],
            field_keys::ACTUAL_PRESSURE => &["实际运行压力", "实际压力", "actual_pre", "actucal_pre"],
            field_keys::ENERGY_CON => &["比功率", "energy_con"],
            field_keys::ENERGY_CON_MIN => &["均每立方耗电", "energy_con_min"],
            field_keys::COLLECT_DATE => &["采集日期", "collect_date"],
            _ => &[],
        };

        // 尝试所有可能的列名
        aliases
            .iter()
            .chain(std::iter::once(&key))
            .filter_map(|alias| row.get(*alias))
            .map(|v| v.trim())
            .find(|v| !v.is_empty())
            .map(|v| v.to_string())
    }

    /// 解析浮点数
    fn parse_f64(&self, row: &RawRow, key: &str, row_number: usize) -> ImportResult<Option<f64>> {
        match self.get_string(row, key) {
            None => Ok(None),
            Some(value) => value
                .parse::<f64>()
                .map(Some)
                .map_err(|_| ImportError::TypeConversionError {
                    row: row_number,
                    field: key.to_string(),
                    message: format!("无法解析为浮点数: {}", value),
                }),
        }
    }

    /// 解析必填浮点数
    fn require_f64(&self, row: &RawRow, key: &str, row_number: usize) -> ImportResult<f64> {
        self.parse_f64(row, key, row_number)?
            .ok_or_else(|| ImportError::MissingField {
                row: row_number,
                field: key.to_string(),
            })
    }

    /// 解析整数（Excel 数值单元格形如 "3.0" 时取整数部分）
    fn parse_i64(&self, row: &RawRow, key: &str, row_number: usize) -> ImportResult<Option<i64>> {
        match self.parse_f64(row, key, row_number)? {
            None => Ok(None),
            Some(value) if value.is_finite() => Ok(Some(value.trunc() as i64)),
            Some(value) => Err(ImportError::TypeConversionError {
                row: row_number,
                field: key.to_string(),
                message: format!("无法解析为整数: {}", value),
            }),
        }
    }

    /// 解析小时数（缺省 0）
    fn parse_hours(&self, row: &RawRow, key: &str, row_number: usize) -> ImportResult<u32> {
        match self.parse_i64(row, key, row_number)? {
            None => Ok(0),
            Some(hours) => u32::try_from(hours).map_err(|_| ImportError::TypeConversionError {
                row: row_number,
                field: key.to_string(),
                message: format!("小时数必须为非负整数: {}", hours),
            }),
        }
    }

    /// 解析控制方式（缺省工频）
    fn parse_control_mode(&self, row: &RawRow, row_number: usize) -> ImportResult<ControlMode> {
        let value = match self.get_string(row, field_keys::IS_FC) {
            None => return Ok(ControlMode::FixedFrequency),
            Some(v) => v,
        };
        match value.to_lowercase().as_str() {
            "变频" | "是" | "1" | "1.0" | "true" | "yes" | "y" | "fc" => {
                Ok(ControlMode::VariableFrequency)
            }
            "工频" | "否" | "0" | "0.0" | "false" | "no" | "n" => Ok(ControlMode::FixedFrequency),
            _ => Err(ImportError::TypeConversionError {
                row: row_number,
                field: field_keys::IS_FC.to_string(),
                message: format!("无法识别的控制方式: {}", value),
            }),
        }
    }

    /// 解析日期（YYYY-MM-DD / YYYYMMDD）
    fn parse_date(&self, row: &RawRow, key: &str, row_number: usize) -> ImportResult<Option<NaiveDate>> {
        match self.get_string(row, key) {
            None => Ok(None),
            Some(value) => NaiveDate::parse_from_str(&value, "%Y-%m-%d")
                .or_else(|_| NaiveDate::parse_from_str(&value, "%Y%m%d"))
                .map(Some)
                .map_err(|_| ImportError::DateFormatError {
                    row: row_number,
                    field: key.to_string(),
                    value: value.clone(),
                }),
        }
    }
}
