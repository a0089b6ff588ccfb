// ==========================================
// 空压机节能改造 - 设备领域模型
// ==========================================
// 职责: 客户原有设备 (ExistingMachine) 与供应商候选机型 (CandidateUnit)
// 红线: 构造时校验不变量,引擎层只读
// ==========================================

use crate::domain::numeric::round_to;
use crate::domain::types::{Brand, ControlMode};
use crate::engine::error::{EngineError, EngineResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 缺失压力读数时的默认压力 (MPa)
pub const DEFAULT_PRESSURE_MPA: f64 = 0.8;

// ==========================================
// ExistingMachine - 客户原有设备
// ==========================================
// 不变量: running_hours >= loaded_hours >= 0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExistingMachine {
    pub no: i64,                         // 设备编号
    pub model: String,                   // 型号
    pub brand_name: String,              // 品牌（原始名称）
    pub brand: Brand,                    // 品牌（枚举,用于默认系数查表）
    pub rated_power_kw: f64,             // 额定功率 (kW)
    pub rated_airflow_m3min: f64,        // 额定排量 (m³/min)
    pub control_mode: ControlMode,       // 工频/变频
    pub running_hours: u32,              // 运行时间 (h)
    pub loaded_hours: u32,               // 加载时间 (h)
    pub rated_pressure_mpa: f64,         // 额定压力 (MPa)
    pub actual_pressure_mpa: Option<f64>, // 实际运行压力 (MPa)
    #[serde(default)]
    pub collect_date: Option<NaiveDate>, // 采集日期
}

impl ExistingMachine {
    /// 构造并校验客户设备
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        no: i64,
        model: &str,
        brand_name: &str,
        rated_power_kw: f64,
        rated_airflow_m3min: f64,
        control_mode: ControlMode,
        running_hours: u32,
        loaded_hours: u32,
        rated_pressure_mpa: f64,
        actual_pressure_mpa: Option<f64>,
    ) -> EngineResult<Self> {
        let machine = Self {
            no,
            model: model.trim().to_string(),
            brand_name: normalize_brand_name(brand_name),
            brand: Brand::from_name(brand_name),
            rated_power_kw,
            rated_airflow_m3min,
            control_mode,
            running_hours,
            loaded_hours,
            rated_pressure_mpa,
            actual_pressure_mpa,
            collect_date: None,
        };
        machine.validate()?;
        Ok(machine)
    }

    /// 设置采集日期
    pub fn with_collect_date(mut self, date: NaiveDate) -> Self {
        self.collect_date = Some(date);
        self
    }

    /// 校验不变量（反序列化得到的记录也需调用）
    pub fn validate(&self) -> EngineResult<()> {
        if self.loaded_hours > self.running_hours {
            return Err(EngineError::InvalidInput(format!(
                "设备编号={}: 加载时间 {}h 大于运行时间 {}h",
                self.no, self.loaded_hours, self.running_hours
            )));
        }
        check_non_negative(self.no, "额定功率", self.rated_power_kw)?;
        check_non_negative(self.no, "额定排量", self.rated_airflow_m3min)?;
        check_non_negative(self.no, "额定压力", self.rated_pressure_mpa)?;
        if let Some(actual) = self.actual_pressure_mpa {
            check_non_negative(self.no, "实际运行压力", actual)?;
        }
        Ok(())
    }

    pub fn is_variable_frequency(&self) -> bool {
        self.control_mode.is_variable_frequency()
    }

    /// 需求压力口径: 实际压力 → 额定压力 → 0.8 MPa（读数为 0 视为缺失）
    pub fn demand_pressure_mpa(&self) -> f64 {
        self.actual_pressure_mpa
            .filter(|p| *p != 0.0)
            .or(Some(self.rated_pressure_mpa).filter(|p| *p != 0.0))
            .unwrap_or(DEFAULT_PRESSURE_MPA)
    }

    /// 能耗计算口径: 缺失实际压力时按额定压力计（压降为 0）
    pub fn operating_pressure_mpa(&self) -> f64 {
        self.actual_pressure_mpa.unwrap_or(self.rated_pressure_mpa)
    }
}

// ==========================================
// CandidateUnit - 供应商候选机型
// ==========================================
// 不变量: energy_con >= 0; 气量为 0 的机型不参与任何组合
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateUnit {
    pub brand_name: String,           // 品牌
    pub model: String,                // 型号
    pub rated_power_kw: f64,          // 额定功率 (kW)
    pub rated_airflow_m3min: f64,     // 气量 (m³/min)
    pub control_mode: ControlMode,    // 工频/变频
    pub rated_pressure_mpa: f64,      // 额定压力 (MPa)
    pub energy_con: f64,              // 比功率 (kW/(m³/min))
    pub energy_con_min: f64,          // 均每立方耗电 (energy_con/60)
}

impl CandidateUnit {
    /// 构造并校验供应商机型; energy_con_min 缺省时按 energy_con/60 推导
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        brand_name: &str,
        model: &str,
        rated_power_kw: f64,
        rated_airflow_m3min: f64,
        control_mode: ControlMode,
        rated_pressure_mpa: f64,
        energy_con: f64,
        energy_con_min: Option<f64>,
    ) -> EngineResult<Self> {
        let unit = Self {
            brand_name: normalize_brand_name(brand_name),
            model: model.trim().to_string(),
            rated_power_kw,
            rated_airflow_m3min,
            control_mode,
            rated_pressure_mpa,
            energy_con,
            energy_con_min: energy_con_min.unwrap_or_else(|| round_to(energy_con / 60.0, 4)),
        };
        unit.validate()?;
        Ok(unit)
    }

    pub fn validate(&self) -> EngineResult<()> {
        let label = format!("{}-{}", self.brand_name, self.model);
        for (field, value) in [
            ("比功率", self.energy_con),
            ("气量", self.rated_airflow_m3min),
            ("额定功率", self.rated_power_kw),
            ("额定压力", self.rated_pressure_mpa),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(EngineError::InvalidInput(format!(
                    "供应商机型 {}: {} 必须为非负数,实际 {}",
                    label, field, value
                )));
            }
        }
        Ok(())
    }

    pub fn brand(&self) -> Brand {
        Brand::from_name(&self.brand_name)
    }

    /// 机型身份（品牌 + 型号）
    pub fn identity(&self) -> (&str, &str) {
        (self.brand_name.as_str(), self.model.as_str())
    }

    pub fn same_identity(&self, other: &CandidateUnit) -> bool {
        self.identity() == other.identity()
    }

    pub fn is_usable(&self) -> bool {
        self.rated_airflow_m3min > 0.0
    }
}

fn normalize_brand_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        Brand::Other.title_cn().to_string()
    } else {
        trimmed.to_string()
    }
}

fn check_non_negative(no: i64, field: &str, value: f64) -> EngineResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(EngineError::InvalidInput(format!(
            "设备编号={}: {} 必须为非负数,实际 {}",
            no, field, value
        )));
    }
    Ok(())
}
