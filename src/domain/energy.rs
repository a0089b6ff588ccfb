// ==========================================
// 空压机节能改造 - 能耗与节能量领域模型
// ==========================================
// 职责: 单台能耗结果 (EnergyResult)、单台节能记录 (SavingsRecord)、
//       全厂节能汇总 (SavingsReport)
// 说明: 每条记录都携带全厂年总节电 all_year_savings_kwh（下游报表直接展示）
// ==========================================

use crate::domain::machine::CandidateUnit;
use crate::domain::types::ControlMode;
use serde::{Deserialize, Serialize};

// ==========================================
// EnergyResult - 原有设备单台能耗
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyResult {
    pub machine_no: i64,
    pub brand_name: String,
    pub model: String,
    pub rated_power_kw: f64,
    pub rated_airflow_m3min: f64,
    pub control_mode: ControlMode,

    // ===== 计算中间量 =====
    pub load_ratio: f64,          // 加载率（工频: 加载/运行; 变频: 品牌默认加载率）
    pub pressure_delta_mpa: f64,  // 额定压力 - 实际压力（3 位小数）
    pub empty_load_waste: f64,    // 空载浪费 (kW)
    pub pressure_drop_waste: f64, // 压降浪费 (kW)
    pub total_waste: f64,         // 总计浪费 (kW)

    // ===== 结果 =====
    pub specific_consumption: f64,         // 实际比功率（2 位小数）
    pub specific_consumption_per_min: f64, // 均每立方耗电（/60, 4 位小数）
    pub weighted_airflow: f64,             // 加载率 × 额定排量（4 位小数）

    // ===== 计算过程（可解释性）=====
    pub empty_waste_expr: String,
    pub pressure_waste_expr: String,
    pub consumption_expr: String,
}

// ==========================================
// UnitEnergy - 参与对比的单台能效
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitEnergy {
    pub brand_name: String,
    pub model: String,
    pub rated_power_kw: f64,
    pub rated_airflow_m3min: f64,
    pub control_mode: ControlMode,
    pub energy_con: f64,
    pub energy_con_min: f64,
}

impl UnitEnergy {
    pub fn from_existing(result: &EnergyResult) -> Self {
        Self {
            brand_name: result.brand_name.clone(),
            model: result.model.clone(),
            rated_power_kw: result.rated_power_kw,
            rated_airflow_m3min: result.rated_airflow_m3min,
            control_mode: result.control_mode,
            energy_con: result.specific_consumption,
            energy_con_min: result.specific_consumption_per_min,
        }
    }

    /// 选型机型直接使用供应商申报比功率,不重新计算
    pub fn from_candidate(unit: &CandidateUnit) -> Self {
        Self {
            brand_name: unit.brand_name.clone(),
            model: unit.model.clone(),
            rated_power_kw: unit.rated_power_kw,
            rated_airflow_m3min: unit.rated_airflow_m3min,
            control_mode: unit.control_mode,
            energy_con: unit.energy_con,
            energy_con_min: unit.energy_con_min,
        }
    }
}

// ==========================================
// SavingsRecord - 单台节能对比
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsRecord {
    pub machine_no: i64,
    pub existing: UnitEnergy,
    pub replacement: UnitEnergy,
    pub saving_kw_per_m3: f64,    // 比功率差（4 位小数）
    pub saving_portion_pct: f64,  // 节电比例 %（2 位小数）
    pub saving_per_hour_kw: f64,  // 小时节电 kW（4 位小数）
    pub saving_per_year_kwh: i64, // 年节电 kWh
    pub all_year_savings_kwh: i64, // 全厂年总节电（每条记录相同）
}

// ==========================================
// SavingsReport - 全厂节能汇总
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsReport {
    pub energy_results: Vec<EnergyResult>,
    pub records: Vec<SavingsRecord>,
    pub annual_running_hours: u32,
    pub all_year_savings_kwh: i64,
}

impl SavingsReport {
    /// 按电价折算年节电费用（电价为负时不计算）
    pub fn savings_cost(&self, electricity_price: f64) -> Option<f64> {
        if electricity_price >= 0.0 {
            Some(crate::domain::numeric::round_to(
                self.all_year_savings_kwh as f64 * electricity_price,
                2,
            ))
        } else {
            None
        }
    }
}
