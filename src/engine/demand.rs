// ==========================================
// 空压机节能改造 - 需求汇总引擎
// ==========================================
// 职责: 将原有设备列表归约为需求气量 + 需求压力
// 口径 A: 按实际加载产气汇总（工频: 加载/运行; 变频: 品牌默认加载率）
// 口径 B: 按额定气量汇总
// 红线: 需求压力取最大值（最不利工况决定）,不取平均
// ==========================================

use crate::config::BrandDefaults;
use crate::domain::machine::ExistingMachine;
use crate::domain::numeric::round_to;
use crate::domain::types::AirflowCaliber;
use serde::{Deserialize, Serialize};

/// 需求汇总结果
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Demand {
    pub target_airflow: f64,  // 需求气量 (m³/min, 4 位小数)
    pub target_pressure: f64, // 需求压力 (MPa, 4 位小数)
}

impl Demand {
    /// 无需求（空设备列表）
    pub fn none() -> Self {
        Self {
            target_airflow: 0.0,
            target_pressure: 0.0,
        }
    }

    pub fn is_none(&self) -> bool {
        self.target_airflow == 0.0 && self.target_pressure == 0.0
    }
}

// ==========================================
// DemandAggregator - 需求汇总引擎
// ==========================================
pub struct DemandAggregator<'a> {
    brand_defaults: &'a BrandDefaults,
}

impl<'a> DemandAggregator<'a> {
    pub fn new(brand_defaults: &'a BrandDefaults) -> Self {
        Self { brand_defaults }
    }

    /// 汇总需求气量与需求压力（空列表返回 0/0）
    pub fn aggregate(&self, machines: &[ExistingMachine], caliber: AirflowCaliber) -> Demand {
        if machines.is_empty() {
            return Demand::none();
        }
        Demand {
            target_airflow: self.demand_airflow(machines, caliber),
            target_pressure: self.demand_pressure(machines),
        }
    }

    /// 需求气量 Q_demand (m³/min)
    pub fn demand_airflow(&self, machines: &[ExistingMachine], caliber: AirflowCaliber) -> f64 {
        let total: f64 = machines
            .iter()
            .map(|m| match caliber {
                AirflowCaliber::Actual => m.rated_airflow_m3min * self.realized_load_ratio(m),
                AirflowCaliber::Rated => m.rated_airflow_m3min,
            })
            .sum();
        round_to(total, 4)
    }

    /// 需求压力 P_demand (MPa): 实际运行压力最大值
    pub fn demand_pressure(&self, machines: &[ExistingMachine]) -> f64 {
        machines
            .iter()
            .map(|m| m.demand_pressure_mpa())
            .fold(None, |acc: Option<f64>, p| Some(acc.map_or(p, |a| a.max(p))))
            .map(|p| round_to(p, 4))
            .unwrap_or(0.0)
    }

    /// 实际加载率: 变频取品牌默认加载率; 工频取 加载/运行（运行为 0 时计 0）
    fn realized_load_ratio(&self, machine: &ExistingMachine) -> f64 {
        if machine.is_variable_frequency() {
            self.brand_defaults.loading_ratio(machine.brand, None)
        } else if machine.running_hours == 0 {
            0.0
        } else {
            machine.loaded_hours as f64 / machine.running_hours as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::ControlMode;

    fn machine(
        no: i64,
        brand: &str,
        air: f64,
        mode: ControlMode,
        running: u32,
        loaded: u32,
        actual: Option<f64>,
    ) -> ExistingMachine {
        ExistingMachine::new(no, "M", brand, 55.0, air, mode, running, loaded, 0.8, actual).unwrap()
    }

    #[test]
    fn test_empty_fleet_has_no_demand() {
        let table = BrandDefaults::standard();
        let demand = DemandAggregator::new(&table).aggregate(&[], AirflowCaliber::Actual);
        assert!(demand.is_none());
        assert_eq!(demand, Demand::none());
    }

    #[test]
    fn test_actual_caliber_weights_by_load_ratio() {
        let table = BrandDefaults::standard();
        let machines = vec![
            machine(1, "其他", 10.0, ControlMode::FixedFrequency, 8000, 6000, Some(0.75)),
            machine(2, "复盛", 10.0, ControlMode::VariableFrequency, 8000, 8000, Some(0.7)),
        ];
        let agg = DemandAggregator::new(&table);
        // 10*0.75 + 10*0.9
        assert_eq!(agg.demand_airflow(&machines, AirflowCaliber::Actual), 16.5);
        assert_eq!(agg.demand_airflow(&machines, AirflowCaliber::Rated), 20.0);
    }

    #[test]
    fn test_zero_running_hours_contributes_nothing() {
        let table = BrandDefaults::standard();
        let machines = vec![machine(1, "其他", 10.0, ControlMode::FixedFrequency, 0, 0, None)];
        let agg = DemandAggregator::new(&table);
        assert_eq!(agg.demand_airflow(&machines, AirflowCaliber::Actual), 0.0);
    }

    #[test]
    fn test_pressure_takes_worst_case() {
        let table = BrandDefaults::standard();
        let machines = vec![
            machine(1, "其他", 10.0, ControlMode::FixedFrequency, 100, 50, Some(0.65)),
            machine(2, "其他", 10.0, ControlMode::FixedFrequency, 100, 50, Some(0.72)),
            machine(3, "其他", 10.0, ControlMode::FixedFrequency, 100, 50, Some(0.7)),
        ];
        let demand = DemandAggregator::new(&table).aggregate(&machines, AirflowCaliber::Rated);
        assert_eq!(demand.target_pressure, 0.72);
        assert_eq!(demand.target_airflow, 30.0);
    }

    #[test]
    fn test_missing_pressure_defaults() {
        let table = BrandDefaults::standard();
        let mut m = machine(1, "其他", 10.0, ControlMode::FixedFrequency, 100, 50, None);
        m.rated_pressure_mpa = 0.0;
        let demand = DemandAggregator::new(&table).aggregate(&[m], AirflowCaliber::Rated);
        assert_eq!(demand.target_pressure, 0.8);
    }
}
