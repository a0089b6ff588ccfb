// ==========================================
// 空压机节能改造 - 单台能耗计算引擎
// ==========================================
// 职责: 按控制方式计算原有设备的实际比功率与浪费分解
// 工频: 比功率 = (功率×服务系数×加载率 + 空载浪费 + 压降浪费) / (排量×加载率)
// 变频: 比功率 = (功率×服务系数×(1-压差×压降系数)) / (排量×加载比例)
// 红线: 中间量 4 位小数、压差 3 位小数、比功率 2 位小数,不得更改舍入粒度
// 红线: 工频机运行时间为 0 必须报错,不得产出无穷大
// ==========================================

use crate::config::{BrandDefaults, CalcParams};
use crate::domain::energy::EnergyResult;
use crate::domain::machine::ExistingMachine;
use crate::domain::numeric::round_to;
use crate::domain::types::ControlMode;
use crate::engine::error::{EngineError, EngineResult};
use tracing::{debug, instrument};

// ==========================================
// EnergyCalculator - 单台能耗计算
// ==========================================
pub struct EnergyCalculator<'a> {
    brand_defaults: &'a BrandDefaults,
    params: &'a CalcParams,
}

impl<'a> EnergyCalculator<'a> {
    pub fn new(brand_defaults: &'a BrandDefaults, params: &'a CalcParams) -> Self {
        Self {
            brand_defaults,
            params,
        }
    }

    /// 前置条件检查（计算前调用,避免除零）
    pub fn check_preconditions(&self, machine: &ExistingMachine) -> EngineResult<()> {
        let violation = |reason: &str| EngineError::PreconditionViolation {
            machine_no: machine.no,
            reason: reason.to_string(),
        };

        if machine.rated_airflow_m3min <= 0.0 {
            return Err(violation("额定排量为 0,比功率无定义"));
        }
        match machine.control_mode {
            ControlMode::FixedFrequency => {
                if machine.running_hours == 0 {
                    return Err(violation("工频机运行时间为 0,加载率无定义"));
                }
                if machine.loaded_hours == 0 {
                    return Err(violation("工频机加载时间为 0,比功率无定义"));
                }
            }
            ControlMode::VariableFrequency => {
                let por = self
                    .brand_defaults
                    .loading_ratio(machine.brand, self.params.loading_ratio);
                if por <= 0.0 {
                    return Err(violation("变频加载比例为 0,比功率无定义"));
                }
            }
        }
        Ok(())
    }

    /// 批量计算（任一台前置条件不满足即整体失败）
    #[instrument(skip(self, machines), fields(count = machines.len()))]
    pub fn evaluate_all(&self, machines: &[ExistingMachine]) -> EngineResult<Vec<EnergyResult>> {
        for machine in machines {
            self.check_preconditions(machine)?;
        }
        machines.iter().map(|m| self.evaluate(m)).collect()
    }

    /// 计算单台能耗
    pub fn evaluate(&self, machine: &ExistingMachine) -> EngineResult<EnergyResult> {
        self.check_preconditions(machine)?;

        // 额定功率按整数 kW 参与计算
        let power = machine.rated_power_kw.trunc();
        let air = machine.rated_airflow_m3min;
        let ser_p = self
            .brand_defaults
            .service_coefficient(machine.brand, self.params.service_coefficient);
        let p_ratio = self.params.pressure_drop_ratio;

        // 压差（额定 - 实际）
        let d_val = round_to(machine.rated_pressure_mpa - machine.operating_pressure_mpa(), 3);
        let dval_waste = round_to(power * d_val * p_ratio, 4);
        let pressure_waste_expr = format!(
            "{}*({})*{:.0}%={}",
            power,
            d_val,
            p_ratio * 100.0,
            round_to(power * d_val * p_ratio, 3)
        );

        let result = match machine.control_mode {
            ControlMode::FixedFrequency => {
                let run = machine.running_hours as f64;
                let load = machine.loaded_hours as f64;
                let e_ratio = self.params.empty_waste_ratio;

                let por = round_to(load / run, 4);
                let empty = round_to((run - load) / run * e_ratio * power, 4);
                let total_waste = round_to(empty + dval_waste, 4);
                let energy = round_to((power * ser_p * por + empty + dval_waste) / (air * por), 2);

                EnergyResult {
                    load_ratio: por,
                    empty_load_waste: empty,
                    total_waste,
                    specific_consumption: energy,
                    weighted_airflow: round_to(por * air, 4),
                    empty_waste_expr: format!(
                        "({}-{})/{}*{:.0}%*{}={}",
                        machine.running_hours,
                        machine.loaded_hours,
                        machine.running_hours,
                        e_ratio * 100.0,
                        power,
                        empty
                    ),
                    consumption_expr: format!(
                        "({}*{}*{}+{})/({}*{})={}",
                        power, ser_p, por, total_waste, air, por, energy
                    ),
                    ..self.base_result(machine, power, d_val, dval_waste, pressure_waste_expr)
                }
            }
            ControlMode::VariableFrequency => {
                let por = self
                    .brand_defaults
                    .loading_ratio(machine.brand, self.params.loading_ratio);
                let d_cal = 1.0 - round_to(d_val * p_ratio, 4);
                let energy = round_to(power * ser_p * d_cal / (air * por), 2);

                EnergyResult {
                    load_ratio: por,
                    empty_load_waste: 0.0,
                    total_waste: dval_waste,
                    specific_consumption: energy,
                    weighted_airflow: round_to(por * air, 4),
                    empty_waste_expr: "0".to_string(),
                    consumption_expr: format!(
                        "({}*{}*{})/({}*{})={}",
                        power, ser_p, d_cal, air, por, energy
                    ),
                    ..self.base_result(machine, power, d_val, dval_waste, pressure_waste_expr)
                }
            }
        }
        .with_per_min();

        debug!(
            machine_no = machine.no,
            control_mode = %machine.control_mode,
            specific_consumption = result.specific_consumption,
            "单台能耗计算完成"
        );
        Ok(result)
    }

    /// 两种控制方式共用的字段
    fn base_result(
        &self,
        machine: &ExistingMachine,
        power: f64,
        d_val: f64,
        dval_waste: f64,
        pressure_waste_expr: String,
    ) -> EnergyResult {
        EnergyResult {
            machine_no: machine.no,
            brand_name: machine.brand_name.clone(),
            model: machine.model.clone(),
            rated_power_kw: power,
            rated_airflow_m3min: machine.rated_airflow_m3min,
            control_mode: machine.control_mode,
            load_ratio: 0.0,
            pressure_delta_mpa: d_val,
            empty_load_waste: 0.0,
            pressure_drop_waste: dval_waste,
            total_waste: 0.0,
            specific_consumption: 0.0,
            specific_consumption_per_min: 0.0,
            weighted_airflow: 0.0,
            empty_waste_expr: String::new(),
            pressure_waste_expr,
            consumption_expr: String::new(),
        }
    }
}

impl EnergyResult {
    /// 均每立方耗电 = 比功率 / 60
    fn with_per_min(mut self) -> Self {
        self.specific_consumption_per_min = round_to(self.specific_consumption / 60.0, 4);
        self
    }
}
