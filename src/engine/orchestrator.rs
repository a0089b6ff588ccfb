// ==========================================
// 空压机节能改造 - 引擎编排器
// ==========================================
// 用途: 协调各引擎的执行顺序
// 流程: 需求汇总 → 候选过滤 → 组合生成 → 方案选择 → 能耗计算 → 节能量汇总
// 红线: 无状态、同步、单次请求内失败不影响其他请求
// ==========================================

use crate::config::{BrandDefaults, CalcParams};
use crate::domain::energy::SavingsReport;
use crate::domain::machine::{CandidateUnit, ExistingMachine};
use crate::domain::types::AirflowCaliber;
use crate::engine::candidate_filter::CandidateFilter;
use crate::engine::demand::DemandAggregator;
use crate::engine::energy::EnergyCalculator;
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::savings::SavingsAggregator;
use crate::engine::scheme_generator::{GeneratorInput, SchemeGenerator};
use crate::engine::selector::{Recommendation, SchemeSelector};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// CalculationReport - 单次计算结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationReport {
    pub calculation_id: String,
    pub generated_at: DateTime<Utc>,
    pub recommendation: Recommendation,
    /// 仅出方案模式下为 None
    pub savings: Option<SavingsReport>,
}

// ==========================================
// RecommendationOrchestrator - 引擎编排器
// ==========================================
pub struct RecommendationOrchestrator {
    filter: CandidateFilter,
    selector: SchemeSelector,
}

impl RecommendationOrchestrator {
    pub fn new() -> Self {
        Self {
            filter: CandidateFilter::new(),
            selector: SchemeSelector::new(),
        }
    }

    /// 选型推荐
    ///
    /// # 参数
    /// - machines: 客户原有设备
    /// - catalogue: 供应商机型目录
    /// - params: 计算参数
    /// - brand_defaults: 品牌默认系数表
    ///
    /// # 返回
    /// - Err(EmptyInput): 无原有设备
    /// - Err(NoFeasibleCandidates): 无满足压力要求的机型
    /// - Err(NoFeasibleScheme): 无法凑满需求气量
    #[instrument(skip_all, fields(
        machines = machines.len(),
        catalogue = catalogue.len(),
        use_actual_flow = params.use_actual_flow
    ))]
    pub fn recommend(
        &self,
        machines: &[ExistingMachine],
        catalogue: &[CandidateUnit],
        params: &CalcParams,
        brand_defaults: &BrandDefaults,
    ) -> EngineResult<Recommendation> {
        if machines.is_empty() {
            return Err(EngineError::EmptyInput);
        }
        for machine in machines {
            machine.validate()?;
        }

        // ==========================================
        // 步骤1: 需求汇总
        // ==========================================
        let caliber = AirflowCaliber::from_use_actual_flow(params.use_actual_flow);
        let demand = DemandAggregator::new(brand_defaults).aggregate(machines, caliber);
        info!(
            target_airflow = demand.target_airflow,
            target_pressure = demand.target_pressure,
            "需求汇总完成"
        );

        // ==========================================
        // 步骤2: 候选过滤
        // ==========================================
        let candidates = self.filter.filter(catalogue, demand.target_pressure);
        if candidates.is_empty() {
            warn!(target_pressure = demand.target_pressure, "无满足压力要求的供应商机型");
            return Err(EngineError::NoFeasibleCandidates {
                target_pressure: demand.target_pressure,
            });
        }

        // ==========================================
        // 步骤3: 组合生成
        // ==========================================
        let input = GeneratorInput {
            candidates: &candidates,
            target_airflow: demand.target_airflow,
            max_units: params.unit_cap(machines.len()),
            fleet_airflows: machines.iter().map(|m| m.rated_airflow_m3min).collect(),
            fleet_powers: machines
                .iter()
                .map(|m| m.rated_power_kw.trunc() as i64)
                .collect(),
            overage_ratio: params.two_same_overage_ratio,
        };
        debug!(max_units = input.max_units, candidates = candidates.len(), "开始生成组合");
        let flow_match = SchemeGenerator::FlowMatch.generate(&input);
        let average_flow = SchemeGenerator::AverageFlow.generate(&input);

        // ==========================================
        // 步骤4: 方案选择
        // ==========================================
        let recommendation = self
            .selector
            .select(demand, flow_match, average_flow, machines.len())?;
        info!(
            schemes = recommendation.schemes_all.len(),
            primary_total_airflow = recommendation.primary.total_airflow(),
            "选型推荐完成"
        );
        Ok(recommendation)
    }

    /// 节能量计算（原有设备与替换机型一一对应）
    #[instrument(skip_all, fields(machines = machines.len(), replacements = replacements.len()))]
    pub fn calculate_savings(
        &self,
        machines: &[ExistingMachine],
        replacements: &[CandidateUnit],
        params: &CalcParams,
        brand_defaults: &BrandDefaults,
    ) -> EngineResult<SavingsReport> {
        if machines.is_empty() {
            return Err(EngineError::EmptyInput);
        }
        if machines.len() != replacements.len() {
            return Err(EngineError::LengthMismatch {
                machines: machines.len(),
                replacements: replacements.len(),
            });
        }

        let energy_results =
            EnergyCalculator::new(brand_defaults, params).evaluate_all(machines)?;
        SavingsAggregator::new(params.annual_running_hours).aggregate(energy_results, replacements)
    }

    /// 完整流程: 选型推荐 + 节能量（schemes_only 时跳过节能量）
    pub fn run(
        &self,
        machines: &[ExistingMachine],
        catalogue: &[CandidateUnit],
        params: &CalcParams,
        brand_defaults: &BrandDefaults,
        schemes_only: bool,
    ) -> EngineResult<CalculationReport> {
        let calculation_id = Uuid::new_v4().to_string();
        info!(calculation_id = %calculation_id, schemes_only, "开始节能计算");

        let recommendation = self.recommend(machines, catalogue, params, brand_defaults)?;
        let savings = if schemes_only {
            None
        } else {
            Some(self.calculate_savings(
                machines,
                &recommendation.recommended_units,
                params,
                brand_defaults,
            )?)
        };

        Ok(CalculationReport {
            calculation_id,
            generated_at: Utc::now(),
            recommendation,
            savings,
        })
    }
}

impl Default for RecommendationOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::ControlMode;

    fn machine(no: i64, air: f64) -> ExistingMachine {
        ExistingMachine::new(
            no,
            "OLD",
            "其他",
            37.0,
            air,
            ControlMode::FixedFrequency,
            8000,
            8000,
            0.8,
            Some(0.75),
        )
        .unwrap()
    }

    fn unit(model: &str, air: f64, pressure: f64) -> CandidateUnit {
        CandidateUnit::new("凯撒", model, 37.0, air, ControlMode::VariableFrequency, pressure, 6.0, None)
            .unwrap()
    }

    #[test]
    fn test_empty_fleet() {
        let orch = RecommendationOrchestrator::new();
        let err = orch
            .recommend(&[], &[unit("S6", 6.0, 0.8)], &CalcParams::default(), &BrandDefaults::standard())
            .unwrap_err();
        assert!(err.is_empty_input());
    }

    #[test]
    fn test_no_candidate_meets_pressure() {
        let orch = RecommendationOrchestrator::new();
        let err = orch
            .recommend(
                &[machine(1, 6.0)],
                &[unit("S6", 6.0, 0.7)],
                &CalcParams::default(),
                &BrandDefaults::standard(),
            )
            .unwrap_err();
        assert_eq!(err, EngineError::NoFeasibleCandidates { target_pressure: 0.75 });
    }

    #[test]
    fn test_run_pairs_each_machine() {
        let orch = RecommendationOrchestrator::new();
        let machines = vec![machine(1, 6.0), machine(2, 5.0)];
        let catalogue = vec![unit("S6", 6.0, 0.8), unit("S5", 5.0, 0.8)];
        let report = orch
            .run(&machines, &catalogue, &CalcParams::default(), &BrandDefaults::standard(), false)
            .unwrap();

        assert_eq!(report.recommendation.target_airflow, 11.0);
        assert_eq!(report.recommendation.recommended_units.len(), 2);
        let savings = report.savings.unwrap();
        assert_eq!(savings.records.len(), 2);
        assert!(Uuid::parse_str(&report.calculation_id).is_ok());
    }

    #[test]
    fn test_schemes_only_skips_savings() {
        let orch = RecommendationOrchestrator::new();
        let report = orch
            .run(
                &[machine(1, 6.0)],
                &[unit("S6", 6.0, 0.8)],
                &CalcParams::default(),
                &BrandDefaults::standard(),
                true,
            )
            .unwrap();
        assert!(report.savings.is_none());
    }
}
