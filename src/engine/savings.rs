// ==========================================
// 空压机节能改造 - 节能量汇总引擎
// ==========================================
// 职责: 原有设备能耗 × 推荐机型申报比功率 → 逐台/全厂节电
// 公式:
// - 比功率差 = 原比功率 - 新比功率（4 位小数）
// - 节电比例 = 差 / 原比功率 × 100（2 位小数）
// - 小时节电 = 差 × 加权气量（4 位小数）
// - 年节电   = 小时节电 × 年运行时间（取整）
// 红线: Σ 逐台年节电 == 全厂年总节电,且写入每条记录
// ==========================================

use crate::domain::energy::{EnergyResult, SavingsRecord, SavingsReport, UnitEnergy};
use crate::domain::machine::CandidateUnit;
use crate::domain::numeric::{round_to, round_to_int};
use crate::engine::error::{EngineError, EngineResult};
use tracing::{info, instrument};

// ==========================================
// SavingsAggregator - 节能量汇总
// ==========================================
pub struct SavingsAggregator {
    annual_running_hours: u32,
}

impl SavingsAggregator {
    pub fn new(annual_running_hours: u32) -> Self {
        Self {
            annual_running_hours,
        }
    }

    /// 逐台配对计算节电并汇总
    ///
    /// # 参数
    /// - energy_results: 原有设备能耗（按原有顺序）
    /// - replacements: 与原有设备一一对应的推荐机型
    #[instrument(skip(self, energy_results, replacements), fields(
        machines = energy_results.len(),
        replacements = replacements.len()
    ))]
    pub fn aggregate(
        &self,
        energy_results: Vec<EnergyResult>,
        replacements: &[CandidateUnit],
    ) -> EngineResult<SavingsReport> {
        if energy_results.len() != replacements.len() {
            return Err(EngineError::LengthMismatch {
                machines: energy_results.len(),
                replacements: replacements.len(),
            });
        }

        let mut records = energy_results
            .iter()
            .zip(replacements)
            .map(|(existing, replacement)| self.pair(existing, replacement))
            .collect::<EngineResult<Vec<SavingsRecord>>>()?;

        let all_year_savings_kwh: i64 = records.iter().map(|r| r.saving_per_year_kwh).sum();
        for record in &mut records {
            record.all_year_savings_kwh = all_year_savings_kwh;
        }

        info!(
            records = records.len(),
            annual_running_hours = self.annual_running_hours,
            all_year_savings_kwh,
            "节能量汇总完成"
        );

        Ok(SavingsReport {
            energy_results,
            records,
            annual_running_hours: self.annual_running_hours,
            all_year_savings_kwh,
        })
    }

    /// 单台配对（全厂总量由 aggregate 回填）
    pub fn pair(
        &self,
        existing: &EnergyResult,
        replacement: &CandidateUnit,
    ) -> EngineResult<SavingsRecord> {
        if existing.specific_consumption == 0.0 {
            return Err(EngineError::PreconditionViolation {
                machine_no: existing.machine_no,
                reason: "原有设备比功率为 0,节电比例无定义".to_string(),
            });
        }

        let saving = round_to(existing.specific_consumption - replacement.energy_con, 4);
        let portion = round_to(saving / existing.specific_consumption * 100.0, 2);
        let per_hour = round_to(saving * existing.weighted_airflow, 4);
        let per_year = round_to_int(per_hour * self.annual_running_hours as f64);

        Ok(SavingsRecord {
            machine_no: existing.machine_no,
            existing: UnitEnergy::from_existing(existing),
            replacement: UnitEnergy::from_candidate(replacement),
            saving_kw_per_m3: saving,
            saving_portion_pct: portion,
            saving_per_hour_kw: per_hour,
            saving_per_year_kwh: per_year,
            all_year_savings_kwh: per_year,
        })
    }
}
