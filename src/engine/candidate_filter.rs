// ==========================================
// 空压机节能改造 - 候选机型过滤
// ==========================================
// 职责: 供应商额定压力 >= 需求压力; 气量为 0 的机型不参与组合
// 红线: 过滤结果为空是合法终态,由上层报告“无满足压力要求的机型”
// ==========================================

use crate::domain::machine::CandidateUnit;
use tracing::debug;

// ==========================================
// Candidate - 过滤后的候选机型
// ==========================================
// airflow 为组合生成器内部使用的单台气量,不进入对外输出
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub unit: CandidateUnit,
    pub(crate) airflow: f64,
}

impl Candidate {
    pub fn new(unit: CandidateUnit) -> Self {
        let airflow = unit.rated_airflow_m3min;
        Self { unit, airflow }
    }

    pub fn airflow(&self) -> f64 {
        self.airflow
    }

    pub fn energy_con(&self) -> f64 {
        self.unit.energy_con
    }
}

// ==========================================
// CandidateFilter - 候选过滤器
// ==========================================
pub struct CandidateFilter;

impl CandidateFilter {
    pub fn new() -> Self {
        Self
    }

    /// 过滤满足压力要求的机型（保持目录原有顺序）
    pub fn filter(&self, catalogue: &[CandidateUnit], target_pressure: f64) -> Vec<Candidate> {
        let candidates: Vec<Candidate> = catalogue
            .iter()
            .filter(|u| u.is_usable() && u.rated_pressure_mpa >= target_pressure)
            .cloned()
            .map(Candidate::new)
            .collect();

        debug!(
            catalogue_count = catalogue.len(),
            candidates_count = candidates.len(),
            target_pressure,
            "候选机型压力过滤完成"
        );
        candidates
    }
}

impl Default for CandidateFilter {
    fn default() -> Self {
        Self::new()
    }
}
