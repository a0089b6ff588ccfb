// ==========================================
// 空压机节能改造 - 方案选择与去重
// ==========================================
// 职责: 比较“按额定流量匹配”与“按单台目标流量”两个方案,
//       确定主方案、展开为逐台替换列表、生成摘要
// 规则:
// - 单台目标流量方案总气量 > 额定流量匹配方案时,舍弃前者
// - 保留方案按总气量升序,第一个为主方案
// - 跨方案按签名去重,保留先出现者
// ==========================================

use crate::domain::machine::CandidateUnit;
use crate::domain::numeric::display_f64;
use crate::domain::scheme::{NamedScheme, Scheme, SchemeSignature};
use crate::domain::types::SchemeKind;
use crate::engine::demand::Demand;
use crate::engine::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// 不可行方案的比较用总气量
const INFEASIBLE_TOTAL: f64 = 1e9;

// ==========================================
// Recommendation - 选型推荐结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub target_airflow: f64,
    pub target_pressure: f64,
    /// 与原有设备一一对应的推荐机型
    pub recommended_units: Vec<CandidateUnit>,
    /// 主方案
    pub primary: Scheme,
    /// 全部保留方案（含名称与总气量）
    pub schemes_all: Vec<NamedScheme>,
    /// 可读摘要
    pub summary: String,
}

// ==========================================
// SchemeSelector - 方案选择器
// ==========================================
pub struct SchemeSelector;

impl SchemeSelector {
    pub fn new() -> Self {
        Self
    }

    /// 选择主方案
    ///
    /// # 参数
    /// - demand: 需求气量/压力
    /// - flow_match: 按额定流量匹配方案（不可行为 None）
    /// - average_flow: 按单台目标流量方案（不可行为 None）
    /// - fleet_size: 原有设备台数（展开槽位数）
    pub fn select(
        &self,
        demand: Demand,
        flow_match: Option<Scheme>,
        average_flow: Option<Scheme>,
        fleet_size: usize,
    ) -> EngineResult<Recommendation> {
        let target = demand.target_airflow;
        let flow_total = flow_match
            .as_ref()
            .map(Scheme::total_airflow)
            .unwrap_or(INFEASIBLE_TOTAL);

        let mut retained: Vec<(SchemeKind, Scheme)> = Vec::new();
        if let Some(scheme) = flow_match {
            if scheme.total_airflow() >= target {
                retained.push((SchemeKind::FlowMatch, scheme));
            }
        }
        if let Some(scheme) = average_flow {
            let avg_total = scheme.total_airflow();
            if avg_total < target {
                debug!(avg_total, target, "按单台目标流量方案气量不足，舍弃");
            } else if avg_total > flow_total {
                debug!(avg_total, flow_total, "按单台目标流量方案总气量更大，仅保留额定流量匹配方案");
            } else {
                retained.push((SchemeKind::AverageFlow, scheme));
            }
        }

        // 稳定排序: 总气量相同时保持加入顺序
        retained.sort_by(|a, b| a.1.total_airflow().total_cmp(&b.1.total_airflow()));
        let retained = dedupe_by_signature(retained);

        let (_, primary) = match retained.first() {
            Some(first) => first.clone(),
            None => {
                warn!(target_airflow = target, "无可行组合");
                return Err(EngineError::NoFeasibleScheme {
                    target_airflow: target,
                });
            }
        };

        let schemes_all: Vec<NamedScheme> = retained
            .iter()
            .map(|(kind, scheme)| NamedScheme::from_scheme(*kind, scheme))
            .collect();
        let summary = build_summary(&demand, &retained);

        Ok(Recommendation {
            target_airflow: demand.target_airflow,
            target_pressure: demand.target_pressure,
            recommended_units: primary.flatten(fleet_size),
            primary,
            schemes_all,
            summary,
        })
    }
}

impl Default for SchemeSelector {
    fn default() -> Self {
        Self::new()
    }
}

/// 按签名去重（保留先出现者）
fn dedupe_by_signature(schemes: Vec<(SchemeKind, Scheme)>) -> Vec<(SchemeKind, Scheme)> {
    let mut seen: Vec<SchemeSignature> = Vec::new();
    let mut out = Vec::with_capacity(schemes.len());
    for (kind, scheme) in schemes {
        let sig = scheme.signature();
        if seen.contains(&sig) {
            debug!(scheme = kind.as_str(), "方案与已保留方案相同，去重");
            continue;
        }
        seen.push(sig);
        out.push((kind, scheme));
    }
    out
}

/// 摘要: 需求气量/压力 + 各方案构成
fn build_summary(demand: &Demand, schemes: &[(SchemeKind, Scheme)]) -> String {
    let parts: Vec<String> = schemes
        .iter()
        .map(|(kind, scheme)| {
            format!(
                "{}：{}（方案总气量 {:.1} m³/min）",
                kind.title_cn(),
                scheme.composition(),
                scheme.total_airflow()
            )
        })
        .collect();
    format!(
        "需求气量（组合上限）{} m³/min，需求压力 {} MPa。推荐方案：{}",
        display_f64(demand.target_airflow),
        display_f64(demand.target_pressure),
        parts.join("；")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::ControlMode;

    fn unit(model: &str, air: f64) -> CandidateUnit {
        CandidateUnit::new("凯撒", model, 37.0, air, ControlMode::VariableFrequency, 0.8, 6.0, None)
            .unwrap()
    }

    fn demand(q: f64) -> Demand {
        Demand {
            target_airflow: q,
            target_pressure: 0.8,
        }
    }

    #[test]
    fn test_average_flow_discarded_when_larger() {
        let mut flow = Scheme::new();
        flow.push_unit(&unit("S6", 6.0));
        flow.push_unit(&unit("S5", 5.0));
        let avg = Scheme::single(unit("S6", 6.0), 2);

        let rec = SchemeSelector::new()
            .select(demand(10.0), Some(flow.clone()), Some(avg), 2)
            .unwrap();
        assert_eq!(rec.primary, flow);
        assert_eq!(rec.schemes_all.len(), 1);
        assert_eq!(rec.schemes_all[0].kind, SchemeKind::FlowMatch);
    }

    #[test]
    fn test_both_kept_and_sorted_by_total() {
        let mut flow = Scheme::new();
        flow.push_unit(&unit("S6", 6.0));
        flow.push_unit(&unit("S5", 5.0));
        let avg = Scheme::single(unit("S5", 5.0), 2);

        let rec = SchemeSelector::new()
            .select(demand(10.0), Some(flow), Some(avg.clone()), 2)
            .unwrap();
        assert_eq!(rec.primary, avg);
        let kinds: Vec<SchemeKind> = rec.schemes_all.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, vec![SchemeKind::AverageFlow, SchemeKind::FlowMatch]);
        assert_eq!(rec.recommended_units.len(), 2);
        assert_eq!(rec.recommended_units[1].model, "S5");
    }

    #[test]
    fn test_identical_schemes_deduplicated() {
        let flow = Scheme::single(unit("S5", 5.0), 2);
        let avg = Scheme::single(unit("S5", 5.0), 2);
        let rec = SchemeSelector::new()
            .select(demand(10.0), Some(flow), Some(avg), 2)
            .unwrap();
        assert_eq!(rec.schemes_all.len(), 1);
        assert_eq!(rec.schemes_all[0].kind, SchemeKind::FlowMatch);
    }

    #[test]
    fn test_no_feasible_scheme() {
        let avg = Scheme::single(unit("S2", 2.0), 2);
        let err = SchemeSelector::new()
            .select(demand(10.0), None, Some(avg), 2)
            .unwrap_err();
        assert_eq!(err, EngineError::NoFeasibleScheme { target_airflow: 10.0 });
    }

    #[test]
    fn test_average_flow_alone_when_flow_match_fails() {
        let avg = Scheme::single(unit("S5", 5.0), 3);
        let rec = SchemeSelector::new()
            .select(demand(10.0), None, Some(avg.clone()), 3)
            .unwrap();
        assert_eq!(rec.primary, avg);
    }

    #[test]
    fn test_summary_format() {
        let avg = Scheme::single(unit("S5", 5.0), 2);
        let rec = SchemeSelector::new()
            .select(demand(10.0), None, Some(avg), 2)
            .unwrap();
        assert_eq!(
            rec.summary,
            "需求气量（组合上限）10.0 m³/min，需求压力 0.8 MPa。推荐方案：按单台目标流量：2台 凯撒-S5（方案总气量 10.0 m³/min）"
        );
    }

    #[test]
    fn test_summary_total_rounded_once() {
        // 10.1496 直接保留一位小数为 10.1（先舍入到 2 位会得到 10.2）
        let flow = Scheme::single(unit("S10", 10.1496), 1);
        let rec = SchemeSelector::new()
            .select(demand(10.0), Some(flow), None, 1)
            .unwrap();
        assert!(rec.summary.ends_with("按额定流量匹配：1台 凯撒-S10（方案总气量 10.1 m³/min）"));
    }
}
