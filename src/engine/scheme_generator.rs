// ==========================================
// 空压机节能改造 - 选型组合生成器
// ==========================================
// 职责: 五种启发式组合策略,各自给出可行方案或 None
// 红线: 启发式而非最优化; 平局规则必须逐位复现
// ==========================================
// 策略:
// - FlowMatch:      按额定流量匹配（逐台就近,最后一台补足且过盈最小）
// - AverageFlow:    按单台目标流量（目标/台数,最接近的单一机型 × n 台）
// - TwoSame:        两台同型（2×气量 >= 目标,且过盈不超过上限比例）
// - SameModelMulti: 同型多台（最少台数凑满目标,过盈最小）
// - Balanced:       一大一小（逐台贪心,优先与原有功率相同,过盈最小）
// 平局: 过盈/距离相同时取比功率更低者; 仍相同时取先出现者
// ==========================================

use crate::domain::numeric::round_to;
use crate::domain::scheme::Scheme;
use crate::domain::types::SchemeKind;
use crate::engine::candidate_filter::Candidate;
use std::collections::HashSet;
use tracing::debug;

/// 比较用初始哨兵值
const SENTINEL: f64 = 1e9;

// ==========================================
// GeneratorInput - 生成器输入
// ==========================================
#[derive(Debug, Clone)]
pub struct GeneratorInput<'a> {
    /// 过滤后的候选机型（目录顺序）
    pub candidates: &'a [Candidate],
    /// 需求气量（组合上限）
    pub target_airflow: f64,
    /// 推荐台数上限 = min(配置上限, 原有设备台数)
    pub max_units: usize,
    /// 原有设备额定排量（按原有顺序）
    pub fleet_airflows: Vec<f64>,
    /// 原有设备额定功率（取整 kW）
    pub fleet_powers: HashSet<i64>,
    /// 两台同型允许的过盈比例
    pub overage_ratio: f64,
}

// ==========================================
// SchemeGenerator - 组合策略
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemeGenerator {
    FlowMatch,
    AverageFlow,
    TwoSame,
    SameModelMulti,
    Balanced,
}

impl SchemeGenerator {
    pub const ALL: [SchemeGenerator; 5] = [
        SchemeGenerator::FlowMatch,
        SchemeGenerator::AverageFlow,
        SchemeGenerator::TwoSame,
        SchemeGenerator::SameModelMulti,
        SchemeGenerator::Balanced,
    ];

    pub fn kind(&self) -> SchemeKind {
        match self {
            SchemeGenerator::FlowMatch => SchemeKind::FlowMatch,
            SchemeGenerator::AverageFlow => SchemeKind::AverageFlow,
            SchemeGenerator::TwoSame => SchemeKind::TwoSame,
            SchemeGenerator::SameModelMulti => SchemeKind::SameModelMulti,
            SchemeGenerator::Balanced => SchemeKind::Balanced,
        }
    }

    /// 生成方案; 无可行组合时返回 None
    pub fn generate(&self, input: &GeneratorInput<'_>) -> Option<Scheme> {
        let scheme = match self {
            SchemeGenerator::FlowMatch => flow_match(input),
            SchemeGenerator::AverageFlow => average_flow(input),
            SchemeGenerator::TwoSame => two_same(input),
            SchemeGenerator::SameModelMulti => same_model_multi(input),
            SchemeGenerator::Balanced => balanced(input),
        };

        debug!(
            generator = self.kind().as_str(),
            feasible = scheme.is_some(),
            total_airflow = scheme.as_ref().map(|s| s.total_airflow()).unwrap_or(0.0),
            "组合生成完成"
        );
        scheme
    }
}

// ==========================================
// 按额定流量匹配
// ==========================================
fn flow_match(input: &GeneratorInput<'_>) -> Option<Scheme> {
    let n = input.max_units;
    if n == 0 || input.candidates.is_empty() {
        return None;
    }
    let target = input.target_airflow;

    // 按 (气量, 比功率) 升序,便于就近查找
    let mut sorted_c: Vec<&Candidate> = input.candidates.iter().collect();
    sorted_c.sort_by(|a, b| {
        a.airflow
            .total_cmp(&b.airflow)
            .then_with(|| a.energy_con().total_cmp(&b.energy_con()))
    });

    let slot_air = |i: usize| input.fleet_airflows.get(i).copied().unwrap_or(0.0);

    // 大需求先匹配; 原有台数超过上限时只保留排量最大的 n 台
    let mut slot_order: Vec<usize> = (0..input.fleet_airflows.len().max(n)).collect();
    slot_order.sort_by(|&a, &b| slot_air(b).total_cmp(&slot_air(a)));
    slot_order.truncate(n);

    let mut chosen: Vec<(usize, &Candidate)> = Vec::with_capacity(n);
    let mut total = 0.0;
    for (idx, &slot) in slot_order.iter().enumerate() {
        let pick = if idx < n - 1 {
            let want_air = input
                .fleet_airflows
                .get(slot)
                .copied()
                .unwrap_or(target / n as f64);
            closest_by_airflow(&sorted_c, want_air)?
        } else {
            // 最后一台: 使总气量 >= 目标且过盈最小
            let need = (target - total).max(0.0);
            let mut best: Option<&Candidate> = None;
            let mut best_diff = SENTINEL;
            for c in &sorted_c {
                if c.airflow >= need {
                    let diff = round_to(total + c.airflow, 4) - target;
                    if diff < best_diff {
                        best_diff = diff;
                        best = Some(c);
                    }
                }
            }
            match best {
                Some(c) => c,
                None => largest_by_airflow(&sorted_c)?,
            }
        };
        chosen.push((slot, pick));
        total = round_to(total + pick.airflow, 4);
    }

    if total < target {
        return None;
    }

    // 按原有设备顺序输出
    chosen.sort_by_key(|&(slot, _)| slot);
    let mut scheme = Scheme::new();
    for (_, c) in chosen {
        scheme.push_unit(&c.unit);
    }
    Some(scheme)
}

/// 气量最接近 want_air 的机型（距离相同取比功率低者,再相同取先出现者）
fn closest_by_airflow<'c>(sorted_c: &[&'c Candidate], want_air: f64) -> Option<&'c Candidate> {
    let mut best: Option<(&Candidate, (f64, f64))> = None;
    for c in sorted_c {
        let key = ((c.airflow - want_air).abs(), c.energy_con());
        match best {
            Some((_, best_key)) if key >= best_key => {}
            _ => best = Some((c, key)),
        }
    }
    best.map(|(c, _)| c)
}

/// 气量最大的机型（并列取先出现者）
fn largest_by_airflow<'c>(sorted_c: &[&'c Candidate]) -> Option<&'c Candidate> {
    let mut best: Option<&Candidate> = None;
    for c in sorted_c {
        match best {
            Some(b) if c.airflow <= b.airflow => {}
            _ => best = Some(c),
        }
    }
    best
}

// ==========================================
// 按单台目标流量
// ==========================================
fn average_flow(input: &GeneratorInput<'_>) -> Option<Scheme> {
    let n = input.max_units;
    if n == 0 || input.candidates.is_empty() {
        return None;
    }
    let flow_per_unit = input.target_airflow / n as f64;
    let refs: Vec<&Candidate> = input.candidates.iter().collect();
    let best = closest_by_airflow(&refs, flow_per_unit)?;
    Some(Scheme::single(best.unit.clone(), n as u32))
}

// ==========================================
// 两台同型
// ==========================================
fn two_same(input: &GeneratorInput<'_>) -> Option<Scheme> {
    const N: u32 = 2;
    let target = input.target_airflow;
    let ceiling = target * (1.0 + input.overage_ratio);

    let mut best: Option<&Candidate> = None;
    let mut best_overage = SENTINEL;
    let mut best_energy = SENTINEL;
    for c in input.candidates {
        if c.airflow <= 0.0 {
            continue;
        }
        let total = round_to(N as f64 * c.airflow, 4);
        if total < target || total > ceiling {
            continue;
        }
        let overage = total - target;
        if is_better(overage, c.energy_con(), best_overage, best_energy) {
            best_overage = overage;
            best_energy = c.energy_con();
            best = Some(c);
        }
    }
    best.map(|c| Scheme::single(c.unit.clone(), N))
}

// ==========================================
// 同型多台
// ==========================================
fn same_model_multi(input: &GeneratorInput<'_>) -> Option<Scheme> {
    let target = input.target_airflow;

    let mut best: Option<(&Candidate, u32)> = None;
    let mut best_overage = SENTINEL;
    let mut best_energy = SENTINEL;
    for c in input.candidates {
        if c.airflow <= 0.0 {
            continue;
        }
        let needed = ((target / c.airflow).ceil() as usize).max(1);
        let n = needed.min(input.max_units);
        let total = round_to(n as f64 * c.airflow, 4);
        let overage = total - target;
        if overage < 0.0 || n == 0 {
            continue;
        }
        if is_better(overage, c.energy_con(), best_overage, best_energy) {
            best_overage = overage;
            best_energy = c.energy_con();
            best = Some((c, n as u32));
        }
    }
    best.map(|(c, n)| Scheme::single(c.unit.clone(), n))
}

/// 过盈更小者优先,过盈相同取比功率更低者
fn is_better(overage: f64, energy: f64, best_overage: f64, best_energy: f64) -> bool {
    overage < best_overage || (overage == best_overage && energy < best_energy)
}

// ==========================================
// 一大一小（逐台贪心）
// ==========================================
fn balanced(input: &GeneratorInput<'_>) -> Option<Scheme> {
    if input.candidates.is_empty() {
        return None;
    }
    let target = input.target_airflow;
    let power_rank = |c: &Candidate| -> u8 {
        if input.fleet_powers.contains(&(c.unit.rated_power_kw.trunc() as i64)) {
            0
        } else {
            1
        }
    };

    let mut scheme = Scheme::new();
    let mut q_sum = 0.0;
    for _ in 0..input.max_units {
        if q_sum >= target {
            break;
        }

        // 能一步达标的机型: (同功率优先, 过盈最小)
        let mut best: Option<&Candidate> = None;
        let mut best_key = (1u8, SENTINEL);
        for c in input.candidates {
            if c.airflow <= 0.0 {
                continue;
            }
            let new_sum = round_to(q_sum + c.airflow, 4);
            if new_sum >= target {
                let key = (power_rank(c), new_sum - target);
                if key < best_key {
                    best_key = key;
                    best = Some(c);
                }
            }
        }

        // 一步达不到: 同功率优先,取最小气量继续累加
        let pick = match best {
            Some(c) => c,
            None => {
                let mut fallback: Option<(&Candidate, (u8, f64, f64))> = None;
                for c in input.candidates {
                    let air_key = if c.airflow == 0.0 { SENTINEL } else { c.airflow };
                    let key = (power_rank(c), air_key, c.energy_con());
                    match fallback {
                        Some((_, best_key)) if key >= best_key => {}
                        _ => fallback = Some((c, key)),
                    }
                }
                fallback?.0
            }
        };

        scheme.push_unit(&pick.unit);
        q_sum = round_to(q_sum + pick.airflow, 4);
    }

    if scheme.is_empty() || q_sum < target {
        return None;
    }
    Some(scheme)
}
