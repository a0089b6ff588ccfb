// ==========================================
// 空压机节能改造 - 选型方案领域模型
// ==========================================
// 职责: 方案 (机型, 台数) 列表、合并去重、签名、总气量、展开
// 红线: 同一机型（品牌+型号）只允许一条记录,重复选择合并台数
// ==========================================

use crate::domain::machine::CandidateUnit;
use crate::domain::numeric::round_to;
use crate::domain::types::SchemeKind;
use serde::{Deserialize, Serialize};

/// 方案签名: 按 (品牌, 型号, -台数) 排序后的 (品牌, 型号, 台数) 列表
pub type SchemeSignature = Vec<(String, String, u32)>;

// ==========================================
// SchemeEntry - 方案条目
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemeEntry {
    pub unit: CandidateUnit,
    pub count: u32,
}

// ==========================================
// Scheme - 选型方案
// ==========================================
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Scheme {
    pub entries: Vec<SchemeEntry>,
}

impl Scheme {
    pub fn new() -> Self {
        Self::default()
    }

    /// 单一机型 n 台
    pub fn single(unit: CandidateUnit, count: u32) -> Self {
        Self {
            entries: vec![SchemeEntry { unit, count }],
        }
    }

    /// 追加 1 台（同机型合并计数,保持首次出现的顺序）
    pub fn push_unit(&mut self, unit: &CandidateUnit) {
        self.add_units(unit, 1);
    }

    /// 追加 n 台
    pub fn add_units(&mut self, unit: &CandidateUnit, count: u32) {
        if count == 0 {
            return;
        }
        match self.entries.iter_mut().find(|e| e.unit.same_identity(unit)) {
            Some(entry) => entry.count += count,
            None => self.entries.push(SchemeEntry {
                unit: unit.clone(),
                count,
            }),
        }
    }

    /// 合并同机型条目（幂等）
    pub fn merged(&self) -> Scheme {
        let mut out = Scheme::new();
        for entry in &self.entries {
            out.add_units(&entry.unit, entry.count);
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_count(&self) -> u32 {
        self.entries.iter().map(|e| e.count).sum()
    }

    /// 方案总气量 = Σ(单台气量 × 台数),逐步按 4 位小数舍入
    pub fn total_airflow(&self) -> f64 {
        self.entries.iter().fold(0.0, |acc, e| {
            round_to(acc + e.unit.rated_airflow_m3min * e.count as f64, 4)
        })
    }

    /// 去重/相等比较用签名
    pub fn signature(&self) -> SchemeSignature {
        let mut sig: Vec<(String, String, u32)> = self
            .merged()
            .entries
            .iter()
            .map(|e| (e.unit.brand_name.clone(), e.unit.model.clone(), e.count))
            .collect();
        sig.sort_by(|a, b| {
            a.0.cmp(&b.0)
                .then_with(|| a.1.cmp(&b.1))
                .then_with(|| b.2.cmp(&a.2))
        });
        sig
    }

    /// 展开为与原有设备一一对应的列表（不足补最后一台,超出截断）
    pub fn flatten(&self, slots: usize) -> Vec<CandidateUnit> {
        let mut flat: Vec<CandidateUnit> = Vec::with_capacity(slots);
        for entry in &self.entries {
            for _ in 0..entry.count {
                flat.push(entry.unit.clone());
            }
        }
        if let Some(last) = flat.last().cloned() {
            while flat.len() < slots {
                flat.push(last.clone());
            }
        }
        flat.truncate(slots);
        flat
    }

    /// 方案构成描述，如 "2台 凯撒-ASD60, 1台 复盛-SA30"
    pub fn composition(&self) -> String {
        self.entries
            .iter()
            .map(|e| format!("{}台 {}-{}", e.count, e.unit.brand_name, e.unit.model))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn lines(&self) -> Vec<SchemeLine> {
        self.entries
            .iter()
            .map(|e| SchemeLine {
                brand: e.unit.brand_name.clone(),
                model: e.unit.model.clone(),
                count: e.count,
            })
            .collect()
    }
}

// ==========================================
// SchemeLine - 对外输出的方案行（不含内部气量字段）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemeLine {
    pub brand: String,
    pub model: String,
    pub count: u32,
}

// ==========================================
// NamedScheme - 带名称的候选方案
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedScheme {
    pub kind: SchemeKind,
    pub name: String,
    pub scheme: Vec<SchemeLine>,
    pub total_air: f64, // 方案总气量（2 位小数）
}

impl NamedScheme {
    pub fn from_scheme(kind: SchemeKind, scheme: &Scheme) -> Self {
        Self {
            kind,
            name: kind.title_cn().to_string(),
            scheme: scheme.lines(),
            total_air: round_to(scheme.total_airflow(), 2),
        }
    }
}
