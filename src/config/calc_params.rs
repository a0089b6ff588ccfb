// ==========================================
// 空压机节能改造 - 计算参数
// ==========================================
// 职责: 计算参数全集（默认值 + 单次请求覆写）
// 存储: 默认值可由 config_kv 覆写,单次请求再叠加 CalcOverrides
// ==========================================

use serde::{Deserialize, Serialize};

pub const DEFAULT_EMPTY_WASTE_RATIO: f64 = 0.4;
pub const DEFAULT_PRESSURE_DROP_RATIO: f64 = 0.07;
pub const DEFAULT_MARGIN_RATIO: f64 = 1.1;
pub const DEFAULT_ANNUAL_RUNNING_HOURS: u32 = 8000;
pub const DEFAULT_MAX_RECOMMEND_UNITS: usize = 6;
pub const DEFAULT_TWO_SAME_OVERAGE_RATIO: f64 = 0.2;

/// 计算参数（一次计算请求内不可变）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalcParams {
    /// 服务系数覆写（未设则按品牌）
    #[serde(default)]
    pub service_coefficient: Option<f64>,

    /// 变频加载比例覆写（未设则按品牌）
    #[serde(default)]
    pub loading_ratio: Option<f64>,

    /// 空载浪费系数
    pub empty_waste_ratio: f64,

    /// 压降浪费系数
    pub pressure_drop_ratio: f64,

    /// 余量系数（保留接口字段,需求气量直接作为组合上限,不乘余量）
    pub margin_ratio: f64,

    /// true=按实际用气量（口径 A）, false=按额定用气量（口径 B）
    pub use_actual_flow: bool,

    /// 年运行时间（小时）
    pub annual_running_hours: u32,

    /// 推荐台数上限（再与原有设备台数取小）
    pub max_recommend_units: usize,

    /// 两台同型方案允许的过盈比例
    pub two_same_overage_ratio: f64,
}

impl Default for CalcParams {
    fn default() -> Self {
        Self {
            service_coefficient: None,
            loading_ratio: None,
            empty_waste_ratio: DEFAULT_EMPTY_WASTE_RATIO,
            pressure_drop_ratio: DEFAULT_PRESSURE_DROP_RATIO,
            margin_ratio: DEFAULT_MARGIN_RATIO,
            use_actual_flow: true,
            annual_running_hours: DEFAULT_ANNUAL_RUNNING_HOURS,
            max_recommend_units: DEFAULT_MAX_RECOMMEND_UNITS,
            two_same_overage_ratio: DEFAULT_TWO_SAME_OVERAGE_RATIO,
        }
    }
}

impl CalcParams {
    /// 推荐台数上限 = min(配置上限, 原有设备台数)
    pub fn unit_cap(&self, fleet_size: usize) -> usize {
        self.max_recommend_units.min(fleet_size)
    }

    /// 参数合法性检查,返回首个问题描述
    pub fn check(&self) -> Result<(), String> {
        let ratios = [
            ("empty_waste_ratio", self.empty_waste_ratio),
            ("pressure_drop_ratio", self.pressure_drop_ratio),
            ("margin_ratio", self.margin_ratio),
            ("two_same_overage_ratio", self.two_same_overage_ratio),
        ];
        for (name, value) in ratios {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("参数 {} 必须为非负数,实际 {}", name, value));
            }
        }
        for (name, value) in [
            ("service_coefficient", self.service_coefficient),
            ("loading_ratio", self.loading_ratio),
        ] {
            if let Some(v) = value {
                if !v.is_finite() || v <= 0.0 {
                    return Err(format!("参数 {} 必须为正数,实际 {}", name, v));
                }
            }
        }
        if self.max_recommend_units == 0 {
            return Err("参数 max_recommend_units 必须大于 0".to_string());
        }
        Ok(())
    }
}

/// 单次请求的参数覆写（None 表示沿用配置值）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalcOverrides {
    #[serde(default)]
    pub default_ser_p: Option<f64>,
    #[serde(default)]
    pub default_por: Option<f64>,
    #[serde(default)]
    pub empty_waste_ratio: Option<f64>,
    #[serde(default)]
    pub pressure_drop_ratio: Option<f64>,
    #[serde(default)]
    pub margin_ratio: Option<f64>,
    #[serde(default)]
    pub use_actual_flow: Option<bool>,
    #[serde(default)]
    pub running_hours_per_year: Option<u32>,
    #[serde(default)]
    pub max_units: Option<usize>,
}

impl CalcOverrides {
    /// 在基础参数上叠加覆写
    pub fn apply(&self, base: &CalcParams) -> CalcParams {
        CalcParams {
            service_coefficient: self.default_ser_p.or(base.service_coefficient),
            loading_ratio: self.default_por.or(base.loading_ratio),
            empty_waste_ratio: self.empty_waste_ratio.unwrap_or(base.empty_waste_ratio),
            pressure_drop_ratio: self.pressure_drop_ratio.unwrap_or(base.pressure_drop_ratio),
            margin_ratio: self.margin_ratio.unwrap_or(base.margin_ratio),
            use_actual_flow: self.use_actual_flow.unwrap_or(base.use_actual_flow),
            annual_running_hours: self
                .running_hours_per_year
                .unwrap_or(base.annual_running_hours),
            max_recommend_units: self.max_units.unwrap_or(base.max_recommend_units),
            two_same_overage_ratio: base.two_same_overage_ratio,
        }
    }
}
