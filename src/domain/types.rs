// ==========================================
// 空压机节能改造 - 领域类型定义
// ==========================================
// 职责: 品牌枚举、控制方式、需求口径、方案类型
// 红线: 品牌默认值按枚举查表,未列出品牌统一走 Other
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 品牌 (Brand)
// ==========================================
// 只有列出的品牌有专属默认系数,其余一律归入 Other
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Brand {
    AtlasCopco,    // 阿特拉斯
    Kaeser,        // 凯撒
    IngersollRand, // 英格索兰
    Fusheng,       // 复盛
    Other,         // 其他
}

impl Brand {
    pub const LISTED: [Brand; 4] = [
        Brand::AtlasCopco,
        Brand::Kaeser,
        Brand::IngersollRand,
        Brand::Fusheng,
    ];

    /// 从原始品牌名称解析（中英文均可，未识别则为 Other）
    pub fn from_name(name: &str) -> Self {
        let trimmed = name.trim();
        match trimmed {
            "阿特拉斯" | "阿特拉斯科普柯" => Brand::AtlasCopco,
            "凯撒" => Brand::Kaeser,
            "英格索兰" => Brand::IngersollRand,
            "复盛" => Brand::Fusheng,
            _ => match trimmed.to_lowercase().replace(['-', '_', ' '], "").as_str() {
                "atlas" | "atlascopco" => Brand::AtlasCopco,
                "kaeser" => Brand::Kaeser,
                "ingersollrand" | "ir" => Brand::IngersollRand,
                "fusheng" => Brand::Fusheng,
                _ => Brand::Other,
            },
        }
    }

    pub fn title_cn(&self) -> &'static str {
        match self {
            Brand::AtlasCopco => "阿特拉斯",
            Brand::Kaeser => "凯撒",
            Brand::IngersollRand => "英格索兰",
            Brand::Fusheng => "复盛",
            Brand::Other => "其他",
        }
    }
}

impl fmt::Display for Brand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title_cn())
    }
}

// ==========================================
// 控制方式 (Control Mode)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ControlMode {
    FixedFrequency,    // 工频
    VariableFrequency, // 变频
}

impl ControlMode {
    pub fn from_flag(is_variable_frequency: bool) -> Self {
        if is_variable_frequency {
            ControlMode::VariableFrequency
        } else {
            ControlMode::FixedFrequency
        }
    }

    pub fn is_variable_frequency(&self) -> bool {
        matches!(self, ControlMode::VariableFrequency)
    }

    pub fn title_cn(&self) -> &'static str {
        match self {
            ControlMode::FixedFrequency => "工频",
            ControlMode::VariableFrequency => "变频",
        }
    }
}

impl fmt::Display for ControlMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlMode::FixedFrequency => write!(f, "FIXED_FREQUENCY"),
            ControlMode::VariableFrequency => write!(f, "VARIABLE_FREQUENCY"),
        }
    }
}

// ==========================================
// 需求气量口径 (Airflow Caliber)
// ==========================================
// 口径 A: 按实际加载产气汇总; 口径 B: 按额定气量汇总
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AirflowCaliber {
    Actual,
    Rated,
}

impl AirflowCaliber {
    pub fn from_use_actual_flow(use_actual_flow: bool) -> Self {
        if use_actual_flow {
            AirflowCaliber::Actual
        } else {
            AirflowCaliber::Rated
        }
    }
}

impl Default for AirflowCaliber {
    fn default() -> Self {
        AirflowCaliber::Actual
    }
}

// ==========================================
// 方案类型 (Scheme Kind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemeKind {
    FlowMatch,
    AverageFlow,
    TwoSame,
    SameModelMulti,
    Balanced,
}

impl SchemeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemeKind::FlowMatch => "flow_match",
            SchemeKind::AverageFlow => "average_flow",
            SchemeKind::TwoSame => "two_same",
            SchemeKind::SameModelMulti => "same_model_multi",
            SchemeKind::Balanced => "balanced",
        }
    }

    pub fn title_cn(&self) -> &'static str {
        match self {
            SchemeKind::FlowMatch => "按额定流量匹配",
            SchemeKind::AverageFlow => "按单台目标流量",
            SchemeKind::TwoSame => "两台同型",
            SchemeKind::SameModelMulti => "同型多台",
            SchemeKind::Balanced => "一大一小",
        }
    }
}

impl std::str::FromStr for SchemeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "flow_match" | "flow-match" => Ok(SchemeKind::FlowMatch),
            "average_flow" | "average-flow" => Ok(SchemeKind::AverageFlow),
            "two_same" | "two-same" => Ok(SchemeKind::TwoSame),
            "same_model_multi" | "same-model-multi" => Ok(SchemeKind::SameModelMulti),
            "balanced" => Ok(SchemeKind::Balanced),
            other => Err(format!("未知方案类型: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brand_from_name() {
        assert_eq!(Brand::from_name("阿特拉斯"), Brand::AtlasCopco);
        assert_eq!(Brand::from_name(" 复盛 "), Brand::Fusheng);
        assert_eq!(Brand::from_name("Ingersoll-Rand"), Brand::IngersollRand);
        assert_eq!(Brand::from_name("博莱特"), Brand::Other);
        assert_eq!(Brand::from_name(""), Brand::Other);
    }

    #[test]
    fn test_scheme_kind_parse() {
        assert_eq!("flow-match".parse::<SchemeKind>(), Ok(SchemeKind::FlowMatch));
        assert_eq!("BALANCED".parse::<SchemeKind>(), Ok(SchemeKind::Balanced));
        assert!("greedy".parse::<SchemeKind>().is_err());
    }
}
