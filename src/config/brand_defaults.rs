// ==========================================
// 空压机节能改造 - 品牌默认系数表
// ==========================================
// 职责: 服务系数 / 变频加载比例的品牌默认值
// 红线: 进程启动时构造一次,按引用传入计算器,不存在全局可变状态
// ==========================================

use crate::domain::types::Brand;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 未列出品牌的服务系数
pub const FALLBACK_SERVICE_COEFFICIENT: f64 = 1.2;
/// 未列出品牌的变频加载比例
pub const FALLBACK_LOADING_RATIO: f64 = 0.98;

/// 单个品牌的默认系数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrandFactors {
    pub service_coefficient: f64,
    pub loading_ratio: f64,
}

/// 品牌默认系数表（枚举键 + 唯一兜底值）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandDefaults {
    entries: BTreeMap<Brand, BrandFactors>,
    fallback: BrandFactors,
}

impl BrandDefaults {
    /// 标准默认表
    pub fn standard() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(
            Brand::AtlasCopco,
            BrandFactors { service_coefficient: 1.15, loading_ratio: 0.98 },
        );
        entries.insert(
            Brand::Kaeser,
            BrandFactors { service_coefficient: 1.15, loading_ratio: 0.98 },
        );
        entries.insert(
            Brand::IngersollRand,
            BrandFactors { service_coefficient: 1.2, loading_ratio: 0.98 },
        );
        entries.insert(
            Brand::Fusheng,
            BrandFactors { service_coefficient: 1.3, loading_ratio: 0.9 },
        );
        Self {
            entries,
            fallback: BrandFactors {
                service_coefficient: FALLBACK_SERVICE_COEFFICIENT,
                loading_ratio: FALLBACK_LOADING_RATIO,
            },
        }
    }

    /// 替换某品牌的系数（Other 即兜底值）
    pub fn with_factors(mut self, brand: Brand, factors: BrandFactors) -> Self {
        if brand == Brand::Other {
            self.fallback = factors;
        } else {
            self.entries.insert(brand, factors);
        }
        self
    }

    pub fn factors(&self, brand: Brand) -> BrandFactors {
        self.entries.get(&brand).copied().unwrap_or(self.fallback)
    }

    /// 服务系数: 覆写优先,否则按品牌
    pub fn service_coefficient(&self, brand: Brand, override_value: Option<f64>) -> f64 {
        override_value.unwrap_or_else(|| self.factors(brand).service_coefficient)
    }

    /// 变频加载比例: 覆写优先,否则按品牌
    pub fn loading_ratio(&self, brand: Brand, override_value: Option<f64>) -> f64 {
        override_value.unwrap_or_else(|| self.factors(brand).loading_ratio)
    }
}

impl Default for BrandDefaults {
    fn default() -> Self {
        Self::standard()
    }
}
