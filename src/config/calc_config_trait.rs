// ==========================================
// 空压机节能改造 - 计算配置读取 Trait
// ==========================================
// 职责: 定义引擎/API 所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::brand_defaults::BrandDefaults;
use crate::config::calc_params::CalcParams;
use async_trait::async_trait;
use std::error::Error;

// ==========================================
// CalcConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait CalcConfigReader: Send + Sync {
    /// 获取计算参数（缺省项取默认值）
    ///
    /// # 默认值
    /// - empty_waste_ratio: 0.4
    /// - pressure_drop_ratio: 0.07
    /// - annual_running_hours: 8000
    /// - max_recommend_units: 6
    async fn get_calc_params(&self) -> Result<CalcParams, Box<dyn Error>>;

    /// 获取品牌默认系数表
    ///
    /// # 默认值
    /// - BrandDefaults::standard()
    async fn get_brand_defaults(&self) -> Result<BrandDefaults, Box<dyn Error>>;
}
