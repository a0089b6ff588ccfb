// ==========================================
// 空压机节能改造 - 配置层
// ==========================================
// 职责: 计算参数与品牌默认系数,支持配置表覆写 + 单次请求覆写
// 存储: config_kv 表
// ==========================================

pub mod brand_defaults;
pub mod calc_config_trait;
pub mod calc_params;
pub mod config_manager;

// 重导出核心配置类型
pub use brand_defaults::{BrandDefaults, BrandFactors};
pub use calc_config_trait::CalcConfigReader;
pub use calc_params::{CalcOverrides, CalcParams};
pub use config_manager::{config_keys, ConfigManager};
