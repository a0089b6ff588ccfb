// ==========================================
// 空压机节能改造 - API 层
// ==========================================
// 职责: 提供计算接口,供外部编排层调用
// ==========================================

pub mod calculate_api;
pub mod error;

// 重导出核心类型
pub use calculate_api::{
    sanitize_company_name, CalculateApi, EvaluatePairRequest, RecommendRequest,
    RecommendResponse, RunWithParamsRequest, RunWithParamsResponse,
};
pub use error::{ApiError, ApiResult};
