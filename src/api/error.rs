// ==========================================
// 空压机节能改造 - API层错误类型
// ==========================================
// 职责: 汇总引擎/导入/配置错误,转换为调用方可区分的错误
// 红线: 所有错误信息必须包含显式原因
// ==========================================

use crate::engine::error::EngineError;
use crate::importer::error::ImportError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    /// 无需计算（如无原有设备）
    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("计算失败: {0}")]
    Engine(EngineError),

    // ==========================================
    // 导入错误
    // ==========================================
    #[error("文件导入失败: {0}")]
    Import(#[from] ImportError),

    // ==========================================
    // 配置错误
    // ==========================================
    #[error("配置读取失败: {0}")]
    ConfigError(String),
}

// ==========================================
// 从 EngineError 转换
// 目的: “无客户机参与计算”不是引擎失败,单独归入 NotFound
// ==========================================
impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::EmptyInput => ApiError::NotFound(err.to_string()),
            other => ApiError::Engine(other),
        }
    }
}

impl ApiError {
    /// 错误代码（引擎错误沿用引擎代码）
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Engine(e) => e.code(),
            ApiError::Import(_) => "IMPORT_ERROR",
            ApiError::ConfigError(_) => "CONFIG_ERROR",
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_maps_to_not_found() {
        let err: ApiError = EngineError::EmptyInput.into();
        assert!(matches!(err, ApiError::NotFound(_)));
        assert_eq!(err.code(), "NOT_FOUND");
    }

    #[test]
    fn test_engine_error_keeps_reason() {
        let err: ApiError = EngineError::NoFeasibleScheme { target_airflow: 10.0 }.into();
        assert_eq!(err.code(), "NO_FEASIBLE_SCHEME");
        assert!(err.to_string().contains("无法生成满足气量要求的组合"));
    }

    #[test]
    fn test_import_error_converts() {
        let err: ApiError = ImportError::FileNotFound("machines.csv".to_string()).into();
        assert_eq!(err.code(), "IMPORT_ERROR");
        assert!(err.to_string().contains("machines.csv"));
    }
}
