// ==========================================
// 空压机节能改造 - 引擎层错误类型
// ==========================================
// 职责: 单次计算请求内的显式失败信号
// 红线: 所有错误必须携带可读原因,不得静默降级
// ==========================================

use thiserror::Error;

/// 引擎层错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// 无客户机参与计算（需求为零,调用方视为“无需计算”）
    #[error("无客户机参与计算")]
    EmptyInput,

    /// 无满足压力要求的供应商机型
    #[error("无满足压力要求（>={target_pressure} MPa）的供应商机型")]
    NoFeasibleCandidates { target_pressure: f64 },

    /// 有候选机型但无法凑满需求气量
    #[error("无法生成满足气量要求的组合（需求气量 {target_airflow} m³/min）")]
    NoFeasibleScheme { target_airflow: f64 },

    /// 前置条件违反（如工频机运行时间为 0）
    #[error("前置条件违反: 设备编号={machine_no}, {reason}")]
    PreconditionViolation { machine_no: i64, reason: String },

    /// 原有设备与选型设备数量不一致
    #[error("原有设备与选型设备数量须一致: 原有 {machines} 台, 选型 {replacements} 台")]
    LengthMismatch { machines: usize, replacements: usize },

    /// 输入记录不满足不变量
    #[error("无效输入: {0}")]
    InvalidInput(String),
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    /// 错误代码（供上层汇总/展示）
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::EmptyInput => "EMPTY_INPUT",
            EngineError::NoFeasibleCandidates { .. } => "NO_FEASIBLE_CANDIDATES",
            EngineError::NoFeasibleScheme { .. } => "NO_FEASIBLE_SCHEME",
            EngineError::PreconditionViolation { .. } => "PRECONDITION_VIOLATION",
            EngineError::LengthMismatch { .. } => "LENGTH_MISMATCH",
            EngineError::InvalidInput(_) => "INVALID_INPUT",
        }
    }

    /// 是否为“无需计算”（而非引擎失败）
    pub fn is_empty_input(&self) -> bool {
        matches!(self, EngineError::EmptyInput)
    }
}
