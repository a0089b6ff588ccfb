// ==========================================
// 空压机节能改造 - 核心库
// ==========================================
// 职责: 空压机替换选型推荐 + 节能量计算
// 技术栈: Rust + SQLite（配置）
// 系统定位: 决策支持（推荐结果由人工确认）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 业务规则
pub mod engine;

// 导入层 - 外部表格
pub mod importer;

// 配置层 - 计算参数
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 计算接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{AirflowCaliber, Brand, ControlMode, SchemeKind};

// 领域实体
pub use domain::{
    CandidateUnit, EnergyResult, ExistingMachine, NamedScheme, SavingsRecord, SavingsReport,
    Scheme, SchemeEntry,
};

// 引擎
pub use engine::{
    CalculationReport, CandidateFilter, DemandAggregator, EnergyCalculator, EngineError,
    Recommendation, RecommendationOrchestrator, SavingsAggregator, SchemeGenerator,
    SchemeSelector,
};

// 配置
pub use config::{BrandDefaults, CalcConfigReader, CalcOverrides, CalcParams, ConfigManager};

// API
pub use api::{ApiError, CalculateApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "空压机节能改造计算";
