// ==========================================
// 空压机节能改造 - 引擎层
// ==========================================
// 职责: 选型推荐与节能量计算的业务规则引擎
// 红线: 引擎无状态、不做 I/O,所有失败必须携带可读原因
// ==========================================

pub mod candidate_filter;
pub mod demand;
pub mod energy;
pub mod error;
pub mod orchestrator;
pub mod savings;
pub mod scheme_generator;
pub mod selector;

// 重导出核心引擎
pub use candidate_filter::{Candidate, CandidateFilter};
pub use demand::{Demand, DemandAggregator};
pub use energy::EnergyCalculator;
pub use error::{EngineError, EngineResult};
pub use orchestrator::{CalculationReport, RecommendationOrchestrator};
pub use savings::SavingsAggregator;
pub use scheme_generator::{GeneratorInput, SchemeGenerator};
pub use selector::{Recommendation, SchemeSelector};
