// ==========================================
// 空压机节能改造 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod energy;
pub mod machine;
pub mod numeric;
pub mod scheme;
pub mod types;

// 重导出核心类型
pub use energy::{EnergyResult, SavingsRecord, SavingsReport, UnitEnergy};
pub use machine::{CandidateUnit, ExistingMachine, DEFAULT_PRESSURE_MPA};
pub use scheme::{NamedScheme, Scheme, SchemeEntry, SchemeLine, SchemeSignature};
pub use types::{AirflowCaliber, Brand, ControlMode, SchemeKind};
