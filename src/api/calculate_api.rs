// ==========================================
// 空压机节能改造 - 计算 API
// ==========================================
// 职责: 供外部编排层调用的计算入口
// - recommend:       原有设备 + 供应商目录 → 推荐方案 (+ 节能量)
// - run_with_params: 原有设备 + 已确认的选型设备 → 节能量
// - evaluate_pair:   单台原有设备 vs 单台选型设备
// 说明: 不做文件导出与持久化,结果交由报表组件处理
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::{BrandDefaults, CalcConfigReader, CalcOverrides, CalcParams};
use crate::domain::energy::{SavingsRecord, SavingsReport};
use crate::domain::machine::{CandidateUnit, ExistingMachine};
use crate::domain::scheme::{NamedScheme, SchemeLine};
use crate::engine::RecommendationOrchestrator;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// 公司名缺省值
pub const DEFAULT_COMPANY_NAME: &str = "未命名";

// ==========================================
// 请求 / 响应 DTO
// ==========================================

/// 选型推荐请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendRequest {
    #[serde(default)]
    pub company_name: Option<String>,
    pub machines: Vec<ExistingMachine>,
    pub suppliers: Vec<CandidateUnit>,
    #[serde(default)]
    pub overrides: CalcOverrides,
    /// 仅出方案,不计算节能量
    #[serde(default)]
    pub schemes_only: bool,
}

/// 选型推荐响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendResponse {
    pub calculation_id: String,
    pub generated_at: DateTime<Utc>,
    pub company_name: String,
    pub target_airflow: f64,
    pub target_pressure: f64,
    /// 与原有设备一一对应的推荐机型
    pub recommended_units: Vec<CandidateUnit>,
    pub primary_scheme: Vec<SchemeLine>,
    pub schemes_all: Vec<NamedScheme>,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub savings: Option<SavingsReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_year_savings_kwh: Option<i64>,
    /// 本次计算实际使用的参数
    pub params: CalcParams,
}

/// 按确认参数计算请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunWithParamsRequest {
    #[serde(default)]
    pub company_name: Option<String>,
    pub machines: Vec<ExistingMachine>,
    /// 与原有设备一一对应的选型设备
    pub new_eq: Vec<CandidateUnit>,
    #[serde(default)]
    pub overrides: CalcOverrides,
    /// 电价（元/kWh）,提供且非负时折算节电费用
    #[serde(default)]
    pub electricity_price: Option<f64>,
}

/// 按确认参数计算响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunWithParamsResponse {
    pub calculation_id: String,
    pub generated_at: DateTime<Utc>,
    pub company_name: String,
    pub savings: SavingsReport,
    pub all_year_savings_kwh: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub energy_savings_cost: Option<f64>,
    pub params: CalcParams,
}

/// 单台对比请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluatePairRequest {
    pub machine: ExistingMachine,
    pub replacement: CandidateUnit,
    #[serde(default)]
    pub overrides: CalcOverrides,
}

// ==========================================
// CalculateApi - 计算 API
// ==========================================
pub struct CalculateApi<C>
where
    C: CalcConfigReader,
{
    config: Arc<C>,
    orchestrator: RecommendationOrchestrator,
}

impl<C> CalculateApi<C>
where
    C: CalcConfigReader,
{
    /// 创建新的 CalculateApi 实例
    ///
    /// # 参数
    /// - config: 配置读取器
    pub fn new(config: Arc<C>) -> Self {
        Self {
            config,
            orchestrator: RecommendationOrchestrator::new(),
        }
    }

    /// 选型推荐（schemes_only=false 时附带节能量）
    ///
    /// # 返回
    /// - Err(ApiError::NotFound): 无原有设备
    /// - Err(ApiError::Engine): 无满足压力要求的机型 / 无可行组合 / 前置条件违反
    pub async fn recommend(&self, request: RecommendRequest) -> ApiResult<RecommendResponse> {
        let company_name = sanitize_company_name(request.company_name.as_deref());
        let (params, brand_defaults) = self.load_params(&request.overrides).await?;

        for unit in &request.suppliers {
            unit.validate()?;
        }

        info!(
            company_name = %company_name,
            machines = request.machines.len(),
            suppliers = request.suppliers.len(),
            schemes_only = request.schemes_only,
            "收到选型推荐请求"
        );

        let report = self.orchestrator.run(
            &request.machines,
            &request.suppliers,
            &params,
            &brand_defaults,
            request.schemes_only,
        )?;

        let recommendation = report.recommendation;
        Ok(RecommendResponse {
            calculation_id: report.calculation_id,
            generated_at: report.generated_at,
            company_name,
            target_airflow: recommendation.target_airflow,
            target_pressure: recommendation.target_pressure,
            recommended_units: recommendation.recommended_units,
            primary_scheme: recommendation.primary.lines(),
            schemes_all: recommendation.schemes_all,
            summary: recommendation.summary,
            all_year_savings_kwh: report.savings.as_ref().map(|s| s.all_year_savings_kwh),
            savings: report.savings,
            params,
        })
    }

    /// 按确认的选型设备计算节能量
    pub async fn run_with_params(
        &self,
        request: RunWithParamsRequest,
    ) -> ApiResult<RunWithParamsResponse> {
        let company_name = sanitize_company_name(request.company_name.as_deref());
        if request.machines.len() != request.new_eq.len() {
            return Err(ApiError::InvalidInput(format!(
                "原有设备与选型设备数量须一致: 原有 {} 台, 选型 {} 台",
                request.machines.len(),
                request.new_eq.len()
            )));
        }
        for unit in &request.new_eq {
            unit.validate()?;
        }
        for machine in &request.machines {
            machine.validate()?;
        }

        let (params, brand_defaults) = self.load_params(&request.overrides).await?;
        let calculation_id = Uuid::new_v4().to_string();
        info!(
            calculation_id = %calculation_id,
            company_name = %company_name,
            machines = request.machines.len(),
            "按确认参数计算节能量"
        );

        let savings = self.orchestrator.calculate_savings(
            &request.machines,
            &request.new_eq,
            &params,
            &brand_defaults,
        )?;
        let energy_savings_cost = request
            .electricity_price
            .and_then(|price| savings.savings_cost(price));

        Ok(RunWithParamsResponse {
            calculation_id,
            generated_at: Utc::now(),
            company_name,
            all_year_savings_kwh: savings.all_year_savings_kwh,
            savings,
            energy_savings_cost,
            params,
        })
    }

    /// 单台原有设备与单台选型设备对比
    pub async fn evaluate_pair(&self, request: EvaluatePairRequest) -> ApiResult<SavingsRecord> {
        request.machine.validate()?;
        request.replacement.validate()?;
        let (params, brand_defaults) = self.load_params(&request.overrides).await?;

        let report = self.orchestrator.calculate_savings(
            std::slice::from_ref(&request.machine),
            std::slice::from_ref(&request.replacement),
            &params,
            &brand_defaults,
        )?;
        report
            .records
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::InvalidInput("对比结果为空".to_string()))
    }

    /// 读取配置参数并叠加本次请求的覆写
    async fn load_params(&self, overrides: &CalcOverrides) -> ApiResult<(CalcParams, BrandDefaults)> {
        let base = self
            .config
            .get_calc_params()
            .await
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;
        let brand_defaults = self
            .config
            .get_brand_defaults()
            .await
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;

        let params = overrides.apply(&base);
        if let Err(reason) = params.check() {
            warn!(reason = %reason, "请求参数非法");
            return Err(ApiError::InvalidInput(reason));
        }
        Ok((params, brand_defaults))
    }
}

/// 公司名清洗: 去除文件名非法字符与首尾空白,空名记为“未命名”
pub fn sanitize_company_name(name: Option<&str>) -> String {
    let cleaned: String = name
        .unwrap_or("")
        .chars()
        .filter(|c| !matches!(c, '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|'))
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        DEFAULT_COMPANY_NAME.to_string()
    } else {
        cleaned.to_string()
    }
}
