// ==========================================
// CalculateApi 集成测试
// ==========================================
// 测试目标: 配置读取 + 请求覆写 + 引擎编排 + 错误映射
// ==========================================


use aircomp_savings::api::{
    ApiError, CalculateApi, EvaluatePairRequest, RecommendRequest, RunWithParamsRequest,
};
use aircomp_savings::config::{
    BrandDefaults, CalcConfigReader, CalcOverrides, CalcParams, ConfigManager,
};
use aircomp_savings::domain::SchemeKind;
use aircomp_savings::logging;
use async_trait::async_trait;
use std::error::Error;
use std::sync::Arc;
use test_helpers::{
    create_test_db, fixed_machine, insert_test_config, open_test_connection, supplier_unit,
    variable_machine, MockCalcConfig,
};

fn mock_api() -> CalculateApi<MockCalcConfig> {
    logging::init_test();
    CalculateApi::new(Arc::new(MockCalcConfig::default()))
}

/// 配置库不可读
struct BrokenCalcConfig;

#[async_trait]
impl CalcConfigReader for BrokenCalcConfig {
    async fn get_calc_params(&self) -> Result<CalcParams, Box<dyn Error>> {
        Err("config_kv 表不存在".into())
    }

    async fn get_brand_defaults(&self) -> Result<BrandDefaults, Box<dyn Error>> {
        Ok(BrandDefaults::standard())
    }
}

fn recommend_request() -> RecommendRequest {
    RecommendRequest {
        company_name: Some("  某某/机械厂 ".to_string()),
        machines: vec![
            fixed_machine(1, 37.0, 6.5, 8000, 8000),
            fixed_machine(2, 22.0, 4.0, 8000, 8000),
        ],
        suppliers: vec![
            supplier_unit("S6", 37.0, 6.0, 0.8, 6.0),
            supplier_unit("S5", 30.0, 5.0, 0.8, 6.2),
            supplier_unit("S3", 22.0, 3.0, 0.8, 6.5),
        ],
        overrides: CalcOverrides::default(),
        schemes_only: false,
    }
}

// ==========================================
// recommend
// ==========================================

#[tokio::test]
async fn test_recommend_with_savings() {
    let response = mock_api().recommend(recommend_request()).await.unwrap();

    assert_eq!(response.company_name, "某某机械厂");
    assert_eq!(response.target_airflow, 10.5);
    assert_eq!(response.recommended_units.len(), 2);
    assert_eq!(response.schemes_all[0].kind, SchemeKind::FlowMatch);
    assert_eq!(response.primary_scheme.len(), 2);
    assert_eq!(response.primary_scheme[0].model, "S6");

    let savings = response.savings.as_ref().unwrap();
    assert_eq!(savings.records.len(), 2);
    assert_eq!(response.all_year_savings_kwh, Some(savings.all_year_savings_kwh));
    assert!(!response.calculation_id.is_empty());
}

#[tokio::test]
async fn test_recommend_schemes_only() {
    let request = RecommendRequest {
        schemes_only: true,
        company_name: None,
        ..recommend_request()
    };
    let response = mock_api().recommend(request).await.unwrap();

    assert_eq!(response.company_name, "未命名");
    assert!(response.savings.is_none());
    assert!(response.all_year_savings_kwh.is_none());

    let json = serde_json::to_value(&response).unwrap();
    assert!(json.get("savings").is_none());
}

#[tokio::test]
async fn test_recommend_rated_caliber_override() {
    let mut request = recommend_request();
    request.machines = vec![
        fixed_machine(1, 37.0, 6.5, 8000, 4000),
        fixed_machine(2, 22.0, 4.0, 8000, 4000),
    ];
    request.overrides.use_actual_flow = Some(false);

    let response = mock_api().recommend(request).await.unwrap();
    // 额定口径: 6.5 + 4.0
    assert_eq!(response.target_airflow, 10.5);
    assert!(!response.params.use_actual_flow);
}

#[tokio::test]
async fn test_recommend_empty_machines_is_not_found() {
    let request = RecommendRequest {
        machines: vec![],
        ..recommend_request()
    };
    let err = mock_api().recommend(request).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
async fn test_recommend_no_feasible_candidates() {
    let request = RecommendRequest {
        suppliers: vec![supplier_unit("LOW", 37.0, 6.0, 0.6, 6.0)],
        ..recommend_request()
    };
    let err = mock_api().recommend(request).await.unwrap_err();
    assert_eq!(err.code(), "NO_FEASIBLE_CANDIDATES");
}

#[tokio::test]
async fn test_recommend_invalid_override_rejected() {
    let mut request = recommend_request();
    request.overrides.max_units = Some(0);
    let err = mock_api().recommend(request).await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
}

#[tokio::test]
async fn test_recommend_config_read_failure() {
    let api = CalculateApi::new(Arc::new(BrokenCalcConfig));
    let err = api.recommend(recommend_request()).await.unwrap_err();
    assert!(matches!(err, ApiError::ConfigError(_)));
    assert_eq!(err.code(), "CONFIG_ERROR");
    assert!(err.to_string().contains("config_kv 表不存在"));
}

// ==========================================
// run_with_params
// ==========================================

#[tokio::test]
async fn test_run_with_params_and_electricity_price() {
    let request = RunWithParamsRequest {
        company_name: Some("测试厂".to_string()),
        machines: vec![fixed_machine(1, 100.0, 10.0, 8000, 6000)],
        new_eq: vec![supplier_unit("N75", 75.0, 10.0, 0.8, 6.5)],
        overrides: CalcOverrides::default(),
        electricity_price: Some(0.8),
    };
    let response = mock_api().run_with_params(request).await.unwrap();

    assert_eq!(response.all_year_savings_kwh, 412800);
    assert_eq!(response.energy_savings_cost, Some(330240.0));
    assert_eq!(response.savings.records[0].saving_portion_pct, 51.42);
}

#[tokio::test]
async fn test_run_with_params_length_mismatch() {
    let request = RunWithParamsRequest {
        company_name: None,
        machines: vec![
            fixed_machine(1, 100.0, 10.0, 8000, 6000),
            variable_machine(2, "复盛", 37.0, 6.2),
        ],
        new_eq: vec![supplier_unit("N75", 75.0, 10.0, 0.8, 6.5)],
        overrides: CalcOverrides::default(),
        electricity_price: None,
    };
    let err = mock_api().run_with_params(request).await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
}

#[tokio::test]
async fn test_run_with_params_negative_price_skips_cost() {
    let request = RunWithParamsRequest {
        company_name: None,
        machines: vec![fixed_machine(1, 100.0, 10.0, 8000, 6000)],
        new_eq: vec![supplier_unit("N75", 75.0, 10.0, 0.8, 6.5)],
        overrides: CalcOverrides::default(),
        electricity_price: Some(-1.0),
    };
    let response = mock_api().run_with_params(request).await.unwrap();
    assert!(response.energy_savings_cost.is_none());
}

// ==========================================
// evaluate_pair
// ==========================================

#[tokio::test]
async fn test_evaluate_pair_with_running_hours_override() {
    let request = EvaluatePairRequest {
        machine: fixed_machine(1, 100.0, 10.0, 8000, 6000),
        replacement: supplier_unit("N75", 75.0, 10.0, 0.8, 6.5),
        overrides: CalcOverrides {
            running_hours_per_year: Some(6000),
            ..Default::default()
        },
    };
    let record = mock_api().evaluate_pair(request).await.unwrap();

    assert_eq!(record.existing.energy_con, 13.38);
    assert_eq!(record.saving_kw_per_m3, 6.88);
    assert_eq!(record.saving_per_hour_kw, 51.6);
    assert_eq!(record.saving_per_year_kwh, 309600);
    assert_eq!(record.all_year_savings_kwh, 309600);
}

#[tokio::test]
async fn test_evaluate_pair_zero_running_hours() {
    let request = EvaluatePairRequest {
        machine: fixed_machine(9, 100.0, 10.0, 0, 0),
        replacement: supplier_unit("N75", 75.0, 10.0, 0.8, 6.5),
        overrides: CalcOverrides::default(),
    };
    let err = mock_api().evaluate_pair(request).await.unwrap_err();
    assert_eq!(err.code(), "PRECONDITION_VIOLATION");
}

// ==========================================
// 使用 SQLite 配置库
// ==========================================

#[tokio::test]
async fn test_api_reads_config_from_database() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let conn = open_test_connection(&db_path).unwrap();
    insert_test_config(&conn).unwrap();
    drop(conn);

    let api = CalculateApi::new(Arc::new(ConfigManager::new(&db_path).unwrap()));
    let request = RunWithParamsRequest {
        company_name: None,
        machines: vec![fixed_machine(1, 100.0, 10.0, 8000, 6000)],
        new_eq: vec![supplier_unit("N75", 75.0, 10.0, 0.8, 6.5)],
        overrides: CalcOverrides::default(),
        electricity_price: None,
    };
    let response = api.run_with_params(request).await.unwrap();

    assert_eq!(response.params.annual_running_hours, 6000);
    assert_eq!(response.params.service_coefficient, Some(1.25));
    assert_ne!(response.params, CalcParams::default());
}
