// ==========================================
// ConfigManager 集成测试
// ==========================================
// 测试目标: config_kv 读写、默认值、格式错误回退、品牌系数覆写
// ==========================================


use aircomp_savings::config::{config_keys, CalcConfigReader, CalcParams, ConfigManager};
use aircomp_savings::domain::Brand;
use test_helpers::{create_test_db, insert_test_config, open_test_connection};

#[tokio::test]
async fn test_empty_db_uses_defaults() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let manager = ConfigManager::new(&db_path).unwrap();

    let params = manager.get_calc_params().await.unwrap();
    assert_eq!(params, CalcParams::default());
    assert!(params.use_actual_flow);
    assert_eq!(params.annual_running_hours, 8000);
    assert_eq!(params.max_recommend_units, 6);
}

#[tokio::test]
async fn test_stored_values_are_read() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let conn = open_test_connection(&db_path).unwrap();
    insert_test_config(&conn).unwrap();
    drop(conn);

    let manager = ConfigManager::new(&db_path).unwrap();
    let params = manager.get_calc_params().await.unwrap();

    assert_eq!(params.empty_waste_ratio, 0.35);
    assert_eq!(params.pressure_drop_ratio, 0.08);
    assert_eq!(params.annual_running_hours, 6000);
    assert_eq!(params.max_recommend_units, 4);
    assert!(!params.use_actual_flow);
    assert_eq!(params.service_coefficient, Some(1.25));
    assert_eq!(params.loading_ratio, None);
}

#[tokio::test]
async fn test_malformed_value_falls_back_to_default() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let manager = ConfigManager::new(&db_path).unwrap();

    manager
        .set_global_config_value(config_keys::PRESSURE_DROP_RATIO, "abc")
        .unwrap();
    manager
        .set_global_config_value(config_keys::ANNUAL_RUNNING_HOURS, "7200")
        .unwrap();

    let params = manager.get_calc_params().await.unwrap();
    assert_eq!(params.pressure_drop_ratio, 0.07);
    assert_eq!(params.annual_running_hours, 7200);
}

#[tokio::test]
async fn test_invalid_parameter_set_reverts_to_defaults() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let manager = ConfigManager::new(&db_path).unwrap();

    manager
        .set_global_config_value(config_keys::ANNUAL_RUNNING_HOURS, "6000")
        .unwrap();
    manager
        .set_global_config_value(config_keys::EMPTY_WASTE_RATIO, "-0.4")
        .unwrap();

    let params = manager.get_calc_params().await.unwrap();
    assert_eq!(params, CalcParams::default());
}

#[tokio::test]
async fn test_set_value_overwrites_existing() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let manager = ConfigManager::new(&db_path).unwrap();

    manager
        .set_global_config_value(config_keys::MAX_RECOMMEND_UNITS, "3")
        .unwrap();
    manager
        .set_global_config_value(config_keys::MAX_RECOMMEND_UNITS, "5")
        .unwrap();

    assert_eq!(
        manager
            .get_global_config_value(config_keys::MAX_RECOMMEND_UNITS)
            .unwrap(),
        Some("5".to_string())
    );
    assert_eq!(manager.get_calc_params().await.unwrap().max_recommend_units, 5);
}

#[tokio::test]
async fn test_brand_defaults_override() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let manager = ConfigManager::new(&db_path).unwrap();

    manager
        .set_global_config_value(
            config_keys::BRAND_DEFAULTS,
            r#"{"fusheng": {"service_coefficient": 1.4, "loading_ratio": 0.85}}"#,
        )
        .unwrap();

    let table = manager.get_brand_defaults().await.unwrap();
    assert_eq!(table.service_coefficient(Brand::Fusheng, None), 1.4);
    assert_eq!(table.loading_ratio(Brand::Fusheng, None), 0.85);
    // 未覆写的品牌保持标准值
    assert_eq!(table.service_coefficient(Brand::AtlasCopco, None), 1.15);
    assert_eq!(table.service_coefficient(Brand::Other, None), 1.2);
}

#[tokio::test]
async fn test_malformed_brand_defaults_use_standard_table() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let manager = ConfigManager::new(&db_path).unwrap();

    manager
        .set_global_config_value(config_keys::BRAND_DEFAULTS, "not json")
        .unwrap();

    let table = manager.get_brand_defaults().await.unwrap();
    assert_eq!(table.service_coefficient(Brand::Fusheng, None), 1.3);
    assert_eq!(table.loading_ratio(Brand::Fusheng, None), 0.9);
}

#[tokio::test]
async fn test_config_snapshot() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let conn = open_test_connection(&db_path).unwrap();
    insert_test_config(&conn).unwrap();
    drop(conn);

    let manager = ConfigManager::new(&db_path).unwrap();
    let snapshot = manager.get_config_snapshot().unwrap();
    let value: serde_json::Value = serde_json::from_str(&snapshot).unwrap();

    assert_eq!(value["annual_running_hours"], "6000");
    assert_eq!(value["use_actual_flow"], "false");
    assert_eq!(value.as_object().unwrap().len(), 6);
}
