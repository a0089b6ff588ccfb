// ==========================================
// 空压机节能改造 - 配置管理器
// ==========================================
// 职责: 计算参数加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::brand_defaults::{BrandDefaults, BrandFactors};
use crate::config::calc_config_trait::CalcConfigReader;
use crate::config::calc_params::{
    CalcParams, DEFAULT_ANNUAL_RUNNING_HOURS, DEFAULT_EMPTY_WASTE_RATIO, DEFAULT_MARGIN_RATIO,
    DEFAULT_MAX_RECOMMEND_UNITS, DEFAULT_PRESSURE_DROP_RATIO, DEFAULT_TWO_SAME_OVERAGE_RATIO,
};
use crate::db::{ensure_config_schema, open_sqlite_connection};
use crate::domain::types::Brand;
use async_trait::async_trait;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::{BTreeMap, HashMap};
use std::error::Error;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例（自动建表）
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;
        ensure_config_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
            ensure_config_schema(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 读取 global scope 的配置值
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        self.get_config_value(key)
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    /// 获取所有配置的快照（JSON格式）
    ///
    /// # 用途
    /// - 随计算结果一并交给报表组件,说明本次计算所用参数
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let mut config_map: HashMap<String, String> = HashMap::new();
        let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&json!(config_map))?)
    }

    /// 读取可解析配置项; 缺失取默认值,格式错误告警后取默认值
    fn get_parsed_or_default<T>(&self, key: &str, default: T) -> Result<T, Box<dyn Error>>
    where
        T: FromStr + Copy,
    {
        match self.get_config_value(key)? {
            None => Ok(default),
            Some(raw) => match raw.trim().parse::<T>() {
                Ok(value) => Ok(value),
                Err(_) => {
                    tracing::warn!(config_key = key, raw_value = %raw, "配置值格式错误，使用默认值");
                    Ok(default)
                }
            },
        }
    }

    /// 读取可选覆写项（空串视为未设置）
    fn get_optional_f64(&self, key: &str) -> Result<Option<f64>, Box<dyn Error>> {
        match self.get_config_value(key)? {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => match raw.trim().parse::<f64>() {
                Ok(value) => Ok(Some(value)),
                Err(_) => {
                    tracing::warn!(config_key = key, raw_value = %raw, "配置值格式错误，忽略覆写");
                    Ok(None)
                }
            },
        }
    }
}

// ==========================================
// CalcConfigReader Trait 实现
// ==========================================
#[async_trait]
impl CalcConfigReader for ConfigManager {
    async fn get_calc_params(&self) -> Result<CalcParams, Box<dyn Error>> {
        let use_actual_flow = match self.get_config_value(config_keys::USE_ACTUAL_FLOW)? {
            None => true,
            Some(raw) => !matches!(
                raw.trim().to_lowercase().as_str(),
                "0" | "false" | "no" | "n" | "off" | "rated"
            ),
        };

        let params = CalcParams {
            service_coefficient: self.get_optional_f64(config_keys::SERVICE_COEFFICIENT)?,
            loading_ratio: self.get_optional_f64(config_keys::LOADING_RATIO)?,
            empty_waste_ratio: self
                .get_parsed_or_default(config_keys::EMPTY_WASTE_RATIO, DEFAULT_EMPTY_WASTE_RATIO)?,
            pressure_drop_ratio: self.get_parsed_or_default(
                config_keys::PRESSURE_DROP_RATIO,
                DEFAULT_PRESSURE_DROP_RATIO,
            )?,
            margin_ratio: self.get_parsed_or_default(config_keys::MARGIN_RATIO, DEFAULT_MARGIN_RATIO)?,
            use_actual_flow,
            annual_running_hours: self.get_parsed_or_default(
                config_keys::ANNUAL_RUNNING_HOURS,
                DEFAULT_ANNUAL_RUNNING_HOURS,
            )?,
            max_recommend_units: self.get_parsed_or_default(
                config_keys::MAX_RECOMMEND_UNITS,
                DEFAULT_MAX_RECOMMEND_UNITS,
            )?,
            two_same_overage_ratio: self.get_parsed_or_default(
                config_keys::TWO_SAME_OVERAGE_RATIO,
                DEFAULT_TWO_SAME_OVERAGE_RATIO,
            )?,
        };

        if let Err(reason) = params.check() {
            tracing::warn!(reason = %reason, "计算参数配置非法，使用默认参数");
            return Ok(CalcParams::default());
        }

        Ok(params)
    }

    /// 品牌系数覆写格式: {"fusheng": {"service_coefficient": 1.3, "loading_ratio": 0.9}}
    async fn get_brand_defaults(&self) -> Result<BrandDefaults, Box<dyn Error>> {
        let mut table = BrandDefaults::standard();
        let raw = match self.get_config_value(config_keys::BRAND_DEFAULTS)? {
            Some(v) => v,
            None => return Ok(table),
        };

        match serde_json::from_str::<BTreeMap<Brand, BrandFactors>>(&raw) {
            Ok(overrides) => {
                for (brand, factors) in overrides {
                    table = table.with_factors(brand, factors);
                }
            }
            Err(e) => {
                tracing::warn!(
                    config_key = config_keys::BRAND_DEFAULTS,
                    raw_value = %raw,
                    error = %e,
                    "品牌系数配置格式错误，使用标准默认表"
                );
            }
        }
        Ok(table)
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 能耗计算
    pub const SERVICE_COEFFICIENT: &str = "service_coefficient";
    pub const LOADING_RATIO: &str = "loading_ratio";
    pub const EMPTY_WASTE_RATIO: &str = "empty_waste_ratio";
    pub const PRESSURE_DROP_RATIO: &str = "pressure_drop_ratio";
    pub const BRAND_DEFAULTS: &str = "brand_defaults"; // 品牌系数覆写 (JSON)

    // 选型推荐
    pub const MARGIN_RATIO: &str = "margin_ratio";
    pub const USE_ACTUAL_FLOW: &str = "use_actual_flow";
    pub const MAX_RECOMMEND_UNITS: &str = "max_recommend_units";
    pub const TWO_SAME_OVERAGE_RATIO: &str = "two_same_overage_ratio";

    // 节能量
    pub const ANNUAL_RUNNING_HOURS: &str = "annual_running_hours";
}
