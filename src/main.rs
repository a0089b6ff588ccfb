// ==========================================
// 空压机节能改造 - 命令行入口
// ==========================================
// 用法:
//   aircomp-savings <设备清单.csv|xlsx> <供应商目录.csv|xlsx>
//                   [--db <配置库>] [--rated] [--schemes-only] [--company <公司名>] [--json-log]
// 输出: 推荐方案与节能量 JSON（stdout）,日志输出到 stderr
// ==========================================

use aircomp_savings::api::{CalculateApi, RecommendRequest};
use aircomp_savings::config::{CalcOverrides, ConfigManager};
use aircomp_savings::db::default_db_path;
use aircomp_savings::importer::TableImporter;
use aircomp_savings::{logging, APP_NAME, VERSION};
use anyhow::{anyhow, Context};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

/// 命令行参数
#[derive(Debug, Parser)]
#[command(name = "aircomp-savings", version, about = "空压机节能改造 - 选型推荐与节能量计算")]
struct CliArgs {
    /// 客户原有设备清单（.csv/.xlsx/.xls）
    machines_path: PathBuf,

    /// 供应商机型目录（.csv/.xlsx/.xls）
    catalogue_path: PathBuf,

    /// 配置库路径（缺省为用户数据目录）
    #[arg(long = "db")]
    db_path: Option<String>,

    /// 按额定气量汇总需求
    #[arg(long)]
    rated: bool,

    /// 仅出方案,不计算节能量
    #[arg(long)]
    schemes_only: bool,

    /// 公司名
    #[arg(long = "company")]
    company_name: Option<String>,

    /// 日志输出为 JSON
    #[arg(long)]
    json_log: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    if args.json_log {
        logging::init_json();
    } else {
        logging::init();
    }
    tracing::info!("{} v{}", APP_NAME, VERSION);

    let db_path = args.db_path.unwrap_or_else(default_db_path);
    tracing::info!("使用配置库: {}", db_path);
    let config = ConfigManager::new(&db_path)
        .map_err(|e| anyhow!("打开配置库失败 {}: {}", db_path, e))?;

    let importer = TableImporter::new();
    let machines = importer
        .import_machines(&args.machines_path)
        .with_context(|| format!("导入设备清单失败: {}", args.machines_path.display()))?;
    let suppliers = importer
        .import_catalogue(&args.catalogue_path)
        .with_context(|| format!("导入供应商目录失败: {}", args.catalogue_path.display()))?;

    let overrides = CalcOverrides {
        use_actual_flow: args.rated.then_some(false),
        ..Default::default()
    };

    let api = CalculateApi::new(Arc::new(config));
    let response = api
        .recommend(RecommendRequest {
            company_name: args.company_name,
            machines,
            suppliers,
            overrides,
            schemes_only: args.schemes_only,
        })
        .await
        .context("选型计算失败")?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_args() {
        let args = CliArgs::try_parse_from([
            "aircomp-savings",
            "machines.csv",
            "catalogue.xlsx",
            "--db",
            "cfg.db",
            "--rated",
            "--schemes-only",
            "--company",
            "测试厂",
            "--json-log",
        ])
        .unwrap();
        assert_eq!(args.machines_path, PathBuf::from("machines.csv"));
        assert_eq!(args.catalogue_path, PathBuf::from("catalogue.xlsx"));
        assert_eq!(args.db_path.as_deref(), Some("cfg.db"));
        assert!(args.rated);
        assert!(args.schemes_only);
        assert_eq!(args.company_name.as_deref(), Some("测试厂"));
        assert!(args.json_log);
    }

    #[test]
    fn test_parse_defaults_and_errors() {
        let args = CliArgs::try_parse_from(["aircomp-savings", "a.csv", "b.csv"]).unwrap();
        assert!(args.db_path.is_none());
        assert!(!args.rated);
        assert!(!args.schemes_only);
        assert!(!args.json_log);

        assert!(CliArgs::try_parse_from(["aircomp-savings", "a.csv"]).is_err());
        assert!(CliArgs::try_parse_from(["aircomp-savings", "a.csv", "b.csv", "--unknown"]).is_err());
    }
}
