// ==========================================
// 生物废弃物绩效指标 - 命令行入口
// ==========================================
// 用法: biowaste-metrics [看板] [周期] [市镇]
//   看板: ceo | cfo | councillor | operational | bee2waste | all | dataset
//   周期: last_6_months | ytd | last_12_months | all（默认 ytd）
// 环境变量:
//   BIOWASTE_DATASET_PATH  数据集 JSON（缺省使用内置生成器）
//   BIOWASTE_CONFIG_PATH   模型参数 JSON（缺省使用默认参数）
// ==========================================

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use serde::Serialize;

use biowaste_metrics::config::ConfigManager;
use biowaste_metrics::domain::Dataset;
use biowaste_metrics::engine::SeededRandom;
use biowaste_metrics::generator::generate_default;
use biowaste_metrics::{logging, DashboardApi};

const DATASET_PATH_ENV: &str = "BIOWASTE_DATASET_PATH";

fn main() -> Result<()> {
    logging::init();

    let mut args = std::env::args().skip(1);
    let dashboard = args.next().unwrap_or_else(|| "all".to_string());
    let period = args.next().unwrap_or_else(|| "ytd".to_string());
    let municipality = args.next();

    tracing::info!("==================================================");
    tracing::info!("{} v{}", biowaste_metrics::APP_NAME, biowaste_metrics::VERSION);
    tracing::info!("==================================================");

    let config = ConfigManager::from_env().context("加载模型参数失败")?;
    let dataset = load_dataset()?;
    tracing::info!(
        municipalities = dataset.municipalities.len(),
        parish_records = dataset.monthly_parish.len(),
        "数据集就绪"
    );

    let api = DashboardApi::with_config(Arc::new(dataset), &config);
    let municipality = municipality.as_deref();

    match dashboard.as_str() {
        "ceo" => print_json(&api.ceo(municipality, &period)?),
        "cfo" => print_json(&api.cfo(municipality, &period)?),
        "councillor" => print_json(&api.councillor(municipality, &period)?),
        "bee2waste" => print_json(&api.bee2waste(municipality, &period)?),
        "operational" => {
            let mut rng = SeededRandom::default();
            print_json(&api.operational(municipality, operational_date(&api), None, &mut rng)?)
        }
        "dataset" => print_json(api.dataset()),
        "all" => {
            let mut rng = SeededRandom::default();
            print_json(&serde_json::json!({
                "ceo": api.ceo(municipality, &period)?,
                "cfo": api.cfo(municipality, &period)?,
                "councillor": api.councillor(municipality, &period)?,
                "operational": api.operational(municipality, operational_date(&api), None, &mut rng)?,
                "bee2waste": api.bee2waste(municipality, &period)?,
            }))
        }
        other => bail!("未知的看板: {}", other),
    }
}

fn load_dataset() -> Result<Dataset> {
    match std::env::var(DATASET_PATH_ENV) {
        Ok(path) if !path.trim().is_empty() => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("读取数据集失败: {}", path))?;
            Dataset::from_json_str(&raw).with_context(|| format!("解析数据集失败: {}", path))
        }
        _ => Ok(generate_default()),
    }
}

/// 运营看板日期：数据集最新月份的 15 日，缺省为今天
fn operational_date(api: &DashboardApi) -> NaiveDate {
    api.available_months()
        .last()
        .and_then(|m| NaiveDate::parse_from_str(&format!("{}-15", m), "%Y-%m-%d").ok())
        .unwrap_or_else(|| Local::now().date_naive())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
