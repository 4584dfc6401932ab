// ==========================================
// DashboardApi 集成测试
// ==========================================
// 测试范围:
// 1. 输入校验: 周期口令、市镇 ID
// 2. JSON 数据集加载、序列化输出
// 3. 共享数据集的并发只读访问
// ==========================================

mod helpers;

use std::sync::Arc;
use std::thread;

use biowaste_metrics::config::ModelParameters;
use biowaste_metrics::{ApiError, DashboardApi};
use helpers::dataset_builder::*;
use helpers::shared_dataset::*;

// ==========================================
// 输入校验
// ==========================================

#[test]
fn test_未知周期口令() {
    let api = demo_api();

    for dashboard in ["ceo", "cfo", "councillor", "bee2waste"] {
        let err = match dashboard {
            "ceo" => api.ceo(None, "last_week").err(),
            "cfo" => api.cfo(None, "last_week").err(),
            "councillor" => api.councillor(None, "last_week").err(),
            _ => api.bee2waste(None, "last_week").err(),
        };
        match err {
            Some(ApiError::InvalidInput(msg)) => assert!(msg.contains("last_week"), "{}", msg),
            other => panic!("{}: 期望 InvalidInput, 实际 {:?}", dashboard, other),
        }
    }
}

#[test]
fn test_周期别名与大小写() {
    let api = demo_api();

    let canonical = api.ceo(None, "last_6_months").unwrap();
    let alias = api.ceo(None, "ultimos_6m").unwrap();
    let upper = api.ceo(None, " LAST_6_MONTHS ").unwrap();

    assert_eq!(canonical, alias);
    assert_eq!(canonical, upper);
}

#[test]
fn test_未知市镇返回NotFound() {
    let api = demo_api();

    let result = api.cfo(Some("MUN-XXX"), "ytd");
    assert!(matches!(result, Err(ApiError::NotFound(_))));

    let result = api.semaphores(Some("MUN-XXX"));
    assert!(matches!(result, Err(ApiError::NotFound(_))));
}

#[test]
fn test_空市镇视为全系统() {
    let api = demo_api();

    let blank = api.bee2waste(Some("  "), "ytd").unwrap();
    let system = api.bee2waste(None, "ytd").unwrap();
    assert_eq!(blank, system);
    assert_eq!(blank.municipality_cards.len(), 4);
}

// ==========================================
// 数据集加载与输出
// ==========================================

#[test]
fn test_从JSON加载数据集() {
    let dataset = two_parish_dataset(&["2026-01", "2026-02"]);
    let raw = serde_json::to_string(&dataset).unwrap();

    let api = DashboardApi::from_json_str(&raw, ModelParameters::default()).unwrap();
    assert_eq!(api.available_months(), vec!["2026-01".to_string(), "2026-02".to_string()]);

    let metrics = api.ceo(Some("M1"), "all").unwrap();
    assert_eq!(metrics.total_bio_tons.value, 4.0);
}

#[test]
fn test_非法JSON() {
    let result = DashboardApi::from_json_str("{ not json", ModelParameters::default());
    assert!(matches!(result, Err(ApiError::DatasetDecode(_))));
}

#[test]
fn test_排放因子缺省取内置目录() {
    let dataset = two_parish_dataset(&["2026-01"]);
    assert!(dataset.emission_factors.is_empty());

    let api = DashboardApi::new(Arc::new(dataset), ModelParameters::default());
    assert_eq!(api.emission_factors().len(), 5);
    assert_eq!(demo_api().emission_factors(), api.emission_factors());
}

#[test]
fn test_看板结果可序列化() {
    let api = demo_api();
    let metrics = api.councillor(None, "ytd").unwrap();

    let value = serde_json::to_value(&metrics).unwrap();
    assert!(value.get("parish_scores").is_some());
    assert_eq!(value["aggregate_classification"], serde_json::json!(metrics.aggregate_classification));

    let semaphores = serde_json::to_value(api.semaphores(None).unwrap()).unwrap();
    let color = semaphores[0]["color"].as_str().unwrap();
    assert!(["GREEN", "YELLOW", "ORANGE", "RED"].contains(&color));
}

// ==========================================
// 并发只读
// ==========================================

#[test]
fn test_多线程共享数据集() {
    let dataset = demo_dataset();
    let expected = DashboardApi::new(dataset.clone(), ModelParameters::default())
        .ceo(None, "last_12_months")
        .unwrap();

    let handles: Vec<_> = MUNICIPALITY_IDS
        .iter()
        .map(|_| {
            let dataset = Arc::clone(&dataset);
            thread::spawn(move || {
                DashboardApi::new(dataset, ModelParameters::default())
                    .ceo(None, "last_12_months")
                    .unwrap()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
