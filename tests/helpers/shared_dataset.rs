// ==========================================
// 共享演示数据集
// ==========================================

use biowaste_metrics::config::ModelParameters;
use biowaste_metrics::domain::Dataset;
use biowaste_metrics::generator::generate_default;
use biowaste_metrics::{logging, DashboardApi};
use std::sync::{Arc, OnceLock};

static DATASET: OnceLock<Arc<Dataset>> = OnceLock::new();

/// 默认种子生成的数据集（每个测试进程只生成一次）
pub fn demo_dataset() -> Arc<Dataset> {
    DATASET
        .get_or_init(|| {
            logging::init_test();
            Arc::new(generate_default())
        })
        .clone()
}

/// 基于共享数据集、默认参数的 API
pub fn demo_api() -> DashboardApi {
    DashboardApi::new(demo_dataset(), ModelParameters::default())
}

/// 演示数据集中的市镇 ID
pub const MUNICIPALITY_IDS: [&str; 4] = ["MUN-CAS", "MUN-SIN", "MUN-OEI", "MUN-MAF"];

pub const PERIODS: [&str; 4] = ["last_6_months", "ytd", "last_12_months", "all"];
