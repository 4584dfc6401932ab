// ==========================================
// 生物废弃物绩效指标 - 看板 API
// ==========================================
// 职责: 校验输入（周期口令、市镇 ID），委托给看板聚合器，记录请求日志与耗时
// 架构: API 层 → Dashboard 层 → Engine 层
// ==========================================

use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::config::{ConfigManager, ModelParameters};
use crate::dashboard::bee2waste::{Bee2WasteAggregator, Bee2WasteMetrics};
use crate::dashboard::ceo::{CeoAggregator, CeoMetrics};
use crate::dashboard::cfo::{CfoAggregator, CfoMetrics};
use crate::dashboard::councillor::{CouncillorAggregator, CouncillorMetrics};
use crate::dashboard::filter::{DashboardFilter, OperationalFilter};
use crate::dashboard::operational::{OperationalAggregator, OperationalMetrics};
use crate::domain::dataset::Dataset;
use crate::domain::entities::EmissionFactor;
use crate::domain::period::PeriodToken;
use crate::domain::types::Shift;
use crate::engine::co2::emission_factor_catalogue;
use crate::engine::random_source::RandomSource;
use crate::engine::semaphore::{SemaphoreEngine, SemaphoreResult};
use crate::perf::PerfGuard;

// ==========================================
// DashboardApi - 看板 API
// ==========================================

/// 看板 API
///
/// 持有只读数据集（`Arc` 共享，可跨线程）与模型参数。
/// 每次调用都从数据集重新计算。
pub struct DashboardApi {
    dataset: Arc<Dataset>,
    params: ModelParameters,
}

impl DashboardApi {
    /// 创建新的 DashboardApi 实例
    ///
    /// # 参数
    /// - dataset: 只读数据集
    /// - params: 模型参数（产出、价格、预算比例等）
    pub fn new(dataset: Arc<Dataset>, params: ModelParameters) -> Self {
        Self { dataset, params }
    }

    /// 以配置管理器中的参数创建
    pub fn with_config(dataset: Arc<Dataset>, config: &ConfigManager) -> Self {
        Self::new(dataset, config.params().clone())
    }

    /// 以参数文件创建
    ///
    /// # 返回
    /// - Err(ApiError::Config): 文件读取、解析或校验失败
    pub fn with_config_file(dataset: Arc<Dataset>, path: impl AsRef<Path>) -> ApiResult<Self> {
        let config = ConfigManager::from_file(path)?;
        Ok(Self::with_config(dataset, &config))
    }

    /// 从 JSON 数据集创建
    pub fn from_json_str(raw: &str, params: ModelParameters) -> ApiResult<Self> {
        let dataset = Dataset::from_json_str(raw)?;
        Ok(Self::new(Arc::new(dataset), params))
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn params(&self) -> &ModelParameters {
        &self.params
    }

    // ==========================================
    // 月度看板
    // ==========================================

    /// CEO 看板
    ///
    /// # 参数
    /// - municipality: 市镇 ID（None 或空串表示全系统）
    /// - period: 周期口令（last_6_months / ytd / last_12_months / all）
    ///
    /// # 返回
    /// - Ok(CeoMetrics)
    /// - Err(ApiError::InvalidInput): 周期口令未知
    /// - Err(ApiError::NotFound): 市镇不存在
    pub fn ceo(&self, municipality: Option<&str>, period: &str) -> ApiResult<CeoMetrics> {
        let filter = self.dashboard_filter(municipality, period)?;
        info!(municipality = ?filter.municipality(), period = %filter.period, "CEO 看板请求");
        let _perf = PerfGuard::new("ceo_dashboard");

        Ok(CeoAggregator::new(self.params.clone()).compute(&self.dataset, &filter))
    }

    /// CFO 看板
    pub fn cfo(&self, municipality: Option<&str>, period: &str) -> ApiResult<CfoMetrics> {
        let filter = self.dashboard_filter(municipality, period)?;
        info!(municipality = ?filter.municipality(), period = %filter.period, "CFO 看板请求");
        let _perf = PerfGuard::new("cfo_dashboard");

        Ok(CfoAggregator::new(self.params.clone()).compute(&self.dataset, &filter))
    }

    /// 市议员看板
    pub fn councillor(
        &self,
        municipality: Option<&str>,
        period: &str,
    ) -> ApiResult<CouncillorMetrics> {
        let filter = self.dashboard_filter(municipality, period)?;
        info!(municipality = ?filter.municipality(), period = %filter.period, "市议员看板请求");
        let _perf = PerfGuard::new("councillor_dashboard");

        Ok(CouncillorAggregator::new().compute(&self.dataset, &filter))
    }

    /// Bee2Waste 运营商看板
    pub fn bee2waste(
        &self,
        municipality: Option<&str>,
        period: &str,
    ) -> ApiResult<Bee2WasteMetrics> {
        let filter = self.dashboard_filter(municipality, period)?;
        info!(municipality = ?filter.municipality(), period = %filter.period, "Bee2Waste 看板请求");
        let _perf = PerfGuard::new("bee2waste_dashboard");

        Ok(Bee2WasteAggregator::new(self.params.clone()).compute(&self.dataset, &filter))
    }

    // ==========================================
    // 运营看板（按日模拟）
    // ==========================================

    /// 运营看板
    ///
    /// # 参数
    /// - municipality: 市镇 ID（None 表示全系统）
    /// - date: 模拟日期
    /// - shift: 可选班次过滤
    /// - rng: 注入的随机源（测试使用固定种子）
    pub fn operational(
        &self,
        municipality: Option<&str>,
        date: NaiveDate,
        shift: Option<Shift>,
        rng: &mut dyn RandomSource,
    ) -> ApiResult<OperationalMetrics> {
        let municipality = self.check_municipality(municipality)?;
        let filter = OperationalFilter::new(municipality, date, shift);
        info!(municipality = ?filter.municipality(), %date, shift = ?shift, "运营看板请求");
        let _perf = PerfGuard::new("operational_dashboard");

        Ok(OperationalAggregator::new().compute(&self.dataset, &filter, rng))
    }

    // ==========================================
    // 辅助查询
    // ==========================================

    /// 三个信号灯（固定最近 6 个月）
    pub fn semaphores(&self, municipality: Option<&str>) -> ApiResult<Vec<SemaphoreResult>> {
        let municipality = self.check_municipality(municipality)?;
        let _perf = PerfGuard::new("semaphores");
        Ok(SemaphoreEngine::compute_all(&self.dataset, municipality))
    }

    /// 排放因子目录（数据集未提供时使用内置目录）
    pub fn emission_factors(&self) -> Vec<EmissionFactor> {
        if self.dataset.emission_factors.is_empty() {
            emission_factor_catalogue()
        } else {
            self.dataset.emission_factors.clone()
        }
    }

    /// 可用月份（升序）
    pub fn available_months(&self) -> Vec<String> {
        self.dataset.available_months()
    }

    // ==========================================
    // 输入校验
    // ==========================================

    fn dashboard_filter(
        &self,
        municipality: Option<&str>,
        period: &str,
    ) -> ApiResult<DashboardFilter> {
        let period: PeriodToken = period.parse()?;
        let municipality = self.check_municipality(municipality)?;
        Ok(DashboardFilter::new(municipality, period))
    }

    /// 空串视为全系统；其余必须是已知市镇
    fn check_municipality<'a>(&self, municipality: Option<&'a str>) -> ApiResult<Option<&'a str>> {
        match municipality.map(str::trim) {
            None | Some("") => Ok(None),
            Some(id) if self.dataset.has_municipality(id) => Ok(Some(id)),
            Some(id) => Err(ApiError::NotFound(format!("市镇(id={})不存在", id))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Municipality;
    use crate::engine::random_source::SeededRandom;

    fn api() -> DashboardApi {
        let dataset = Dataset {
            municipalities: vec![Municipality {
                id: "MUN-A".to_string(),
                name: "Alpha".to_string(),
                population: 100,
                area_km2: 1.0,
                color: "#000000".to_string(),
            }],
            ..Default::default()
        };
        DashboardApi::new(Arc::new(dataset), ModelParameters::default())
    }

    #[test]
    fn test_unknown_period_is_invalid_input() {
        let result = api().ceo(None, "last_week");
        assert!(matches!(result, Err(ApiError::InvalidInput(_))));
    }

    #[test]
    fn test_unknown_municipality_is_not_found() {
        let result = api().cfo(Some("MUN-X"), "ytd");
        match result {
            Err(ApiError::NotFound(msg)) => assert!(msg.contains("MUN-X")),
            _ => panic!("Expected NotFound"),
        }
    }

    #[test]
    fn test_blank_municipality_means_system() {
        let api = api();
        assert!(api.councillor(Some("  "), "all").is_ok());
        assert!(api.bee2waste(Some("MUN-A"), "ultimos_6m").is_ok());
    }

    #[test]
    fn test_operational_validates_municipality() {
        let api = api();
        let date = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
        let mut rng = SeededRandom::default();
        assert!(api.operational(Some("MUN-A"), date, None, &mut rng).is_ok());
        assert!(matches!(
            api.operational(Some("nope"), date, None, &mut rng),
            Err(ApiError::NotFound(_))
        ));
    }

    #[test]
    fn test_emission_factor_fallback() {
        assert_eq!(api().emission_factors().len(), 5);
    }

    #[test]
    fn test_from_json_str_rejects_garbage() {
        let result = DashboardApi::from_json_str("not json", ModelParameters::default());
        assert!(matches!(result, Err(ApiError::DatasetDecode(_))));
    }
}
