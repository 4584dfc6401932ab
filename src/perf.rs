use std::cell::Cell;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Once;
use std::time::Instant;

static PERF_ENABLED: AtomicBool = AtomicBool::new(false);
static SLOW_OP_THRESHOLD_MS: AtomicU64 = AtomicU64::new(0);
static INIT: Once = Once::new();

thread_local! {
    static PERF_DEPTH: Cell<u32> = Cell::new(0);
}

fn is_true(v: &str) -> bool {
    matches!(
        v.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}

/// 读取性能统计开关（进程内只读一次）
///
/// 开关：
/// - Debug 默认开启；Release 默认关闭（可通过环境变量开启）
/// - `BIOWASTE_PERF=1` 强制开启
/// - `BIOWASTE_SLOW_OP_MS=50` 配置慢计算阈值（毫秒）
fn ensure_init() {
    INIT.call_once(|| {
        let enabled = match std::env::var("BIOWASTE_PERF") {
            Ok(v) => is_true(&v),
            Err(_) => cfg!(debug_assertions),
        };
        PERF_ENABLED.store(enabled, Ordering::Relaxed);

        let slow_ms = std::env::var("BIOWASTE_SLOW_OP_MS")
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(if cfg!(debug_assertions) { 200 } else { 50 });
        SLOW_OP_THRESHOLD_MS.store(slow_ms, Ordering::Relaxed);
    });
}

pub fn is_enabled() -> bool {
    ensure_init();
    PERF_ENABLED.load(Ordering::Relaxed)
}

/// 性能统计 Guard：记录 elapsed_ms + 嵌套深度，超过阈值记 warn
///
/// 使用方式：
/// ```ignore
/// let _perf = biowaste_metrics::perf::PerfGuard::new("ceo_dashboard");
/// // do work...
/// ```
pub struct PerfGuard {
    op: &'static str,
    start: Instant,
    depth: u32,
    active: bool,
}

impl PerfGuard {
    pub fn new(op: &'static str) -> Self {
        let active = is_enabled();
        let depth = PERF_DEPTH.with(|d| {
            let next = d.get().saturating_add(1);
            d.set(next);
            next
        });
        Self {
            op,
            start: Instant::now(),
            depth,
            active,
        }
    }
}

impl Drop for PerfGuard {
    fn drop(&mut self) {
        PERF_DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
        if !self.active {
            return;
        }

        let elapsed_ms = self.start.elapsed().as_millis() as u64;
        let threshold = SLOW_OP_THRESHOLD_MS.load(Ordering::Relaxed);

        if threshold > 0 && elapsed_ms >= threshold {
            tracing::warn!(
                target: "slow_op",
                op = self.op,
                elapsed_ms,
                depth = self.depth,
                "slow computation"
            );
        }

        tracing::info!(
            target: "perf",
            op = self.op,
            elapsed_ms,
            depth = self.depth,
            "done"
        );
    }
}
