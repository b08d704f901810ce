//! 레이트 리미터 API 클라이언트 포트.
//!
//! 구현: `ratescope-network` crate (reqwest)

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::metrics::MetricsSnapshot;
use crate::models::test_run::{TestRunConfig, TestRunResult};

/// 레이트 리미터 서버 HTTP API
#[async_trait]
pub trait RateLimiterApi: Send + Sync {
    /// 현재 누적 카운터 조회 (`GET /api/metrics`)
    async fn fetch_metrics(&self) -> Result<MetricsSnapshot, CoreError>;

    /// 1회성 부하 테스트 실행 (`POST /api/test`)
    async fn run_test(&self, config: &TestRunConfig) -> Result<TestRunResult, CoreError>;

    /// 사용자 안내 메시지에 노출할 서버 주소
    fn base_url(&self) -> &str;
}
