//! HTTP REST API 클라이언트.
//!
//! `RateLimiterApi` 포트 구현. 재시도는 하지 않는다. 실패는 전송 에러와
//! 응답 에러로만 구분해 호출자에게 돌려준다.

use async_trait::async_trait;
use ratescope_core::error::CoreError;
use ratescope_core::models::metrics::MetricsSnapshot;
use ratescope_core::models::test_run::{TestRunConfig, TestRunResult};
use ratescope_core::ports::api_client::RateLimiterApi;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// 메트릭 조회 경로
const METRICS_PATH: &str = "/api/metrics";

/// 테스트 실행 경로
const TEST_PATH: &str = "/api/test";

/// 레이트 리미터 REST 클라이언트: `RateLimiterApi` 포트 구현
pub struct HttpRateLimiterClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRateLimiterClient {
    /// 새 HTTP 클라이언트 생성
    ///
    /// `timeout`이 None이면 reqwest 기본 동작(무제한)을 그대로 쓴다.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, CoreError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| CoreError::Transport(format!("HTTP 클라이언트 빌드 실패: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// 상태 코드 확인 후 JSON 본문 파싱
    async fn parse_response<T: DeserializeOwned>(
        resp: reqwest::Response,
    ) -> Result<T, CoreError> {
        let status = resp.status();

        if !status.is_success() {
            let text = resp.text().await.unwrap_or_else(|e| {
                tracing::warn!("응답 본문 읽기 실패: {e}");
                String::new()
            });
            return Err(CoreError::Response {
                status: Some(status.as_u16()),
                message: if text.is_empty() {
                    status.to_string()
                } else {
                    text
                },
            });
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| CoreError::Transport(format!("응답 본문 수신 실패: {e}")))?;

        serde_json::from_slice(&bytes).map_err(|e| CoreError::Response {
            status: None,
            message: format!("응답 파싱 실패: {e}"),
        })
    }
}

#[async_trait]
impl RateLimiterApi for HttpRateLimiterClient {
    async fn fetch_metrics(&self) -> Result<MetricsSnapshot, CoreError> {
        let resp = self
            .client
            .get(self.url(METRICS_PATH))
            .send()
            .await
            .map_err(|e| CoreError::Transport(format!("메트릭 요청 실패: {e}")))?;

        let snapshot: MetricsSnapshot = Self::parse_response(resp).await?;
        debug!(
            "메트릭 수신: total={}, allowed={}, blocked={}",
            snapshot.total, snapshot.allowed, snapshot.blocked
        );
        Ok(snapshot)
    }

    async fn run_test(&self, config: &TestRunConfig) -> Result<TestRunResult, CoreError> {
        debug!(
            "테스트 요청: algorithm={}, max_requests={}, window={}s, num_requests={}",
            config.algorithm, config.max_requests, config.window_seconds, config.num_requests
        );

        let resp = self
            .client
            .post(self.url(TEST_PATH))
            .json(config)
            .send()
            .await
            .map_err(|e| CoreError::Transport(format!("테스트 요청 실패: {e}")))?;

        let result: TestRunResult = Self::parse_response(resp).await?;
        debug!(
            "테스트 응답: allowed={}, blocked={}, duration={:.2}ms",
            result.allowed, result.blocked, result.duration_ms
        );
        Ok(result)
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}
