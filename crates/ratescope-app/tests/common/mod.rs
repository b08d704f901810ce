//! 통합 테스트 공용 가짜 어댑터.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use ratescope_app::controller::DashboardController;
use ratescope_core::config::AppConfig;
use ratescope_core::error::CoreError;
use ratescope_core::models::metrics::MetricsSnapshot;
use ratescope_core::models::test_run::{TestRunConfig, TestRunResult};
use ratescope_core::ports::api_client::RateLimiterApi;
use ratescope_core::ports::notifier::UserNotifier;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Notify;
use tokio::time::Instant;

pub const FAKE_BASE_URL: &str = "http://fake-limiter:3001";

pub fn snapshot(allowed: u64, blocked: u64) -> MetricsSnapshot {
    let total = allowed + blocked;
    MetricsSnapshot {
        total,
        allowed,
        blocked,
        allow_rate: if total == 0 {
            0.0
        } else {
            allowed as f64 / total as f64 * 100.0
        },
    }
}

pub fn test_result(results: Vec<bool>) -> TestRunResult {
    let allowed = results.iter().filter(|r| **r).count() as u32;
    let blocked = results.len() as u32 - allowed;
    TestRunResult {
        allowed,
        blocked,
        duration_ms: 1.5,
        requests_per_sec: 2000.0,
        results,
    }
}

/// 스크립트된 응답을 돌려주는 가짜 서버
///
/// `gated`이면 `run_test`가 [`FakeApi::release`] 호출까지 멈춘다.
pub struct FakeApi {
    metrics: Mutex<VecDeque<Result<MetricsSnapshot, CoreError>>>,
    tests: Mutex<VecDeque<Result<TestRunResult, CoreError>>>,
    metric_calls: Mutex<Vec<Instant>>,
    test_requests: Mutex<Vec<TestRunConfig>>,
    gated: bool,
    panic_on_metrics: bool,
    gate: Notify,
    entered: Notify,
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            metrics: Mutex::new(VecDeque::new()),
            tests: Mutex::new(VecDeque::new()),
            metric_calls: Mutex::new(Vec::new()),
            test_requests: Mutex::new(Vec::new()),
            gated: false,
            panic_on_metrics: false,
            gate: Notify::new(),
            entered: Notify::new(),
        }
    }

    pub fn gated() -> Self {
        Self {
            gated: true,
            ..Self::new()
        }
    }

    /// `fetch_metrics`가 패닉하는 서버 (테스트 후 갱신 폴링 패닉 재현용)
    pub fn panicking_metrics() -> Self {
        Self {
            panic_on_metrics: true,
            ..Self::new()
        }
    }

    pub fn push_metrics(&self, response: Result<MetricsSnapshot, CoreError>) {
        self.metrics.lock().push_back(response);
    }

    pub fn push_test(&self, response: Result<TestRunResult, CoreError>) {
        self.tests.lock().push_back(response);
    }

    /// 멈춰 있는 `run_test` 하나를 진행시킨다
    pub fn release(&self) {
        self.gate.notify_one();
    }

    /// `run_test` 진입까지 대기
    pub async fn wait_for_test_request(&self) {
        self.entered.notified().await;
    }

    pub fn metric_calls(&self) -> Vec<Instant> {
        self.metric_calls.lock().clone()
    }

    pub fn test_requests(&self) -> Vec<TestRunConfig> {
        self.test_requests.lock().clone()
    }
}

#[async_trait]
impl RateLimiterApi for FakeApi {
    async fn fetch_metrics(&self) -> Result<MetricsSnapshot, CoreError> {
        self.metric_calls.lock().push(Instant::now());
        if self.panic_on_metrics {
            panic!("메트릭 처리 중 패닉");
        }
        self.metrics
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(CoreError::Transport("connection refused".into())))
    }

    async fn run_test(&self, config: &TestRunConfig) -> Result<TestRunResult, CoreError> {
        self.test_requests.lock().push(config.clone());
        self.entered.notify_one();
        if self.gated {
            self.gate.notified().await;
        }
        self.tests
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(CoreError::Transport("connection refused".into())))
    }

    fn base_url(&self) -> &str {
        FAKE_BASE_URL
    }
}

/// 알림 내용을 기록만 하는 알리미
#[derive(Default)]
pub struct RecordingNotifier {
    alerts: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().clone()
    }
}

#[async_trait]
impl UserNotifier for RecordingNotifier {
    async fn alert(&self, message: &str) {
        self.alerts.lock().push(message.to_string());
    }
}

pub fn controller(api: Arc<FakeApi>, notifier: Arc<RecordingNotifier>) -> DashboardController {
    DashboardController::new(&AppConfig::default_config(), api, notifier)
}
