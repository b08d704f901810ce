//! 테스트 실행 오케스트레이터.
//!
//! `Idle → Running → Idle` 상태 머신. 한 번에 하나의 실행만 허용하며,
//! 실행 중 들어온 트리거는 대기열에 넣지 않고 버린다.
//!
//! Running 진입은 첫 await 이전에 원자적 check-and-set으로 결정된다.
//! Idle 복귀는 [`RunGuard`]의 `Drop`이 담당하므로 성공, 실패, 렌더링 중 패닉
//! 어느 경로에서도 버튼과 상태가 복구된다.

use ratescope_core::error::CoreError;
use ratescope_core::models::test_run::{TestRunConfig, TestRunReport, TestRunResult};
use ratescope_core::ports::api_client::RateLimiterApi;
use ratescope_core::ports::notifier::UserNotifier;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::controls::ControlPanel;
use crate::event_bus::{RenderBus, RenderEvent};
use crate::poller::MetricsPoller;
use crate::session::Session;

/// 트리거 1회의 결과
#[derive(Debug)]
pub enum TriggerOutcome {
    /// 이미 실행 중이라 버려짐 (요청 없음)
    Ignored,
    /// 결과 수신 및 렌더링 완료
    Completed(TestRunReport),
    /// 요청 실패 (사용자에게 알림 완료)
    Failed(CoreError),
}

/// 실패 시 사용자에게 띄우는 메시지
pub fn failure_message(base_url: &str) -> String {
    format!("Test failed! Make sure the server is running at {base_url}")
}

/// Running 구간 동안 살아 있는 복구 가드
struct RunGuard<'a> {
    session: &'a Session,
    controls: &'a ControlPanel,
    bus: &'a RenderBus,
}

impl<'a> RunGuard<'a> {
    /// 버튼을 비활성화하고 가드 생성 (Running 진입 직후에만 호출)
    fn engage(session: &'a Session, controls: &'a ControlPanel, bus: &'a RenderBus) -> Self {
        let trigger = controls.begin_run();
        bus.publish(RenderEvent::TriggerChanged(trigger));
        Self {
            session,
            controls,
            bus,
        }
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        let trigger = self.controls.restore_trigger();
        self.session.run_state().finish();
        self.bus.publish(RenderEvent::TriggerChanged(trigger));
        debug!("테스트 실행 상태 복구: Idle");
    }
}

/// 테스트 실행 오케스트레이터 (세션당 하나)
pub struct TestRunOrchestrator {
    api: Arc<dyn RateLimiterApi>,
    poller: Arc<MetricsPoller>,
    session: Arc<Session>,
    controls: Arc<ControlPanel>,
    notifier: Arc<dyn UserNotifier>,
    bus: RenderBus,
}

impl TestRunOrchestrator {
    pub fn new(
        api: Arc<dyn RateLimiterApi>,
        poller: Arc<MetricsPoller>,
        session: Arc<Session>,
        controls: Arc<ControlPanel>,
        notifier: Arc<dyn UserNotifier>,
        bus: RenderBus,
    ) -> Self {
        Self {
            api,
            poller,
            session,
            controls,
            notifier,
            bus,
        }
    }

    /// 사용자 실행 트리거
    pub async fn trigger(&self) -> TriggerOutcome {
        if !self.session.run_state().try_begin() {
            debug!("테스트 실행 중 - 트리거 무시");
            return TriggerOutcome::Ignored;
        }
        let _guard = RunGuard::engage(&self.session, &self.controls, &self.bus);

        let config = self.controls.snapshot();
        info!(
            "테스트 시작: algorithm={}, max_requests={}, window={}s, num_requests={}",
            config.algorithm, config.max_requests, config.window_seconds, config.num_requests
        );
        self.bus.publish(RenderEvent::TestStarted(config.clone()));

        match self.submit(&config).await {
            Ok(result) => TriggerOutcome::Completed(self.complete(config, &result).await),
            Err(e) => {
                error!("테스트 실행 실패: {e}");
                let message = failure_message(self.api.base_url());
                self.bus.publish(RenderEvent::TestFailed(message.clone()));
                self.notifier.alert(&message).await;
                TriggerOutcome::Failed(e)
            }
        }
    }

    async fn submit(&self, config: &TestRunConfig) -> Result<TestRunResult, CoreError> {
        config.validate()?;
        self.api.run_test(config).await
    }

    /// 결과 렌더링 후 메트릭 즉시 갱신
    async fn complete(&self, config: TestRunConfig, result: &TestRunResult) -> TestRunReport {
        if !result.is_consistent() {
            warn!(
                "결과 길이 불일치: results={}, allowed+blocked={}",
                result.results.len(),
                u64::from(result.allowed) + u64::from(result.blocked)
            );
        }

        let report = TestRunReport::render(config, result);
        info!(
            "테스트 완료: allowed={}, blocked={}, duration={}, throughput={}",
            report.allowed, report.blocked, report.duration, report.throughput
        );
        self.bus.publish(RenderEvent::TestCompleted(report.clone()));

        if let Err(e) = self.poller.poll().await {
            warn!("테스트 후 메트릭 갱신 실패: {e}");
        }
        report
    }

    pub fn controls(&self) -> &Arc<ControlPanel> {
        &self.controls
    }
}
