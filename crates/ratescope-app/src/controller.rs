//! 대시보드 컨트롤러.
//!
//! 세션 하나를 소유하고 폴러, 오케스트레이터, 컨트롤 패널, 렌더 버스를
//! 와이어링한다. 세션마다 컨트롤러를 따로 만들면 서로 섞이지 않는다.

use ratescope_core::config::{AppConfig, BUFFER_CAPACITY, POLL_INTERVAL};
use ratescope_core::ports::api_client::RateLimiterApi;
use ratescope_core::ports::notifier::UserNotifier;
use ratescope_network::connectivity::ConnectivityManager;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::info;

use crate::controls::ControlPanel;
use crate::event_bus::{RenderBus, RenderEvent};
use crate::orchestrator::{TestRunOrchestrator, TriggerOutcome};
use crate::poller::MetricsPoller;
use crate::scheduler::PollScheduler;
use crate::session::Session;

/// 세션 소유자
#[derive(Clone)]
pub struct DashboardController {
    session: Arc<Session>,
    controls: Arc<ControlPanel>,
    bus: RenderBus,
    poller: Arc<MetricsPoller>,
    orchestrator: Arc<TestRunOrchestrator>,
}

impl DashboardController {
    /// 설정과 어댑터로 새 세션 구성
    pub fn new(
        config: &AppConfig,
        api: Arc<dyn RateLimiterApi>,
        notifier: Arc<dyn UserNotifier>,
    ) -> Self {
        let session = Arc::new(Session::new(BUFFER_CAPACITY));
        let controls = Arc::new(ControlPanel::new(&config.controls));
        let bus = RenderBus::new(config.events.channel_capacity);
        let connectivity = Arc::new(ConnectivityManager::new(config.poller.offline_threshold));

        let poller = Arc::new(MetricsPoller::new(
            api.clone(),
            session.clone(),
            bus.clone(),
            connectivity,
        ));
        let orchestrator = Arc::new(TestRunOrchestrator::new(
            api,
            poller.clone(),
            session.clone(),
            controls.clone(),
            notifier,
            bus.clone(),
        ));

        info!("세션 생성: {}", session.id());

        Self {
            session,
            controls,
            bus,
            poller,
            orchestrator,
        }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn controls(&self) -> &Arc<ControlPanel> {
        &self.controls
    }

    pub fn poller(&self) -> &Arc<MetricsPoller> {
        &self.poller
    }

    pub fn orchestrator(&self) -> &Arc<TestRunOrchestrator> {
        &self.orchestrator
    }

    /// 렌더 이벤트 구독
    pub fn subscribe(&self) -> broadcast::Receiver<RenderEvent> {
        self.bus.subscribe()
    }

    /// 주기 폴링 스케줄러 생성
    pub fn scheduler(&self) -> PollScheduler {
        PollScheduler::new(self.poller.clone(), POLL_INTERVAL)
    }

    /// 테스트 실행을 별도 태스크로 시작
    ///
    /// 이미 실행 중이면 태스크는 요청 없이 `Ignored`로 끝난다.
    pub fn spawn_test_run(&self) -> JoinHandle<TriggerOutcome> {
        let orchestrator = self.orchestrator.clone();
        tokio::spawn(async move { orchestrator.trigger().await })
    }
}
