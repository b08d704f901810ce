//! 메트릭 폴러.
//!
//! `/api/metrics`를 읽어 직전 스냅샷과의 델타를 구하고, 새 트래픽이 있을 때만
//! 시계열 버퍼에 점을 추가한다. 요약 표시는 성공한 폴링마다 갱신한다.
//! 실패는 로그만 남기고 상태를 건드리지 않는다. 재시도는 다음 주기가 대신한다.

use ratescope_core::error::CoreError;
use ratescope_core::models::series::SeriesPoint;
use ratescope_core::ports::api_client::RateLimiterApi;
use ratescope_network::connectivity::ConnectivityManager;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::event_bus::{RenderBus, RenderEvent};
use crate::session::Session;

/// 한 번의 성공한 폴링 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// 새 트래픽 → 버퍼에 점 추가
    Appended(SeriesPoint),
    /// 변화 없음(또는 카운터 리셋) → 추가 생략
    Suppressed { allowed_delta: i64, blocked_delta: i64 },
}

impl PollOutcome {
    pub fn is_appended(&self) -> bool {
        matches!(self, PollOutcome::Appended(_))
    }
}

/// 메트릭 폴러
pub struct MetricsPoller {
    api: Arc<dyn RateLimiterApi>,
    session: Arc<Session>,
    bus: RenderBus,
    connectivity: Arc<ConnectivityManager>,
}

impl MetricsPoller {
    pub fn new(
        api: Arc<dyn RateLimiterApi>,
        session: Arc<Session>,
        bus: RenderBus,
        connectivity: Arc<ConnectivityManager>,
    ) -> Self {
        Self {
            api,
            session,
            bus,
            connectivity,
        }
    }

    /// 메트릭 1회 조회 및 반영
    ///
    /// 주기 틱, 시작 직후, 테스트 완료 직후에 호출된다. 동시에 여러 번 불려도
    /// 마지막 스냅샷이 이긴다.
    pub async fn poll(&self) -> Result<PollOutcome, CoreError> {
        let snapshot = match self.api.fetch_metrics().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("메트릭 조회 실패: {e}");
                self.session.record_poll_failure();
                if let Some(status) = self.connectivity.record_failure() {
                    self.bus.publish(RenderEvent::ConnectionChanged(status));
                }
                return Err(e);
            }
        };

        if let Some(status) = self.connectivity.record_success() {
            self.bus.publish(RenderEvent::ConnectionChanged(status));
        }

        // 버퍼 추가와 발행을 한 락 구간에서 처리해 차트 거울의 순서를 버퍼와 맞춘다
        let bus = &self.bus;
        let applied = self.session.apply_snapshot_with(&snapshot, |applied| {
            bus.publish(RenderEvent::SummaryUpdated(applied.summary.clone()));
            if let Some((point, evicted)) = &applied.appended {
                bus.publish(RenderEvent::PointAppended {
                    point: point.clone(),
                    evicted: evicted.clone(),
                });
                bus.publish(RenderEvent::Redraw { animated: false });
            }
        });

        match applied.appended {
            Some((point, _)) => {
                debug!(
                    "시계열 점 추가: {} allowed={} blocked={} (Δ{}/{})",
                    point.label, point.allowed, point.blocked, applied.delta.allowed, applied.delta.blocked
                );
                Ok(PollOutcome::Appended(point))
            }
            None => {
                debug!(
                    "새 트래픽 없음 - 점 추가 생략 (Δ{}/{})",
                    applied.delta.allowed, applied.delta.blocked
                );
                Ok(PollOutcome::Suppressed {
                    allowed_delta: applied.delta.allowed,
                    blocked_delta: applied.delta.blocked,
                })
            }
        }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn connectivity(&self) -> &Arc<ConnectivityManager> {
        &self.connectivity
    }
}
