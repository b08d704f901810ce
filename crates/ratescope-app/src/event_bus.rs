//! 렌더 이벤트 버스.
//!
//! `tokio::broadcast` 기반. 폴러/오케스트레이터가 발행하고 렌더 어댑터가 구독한다.
//! 발행은 절대 블로킹하지 않는다. 느린 구독자는 오래된 이벤트를 잃는다.

use ratescope_core::display::SummaryDisplay;
use ratescope_core::models::series::SeriesPoint;
use ratescope_core::models::test_run::{TestRunConfig, TestRunReport};
use ratescope_network::connectivity::ConnectionStatus;
use tokio::sync::broadcast;
use tracing::trace;

use crate::controls::TriggerState;

/// 렌더러로 가는 알림
#[derive(Debug, Clone)]
pub enum RenderEvent {
    /// 요약 표시 갱신 (성공한 폴링마다)
    SummaryUpdated(SummaryDisplay),
    /// 버퍼에 점 추가됨
    PointAppended {
        point: SeriesPoint,
        evicted: Option<SeriesPoint>,
    },
    /// 다시 그리기 요청
    Redraw { animated: bool },
    /// 실행 버튼 상태 변경
    TriggerChanged(TriggerState),
    /// 테스트 요청 제출
    TestStarted(TestRunConfig),
    /// 테스트 결과 수신
    TestCompleted(TestRunReport),
    /// 테스트 실패 (사용자 안내 메시지)
    TestFailed(String),
    /// 서버 연결 상태 변경
    ConnectionChanged(ConnectionStatus),
}

/// 렌더 이벤트 버스 (복제해서 공유)
#[derive(Debug, Clone)]
pub struct RenderBus {
    tx: broadcast::Sender<RenderEvent>,
}

impl RenderBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// 이벤트 발행. 구독자가 없으면 버려진다.
    pub fn publish(&self, event: RenderEvent) {
        trace!("렌더 이벤트 발행: {:?}", std::mem::discriminant(&event));
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RenderEvent> {
        self.tx.subscribe()
    }
}

impl Default for RenderBus {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_and_receive() {
        let bus = RenderBus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(RenderEvent::Redraw { animated: false });

        let event = rx.recv().await.unwrap();
        assert!(matches!(event, RenderEvent::Redraw { animated: false }));
    }

    #[tokio::test]
    async fn multiple_subscribers() {
        let bus = RenderBus::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(RenderEvent::TestFailed("down".to_string()));

        assert!(matches!(rx1.recv().await.unwrap(), RenderEvent::TestFailed(_)));
        assert!(matches!(rx2.recv().await.unwrap(), RenderEvent::TestFailed(_)));
    }

    #[test]
    fn publish_without_subscribers_is_noop() {
        let bus = RenderBus::new(4);
        bus.publish(RenderEvent::Redraw { animated: true });
    }
}
