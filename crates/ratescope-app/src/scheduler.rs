//! 폴링 스케줄러.
//!
//! 고정 간격(기본 2초)으로 메트릭 폴러를 돌린다. 첫 틱은 즉시 발생하므로
//! 시작 직후 한 번 폴링된다. 실패해도 다음 틱은 그대로 진행한다.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::info;

use crate::poller::MetricsPoller;

/// 주기 폴링 루프
pub struct PollScheduler {
    poller: Arc<MetricsPoller>,
    interval: Duration,
}

impl PollScheduler {
    pub fn new(poller: Arc<MetricsPoller>, interval: Duration) -> Self {
        Self { poller, interval }
    }

    /// 종료 신호까지 폴링
    pub async fn run(&self, mut shutdown_rx: watch::Receiver<bool>) {
        info!("폴링 스케줄러 시작: 간격={}ms", self.interval.as_millis());

        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    // 실패는 poll() 안에서 이미 로그로 남는다
                    let _ = self.poller.poll().await;
                }
                _ = shutdown_rx.changed() => {
                    info!("폴링 루프 종료");
                    break;
                }
            }
        }
    }

    /// 별도 태스크로 실행
    pub fn spawn(self, shutdown_rx: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(async move { self.run(shutdown_rx).await })
    }
}
