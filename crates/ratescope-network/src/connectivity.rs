//! 서버 연결 상태 추적.
//!
//! 폴링 결과(성공/실패)만으로 레이트 리미터 서버의 도달 가능 여부를 판정한다.
//! 재시도는 하지 않는다. 폴링 주기 자체가 재시도 역할을 한다.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// 연결 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// 아직 폴링 결과 없음
    Unknown,
    /// 마지막 폴링 성공
    Connected,
    /// 실패했지만 임계값 미만
    Degraded,
    /// 연속 실패가 임계값 도달
    Disconnected,
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionStatus::Unknown => write!(f, "Unknown"),
            ConnectionStatus::Connected => write!(f, "Connected"),
            ConnectionStatus::Degraded => write!(f, "Degraded"),
            ConnectionStatus::Disconnected => write!(f, "Disconnected"),
        }
    }
}

/// 연결 상태 관리자
pub struct ConnectivityManager {
    failure_count: AtomicU64,
    last_success: Mutex<Option<DateTime<Utc>>>,
    status_tx: watch::Sender<ConnectionStatus>,
    /// 이 횟수만큼 연속 실패하면 Disconnected
    offline_threshold: u64,
}

impl ConnectivityManager {
    /// 새 연결 관리자 생성 (`offline_threshold`는 최소 1)
    pub fn new(offline_threshold: u64) -> Self {
        let (status_tx, _) = watch::channel(ConnectionStatus::Unknown);
        Self {
            failure_count: AtomicU64::new(0),
            last_success: Mutex::new(None),
            status_tx,
            offline_threshold: offline_threshold.max(1),
        }
    }

    /// 현재 연결 상태
    pub fn status(&self) -> ConnectionStatus {
        *self.status_tx.borrow()
    }

    /// 상태 변경 수신기
    pub fn subscribe(&self) -> watch::Receiver<ConnectionStatus> {
        self.status_tx.subscribe()
    }

    /// 연속 실패 횟수
    pub fn failure_count(&self) -> u64 {
        self.failure_count.load(Ordering::Relaxed)
    }

    /// 마지막 성공 시각
    pub fn last_success(&self) -> Option<DateTime<Utc>> {
        *self.last_success.lock()
    }

    /// 성공 기록. 상태가 바뀌었으면 새 상태를 반환한다.
    pub fn record_success(&self) -> Option<ConnectionStatus> {
        self.failure_count.store(0, Ordering::Relaxed);
        *self.last_success.lock() = Some(Utc::now());

        let changed = self.transition(ConnectionStatus::Connected);
        if let Some(prev) = changed {
            if prev != ConnectionStatus::Unknown {
                info!("레이트 리미터 서버 연결 복구");
            }
        }
        changed.map(|_| ConnectionStatus::Connected)
    }

    /// 실패 기록. 상태가 바뀌었으면 새 상태를 반환한다.
    pub fn record_failure(&self) -> Option<ConnectionStatus> {
        let count = self.failure_count.fetch_add(1, Ordering::Relaxed) + 1;
        debug!("폴링 실패 기록 (연속 {}회)", count);

        let next = if count >= self.offline_threshold {
            ConnectionStatus::Disconnected
        } else {
            ConnectionStatus::Degraded
        };

        let changed = self.transition(next);
        if changed.is_some() && next == ConnectionStatus::Disconnected {
            warn!("연속 {}회 폴링 실패 - 서버 연결 끊김으로 판단", count);
        }
        changed.map(|_| next)
    }

    /// 상태 전이. 바뀌었으면 이전 상태를 반환한다.
    fn transition(&self, next: ConnectionStatus) -> Option<ConnectionStatus> {
        let mut prev = None;
        self.status_tx.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            prev = Some(*current);
            *current = next;
            true
        });
        prev
    }
}

impl Default for ConnectivityManager {
    fn default() -> Self {
        Self::new(3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_is_unknown() {
        let mgr = ConnectivityManager::default();
        assert_eq!(mgr.status(), ConnectionStatus::Unknown);
        assert_eq!(mgr.failure_count(), 0);
        assert!(mgr.last_success().is_none());
    }

    #[test]
    fn first_success_connects() {
        let mgr = ConnectivityManager::default();
        assert_eq!(mgr.record_success(), Some(ConnectionStatus::Connected));
        assert_eq!(mgr.record_success(), None);
        assert!(mgr.last_success().is_some());
    }

    #[test]
    fn threshold_triggers_disconnect() {
        let mgr = ConnectivityManager::new(3);
        mgr.record_success();

        assert_eq!(mgr.record_failure(), Some(ConnectionStatus::Degraded));
        assert_eq!(mgr.record_failure(), None);
        assert_eq!(mgr.record_failure(), Some(ConnectionStatus::Disconnected));
        assert_eq!(mgr.failure_count(), 3);
    }

    #[test]
    fn success_resets_failures() {
        let mgr = ConnectivityManager::new(2);
        mgr.record_failure();
        mgr.record_failure();
        assert_eq!(mgr.status(), ConnectionStatus::Disconnected);

        assert_eq!(mgr.record_success(), Some(ConnectionStatus::Connected));
        assert_eq!(mgr.failure_count(), 0);
    }

    #[test]
    fn zero_threshold_is_clamped() {
        let mgr = ConnectivityManager::new(0);
        assert_eq!(mgr.record_failure(), Some(ConnectionStatus::Disconnected));
    }

    #[tokio::test]
    async fn subscribe_receives_changes() {
        let mgr = ConnectivityManager::new(1);
        let mut rx = mgr.subscribe();
        assert_eq!(*rx.borrow(), ConnectionStatus::Unknown);

        mgr.record_failure();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), ConnectionStatus::Disconnected);

        mgr.record_success();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), ConnectionStatus::Connected);
    }
}
