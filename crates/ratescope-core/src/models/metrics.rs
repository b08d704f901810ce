//! 메트릭 스냅샷 모델.
//!
//! `GET /api/metrics` 응답과, 델타 계산을 위한 직전 카운터를 표현한다.

use serde::{Deserialize, Serialize};

/// 서버 누적 카운터 스냅샷 (한 번 수신하면 불변)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// 전체 처리 요청 수
    pub total: u64,
    /// 허용된 요청 수
    pub allowed: u64,
    /// 차단된 요청 수
    pub blocked: u64,
    /// 허용률 (0.0 ~ 100.0)
    pub allow_rate: f64,
}

impl MetricsSnapshot {
    /// 카운터만 뽑아낸 값
    pub fn counters(&self) -> SessionCounters {
        SessionCounters {
            allowed: self.allowed,
            blocked: self.blocked,
        }
    }
}

/// 직전 스냅샷의 allowed/blocked: 델타 계산 전용
///
/// 프로세스 시작 시 0으로 초기화된다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionCounters {
    pub allowed: u64,
    pub blocked: u64,
}

impl SessionCounters {
    /// `next` 스냅샷과의 부호 있는 차이
    ///
    /// 서버 카운터가 리셋되면 음수가 될 수 있다.
    pub fn delta_to(&self, next: &MetricsSnapshot) -> CounterDelta {
        CounterDelta {
            allowed: signed_diff(next.allowed, self.allowed),
            blocked: signed_diff(next.blocked, self.blocked),
        }
    }
}

fn signed_diff(next: u64, prev: u64) -> i64 {
    let diff = i128::from(next) - i128::from(prev);
    diff.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
}

/// 연속된 두 스냅샷 사이의 카운터 변화량
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterDelta {
    pub allowed: i64,
    pub blocked: i64,
}

impl CounterDelta {
    /// 새 트래픽이 관측되었는지 (둘 중 하나라도 증가)
    pub fn has_new_traffic(&self) -> bool {
        self.allowed > 0 || self.blocked > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(allowed: u64, blocked: u64) -> MetricsSnapshot {
        MetricsSnapshot {
            total: allowed + blocked,
            allowed,
            blocked,
            allow_rate: 0.0,
        }
    }

    #[test]
    fn deserialize_metrics_response() {
        let json = r#"{"total":6,"allowed":5,"blocked":1,"allow_rate":83.33}"#;
        let snap: MetricsSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snap.total, 6);
        assert_eq!(snap.allowed, 5);
        assert_eq!(snap.blocked, 1);
        assert!((snap.allow_rate - 83.33).abs() < f64::EPSILON);
    }

    #[test]
    fn delta_from_zero_counters() {
        let delta = SessionCounters::default().delta_to(&snapshot(5, 1));
        assert_eq!(delta, CounterDelta { allowed: 5, blocked: 1 });
        assert!(delta.has_new_traffic());
    }

    #[test]
    fn identical_snapshot_has_no_traffic() {
        let prev = snapshot(5, 1).counters();
        let delta = prev.delta_to(&snapshot(5, 1));
        assert_eq!(delta, CounterDelta::default());
        assert!(!delta.has_new_traffic());
    }

    #[test]
    fn counter_reset_yields_negative_delta() {
        let prev = snapshot(100, 40).counters();
        let delta = prev.delta_to(&snapshot(0, 0));
        assert_eq!(delta.allowed, -100);
        assert_eq!(delta.blocked, -40);
        assert!(!delta.has_new_traffic());
    }

    #[test]
    fn blocked_only_increase_counts_as_traffic() {
        let prev = snapshot(5, 1).counters();
        assert!(prev.delta_to(&snapshot(5, 2)).has_new_traffic());
    }
}
