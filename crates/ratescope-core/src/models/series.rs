//! 시계열 버퍼 레코드 모델.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// 차트 한 점: (라벨, allowed 누적값, blocked 누적값)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// 폴링 시각 라벨 (로컬 `HH:MM:SS`)
    pub label: String,
    /// allowed 누적값
    pub allowed: u64,
    /// blocked 누적값
    pub blocked: u64,
    /// 추가 시각 (라벨 순서 검증용)
    pub captured_at: DateTime<Utc>,
}

impl SeriesPoint {
    /// 지정 시각으로 점 생성
    pub fn at(captured_at: DateTime<Utc>, allowed: u64, blocked: u64) -> Self {
        Self {
            label: time_label(captured_at),
            allowed,
            blocked,
            captured_at,
        }
    }

    /// 현재 시각으로 점 생성
    pub fn now(allowed: u64, blocked: u64) -> Self {
        Self::at(Utc::now(), allowed, blocked)
    }
}

/// 로컬 벽시계 기준 `HH:MM:SS` 라벨
pub fn time_label(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_is_wall_clock_time() {
        let point = SeriesPoint::now(3, 1);
        assert_eq!(point.label.len(), 8);
        assert_eq!(point.label.matches(':').count(), 2);
        assert_eq!(point.allowed, 3);
        assert_eq!(point.blocked, 1);
    }
}
