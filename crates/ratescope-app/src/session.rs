//! 세션 상태.
//!
//! 직전 카운터, 시계열 버퍼, 요약 표시, 테스트 실행 상태를 한 구조체에 모은다.
//! 폴러와 오케스트레이터는 `Arc<Session>`으로 같은 세션을 참조한다.
//! 락은 await 사이에 절대 들고 있지 않는다.

use chrono::Utc;
use parking_lot::Mutex;
use ratescope_core::display::SummaryDisplay;
use ratescope_core::models::metrics::{CounterDelta, MetricsSnapshot, SessionCounters};
use ratescope_core::models::series::SeriesPoint;
use std::sync::atomic::{AtomicU8, Ordering};
use uuid::Uuid;

use crate::buffer::TimeSeriesBuffer;

/// 테스트 오케스트레이터 실행 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
}

impl RunState {
    fn as_u8(self) -> u8 {
        match self {
            RunState::Idle => 0,
            RunState::Running => 1,
        }
    }

    fn from_u8(value: u8) -> Self {
        if value == 0 {
            RunState::Idle
        } else {
            RunState::Running
        }
    }
}

/// 원자적 check-and-set이 가능한 실행 상태 셀
#[derive(Debug)]
pub struct RunStateCell(AtomicU8);

impl RunStateCell {
    pub fn new() -> Self {
        Self(AtomicU8::new(RunState::Idle.as_u8()))
    }

    pub fn get(&self) -> RunState {
        RunState::from_u8(self.0.load(Ordering::Acquire))
    }

    /// Idle → Running. 이미 Running이면 false.
    pub fn try_begin(&self) -> bool {
        self.0
            .compare_exchange(
                RunState::Idle.as_u8(),
                RunState::Running.as_u8(),
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    /// 무조건 Idle로 복귀
    pub fn finish(&self) {
        self.0.store(RunState::Idle.as_u8(), Ordering::Release);
    }
}

impl Default for RunStateCell {
    fn default() -> Self {
        Self::new()
    }
}

/// 스냅샷 반영 결과
#[derive(Debug, Clone)]
pub struct SnapshotApplied {
    pub delta: CounterDelta,
    /// 추가된 점과, 그로 인해 밀려난 점
    pub appended: Option<(SeriesPoint, Option<SeriesPoint>)>,
    pub summary: SummaryDisplay,
}

/// 폴링 통계
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollStats {
    pub succeeded: u64,
    pub failed: u64,
    pub appended: u64,
    pub suppressed: u64,
}

#[derive(Debug)]
struct SessionData {
    counters: SessionCounters,
    buffer: TimeSeriesBuffer,
    summary: SummaryDisplay,
    last_snapshot: Option<MetricsSnapshot>,
    stats: PollStats,
}

/// 하나의 대시보드 세션
#[derive(Debug)]
pub struct Session {
    id: Uuid,
    data: Mutex<SessionData>,
    run_state: RunStateCell,
}

impl Session {
    /// 새 세션 생성 (카운터 0, 빈 버퍼)
    pub fn new(buffer_capacity: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            data: Mutex::new(SessionData {
                counters: SessionCounters::default(),
                buffer: TimeSeriesBuffer::new(buffer_capacity),
                summary: SummaryDisplay::default(),
                last_snapshot: None,
                stats: PollStats::default(),
            }),
            run_state: RunStateCell::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn run_state(&self) -> &RunStateCell {
        &self.run_state
    }

    /// 성공한 폴링의 스냅샷 반영
    pub fn apply_snapshot(&self, snapshot: &MetricsSnapshot) -> SnapshotApplied {
        self.apply_snapshot_with(snapshot, |_| {})
    }

    /// 스냅샷 반영 후 같은 락 구간 안에서 `on_applied` 호출
    ///
    /// 델타 판정 → (필요 시) 버퍼 추가 → 요약 갱신 → 카운터 갱신을
    /// 한 번의 락 구간에서 끝낸다. 시각도 락을 잡은 뒤 읽으므로, 동시에 들어온
    /// 폴링끼리도 버퍼 순서와 라벨 시각 순서가 같다. `on_applied`에서 발행한
    /// 이벤트 역시 버퍼와 같은 순서로 나간다. 콜백 안에서 await하거나
    /// 세션을 다시 잠그면 안 된다.
    pub fn apply_snapshot_with<F>(&self, snapshot: &MetricsSnapshot, on_applied: F) -> SnapshotApplied
    where
        F: FnOnce(&SnapshotApplied),
    {
        let mut data = self.data.lock();
        let now = Utc::now();

        let delta = data.counters.delta_to(snapshot);
        let appended = if delta.has_new_traffic() {
            let point = SeriesPoint::at(now, snapshot.allowed, snapshot.blocked);
            let evicted = data.buffer.append(point.clone());
            data.stats.appended += 1;
            Some((point, evicted))
        } else {
            data.stats.suppressed += 1;
            None
        };

        data.summary = SummaryDisplay::from_snapshot(snapshot);
        data.counters = snapshot.counters();
        data.last_snapshot = Some(*snapshot);
        data.stats.succeeded += 1;

        let applied = SnapshotApplied {
            delta,
            appended,
            summary: data.summary.clone(),
        };
        on_applied(&applied);
        applied
    }

    /// 실패한 폴링 기록 (카운터/버퍼/요약은 그대로)
    pub fn record_poll_failure(&self) {
        self.data.lock().stats.failed += 1;
    }

    pub fn counters(&self) -> SessionCounters {
        self.data.lock().counters
    }

    pub fn summary(&self) -> SummaryDisplay {
        self.data.lock().summary.clone()
    }

    pub fn last_snapshot(&self) -> Option<MetricsSnapshot> {
        self.data.lock().last_snapshot
    }

    /// 버퍼 내용 복제본 (오래된 것부터)
    pub fn history(&self) -> Vec<SeriesPoint> {
        self.data.lock().buffer.to_vec()
    }

    pub fn history_len(&self) -> usize {
        self.data.lock().buffer.len()
    }

    pub fn poll_stats(&self) -> PollStats {
        self.data.lock().stats
    }
}
