//! 시계열 버퍼.
//!
//! 최근 N개 점만 보관하는 FIFO 슬라이딩 윈도우. 렌더러의 유일한 데이터 원천이다.
//! 변경 경로는 [`TimeSeriesBuffer::append`] 하나뿐이다.

use ratescope_core::config::BUFFER_CAPACITY;
use ratescope_core::models::series::SeriesPoint;
use std::collections::VecDeque;

/// 고정 용량 시계열 버퍼
#[derive(Debug, Clone)]
pub struct TimeSeriesBuffer {
    points: VecDeque<SeriesPoint>,
    capacity: usize,
}

impl TimeSeriesBuffer {
    /// 새 버퍼 생성 (용량은 최소 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            points: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// 끝에 점 추가. 용량을 넘으면 맨 앞 점 하나를 제거해 반환한다.
    pub fn append(&mut self, point: SeriesPoint) -> Option<SeriesPoint> {
        self.points.push_back(point);
        if self.points.len() > self.capacity {
            self.points.pop_front()
        } else {
            None
        }
    }

    /// 오래된 것부터 순회
    pub fn iter(&self) -> impl Iterator<Item = &SeriesPoint> {
        self.points.iter()
    }

    /// 가장 최근 점
    pub fn latest(&self) -> Option<&SeriesPoint> {
        self.points.back()
    }

    /// 현재 내용 복제본 (오래된 것부터)
    pub fn to_vec(&self) -> Vec<SeriesPoint> {
        self.points.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for TimeSeriesBuffer {
    fn default() -> Self {
        Self::new(BUFFER_CAPACITY)
    }
}
