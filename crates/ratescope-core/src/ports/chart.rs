//! 차트 렌더러 포트.
//!
//! 렌더러는 권한 있는 시계열 버퍼의 거울일 뿐이다. 같은 용량으로
//! 자체 시리즈 배열을 잘라내며, 버퍼와 인덱스가 항상 맞아야 한다.

/// 점 추가/다시 그리기만 받는 차트 소비자
pub trait ChartSink: Send {
    /// 시리즈 끝에 점 추가 (용량 초과 시 앞에서 하나 제거)
    fn append_point(&mut self, label: &str, allowed: u64, blocked: u64);

    /// 현재 보관 중인 점 수
    fn len(&self) -> usize;

    /// 다시 그리기. 인터벌 갱신은 `animated = false`로 호출된다.
    fn redraw(&mut self, animated: bool);
}
