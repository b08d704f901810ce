//! ratescope 도메인 모델.
//!
//! 레이트 리미터 서버 API와 주고받는 구조체, 그리고 차트 버퍼 레코드를 정의한다.
//! 와이어 모델은 모두 `serde` Serialize/Deserialize를 구현한다.

pub mod metrics;
pub mod series;
pub mod test_run;
