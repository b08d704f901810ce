//! 부하 테스트 실행 모델.
//!
//! `POST /api/test` 요청/응답과, 응답을 화면용으로 가공한 리포트.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::display;
use crate::error::CoreError;

/// 서버가 지원하는 레이트 리밋 알고리즘
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    #[default]
    TokenBucket,
    LeakyBucket,
    FixedWindow,
    SlidingWindow,
}

impl Algorithm {
    /// 선택기에 노출되는 전체 목록
    pub const ALL: [Algorithm; 4] = [
        Algorithm::TokenBucket,
        Algorithm::LeakyBucket,
        Algorithm::FixedWindow,
        Algorithm::SlidingWindow,
    ];

    /// 와이어 포맷 이름
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::TokenBucket => "token_bucket",
            Algorithm::LeakyBucket => "leaky_bucket",
            Algorithm::FixedWindow => "fixed_window",
            Algorithm::SlidingWindow => "sliding_window",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Algorithm::ALL
            .into_iter()
            .find(|a| a.as_str() == normalized)
            .ok_or_else(|| {
                CoreError::validation("algorithm", format!("알 수 없는 알고리즘: {s}"))
            })
    }
}

/// 테스트 실행 요청: 제출 직전에 컨트롤 값에서 새로 만든다
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestRunConfig {
    pub algorithm: Algorithm,
    /// 윈도우당 허용 요청 수 (> 0)
    pub max_requests: u64,
    /// 윈도우 길이 (초, > 0)
    pub window_seconds: u64,
    /// 전송할 요청 수 (0이면 빈 결과)
    pub num_requests: u32,
}

impl TestRunConfig {
    /// 서버에 보내기 전 값 검증
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.max_requests == 0 {
            return Err(CoreError::validation("max_requests", "0보다 커야 합니다"));
        }
        if self.window_seconds == 0 {
            return Err(CoreError::validation("window_seconds", "0보다 커야 합니다"));
        }
        Ok(())
    }
}

/// 테스트 실행 결과 (서버 응답, 렌더링 후 폐기)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestRunResult {
    pub allowed: u32,
    pub blocked: u32,
    pub duration_ms: f64,
    /// 서버가 계산한 처리량. 실행 시간이 0이면 서버가 `null`을 보낸다.
    #[serde(deserialize_with = "null_as_zero")]
    pub requests_per_sec: f64,
    /// 요청별 허용 여부 (원래 순서)
    pub results: Vec<bool>,
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

impl TestRunResult {
    /// `results` 길이가 allowed+blocked와 일치하는지
    pub fn is_consistent(&self) -> bool {
        self.results.len() as u64 == u64::from(self.allowed) + u64::from(self.blocked)
    }
}

/// 요청 하나의 통과/차단 표시
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutcomeIndicator {
    /// 1부터 시작하는 위치
    pub position: usize,
    pub allowed: bool,
    /// 툴팁 텍스트 (`Request 3: Blocked`)
    pub title: String,
}

impl OutcomeIndicator {
    pub fn new(position: usize, allowed: bool) -> Self {
        let outcome = if allowed { "Allowed" } else { "Blocked" };
        Self {
            position,
            allowed,
            title: format!("Request {position}: {outcome}"),
        }
    }
}

/// 화면에 표시할 테스트 결과 요약
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestRunReport {
    pub config: TestRunConfig,
    pub allowed: String,
    pub blocked: String,
    pub duration: String,
    pub throughput: String,
    pub indicators: Vec<OutcomeIndicator>,
}

impl TestRunReport {
    /// 응답을 표시용 필드와 표시자 목록으로 변환
    pub fn render(config: TestRunConfig, result: &TestRunResult) -> Self {
        let indicators = result
            .results
            .iter()
            .enumerate()
            .map(|(i, &allowed)| OutcomeIndicator::new(i + 1, allowed))
            .collect();

        Self {
            config,
            allowed: result.allowed.to_string(),
            blocked: result.blocked.to_string(),
            duration: display::duration_ms(result.duration_ms),
            throughput: display::throughput(result.requests_per_sec),
            indicators,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn config(num_requests: u32) -> TestRunConfig {
        TestRunConfig {
            algorithm: Algorithm::SlidingWindow,
            max_requests: 10,
            window_seconds: 60,
            num_requests,
        }
    }

    #[test]
    fn config_serializes_to_wire_format() {
        let json = serde_json::to_value(config(20)).unwrap();
        assert_eq!(json["algorithm"], "sliding_window");
        assert_eq!(json["max_requests"], 10);
        assert_eq!(json["window_seconds"], 60);
        assert_eq!(json["num_requests"], 20);
    }

    #[test]
    fn algorithm_from_str_accepts_wire_and_dashed_names() {
        assert_eq!("token_bucket".parse::<Algorithm>().unwrap(), Algorithm::TokenBucket);
        assert_eq!("Leaky-Bucket".parse::<Algorithm>().unwrap(), Algorithm::LeakyBucket);
        assert_matches!(
            "gcra".parse::<Algorithm>(),
            Err(CoreError::Validation { field, .. }) if field == "algorithm"
        );
    }

    #[test]
    fn config_validation() {
        assert!(config(0).validate().is_ok());
        let mut bad = config(5);
        bad.max_requests = 0;
        assert_matches!(bad.validate(), Err(CoreError::Validation { field, .. }) if field == "max_requests");
        let mut bad = config(5);
        bad.window_seconds = 0;
        assert_matches!(bad.validate(), Err(CoreError::Validation { field, .. }) if field == "window_seconds");
    }

    #[test]
    fn null_throughput_deserializes_as_zero() {
        let json = r#"{"allowed":0,"blocked":0,"duration_ms":0.0,"requests_per_sec":null,"results":[]}"#;
        let result: TestRunResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.requests_per_sec, 0.0);
        assert!(result.results.is_empty());
        assert!(result.is_consistent());
    }

    #[test]
    fn report_preserves_order_and_positions() {
        let result = TestRunResult {
            allowed: 2,
            blocked: 1,
            duration_ms: 1.234,
            requests_per_sec: 2431.7,
            results: vec![true, false, true],
        };
        let report = TestRunReport::render(config(3), &result);
        assert_eq!(report.indicators.len(), 3);
        assert_eq!(report.indicators[0], OutcomeIndicator::new(1, true));
        assert_eq!(report.indicators[1].title, "Request 2: Blocked");
        assert_eq!(report.indicators[2].position, 3);
        assert_eq!(report.duration, "1.23ms");
        assert_eq!(report.throughput, "2,432/s");
    }

    #[test]
    fn empty_results_render_zero_indicators() {
        let result = TestRunResult {
            allowed: 0,
            blocked: 0,
            duration_ms: 0.0,
            requests_per_sec: 0.0,
            results: vec![],
        };
        let report = TestRunReport::render(config(0), &result);
        assert!(report.indicators.is_empty());
        assert_eq!(report.duration, "0.00ms");
        assert_eq!(report.throughput, "0/s");
    }
}
