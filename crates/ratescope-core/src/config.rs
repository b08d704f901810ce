//! 애플리케이션 설정 구조체.
//!
//! 서버 URL, 연결 끊김 임계값, 테스트 컨트롤 초기값 등 시작 시점 설정을
//! 정의한다. 실행 중에는 바뀌지 않는다. 폴링 주기와 버퍼 용량은 설정이 아닌
//! 상수([`POLL_INTERVAL`], [`BUFFER_CAPACITY`])다. [`crate::config_manager::ConfigManager`]가
//! JSON 파일로 로드/저장한다.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::CoreError;
use crate::models::test_run::Algorithm;

/// 메트릭 폴링 간격 (2초, 설정으로 바꿀 수 없음)
pub const POLL_INTERVAL: Duration = Duration::from_millis(2_000);

/// 시계열 버퍼 용량 (최근 20개, 설정으로 바꿀 수 없음)
pub const BUFFER_CAPACITY: usize = 20;

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// 서버 연결 설정
    #[serde(default)]
    pub server: ServerConfig,
    /// 메트릭 폴링 설정
    #[serde(default)]
    pub poller: PollerConfig,
    /// 테스트 컨트롤 초기값
    #[serde(default)]
    pub controls: ControlDefaults,
    /// 렌더 이벤트 채널 설정
    #[serde(default)]
    pub events: EventConfig,
}

// ============================================================
// 서버
// ============================================================

/// 서버 연결 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 레이트 리미터 서버 주소
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// 요청 타임아웃 (밀리초). None이면 전송 계층 기본값을 따른다.
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_ms: None,
        }
    }
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}

fn default_base_url() -> String {
    "http://localhost:3001".to_string()
}

// ============================================================
// 폴러
// ============================================================

/// 메트릭 폴링 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollerConfig {
    /// 연속 실패 시 연결 끊김으로 간주하는 횟수
    #[serde(default = "default_offline_threshold")]
    pub offline_threshold: u64,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            offline_threshold: default_offline_threshold(),
        }
    }
}

fn default_offline_threshold() -> u64 {
    3
}

// ============================================================
// 테스트 컨트롤
// ============================================================

/// 알고리즘 선택기와 슬라이더의 시작 값
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlDefaults {
    #[serde(default)]
    pub algorithm: Algorithm,
    #[serde(default = "default_max_requests")]
    pub max_requests: u64,
    #[serde(default = "default_window_seconds")]
    pub window_seconds: u64,
    #[serde(default = "default_num_requests")]
    pub num_requests: u32,
}

impl Default for ControlDefaults {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            max_requests: default_max_requests(),
            window_seconds: default_window_seconds(),
            num_requests: default_num_requests(),
        }
    }
}

fn default_max_requests() -> u64 {
    100
}

fn default_window_seconds() -> u64 {
    10
}

fn default_num_requests() -> u32 {
    50
}

// ============================================================
// 이벤트
// ============================================================

/// 렌더 이벤트 브로드캐스트 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventConfig {
    /// broadcast 채널 용량
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
        }
    }
}

fn default_channel_capacity() -> usize {
    256
}

impl AppConfig {
    /// 기본 설정 생성
    pub fn default_config() -> Self {
        Self::default()
    }

    /// 설정값 검증
    pub fn validate(&self) -> Result<(), CoreError> {
        let url = url::Url::parse(&self.server.base_url).map_err(|e| {
            CoreError::Config(format!("잘못된 서버 URL '{}': {e}", self.server.base_url))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(CoreError::Config(format!(
                "지원하지 않는 URL 스킴: {}",
                url.scheme()
            )));
        }
        if self.server.request_timeout_ms == Some(0) {
            return Err(CoreError::validation("server.request_timeout_ms", "0보다 커야 합니다"));
        }
        if self.poller.offline_threshold == 0 {
            return Err(CoreError::validation("poller.offline_threshold", "0보다 커야 합니다"));
        }
        if self.events.channel_capacity == 0 {
            return Err(CoreError::validation("events.channel_capacity", "0보다 커야 합니다"));
        }
        Ok(())
    }
}
