//! ratescope 핵심 에러 타입.
//!
//! 네트워크 어댑터와 앱 레이어 모두 `CoreError`를 그대로 사용한다.
//! 폴러/오케스트레이터가 구분하는 두 가지 실패 종류는
//! [`CoreError::Transport`]와 [`CoreError::Response`]이다.

use thiserror::Error;

/// 코어 레이어 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 요청 전송 실패 또는 응답 미수신 (연결 거부, 타임아웃 등)
    #[error("전송 에러: {0}")]
    Transport(String),

    /// 비정상 상태 코드 또는 응답 본문 형식 불일치
    #[error("응답 에러{}: {message}", status.map(|s| format!(" ({s})")).unwrap_or_default())]
    Response {
        /// HTTP 상태 코드 (본문 파싱 실패 시 None)
        status: Option<u16>,
        /// 실패 사유
        message: String,
    },

    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 설정값 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// 필드 유효성 검증 실패
    #[error("유효성 검증 실패: {field}: {message}")]
    Validation {
        /// 검증 실패한 필드명
        field: String,
        /// 실패 사유
        message: String,
    },

    /// I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),

    /// 내부 에러 (예상치 못한 상황)
    #[error("내부 에러: {0}")]
    Internal(String),
}

impl CoreError {
    /// 유효성 검증 에러 생성 헬퍼
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// 서버 연결 자체가 실패한 경우인지 (전송 계층 에러)
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}
