//! # ratescope-core
//!
//! ratescope 도메인 모델, 포트(trait) 정의, 에러 타입.
//! 모든 크레이트가 공유하는 핵심 타입과 인터페이스를 제공한다.
//!
//! ## 구조
//!
//! - [`models`]: 메트릭 스냅샷, 시계열 점, 테스트 실행 모델 (serde)
//! - [`ports`]: API 클라이언트/알림/차트 포트 인터페이스
//! - [`error`]: 핵심 에러 타입 (thiserror)
//! - [`config`]: 애플리케이션 설정 구조체
//! - [`config_manager`]: 설정 파일 관리 (로드/저장)
//! - [`display`]: 요약 표시용 숫자 포맷

pub mod config;
pub mod config_manager;
pub mod display;
pub mod error;
pub mod models;
pub mod ports;

#[cfg(test)]
mod tests {
    use crate::config::AppConfig;

    #[test]
    fn config_defaults() {
        let config = AppConfig::default_config();
        assert_eq!(config.server.base_url, "http://localhost:3001");
        assert_eq!(config.poller.offline_threshold, 3);
        assert_eq!(config.events.channel_capacity, 256);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_rejects_non_http_scheme() {
        let mut config = AppConfig::default_config();
        config.server.base_url = "ftp://localhost:3001".to_string();
        assert!(config.validate().is_err());
    }
}
