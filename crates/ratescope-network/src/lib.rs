//! # ratescope-network
//!
//! 레이트 리미터 서버와의 HTTP 통신 어댑터.
//! `GET /api/metrics`, `POST /api/test` 두 엔드포인트만 다루며,
//! 폴링 결과로 서버 연결 상태를 추적한다.
//!
//! ## 사용 예시
//!
//! ```rust,ignore
//! use ratescope_network::http_client::HttpRateLimiterClient;
//! use ratescope_network::connectivity::ConnectivityManager;
//!
//! let api = HttpRateLimiterClient::new("http://localhost:3001", None)?;
//! let connectivity = ConnectivityManager::new(3);
//! ```

pub mod connectivity;
pub mod http_client;
