//! # ratescope-app
//!
//! 레이트 리미터 대시보드 엔진. 세션 상태, 메트릭 폴러, 테스트 실행
//! 오케스트레이터, 렌더 어댑터를 제공하고 `ratescope` 바이너리가 이를 조립한다.

pub mod buffer;
pub mod console;
pub mod controller;
pub mod controls;
pub mod event_bus;
pub mod lifecycle;
pub mod notifier;
pub mod orchestrator;
pub mod poller;
pub mod render;
pub mod scheduler;
pub mod session;
