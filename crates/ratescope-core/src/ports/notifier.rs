//! 사용자 알림 포트.
//!
//! 테스트 실행 실패처럼 사용자가 반드시 확인해야 하는 메시지를 띄운다.

use async_trait::async_trait;

/// 차단형(blocking) 사용자 알림
#[async_trait]
pub trait UserNotifier: Send + Sync {
    /// 실패 알림 표시. 사용자가 확인할 때까지 반환하지 않을 수 있다.
    async fn alert(&self, message: &str);
}
