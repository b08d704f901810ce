//! 터미널 사용자 알림.

use async_trait::async_trait;
use ratescope_core::ports::notifier::UserNotifier;
use tracing::debug;

/// stderr에 눈에 띄는 상자로 실패를 알린다
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    fn boxed(message: &str) -> String {
        let width = message.chars().count() + 4;
        let border = "─".repeat(width);
        format!("┌{border}┐\n│  {message}  │\n└{border}┘")
    }
}

#[async_trait]
impl UserNotifier for ConsoleNotifier {
    async fn alert(&self, message: &str) {
        debug!("사용자 알림 표시");
        eprintln!("{}", Self::boxed(message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boxed_message_has_three_lines() {
        let boxed = ConsoleNotifier::boxed("down");
        let lines: Vec<_> = boxed.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "│  down  │");
        assert_eq!(lines[0].chars().count(), lines[1].chars().count());
    }
}
