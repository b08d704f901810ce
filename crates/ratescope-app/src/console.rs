//! 콘솔 프런트엔드.
//!
//! 표준 입력 한 줄을 명령 하나로 해석해 컨트롤 패널과 오케스트레이터를 조작한다.

use ratescope_core::error::CoreError;
use ratescope_core::models::test_run::Algorithm;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::controller::DashboardController;
use crate::controls::SliderKind;
use crate::lifecycle::LifecycleManager;

const HELP: &str = "\
commands:
  run              테스트 실행
  algo <name>      알고리즘 선택 (token_bucket, leaky_bucket, fixed_window, sliding_window)
  max <n>          max_requests (1-1000)
  window <n>       window_seconds (1-60)
  requests <n>     num_requests (0-1000)
  status           현재 요약과 컨트롤 값
  history          시계열 버퍼 내용
  help             이 도움말
  quit             종료";

/// 콘솔 명령
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Run,
    Algorithm(Algorithm),
    Slider(SliderKind, u64),
    Status,
    History,
    Help,
    Quit,
}

/// 한 줄 해석. 빈 줄은 `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<ConsoleCommand>, CoreError> {
    let mut parts = line.split_whitespace();
    let Some(head) = parts.next() else {
        return Ok(None);
    };
    let arg = parts.next();
    if parts.next().is_some() {
        return Err(CoreError::validation("command", format!("인자가 너무 많음: {line}")));
    }

    let command = match (head.to_ascii_lowercase().as_str(), arg) {
        ("run", None) => ConsoleCommand::Run,
        ("status", None) => ConsoleCommand::Status,
        ("history", None) => ConsoleCommand::History,
        ("help" | "?", None) => ConsoleCommand::Help,
        ("quit" | "exit", None) => ConsoleCommand::Quit,
        ("algo" | "algorithm", Some(name)) => ConsoleCommand::Algorithm(name.parse()?),
        (name @ ("max" | "window" | "requests"), Some(value)) => {
            let kind: SliderKind = name.parse()?;
            let value = value.parse::<u64>().map_err(|_| {
                CoreError::validation(kind.to_string(), format!("숫자가 아님: {value}"))
            })?;
            ConsoleCommand::Slider(kind, value)
        }
        ("algo" | "algorithm" | "max" | "window" | "requests", None) => {
            return Err(CoreError::validation("command", format!("인자 필요: {head}")));
        }
        _ => {
            return Err(CoreError::validation("command", format!("알 수 없는 명령: {line}")));
        }
    };
    Ok(Some(command))
}

/// 명령 하나 실행. 종료 명령이면 false.
fn execute(command: ConsoleCommand, controller: &DashboardController) -> bool {
    match command {
        ConsoleCommand::Run => {
            if !controller.controls().trigger().enabled {
                println!("이미 테스트가 실행 중입니다");
                return true;
            }
            // 결과는 렌더 버스와 알림으로 전달된다
            drop(controller.spawn_test_run());
        }
        ConsoleCommand::Algorithm(algorithm) => {
            controller.controls().select_algorithm(algorithm);
            println!("algorithm = {algorithm}");
        }
        ConsoleCommand::Slider(kind, value) => {
            controller.controls().set_slider(kind, value);
            println!("{kind} = {}", controller.controls().slider_display(kind));
        }
        ConsoleCommand::Status => print_status(controller),
        ConsoleCommand::History => {
            let history = controller.session().history();
            if history.is_empty() {
                println!("(기록 없음)");
            }
            for point in history {
                println!("{}  allowed={}  blocked={}", point.label, point.allowed, point.blocked);
            }
        }
        ConsoleCommand::Help => println!("{HELP}"),
        ConsoleCommand::Quit => return false,
    }
    true
}

fn print_status(controller: &DashboardController) {
    let summary = controller.session().summary();
    let controls = controller.controls();
    let connectivity = controller.poller().connectivity();
    println!(
        "total {} | allowed {} | blocked {} | allow rate {}",
        summary.total, summary.allowed, summary.blocked, summary.allow_rate
    );
    println!(
        "algorithm {} | max {} | window {}s | requests {} | {}",
        controls.algorithm(),
        controls.slider_display(SliderKind::MaxRequests),
        controls.slider_display(SliderKind::WindowSeconds),
        controls.slider_display(SliderKind::NumRequests),
        controls.trigger().label,
    );
    println!("server {:?}", connectivity.status());
}

/// stdin 명령 루프. EOF 또는 `quit`이면 종료 신호를 보낸다.
pub async fn run_console(
    controller: DashboardController,
    lifecycle: &LifecycleManager,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("{HELP}");

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line,
            _ = shutdown_rx.changed() => break,
        };

        let line = match line {
            Ok(Some(line)) => line,
            Ok(None) => {
                debug!("stdin EOF");
                break;
            }
            Err(e) => {
                warn!("stdin 읽기 실패: {e}");
                break;
            }
        };

        match parse_command(&line) {
            Ok(Some(command)) => {
                if !execute(command, &controller) {
                    break;
                }
            }
            Ok(None) => {}
            Err(e) => println!("{e}"),
        }
    }

    info!("콘솔 종료");
    lifecycle.shutdown();
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn parses_simple_commands() {
        assert_eq!(parse_command("run").unwrap(), Some(ConsoleCommand::Run));
        assert_eq!(parse_command("  STATUS ").unwrap(), Some(ConsoleCommand::Status));
        assert_eq!(parse_command("exit").unwrap(), Some(ConsoleCommand::Quit));
        assert_eq!(parse_command("").unwrap(), None);
    }

    #[test]
    fn parses_algorithm_and_sliders() {
        assert_eq!(
            parse_command("algo sliding-window").unwrap(),
            Some(ConsoleCommand::Algorithm(Algorithm::SlidingWindow))
        );
        assert_eq!(
            parse_command("window 30").unwrap(),
            Some(ConsoleCommand::Slider(SliderKind::WindowSeconds, 30))
        );
        assert_eq!(
            parse_command("requests 0").unwrap(),
            Some(ConsoleCommand::Slider(SliderKind::NumRequests, 0))
        );
    }

    #[test]
    fn rejects_bad_input() {
        assert_matches!(
            parse_command("max abc"),
            Err(CoreError::Validation { field, .. }) if field == "max_requests"
        );
        assert_matches!(parse_command("algo"), Err(CoreError::Validation { .. }));
        assert_matches!(parse_command("algo gcra"), Err(CoreError::Validation { .. }));
        assert_matches!(parse_command("run now"), Err(CoreError::Validation { .. }));
        assert_matches!(parse_command("launch"), Err(CoreError::Validation { .. }));
    }
}
