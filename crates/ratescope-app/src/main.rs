//! # ratescope
//!
//! 레이트 리미터 데모 서버용 터미널 대시보드.
//! 설정 로드, 어댑터 생성, 폴링/렌더/콘솔 태스크 조립.

use anyhow::{Context, Result};
use clap::Parser;
use ratescope_app::console::run_console;
use ratescope_app::controller::DashboardController;
use ratescope_app::lifecycle::LifecycleManager;
use ratescope_app::notifier::ConsoleNotifier;
use ratescope_app::orchestrator::TriggerOutcome;
use ratescope_app::render::{RenderAdapter, TerminalChart};
use ratescope_core::config::{AppConfig, BUFFER_CAPACITY};
use ratescope_core::config_manager::ConfigManager;
use ratescope_network::http_client::HttpRateLimiterClient;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// 레이트 리미터 대시보드
#[derive(Parser, Debug)]
#[command(name = "ratescope")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 서버 URL 지정 (기본: http://localhost:3001)
    #[arg(long, short = 's')]
    server: Option<String>,

    /// 설정 파일 경로 (기본: 플랫폼 설정 디렉토리의 config.json)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info")]
    log_level: String,

    /// 테스트 1회 실행 후 종료 (콘솔 없이)
    #[arg(long)]
    run_test: bool,
}

fn print_banner(base_url: &str) {
    println!();
    println!("╔══════════════════════════════════════════════╗");
    println!("║   ratescope · rate limiter dashboard         ║");
    println!("╚══════════════════════════════════════════════╝");
    println!("  server: {base_url}");
    println!();
}

/// 설정 파일 로드 후 CLI 인자 적용 (CLI 값은 파일에 저장하지 않는다)
fn load_config(args: &Args) -> Result<AppConfig> {
    let manager = match &args.config {
        Some(path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    }
    .context("설정 로드 실패")?;
    info!("설정 파일: {:?}", manager.config_path());

    let mut config = manager.get();
    if let Some(server) = &args.server {
        config.server.base_url = server.clone();
        config.validate().context("서버 URL 검증 실패")?;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_filter = format!(
        "ratescope={0},ratescope_app={0},ratescope_core={0},ratescope_network={0}",
        args.log_level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(&args)?;
    print_banner(&config.server.base_url);

    let api = Arc::new(
        HttpRateLimiterClient::new(&config.server.base_url, config.server.request_timeout())
            .context("HTTP 클라이언트 생성 실패")?,
    );
    let controller = DashboardController::new(&config, api, Arc::new(ConsoleNotifier));
    let lifecycle = Arc::new(LifecycleManager::new());

    let render_handle = tokio::spawn(
        RenderAdapter::new(TerminalChart::new(BUFFER_CAPACITY))
            .run(controller.subscribe(), lifecycle.subscribe()),
    );

    if args.run_test {
        // 시작 시 한 번 폴링해 기준 카운터를 잡는다
        if let Err(e) = controller.poller().poll().await {
            warn!("초기 메트릭 조회 실패: {e}");
        }
        let outcome = controller.orchestrator().trigger().await;
        lifecycle.shutdown();
        let _ = render_handle.await;
        return match outcome {
            TriggerOutcome::Completed(report) => {
                println!(
                    "allowed {} | blocked {} | {} | {}",
                    report.allowed, report.blocked, report.duration, report.throughput
                );
                let marks: String = report
                    .indicators
                    .iter()
                    .map(|i| if i.allowed { '●' } else { '○' })
                    .collect();
                println!("{marks}");
                Ok(())
            }
            TriggerOutcome::Failed(e) => Err(e).context("테스트 실행 실패"),
            TriggerOutcome::Ignored => Ok(()),
        };
    }

    let poll_handle = controller.scheduler().spawn(lifecycle.subscribe());

    let console_lifecycle = lifecycle.clone();
    let console_controller = controller.clone();
    let console_shutdown = lifecycle.subscribe();
    let console_handle = tokio::spawn(async move {
        run_console(console_controller, &console_lifecycle, console_shutdown).await;
    });

    let mut shutdown_rx = lifecycle.subscribe();
    tokio::select! {
        _ = lifecycle.wait_for_signal() => {}
        _ = shutdown_rx.changed() => {}
    }

    let _ = poll_handle.await;
    let _ = render_handle.await;
    // stdin 읽기는 취소되지 않을 수 있으므로 기다리지 않는다
    console_handle.abort();

    info!("ratescope 종료");
    Ok(())
}
