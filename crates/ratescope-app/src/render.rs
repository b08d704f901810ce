//! 렌더 어댑터.
//!
//! 렌더 버스 이벤트를 받아 차트 싱크와 결과 화면 모델에 반영한다.
//! [`ChartMirror`]는 권한 있는 시계열 버퍼와 같은 용량으로 자체 시리즈를
//! 잘라내는 거울이며, 버퍼를 직접 수정하지 않는다.

use ratescope_core::display::SummaryDisplay;
use ratescope_core::models::test_run::TestRunReport;
use ratescope_core::ports::chart::ChartSink;
use ratescope_network::connectivity::ConnectionStatus;
use std::collections::VecDeque;
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use crate::controls::{TriggerState, IDLE_LABEL};
use crate::event_bus::RenderEvent;

/// 인덱스가 맞춰진 세 시리즈 (라벨, allowed, blocked)
#[derive(Debug, Clone)]
pub struct ChartMirror {
    capacity: usize,
    labels: VecDeque<String>,
    allowed: VecDeque<u64>,
    blocked: VecDeque<u64>,
    redraws: u64,
    last_animated: Option<bool>,
}

impl ChartMirror {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            labels: VecDeque::with_capacity(capacity + 1),
            allowed: VecDeque::with_capacity(capacity + 1),
            blocked: VecDeque::with_capacity(capacity + 1),
            redraws: 0,
            last_animated: None,
        }
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    pub fn allowed_series(&self) -> impl Iterator<Item = u64> + '_ {
        self.allowed.iter().copied()
    }

    pub fn blocked_series(&self) -> impl Iterator<Item = u64> + '_ {
        self.blocked.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn redraw_count(&self) -> u64 {
        self.redraws
    }

    pub fn last_redraw_animated(&self) -> Option<bool> {
        self.last_animated
    }
}

impl ChartSink for ChartMirror {
    fn append_point(&mut self, label: &str, allowed: u64, blocked: u64) {
        self.labels.push_back(label.to_string());
        self.allowed.push_back(allowed);
        self.blocked.push_back(blocked);
        if self.labels.len() > self.capacity {
            self.labels.pop_front();
            self.allowed.pop_front();
            self.blocked.pop_front();
        }
    }

    fn len(&self) -> usize {
        self.labels.len()
    }

    fn redraw(&mut self, animated: bool) {
        self.redraws += 1;
        self.last_animated = Some(animated);
    }
}

/// 터미널 출력 차트: 다시 그릴 때마다 최근 추세를 한 줄로 찍는다
#[derive(Debug)]
pub struct TerminalChart {
    mirror: ChartMirror,
}

impl TerminalChart {
    pub fn new(capacity: usize) -> Self {
        Self {
            mirror: ChartMirror::new(capacity),
        }
    }

    /// allowed/blocked 시리즈를 스파크라인으로 변환
    pub fn sparkline(series: &[u64]) -> String {
        const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
        let max = series.iter().copied().max().unwrap_or(0);
        if max == 0 {
            return BARS[0].to_string().repeat(series.len());
        }
        series
            .iter()
            .map(|&v| {
                let idx = (v as u128 * (BARS.len() as u128 - 1) / max as u128) as usize;
                BARS[idx]
            })
            .collect()
    }
}

impl ChartSink for TerminalChart {
    fn append_point(&mut self, label: &str, allowed: u64, blocked: u64) {
        self.mirror.append_point(label, allowed, blocked);
    }

    fn len(&self) -> usize {
        self.mirror.len()
    }

    fn redraw(&mut self, animated: bool) {
        self.mirror.redraw(animated);
        let allowed: Vec<u64> = self.mirror.allowed_series().collect();
        let blocked: Vec<u64> = self.mirror.blocked_series().collect();
        let last = self.mirror.labels().last().unwrap_or("-").to_string();
        println!(
            "[{last}] allowed {} {} | blocked {} {}",
            Self::sparkline(&allowed),
            allowed.last().copied().unwrap_or(0),
            Self::sparkline(&blocked),
            blocked.last().copied().unwrap_or(0),
        );
    }
}

/// 결과 화면 모델 (요약, 버튼, 마지막 테스트 결과)
#[derive(Debug, Clone)]
pub struct ResultView {
    pub summary: SummaryDisplay,
    pub trigger: TriggerState,
    /// 결과 패널은 첫 성공 전까지 숨겨져 있다
    pub report: Option<TestRunReport>,
    pub last_failure: Option<String>,
    pub connection: ConnectionStatus,
    /// 버퍼와 거울의 밀어내기가 어긋난 횟수 (항상 0이어야 한다)
    pub misaligned_points: u64,
}

impl Default for ResultView {
    fn default() -> Self {
        Self {
            summary: SummaryDisplay::default(),
            trigger: TriggerState {
                enabled: true,
                label: IDLE_LABEL.to_string(),
            },
            report: None,
            last_failure: None,
            connection: ConnectionStatus::Unknown,
            misaligned_points: 0,
        }
    }
}

/// 렌더 버스 → 차트 싱크 + 결과 화면
pub struct RenderAdapter<S: ChartSink> {
    sink: S,
    view: ResultView,
}

impl<S: ChartSink> RenderAdapter<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            view: ResultView::default(),
        }
    }

    /// 이벤트 하나 반영
    pub fn apply(&mut self, event: &RenderEvent) {
        match event {
            RenderEvent::SummaryUpdated(summary) => {
                self.view.summary = summary.clone();
            }
            RenderEvent::PointAppended { point, evicted } => {
                let before = self.sink.len();
                self.sink
                    .append_point(&point.label, point.allowed, point.blocked);
                // 버퍼가 밀어냈으면 거울 길이는 그대로, 아니면 하나 늘어야 한다
                let mirror_evicted = self.sink.len() == before;
                if mirror_evicted != evicted.is_some() {
                    self.view.misaligned_points += 1;
                    warn!(
                        "차트 거울과 버퍼 불일치: buffer_evicted={}, mirror_len={}",
                        evicted.is_some(),
                        self.sink.len()
                    );
                }
            }
            RenderEvent::Redraw { animated } => self.sink.redraw(*animated),
            RenderEvent::TriggerChanged(trigger) => {
                self.view.trigger = trigger.clone();
            }
            RenderEvent::TestStarted(config) => {
                debug!("테스트 제출됨: {}", config.algorithm);
            }
            RenderEvent::TestCompleted(report) => {
                self.view.last_failure = None;
                self.view.report = Some(report.clone());
            }
            RenderEvent::TestFailed(message) => {
                self.view.last_failure = Some(message.clone());
            }
            RenderEvent::ConnectionChanged(status) => {
                self.view.connection = *status;
            }
        }
    }

    /// 종료 신호까지 버스 이벤트 처리
    pub async fn run(
        mut self,
        mut rx: broadcast::Receiver<RenderEvent>,
        mut shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        loop {
            tokio::select! {
                received = rx.recv() => match received {
                    Ok(event) => self.apply(&event),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("렌더 이벤트 {skipped}개 누락");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
                _ = shutdown_rx.changed() => break,
            }
        }
        info!("렌더 루프 종료");
        self
    }

    pub fn view(&self) -> &ResultView {
        &self.view
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}
