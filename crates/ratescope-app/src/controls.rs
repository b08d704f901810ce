//! 테스트 설정 컨트롤 패널.
//!
//! 알고리즘 선택기, 세 개의 슬라이더, 실행 버튼을 UI 없이 표현한다.
//! 슬라이더 값은 입력될 때마다 옆 텍스트 표시에 그대로 반영되며,
//! 이 반영은 네트워크 I/O와 무관하다.

use parking_lot::{Mutex, RwLock};
use ratescope_core::config::ControlDefaults;
use ratescope_core::error::CoreError;
use ratescope_core::models::test_run::{Algorithm, TestRunConfig};
use serde::Serialize;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;
use tracing::debug;

/// 대기 상태 버튼 라벨
pub const IDLE_LABEL: &str = "🚀 Run Test";

/// 실행 중 버튼 라벨
pub const PENDING_LABEL: &str = "⏳ Running test...";

/// 슬라이더 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliderKind {
    MaxRequests,
    WindowSeconds,
    NumRequests,
}

impl SliderKind {
    /// 허용 범위
    pub fn range(&self) -> RangeInclusive<u64> {
        match self {
            SliderKind::MaxRequests => 1..=1_000,
            SliderKind::WindowSeconds => 1..=60,
            SliderKind::NumRequests => 0..=1_000,
        }
    }
}

impl fmt::Display for SliderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SliderKind::MaxRequests => write!(f, "max_requests"),
            SliderKind::WindowSeconds => write!(f, "window_seconds"),
            SliderKind::NumRequests => write!(f, "num_requests"),
        }
    }
}

impl FromStr for SliderKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "max" | "max_requests" => Ok(SliderKind::MaxRequests),
            "window" | "window_seconds" => Ok(SliderKind::WindowSeconds),
            "requests" | "num_requests" => Ok(SliderKind::NumRequests),
            other => Err(CoreError::validation("slider", format!("알 수 없는 슬라이더: {other}"))),
        }
    }
}

/// 값과 그 텍스트 표시를 함께 가진 슬라이더
#[derive(Debug, Clone)]
struct Slider {
    kind: SliderKind,
    value: u64,
    display: String,
}

impl Slider {
    fn new(kind: SliderKind, value: u64) -> Self {
        let mut slider = Self {
            kind,
            value: 0,
            display: String::new(),
        };
        slider.set(value);
        slider
    }

    /// 범위로 자른 뒤 표시까지 갱신. 실제 반영된 값을 반환한다.
    fn set(&mut self, value: u64) -> u64 {
        let range = self.kind.range();
        self.value = value.clamp(*range.start(), *range.end());
        self.display = self.value.to_string();
        self.value
    }
}

/// 실행 버튼 상태
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TriggerState {
    pub enabled: bool,
    pub label: String,
}

impl TriggerState {
    fn idle() -> Self {
        Self {
            enabled: true,
            label: IDLE_LABEL.to_string(),
        }
    }

    fn pending() -> Self {
        Self {
            enabled: false,
            label: PENDING_LABEL.to_string(),
        }
    }
}

#[derive(Debug)]
struct ControlValues {
    algorithm: Algorithm,
    max_requests: Slider,
    window_seconds: Slider,
    num_requests: Slider,
}

impl ControlValues {
    fn slider(&self, kind: SliderKind) -> &Slider {
        match kind {
            SliderKind::MaxRequests => &self.max_requests,
            SliderKind::WindowSeconds => &self.window_seconds,
            SliderKind::NumRequests => &self.num_requests,
        }
    }

    fn slider_mut(&mut self, kind: SliderKind) -> &mut Slider {
        match kind {
            SliderKind::MaxRequests => &mut self.max_requests,
            SliderKind::WindowSeconds => &mut self.window_seconds,
            SliderKind::NumRequests => &mut self.num_requests,
        }
    }
}

/// 컨트롤 패널
#[derive(Debug)]
pub struct ControlPanel {
    values: RwLock<ControlValues>,
    trigger: Mutex<TriggerState>,
}

impl ControlPanel {
    pub fn new(defaults: &ControlDefaults) -> Self {
        Self {
            values: RwLock::new(ControlValues {
                algorithm: defaults.algorithm,
                max_requests: Slider::new(SliderKind::MaxRequests, defaults.max_requests),
                window_seconds: Slider::new(SliderKind::WindowSeconds, defaults.window_seconds),
                num_requests: Slider::new(
                    SliderKind::NumRequests,
                    u64::from(defaults.num_requests),
                ),
            }),
            trigger: Mutex::new(TriggerState::idle()),
        }
    }

    /// 알고리즘 선택
    pub fn select_algorithm(&self, algorithm: Algorithm) {
        self.values.write().algorithm = algorithm;
        debug!("알고리즘 선택: {algorithm}");
    }

    pub fn algorithm(&self) -> Algorithm {
        self.values.read().algorithm
    }

    /// 슬라이더 입력. 범위로 잘린 실제 값을 반환한다.
    pub fn set_slider(&self, kind: SliderKind, value: u64) -> u64 {
        let applied = self.values.write().slider_mut(kind).set(value);
        debug!("슬라이더 입력: {kind}={applied}");
        applied
    }

    pub fn slider_value(&self, kind: SliderKind) -> u64 {
        self.values.read().slider(kind).value
    }

    /// 슬라이더 옆 텍스트 표시
    pub fn slider_display(&self, kind: SliderKind) -> String {
        self.values.read().slider(kind).display.clone()
    }

    /// 현재 컨트롤 값으로 테스트 요청 생성 (제출 시점에 한 번만 호출)
    pub fn snapshot(&self) -> TestRunConfig {
        let values = self.values.read();
        TestRunConfig {
            algorithm: values.algorithm,
            max_requests: values.max_requests.value,
            window_seconds: values.window_seconds.value,
            num_requests: u32::try_from(values.num_requests.value).unwrap_or(u32::MAX),
        }
    }

    pub fn trigger(&self) -> TriggerState {
        self.trigger.lock().clone()
    }

    /// 실행 버튼 비활성화 + 대기 라벨
    pub fn begin_run(&self) -> TriggerState {
        let mut trigger = self.trigger.lock();
        *trigger = TriggerState::pending();
        trigger.clone()
    }

    /// 실행 버튼 활성화 + 원래 라벨
    pub fn restore_trigger(&self) -> TriggerState {
        let mut trigger = self.trigger.lock();
        *trigger = TriggerState::idle();
        trigger.clone()
    }
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self::new(&ControlDefaults::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_mirrored_to_displays() {
        let panel = ControlPanel::default();
        assert_eq!(panel.slider_display(SliderKind::MaxRequests), "100");
        assert_eq!(panel.slider_display(SliderKind::WindowSeconds), "10");
        assert_eq!(panel.slider_display(SliderKind::NumRequests), "50");
        assert_eq!(panel.trigger(), TriggerState::idle());
    }

    #[test]
    fn slider_input_updates_display_and_clamps() {
        let panel = ControlPanel::default();
        assert_eq!(panel.set_slider(SliderKind::WindowSeconds, 90), 60);
        assert_eq!(panel.slider_display(SliderKind::WindowSeconds), "60");
        assert_eq!(panel.set_slider(SliderKind::MaxRequests, 0), 1);
        assert_eq!(panel.set_slider(SliderKind::NumRequests, 0), 0);
        assert_eq!(panel.slider_display(SliderKind::NumRequests), "0");
    }

    #[test]
    fn snapshot_reads_current_values() {
        let panel = ControlPanel::default();
        panel.select_algorithm(Algorithm::FixedWindow);
        panel.set_slider(SliderKind::NumRequests, 7);

        let config = panel.snapshot();
        assert_eq!(config.algorithm, Algorithm::FixedWindow);
        assert_eq!(config.max_requests, 100);
        assert_eq!(config.num_requests, 7);

        // 스냅샷 이후 변경은 이미 만든 요청에 영향 없음
        panel.set_slider(SliderKind::NumRequests, 900);
        assert_eq!(config.num_requests, 7);
    }

    #[test]
    fn trigger_toggles_label() {
        let panel = ControlPanel::default();
        let pending = panel.begin_run();
        assert!(!pending.enabled);
        assert_eq!(pending.label, PENDING_LABEL);
        let idle = panel.restore_trigger();
        assert!(idle.enabled);
        assert_eq!(idle.label, IDLE_LABEL);
    }

    #[test]
    fn slider_kind_from_str() {
        assert_eq!("max".parse::<SliderKind>().unwrap(), SliderKind::MaxRequests);
        assert_eq!("window_seconds".parse::<SliderKind>().unwrap(), SliderKind::WindowSeconds);
        assert!("speed".parse::<SliderKind>().is_err());
    }
}
