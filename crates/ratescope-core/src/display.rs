//! 요약 표시용 숫자 포맷터.

use serde::Serialize;

use crate::models::metrics::MetricsSnapshot;

/// 천 단위 구분자 (`12345` → `12,345`)
pub fn count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// 허용률 (`83.333` → `83.3%`)
pub fn allow_rate(rate: f64) -> String {
    let rate = if rate.is_finite() { rate.clamp(0.0, 100.0) } else { 0.0 };
    format!("{rate:.1}%")
}

/// 실행 시간 (`1.234` → `1.23ms`)
pub fn duration_ms(ms: f64) -> String {
    let ms = if ms.is_finite() && ms > 0.0 { ms } else { 0.0 };
    format!("{ms:.2}ms")
}

/// 처리량: 반올림 후 천 단위 구분 (`2431.7` → `2,432/s`)
pub fn throughput(per_sec: f64) -> String {
    if !per_sec.is_finite() || per_sec <= 0.0 {
        return "0/s".to_string();
    }
    let rounded = per_sec.round().min(u64::MAX as f64) as u64;
    format!("{}/s", count(rounded))
}

/// 항상 최신 스냅샷을 반영하는 네 개의 요약 표시
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryDisplay {
    pub total: String,
    pub allowed: String,
    pub blocked: String,
    pub allow_rate: String,
}

impl SummaryDisplay {
    pub fn from_snapshot(snapshot: &MetricsSnapshot) -> Self {
        Self {
            total: count(snapshot.total),
            allowed: count(snapshot.allowed),
            blocked: count(snapshot.blocked),
            allow_rate: allow_rate(snapshot.allow_rate),
        }
    }
}

impl Default for SummaryDisplay {
    fn default() -> Self {
        Self {
            total: "0".to_string(),
            allowed: "0".to_string(),
            blocked: "0".to_string(),
            allow_rate: allow_rate(0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_separators() {
        assert_eq!(count(0), "0");
        assert_eq!(count(999), "999");
        assert_eq!(count(1_000), "1,000");
        assert_eq!(count(12_345_678), "12,345,678");
    }

    #[test]
    fn rate_and_duration() {
        assert_eq!(allow_rate(83.3333), "83.3%");
        assert_eq!(allow_rate(f64::NAN), "0.0%");
        assert_eq!(duration_ms(0.0), "0.00ms");
        assert_eq!(duration_ms(12.346), "12.35ms");
    }

    #[test]
    fn throughput_never_divides() {
        assert_eq!(throughput(0.0), "0/s");
        assert_eq!(throughput(f64::INFINITY), "0/s");
        assert_eq!(throughput(1_234_567.4), "1,234,567/s");
    }

    #[test]
    fn summary_from_snapshot() {
        let summary = SummaryDisplay::from_snapshot(&MetricsSnapshot {
            total: 1_500,
            allowed: 1_200,
            blocked: 300,
            allow_rate: 80.0,
        });
        assert_eq!(summary.total, "1,500");
        assert_eq!(summary.allowed, "1,200");
        assert_eq!(summary.blocked, "300");
        assert_eq!(summary.allow_rate, "80.0%");
    }
}
