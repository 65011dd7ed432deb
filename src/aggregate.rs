use crate::store::SessionRecord;
use crate::util::mean;

pub const HOUR_MS: i64 = 3_600_000;
pub const DAY_MS: i64 = 86_400_000;

/// Unweighted averages over one trailing window. Empty windows are all
/// zeros, never NaN.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct WindowStats {
    pub avg_wpm: f64,
    pub avg_accuracy: f64,
}

/// The three standard windows over the session log.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Aggregates {
    pub hourly: WindowStats,
    pub daily: WindowStats,
    pub overall: WindowStats,
}

fn window_stats<'a, I>(records: I) -> WindowStats
where
    I: Iterator<Item = &'a SessionRecord>,
{
    let (wpms, accuracies): (Vec<f64>, Vec<f64>) =
        records.map(|r| (r.wpm, r.accuracy)).unzip();

    WindowStats {
        avg_wpm: mean(&wpms).unwrap_or(0.0),
        avg_accuracy: mean(&accuracies).unwrap_or(0.0),
    }
}

/// Recompute window statistics from the full log. `now_ms` shifts window
/// membership continuously, so results are never cached.
pub fn aggregate(records: &[SessionRecord], now_ms: i64) -> Aggregates {
    let within = |span: i64| {
        records
            .iter()
            .filter(move |r| now_ms - r.timestamp <= span)
    };

    Aggregates {
        hourly: window_stats(within(HOUR_MS)),
        daily: window_stats(within(DAY_MS)),
        overall: window_stats(records.iter()),
    }
}
