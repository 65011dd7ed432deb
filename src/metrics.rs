use crate::compare::compare;

/// Minimum denominator for rate calculations: one second expressed in
/// minutes. Keeps the first tick of a session finite.
const MIN_MINUTES: f64 = 1.0 / 60.0;

/// Live performance figures derived from the current input and timer.
///
/// `adjusted_wpm` is intentionally unclamped and can go negative when
/// errors dominate; display layers clamp it at zero.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LiveMetrics {
    pub raw_wpm: f64,
    pub adjusted_wpm: f64,
    pub accuracy: f64,
    pub cpm: f64,
}

/// Compute the live metrics bundle. Pure function of its inputs; holds no
/// state and is recomputed on every input change and timer tick.
pub fn compute_live(input: &str, target: &str, elapsed_secs: u64) -> LiveMetrics {
    let minutes = (elapsed_secs as f64 / 60.0).max(MIN_MINUTES);

    let cmp = compare(input, target);
    let correct = cmp.correct as f64;
    let errors = cmp.errors as f64;

    let raw_wpm = (correct / 5.0) / minutes;
    let adjusted_wpm = ((correct / 5.0) - errors) / minutes;

    let typed = input.chars().count();
    let accuracy = if typed == 0 {
        100.0
    } else {
        100.0 * correct / typed as f64
    };

    let cpm = correct / minutes;

    LiveMetrics {
        raw_wpm,
        adjusted_wpm,
        accuracy,
        cpm,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_wpm_at_one_minute() {
        // 50 correct chars, 2 errors, 60 seconds.
        let target = format!("{}{}", "a".repeat(50), "b".repeat(2));
        let input = format!("{}{}", "a".repeat(50), "x".repeat(2));

        let m = compute_live(&input, &target, 60);

        assert!((m.raw_wpm - 10.0).abs() < EPS);
        assert!((m.adjusted_wpm - 8.0).abs() < EPS);
    }

    #[test]
    fn test_empty_input_accuracy_is_100() {
        let m = compute_live("", "hello", 0);

        assert_eq!(m.accuracy, 100.0);
        assert!(m.accuracy.is_finite());
    }

    #[test]
    fn test_zero_elapsed_uses_one_second_floor() {
        // At elapsed 0 the denominator clamps to 1/60 min, so 5 correct
        // chars read as one word in one second = 60 wpm.
        let m = compute_live("hello", "hello", 0);

        assert!((m.raw_wpm - 60.0).abs() < EPS);
        assert!((m.cpm - 300.0).abs() < EPS);
        assert!(m.raw_wpm.is_finite());
    }

    #[test]
    fn test_adjusted_wpm_can_go_negative() {
        // 0 correct, 5 errors in a minute: (0/5 - 5) / 1 = -5.
        let m = compute_live("xxxxx", "hello", 60);

        assert!((m.adjusted_wpm - -5.0).abs() < EPS);
        assert!(m.adjusted_wpm < 0.0);
    }

    #[test]
    fn test_accuracy_partial() {
        // 4 of 5 typed chars correct.
        let m = compute_live("helko", "hello", 30);

        assert!((m.accuracy - 80.0).abs() < EPS);
    }

    #[test]
    fn test_cpm_is_five_times_raw_wpm() {
        let m = compute_live("hello world", "hello world", 30);

        assert!((m.cpm - m.raw_wpm * 5.0).abs() < EPS);
    }

    #[test]
    fn test_overtyped_input_lowers_accuracy() {
        let m = compute_live("hello world", "hello", 60);

        // 5 correct out of 11 typed.
        assert!((m.accuracy - 100.0 * 5.0 / 11.0).abs() < EPS);
    }
}
