//! Backoff policy.

use std::time::Duration;

/// Next wait before a retry.
///
/// The first escalation starts at `floor`; every later one doubles the
/// current wait.
pub fn next_wait(current: Duration, floor: Duration) -> Duration {
    if current.is_zero() {
        floor
    } else {
        current.checked_mul(2).unwrap_or(Duration::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_escalation_uses_floor() {
        assert_eq!(
            next_wait(Duration::ZERO, Duration::from_secs(2)),
            Duration::from_secs(2)
        );
    }

    #[test]
    fn test_later_escalations_double() {
        let floor = Duration::from_secs(2);
        let mut wait = Duration::ZERO;
        let mut seen = Vec::new();
        for _ in 0..4 {
            wait = next_wait(wait, floor);
            seen.push(wait.as_secs());
        }
        assert_eq!(seen, vec![2, 4, 8, 16]);
    }

    #[test]
    fn test_doubling_ignores_a_different_floor() {
        assert_eq!(
            next_wait(Duration::from_secs(2), Duration::from_secs(60)),
            Duration::from_secs(4)
        );
    }
}
