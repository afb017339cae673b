//! Delay between attempts.

use std::time::Duration;

use rand::Rng;

use crate::config::BackoffStrategy;

/// Fixed delay, the same before every retry.
pub fn fixed_backoff(attempt: u32, delay_ms: u64) -> Duration {
    if attempt == 0 {
        return Duration::from_millis(0);
    }
    Duration::from_millis(delay_ms)
}

/// Calculate exponential backoff delay with jitter.
pub fn exponential_backoff(attempt: u32, base_ms: u64, max_ms: u64) -> Duration {
    if attempt == 0 {
        return Duration::from_millis(0);
    }

    let exponential_base = 2u64.saturating_pow(attempt - 1);
    let delay_ms = base_ms.saturating_mul(exponential_base);
    let capped_delay = delay_ms.min(max_ms);

    // Apply jitter (0 to 10% of the delay)
    let jitter_range = capped_delay / 10;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };

    Duration::from_millis(capped_delay + jitter)
}

/// Delay before retry number `attempt` (1-based) under a strategy.
pub fn backoff_for(strategy: BackoffStrategy, attempt: u32, delay_ms: u64, max_ms: u64) -> Duration {
    match strategy {
        BackoffStrategy::Fixed => fixed_backoff(attempt, delay_ms),
        BackoffStrategy::Exponential => exponential_backoff(attempt, delay_ms, max_ms),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_backoff() {
        assert_eq!(fixed_backoff(0, 1500), Duration::ZERO);
        assert_eq!(fixed_backoff(1, 1500), Duration::from_millis(1500));
        assert_eq!(fixed_backoff(5, 1500), Duration::from_millis(1500));
    }

    #[test]
    fn test_exponential_backoff() {
        let b1 = exponential_backoff(1, 100, 2000);
        assert!(b1.as_millis() >= 100 && b1.as_millis() < 110);

        let b2 = exponential_backoff(2, 100, 2000);
        assert!(b2.as_millis() >= 200);

        let max = exponential_backoff(10, 100, 1000);
        assert!(max.as_millis() >= 1000 && max.as_millis() < 1100);
    }

    #[test]
    fn test_strategy_dispatch() {
        assert_eq!(
            backoff_for(BackoffStrategy::Fixed, 3, 250, 10_000),
            Duration::from_millis(250)
        );
        assert!(backoff_for(BackoffStrategy::Exponential, 3, 250, 10_000) >= Duration::from_millis(1000));
    }
}
