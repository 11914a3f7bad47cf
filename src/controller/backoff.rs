//! # Fibonacci Backoff
//!
//! Progressive requeue delays for resources whose reconcile keeps failing.
//! Grows more slowly than exponential backoff, so a transient AWS throttle
//! does not push a resource out by minutes.
//!
//! ```rust
//! use provider_aws::controller::backoff::FibonacciBackoff;
//!
//! let mut backoff = FibonacciBackoff::new(1, 60);
//! assert_eq!(backoff.next_backoff_seconds(), 1);
//! assert_eq!(backoff.next_backoff_seconds(), 1);
//! assert_eq!(backoff.next_backoff_seconds(), 2);
//! assert_eq!(backoff.next_backoff_seconds(), 3);
//! assert_eq!(backoff.next_backoff_seconds(), 5);
//! ```

use std::time::Duration;

/// Fibonacci backoff calculator, in seconds
#[derive(Debug, Clone)]
pub struct FibonacciBackoff {
    min_secs: u64,
    prev_secs: u64,
    current_secs: u64,
    max_secs: u64,
}

impl FibonacciBackoff {
    /// Sequence starts at `min_secs` (twice) and is capped at `max_secs`
    #[must_use]
    pub fn new(min_secs: u64, max_secs: u64) -> Self {
        Self {
            min_secs,
            prev_secs: 0,
            current_secs: min_secs,
            max_secs,
        }
    }

    /// Current delay in seconds; advances the sequence
    pub fn next_backoff_seconds(&mut self) -> u64 {
        let result = self.current_secs;

        let next = self.prev_secs.saturating_add(self.current_secs);
        self.prev_secs = self.current_secs;
        self.current_secs = next.min(self.max_secs);

        result
    }

    #[must_use]
    pub fn next_backoff(&mut self) -> Duration {
        Duration::from_secs(self.next_backoff_seconds())
    }

    pub fn reset(&mut self) {
        self.prev_secs = 0;
        self.current_secs = self.min_secs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod fibonacci_backoff_tests {
        use super::*;

        #[test]
        fn test_sequence_is_capped() {
            let mut backoff = FibonacciBackoff::new(1, 10);
            let seq: Vec<u64> = (0..8).map(|_| backoff.next_backoff_seconds()).collect();
            assert_eq!(seq, vec![1, 1, 2, 3, 5, 8, 10, 10]);
        }

        #[test]
        fn test_reset_restarts_sequence() {
            let mut backoff = FibonacciBackoff::new(2, 60);
            backoff.next_backoff_seconds();
            backoff.next_backoff_seconds();
            backoff.next_backoff_seconds();
            backoff.reset();
            assert_eq!(backoff.next_backoff(), Duration::from_secs(2));
        }

        #[test]
        fn test_min_above_max_stays_at_max_after_first() {
            let mut backoff = FibonacciBackoff::new(5, 3);
            assert_eq!(backoff.next_backoff_seconds(), 5);
            assert_eq!(backoff.next_backoff_seconds(), 3);
        }
    }
}
