//! # Kitchen Configuration
//!
//! Population sizes and timings are fixed when the kitchen starts. The
//! compiled-in default is five clients served by two workers, with one buffer
//! slot per client:
//!
//! ```rust
//! use order_kitchen::config::KitchenConfig;
//!
//! let config = KitchenConfig::default();
//! assert_eq!((config.num_orders, config.num_workers, config.capacity), (5, 2, 5));
//! ```

use crate::error::KitchenError;
use order_buffer::CompletionWait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_NUM_ORDERS: usize = 5;
pub const DEFAULT_NUM_WORKERS: usize = 2;
pub const DEFAULT_PROCESSING_DELAY: Duration = Duration::from_secs(3);
/// Sleep between status checks when clients poll for completion.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KitchenConfig {
    /// Number of client actors, each placing exactly one order.
    pub num_orders: usize,
    /// Number of worker actors.
    pub num_workers: usize,
    /// Ring buffer slots. May be smaller than `num_orders`, in which case the
    /// buffer wraps around.
    pub capacity: usize,
    /// Time a worker spends on each order.
    pub processing_delay: Duration,
    pub completion_wait: CompletionWait,
}

impl Default for KitchenConfig {
    fn default() -> Self {
        Self::new(DEFAULT_NUM_ORDERS, DEFAULT_NUM_WORKERS)
    }
}

impl KitchenConfig {
    /// A kitchen with one slot per order and the default timings.
    pub fn new(num_orders: usize, num_workers: usize) -> Self {
        Self {
            num_orders,
            num_workers,
            capacity: num_orders,
            processing_delay: DEFAULT_PROCESSING_DELAY,
            completion_wait: CompletionWait::Signal,
        }
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_processing_delay(mut self, delay: Duration) -> Self {
        self.processing_delay = delay;
        self
    }

    pub fn with_completion_wait(mut self, wait: CompletionWait) -> Self {
        self.completion_wait = wait;
        self
    }

    /// Clients poll for completion every [`DEFAULT_POLL_INTERVAL`].
    pub fn polling(self) -> Self {
        self.with_completion_wait(CompletionWait::Poll {
            interval: DEFAULT_POLL_INTERVAL,
        })
    }

    /// Checks that the configuration describes a kitchen that can run.
    ///
    /// # Errors
    ///
    /// Returns [`KitchenError::InvalidConfig`] for empty populations, a
    /// zero-slot buffer, more actors than `u32` ids, or a zero poll interval.
    pub fn validate(&self) -> Result<(), KitchenError> {
        if self.num_orders == 0 {
            return Err(KitchenError::InvalidConfig("num_orders must be at least 1".into()));
        }
        if self.num_workers == 0 {
            return Err(KitchenError::InvalidConfig("num_workers must be at least 1".into()));
        }
        if self.capacity == 0 {
            return Err(KitchenError::InvalidConfig("capacity must be at least 1".into()));
        }
        if u32::try_from(self.num_orders.max(self.num_workers)).is_err() {
            return Err(KitchenError::InvalidConfig(format!(
                "at most {} actors per population",
                u32::MAX
            )));
        }
        if let CompletionWait::Poll { interval } = self.completion_wait {
            if interval.is_zero() {
                return Err(KitchenError::InvalidConfig("poll interval must be non-zero".into()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_compiled_in_population() {
        let config = KitchenConfig::default();
        assert_eq!(config.num_orders, 5);
        assert_eq!(config.num_workers, 2);
        assert_eq!(config.capacity, 5);
        assert_eq!(config.processing_delay, Duration::from_secs(3));
        assert_eq!(config.completion_wait, CompletionWait::Signal);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_populations_rejected() {
        assert!(matches!(
            KitchenConfig::new(0, 2).validate(),
            Err(KitchenError::InvalidConfig(_))
        ));
        assert!(matches!(
            KitchenConfig::new(3, 0).validate(),
            Err(KitchenError::InvalidConfig(_))
        ));
        assert!(matches!(
            KitchenConfig::new(3, 1).with_capacity(0).validate(),
            Err(KitchenError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        let config = KitchenConfig::new(1, 1).with_completion_wait(CompletionWait::Poll {
            interval: Duration::ZERO,
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_polling_uses_default_interval() {
        let config = KitchenConfig::new(2, 1).polling();
        assert_eq!(
            config.completion_wait,
            CompletionWait::Poll {
                interval: DEFAULT_POLL_INTERVAL
            }
        );
    }
}
