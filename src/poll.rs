//! Bounded busy-polling
//!
//! The chip's completion signals are only observed by reading the IRQ flags,
//! there are no interrupts. Every wait in the driver is a fixed number of
//! attempts spaced by a fixed interval on an injected [`DelayNs`], so timeouts
//! are deterministic and can be simulated.

use embedded_hal::delay::DelayNs;

/// How long and how often to poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollBudget {
    /// Number of times the condition is checked
    pub attempts: u32,
    /// Delay between checks in milliseconds
    pub interval_ms: u32,
    /// Also wait after the last failed check, so that a miss always costs
    /// exactly `attempts * interval_ms`
    pub wait_after_last: bool,
}

impl PollBudget {
    /// A full time window: every failed check is followed by a wait.
    pub const fn window(attempts: u32, interval_ms: u32) -> Self {
        Self {
            attempts,
            interval_ms,
            wait_after_last: true,
        }
    }

    /// A number of checks with waits only in between them.
    pub const fn attempts(attempts: u32, interval_ms: u32) -> Self {
        Self {
            attempts,
            interval_ms,
            wait_after_last: false,
        }
    }

    /// Total time spent waiting when the condition never holds
    pub const fn worst_case_ms(&self) -> u32 {
        let waits = if self.wait_after_last || self.attempts == 0 {
            self.attempts
        } else {
            self.attempts - 1
        };
        waits.saturating_mul(self.interval_ms)
    }

    /// Checks `probe` until it yields a value or the budget runs out.
    ///
    /// Returns `Ok(None)` on timeout. Errors from `probe` abort the wait.
    pub fn run<D, T, E, F>(&self, delay: &mut D, mut probe: F) -> Result<Option<T>, E>
    where
        D: DelayNs,
        F: FnMut() -> Result<Option<T>, E>,
    {
        for attempt in 1..=self.attempts {
            if let Some(value) = probe()? {
                return Ok(Some(value));
            }

            if attempt < self.attempts || self.wait_after_last {
                delay.delay_ms(self.interval_ms);
            }
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockDelay;

    #[test]
    fn window_waits_after_every_miss() {
        let mut delay = MockDelay::default();
        let mut checks = 0;
        let found = PollBudget::window(5, 20)
            .run(&mut delay, || -> Result<Option<()>, ()> {
                checks += 1;
                Ok(None)
            })
            .unwrap();

        assert_eq!(found, None);
        assert_eq!(checks, 5);
        assert_eq!(delay.calls, 5);
        assert_eq!(delay.elapsed_ms, 100);
        assert_eq!(PollBudget::window(5, 20).worst_case_ms(), 100);
    }

    #[test]
    fn attempts_wait_only_in_between() {
        let mut delay = MockDelay::default();
        let mut checks = 0;
        let found = PollBudget::attempts(5, 20)
            .run(&mut delay, || -> Result<Option<()>, ()> {
                checks += 1;
                Ok(None)
            })
            .unwrap();

        assert_eq!(found, None);
        assert_eq!(checks, 5);
        assert_eq!(delay.calls, 4);
        assert_eq!(delay.elapsed_ms, 80);
        assert_eq!(PollBudget::attempts(5, 20).worst_case_ms(), 80);
    }

    #[test]
    fn stops_on_first_hit() {
        let mut delay = MockDelay::default();
        let mut checks = 0;
        let found = PollBudget::window(250, 20)
            .run(&mut delay, || -> Result<Option<u32>, ()> {
                checks += 1;
                Ok((checks == 3).then_some(checks))
            })
            .unwrap();

        assert_eq!(found, Some(3));
        assert_eq!(delay.elapsed_ms, 40);
    }

    #[test]
    fn errors_abort() {
        let mut delay = MockDelay::default();
        let result = PollBudget::window(10, 20).run(&mut delay, || -> Result<Option<()>, u8> {
            Err(7)
        });

        assert_eq!(result, Err(7));
        assert_eq!(delay.elapsed_ms, 0);
    }
}
