//! Wall-clock source for the startup time.

use chrono::{Local, Timelike};

use crate::timing::ClockTime;

/// Supplies the current local time of day.
pub trait WallClock {
    fn now(&self) -> ClockTime;
}

/// Local system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemWallClock;

impl WallClock for SystemWallClock {
    fn now(&self) -> ClockTime {
        let now = Local::now();
        ClockTime {
            hour: now.hour(),
            minute: now.minute(),
            second: now.second().min(59),
        }
    }
}

/// Always returns the same time.
#[derive(Debug, Clone, Copy)]
pub struct FixedWallClock(pub ClockTime);

impl WallClock for FixedWallClock {
    fn now(&self) -> ClockTime {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_is_in_range() {
        let now = SystemWallClock.now();
        assert!(ClockTime::new(now.hour, now.minute, now.second).is_ok());
    }

    #[test]
    fn fixed_clock() {
        let time = ClockTime::new(6, 7, 8).unwrap();
        assert_eq!(FixedWallClock(time).now(), time);
    }
}
