//! Run/pause/rate/time state of the clock and its transitions.

use std::str::FromStr;

use thiserror::Error;

use crate::input::{parse_clock_time, TimeInputError};
use crate::timing::ClockTime;

pub const DEFAULT_MAX_RATE: f64 = 10.0;

/// Commands accepted by a running clock window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClockCommand {
    Stop,
    Continue,
    SetRate(f64),
    SetTime(ClockTime),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    #[error("unknown command '{0}' (expected stop, continue, rate <x> or set HH:MM:SS)")]
    Unknown(String),

    #[error("invalid rate '{0}'")]
    Rate(String),

    #[error(transparent)]
    Time(#[from] TimeInputError),
}

/// Parses the line-oriented command syntax used on stdin.
impl FromStr for ClockCommand {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let verb = words.next().unwrap_or_default().to_ascii_lowercase();
        let arg = words.next();
        match (verb.as_str(), arg) {
            ("stop", None) => Ok(ClockCommand::Stop),
            ("continue", None) => Ok(ClockCommand::Continue),
            ("rate", Some(value)) => value
                .parse::<f64>()
                .ok()
                .filter(|rate| rate.is_finite())
                .map(ClockCommand::SetRate)
                .ok_or_else(|| CommandError::Rate(value.to_string())),
            ("set", Some(value)) => Ok(ClockCommand::SetTime(parse_clock_time(value)?)),
            _ => Err(CommandError::Unknown(line.trim().to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockState {
    pub running: bool,
    pub rate: f64,
    /// Time the current animations were seeded from.
    pub current: ClockTime,
    pub max_rate: f64,
}

impl ClockState {
    pub fn new(current: ClockTime) -> Self {
        Self {
            running: true,
            rate: 1.0,
            current,
            max_rate: DEFAULT_MAX_RATE,
        }
    }

    pub fn with_max_rate(mut self, max_rate: f64) -> Self {
        self.max_rate = max_rate.max(0.0);
        self.rate = self.rate.clamp(0.0, self.max_rate);
        self
    }

    pub fn is_animating(&self) -> bool {
        self.running && self.rate > 0.0
    }

    pub fn on_stop(&self) -> Self {
        Self {
            running: false,
            ..*self
        }
    }

    pub fn on_continue(&self) -> Self {
        Self {
            running: true,
            ..*self
        }
    }

    /// Ignored while stopped, the rate control is disabled then.
    pub fn on_rate_change(&self, rate: f64) -> Self {
        if !self.running || !rate.is_finite() {
            return *self;
        }
        Self {
            rate: rate.clamp(0.0, self.max_rate),
            ..*self
        }
    }

    pub fn on_set_time(&self, time: ClockTime) -> Self {
        Self {
            current: time,
            ..*self
        }
    }

    pub fn apply(&self, command: ClockCommand) -> Self {
        match command {
            ClockCommand::Stop => self.on_stop(),
            ClockCommand::Continue => self.on_continue(),
            ClockCommand::SetRate(rate) => self.on_rate_change(rate),
            ClockCommand::SetTime(time) => self.on_set_time(time),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noon() -> ClockTime {
        ClockTime::new(12, 0, 0).unwrap()
    }

    #[test]
    fn starts_running_at_normal_speed() {
        let state = ClockState::new(noon());
        assert!(state.running);
        assert_eq!(state.rate, 1.0);
        assert!(state.is_animating());
    }

    #[test]
    fn stop_and_continue() {
        let state = ClockState::new(noon()).on_stop();
        assert!(!state.running);
        assert!(!state.is_animating());
        assert!(state.on_continue().running);
    }

    #[test]
    fn rate_is_clamped() {
        let state = ClockState::new(noon());
        assert_eq!(state.on_rate_change(42.0).rate, DEFAULT_MAX_RATE);
        assert_eq!(state.on_rate_change(-1.0).rate, 0.0);
        assert_eq!(state.on_rate_change(f64::NAN).rate, 1.0);
        assert!(!state.on_rate_change(0.0).is_animating());
    }

    #[test]
    fn rate_changes_ignored_while_stopped() {
        let state = ClockState::new(noon()).on_stop().on_rate_change(5.0);
        assert_eq!(state.rate, 1.0);
    }

    #[test]
    fn parses_stdin_commands() {
        assert_eq!("stop".parse::<ClockCommand>(), Ok(ClockCommand::Stop));
        assert_eq!(" Continue ".parse::<ClockCommand>(), Ok(ClockCommand::Continue));
        assert_eq!("rate 2.5".parse::<ClockCommand>(), Ok(ClockCommand::SetRate(2.5)));
        assert_eq!(
            "set 08:09:10".parse::<ClockCommand>(),
            Ok(ClockCommand::SetTime(ClockTime::new(8, 9, 10).unwrap()))
        );
        assert!(matches!(
            "rate fast".parse::<ClockCommand>(),
            Err(CommandError::Rate(_))
        ));
        assert!(matches!(
            "set 24:00:00".parse::<ClockCommand>(),
            Err(CommandError::Time(TimeInputError::OutOfRange { .. }))
        ));
        assert!(matches!(
            "stop now".parse::<ClockCommand>(),
            Err(CommandError::Unknown(_))
        ));
    }

    #[test]
    fn set_time_keeps_running_and_rate() {
        let state = ClockState::new(noon()).on_rate_change(3.0).on_stop();
        let later = ClockTime::new(18, 15, 30).unwrap();
        let next = state.apply(ClockCommand::SetTime(later));
        assert_eq!(next.current, later);
        assert!(!next.running);
        assert_eq!(next.rate, 3.0);
    }
}
