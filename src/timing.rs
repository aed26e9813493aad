//! Timing model for the clock hands and the seconds arc.
//!
//! Everything here is pure: a [`ClockTime`] goes in, immutable angle and
//! duration parameters come out. Angles are in degrees, 0 at 12 o'clock,
//! increasing clockwise.

use std::fmt;

use crate::input::TimeInputError;

// ============================================================================
// CONSTANTS
// ============================================================================

pub const SECONDS_PER_MINUTE: f64 = 60.0;
pub const MINUTE_HAND_PERIOD: f64 = 60.0 * 60.0;
pub const HOUR_HAND_PERIOD: f64 = 12.0 * 60.0 * 60.0;

/// One steady-state cycle of the second hand spans two minutes (two laps).
pub const STEADY_CYCLE: f64 = 2.0 * SECONDS_PER_MINUTE;

// ============================================================================
// DATA MODEL
// ============================================================================

/// Wall-clock snapshot used to seed the hand animations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClockTime {
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl ClockTime {
    pub const MIDNIGHT: ClockTime = ClockTime {
        hour: 0,
        minute: 0,
        second: 0,
    };

    /// Range-checked constructor (hour 0-23, minute and second 0-59).
    pub fn new(hour: u32, minute: u32, second: u32) -> Result<Self, TimeInputError> {
        if hour > 23 || minute > 59 || second > 59 {
            return Err(TimeInputError::OutOfRange {
                hour,
                minute,
                second,
            });
        }
        Ok(Self {
            hour,
            minute,
            second,
        })
    }
}

impl Default for ClockTime {
    fn default() -> Self {
        Self::MIDNIGHT
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)
    }
}

/// One interpolated rotation segment for a hand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandAnimationSpec {
    pub start_angle_degrees: f64,
    pub end_angle_degrees: f64,
    pub duration_seconds: f64,
    pub repeats_forever: bool,
}

/// Angular length of the seconds arc, interpolated alongside the second hand.
///
/// Positive lengths sweep counter-clockwise from 12 o'clock, negative lengths
/// sweep clockwise; see [`crate::face::arc_coverage`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcSweepSpec {
    pub start_length_degrees: f64,
    pub end_length_degrees: f64,
    pub duration_seconds: f64,
}

/// A point on the steady-state second-hand timeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteadyKeyframe {
    pub at_seconds: f64,
    pub angle_degrees: f64,
    pub arc_length_degrees: f64,
}

/// Every spec needed to start the clock at a given time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockSpecs {
    pub hour: HandAnimationSpec,
    pub minute: HandAnimationSpec,
    pub lead_in: HandAnimationSpec,
    pub lead_in_arc: ArcSweepSpec,
    pub steady: HandAnimationSpec,
    pub steady_arc: ArcSweepSpec,
}

// ============================================================================
// TIMING MODEL
// ============================================================================

pub struct AnimationTimingModel;

impl AnimationTimingModel {
    pub fn for_time(time: ClockTime) -> ClockSpecs {
        let (steady, steady_arc) = Self::second_hand_steady_state();
        ClockSpecs {
            hour: Self::hour_hand_spec(time.hour, time.minute, time.second),
            minute: Self::minute_hand_spec(time.minute, time.second),
            lead_in: Self::second_hand_lead_in(time.second),
            lead_in_arc: Self::second_hand_lead_in_arc(time.second),
            steady,
            steady_arc,
        }
    }

    /// Full revolution every 12 hours.
    pub fn hour_hand_spec(hour: u32, minute: u32, second: u32) -> HandAnimationSpec {
        let start = 30.0 * (hour % 12) as f64 + minute as f64 / 2.0 + second as f64 / 120.0;
        HandAnimationSpec {
            start_angle_degrees: start,
            end_angle_degrees: start + 360.0,
            duration_seconds: HOUR_HAND_PERIOD,
            repeats_forever: true,
        }
    }

    /// Full revolution every 60 minutes.
    pub fn minute_hand_spec(minute: u32, second: u32) -> HandAnimationSpec {
        let start = 6.0 * minute as f64 + second as f64 / 10.0;
        HandAnimationSpec {
            start_angle_degrees: start,
            end_angle_degrees: start + 360.0,
            duration_seconds: MINUTE_HAND_PERIOD,
            repeats_forever: true,
        }
    }

    /// Covers the rest of the current minute, then hands off to the steady
    /// state. At `second == 0` this is a full 60 s span. Expects `second < 60`.
    pub fn second_hand_lead_in(second: u32) -> HandAnimationSpec {
        let second = second as f64;
        HandAnimationSpec {
            start_angle_degrees: 6.0 * second,
            end_angle_degrees: 360.0,
            duration_seconds: SECONDS_PER_MINUTE - second,
            repeats_forever: false,
        }
    }

    /// Arc paired with the lead-in: fills the elapsed part of the minute and
    /// ends full, which looks the same as the steady state's first frame.
    pub fn second_hand_lead_in_arc(second: u32) -> ArcSweepSpec {
        let second = second as f64;
        ArcSweepSpec {
            start_length_degrees: -6.0 * second,
            end_length_degrees: -360.0,
            duration_seconds: SECONDS_PER_MINUTE - second,
        }
    }

    /// Two-lap repeating pattern: the angle climbs 0 -> 360 -> 720 while the
    /// arc goes 360 -> 0 -> -360. Both legs are linear, so a single segment
    /// per property covers them.
    pub fn second_hand_steady_state() -> (HandAnimationSpec, ArcSweepSpec) {
        (
            HandAnimationSpec {
                start_angle_degrees: 0.0,
                end_angle_degrees: 720.0,
                duration_seconds: STEADY_CYCLE,
                repeats_forever: true,
            },
            ArcSweepSpec {
                start_length_degrees: 360.0,
                end_length_degrees: -360.0,
                duration_seconds: STEADY_CYCLE,
            },
        )
    }

    /// The steady state written out as its three keyframes (0 s, 60 s, 120 s).
    pub fn steady_keyframes() -> [SteadyKeyframe; 3] {
        [
            SteadyKeyframe {
                at_seconds: 0.0,
                angle_degrees: 0.0,
                arc_length_degrees: 360.0,
            },
            SteadyKeyframe {
                at_seconds: SECONDS_PER_MINUTE,
                angle_degrees: 360.0,
                arc_length_degrees: 0.0,
            },
            SteadyKeyframe {
                at_seconds: STEADY_CYCLE,
                angle_degrees: 720.0,
                arc_length_degrees: -360.0,
            },
        ]
    }
}

/// Normalizes an angle into `[0, 360)`.
pub fn normalize_degrees(angle: f64) -> f64 {
    let a = angle.rem_euclid(360.0);
    if a >= 360.0 {
        0.0
    } else {
        a
    }
}

impl HandAnimationSpec {
    pub fn angle_at(&self, elapsed_seconds: f64) -> f64 {
        lerp(
            self.start_angle_degrees,
            self.end_angle_degrees,
            elapsed_seconds / self.duration_seconds,
        )
    }
}

impl ArcSweepSpec {
    pub fn length_at(&self, elapsed_seconds: f64) -> f64 {
        lerp(
            self.start_length_degrees,
            self.end_length_degrees,
            elapsed_seconds / self.duration_seconds,
        )
    }
}

pub(crate) fn lerp(start: f64, end: f64, t: f64) -> f64 {
    start + (end - start) * t.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    #[test]
    fn midnight_specs() {
        let hour = AnimationTimingModel::hour_hand_spec(0, 0, 0);
        assert_eq!(
            hour,
            HandAnimationSpec {
                start_angle_degrees: 0.0,
                end_angle_degrees: 360.0,
                duration_seconds: 12.0 * 3600.0,
                repeats_forever: true,
            }
        );

        let minute = AnimationTimingModel::minute_hand_spec(0, 0);
        assert_eq!(minute.start_angle_degrees, 0.0);
        assert_eq!(minute.end_angle_degrees, 360.0);
        assert_eq!(minute.duration_seconds, 3600.0);
        assert!(minute.repeats_forever);

        let lead_in = AnimationTimingModel::second_hand_lead_in(0);
        assert_eq!(lead_in.start_angle_degrees, 0.0);
        assert_eq!(lead_in.end_angle_degrees, 360.0);
        assert_eq!(lead_in.duration_seconds, 60.0);
        assert!(!lead_in.repeats_forever);
    }

    #[test]
    fn half_past_three_hour_angle() {
        let spec = AnimationTimingModel::hour_hand_spec(3, 30, 0);
        assert!(close(spec.start_angle_degrees, 105.0));
    }

    #[test]
    fn afternoon_hours_wrap_to_twelve_hour_dial() {
        let morning = AnimationTimingModel::hour_hand_spec(3, 30, 0);
        let afternoon = AnimationTimingModel::hour_hand_spec(15, 30, 0);
        assert_eq!(morning, afternoon);
    }

    #[test]
    fn lead_in_at_forty_five_seconds() {
        let spec = AnimationTimingModel::second_hand_lead_in(45);
        assert_eq!(spec.start_angle_degrees, 270.0);
        assert_eq!(spec.end_angle_degrees, 360.0);
        assert_eq!(spec.duration_seconds, 15.0);
    }

    #[test]
    fn lead_in_applies_the_formula_without_clamping() {
        let spec = AnimationTimingModel::second_hand_lead_in(75);
        assert_eq!(spec.start_angle_degrees, 450.0);
        assert_eq!(spec.duration_seconds, -15.0);
        let arc = AnimationTimingModel::second_hand_lead_in_arc(75);
        assert_eq!(arc.start_length_degrees, -450.0);
    }

    #[test]
    fn hour_angle_agrees_with_seconds_contribution() {
        for hour in 0..24 {
            for minute in 0..60 {
                for second in (0..60).step_by(7) {
                    let spec = AnimationTimingModel::hour_hand_spec(hour, minute, second);
                    let total_seconds =
                        ((hour % 12) * 3600 + minute * 60 + second) as f64;
                    let expected = total_seconds / HOUR_HAND_PERIOD * 360.0;
                    assert!(close(spec.start_angle_degrees, expected));

                    let normalized = normalize_degrees(spec.start_angle_degrees);
                    assert!((0.0..360.0).contains(&normalized));
                }
            }
        }
    }

    #[test]
    fn repeating_specs_loop_seamlessly() {
        for minute in 0..60 {
            for second in 0..60 {
                let m = AnimationTimingModel::minute_hand_spec(minute, second);
                assert!(close(
                    normalize_degrees(m.end_angle_degrees),
                    normalize_degrees(m.start_angle_degrees)
                ));
                assert!(m.duration_seconds > 0.0);
            }
        }
        let (steady, _) = AnimationTimingModel::second_hand_steady_state();
        assert!(close(
            normalize_degrees(steady.end_angle_degrees),
            normalize_degrees(steady.start_angle_degrees)
        ));
    }

    #[test]
    fn lead_in_hands_off_without_a_jump() {
        let (steady, steady_arc) = AnimationTimingModel::second_hand_steady_state();
        for second in 0..60 {
            let lead_in = AnimationTimingModel::second_hand_lead_in(second);
            assert_eq!(lead_in.end_angle_degrees, 360.0);
            assert!(lead_in.duration_seconds > 0.0);

            let arc = AnimationTimingModel::second_hand_lead_in_arc(second);
            assert_eq!(arc.end_length_degrees.abs(), 360.0);
            assert_eq!(arc.duration_seconds, lead_in.duration_seconds);
        }
        assert_eq!(steady.start_angle_degrees, 0.0);
        assert_eq!(steady_arc.start_length_degrees, 360.0);
    }

    #[test]
    fn steady_segment_passes_through_middle_keyframe() {
        let (steady, arc) = AnimationTimingModel::second_hand_steady_state();
        for kf in AnimationTimingModel::steady_keyframes() {
            assert!(close(steady.angle_at(kf.at_seconds), kf.angle_degrees));
            assert!(close(arc.length_at(kf.at_seconds), kf.arc_length_degrees));
        }
    }

    #[test]
    fn specs_are_deterministic() {
        let time = ClockTime::new(17, 42, 9).unwrap();
        assert_eq!(
            AnimationTimingModel::for_time(time),
            AnimationTimingModel::for_time(time)
        );
    }

    #[test]
    fn clock_time_range_checks() {
        assert!(ClockTime::new(23, 59, 59).is_ok());
        assert!(ClockTime::new(24, 0, 0).is_err());
        assert!(ClockTime::new(0, 60, 0).is_err());
        assert!(ClockTime::new(0, 0, 60).is_err());
        assert_eq!(ClockTime::new(7, 5, 9).unwrap().to_string(), "07:05:09");
    }
}
