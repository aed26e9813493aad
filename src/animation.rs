//! Frame-driven playback of the timing specs.
//!
//! An [`Animation`] linearly interpolates one value between a start and an end
//! over a duration. [`Clockwork`] owns the three hands and the seconds arc and
//! keeps them in step with a [`ClockState`].

use crate::state::ClockState;
use crate::timing::{
    lerp, AnimationTimingModel, ArcSweepSpec, ClockTime, HandAnimationSpec,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationStatus {
    Running,
    Paused,
    Stopped,
}

/// Emitted by [`Animation::advance`] when a one-shot animation reaches its end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Finished {
    /// Time past the end that the frame would have covered.
    pub overshoot_seconds: f64,
}

#[derive(Debug, Clone)]
pub struct Animation {
    start: f64,
    end: f64,
    duration: f64,
    repeats_forever: bool,
    elapsed: f64,
    rate: f64,
    status: AnimationStatus,
}

impl Animation {
    pub fn new(start: f64, end: f64, duration: f64, repeats_forever: bool) -> Self {
        Self {
            start,
            end,
            duration: duration.max(f64::MIN_POSITIVE),
            repeats_forever,
            elapsed: 0.0,
            rate: 1.0,
            status: AnimationStatus::Stopped,
        }
    }

    pub fn from_hand(spec: &HandAnimationSpec) -> Self {
        Self::new(
            spec.start_angle_degrees,
            spec.end_angle_degrees,
            spec.duration_seconds,
            spec.repeats_forever,
        )
    }

    /// Arc sweeps follow the repeat mode of the hand they are paired with.
    pub fn from_arc(spec: &ArcSweepSpec, repeats_forever: bool) -> Self {
        Self::new(
            spec.start_length_degrees,
            spec.end_length_degrees,
            spec.duration_seconds,
            repeats_forever,
        )
    }

    pub fn status(&self) -> AnimationStatus {
        self.status
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn play(&mut self) {
        if self.status == AnimationStatus::Stopped && !self.repeats_forever && self.is_at_end() {
            return;
        }
        self.status = if self.rate > 0.0 {
            AnimationStatus::Running
        } else {
            AnimationStatus::Paused
        };
    }

    /// A finished one-shot stays `Stopped`; anything else, including a fresh
    /// animation that never ran, becomes `Paused`.
    pub fn pause(&mut self) {
        match self.status {
            AnimationStatus::Running => self.status = AnimationStatus::Paused,
            AnimationStatus::Stopped if self.repeats_forever || !self.is_at_end() => {
                self.status = AnimationStatus::Paused
            }
            _ => {}
        }
    }

    /// Rate 0 suspends the animation in place; a positive rate resumes it.
    pub fn set_rate(&mut self, rate: f64) {
        self.rate = rate.max(0.0);
        match self.status {
            AnimationStatus::Running if self.rate == 0.0 => self.status = AnimationStatus::Paused,
            _ => {}
        }
    }

    fn is_at_end(&self) -> bool {
        self.elapsed >= self.duration
    }

    pub fn advance(&mut self, dt: f64) -> Option<Finished> {
        if self.status != AnimationStatus::Running || dt <= 0.0 {
            return None;
        }
        self.elapsed += dt * self.rate;
        if self.repeats_forever {
            self.elapsed = self.elapsed.rem_euclid(self.duration);
            return None;
        }
        if self.elapsed >= self.duration {
            let overshoot = self.elapsed - self.duration;
            self.elapsed = self.duration;
            self.status = AnimationStatus::Stopped;
            // Overshoot is reported in wall time so the next phase can apply
            // its own rate.
            return Some(Finished {
                overshoot_seconds: overshoot / self.rate,
            });
        }
        None
    }

    pub fn value(&self) -> f64 {
        lerp(self.start, self.end, self.elapsed / self.duration)
    }
}

// ============================================================================
// SECOND HAND
// ============================================================================

/// The second hand's two phases. Lead-in runs once, then the steady two-lap
/// cycle takes over for good.
#[derive(Debug, Clone)]
pub enum SecondHand {
    LeadIn { hand: Animation, arc: Animation },
    Steady { hand: Animation, arc: Animation },
}

impl SecondHand {
    pub fn new(second: u32) -> Self {
        let hand = Animation::from_hand(&AnimationTimingModel::second_hand_lead_in(second));
        let arc = Animation::from_arc(
            &AnimationTimingModel::second_hand_lead_in_arc(second),
            false,
        );
        SecondHand::LeadIn { hand, arc }
    }

    fn steady(rate: f64) -> Self {
        let (spec, arc_spec) = AnimationTimingModel::second_hand_steady_state();
        let mut hand = Animation::from_hand(&spec);
        let mut arc = Animation::from_arc(&arc_spec, spec.repeats_forever);
        hand.set_rate(rate);
        arc.set_rate(rate);
        hand.play();
        arc.play();
        SecondHand::Steady { hand, arc }
    }

    pub fn is_lead_in(&self) -> bool {
        matches!(self, SecondHand::LeadIn { .. })
    }

    fn parts_mut(&mut self) -> (&mut Animation, &mut Animation) {
        match self {
            SecondHand::LeadIn { hand, arc } | SecondHand::Steady { hand, arc } => (hand, arc),
        }
    }

    fn parts(&self) -> (&Animation, &Animation) {
        match self {
            SecondHand::LeadIn { hand, arc } | SecondHand::Steady { hand, arc } => (hand, arc),
        }
    }

    pub fn angle(&self) -> f64 {
        self.parts().0.value()
    }

    pub fn arc_length(&self) -> f64 {
        self.parts().1.value()
    }

    pub fn status(&self) -> AnimationStatus {
        self.parts().0.status()
    }

    pub fn play(&mut self) {
        let (hand, arc) = self.parts_mut();
        hand.play();
        arc.play();
    }

    pub fn pause(&mut self) {
        let (hand, arc) = self.parts_mut();
        hand.pause();
        arc.pause();
    }

    pub fn set_rate(&mut self, rate: f64) {
        let (hand, arc) = self.parts_mut();
        hand.set_rate(rate);
        arc.set_rate(rate);
    }

    pub fn advance(&mut self, dt: f64) {
        let rate = self.parts().0.rate();
        let (hand, arc) = self.parts_mut();
        arc.advance(dt);
        if let Some(done) = hand.advance(dt) {
            if self.is_lead_in() {
                log::debug!("second hand lead-in finished, switching to steady cycle");
                *self = Self::steady(rate);
                self.advance(done.overshoot_seconds);
            }
        }
    }
}

// ============================================================================
// CLOCKWORK
// ============================================================================

/// Interpolated values for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandAngles {
    pub hour: f64,
    pub minute: f64,
    pub second: f64,
    pub arc_length: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandStatuses {
    pub hour: AnimationStatus,
    pub minute: AnimationStatus,
    pub second: AnimationStatus,
}

/// All hand animations for one seeded [`ClockTime`].
#[derive(Debug, Clone)]
pub struct Clockwork {
    seed: ClockTime,
    hour: Animation,
    minute: Animation,
    second: SecondHand,
}

impl Clockwork {
    pub fn new(time: ClockTime) -> Self {
        let specs = AnimationTimingModel::for_time(time);
        Self {
            seed: time,
            hour: Animation::from_hand(&specs.hour),
            minute: Animation::from_hand(&specs.minute),
            second: SecondHand::new(time.second),
        }
    }

    /// Builds the clockwork and applies the state's running flag and rate.
    pub fn for_state(state: &ClockState) -> Self {
        let mut clockwork = Self::new(state.current);
        clockwork.sync(state);
        clockwork
    }

    pub fn seed(&self) -> ClockTime {
        self.seed
    }

    pub fn second_hand(&self) -> &SecondHand {
        &self.second
    }

    /// Applies running status and rate to every animation at once.
    pub fn sync(&mut self, state: &ClockState) {
        self.hour.set_rate(state.rate);
        self.minute.set_rate(state.rate);
        self.second.set_rate(state.rate);
        if state.running {
            self.hour.play();
            self.minute.play();
            self.second.play();
        } else {
            self.hour.pause();
            self.minute.pause();
            self.second.pause();
        }
    }

    pub fn advance(&mut self, dt: f64) {
        self.hour.advance(dt);
        self.minute.advance(dt);
        self.second.advance(dt);
    }

    pub fn angles(&self) -> HandAngles {
        HandAngles {
            hour: self.hour.value(),
            minute: self.minute.value(),
            second: self.second.angle(),
            arc_length: self.second.arc_length(),
        }
    }

    pub fn statuses(&self) -> HandStatuses {
        HandStatuses {
            hour: self.hour.status(),
            minute: self.minute.status(),
            second: self.second.status(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-6;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    fn running_state(time: ClockTime) -> ClockState {
        ClockState::new(time)
    }

    #[test]
    fn one_shot_stops_at_end_and_reports_overshoot() {
        let mut anim = Animation::new(0.0, 10.0, 2.0, false);
        anim.play();
        assert_eq!(anim.advance(1.0), None);
        assert!(close(anim.value(), 5.0));
        let done = anim.advance(1.5).expect("finished");
        assert!(close(done.overshoot_seconds, 0.5));
        assert_eq!(anim.status(), AnimationStatus::Stopped);
        assert!(close(anim.value(), 10.0));
        anim.play();
        assert_eq!(anim.status(), AnimationStatus::Stopped);
    }

    #[test]
    fn pausing_a_fresh_animation_marks_it_paused() {
        let mut anim = Animation::new(0.0, 10.0, 2.0, false);
        anim.pause();
        assert_eq!(anim.status(), AnimationStatus::Paused);
        anim.advance(1.0);
        assert!(close(anim.value(), 0.0));
        anim.play();
        anim.advance(1.0);
        assert!(close(anim.value(), 5.0));

        anim.advance(5.0);
        anim.pause();
        assert_eq!(anim.status(), AnimationStatus::Stopped);
    }

    #[test]
    fn clockwork_built_while_stopped_is_paused() {
        let mut state = running_state(ClockTime::new(2, 20, 20).unwrap());
        state = state.on_stop();
        let clockwork = Clockwork::for_state(&state);
        let statuses = clockwork.statuses();
        assert_eq!(statuses.hour, AnimationStatus::Paused);
        assert_eq!(statuses.minute, AnimationStatus::Paused);
        assert_eq!(statuses.second, AnimationStatus::Paused);
    }

    #[test]
    fn repeating_animation_wraps() {
        let mut anim = Animation::new(0.0, 360.0, 60.0, true);
        anim.play();
        anim.advance(75.0);
        assert!(close(anim.value(), 90.0));
        assert_eq!(anim.status(), AnimationStatus::Running);
    }

    #[test]
    fn rate_scales_progress() {
        let mut anim = Animation::new(0.0, 100.0, 100.0, false);
        anim.set_rate(2.5);
        anim.play();
        anim.advance(10.0);
        assert!(close(anim.value(), 25.0));
    }

    #[test]
    fn starts_from_seeded_angles() {
        let time = ClockTime::new(3, 30, 0).unwrap();
        let clockwork = Clockwork::for_state(&running_state(time));
        let angles = clockwork.angles();
        assert!(close(angles.hour, 105.0));
        assert!(close(angles.minute, 180.0));
        assert!(close(angles.second, 0.0));
        assert!(close(angles.arc_length, 0.0));
    }

    #[test]
    fn lead_in_hands_off_to_steady_with_overshoot() {
        let time = ClockTime::new(0, 0, 45).unwrap();
        let mut clockwork = Clockwork::for_state(&running_state(time));
        assert!(clockwork.second_hand().is_lead_in());

        clockwork.advance(14.0);
        assert!(close(clockwork.angles().second, 354.0));
        assert!(clockwork.second_hand().is_lead_in());

        clockwork.advance(3.0);
        assert!(!clockwork.second_hand().is_lead_in());
        // 2 s into the steady cycle.
        assert!(close(clockwork.angles().second, 12.0));
        assert!(close(clockwork.angles().arc_length, 348.0));
        assert_eq!(clockwork.statuses().second, AnimationStatus::Running);
    }

    #[test]
    fn handoff_keeps_the_rate() {
        let time = ClockTime::new(0, 0, 50).unwrap();
        let mut state = running_state(time);
        state = state.on_rate_change(2.0);
        let mut clockwork = Clockwork::for_state(&state);
        clockwork.advance(6.0);
        assert!(!clockwork.second_hand().is_lead_in());
        // 10 s of lead-in used 5 s wall time, 1 s left at rate 2.
        assert!(close(clockwork.angles().second, 12.0));
    }

    #[test]
    fn zero_rate_pauses_everything_and_resumes_in_place() {
        let time = ClockTime::new(10, 10, 10).unwrap();
        let mut state = running_state(time);
        let mut clockwork = Clockwork::for_state(&state);
        clockwork.advance(5.0);
        let before = clockwork.angles();

        state = state.on_rate_change(0.0);
        clockwork.sync(&state);
        let statuses = clockwork.statuses();
        assert_eq!(statuses.hour, AnimationStatus::Paused);
        assert_eq!(statuses.minute, AnimationStatus::Paused);
        assert_eq!(statuses.second, AnimationStatus::Paused);
        clockwork.advance(30.0);
        assert_eq!(clockwork.angles(), before);

        state = state.on_rate_change(1.0);
        clockwork.sync(&state);
        assert_eq!(clockwork.angles(), before);
        assert_eq!(clockwork.statuses().second, AnimationStatus::Running);
        clockwork.advance(1.0);
        assert!(close(clockwork.angles().second, before.second + 6.0));
    }

    #[test]
    fn stop_and_continue_preserve_angles() {
        let time = ClockTime::new(8, 0, 0).unwrap();
        let mut state = running_state(time);
        let mut clockwork = Clockwork::for_state(&state);
        clockwork.advance(20.0);
        state = state.on_stop();
        clockwork.sync(&state);
        let frozen = clockwork.angles();
        clockwork.advance(100.0);
        assert_eq!(clockwork.angles(), frozen);

        state = state.on_continue();
        clockwork.sync(&state);
        clockwork.advance(1.0);
        assert!(close(clockwork.angles().second, frozen.second + 6.0));
    }

    #[test]
    fn steady_arc_empties_then_refills() {
        let time = ClockTime::MIDNIGHT;
        let mut clockwork = Clockwork::for_state(&running_state(time));
        clockwork.advance(60.0);
        assert!(!clockwork.second_hand().is_lead_in());
        assert!(close(clockwork.angles().arc_length, 360.0));
        clockwork.advance(30.0);
        assert!(close(clockwork.angles().arc_length, 180.0));
        clockwork.advance(60.0);
        assert!(close(clockwork.angles().arc_length, -180.0));
        clockwork.advance(30.0);
        assert!(close(clockwork.angles().arc_length, 360.0));
    }
}
