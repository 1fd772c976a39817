//! Travel Position Estimator
//!
//! Predicts where a cover is while it travels, using nothing but the last
//! known position, the commanded target and the configured travel times.
//!
//! Example: a cover takes 100 seconds from top to bottom. Starting from
//! position 90 and directed to position 60 at time 0, the estimate is 80 at
//! time 10, 70 at time 20, and 60 (target reached) at time 30.

use crate::{Clock, Position, SystemClock, TravelDirection, TravelTimeConfig, SLATS_TRAVEL_SHARE};
use std::time::Instant;
use tracing::{debug, trace};

/// Motion state of one cover axis.
///
/// All fields change together, so every transition builds a new value and
/// replaces the old one in a single assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TravelState {
    pub direction: TravelDirection,
    /// Absent until the first position is known
    pub last_known_position: Option<Position>,
    /// When the last known position was recorded or travel last started
    pub last_known_position_timestamp: Instant,
    /// The last known position came from an authoritative report
    pub position_confirmed: bool,
    pub target_position: Option<Position>,
}

impl TravelState {
    fn unknown(now: Instant) -> Self {
        Self {
            direction: TravelDirection::Stopped,
            last_known_position: None,
            last_known_position_timestamp: now,
            position_confirmed: false,
            target_position: None,
        }
    }
}

/// Estimates the live position of one cover axis
#[derive(Debug)]
pub struct TravelCalculator<C: Clock = SystemClock> {
    config: TravelTimeConfig,
    clock: C,
    label: String,
    state: TravelState,
}

impl TravelCalculator<SystemClock> {
    /// Create an estimator reading the system clock
    pub fn new(config: TravelTimeConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> TravelCalculator<C> {
    /// Create an estimator with a custom clock source
    pub fn with_clock(config: TravelTimeConfig, clock: C) -> Self {
        let state = TravelState::unknown(clock.now());
        Self {
            config,
            clock,
            label: "cover".to_string(),
            state,
        }
    }

    /// Name used in log output, e.g. the axis or entity name
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn config(&self) -> &TravelTimeConfig {
        &self.config
    }

    /// Snapshot of the motion state
    pub fn state(&self) -> TravelState {
        self.state
    }

    pub fn direction(&self) -> TravelDirection {
        self.state.direction
    }

    pub fn last_known_position(&self) -> Option<Position> {
        self.state.last_known_position
    }

    pub fn target_position(&self) -> Option<Position> {
        self.state.target_position
    }

    pub fn position_confirmed(&self) -> bool {
        self.state.position_confirmed
    }

    // State transitions

    /// Record an authoritative position
    pub fn set_position(&mut self, position: Position) {
        debug!(cover = %self.label, %position, "Position confirmed");
        self.state = TravelState {
            last_known_position: Some(position),
            last_known_position_timestamp: self.clock.now(),
            position_confirmed: true,
            ..self.state
        };
    }

    /// Record an observed position. It only counts as confirmed when it
    /// matches the travel target; anything else is an intermediate report.
    pub fn update_position(&mut self, position: Position) {
        let arrived = self.state.target_position == Some(position);
        debug!(cover = %self.label, %position, arrived, "Position update");
        self.state = TravelState {
            last_known_position: Some(position),
            last_known_position_timestamp: self.clock.now(),
            position_confirmed: self.state.position_confirmed || arrived,
            ..self.state
        };
    }

    /// Freeze the current estimate as the new resting point.
    ///
    /// The frozen value is an estimate, so it stays unconfirmed until an
    /// external report arrives. No-op while the position is unknown.
    pub fn stop(&mut self) {
        let Some(stop_position) = self.current_position() else {
            return;
        };
        debug!(cover = %self.label, position = %stop_position, "Travel stopped");
        self.state = TravelState {
            direction: TravelDirection::Stopped,
            last_known_position: Some(stop_position),
            last_known_position_timestamp: self.clock.now(),
            position_confirmed: false,
            target_position: Some(stop_position),
        };
    }

    /// Start traveling to `target`.
    ///
    /// Without any known position there is nothing to travel from, so the
    /// target is taken as the confirmed position.
    pub fn start_travel(&mut self, target: Position) {
        if self.state.last_known_position.is_none() {
            self.set_position(target);
            return;
        }
        self.stop();

        let Some(origin) = self.state.last_known_position else {
            return;
        };
        // A target equal to the origin resolves to Opening
        let direction = if target > origin {
            TravelDirection::Closing
        } else {
            TravelDirection::Opening
        };

        debug!(
            cover = %self.label,
            from = %origin,
            to = %target,
            %direction,
            "Travel started"
        );
        self.state = TravelState {
            direction,
            last_known_position: Some(origin),
            last_known_position_timestamp: self.clock.now(),
            position_confirmed: false,
            target_position: Some(target),
        };
    }

    /// Travel to fully open
    pub fn start_travel_up(&mut self) {
        self.start_travel(Position::OPEN);
    }

    /// Travel to fully closed
    pub fn start_travel_down(&mut self) {
        self.start_travel(Position::CLOSED);
    }

    // Queries

    /// Confirmed position, or the estimate while travel is unconfirmed
    pub fn current_position(&self) -> Option<Position> {
        if self.state.position_confirmed {
            return self.state.last_known_position;
        }
        self.calculate_position()
    }

    pub fn is_traveling(&self) -> bool {
        self.current_position() != self.state.target_position
    }

    pub fn is_opening(&self) -> bool {
        self.is_traveling() && self.state.direction == TravelDirection::Opening
    }

    pub fn is_closing(&self) -> bool {
        self.is_traveling() && self.state.direction == TravelDirection::Closing
    }

    pub fn position_reached(&self) -> bool {
        self.current_position() == self.state.target_position
    }

    /// Fully open
    pub fn is_open(&self) -> bool {
        self.current_position() == Some(Position::OPEN)
    }

    /// Fully closed
    pub fn is_closed(&self) -> bool {
        self.current_position() == Some(Position::CLOSED)
    }

    /// Seconds needed to travel between two positions.
    ///
    /// The slats time is a fixed offset, added once when either end is fully
    /// open. The range-proportional part scales off the remaining duration.
    pub fn calculate_travel_time(&self, from: Position, to: Position) -> f64 {
        let travel_range = f64::from(from.value().abs_diff(to.value()));
        let travel_time_full = if from > to {
            self.config.travel_time_down
        } else {
            self.config.travel_time_up
        };
        let slats_time = if from.is_open() || to.is_open() {
            if from > to {
                self.config.slats_closing_time
            } else {
                self.config.slats_opening_time
            }
        } else {
            0.0
        };
        (travel_time_full - slats_time) * (travel_range / 100.0) + slats_time
    }

    fn calculate_position(&self) -> Option<Position> {
        let state = self.state;
        let (origin, target) = match (state.last_known_position, state.target_position) {
            (Some(origin), Some(target)) => (origin, target),
            _ => return state.last_known_position,
        };

        let relative = i32::from(target.value()) - i32::from(origin.value());
        if Self::reached_or_exceeded(relative, state.direction) {
            return Some(target);
        }

        let remaining_travel_time = self.calculate_travel_time(origin, target);
        let elapsed = self.elapsed_secs(state.last_known_position_timestamp);
        if elapsed >= remaining_travel_time {
            return Some(target);
        }

        let slats_time = self.slats_time(origin, target, state.direction);
        let progress = if elapsed < slats_time {
            // Slats adjusting: the cover barely moves
            elapsed / slats_time * SLATS_TRAVEL_SHARE
        } else if remaining_travel_time <= slats_time {
            trace!(
                cover = %self.label,
                remaining_travel_time,
                slats_time,
                "No travel time left after slats phase"
            );
            return Some(target);
        } else {
            let fraction = (elapsed - slats_time) / (remaining_travel_time - slats_time);
            if slats_time > 0.0 {
                SLATS_TRAVEL_SHARE + (1.0 - SLATS_TRAVEL_SHARE) * fraction
            } else {
                fraction
            }
        };

        Some(Position::from_estimate(
            f64::from(origin.value()) + f64::from(relative) * progress,
        ))
    }

    fn reached_or_exceeded(relative: i32, direction: TravelDirection) -> bool {
        match direction {
            TravelDirection::Closing => relative <= 0,
            TravelDirection::Opening => relative >= 0,
            TravelDirection::Stopped => relative == 0,
        }
    }

    /// Slats phase applies only next to fully open
    fn slats_time(&self, origin: Position, target: Position, direction: TravelDirection) -> f64 {
        if !origin.is_open() && !target.is_open() {
            return 0.0;
        }
        match direction {
            TravelDirection::Closing => self.config.slats_closing_time,
            _ => self.config.slats_opening_time,
        }
    }

    fn elapsed_secs(&self, since: Instant) -> f64 {
        let now = self.clock.now();
        if now < since {
            trace!(cover = %self.label, "Clock is behind the travel timestamp, treating elapsed time as zero");
        }
        now.saturating_duration_since(since).as_secs_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ManualClock;
    use std::time::Duration;

    fn calculator(config: TravelTimeConfig) -> (TravelCalculator<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        (TravelCalculator::with_clock(config, clock.clone()), clock)
    }

    fn pos(value: u8) -> Position {
        Position::new(value)
    }

    #[test]
    fn test_unknown_position() {
        let (calc, _clock) = calculator(TravelTimeConfig::symmetric(100.0));
        assert_eq!(calc.current_position(), None);
        assert_eq!(calc.direction(), TravelDirection::Stopped);
        assert!(!calc.is_traveling());
        assert!(!calc.is_open());
        assert!(!calc.is_closed());
    }

    #[test]
    fn test_set_position_round_trip() {
        let (mut calc, clock) = calculator(TravelTimeConfig::symmetric(100.0));
        calc.set_position(pos(37));
        assert_eq!(calc.current_position(), Some(pos(37)));
        assert!(calc.position_confirmed());

        clock.advance_secs(500.0);
        assert_eq!(calc.current_position(), Some(pos(37)));
    }

    #[test]
    fn test_set_position_without_target_counts_as_traveling() {
        let (mut calc, _clock) = calculator(TravelTimeConfig::symmetric(100.0));
        calc.set_position(pos(60));

        // No target yet, so the position never matches it
        assert_eq!(calc.target_position(), None);
        assert!(calc.is_traveling());
        assert!(!calc.position_reached());
        assert!(!calc.is_opening());
        assert!(!calc.is_closing());

        calc.stop();
        assert_eq!(calc.target_position(), Some(pos(60)));
        assert!(!calc.is_traveling());
        assert!(calc.position_reached());
    }

    #[test]
    fn test_travel_from_90_to_60() {
        let (mut calc, clock) = calculator(TravelTimeConfig::symmetric(100.0));
        calc.set_position(pos(90));
        calc.start_travel(pos(60));

        assert_eq!(calc.direction(), TravelDirection::Opening);
        assert!(calc.is_opening());
        assert!(!calc.is_closing());
        assert_eq!(calc.current_position(), Some(pos(90)));

        clock.advance_secs(10.0);
        assert_eq!(calc.current_position(), Some(pos(80)));
        assert!(!calc.position_reached());

        clock.advance_secs(10.0);
        assert_eq!(calc.current_position(), Some(pos(70)));
        assert!(calc.is_traveling());

        clock.advance_secs(10.0);
        assert_eq!(calc.current_position(), Some(pos(60)));
        assert!(calc.position_reached());
        assert!(!calc.is_traveling());
        assert!(!calc.is_opening());
        assert!(!calc.position_confirmed());
    }

    #[test]
    fn test_arrival_after_travel_time() {
        let (mut calc, clock) = calculator(TravelTimeConfig::symmetric(100.0));
        calc.set_position(pos(20));
        calc.start_travel_down();
        assert!(calc.is_closing());

        let travel_time = calc.calculate_travel_time(pos(20), Position::CLOSED);
        assert_eq!(travel_time, 80.0);

        clock.advance_secs(travel_time);
        assert_eq!(calc.current_position(), Some(Position::CLOSED));
        assert!(calc.is_closed());

        clock.advance_secs(1000.0);
        assert_eq!(calc.current_position(), Some(Position::CLOSED));
    }

    #[test]
    fn test_travel_time_formula() {
        let config = TravelTimeConfig {
            travel_time_down: 60.0,
            travel_time_up: 30.0,
            slats_opening_time: 4.0,
            slats_closing_time: 10.0,
        };
        let (calc, _clock) = calculator(config);

        assert_eq!(calc.calculate_travel_time(pos(100), pos(50)), 30.0);
        assert_eq!(calc.calculate_travel_time(pos(50), pos(100)), 15.0);
        // Slats offset only next to fully open
        assert_eq!(calc.calculate_travel_time(pos(50), Position::OPEN), 35.0);
        assert_eq!(calc.calculate_travel_time(Position::OPEN, pos(50)), 17.0);
        assert_eq!(calc.calculate_travel_time(pos(40), pos(40)), 0.0);
    }

    #[test]
    fn test_slats_phase_when_closing() {
        let config = TravelTimeConfig::symmetric(100.0).with_slats(0.0, 20.0);
        let (mut calc, clock) = calculator(config);
        calc.set_position(Position::OPEN);
        calc.start_travel(Position::CLOSED);
        assert_eq!(calc.direction(), TravelDirection::Closing);

        clock.advance_secs(10.0);
        assert_eq!(calc.current_position(), Some(pos(5)));

        clock.advance_secs(10.0);
        assert_eq!(calc.current_position(), Some(pos(10)));

        clock.advance_secs(40.0);
        assert_eq!(calc.current_position(), Some(pos(55)));

        clock.advance_secs(40.0);
        assert_eq!(calc.current_position(), Some(Position::CLOSED));
        assert!(calc.position_reached());
    }

    #[test]
    fn test_slats_phase_when_opening() {
        let config = TravelTimeConfig::symmetric(100.0).with_slats(20.0, 0.0);
        let (mut calc, clock) = calculator(config);
        calc.set_position(Position::CLOSED);
        calc.start_travel_up();
        assert!(calc.is_opening());

        clock.advance_secs(10.0);
        assert_eq!(calc.current_position(), Some(pos(95)));

        clock.advance_secs(10.0);
        assert_eq!(calc.current_position(), Some(pos(90)));

        clock.advance_secs(30.0);
        assert_eq!(calc.current_position(), Some(pos(56)));

        clock.advance_secs(50.0);
        assert!(calc.is_open());
    }

    #[test]
    fn test_no_slats_away_from_open_end() {
        let config = TravelTimeConfig::symmetric(100.0).with_slats(20.0, 20.0);
        let (mut calc, clock) = calculator(config);
        calc.set_position(pos(40));
        calc.start_travel(pos(80));

        clock.advance_secs(10.0);
        assert_eq!(calc.current_position(), Some(pos(50)));
    }

    #[test]
    fn test_monotonic_convergence() {
        let config = TravelTimeConfig::symmetric(60.0).with_slats(5.0, 8.0);
        let (mut calc, clock) = calculator(config);
        calc.set_position(Position::OPEN);
        calc.start_travel(Position::CLOSED);

        let mut previous = 0;
        for _ in 0..200 {
            clock.advance(Duration::from_millis(500));
            let current = calc.current_position().unwrap().value();
            assert!(current >= previous, "moved backwards: {} -> {}", previous, current);
            assert!(current <= 100);
            previous = current;
        }
        assert_eq!(previous, 100);
    }

    #[test]
    fn test_monotonic_convergence_opening() {
        let config = TravelTimeConfig::symmetric(45.0).with_slats(6.0, 0.0);
        let (mut calc, clock) = calculator(config);
        calc.set_position(pos(70));
        calc.start_travel(Position::OPEN);

        let mut previous = 70;
        for _ in 0..120 {
            clock.advance(Duration::from_millis(500));
            let current = calc.current_position().unwrap().value();
            assert!(current <= previous, "moved backwards: {} -> {}", previous, current);
            previous = current;
        }
        assert_eq!(previous, 0);
    }

    #[test]
    fn test_zero_travel_time_arrives_immediately() {
        let (mut calc, _clock) = calculator(TravelTimeConfig::default());
        calc.set_position(Position::OPEN);
        calc.start_travel_down();
        assert_eq!(calc.current_position(), Some(Position::CLOSED));
        assert!(calc.position_reached());
    }

    #[test]
    fn test_slats_time_not_shorter_than_travel_time() {
        let config = TravelTimeConfig::symmetric(10.0).with_slats(0.0, 30.0);
        let (mut calc, clock) = calculator(config);
        calc.set_position(Position::OPEN);
        calc.start_travel_down();

        clock.advance_secs(6.0);
        assert_eq!(calc.current_position(), Some(pos(2)));

        clock.advance_secs(4.0);
        assert_eq!(calc.current_position(), Some(Position::CLOSED));
    }

    #[test]
    fn test_clock_skew_clamped() {
        let (mut calc, clock) = calculator(TravelTimeConfig::symmetric(100.0));
        calc.set_position(pos(50));
        calc.start_travel(pos(100));

        clock.rewind(Duration::from_secs(30));
        assert_eq!(calc.current_position(), Some(pos(50)));
        assert!(calc.is_closing());
    }

    #[test]
    fn test_stop_freezes_estimate() {
        let (mut calc, clock) = calculator(TravelTimeConfig::symmetric(100.0));
        calc.set_position(pos(90));
        calc.start_travel(pos(60));
        clock.advance_secs(10.0);

        calc.stop();
        assert_eq!(calc.last_known_position(), Some(pos(80)));
        assert_eq!(calc.target_position(), Some(pos(80)));
        assert_eq!(calc.direction(), TravelDirection::Stopped);
        assert!(!calc.position_confirmed());
        assert!(!calc.is_traveling());
        assert!(calc.position_reached());

        clock.advance_secs(100.0);
        assert_eq!(calc.current_position(), Some(pos(80)));
    }

    #[test]
    fn test_stop_without_position_is_noop() {
        let (mut calc, _clock) = calculator(TravelTimeConfig::symmetric(100.0));
        let before = calc.state();
        calc.stop();
        assert_eq!(calc.state(), before);
    }

    #[test]
    fn test_start_travel_without_position() {
        let (mut calc, _clock) = calculator(TravelTimeConfig::symmetric(100.0));
        calc.start_travel(pos(30));

        assert_eq!(calc.current_position(), Some(pos(30)));
        assert!(calc.position_confirmed());
        assert_eq!(calc.direction(), TravelDirection::Stopped);
    }

    #[test]
    fn test_start_travel_to_current_position_is_opening() {
        let (mut calc, _clock) = calculator(TravelTimeConfig::symmetric(100.0));
        calc.set_position(pos(45));
        calc.start_travel(pos(45));

        assert_eq!(calc.direction(), TravelDirection::Opening);
        assert!(!calc.is_traveling());
        assert!(calc.position_reached());
        assert_eq!(calc.current_position(), Some(pos(45)));
    }

    #[test]
    fn test_reverse_mid_travel() {
        let (mut calc, clock) = calculator(TravelTimeConfig::symmetric(100.0));
        calc.set_position(Position::OPEN);
        calc.start_travel_down();
        clock.advance_secs(40.0);
        assert_eq!(calc.current_position(), Some(pos(40)));

        calc.start_travel_up();
        assert_eq!(calc.direction(), TravelDirection::Opening);
        assert_eq!(calc.last_known_position(), Some(pos(40)));

        clock.advance_secs(20.0);
        assert_eq!(calc.current_position(), Some(pos(20)));

        clock.advance_secs(20.0);
        assert!(calc.is_open());
    }

    #[test]
    fn test_update_position_intermediate_report() {
        let (mut calc, clock) = calculator(TravelTimeConfig::symmetric(100.0));
        calc.set_position(pos(90));
        calc.start_travel(pos(60));
        clock.advance_secs(5.0);

        calc.update_position(pos(85));
        assert!(!calc.position_confirmed());
        assert_eq!(calc.target_position(), Some(pos(60)));
        assert!(calc.is_opening());

        clock.advance_secs(10.0);
        assert_eq!(calc.current_position(), Some(pos(75)));

        calc.update_position(pos(60));
        assert!(calc.position_confirmed());
        assert!(calc.position_reached());
    }

    #[test]
    fn test_update_position_keeps_earlier_confirmation() {
        let (mut calc, _clock) = calculator(TravelTimeConfig::symmetric(100.0));
        calc.set_position(pos(10));
        calc.update_position(pos(12));

        assert!(calc.position_confirmed());
        assert_eq!(calc.current_position(), Some(pos(12)));
    }

    #[test]
    fn test_label() {
        let calc = TravelCalculator::new(TravelTimeConfig::default()).with_label("tilt");
        assert_eq!(calc.label(), "tilt");
    }
}
