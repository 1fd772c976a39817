//! Two-axis time-based cover

use crate::{CoverConfig, CoverError, CoverResult, CoverState, CoverStatus};
use timecover_travel::{Clock, Position, SystemClock, TravelCalculator, TravelDirection};
use tracing::debug;

/// A cover with a main travel axis and an optional tilt axis.
///
/// Each axis runs its own estimator with its own timing. The host translates
/// relay events and user commands into calls here and polls the estimates.
#[derive(Debug)]
pub struct TimeBasedCover<C: Clock + Clone = SystemClock> {
    name: String,
    travel: TravelCalculator<C>,
    tilt: Option<TravelCalculator<C>>,
}

impl TimeBasedCover<SystemClock> {
    pub fn new(config: &CoverConfig) -> CoverResult<Self> {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock + Clone> TimeBasedCover<C> {
    /// Build a cover from validated configuration
    pub fn with_clock(config: &CoverConfig, clock: C) -> CoverResult<Self> {
        config.validate()?;

        let travel = TravelCalculator::with_clock(config.travel, clock.clone())
            .with_label(format!("{}/position", config.name));
        let tilt = config.tilt.map(|tilt| {
            TravelCalculator::with_clock(tilt, clock.clone())
                .with_label(format!("{}/tilt", config.name))
        });

        debug!(
            cover = %config.name,
            has_tilt = tilt.is_some(),
            "Created time-based cover"
        );

        Ok(Self {
            name: config.name.clone(),
            travel,
            tilt,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_tilt(&self) -> bool {
        self.tilt.is_some()
    }

    /// Main travel estimator
    pub fn travel(&self) -> &TravelCalculator<C> {
        &self.travel
    }

    /// Tilt estimator, if configured
    pub fn tilt(&self) -> Option<&TravelCalculator<C>> {
        self.tilt.as_ref()
    }

    fn tilt_mut(&mut self) -> CoverResult<&mut TravelCalculator<C>> {
        match self.tilt.as_mut() {
            Some(tilt) => Ok(tilt),
            None => Err(CoverError::TiltNotConfigured(self.name.clone())),
        }
    }

    // Main axis

    pub fn set_position(&mut self, position: Position) {
        self.travel.set_position(position);
    }

    pub fn update_position(&mut self, position: Position) {
        self.travel.update_position(position);
    }

    pub fn start_travel(&mut self, target: Position) {
        self.travel.start_travel(target);
    }

    pub fn start_travel_up(&mut self) {
        self.travel.start_travel_up();
    }

    pub fn start_travel_down(&mut self) {
        self.travel.start_travel_down();
    }

    /// Stop both axes
    pub fn stop(&mut self) {
        self.travel.stop();
        if let Some(tilt) = self.tilt.as_mut() {
            tilt.stop();
        }
    }

    pub fn current_position(&self) -> Option<Position> {
        self.travel.current_position()
    }

    pub fn is_traveling(&self) -> bool {
        self.travel.is_traveling()
    }

    pub fn is_opening(&self) -> bool {
        self.travel.is_opening()
    }

    pub fn is_closing(&self) -> bool {
        self.travel.is_closing()
    }

    pub fn position_reached(&self) -> bool {
        self.travel.position_reached()
    }

    pub fn is_open(&self) -> bool {
        self.travel.is_open()
    }

    pub fn is_closed(&self) -> bool {
        self.travel.is_closed()
    }

    // Tilt axis

    pub fn set_tilt_position(&mut self, position: Position) -> CoverResult<()> {
        self.tilt_mut()?.set_position(position);
        Ok(())
    }

    pub fn update_tilt_position(&mut self, position: Position) -> CoverResult<()> {
        self.tilt_mut()?.update_position(position);
        Ok(())
    }

    pub fn start_travel_tilt(&mut self, target: Position) -> CoverResult<()> {
        self.tilt_mut()?.start_travel(target);
        Ok(())
    }

    pub fn start_travel_tilt_up(&mut self) -> CoverResult<()> {
        self.start_travel_tilt(Position::OPEN)
    }

    pub fn start_travel_tilt_down(&mut self) -> CoverResult<()> {
        self.start_travel_tilt(Position::CLOSED)
    }

    pub fn stop_tilt(&mut self) -> CoverResult<()> {
        self.tilt_mut()?.stop();
        Ok(())
    }

    /// Tilt estimate; `None` without a tilt axis or before the first report
    pub fn current_tilt_position(&self) -> Option<Position> {
        self.tilt.as_ref().and_then(|tilt| tilt.current_position())
    }

    pub fn is_tilting(&self) -> bool {
        self.tilt.as_ref().is_some_and(|tilt| tilt.is_traveling())
    }

    // Snapshot

    pub fn status(&self) -> CoverStatus {
        CoverStatus::from_calculator(&self.travel)
    }

    /// Estimate everything at once
    pub fn state(&self) -> CoverState {
        let direction = if self.travel.is_traveling() {
            self.travel.direction()
        } else {
            TravelDirection::Stopped
        };
        CoverState {
            name: self.name.clone(),
            status: self.status(),
            position: self.current_position(),
            target_position: self.travel.target_position(),
            direction,
            position_confirmed: self.travel.position_confirmed(),
            tilt_position: self.current_tilt_position(),
        }
    }
}
