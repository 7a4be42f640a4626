//! The slide rotation engine.
//!
//! A [`Rotator`] owns a cursor into a fixed, circular set of slides. Each
//! rotation moves the cursor and hands the outgoing, active and incoming
//! postures to the three slides around it, so a step costs three posture
//! assignments whatever the size of the set. Slides further away keep the
//! posture they last received.
//!
//! The rotator never touches rendering itself: it talks to a
//! [`SlideAdapter`] and is ticked through a [`TimerService`].

pub mod posture;
pub mod timer;

use std::time::Duration;

use log::{debug, info};

use crate::config::EffectConfig;
use crate::error::ConfigurationError;
use crate::rotator::posture::{Phase, Posture, PostureTable};
use crate::rotator::timer::{TimerHandle, TimerService};

/// What the rotator needs from whatever displays the slides.
pub trait SlideAdapter {
    fn slide_count(&self) -> usize;
    fn apply_posture(&mut self, index: usize, posture: Posture);
    /// Doubles a two-slide set so the incoming and outgoing postures land
    /// on different slides than the active one. No-op for other sizes.
    fn duplicate_slides_if_two(&mut self);
}

const WINDOW: [(isize, Phase); 3] = [
    (-1, Phase::Outgoing),
    (0, Phase::Active),
    (1, Phase::Incoming),
];

pub struct Rotator<A, T> {
    adapter: A,
    timer: T,
    postures: PostureTable,
    tick_interval: Duration,
    len: usize,
    cursor: usize,
    handle: Option<TimerHandle>,
}

impl<A: SlideAdapter, T: TimerService> Rotator<A, T> {
    /// Puts slide 0 in the active posture, every other slide in the
    /// incoming one, and starts automatic rotation when there is more than
    /// one slide.
    pub fn initialize(mut adapter: A, timer: T, config: &EffectConfig) -> Result<Self, ConfigurationError> {
        let mut len = adapter.slide_count();
        if len == 0 {
            return Err(ConfigurationError::NoSlides);
        }
        // Two slides would alias incoming and outgoing
        if len == 2 {
            adapter.duplicate_slides_if_two();
            len = adapter.slide_count();
            if len < 3 {
                return Err(ConfigurationError::TooFewSlides { count: len });
            }
        }

        // --- Initial steady state: slide 0 in front, the rest waiting ---
        let postures = PostureTable::new(config.fade, config.axis);
        debug!("postures for axis {}, fade {}", config.axis, config.fade);
        adapter.apply_posture(0, postures.get(Phase::Active));
        for index in 1..len {
            adapter.apply_posture(index, postures.get(Phase::Incoming));
        }

        let mut rotator = Self {
            adapter,
            timer,
            postures,
            tick_interval: config.tick_interval(),
            len,
            cursor: 0,
            handle: None,
        };
        rotator.start();
        Ok(rotator)
    }

    /// Maps an index at most one step outside `[0, len)` back into range.
    ///
    /// This is a single-step wraparound, not a modulo: `-1` becomes the
    /// last slide and anything at or past `len` becomes slide 0. It is
    /// only ever called with the cursor moved by one.
    pub fn cycle(&self, index: isize) -> usize {
        if index < 0 {
            self.len - 1
        } else if index as usize >= self.len {
            0
        } else {
            index as usize
        }
    }

    /// Advances to the following slide.
    pub fn rotate(&mut self) {
        self.rotate_to(self.cursor as isize + 1);
    }

    /// Makes `target` the active slide and reassigns the postures around
    /// it. Calling it again with the same target re-applies the same
    /// postures.
    ///
    /// A single slide only gets the active posture back instead of the
    /// three-posture window, which would leave it hidden as incoming.
    pub fn rotate_to(&mut self, target: isize) {
        self.cursor = self.cycle(target);
        debug!("rotating to slide {}/{}", self.cursor + 1, self.len);

        // Outgoing, active and incoming would all land on slide 0
        if self.len == 1 {
            self.adapter.apply_posture(0, self.postures.get(Phase::Active));
            return;
        }

        for (offset, phase) in WINDOW {
            let index = self.cycle(self.cursor as isize + offset);
            self.adapter.apply_posture(index, self.postures.get(phase));
        }
    }

    pub fn next(&mut self) {
        self.rotate_to(self.cursor as isize + 1);
    }

    pub fn previous(&mut self) {
        self.rotate_to(self.cursor as isize - 1);
    }

    /// Starts automatic rotation. Does nothing if it is already running or
    /// there is only one slide.
    pub fn start(&mut self) {
        if self.handle.is_some() || self.len < 2 {
            return;
        }
        self.handle = Some(self.timer.schedule(self.tick_interval));
        info!("automatic rotation every {:?}", self.tick_interval);
    }

    /// Cancels automatic rotation. Manual rotation keeps working.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.timer.cancel(handle);
            info!("automatic rotation stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Lets `dt` pass on the timer and rotates if our tick came up.
    pub fn advance(&mut self, dt: Duration) {
        // A stalled frame can fire several ticks at once; rotate only once
        // so no slide is skipped without being shown
        let ticked = self
            .timer
            .advance(dt)
            .into_iter()
            .any(|fired| Some(fired) == self.handle);
        if ticked {
            self.rotate();
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.len
    }

    #[cfg(test)]
    pub fn postures(&self) -> &PostureTable {
        &self.postures
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn adapter_mut(&mut self) -> &mut A {
        &mut self.adapter
    }
}
