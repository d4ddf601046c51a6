//! The lighthouse animation: one beam sweep followed by four ring pulses.

use embedded_graphics::{pixelcolor::Rgb565, prelude::*};

use crate::config::AnimationConfig;
use crate::surface::DisplaySurface;

/// Step of the animation sequence, always in `0..Phase::COUNT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Phase(u8);

impl Phase {
    pub const COUNT: u8 = 5;

    /// Beam sweep; clears the panel.
    pub const SWEEP: Self = Self(0);

    /// Phase before the first tick, chosen so the first tick sweeps.
    pub const INITIAL: Self = Self(Self::COUNT - 1);

    pub const fn new(index: u8) -> Option<Self> {
        if index < Self::COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    pub const fn index(self) -> u8 {
        self.0
    }

    pub const fn next(self) -> Self {
        Self((self.0 + 1) % Self::COUNT)
    }

    pub const fn is_sweep(self) -> bool {
        self.0 == Self::SWEEP.0
    }
}

/// Owns the phase counter and the background cache.
///
/// Only ever touched from the main loop, never from interrupt context.
pub struct AnimationController {
    config: AnimationConfig,
    phase: Phase,
    background: Rgb565,
}

impl AnimationController {
    pub fn new(config: AnimationConfig) -> Self {
        Self {
            phase: Phase::INITIAL,
            background: config.background,
            config,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn background(&self) -> Rgb565 {
        self.background
    }

    /// Paints the panel with the initial background.
    pub fn start<S: DisplaySurface>(&self, surface: &mut S) -> Result<(), S::Error> {
        surface.clear_to_color(self.background)
    }

    /// Changes the background, clearing the panel only if it differs from
    /// what is already there. Returns whether a clear was issued.
    ///
    /// The cached color only changes once the clear has succeeded.
    pub fn set_background<S: DisplaySurface>(
        &mut self,
        color: Rgb565,
        surface: &mut S,
    ) -> Result<bool, S::Error> {
        if color == self.background {
            return Ok(false);
        }
        surface.clear_to_color(color)?;
        self.background = color;

        #[cfg(feature = "defmt")]
        defmt::debug!("Background changed to {=u16:#x}", color.into_storage());

        Ok(true)
    }

    /// Moves to the next phase and draws it.
    ///
    /// The phase advances even when drawing fails; the following ticks
    /// repaint whatever was lost.
    pub fn advance<S: DisplaySurface>(&mut self, surface: &mut S) -> Result<Phase, S::Error> {
        self.phase = self.phase.next();

        #[cfg(feature = "defmt")]
        defmt::trace!("Phase {}", self.phase);

        if self.phase.is_sweep() {
            self.draw_sweep(surface)?;
        } else {
            self.draw_pulse(surface)?;
        }
        Ok(self.phase)
    }

    fn draw_sweep<S: DisplaySurface>(&self, surface: &mut S) -> Result<(), S::Error> {
        surface.clear_to_color(self.background)?;

        let bottom = self.config.sweep_bottom;
        for y in self.config.sweep_apex.y..=bottom {
            let (left, right) = self.config.sweep_edges(y);
            surface.fill_rectangle(
                Point::new(left, y),
                Point::new(right, bottom),
                self.config.beam_color,
            )?;
        }
        Ok(())
    }

    fn draw_pulse<S: DisplaySurface>(&self, surface: &mut S) -> Result<(), S::Error> {
        let step = self.config.ring_step;
        let index = u32::from(self.phase.index());
        let center = self.config.ring_center;
        let thickness = self.config.ring_thickness;

        surface.draw_ring_outline(center, step * index, thickness, self.config.pulse_color)?;
        // Phase 1 erases a zero-radius ring, which draws nothing.
        surface.draw_ring_outline(center, step * (index - 1), thickness, self.background)
    }
}
