//! Compile-time configuration: timer period math and animation geometry.

use embedded_graphics::{pixelcolor::Rgb565, prelude::*};
use fugit::{HertzU32, MicrosDurationU32};

use crate::error::ConfigError;

/// Highest interrupt priority level accepted by [`TimerConfig::validate`].
pub const MAX_PRIORITY: u8 = 7;

/// Parameters of the periodic tick timer.
///
/// The period is `period_ticks / (input_clock / prescaler)`. Nothing else in
/// the crate assumes a particular rate: phase advancement is driven by tick
/// count, so a wrong period changes the animation speed and nothing more.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerConfig {
    /// Clock feeding the prescaler.
    pub input_clock: HertzU32,
    /// Input clock divider, `1` for none.
    pub prescaler: u32,
    /// Counter ticks per period (the period register value).
    pub period_ticks: u32,
    /// Largest value the period register holds.
    pub max_period_ticks: u32,
    /// Interrupt priority, `0..=MAX_PRIORITY`.
    pub priority: u8,
}

impl TimerConfig {
    /// 16-bit Timer1 on a 4 MHz instruction clock with a 1:256 prescaler.
    pub const DSPIC_1HZ: Self = Self {
        input_clock: HertzU32::from_raw(4_000_000),
        prescaler: 256,
        period_ticks: 15_625,
        max_period_ticks: u16::MAX as u32,
        priority: 4,
    };

    /// RP2040 `TIMER` alarm: fixed 1 MHz count, 32-bit compare.
    pub const RP2040_1HZ: Self = Self {
        input_clock: HertzU32::from_raw(1_000_000),
        prescaler: 1,
        period_ticks: 1_000_000,
        max_period_ticks: u32::MAX,
        priority: 1,
    };

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.prescaler == 0 {
            return Err(ConfigError::ZeroPrescaler);
        }
        if self.period_ticks == 0 || self.period_ticks > self.max_period_ticks {
            return Err(ConfigError::PeriodOutOfRange {
                period_ticks: self.period_ticks,
                max: self.max_period_ticks,
            });
        }
        if self.priority > MAX_PRIORITY {
            return Err(ConfigError::PriorityOutOfRange(self.priority));
        }
        if self.counter_rate().raw() == 0 {
            return Err(ConfigError::CounterRateTooLow);
        }
        Ok(())
    }

    /// Rate at which the counter increments.
    pub fn counter_rate(&self) -> HertzU32 {
        match self.prescaler {
            0 => HertzU32::from_raw(0),
            p => HertzU32::from_raw(self.input_clock.raw() / p),
        }
    }

    /// Validated tick period.
    pub fn period(&self) -> Result<MicrosDurationU32, ConfigError> {
        self.validate()?;
        let micros =
            u64::from(self.period_ticks) * 1_000_000 / u64::from(self.counter_rate().raw());
        let micros = u32::try_from(micros).map_err(|_| ConfigError::PeriodOutOfRange {
            period_ticks: self.period_ticks,
            max: self.max_period_ticks,
        })?;
        Ok(MicrosDurationU32::from_ticks(micros))
    }
}

/// Geometry and colors of the lighthouse animation.
///
/// [`AnimationConfig::default()`] is the reference look on a 96×96 panel:
/// the sweep apex sits at (144, 48) in pre-scaled coordinates and is divided
/// by 3, so the beam widens from x=48 at row 48 to x=32..=64 at row 96.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationConfig {
    /// Sweep apex before scaling. `y` is also the first sweep row.
    pub sweep_apex: Point,
    /// Last sweep row, and the bottom edge of every sweep rectangle.
    pub sweep_bottom: i32,
    /// Divisor applied to both sweep edges. Must be non-zero, see
    /// [`validate`](Self::validate).
    pub sweep_scale: i32,
    pub ring_center: Point,
    /// Radius growth per pulse phase.
    pub ring_step: u32,
    pub ring_thickness: u32,
    pub beam_color: Rgb565,
    pub pulse_color: Rgb565,
    /// Background the panel is cleared to at start-up.
    pub background: Rgb565,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            sweep_apex: Point::new(144, 48),
            sweep_bottom: 96,
            sweep_scale: 3,
            ring_center: Point::new(48, 48),
            ring_step: 16,
            ring_thickness: 30,
            beam_color: Rgb565::YELLOW,
            pulse_color: Rgb565::WHITE,
            background: Rgb565::BLACK,
        }
    }
}

impl AnimationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sweep_scale == 0 {
            return Err(ConfigError::ZeroSweepScale);
        }
        Ok(())
    }

    /// Left and right edge of the beam on row `y`.
    ///
    /// Panics if `sweep_scale` is zero.
    pub fn sweep_edges(&self, y: i32) -> (i32, i32) {
        let depth = y - self.sweep_apex.y;
        (
            (self.sweep_apex.x - depth) / self.sweep_scale,
            (self.sweep_apex.x + depth) / self.sweep_scale,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_tick_once_per_second() {
        let one_second = Ok(MicrosDurationU32::from_ticks(1_000_000));
        assert_eq!(TimerConfig::DSPIC_1HZ.period(), one_second);
        assert_eq!(TimerConfig::RP2040_1HZ.period(), one_second);
        assert_eq!(TimerConfig::DSPIC_1HZ.counter_rate().raw(), 15_625);
    }

    #[test]
    fn zero_prescaler_is_rejected() {
        let config = TimerConfig { prescaler: 0, ..TimerConfig::DSPIC_1HZ };
        assert_eq!(config.validate(), Err(ConfigError::ZeroPrescaler));
        assert_eq!(config.period(), Err(ConfigError::ZeroPrescaler));
    }

    #[test]
    fn period_must_fit_register() {
        let too_long = TimerConfig { period_ticks: 70_000, ..TimerConfig::DSPIC_1HZ };
        assert_eq!(
            too_long.validate(),
            Err(ConfigError::PeriodOutOfRange { period_ticks: 70_000, max: 65_535 })
        );

        let zero = TimerConfig { period_ticks: 0, ..TimerConfig::DSPIC_1HZ };
        assert!(matches!(zero.validate(), Err(ConfigError::PeriodOutOfRange { .. })));
    }

    #[test]
    fn priority_is_bounded() {
        let config = TimerConfig { priority: 8, ..TimerConfig::DSPIC_1HZ };
        assert_eq!(config.validate(), Err(ConfigError::PriorityOutOfRange(8)));
    }

    #[test]
    fn prescaler_larger_than_clock_leaves_no_rate() {
        let config = TimerConfig {
            input_clock: HertzU32::from_raw(100),
            prescaler: 256,
            ..TimerConfig::DSPIC_1HZ
        };
        assert_eq!(config.validate(), Err(ConfigError::CounterRateTooLow));
    }

    #[test]
    fn default_sweep_geometry() {
        let config = AnimationConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.sweep_edges(48), (48, 48));
        assert_eq!(config.sweep_edges(49), (47, 48));
        assert_eq!(config.sweep_edges(96), (32, 64));
    }

    #[test]
    fn zero_sweep_scale_is_rejected() {
        let config = AnimationConfig { sweep_scale: 0, ..AnimationConfig::default() };
        assert_eq!(config.validate(), Err(ConfigError::ZeroSweepScale));
    }
}
