//! Tick signal shared between the timer interrupt and the main loop.

use fugit::MicrosDurationU32;
use portable_atomic::{AtomicBool, Ordering};

use crate::config::TimerConfig;
use crate::error::Error;

/// Single-word flag recording that at least one tick happened.
///
/// The interrupt handler only ever raises it and the main loop only ever
/// takes it. Raising an already raised signal is a no-op, so ticks the main
/// loop was too slow to see are coalesced rather than queued.
#[derive(Debug)]
#[repr(transparent)]
pub struct TickSignal(AtomicBool);

impl TickSignal {
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    /// Marks a tick as pending. Safe to call from interrupt context.
    pub fn raise(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Consumes the pending tick, if any.
    ///
    /// Read and clear are a single atomic swap: a raise landing right after
    /// this returns is left pending for the next call.
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }

    pub fn is_pending(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

impl Default for TickSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Platform timer producing the periodic tick interrupt.
pub trait TickSource {
    type Error;

    /// Programs the period, prescaler and interrupt priority.
    ///
    /// `period` is `config.period()`, already validated by [`start_ticks`].
    fn configure(
        &mut self,
        config: &TimerConfig,
        period: MicrosDurationU32,
    ) -> Result<(), Self::Error>;

    /// Clears the hardware pending condition so the interrupt re-arms.
    fn acknowledge(&mut self);

    fn enable_interrupt(&mut self);

    fn disable_interrupt(&mut self);
}

/// Whole body of the timer interrupt handler.
pub fn on_timer_interrupt<T: TickSource>(signal: &TickSignal, source: &mut T) {
    signal.raise();
    source.acknowledge();
}

/// Validates `config`, programs `source` and unmasks its interrupt.
///
/// A stale pending condition left over from before configuration is
/// acknowledged first, so the first tick arrives one full period later.
pub fn start_ticks<T: TickSource>(
    source: &mut T,
    config: &TimerConfig,
) -> Result<(), Error<T::Error>> {
    let period = config.period()?;
    source.disable_interrupt();
    source.configure(config, period).map_err(Error::Timer)?;
    source.acknowledge();
    source.enable_interrupt();

    #[cfg(feature = "defmt")]
    defmt::info!("Tick source started, period {} us", period.ticks());

    Ok(())
}
