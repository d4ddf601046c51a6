//! Cooperative main loop consuming ticks.

use crate::controller::AnimationController;
use crate::surface::DisplaySurface;
use crate::tick::TickSignal;

/// Consumes a pending tick, if any, and draws the next phase.
///
/// Returns whether a tick was consumed. Draw failures are logged and dropped;
/// the next tick repaints.
pub fn poll<S: DisplaySurface>(
    signal: &TickSignal,
    controller: &mut AnimationController,
    surface: &mut S,
) -> bool {
    if !signal.take() {
        return false;
    }
    if controller.advance(surface).is_err() {
        #[cfg(feature = "defmt")]
        defmt::warn!("Draw failed in phase {}, frame dropped", controller.phase());
    }
    true
}

/// Busy-waits on `signal` forever.
pub fn run<S: DisplaySurface>(
    signal: &TickSignal,
    controller: &mut AnimationController,
    surface: &mut S,
) -> ! {
    loop {
        if !poll(signal, controller, surface) {
            core::hint::spin_loop();
        }
    }
}

/// Blocking variant of the loop for hosted builds.
///
/// The consumer sleeps on a condition variable instead of spinning. A tick
/// is still a single pending flag, never a queue.
#[cfg(any(test, feature = "std"))]
pub mod hosted {
    use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
    use std::time::Duration;

    use crate::controller::AnimationController;
    use crate::surface::DisplaySurface;

    #[derive(Debug, Default)]
    pub struct TickNotifier {
        pending: Mutex<bool>,
        wake: Condvar,
    }

    impl TickNotifier {
        pub const fn new() -> Self {
            Self {
                pending: Mutex::new(false),
                wake: Condvar::new(),
            }
        }

        fn pending(&self) -> MutexGuard<'_, bool> {
            self.pending.lock().unwrap_or_else(PoisonError::into_inner)
        }

        pub fn raise(&self) {
            *self.pending() = true;
            self.wake.notify_one();
        }

        pub fn is_pending(&self) -> bool {
            *self.pending()
        }

        pub fn try_take(&self) -> bool {
            core::mem::replace(&mut *self.pending(), false)
        }

        /// Blocks until a tick is pending, then consumes it.
        pub fn wait(&self) {
            let mut pending = self.pending();
            while !*pending {
                pending = self.wake.wait(pending).unwrap_or_else(PoisonError::into_inner);
            }
            *pending = false;
        }

        /// Like [`wait`](Self::wait), giving up after `timeout`.
        pub fn wait_timeout(&self, timeout: Duration) -> bool {
            let (mut pending, _) = self
                .wake
                .wait_timeout_while(self.pending(), timeout, |pending| !*pending)
                .unwrap_or_else(PoisonError::into_inner);
            core::mem::replace(&mut *pending, false)
        }
    }

    /// Consumes exactly `ticks` ticks, drawing one phase for each.
    pub fn run_ticks<S: DisplaySurface>(
        notifier: &TickNotifier,
        controller: &mut AnimationController,
        surface: &mut S,
        ticks: usize,
    ) {
        for _ in 0..ticks {
            notifier.wait();
            if controller.advance(surface).is_err() {
                #[cfg(feature = "defmt")]
                defmt::warn!("Draw failed in phase {}, frame dropped", controller.phase());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::hosted::{run_ticks, TickNotifier};
    use super::*;
    use crate::config::AnimationConfig;
    use crate::controller::Phase;
    use crate::surface::tests::Framebuffer;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn idle_poll_does_nothing() {
        let signal = TickSignal::new();
        let mut controller = AnimationController::new(AnimationConfig::default());
        let mut fb = Framebuffer::new();

        assert!(!poll(&signal, &mut controller, &mut fb));
        assert_eq!(controller.phase(), Phase::INITIAL);
        assert_eq!(fb.streamed, 0);
    }

    #[test]
    fn double_raise_advances_once() {
        let signal = TickSignal::new();
        let mut controller = AnimationController::new(AnimationConfig::default());
        let mut fb = Framebuffer::new();

        signal.raise();
        signal.raise();
        assert!(poll(&signal, &mut controller, &mut fb));
        assert!(!poll(&signal, &mut controller, &mut fb));
        assert_eq!(controller.phase(), Phase::SWEEP);
    }

    #[test]
    fn notifier_coalesces() {
        let notifier = TickNotifier::new();
        assert!(!notifier.try_take());
        notifier.raise();
        notifier.raise();
        assert!(notifier.try_take());
        assert!(!notifier.try_take());
        assert!(!notifier.wait_timeout(Duration::from_millis(1)));
    }

    #[test]
    fn notifier_wakes_blocked_consumer() {
        let notifier = Arc::new(TickNotifier::new());
        let consumer = {
            let notifier = Arc::clone(&notifier);
            thread::spawn(move || notifier.wait_timeout(Duration::from_secs(10)))
        };
        notifier.raise();
        assert!(consumer.join().unwrap());
        assert!(!notifier.try_take());
    }

    #[test]
    fn hosted_loop_consumes_each_acknowledged_tick() {
        let notifier = Arc::new(TickNotifier::new());
        let producer = {
            let notifier = Arc::clone(&notifier);
            thread::spawn(move || {
                for _ in 0..6 {
                    notifier.raise();
                    while notifier.is_pending() {
                        thread::yield_now();
                    }
                }
            })
        };

        let mut controller = AnimationController::new(AnimationConfig::default());
        let mut fb = Framebuffer::new();
        run_ticks(&notifier, &mut controller, &mut fb, 6);
        producer.join().unwrap();

        assert_eq!(controller.phase().index(), 0);
    }
}
