//! Timer-driven lighthouse animation for a 96×96 RGB565 OLED.
//!
//! A periodic timer interrupt raises a [`TickSignal`]; the main loop takes
//! it and lets the [`AnimationController`] draw exactly one phase of a fixed
//! five-phase sequence: a beam sweep followed by four expanding ring pulses.
//!
//! ```ignore
//! static TICK: TickSignal = TickSignal::new();
//!
//! // in the timer interrupt
//! tick::on_timer_interrupt(&TICK, &mut alarm);
//!
//! // in main
//! let mut controller = AnimationController::new(AnimationConfig::default());
//! controller.start(&mut panel)?;
//! tick::start_ticks(&mut alarm, &TimerConfig::RP2040_1HZ)?;
//! main_loop::run(&TICK, &mut controller, &mut panel);
//! ```
//!
//! # Crate Features
//!
//! - **`defmt`** — structured logging via [`defmt`](https://docs.rs/defmt).
//! - **`std`** — [`main_loop::hosted`], a blocking loop for hosted builds.
//! - **`firmware`** — the Raspberry Pi Pico binary.

#![cfg_attr(not(any(test, feature = "std")), no_std)]

pub mod config;
pub mod controller;
pub mod error;
pub mod main_loop;
pub mod ssd1351;
pub mod surface;
pub mod tick;

pub use config::{AnimationConfig, TimerConfig};
pub use controller::{AnimationController, Phase};
pub use error::{ConfigError, Error};
pub use ssd1351::{DisplayMode, Ssd1351, Ssd1351Error};
pub use surface::DisplaySurface;
pub use tick::{TickSignal, TickSource};
