//! Interrupt → main loop → controller → panel, end to end.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use embedded_graphics::{pixelcolor::Rgb565, prelude::*, primitives::Rectangle};
use fugit::MicrosDurationU32;
use lighthouse_oled::{
    main_loop, tick, AnimationConfig, AnimationController, DisplaySurface, Phase, TickSignal,
    TickSource, TimerConfig,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Draw {
    Clear,
    Fill,
    Ring(u32),
}

/// Panel that records which shapes were requested, per frame.
#[derive(Default)]
struct Recorder {
    frames: Vec<Vec<Draw>>,
}

impl Recorder {
    fn frame(&mut self) -> &mut Vec<Draw> {
        self.frames.last_mut().expect("no frame started")
    }
}

impl DisplaySurface for Recorder {
    type Error = ();

    fn size(&self) -> Size {
        Size::new(96, 96)
    }

    fn set_draw_region(&mut self, _region: Rectangle) -> Result<(), ()> {
        Ok(())
    }

    fn stream_pixel_color(&mut self, _color: Rgb565) -> Result<(), ()> {
        Ok(())
    }

    fn fill_rectangle(&mut self, _start: Point, _end: Point, _color: Rgb565) -> Result<(), ()> {
        self.frame().push(Draw::Fill);
        Ok(())
    }

    fn draw_ring_outline(
        &mut self,
        _center: Point,
        radius: u32,
        _thickness: u32,
        _color: Rgb565,
    ) -> Result<(), ()> {
        self.frame().push(Draw::Ring(radius));
        Ok(())
    }

    fn clear_to_color(&mut self, _color: Rgb565) -> Result<(), ()> {
        self.frame().push(Draw::Clear);
        Ok(())
    }
}

/// Timer that only counts acknowledgements.
#[derive(Default)]
struct CountingTimer {
    acks: usize,
    enabled: bool,
}

impl TickSource for CountingTimer {
    type Error = ();

    fn configure(&mut self, _config: &TimerConfig, _period: MicrosDurationU32) -> Result<(), ()> {
        Ok(())
    }

    fn acknowledge(&mut self) {
        self.acks += 1;
    }

    fn enable_interrupt(&mut self) {
        self.enabled = true;
    }

    fn disable_interrupt(&mut self) {
        self.enabled = false;
    }
}

#[test]
fn three_ticks_sweep_then_two_pulses() {
    let signal = TickSignal::new();
    let mut timer = CountingTimer::default();
    tick::start_ticks(&mut timer, &TimerConfig::DSPIC_1HZ).unwrap();
    assert!(timer.enabled);

    let mut controller = AnimationController::new(AnimationConfig::default());
    let mut panel = Recorder::default();
    let mut visited = Vec::new();

    for _ in 0..3 {
        tick::on_timer_interrupt(&signal, &mut timer);
        panel.frames.push(Vec::new());
        assert!(main_loop::poll(&signal, &mut controller, &mut panel));
        visited.push(controller.phase().index());
    }

    assert_eq!(visited, [0, 1, 2]);

    let sweep = &panel.frames[0];
    assert_eq!(sweep[0], Draw::Clear);
    assert_eq!(sweep.iter().filter(|d| **d == Draw::Fill).count(), 49);
    assert_eq!(panel.frames[1], [Draw::Ring(16), Draw::Ring(0)]);
    assert_eq!(panel.frames[2], [Draw::Ring(32), Draw::Ring(16)]);

    let fills: usize = panel.frames.iter().flatten().filter(|d| **d == Draw::Fill).count();
    assert_eq!(fills, 49);
}

#[test]
fn overlapping_ticks_coalesce_into_one_frame() {
    let signal = TickSignal::new();
    let mut timer = CountingTimer::default();
    let mut controller = AnimationController::new(AnimationConfig::default());
    let mut panel = Recorder::default();
    panel.frames.push(Vec::new());

    tick::on_timer_interrupt(&signal, &mut timer);
    tick::on_timer_interrupt(&signal, &mut timer);
    assert_eq!(timer.acks, 2);

    assert!(main_loop::poll(&signal, &mut controller, &mut panel));
    assert!(!main_loop::poll(&signal, &mut controller, &mut panel));
    assert_eq!(controller.phase(), Phase::SWEEP);
}

#[test]
fn concurrent_interrupts_never_queue_and_never_vanish() {
    let signal = Arc::new(TickSignal::new());
    let raised = Arc::new(AtomicUsize::new(0));
    let stop = Arc::new(AtomicBool::new(false));

    let isr = {
        let signal = Arc::clone(&signal);
        let raised = Arc::clone(&raised);
        let stop = Arc::clone(&stop);
        thread::spawn(move || {
            let mut timer = CountingTimer::default();
            while !stop.load(Ordering::Acquire) {
                tick::on_timer_interrupt(&signal, &mut timer);
                raised.fetch_add(1, Ordering::AcqRel);
                thread::yield_now();
            }
        })
    };

    let mut controller = AnimationController::new(AnimationConfig::default());
    let mut panel = Recorder::default();
    let mut advances = 0usize;
    while advances < 200 {
        panel.frames.push(Vec::new());
        if main_loop::poll(&signal, &mut controller, &mut panel) {
            advances += 1;
        } else {
            panel.frames.pop();
        }
    }
    stop.store(true, Ordering::Release);
    isr.join().unwrap();

    assert!(advances <= raised.load(Ordering::Acquire));
    assert_eq!(u32::from(controller.phase().index()), (4 + 200) % 5);

    signal.raise();
    panel.frames.push(Vec::new());
    assert!(main_loop::poll(&signal, &mut controller, &mut panel));
}
