#![no_std]
#![no_main]

use core::cell::RefCell;

use cortex_m::interrupt::Mutex;
use cortex_m::peripheral::NVIC;
use defmt_rtt as _;
use embedded_hal::digital::OutputPin;
use embedded_hal_bus::spi::{ExclusiveDevice, NoDelay};
use panic_halt as _;
use rp_pico::entry;
use rp_pico::hal; // Hardware Abstraction Layer (higher-level drivers)
use rp_pico::hal::fugit::{MicrosDurationU32, RateExtU32};
use rp_pico::hal::pac; // Peripheral Access Crate (low-level register access)
use rp_pico::hal::pac::interrupt;
use rp_pico::hal::timer::{Alarm, Alarm0, ScheduleAlarmError};
use rp_pico::hal::Clock;

use lighthouse_oled::config::MAX_PRIORITY;
use lighthouse_oled::{
    main_loop, tick, AnimationConfig, AnimationController, DisplayMode, Ssd1351, TickSignal,
    TickSource, TimerConfig,
};

static TICK: TickSignal = TickSignal::new();
static TICK_SOURCE: Mutex<RefCell<Option<AlarmTicks>>> = Mutex::new(RefCell::new(None));

/// Alarm 0 of the RP2040 `TIMER` as a periodic tick. The alarm is one-shot,
/// so acknowledging also re-arms it.
struct AlarmTicks {
    alarm: Alarm0,
    nvic: NVIC,
    period: MicrosDurationU32,
}

impl AlarmTicks {
    fn new(alarm: Alarm0, nvic: NVIC) -> Self {
        Self {
            alarm,
            nvic,
            period: MicrosDurationU32::secs(1),
        }
    }
}

impl TickSource for AlarmTicks {
    type Error = ScheduleAlarmError;

    fn configure(
        &mut self,
        config: &TimerConfig,
        period: MicrosDurationU32,
    ) -> Result<(), ScheduleAlarmError> {
        self.period = period;
        // NVIC: lower value preempts; the RP2040 only implements the top two bits
        let level = (MAX_PRIORITY - config.priority.min(MAX_PRIORITY)) << 5;
        unsafe {
            self.nvic.set_priority(pac::Interrupt::TIMER_IRQ_0, level);
        }
        self.alarm.schedule(self.period)
    }

    fn acknowledge(&mut self) {
        self.alarm.clear_interrupt();
        self.alarm.schedule(self.period).ok();
    }

    fn enable_interrupt(&mut self) {
        self.alarm.enable_interrupt();
        unsafe {
            NVIC::unmask(pac::Interrupt::TIMER_IRQ_0);
        }
    }

    fn disable_interrupt(&mut self) {
        NVIC::mask(pac::Interrupt::TIMER_IRQ_0);
        self.alarm.disable_interrupt();
    }
}

#[entry]
fn main() -> ! {
    let mut pac = pac::Peripherals::take().unwrap();
    let core = pac::CorePeripherals::take().unwrap();

    let mut watchdog = hal::Watchdog::new(pac.WATCHDOG);

    // Configure the clocks (125 MHz system clock)
    let clocks = hal::clocks::init_clocks_and_plls(
        rp_pico::XOSC_CRYSTAL_FREQ,
        pac.XOSC,
        pac.CLOCKS,
        pac.PLL_SYS,
        pac.PLL_USB,
        &mut pac.RESETS,
        &mut watchdog,
    )
    .ok()
    .unwrap();

    let sio = hal::Sio::new(pac.SIO); // single-cycle IO
    let pins = rp_pico::Pins::new(
        pac.IO_BANK0,
        pac.PADS_BANK0,
        sio.gpio_bank0,
        &mut pac.RESETS,
    );
    let mut delay = cortex_m::delay::Delay::new(core.SYST, clocks.system_clock.freq().to_Hz());

    // OLED C click on SPI0: SCK=GP18, MOSI=GP19, CS=GP17, D/C=GP20, RST=GP21
    let spi_sclk = pins.gpio18.into_function::<hal::gpio::FunctionSpi>();
    let spi_mosi = pins.gpio19.into_function::<hal::gpio::FunctionSpi>();
    let spi = hal::spi::Spi::<_, _, _, 8>::new(pac.SPI0, (spi_mosi, spi_sclk)).init(
        &mut pac.RESETS,
        clocks.peripheral_clock.freq(),
        16.MHz(),
        embedded_hal::spi::MODE_0,
    );
    let cs = pins.gpio17.into_push_pull_output();
    let dc = pins.gpio20.into_push_pull_output();
    let mut rst = pins.gpio21.into_push_pull_output();

    rst.set_low().unwrap();
    delay.delay_ms(1);
    rst.set_high().unwrap();
    delay.delay_ms(1);

    let spi = ExclusiveDevice::new(spi, cs, NoDelay).unwrap();
    let mut panel = Ssd1351::new(spi, dc);
    panel.init().unwrap();
    panel.set_display_mode(DisplayMode::Normal).unwrap();

    let config = AnimationConfig::default();
    config.validate().unwrap();
    let mut controller = AnimationController::new(config);
    controller.start(&mut panel).unwrap();

    let mut timer = hal::Timer::new(pac.TIMER, &mut pac.RESETS, &clocks);
    let alarm0 = timer.alarm_0().unwrap();
    cortex_m::interrupt::free(|cs| {
        let mut source = TICK_SOURCE.borrow(cs).borrow_mut();
        let source = source.insert(AlarmTicks::new(alarm0, core.NVIC));
        tick::start_ticks(source, &TimerConfig::RP2040_1HZ).unwrap();
    });

    defmt::info!("Lighthouse running");
    main_loop::run(&TICK, &mut controller, &mut panel)
}

#[interrupt]
fn TIMER_IRQ_0() {
    cortex_m::interrupt::free(|cs| {
        if let Some(source) = TICK_SOURCE.borrow(cs).borrow_mut().as_mut() {
            tick::on_timer_interrupt(&TICK, source);
        }
    });
}
