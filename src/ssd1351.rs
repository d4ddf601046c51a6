//! SSD1351 RGB565 OLED controller over 4-wire SPI.
//!
//! The panel is the 96×96 glass of the OLED C click, mapped into the
//! controller's 128×128 RAM with a column offset of 16.

use core::fmt;

use embedded_graphics::{pixelcolor::Rgb565, prelude::*, primitives::Rectangle};
use embedded_hal::{digital::OutputPin, spi::SpiDevice};

use crate::surface::DisplaySurface;

pub const WIDTH: u32 = 96;
pub const HEIGHT: u32 = 96;

const COLUMN_OFFSET: u8 = 16;
const ROW_OFFSET: u8 = 0;

mod cmd {
    pub const SET_COLUMN: u8 = 0x15;
    pub const SET_ROW: u8 = 0x75;
    pub const WRITE_RAM: u8 = 0x5C;
    pub const SET_REMAP: u8 = 0xA0;
    pub const START_LINE: u8 = 0xA1;
    pub const DISPLAY_OFFSET: u8 = 0xA2;
    pub const MODE_NORMAL: u8 = 0xA6;
    pub const MODE_INVERSE: u8 = 0xA7;
    pub const FUNCTION_SELECT: u8 = 0xAB;
    pub const SLEEP_ON: u8 = 0xAE;
    pub const SLEEP_OFF: u8 = 0xAF;
    pub const PHASE_PERIOD: u8 = 0xB1;
    pub const CLOCK_DIV: u8 = 0xB3;
    pub const PRECHARGE2: u8 = 0xB6;
    pub const VCOMH: u8 = 0xBE;
    pub const CONTRAST: u8 = 0xC1;
    pub const MASTER_CURRENT: u8 = 0xC7;
    pub const MUX_RATIO: u8 = 0xCA;
    pub const COMMAND_LOCK: u8 = 0xFD;
}

/// Power-up sequence, sent in order by [`Ssd1351::init`].
const INIT_SEQUENCE: &[(u8, &[u8])] = &[
    (cmd::COMMAND_LOCK, &[0x12]),
    (cmd::COMMAND_LOCK, &[0xB1]),
    (cmd::SLEEP_ON, &[]),
    (cmd::CLOCK_DIV, &[0xF1]),
    (cmd::MUX_RATIO, &[HEIGHT as u8 - 1]),
    // 65k colors, COM split, scan from COM[N-1]
    (cmd::SET_REMAP, &[0x74]),
    (cmd::START_LINE, &[0x00]),
    (cmd::DISPLAY_OFFSET, &[0x00]),
    (cmd::FUNCTION_SELECT, &[0x01]),
    (cmd::PHASE_PERIOD, &[0x32]),
    (cmd::VCOMH, &[0x05]),
    (cmd::MODE_NORMAL, &[]),
    (cmd::CONTRAST, &[0x8A, 0x51, 0x8A]),
    (cmd::MASTER_CURRENT, &[0x0F]),
    (cmd::PRECHARGE2, &[0x01]),
    (cmd::SLEEP_OFF, &[]),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayMode {
    Normal,
    /// Every pixel shown with its bits inverted.
    Inverse,
}

#[derive(Debug)]
pub enum Ssd1351Error<SpiE, PinE> {
    /// SPI transfer failed.
    Spi(SpiE),
    /// Driving the D/C pin failed.
    Pin(PinE),
}

impl<SpiE: fmt::Debug, PinE: fmt::Debug> fmt::Display for Ssd1351Error<SpiE, PinE> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Ssd1351Error::Spi(e) => write!(f, "SPI error: {:?}", e),
            Ssd1351Error::Pin(e) => write!(f, "D/C pin error: {:?}", e),
        }
    }
}

#[cfg(feature = "defmt")]
impl<SpiE, PinE> defmt::Format for Ssd1351Error<SpiE, PinE> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Ssd1351Error::Spi(_) => defmt::write!(f, "SPI error"),
            Ssd1351Error::Pin(_) => defmt::write!(f, "D/C pin error"),
        }
    }
}

/// SSD1351 driver. Chip select is owned by the [`SpiDevice`].
pub struct Ssd1351<SPI, DC> {
    spi: SPI,
    dc: DC,
}

impl<SPI, DC> Ssd1351<SPI, DC>
where
    SPI: SpiDevice,
    DC: OutputPin,
{
    /// Wraps the bus without sending anything; call [`init`](Self::init) next.
    pub fn new(spi: SPI, dc: DC) -> Self {
        Self { spi, dc }
    }

    pub fn init(&mut self) -> Result<(), Ssd1351Error<SPI::Error, DC::Error>> {
        for (command, params) in INIT_SEQUENCE {
            self.command(*command, params)?;
        }

        #[cfg(feature = "defmt")]
        defmt::info!("SSD1351 initialised ({}x{})", WIDTH, HEIGHT);

        Ok(())
    }

    pub fn set_display_mode(
        &mut self,
        mode: DisplayMode,
    ) -> Result<(), Ssd1351Error<SPI::Error, DC::Error>> {
        match mode {
            DisplayMode::Normal => self.command(cmd::MODE_NORMAL, &[]),
            DisplayMode::Inverse => self.command(cmd::MODE_INVERSE, &[]),
        }
    }

    fn command(
        &mut self,
        command: u8,
        params: &[u8],
    ) -> Result<(), Ssd1351Error<SPI::Error, DC::Error>> {
        self.dc.set_low().map_err(Ssd1351Error::Pin)?;
        self.spi.write(&[command]).map_err(Ssd1351Error::Spi)?;
        if !params.is_empty() {
            self.data(params)?;
        }
        Ok(())
    }

    fn data(&mut self, bytes: &[u8]) -> Result<(), Ssd1351Error<SPI::Error, DC::Error>> {
        self.dc.set_high().map_err(Ssd1351Error::Pin)?;
        self.spi.write(bytes).map_err(Ssd1351Error::Spi)
    }
}

impl<SPI, DC> DisplaySurface for Ssd1351<SPI, DC>
where
    SPI: SpiDevice,
    DC: OutputPin,
{
    type Error = Ssd1351Error<SPI::Error, DC::Error>;

    fn size(&self) -> Size {
        Size::new(WIDTH, HEIGHT)
    }

    fn set_draw_region(&mut self, region: Rectangle) -> Result<(), Self::Error> {
        let Some(end) = region.bottom_right() else {
            return Ok(());
        };
        let start = region.top_left;
        self.command(
            cmd::SET_COLUMN,
            &[start.x as u8 + COLUMN_OFFSET, end.x as u8 + COLUMN_OFFSET],
        )?;
        self.command(cmd::SET_ROW, &[start.y as u8 + ROW_OFFSET, end.y as u8 + ROW_OFFSET])?;
        self.command(cmd::WRITE_RAM, &[])
    }

    fn stream_pixel_color(&mut self, color: Rgb565) -> Result<(), Self::Error> {
        self.data(&color.into_storage().to_be_bytes())
    }
}
