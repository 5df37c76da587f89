// DistWatch - SSD1306 OLED Driver
//
// Register-level driver over the shared I2C bus with a local frame buffer.
// Implements `DrawTarget` so the watch face renders straight into it; call
// `flush` to push the buffer to the panel.

use std::convert::Infallible;
use std::sync::PoisonError;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;

use crate::config::*;
use crate::drivers::SharedBus;

// I2C control bytes
const CONTROL_COMMAND: u8 = 0x00;
const CONTROL_DATA: u8 = 0x40;

// SSD1306 commands
const CMD_DISPLAY_OFF: u8 = 0xAE;
const CMD_DISPLAY_ON: u8 = 0xAF;
const CMD_SET_CONTRAST: u8 = 0x81;
const CMD_COLUMN_ADDR: u8 = 0x21;
const CMD_PAGE_ADDR: u8 = 0x22;

const INIT_SEQUENCE: &[u8] = &[
    CMD_DISPLAY_OFF,
    0xD5, 0x80, // clock divide
    0xA8, 0x3F, // multiplex 64
    0xD3, 0x00, // display offset
    0x40,       // start line 0
    0x8D, 0x14, // charge pump on
    0x20, 0x00, // horizontal addressing
    0xA1,       // segment remap
    0xC8,       // COM scan descending
    0xDA, 0x12, // COM pins
    0xD9, 0xF1, // pre-charge
    0xDB, 0x40, // VCOMH
    0xA4,       // resume from RAM
    0xA6,       // normal, not inverted
    CMD_SET_CONTRAST, CONTRAST_DIM,
    CMD_DISPLAY_ON,
];

// Data bytes per I2C transaction
const CHUNK: usize = 16;

pub struct Ssd1306 {
    bus: SharedBus,
    buffer: [u8; DISPLAY_BUFFER_SIZE],
}

impl Ssd1306 {
    pub fn new(bus: SharedBus) -> Self {
        Self {
            bus,
            buffer: [0; DISPLAY_BUFFER_SIZE],
        }
    }

    pub fn is_connected(&self) -> bool {
        self.command(&[0xE3]).is_ok() // NOP
    }

    pub fn init(&mut self) -> anyhow::Result<()> {
        self.command(INIT_SEQUENCE)?;
        self.buffer.fill(0);
        self.flush()?;
        log::info!("SSD1306 initialised ({}x{})", SCREEN_WIDTH, SCREEN_HEIGHT);
        Ok(())
    }

    pub fn set_contrast(&mut self, level: u8) -> anyhow::Result<()> {
        self.command(&[CMD_SET_CONTRAST, level])
    }

    /// Push the whole frame buffer to the panel.
    pub fn flush(&mut self) -> anyhow::Result<()> {
        let last_page = (SCREEN_HEIGHT / 8 - 1) as u8;
        let last_column = (SCREEN_WIDTH - 1) as u8;
        self.command(&[CMD_COLUMN_ADDR, 0, last_column, CMD_PAGE_ADDR, 0, last_page])?;

        let mut bus = self.bus.lock().unwrap_or_else(PoisonError::into_inner);
        let mut packet = [0u8; CHUNK + 1];
        packet[0] = CONTROL_DATA;
        for chunk in self.buffer.chunks(CHUNK) {
            packet[1..=chunk.len()].copy_from_slice(chunk);
            bus.write(I2C_ADDR_OLED, &packet[..=chunk.len()], I2C_TIMEOUT_TICKS)?;
        }
        Ok(())
    }

    fn command(&self, bytes: &[u8]) -> anyhow::Result<()> {
        let mut bus = self.bus.lock().unwrap_or_else(PoisonError::into_inner);
        for &byte in bytes {
            bus.write(I2C_ADDR_OLED, &[CONTROL_COMMAND, byte], I2C_TIMEOUT_TICKS)?;
        }
        Ok(())
    }
}

impl OriginDimensions for Ssd1306 {
    fn size(&self) -> Size {
        Size::new(SCREEN_WIDTH, SCREEN_HEIGHT)
    }
}

impl DrawTarget for Ssd1306 {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            let (Ok(x), Ok(y)) = (u32::try_from(point.x), u32::try_from(point.y)) else {
                continue;
            };
            if x >= SCREEN_WIDTH || y >= SCREEN_HEIGHT {
                continue;
            }
            // Page-major layout: one byte covers 8 vertical pixels.
            let index = x as usize + (y / 8) as usize * SCREEN_WIDTH as usize;
            let bit = 1u8 << (y % 8);
            if color.is_on() {
                self.buffer[index] |= bit;
            } else {
                self.buffer[index] &= !bit;
            }
        }
        Ok(())
    }
}
