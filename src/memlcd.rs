//! Sharp memory LCD driver (144x168, LS013B7DH05 class)
//!
//! The panel keeps its own pixel memory, so only changed lines need to be
//! sent. Drawing goes into an in-RAM [`FrameBuffer`]; [`MemoryLcd::flush`]
//! writes the dirty lines out over SPI.
//!
//! Wire format (one transaction, chip select held high):
//!
//! ```text
//! [cmd] ([line addr] [18 data bytes] [0x00])* [0x00]
//! ```
//!
//! Command bits and line addresses are defined LSB first by the panel while
//! the SPI peripheral shifts MSB first, so those bytes are bit-reversed.
//! Data bytes are stored leftmost pixel in the MSB and go out unchanged.

use embedded_graphics::{
    pixelcolor::BinaryColor,
    prelude::{DrawTarget, OriginDimensions, Pixel, Point, Size},
};
use embedded_hal::{blocking::spi::Write, digital::v2::OutputPin};

pub const WIDTH: u32 = 144;
pub const HEIGHT: u32 = 168;

const LINE_BYTES: usize = WIDTH as usize / 8;
const BUFFER_BYTES: usize = LINE_BYTES * HEIGHT as usize;
const DIRTY_BYTES: usize = (HEIGHT as usize + 7) / 8;

const CMD_WRITE: u8 = 0x01;
const CMD_VCOM: u8 = 0x02;
const CMD_CLEAR: u8 = 0x04;

/// 1 bit per pixel frame buffer; a set bit is a lit (white) pixel
#[derive(Clone)]
pub struct FrameBuffer {
    pixels: [u8; BUFFER_BYTES],
    dirty: [u8; DIRTY_BYTES],
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    pub const fn new() -> Self {
        Self {
            pixels: [0; BUFFER_BYTES],
            // Panel contents are unknown at power-up
            dirty: [0xFF; DIRTY_BYTES],
        }
    }

    pub fn set_pixel(&mut self, point: Point, color: BinaryColor) {
        if point.x < 0 || point.y < 0 || point.x >= WIDTH as i32 || point.y >= HEIGHT as i32 {
            return;
        }
        let (x, y) = (point.x as usize, point.y as usize);
        let index = y * LINE_BYTES + x / 8;
        let bit = 0x80 >> (x % 8);
        let old = self.pixels[index];
        let new = match color {
            BinaryColor::On => old | bit,
            BinaryColor::Off => old & !bit,
        };
        if new != old {
            self.pixels[index] = new;
            self.dirty[y / 8] |= 1 << (y % 8);
        }
    }

    pub fn get_pixel(&self, point: Point) -> Option<BinaryColor> {
        if point.x < 0 || point.y < 0 || point.x >= WIDTH as i32 || point.y >= HEIGHT as i32 {
            return None;
        }
        let (x, y) = (point.x as usize, point.y as usize);
        let lit = self.pixels[y * LINE_BYTES + x / 8] & (0x80 >> (x % 8)) != 0;
        Some(BinaryColor::from(lit))
    }

    /// Packed pixels of one line
    pub fn line(&self, y: usize) -> &[u8] {
        &self.pixels[y * LINE_BYTES..(y + 1) * LINE_BYTES]
    }

    pub fn is_line_dirty(&self, y: usize) -> bool {
        y < HEIGHT as usize && self.dirty[y / 8] & (1 << (y % 8)) != 0
    }

    pub fn dirty_lines(&self) -> impl Iterator<Item = usize> + '_ {
        (0..HEIGHT as usize).filter(move |y| self.is_line_dirty(*y))
    }

    pub fn mark_clean(&mut self) {
        self.dirty = [0; DIRTY_BYTES];
    }

    /// Raw pixel memory, row major
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }
}

impl PartialEq for FrameBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.pixels == other.pixels
    }
}

impl core::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let lit = self.pixels.iter().map(|b| b.count_ones()).sum::<u32>();
        f.debug_struct("FrameBuffer").field("lit", &lit).finish()
    }
}

impl DrawTarget for FrameBuffer {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set_pixel(point, color);
        }
        Ok(())
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(WIDTH, HEIGHT)
    }
}

/// Errors from the LCD bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LcdError {
    /// SPI write failed
    Spi,
    /// Chip select could not be driven
    Pin,
}

/// Memory LCD on an SPI bus with an active-high chip select
pub struct MemoryLcd<SPI, CS> {
    spi: SPI,
    cs: CS,
    frame: FrameBuffer,
    vcom: bool,
}

impl<SPI, CS> MemoryLcd<SPI, CS>
where
    SPI: Write<u8>,
    CS: OutputPin,
{
    pub fn new(spi: SPI, mut cs: CS) -> Result<Self, LcdError> {
        cs.set_low().map_err(|_| LcdError::Pin)?;
        Ok(Self {
            spi,
            cs,
            frame: FrameBuffer::new(),
            vcom: false,
        })
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    fn command(&self, cmd: u8) -> u8 {
        let vcom = if self.vcom { CMD_VCOM } else { 0 };
        (cmd | vcom).reverse_bits()
    }

    fn transaction(
        &mut self,
        f: impl FnOnce(&mut SPI) -> Result<(), SPI::Error>,
    ) -> Result<(), LcdError> {
        self.cs.set_high().map_err(|_| LcdError::Pin)?;
        let result = f(&mut self.spi).map_err(|_| LcdError::Spi);
        self.cs.set_low().map_err(|_| LcdError::Pin)?;
        result
    }

    /// Blank the panel memory and the frame buffer
    pub fn clear_display(&mut self) -> Result<(), LcdError> {
        let frame = [self.command(CMD_CLEAR), 0x00];
        self.transaction(|spi| spi.write(&frame))?;
        self.frame = FrameBuffer::new();
        self.frame.mark_clean();
        Ok(())
    }

    /// Flip the common electrode polarity; call about once per second
    pub fn toggle_vcom(&mut self) -> Result<(), LcdError> {
        self.vcom = !self.vcom;
        let frame = [self.command(0), 0x00];
        self.transaction(|spi| spi.write(&frame))
    }

    /// Send every line changed since the last flush
    pub fn flush(&mut self) -> Result<(), LcdError> {
        if self.frame.dirty_lines().next().is_none() {
            return Ok(());
        }
        let cmd = self.command(CMD_WRITE);
        let frame = &self.frame;
        let spi = &mut self.spi;
        self.cs.set_high().map_err(|_| LcdError::Pin)?;
        let result = (|| {
            spi.write(&[cmd])?;
            let mut packet = [0u8; LINE_BYTES + 2];
            for y in frame.dirty_lines() {
                packet[0] = (y as u8 + 1).reverse_bits();
                packet[1..=LINE_BYTES].copy_from_slice(frame.line(y));
                packet[LINE_BYTES + 1] = 0x00;
                spi.write(&packet)?;
            }
            spi.write(&[0x00])
        })()
        .map_err(|_| LcdError::Spi);
        self.cs.set_low().map_err(|_| LcdError::Pin)?;
        result?;
        self.frame.mark_clean();
        Ok(())
    }
}

impl<SPI, CS> DrawTarget for MemoryLcd<SPI, CS> {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.frame.draw_iter(pixels)
    }
}

impl<SPI, CS> OriginDimensions for MemoryLcd<SPI, CS> {
    fn size(&self) -> Size {
        self.frame.size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_graphics::{
        prelude::*,
        primitives::{PrimitiveStyle, Rectangle},
    };
    use std::vec::Vec;

    #[derive(Default)]
    struct RecordingSpi {
        bytes: Vec<u8>,
    }

    impl Write<u8> for RecordingSpi {
        type Error = Infallible;
        fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
            self.bytes.extend_from_slice(words);
            Ok(())
        }
    }

    #[derive(Default)]
    struct Pin {
        high: bool,
        toggles: u32,
    }

    impl OutputPin for Pin {
        type Error = Infallible;
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.high = false;
            Ok(())
        }
        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.high = true;
            self.toggles += 1;
            Ok(())
        }
    }

    #[test]
    fn test_set_pixel_bit_order() {
        let mut fb = FrameBuffer::new();
        fb.set_pixel(Point::new(0, 0), BinaryColor::On);
        fb.set_pixel(Point::new(9, 0), BinaryColor::On);
        assert_eq!(fb.line(0)[0], 0x80);
        assert_eq!(fb.line(0)[1], 0x40);
        assert_eq!(fb.get_pixel(Point::new(9, 0)), Some(BinaryColor::On));
        assert_eq!(fb.get_pixel(Point::new(8, 0)), Some(BinaryColor::Off));
    }

    #[test]
    fn test_out_of_bounds_ignored() {
        let mut fb = FrameBuffer::new();
        fb.mark_clean();
        fb.set_pixel(Point::new(-1, 0), BinaryColor::On);
        fb.set_pixel(Point::new(144, 0), BinaryColor::On);
        fb.set_pixel(Point::new(0, 168), BinaryColor::On);
        assert!(fb.as_bytes().iter().all(|b| *b == 0));
        assert_eq!(fb.dirty_lines().count(), 0);
        assert_eq!(fb.get_pixel(Point::new(0, -1)), None);
    }

    #[test]
    fn test_only_changed_lines_dirty() {
        let mut fb = FrameBuffer::new();
        fb.mark_clean();
        Rectangle::new(Point::new(10, 5), Size::new(4, 2))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(&mut fb)
            .unwrap();
        let lines: Vec<usize> = fb.dirty_lines().collect();
        assert_eq!(lines, [5, 6]);

        // Writing the same pixels again changes nothing
        fb.mark_clean();
        fb.set_pixel(Point::new(10, 5), BinaryColor::On);
        assert_eq!(fb.dirty_lines().count(), 0);
    }

    #[test]
    fn test_flush_frame() {
        let mut lcd = MemoryLcd::new(RecordingSpi::default(), Pin::default()).unwrap();
        lcd.clear_display().unwrap();
        lcd.spi.bytes.clear();

        Pixel(Point::new(0, 2), BinaryColor::On).draw(&mut lcd).unwrap();
        lcd.flush().unwrap();

        let mut expected = std::vec![0x80, 0xC0, 0x80];
        expected.extend_from_slice(&[0u8; LINE_BYTES - 1]);
        expected.push(0x00);
        expected.push(0x00);
        assert_eq!(lcd.spi.bytes, expected);
        assert!(!lcd.cs.high);
        assert_eq!(lcd.frame().dirty_lines().count(), 0);
    }

    #[test]
    fn test_flush_without_changes_is_silent() {
        let mut lcd = MemoryLcd::new(RecordingSpi::default(), Pin::default()).unwrap();
        lcd.clear_display().unwrap();
        let toggles = lcd.cs.toggles;
        lcd.spi.bytes.clear();
        lcd.flush().unwrap();
        assert!(lcd.spi.bytes.is_empty());
        assert_eq!(lcd.cs.toggles, toggles);
    }

    #[test]
    fn test_vcom_and_clear_commands() {
        let mut lcd = MemoryLcd::new(RecordingSpi::default(), Pin::default()).unwrap();
        lcd.toggle_vcom().unwrap();
        assert_eq!(lcd.spi.bytes, [0x40, 0x00]);
        lcd.spi.bytes.clear();
        lcd.clear_display().unwrap();
        assert_eq!(lcd.spi.bytes, [0x60, 0x00]);
        lcd.spi.bytes.clear();
        lcd.toggle_vcom().unwrap();
        assert_eq!(lcd.spi.bytes, [0x00, 0x00]);
    }
}
