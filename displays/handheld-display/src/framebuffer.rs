//! Frame buffer
//!
//! A fixed-size grid of 8-bit-per-channel RGB pixels, stored row-major.
//! Implements `embedded-graphics`' `DrawTarget`, so screens draw with the
//! usual primitives, text styles and images.

use alloc::vec;
use alloc::vec::Vec;
use core::convert::Infallible;

use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use embedded_graphics::prelude::*;
use handheld_protocol::Rgb565;

/// In-memory RGB canvas
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    pixels: Vec<Rgb888>,
}

impl core::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FrameBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl FrameBuffer {
    /// Create a black frame of the given size
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgb888::BLACK; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Read one pixel; `None` outside the frame
    pub fn pixel(&self, x: u16, y: u16) -> Option<Rgb888> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Write one pixel; writes outside the frame are dropped
    pub fn set_pixel(&mut self, x: u16, y: u16, color: Rgb888) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    /// Paint the whole frame one colour
    pub fn fill(&mut self, color: Rgb888) {
        self.pixels.fill(color);
    }

    /// Pixels in wire order: row-major, left to right, top to bottom
    pub fn pixels(&self) -> &[Rgb888] {
        &self.pixels
    }

    /// Pixels packed to RGB565, in wire order
    pub fn rgb565(&self) -> impl Iterator<Item = Rgb565> + '_ {
        self.pixels
            .iter()
            .map(|c| Rgb565::from_rgb888(c.r(), c.g(), c.b()))
    }

    fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(self.width as u32, self.height as u32)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let (Ok(x), Ok(y)) = (u16::try_from(point.x), u16::try_from(point.y)) {
                self.set_pixel(x, y, color);
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(color);
        Ok(())
    }
}
