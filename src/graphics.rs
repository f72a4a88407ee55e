//! Framebuffer of the panel with rotation aware addressing

use bit_field::BitField;
use log::warn;

use crate::buffer_len;
use crate::color::Color;
use crate::error::ErrorKind;

/// Display rotation, only 90° increments supported
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DisplayRotation {
    /// No rotation
    #[default]
    Rotate0,
    /// Rotate by 90 degrees clockwise
    Rotate90,
    /// Rotate by 180 degrees clockwise
    Rotate180,
    /// Rotate 270 degrees clockwise
    Rotate270,
}

/// Size and orientation of the addressable panel area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelGeometry {
    width: u32,
    height: u32,
    logical_width: u32,
    rotation: DisplayRotation,
}

impl PanelGeometry {
    /// Geometry with the logical width rounded up to the next multiple of 8
    pub const fn new(width: u32, height: u32) -> Self {
        PanelGeometry {
            width,
            height,
            logical_width: (width + 7) / 8 * 8,
            rotation: DisplayRotation::Rotate0,
        }
    }

    /// Geometry with an explicit logical width
    ///
    /// The logical width needs to cover `width` and to be a multiple of 8.
    pub fn with_logical_width(
        width: u32,
        height: u32,
        logical_width: u32,
    ) -> Result<Self, ErrorKind> {
        if logical_width < width || logical_width % 8 != 0 || width == 0 || height == 0 {
            return Err(ErrorKind::InvalidGeometry);
        }
        Ok(PanelGeometry {
            width,
            height,
            logical_width,
            rotation: DisplayRotation::Rotate0,
        })
    }

    /// Same geometry, drawn with `rotation`
    pub fn rotated(mut self, rotation: DisplayRotation) -> Self {
        self.rotation = rotation;
        self
    }

    /// Visible width in pixels when not rotated
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels when not rotated
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Width of one buffer line in pixels, always byte aligned
    pub fn logical_width(&self) -> u32 {
        self.logical_width
    }

    /// Current rotation
    pub fn rotation(&self) -> DisplayRotation {
        self.rotation
    }

    /// Number of bytes needed for one RAM plane
    pub fn buffer_len(&self) -> usize {
        buffer_len(self.logical_width as usize, self.height as usize)
    }

    /// Maps rotated drawing coordinates onto panel coordinates (clockwise rotation)
    ///
    /// `None` if the result doesn't fit into an `i32`, which is outside the panel anyway.
    pub fn transform(&self, x: i32, y: i32) -> Option<(i32, i32)> {
        // as i32 = never use more than 2 billion pixel per line or per column
        let width = self.width as i32;
        let height = self.height as i32;
        let mirror = |extent: i32, v: i32| extent.checked_sub(v)?.checked_sub(1);
        match self.rotation {
            DisplayRotation::Rotate0 => Some((x, y)),
            DisplayRotation::Rotate90 => Some((mirror(width, y)?, x)),
            DisplayRotation::Rotate180 => Some((mirror(width, x)?, mirror(height, y)?)),
            DisplayRotation::Rotate270 => Some((y, mirror(height, x)?)),
        }
    }

    /// Drawable size as seen with the current rotation
    pub fn size(&self) -> (u32, u32) {
        match self.rotation {
            DisplayRotation::Rotate0 | DisplayRotation::Rotate180 => {
                (self.logical_width, self.height)
            }
            DisplayRotation::Rotate90 | DisplayRotation::Rotate270 => {
                (self.height, self.logical_width)
            }
        }
    }

    /// Byte index and bit position of a panel coordinate, `None` if outside the buffer
    fn locate(&self, x: i32, y: i32) -> Option<(usize, usize)> {
        if x < 0 || y < 0 || x as u32 >= self.logical_width || y as u32 >= self.height {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        let index = (x + y * self.logical_width as usize) / 8;
        // MSB is the leftmost pixel of a byte
        Some((index, 7 - x % 8))
    }
}

/// Bit packed pixel buffer, one bit per pixel
///
/// - BYTES: size of the buffer, has to match `logical_width * height / 8`
///
/// See [`Color::bit_value`] for the bit polarity.
#[derive(Clone)]
pub struct PixelBuffer<const BYTES: usize> {
    buffer: [u8; BYTES],
    geometry: PanelGeometry,
}

impl<const BYTES: usize> PixelBuffer<BYTES> {
    /// Creates a white buffer for `geometry`
    pub fn new(geometry: PanelGeometry) -> Result<Self, ErrorKind> {
        if geometry.buffer_len() != BYTES {
            return Err(ErrorKind::InvalidGeometry);
        }
        Ok(PixelBuffer {
            buffer: [Color::White.byte_value(); BYTES],
            geometry,
        })
    }

    /// get internal buffer to use it (to draw in epd)
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// Geometry the buffer was created with
    pub fn geometry(&self) -> &PanelGeometry {
        &self.geometry
    }

    /// Set the display rotation.
    ///
    /// This only concerns future drawing made to it. Anything aready drawn
    /// stays as it is in the buffer.
    pub fn set_rotation(&mut self, rotation: DisplayRotation) {
        self.geometry.rotation = rotation;
    }

    /// Get current rotation
    pub fn rotation(&self) -> DisplayRotation {
        self.geometry.rotation
    }

    /// Drawable size as seen with the current rotation
    pub fn size(&self) -> (u32, u32) {
        self.geometry.size()
    }

    /// Fills the whole buffer with white
    pub fn clear(&mut self) {
        self.buffer.fill(Color::White.byte_value());
    }

    /// Set a specific pixel color on this buffer
    ///
    /// Pixels outside of the panel are dropped with a warning.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        let located = self
            .geometry
            .transform(x, y)
            .and_then(|(px, py)| self.geometry.locate(px, py));
        match located {
            Some((index, bit)) => {
                self.buffer[index].set_bit(bit, color.bit_value() == 1);
            }
            None => warn!(
                "drawing out of space: width={} x={}, height={} y={}",
                self.geometry.width, x, self.geometry.height, y
            ),
        }
    }

    /// Reads a pixel back, with the same rotation as [`set_pixel`](Self::set_pixel)
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<Color> {
        let (px, py) = self.geometry.transform(x, y)?;
        self.geometry
            .locate(px, py)
            .map(|(index, bit)| Color::from_bit(self.buffer[index].get_bit(bit)))
    }

    /// Sets a black pixel
    pub fn set_pixel_default(&mut self, x: i32, y: i32) {
        self.set_pixel(x, y, Color::Black);
    }

    /// Black line of `length` pixels, going along y
    pub fn draw_horizontal_line(&mut self, x: i32, y: i32, length: u32) {
        for i in 0..length {
            match y.checked_add_unsigned(i) {
                Some(y) => self.set_pixel_default(x, y),
                None => break,
            }
        }
    }

    /// Black line of `length` pixels, going along x
    pub fn draw_vertical_line(&mut self, x: i32, y: i32, length: u32) {
        for i in 0..length {
            match x.checked_add_unsigned(i) {
                Some(x) => self.set_pixel_default(x, y),
                None => break,
            }
        }
    }

    /// Black outline, `width` along y and `height` along x
    pub fn draw_rectangle(&mut self, x: i32, y: i32, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.draw_horizontal_line(x, y, width);
        if let Some(bottom) = x.checked_add_unsigned(height - 1) {
            self.draw_horizontal_line(bottom, y, width);
        }
        self.draw_vertical_line(x, y, height);
        if let Some(right) = y.checked_add_unsigned(width - 1) {
            self.draw_vertical_line(x, right, height);
        }
    }
}

#[cfg(feature = "graphics")]
mod draw_target {
    use super::PixelBuffer;
    use embedded_graphics_core::{pixelcolor::BinaryColor, prelude::*};

    /// For use with embedded_grahics
    impl<const BYTES: usize> DrawTarget for PixelBuffer<BYTES> {
        type Color = BinaryColor;
        type Error = core::convert::Infallible;

        fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
        where
            I: IntoIterator<Item = Pixel<Self::Color>>,
        {
            for Pixel(point, color) in pixels {
                self.set_pixel(point.x, point.y, color.into());
            }
            Ok(())
        }
    }

    /// For use with embedded_grahics
    impl<const BYTES: usize> OriginDimensions for PixelBuffer<BYTES> {
        fn size(&self) -> Size {
            let (width, height) = PixelBuffer::<BYTES>::size(self);
            Size::new(width, height)
        }
    }
}
