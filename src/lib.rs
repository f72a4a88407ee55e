//! A simple Driver for the Waveshare 2.9" (V2) E-Ink Display via SPI
//!
//! The panel is driven by an SSD1680 compatible controller. This driver was built
//! using [`embedded-hal`] traits and runs without an allocator.
//!
//! [`embedded-hal`]: https://docs.rs/embedded-hal/1.0
//!
//! # Requirements
//!
//! ### SPI
//!
//! - MISO is not connected/available
//! - SPI_MODE_0 is used (CPHL = 0, CPOL = 0)
//! - 8 bits per word, MSB first
//! - 4Mhz is known to work
//!
//! ### Other....
//!
//! - Buffersize: Wherever a buffer is used it always needs to be of the size: `width / 8 * length`,
//!   where width is rounded up to a multiple of 8, see [`buffer_len`]
//!
//! # Examples
//!
//! ```ignore
//! use epd2in9_driver::{epd2in9_v2::*, prelude::*};
//!
//! let interface = DisplayInterface::new(spi, busy, dc, rst, delay, Config::default());
//! let mut epd = Epd2in9::new(interface);
//! epd.configure(PanelGeometry::new(WIDTH, HEIGHT))?;
//! epd.init()?;
//!
//! // draw something into the buffer
//! let text = TextRenderer::new(MonoFontGlyphs::new(&FONT_6X10));
//! text.draw_string(epd.buffer_mut().unwrap(), 0, 286, "hello");
//!
//! epd.display_base()?;
//! epd.sleep()?;
//! ```
#![no_std]

pub mod color;
pub mod command;
pub mod config;
pub mod epd2in9_v2;
pub mod error;
pub mod graphics;
/// Interface for the physical connection between display and the controlling device
pub mod interface;
pub mod text;
pub mod traits;
pub mod waveform;

#[cfg(test)]
mod testing;

/// Includes everything important besides the panel module itself
pub mod prelude {
    pub use crate::color::Color;
    pub use crate::config::Config;
    pub use crate::error::ErrorKind;
    pub use crate::graphics::{DisplayRotation, PanelGeometry, PixelBuffer};
    pub use crate::interface::DisplayInterface;
    pub use crate::text::{FontSize, GlyphLookup, TextRenderer};
    pub use crate::traits::PanelInterface;
    pub use crate::waveform::RefreshMode;
    pub use crate::SPI_MODE;

    #[cfg(feature = "fonts")]
    pub use crate::text::MonoFontGlyphs;
}

/// Computes the needed buffer length. Takes care of rounding up in case width
/// is not divisible by 8.
///
///  unused
///  bits        width
/// <----><------------------------>
/// \[XXXXX210\]\[76543210\]...\[76543210\] ^
/// \[XXXXX210\]\[76543210\]...\[76543210\] | height
/// \[XXXXX210\]\[76543210\]...\[76543210\] v
pub const fn buffer_len(width: usize, height: usize) -> usize {
    (width + 7) / 8 * height
}

use embedded_hal::spi::{Mode, Phase, Polarity};

/// SPI mode -
/// For more infos see [Requirements: SPI](index.html#spi)
pub const SPI_MODE: Mode = Mode {
    phase: Phase::CaptureOnFirstTransition,
    polarity: Polarity::IdleLow,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_len_rounds_width_up() {
        assert_eq!(buffer_len(128, 296), 4736);
        assert_eq!(buffer_len(122, 250), 4000);
        assert_eq!(buffer_len(8, 1), 1);
        assert_eq!(buffer_len(9, 1), 2);
    }
}
