//! B/W Color for the panel

#[cfg(feature = "graphics")]
use embedded_graphics_core::pixelcolor::BinaryColor;

/// Only B/W is driven, the 4-gray mode has no transfer path yet
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Color {
    /// Black pixel
    Black,
    /// White (or transparent) pixel
    #[default]
    White,
}

impl Color {
    /// Get the color encoding of the color for one bit
    ///
    /// The panel RAM is inverted compared to what one would expect:
    /// a set bit (1) is white, a cleared bit (0) is black.
    /// Every buffer access goes through this function and [`Color::from_bit`].
    pub fn bit_value(&self) -> u8 {
        match self {
            Color::White => 1u8,
            Color::Black => 0u8,
        }
    }

    /// Gets a full byte of black or white pixels
    pub fn byte_value(&self) -> u8 {
        match self {
            Color::White => 0xff,
            Color::Black => 0x00,
        }
    }

    /// Parses a single bit from the panel RAM
    pub fn from_bit(bit: bool) -> Self {
        if bit {
            Color::White
        } else {
            Color::Black
        }
    }
}

#[cfg(feature = "graphics")]
impl From<BinaryColor> for Color {
    fn from(b: BinaryColor) -> Color {
        match b {
            BinaryColor::On => Color::Black,
            BinaryColor::Off => Color::White,
        }
    }
}

#[cfg(feature = "graphics")]
impl From<Color> for BinaryColor {
    fn from(c: Color) -> BinaryColor {
        match c {
            Color::Black => BinaryColor::On,
            Color::White => BinaryColor::Off,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_polarity_is_inverted() {
        assert_eq!(Color::White.bit_value(), 1);
        assert_eq!(Color::Black.bit_value(), 0);
        assert_eq!(Color::from_bit(true), Color::White);
        assert_eq!(Color::from_bit(false), Color::Black);
    }

    #[test]
    fn byte_values() {
        assert_eq!(Color::White.byte_value(), 0xff);
        assert_eq!(Color::Black.byte_value(), 0x00);
    }

    #[cfg(feature = "graphics")]
    #[test]
    fn binary_color_conversion() {
        assert_eq!(Color::from(BinaryColor::On), Color::Black);
        assert_eq!(Color::from(BinaryColor::Off), Color::White);
        assert_eq!(BinaryColor::from(Color::Black), BinaryColor::On);
    }
}
