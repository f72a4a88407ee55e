//! Text rendering with fixed pitch bitmap fonts
//!
//! Text runs along the long axis of the panel: starting at `start_y` each character
//! is placed `cell_width + 1` pixels further towards `y = 0`, while the glyph rows
//! grow towards larger `x`.

use log::trace;

use crate::color::Color;
use crate::graphics::PixelBuffer;

/// Pixels between two glyph cells
pub const GLYPH_SPACING: u32 = 1;

/// A bitmap font, the glyph data lives outside of this crate
///
/// Characters the font doesn't know are rendered as whatever the font returns for
/// them, the renderer doesn't substitute anything.
pub trait GlyphLookup {
    /// Extent of one glyph cell along the writing direction
    fn cell_width(&self) -> u32;

    /// Extent of one glyph cell across the writing direction
    fn cell_height(&self) -> u32;

    /// Whether the glyph of `c` is inked at `row` (across) and `col` (along)
    fn is_set(&self, c: char, row: u32, col: u32) -> bool;
}

impl<F: GlyphLookup + ?Sized> GlyphLookup for &F {
    fn cell_width(&self) -> u32 {
        (**self).cell_width()
    }

    fn cell_height(&self) -> u32 {
        (**self).cell_height()
    }

    fn is_set(&self, c: char, row: u32, col: u32) -> bool {
        (**self).is_set(c, row, col)
    }
}

/// The two font cells used on the clock face
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontSize {
    /// 6px cell
    Small,
    /// 12px cell
    Medium,
}

impl FontSize {
    /// Cell extent along the writing direction
    pub fn cell_width(self) -> u32 {
        match self {
            FontSize::Small => 6,
            FontSize::Medium => 12,
        }
    }

    /// Cursor advance per character
    pub fn pitch(self) -> u32 {
        self.cell_width() + GLYPH_SPACING
    }
}

/// Stamps strings into a [`PixelBuffer`]
pub struct TextRenderer<F> {
    font: F,
}

impl<F: GlyphLookup> TextRenderer<F> {
    /// Renderer drawing with `font`
    pub fn new(font: F) -> Self {
        TextRenderer { font }
    }

    /// Font in use
    pub fn font(&self) -> &F {
        &self.font
    }

    /// Cursor advance per character
    pub fn pitch(&self) -> u32 {
        self.font.cell_width() + GLYPH_SPACING
    }

    /// Draws `text` starting at (`start_x`, `start_y`)
    ///
    /// Every pixel of a glyph cell is written: inked pixels black, the rest white, so
    /// the text replaces whatever was below it. Returns how far the cursor moved,
    /// `chars * (cell_width + 1)`.
    pub fn draw_string<const BYTES: usize>(
        &self,
        buffer: &mut PixelBuffer<BYTES>,
        start_x: i32,
        start_y: i32,
        text: &str,
    ) -> u32 {
        trace!("drawing {:?} at ({}, {})", text, start_x, start_y);
        let mut advance = 0u32;
        for c in text.chars() {
            self.draw_glyph(buffer, start_x, start_y - advance as i32, c);
            advance += self.pitch();
        }
        advance
    }

    fn draw_glyph<const BYTES: usize>(
        &self,
        buffer: &mut PixelBuffer<BYTES>,
        x: i32,
        y: i32,
        c: char,
    ) {
        for row in 0..self.font.cell_height() {
            for col in 0..self.font.cell_width() {
                let color = if self.font.is_set(c, row, col) {
                    Color::Black
                } else {
                    Color::White
                };
                buffer.set_pixel(x + row as i32, y - col as i32, color);
            }
        }
    }
}

#[cfg(feature = "fonts")]
pub use mono::MonoFontGlyphs;

#[cfg(feature = "fonts")]
mod mono {
    use super::GlyphLookup;
    use embedded_graphics::{
        image::GetPixel,
        mono_font::{mapping::GlyphMapping, MonoFont},
        pixelcolor::BinaryColor,
        prelude::*,
    };

    /// Uses an `embedded-graphics` mono font as glyph source
    pub struct MonoFontGlyphs<'a> {
        font: &'a MonoFont<'a>,
    }

    impl<'a> MonoFontGlyphs<'a> {
        /// Wraps `font`
        pub fn new(font: &'a MonoFont<'a>) -> Self {
            MonoFontGlyphs { font }
        }

        fn glyph_origin(&self, c: char) -> Option<Point> {
            let cell = self.font.character_size;
            let per_row = self.font.image.size().width.checked_div(cell.width)?;
            if per_row == 0 {
                return None;
            }
            let index = self.font.glyph_mapping.index(c) as u32;
            Some(Point::new(
                ((index % per_row) * cell.width) as i32,
                ((index / per_row) * cell.height) as i32,
            ))
        }
    }

    impl GlyphLookup for MonoFontGlyphs<'_> {
        fn cell_width(&self) -> u32 {
            self.font.character_size.width
        }

        fn cell_height(&self) -> u32 {
            self.font.character_size.height
        }

        fn is_set(&self, c: char, row: u32, col: u32) -> bool {
            self.glyph_origin(c).is_some_and(|origin| {
                self.font
                    .image
                    .pixel(origin + Point::new(col as i32, row as i32))
                    == Some(BinaryColor::On)
            })
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::buffer_len;
    use crate::graphics::{DisplayRotation, PanelGeometry};

    /// 6x10 test font: '#' is a filled cell, 'L' inks the first row and first column,
    /// everything else is blank
    pub(crate) struct BlockFont {
        pub(crate) width: u32,
    }

    impl GlyphLookup for BlockFont {
        fn cell_width(&self) -> u32 {
            self.width
        }

        fn cell_height(&self) -> u32 {
            10
        }

        fn is_set(&self, c: char, row: u32, col: u32) -> bool {
            match c {
                '#' => true,
                'L' => row == 0 || col == 0,
                _ => false,
            }
        }
    }

    const W: u32 = 32;
    const H: u32 = 64;
    type TestBuffer = PixelBuffer<{ buffer_len(W as usize, H as usize) }>;

    fn buffer() -> TestBuffer {
        TestBuffer::new(PanelGeometry::new(W, H).rotated(DisplayRotation::Rotate0)).unwrap()
    }

    #[test]
    fn empty_string_changes_nothing() {
        let mut buffer = buffer();
        buffer.set_pixel_default(1, 1);
        let before = buffer.buffer().to_vec();

        let renderer = TextRenderer::new(BlockFont { width: 6 });
        assert_eq!(renderer.draw_string(&mut buffer, 0, 60, ""), 0);
        assert_eq!(buffer.buffer(), &before[..]);
    }

    #[test]
    fn cursor_advances_by_pitch() {
        let mut buffer = buffer();
        let small = TextRenderer::new(BlockFont {
            width: FontSize::Small.cell_width(),
        });
        assert_eq!(small.draw_string(&mut buffer, 0, 60, "ab#"), 3 * 7);

        let medium = TextRenderer::new(BlockFont {
            width: FontSize::Medium.cell_width(),
        });
        assert_eq!(medium.draw_string(&mut buffer, 0, 60, "ab"), 2 * 13);
        assert_eq!(FontSize::Medium.pitch(), 13);
    }

    #[test]
    fn glyphs_grow_towards_smaller_y() {
        let mut buffer = buffer();
        let renderer = TextRenderer::new(BlockFont { width: 6 });
        renderer.draw_string(&mut buffer, 2, 40, "##");

        // first cell covers y 35..=40, the gap at y 34 stays white, second cell 28..=33
        for x in 2..12 {
            for y in 35..=40 {
                assert_eq!(buffer.get_pixel(x, y), Some(Color::Black), "({x}, {y})");
            }
            assert_eq!(buffer.get_pixel(x, 34), Some(Color::White));
            for y in 28..=33 {
                assert_eq!(buffer.get_pixel(x, y), Some(Color::Black), "({x}, {y})");
            }
        }
        assert_eq!(buffer.get_pixel(12, 40), Some(Color::White));
        assert_eq!(buffer.get_pixel(2, 41), Some(Color::White));
    }

    #[test]
    fn glyph_orientation() {
        let mut buffer = buffer();
        let renderer = TextRenderer::new(BlockFont { width: 6 });
        renderer.draw_string(&mut buffer, 0, 20, "L");

        // row 0 runs along y, column 0 along x
        for y in 15..=20 {
            assert_eq!(buffer.get_pixel(0, y), Some(Color::Black));
        }
        for x in 0..10 {
            assert_eq!(buffer.get_pixel(x, 20), Some(Color::Black));
        }
        assert_eq!(buffer.get_pixel(5, 17), Some(Color::White));
    }

    #[test]
    fn text_overwrites_background() {
        let mut buffer = buffer();
        for x in 0..10 {
            for y in 15..=20 {
                buffer.set_pixel_default(x, y);
            }
        }
        TextRenderer::new(BlockFont { width: 6 }).draw_string(&mut buffer, 0, 20, " ");
        for x in 0..10 {
            for y in 15..=20 {
                assert_eq!(buffer.get_pixel(x, y), Some(Color::White));
            }
        }
    }

    #[cfg(feature = "fonts")]
    #[test]
    fn mono_font_lookup() {
        use embedded_graphics::mono_font::ascii::FONT_6X10;

        let glyphs = MonoFontGlyphs::new(&FONT_6X10);
        assert_eq!(glyphs.cell_width(), 6);
        assert_eq!(glyphs.cell_height(), 10);

        let inked = |c| {
            (0..10)
                .flat_map(|row| (0..6).map(move |col| (row, col)))
                .filter(|&(row, col)| glyphs.is_set(c, row, col))
                .count()
        };
        assert_eq!(inked(' '), 0);
        assert!(inked('A') > 0);
    }
}
