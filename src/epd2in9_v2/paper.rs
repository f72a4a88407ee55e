//! Text oriented front end for a landscape mounted 2.9" panel
//!
//! The panel is used upside down (rotated by 180°) with text running along its long
//! side. Every update is a partial refresh, the caller decides when a full refresh
//! is due, see [`full_refresh_due`].

use heapless::String;
use log::debug;

use super::{Epd2in9, PanelState, HEIGHT, WIDTH};
use crate::error::ErrorKind;
use crate::graphics::{DisplayRotation, PanelGeometry};
use crate::text::{GlyphLookup, TextRenderer};
use crate::traits::PanelInterface;

/// Time the panel needs after a full clear or entering sleep
pub const SETTLE_MS: u32 = 2_000;
/// Interval between full refreshes that remove partial refresh ghosting, 12 h
pub const FULL_REFRESH_INTERVAL_MS: u64 = 12 * 60 * 60 * 1_000;
/// Text lines start this far from the panel edge along y
pub const BASELINE_MARGIN: i32 = 10;
/// Pixels between two lines of [`PaperDisplay::update_raw_text`]
pub const LINE_SPACING: i32 = 10;
/// Where the status line is drawn
pub const STATUS_POSITION: (i32, i32) = (0, 60);
/// Longest status text that is remembered, longer ones are redrawn every time
pub const STATUS_CAPACITY: usize = 64;

/// Whether enough time passed since the last full refresh
pub fn full_refresh_due(elapsed_ms: u64) -> bool {
    elapsed_ms >= FULL_REFRESH_INTERVAL_MS
}

/// Panel plus the two fonts used to write on it
pub struct PaperDisplay<I, S, M> {
    epd: Epd2in9<I>,
    small: TextRenderer<S>,
    medium: TextRenderer<M>,
    /// Last drawn status
    status: Option<String<STATUS_CAPACITY>>,
}

impl<I, S, M> PaperDisplay<I, S, M>
where
    I: PanelInterface,
    S: GlyphLookup,
    M: GlyphLookup,
{
    /// Takes over `epd`, clears the panel and leaves it sleeping
    pub fn new(mut epd: Epd2in9<I>, small: S, medium: M) -> Result<Self, ErrorKind> {
        epd.configure(PanelGeometry::new(WIDTH, HEIGHT).rotated(DisplayRotation::Rotate180))?;
        epd.init()?;
        epd.clear()?;
        epd.interface_mut().delay_ms(SETTLE_MS);

        epd.sleep()?;
        epd.interface_mut().delay_ms(SETTLE_MS);

        Ok(PaperDisplay {
            epd,
            small: TextRenderer::new(small),
            medium: TextRenderer::new(medium),
            status: None,
        })
    }

    /// Draws every non empty line of `text`, line `i` at `x = i * 10`
    pub fn update_raw_text(&mut self, text: &str) -> Result<(), ErrorKind> {
        let buffer = self.epd.buffer_mut().ok_or(ErrorKind::NotConfigured)?;
        for (i, line) in text.split('\n').enumerate() {
            if line.is_empty() {
                continue;
            }
            let x = i as i32 * LINE_SPACING;
            self.small
                .draw_string(buffer, x, HEIGHT as i32 - BASELINE_MARGIN, line);
            debug!("drew line at {}", x);
        }
        self.refresh()
    }

    /// Draws `line` at `x` with the small font
    pub fn update_line(&mut self, line: &str, x: i32) -> Result<(), ErrorKind> {
        let buffer = self.epd.buffer_mut().ok_or(ErrorKind::NotConfigured)?;
        self.small
            .draw_string(buffer, x, HEIGHT as i32 - BASELINE_MARGIN, line);
        debug!("drew line at {}", x);
        self.refresh()
    }

    /// Draws `line` at `x` with the medium font
    pub fn update_line_medium(&mut self, line: &str, x: i32) -> Result<(), ErrorKind> {
        let buffer = self.epd.buffer_mut().ok_or(ErrorKind::NotConfigured)?;
        self.medium
            .draw_string(buffer, x, HEIGHT as i32 - BASELINE_MARGIN, line);
        debug!("drew medium line at {}", x);
        self.refresh()
    }

    /// Shows `status` in the status line
    ///
    /// The text is only redrawn when it changed, the partial refresh always runs.
    pub fn update_status(&mut self, status: &str) -> Result<(), ErrorKind> {
        let unchanged = self
            .status
            .as_ref()
            .is_some_and(|last| last.as_str() == status);
        if !unchanged {
            let buffer = self.epd.buffer_mut().ok_or(ErrorKind::NotConfigured)?;
            let (x, y) = STATUS_POSITION;
            self.small.draw_string(buffer, x, y, status);
            debug!("updated status");
        }
        self.refresh()?;
        self.status = String::try_from(status).ok();
        Ok(())
    }

    /// Whitens the panel with a full refresh and puts it to sleep
    pub fn clear_and_sleep(&mut self) -> Result<(), ErrorKind> {
        self.wake_if_sleeping()?;
        self.epd.clear()?;
        self.epd.interface_mut().delay_ms(SETTLE_MS);

        self.epd.sleep()?;
        self.epd.interface_mut().delay_ms(SETTLE_MS);
        Ok(())
    }

    /// The wrapped controller
    pub fn epd(&self) -> &Epd2in9<I> {
        &self.epd
    }

    /// The wrapped controller, e.g. to draw into its buffer
    pub fn epd_mut(&mut self) -> &mut Epd2in9<I> {
        &mut self.epd
    }

    /// Gives the controller back
    pub fn release(self) -> Epd2in9<I> {
        self.epd
    }

    fn refresh(&mut self) -> Result<(), ErrorKind> {
        self.wake_if_sleeping()?;
        self.epd.display_partial()
    }

    fn wake_if_sleeping(&mut self) -> Result<(), ErrorKind> {
        if self.epd.state() == PanelState::Sleeping {
            debug!("waking panel");
            self.epd.wake_up()?;
        }
        Ok(())
    }
}
