//! A simple Driver for the Waveshare 2.9" E-Ink Display V2 via SPI
//!
//! Specification: <https://www.waveshare.com/w/upload/7/79/2.9inch-e-paper-v2-specification.pdf>
//!
//! The panel keeps two RAM planes: the image to show and the previous image. A full
//! refresh drives every pixel through the whole waveform and clears ghosting, a
//! partial refresh only drives the pixels that differ between both planes. Partial
//! refreshes are fast but leave residue behind, schedule a full refresh every now
//! and then.
//!
//! # Lifecycle
//!
//! `Uninitialized → Configured → Initialized(mode) → Displaying(mode) / Sleeping`
//!
//! Anything that refreshes the panel while it sleeps is rejected with
//! [`ErrorKind::Asleep`]; call [`Epd2in9::wake_up`] (or `init`) first.
//!
//! # Example
//!
//!```rust, ignore
//!use epd2in9_driver::{epd2in9_v2::*, prelude::*};
//!
//!let interface = DisplayInterface::new(spi, busy, dc, rst, delay, Config::default());
//!let mut epd = Epd2in9::new(interface);
//!
//!epd.configure(PanelGeometry::new(WIDTH, HEIGHT))?;
//!epd.init()?;
//!epd.clear()?;
//!
//!epd.buffer_mut().unwrap().draw_rectangle(10, 10, 100, 50);
//!// Display new image as a base image for further quick refreshes
//!epd.display_base()?;
//!
//!epd.buffer_mut().unwrap().set_pixel(20, 20, Color::Black);
//!// quick refresh of updated pixels
//!epd.display_partial()?;
//!
//!// Set the EPD to sleep
//!epd.sleep()?;
//!```

use log::{debug, warn};

use crate::buffer_len;
use crate::color::Color;
use crate::command::Command;
use crate::error::ErrorKind;
use crate::graphics::{PanelGeometry, PixelBuffer};
use crate::traits::PanelInterface;
use crate::waveform::{load_groups, load_table, RefreshMode};

pub mod paper;

/// Width of epd2in9 in pixels
pub const WIDTH: u32 = 128;
/// Height of epd2in9 in pixels
pub const HEIGHT: u32 = 296;
/// Bytes of one RAM plane
pub const BUFFER_LEN: usize = buffer_len(WIDTH as usize, HEIGHT as usize);
/// Default Background Color (white)
pub const DEFAULT_BACKGROUND_COLOR: Color = Color::White;

/// Fullsize buffer for the 2in9 EPD V2
pub type Buffer2in9 = PixelBuffer<BUFFER_LEN>;

/// Settle time after the hardware reset of `init`
const POST_RESET_SETTLE_MS: u32 = 100;
/// Settle time after entering deep sleep
const POST_SLEEP_SETTLE_MS: u32 = 100;
/// 3 Databytes: A[7:0], 0.. A[8], 0.. B[2:0] with A = gate lines - 1
const DRIVER_OUTPUT_SCAN: u8 = 0x00;
/// x increment, y increment, address counter is updated in x direction
const DATA_ENTRY_MODE: u8 = 0x03;
/// Display mode 2 for the partial waveform, the rest stays at default
const PARTIAL_DISPLAY_OPTION: [u8; 10] =
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x40, 0x00, 0x00, 0x00, 0x00];
/// Enable clock signal, Enable Analog, Load temperature value, DISPLAY with DISPLAY Mode 1, Disable Analog, Disable OSC
const UPDATE_FULL: u8 = 0xC7;
/// DISPLAY with DISPLAY Mode 2
const UPDATE_PARTIAL: u8 = 0x0F;
/// Enable clock signal, Enable Analog
const UPDATE_POWER_ON: u8 = 0xC0;

/// Where the panel is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    /// No buffer yet
    Uninitialized,
    /// Buffer allocated, panel registers not written
    Configured,
    /// Registers written, the waveform of the mode is loaded
    Initialized(RefreshMode),
    /// At least one refresh ran with the waveform of the mode
    Displaying(RefreshMode),
    /// Deep sleep, only a new init wakes the panel up
    Sleeping,
}

/// Epd2in9 driver
pub struct Epd2in9<I> {
    /// Connection to the panel
    interface: I,
    /// Image that is going to be sent
    buffer: Option<Buffer2in9>,
    state: PanelState,
}

impl<I: PanelInterface> Epd2in9<I> {
    /// Creates the driver, nothing is sent yet
    pub fn new(interface: I) -> Self {
        Epd2in9 {
            interface,
            buffer: None,
            state: PanelState::Uninitialized,
        }
    }

    /// Get the width of the display
    pub fn width(&self) -> u32 {
        WIDTH
    }

    /// Get the height of the display
    pub fn height(&self) -> u32 {
        HEIGHT
    }

    /// Current lifecycle state
    pub fn state(&self) -> PanelState {
        self.state
    }

    /// Refresh mode whose waveform is loaded, if the panel is awake and initialised
    pub fn mode(&self) -> Option<RefreshMode> {
        match self.state {
            PanelState::Initialized(mode) | PanelState::Displaying(mode) => Some(mode),
            _ => None,
        }
    }

    /// The image buffer
    pub fn buffer(&self) -> Option<&Buffer2in9> {
        self.buffer.as_ref()
    }

    /// The image buffer, to draw into between refreshes
    pub fn buffer_mut(&mut self) -> Option<&mut Buffer2in9> {
        self.buffer.as_mut()
    }

    /// Direct access to the connection
    ///
    /// Should rarely be needed! Commands sent this way bypass the state tracking.
    pub fn interface_mut(&mut self) -> &mut I {
        &mut self.interface
    }

    /// Gives the connection back
    pub fn release(self) -> I {
        self.interface
    }

    /// Allocates a white buffer for `geometry`
    ///
    /// The geometry has to fill exactly [`BUFFER_LEN`] bytes. Configuring again drops the
    /// old image and requires a new `init`.
    pub fn configure(&mut self, geometry: PanelGeometry) -> Result<(), ErrorKind> {
        self.buffer = Some(Buffer2in9::new(geometry)?);
        self.state = PanelState::Configured;
        debug!(
            "configured {}x{} (logical width {})",
            geometry.width(),
            geometry.height(),
            geometry.logical_width()
        );
        Ok(())
    }

    /// This initialises the EPD for black/white refreshes and loads the full waveform
    ///
    /// It also wakes the panel from deep sleep.
    pub fn init(&mut self) -> Result<(), ErrorKind> {
        let geometry = self.geometry()?;
        debug!("init for full refresh");
        self.state = PanelState::Configured;

        self.reset_and_configure_driver(&geometry)?;

        self.set_ram_area(0, 0, geometry.width() - 1, geometry.height() - 1);

        self.interface.cmd_with_data(Command::DisplayUpdateControl1, &[0x00, 0x80]);

        self.set_ram_counter(0, 0)?;
        self.interface.read_busy()?;

        load_table(&mut self.interface, RefreshMode::Full.table())?;
        self.state = PanelState::Initialized(RefreshMode::Full);
        Ok(())
    }

    /// Wakes the device up from sleep, this is a full [`init`](Self::init)
    pub fn wake_up(&mut self) -> Result<(), ErrorKind> {
        self.init()
    }

    /// Initialises the EPD for 4 level grayscale and loads the grayscale waveform
    pub fn gray4_init(&mut self) -> Result<(), ErrorKind> {
        let geometry = self.geometry()?;
        debug!("init for 4 gray refresh");
        self.state = PanelState::Configured;

        self.reset_and_configure_driver(&geometry)?;

        // the grayscale RAM window starts one byte in
        self.set_ram_area(8, 0, geometry.width(), geometry.height() - 1);

        self.interface.cmd_with_data(Command::BorderWaveformControl, &[0x04]);

        self.set_ram_counter(1, 0)?;
        self.interface.read_busy()?;

        load_table(&mut self.interface, RefreshMode::Grayscale4.table())?;
        self.state = PanelState::Initialized(RefreshMode::Grayscale4);
        Ok(())
    }

    /// Sends the buffer and runs a full refresh
    pub fn display(&mut self) -> Result<(), ErrorKind> {
        self.prepare_full_refresh()?;
        debug!("full refresh");
        self.write_buffer(Command::WriteRam)?;
        self.turn_on_display()
    }

    /// Like [`display`](Self::display), and also stores the buffer as base image for
    /// following partial refreshes
    pub fn display_base(&mut self) -> Result<(), ErrorKind> {
        self.prepare_full_refresh()?;
        debug!("full refresh with new base image");
        self.write_buffer(Command::WriteRam)?;
        self.write_buffer(Command::WriteRam2)?;
        self.turn_on_display()
    }

    /// Sends the buffer and runs a quick partial refresh
    ///
    /// Only pixels differing from the base image are driven. Every partial refresh adds
    /// some ghosting, run [`display`](Self::display) or [`clear`](Self::clear) regularly.
    pub fn display_partial(&mut self) -> Result<(), ErrorKind> {
        let geometry = self.geometry()?;
        match self.awake_mode()? {
            RefreshMode::Grayscale4 => {
                return Err(ErrorKind::ModeMismatch {
                    active: RefreshMode::Grayscale4,
                    required: RefreshMode::Partial,
                })
            }
            RefreshMode::Full | RefreshMode::Partial => {}
        }
        debug!("partial refresh");

        self.interface.short_reset();

        load_groups(&mut self.interface, RefreshMode::Partial.table())?;
        self.state = PanelState::Initialized(RefreshMode::Partial);

        self.interface.cmd_with_data(Command::WriteOtpSelection, &PARTIAL_DISPLAY_OPTION);
        self.interface.cmd_with_data(Command::BorderWaveformControl, &[0x80]);
        self.interface.cmd_with_data(Command::DisplayUpdateControl2, &[UPDATE_POWER_ON]);
        self.interface.send_command(Command::MasterActivation);
        self.interface.read_busy()?;

        self.set_ram_area(0, 0, geometry.width() - 1, geometry.height() - 1);
        self.set_ram_counter(0, 0)?;

        self.write_buffer(Command::WriteRam)?;
        self.turn_on_display_partial()
    }

    /// Not supported: there is no 4 level transfer path for this panel yet
    ///
    /// Still checks that the grayscale waveform is loaded, so callers get the same
    /// errors as for the other refreshes.
    pub fn gray4_display(&mut self) -> Result<(), ErrorKind> {
        self.require_mode(RefreshMode::Grayscale4)?;
        warn!("4 gray transfer is not supported");
        Err(ErrorKind::Unsupported)
    }

    /// Clears both RAM planes of the panel with the background color and runs a full refresh
    ///
    /// The image buffer stays untouched.
    pub fn clear(&mut self) -> Result<(), ErrorKind> {
        self.prepare_full_refresh()?;
        debug!("clearing panel");
        let color = DEFAULT_BACKGROUND_COLOR.byte_value();
        let len = self.geometry()?.buffer_len() as u32;

        self.interface.send_command(Command::WriteRam);
        self.interface.data_x_times(color, len);
        self.interface.send_command(Command::WriteRam2);
        self.interface.data_x_times(color, len);
        self.turn_on_display()
    }

    /// "Turn on Display" sequence of a full refresh
    ///
    /// Shows what is in the panel RAM. Needs the full waveform, so after a partial
    /// refresh only [`display`](Self::display) and friends can go back to full refreshes.
    pub fn turn_on_display(&mut self) -> Result<(), ErrorKind> {
        self.require_mode(RefreshMode::Full)?;
        self.activate(UPDATE_FULL)?;
        self.state = PanelState::Displaying(RefreshMode::Full);
        Ok(())
    }

    /// "Turn on Display" sequence of a partial refresh
    ///
    /// Needs the partial waveform loaded by [`display_partial`](Self::display_partial).
    pub fn turn_on_display_partial(&mut self) -> Result<(), ErrorKind> {
        self.require_mode(RefreshMode::Partial)?;
        self.activate(UPDATE_PARTIAL)?;
        self.state = PanelState::Displaying(RefreshMode::Partial);
        Ok(())
    }

    /// Let the device enter deep-sleep mode to save power.
    ///
    /// The deep sleep mode returns to standby with a hardware reset, see
    /// [`wake_up`](Self::wake_up). Sleeping twice doesn't send anything.
    pub fn sleep(&mut self) -> Result<(), ErrorKind> {
        match self.state {
            PanelState::Uninitialized => return Err(ErrorKind::NotConfigured),
            PanelState::Sleeping => return Ok(()),
            _ => {}
        }
        debug!("entering deep sleep");
        // 0x00 for Normal mode (Power on Reset), 0x01 for Deep Sleep Mode
        self.interface.cmd_with_data(Command::DeepSleepMode, &[0x01]);
        self.interface.delay_ms(POST_SLEEP_SETTLE_MS);
        self.state = PanelState::Sleeping;
        Ok(())
    }

    fn geometry(&self) -> Result<PanelGeometry, ErrorKind> {
        self.buffer
            .as_ref()
            .map(|buffer| *buffer.geometry())
            .ok_or(ErrorKind::NotConfigured)
    }

    /// Mode of the loaded waveform, or why there is none
    fn awake_mode(&self) -> Result<RefreshMode, ErrorKind> {
        match self.state {
            PanelState::Uninitialized => Err(ErrorKind::NotConfigured),
            PanelState::Configured => Err(ErrorKind::NotInitialized),
            PanelState::Sleeping => Err(ErrorKind::Asleep),
            PanelState::Initialized(mode) | PanelState::Displaying(mode) => Ok(mode),
        }
    }

    fn require_mode(&self, required: RefreshMode) -> Result<(), ErrorKind> {
        let active = self.awake_mode()?;
        if active == required {
            Ok(())
        } else {
            Err(ErrorKind::ModeMismatch { active, required })
        }
    }

    /// Makes sure the full waveform is loaded
    ///
    /// A partial refresh leaves its own waveform and display options behind, those are
    /// replaced by a complete init.
    fn prepare_full_refresh(&mut self) -> Result<(), ErrorKind> {
        match self.awake_mode()? {
            RefreshMode::Full => Ok(()),
            RefreshMode::Partial => {
                debug!("switching back to the full waveform");
                self.init()
            }
            RefreshMode::Grayscale4 => Err(ErrorKind::ModeMismatch {
                active: RefreshMode::Grayscale4,
                required: RefreshMode::Full,
            }),
        }
    }

    /// Hardware reset, software reset and the scan setup shared by both inits
    fn reset_and_configure_driver(&mut self, geometry: &PanelGeometry) -> Result<(), ErrorKind> {
        self.interface.reset();
        self.interface.delay_ms(POST_RESET_SETTLE_MS);

        self.interface.read_busy()?;
        self.interface.send_command(Command::SwReset);
        self.interface.read_busy()?;

        let last_gate = geometry.height() - 1;
        self.interface.cmd_with_data(
            Command::DriverOutputControl,
            &[last_gate as u8, (last_gate >> 8) as u8, DRIVER_OUTPUT_SCAN],
        );

        self.interface.cmd_with_data(Command::DataEntryModeSetting, &[DATA_ENTRY_MODE]);
        Ok(())
    }

    fn activate(&mut self, sequence: u8) -> Result<(), ErrorKind> {
        self.interface.cmd_with_data(Command::DisplayUpdateControl2, &[sequence]);
        self.interface.send_command(Command::MasterActivation);
        self.interface.read_busy()
    }

    fn write_buffer(&mut self, command: Command) -> Result<(), ErrorKind> {
        let buffer = self.buffer.as_ref().ok_or(ErrorKind::NotConfigured)?;
        self.interface.cmd_with_data(command, buffer.buffer());
        Ok(())
    }

    fn set_ram_area(&mut self, start_x: u32, start_y: u32, end_x: u32, end_y: u32) {
        // x is positioned in bytes, so the last 3 bits which show the position inside a byte in the ram
        // aren't relevant
        self.interface.cmd_with_data(
            Command::SetRamXAddressStartEndPosition,
            &[(start_x >> 3) as u8, (end_x >> 3) as u8],
        );

        // 2 Databytes: A[7:0] & 0..A[8] for each - start and end
        self.interface.cmd_with_data(
            Command::SetRamYAddressStartEndPosition,
            &[
                start_y as u8,
                (start_y >> 8) as u8,
                end_y as u8,
                (end_y >> 8) as u8,
            ],
        );
    }

    fn set_ram_counter(&mut self, x: u32, y: u32) -> Result<(), ErrorKind> {
        self.interface.cmd_with_data(Command::SetRamXAddressCounter, &[x as u8]);

        // 2 Databytes: A[7:0] & 0..A[8]
        self.interface
            .cmd_with_data(Command::SetRamYAddressCounter, &[y as u8, (y >> 8) as u8]);
        self.interface.read_busy()
    }
}
