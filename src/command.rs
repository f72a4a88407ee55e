//! SPI Commands for the SSD1680 controller of the Waveshare 2.9" V2 E-Ink Display

use crate::traits;

/// Epd2in9 V2 commands
///
/// Should rarely (never?) be needed directly.
///
/// For more infos about the addresses and what they are doing look into the pdfs
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Driver Output control
    ///     3 Databytes:
    ///     A[7:0]
    ///     0.. A[8]
    ///     0.. B[2:0]
    ///     Default: Set A[8:0] = 0x127 and B[2:0] = 0x0
    DriverOutputControl = 0x01,
    /// Gate driving voltage (VGH/VGL), 1 Databyte
    GateDrivingVoltage = 0x03,
    /// Source driving voltage, 3 Databytes: VSH1, VSH2, VSL
    SourceDrivingVoltage = 0x04,
    /// Deep Sleep Mode Control
    ///     1 Databyte:
    ///     0.. A[0]
    ///     Values:
    ///         A[0] = 0: Normal Mode (POR)
    ///         A[0] = 1: Enter Deep Sleep Mode
    DeepSleepMode = 0x10,
    /// Data Entry mode setting
    DataEntryModeSetting = 0x11,
    /// Resets the registers, RAM stays untouched
    SwReset = 0x12,
    /// Runs the sequence chosen with `DisplayUpdateControl2`, busy until done
    MasterActivation = 0x20,
    /// RAM content option, 2 Databytes
    DisplayUpdateControl1 = 0x21,
    /// Display update sequence option, 1 Databyte
    DisplayUpdateControl2 = 0x22,
    /// B/W RAM
    WriteRam = 0x24,
    /// Second RAM plane, holds the previous image for partial refreshes
    WriteRam2 = 0x26,
    /// VCOM register, 1 Databyte
    WriteVcomRegister = 0x2C,
    /// The first 153 bytes of a waveform table
    WriteLutRegister = 0x32,
    /// Display option / OTP selection, 10 Databytes
    WriteOtpSelection = 0x37,
    /// Border waveform, 1 Databyte
    BorderWaveformControl = 0x3C,
    /// End option (EOPT) of the waveform
    WriteLutRegisterEnd = 0x3F,

    SetRamXAddressStartEndPosition = 0x44,

    SetRamYAddressStartEndPosition = 0x45,

    SetRamXAddressCounter = 0x4E,

    SetRamYAddressCounter = 0x4F,
}

impl traits::Command for Command {
    /// Returns the address of the command
    fn address(self) -> u8 {
        self as u8
    }
}
