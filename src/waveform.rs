//! Waveform lookup tables and the routine that loads them into the panel
//!
//! Every table is 159 bytes: 153 bytes of group timings (voltage selections, phase
//! lengths, repeat counts, frame rates) followed by six single register values.

use log::debug;

use crate::command::Command;
use crate::error::ErrorKind;
use crate::traits::PanelInterface;

/// Length of a complete waveform table
pub const LUT_LEN: usize = 159;
/// Part of the table streamed through the LUT register
pub const LUT_GROUP_LEN: usize = 153;

/// Seperates the different LUTs for the refresh process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RefreshMode {
    /// The "normal" full Lookuptable for the Refresh-Sequence
    ///
    /// Slow and flickering, but it clears ghosting.
    #[default]
    Full,
    /// The quick LUT, only pixels differing from the second RAM plane are driven.
    ///
    /// Every use adds ghosting, a full refresh is needed from time to time.
    Partial,
    /// 4 level grayscale
    Grayscale4,
}

impl RefreshMode {
    /// Table belonging to this mode
    pub fn table(self) -> &'static WaveformTable {
        match self {
            RefreshMode::Full => &WS_20_30,
            RefreshMode::Partial => &LUT_PARTIAL,
            RefreshMode::Grayscale4 => &LUT_GRAY4,
        }
    }
}

/// A read-only waveform table
#[derive(Debug, PartialEq, Eq)]
pub struct WaveformTable {
    mode: RefreshMode,
    data: [u8; LUT_LEN],
}

impl WaveformTable {
    const fn new(mode: RefreshMode, data: [u8; LUT_LEN]) -> Self {
        WaveformTable { mode, data }
    }

    /// Mode this table drives
    pub fn mode(&self) -> RefreshMode {
        self.mode
    }

    /// All 159 bytes
    pub fn as_bytes(&self) -> &[u8; LUT_LEN] {
        &self.data
    }

    /// Group timing rows, sent through [`Command::WriteLutRegister`]
    pub fn groups(&self) -> &[u8] {
        &self.data[..LUT_GROUP_LEN]
    }

    /// EOPT
    pub fn end_option(&self) -> u8 {
        self.data[153]
    }

    /// VGH
    pub fn gate_voltage(&self) -> u8 {
        self.data[154]
    }

    /// VSH1, VSH2 and VSL, in that order
    pub fn source_voltages(&self) -> &[u8] {
        &self.data[155..158]
    }

    /// VCOM
    pub fn vcom(&self) -> u8 {
        self.data[158]
    }
}

/// Loads `table` into the panel
///
/// The group rows go through the LUT register and the panel is given time to take
/// them over, then the six trailing values are written to their own registers.
pub fn load_table<I: PanelInterface>(
    interface: &mut I,
    table: &WaveformTable,
) -> Result<(), ErrorKind> {
    load_groups(interface, table)?;

    interface.cmd_with_data(Command::WriteLutRegisterEnd, &[table.end_option()]);
    interface.cmd_with_data(Command::GateDrivingVoltage, &[table.gate_voltage()]);
    interface.cmd_with_data(Command::SourceDrivingVoltage, table.source_voltages());
    interface.cmd_with_data(Command::WriteVcomRegister, &[table.vcom()]);
    Ok(())
}

/// Loads only the group rows of `table`, the voltage and VCOM registers keep their values
///
/// The quick refresh switches waveforms this way and keeps the voltages of the full
/// table loaded by init.
pub fn load_groups<I: PanelInterface>(
    interface: &mut I,
    table: &WaveformTable,
) -> Result<(), ErrorKind> {
    debug!("loading {:?} waveform", table.mode());
    interface.cmd_with_data(Command::WriteLutRegister, table.groups());
    interface.read_busy()
}

/// Full refresh waveform
pub static WS_20_30: WaveformTable = WaveformTable::new(
    RefreshMode::Full,
    [
        0x80, 0x66, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x40, 0x0, 0x0, 0x0, //
        0x10, 0x66, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x20, 0x0, 0x0, 0x0, //
        0x80, 0x66, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x40, 0x0, 0x0, 0x0, //
        0x10, 0x66, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x20, 0x0, 0x0, 0x0, //
        0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, //
        0x14, 0x8, 0x0, 0x0, 0x0, 0x0, 0x1, //
        0xA, 0xA, 0x0, 0xA, 0xA, 0x0, 0x1, //
        0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, //
        0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, //
        0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, //
        0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, //
        0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, //
        0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, //
        0x14, 0x8, 0x0, 0x1, 0x0, 0x0, 0x1, //
        0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x1, //
        0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, //
        0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, //
        0x44, 0x44, 0x44, 0x44, 0x44, 0x44, 0x0, 0x0, 0x0, //
        0x22, 0x17, 0x41, 0x0, 0x32, 0x36,
    ],
);

/// Partial refresh waveform
pub static LUT_PARTIAL: WaveformTable = WaveformTable::new(
    RefreshMode::Partial,
    [
        0x0, 0x40, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, //
        0x80, 0x80, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, //
        0x40, 0x40, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, //
        0x0, 0x80, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, //
        0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, //
        0x0A, 0x0, 0x0, 0x0, 0x0, 0x0, 0x2, //
        0x1, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, //
        0x1, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, //
        0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, //
        0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, //
        0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, //
        0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, //
        0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, //
        0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, //
        0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, //
        0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, //
        0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, //
        0x22, 0x22, 0x22, 0x22, 0x22, 0x22, 0x0, 0x0, 0x0, //
        0x22, 0x17, 0x41, 0xB0, 0x32, 0x36,
    ],
);

/// 4 gray waveform
pub static LUT_GRAY4: WaveformTable = WaveformTable::new(
    RefreshMode::Grayscale4,
    [
        0x00, 0x60, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // VS L0
        0x20, 0x60, 0x10, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // VS L1
        0x28, 0x60, 0x14, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // VS L2
        0x2A, 0x60, 0x15, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // VS L3
        0x00, 0x90, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // VS L4
        0x00, 0x02, 0x00, 0x05, 0x14, 0x00, 0x00, // TP, SR, RP of Group0
        0x1E, 0x1E, 0x00, 0x00, 0x00, 0x00, 0x01, // TP, SR, RP of Group1
        0x00, 0x02, 0x00, 0x05, 0x14, 0x00, 0x00, // TP, SR, RP of Group2
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // TP, SR, RP of Group3
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // TP, SR, RP of Group4
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // TP, SR, RP of Group5
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // TP, SR, RP of Group6
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // TP, SR, RP of Group7
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // TP, SR, RP of Group8
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // TP, SR, RP of Group9
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // TP, SR, RP of Group10
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // TP, SR, RP of Group11
        0x24, 0x22, 0x22, 0x22, 0x23, 0x32, 0x00, 0x00, 0x00, // FR, XON
        0x22, 0x17, 0x41, 0xAE, 0x32, 0x28, // EOPT VGH VSH1 VSH2 VSL VCOM
    ],
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Event, RecordingInterface};

    extern crate std;
    use std::vec::Vec;

    const MODES: [RefreshMode; 3] = [
        RefreshMode::Full,
        RefreshMode::Partial,
        RefreshMode::Grayscale4,
    ];

    #[test]
    fn catalog_is_addressed_by_mode() {
        for mode in MODES {
            assert_eq!(mode.table().mode(), mode);
            assert_eq!(mode.table().as_bytes().len(), LUT_LEN);
            assert_eq!(mode.table().groups().len(), LUT_GROUP_LEN);
        }
    }

    #[test]
    fn trailing_registers() {
        let table = RefreshMode::Partial.table();
        assert_eq!(table.end_option(), 0x22);
        assert_eq!(table.gate_voltage(), 0x17);
        assert_eq!(table.source_voltages(), &[0x41, 0xB0, 0x32]);
        assert_eq!(table.vcom(), 0x36);

        assert_eq!(RefreshMode::Grayscale4.table().vcom(), 0x28);
        assert_eq!(RefreshMode::Full.table().source_voltages()[1], 0x00);
    }

    #[test]
    fn load_table_streams_groups_then_registers() {
        for mode in MODES {
            let table = mode.table();
            let mut interface = RecordingInterface::new();

            load_table(&mut interface, table).unwrap();

            let events = interface.events();
            assert_eq!(events[0], Event::Command(0x32));
            let groups: Vec<u8> = events[1..=LUT_GROUP_LEN]
                .iter()
                .map(|event| match event {
                    Event::Data(byte) => *byte,
                    other => panic!("expected LUT data, got {other:?}"),
                })
                .collect();
            assert_eq!(&groups[..], table.groups());

            let b = table.as_bytes();
            assert_eq!(
                &events[LUT_GROUP_LEN + 1..],
                &[
                    Event::Busy,
                    Event::Command(0x3F),
                    Event::Data(b[153]),
                    Event::Command(0x03),
                    Event::Data(b[154]),
                    Event::Command(0x04),
                    Event::Data(b[155]),
                    Event::Data(b[156]),
                    Event::Data(b[157]),
                    Event::Command(0x2C),
                    Event::Data(b[158]),
                ]
            );
        }
    }

    #[test]
    fn load_groups_leaves_registers_alone() {
        let table = RefreshMode::Partial.table();
        let mut interface = RecordingInterface::new();

        load_groups(&mut interface, table).unwrap();

        assert_eq!(interface.commands(), [0x32]);
        assert_eq!(interface.data_after(0x32), table.groups());
        assert_eq!(interface.events().len(), LUT_GROUP_LEN + 2);
        assert_eq!(interface.events().last(), Some(&Event::Busy));
    }

    #[test]
    fn load_table_stops_on_busy_timeout() {
        let mut interface = RecordingInterface::with_busy_schedule(&[false]);

        assert_eq!(
            load_table(&mut interface, &WS_20_30),
            Err(ErrorKind::PanelUnresponsive)
        );
        // nothing after the LUT register
        assert_eq!(interface.commands(), [0x32]);
    }
}
