use crate::error::ErrorKind;

/// All commands need to have this trait which gives the address of the command
/// which needs to be send via SPI with activated CommandsPin (Data/Command Pin in CommandMode)
pub trait Command: Copy {
    /// Register address of the command
    fn address(self) -> u8;
}

/// The capabilities the refresh logic needs from the physical connection
///
/// [`DisplayInterface`](crate::interface::DisplayInterface) is the real thing; anything
/// else implementing this (a recording fake in tests, a bus shared with other chips) can
/// drive the panel state machine just as well.
///
/// Transfers are fire-and-forget: the panel can't report errors, so implementations log
/// failed transfers instead of returning them. Only [`read_busy`](PanelInterface::read_busy)
/// can fail, when the panel stops answering.
pub trait PanelInterface {
    /// Sends one command byte (data/command line low)
    fn send_command<T: Command>(&mut self, command: T);

    /// Sends one data byte (data/command line high)
    fn send_data(&mut self, data: u8);

    /// Full hardware reset: high 10ms, low 2ms, high 10ms
    fn reset(&mut self);

    /// Short reset pulse used before a partial refresh: low 1ms, high, 2ms settle
    fn short_reset(&mut self);

    /// Blocks until the busy line reads idle, then settles once more
    ///
    /// Has to be called after every command that changes the internal state of the
    /// panel (LUT load, cursor move, activation) before anything else is sent.
    fn read_busy(&mut self) -> Result<(), ErrorKind>;

    /// Waits for `ms` milliseconds
    fn delay_ms(&mut self, ms: u32);

    /// Sends every byte of `data` as data
    fn data(&mut self, data: &[u8]) {
        for &val in data {
            self.send_data(val);
        }
    }

    /// Basic function for sending [Commands](Command) and the data belonging to it.
    fn cmd_with_data<T: Command>(&mut self, command: T, data: &[u8]) {
        self.send_command(command);
        self.data(data);
    }

    /// Basic function for sending the same byte of data (one u8) multiple times
    fn data_x_times(&mut self, val: u8, repetitions: u32) {
        for _ in 0..repetitions {
            self.send_data(val);
        }
    }
}
