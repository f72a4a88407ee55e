/// Timing configuration of the busy handshake
///
/// The defaults match the panel datasheet: the busy line is sampled every 50ms and
/// one more 50ms pass after it released.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Time between two samples of the busy line
    pub busy_poll_ms: u32,
    /// Extra wait after the busy line released
    pub busy_settle_ms: u32,
    /// Give up waiting for the busy line after this long.
    ///
    /// `None` waits forever, a panel with a stuck busy line then hangs the caller.
    pub busy_timeout_ms: Option<u32>,
}

/// Upper bound for a single busy phase, a full 4-gray refresh takes about 3s
pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 10_000;

impl Default for Config {
    fn default() -> Self {
        Self {
            busy_poll_ms: 50,
            busy_settle_ms: 50,
            busy_timeout_ms: Some(DEFAULT_BUSY_TIMEOUT_MS),
        }
    }
}
