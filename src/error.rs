use core::fmt::{Display, Formatter};

use crate::waveform::RefreshMode;

/// Epd error type
///
/// Bus and pin errors never show up here: the panel has no way to report a failed
/// transfer, so the interface logs them and carries on.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    /// The busy line didn't release within the configured timeout
    PanelUnresponsive,

    /// No geometry was configured yet
    NotConfigured,

    /// The panel registers weren't initialised yet (see `init` or `gray4_init`)
    NotInitialized,

    /// The panel is in deep sleep, it needs to be woken up by a new `init`
    Asleep,

    /// The requested refresh can't run with the waveform table that is currently loaded
    ModeMismatch {
        /// Mode of the loaded table
        active: RefreshMode,
        /// Mode the refresh needs
        required: RefreshMode,
    },

    /// The operation isn't supported by this driver
    Unsupported,

    /// Width, logical width, height and buffer size don't fit together
    InvalidGeometry,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::PanelUnresponsive => write!(f, "panel busy line did not release in time"),
            Self::NotConfigured => write!(f, "panel geometry is not configured"),
            Self::NotInitialized => write!(f, "panel is not initialised"),
            Self::Asleep => write!(f, "panel is in deep sleep"),
            Self::ModeMismatch { active, required } => write!(
                f,
                "refresh needs the {required:?} waveform but {active:?} is loaded"
            ),
            Self::Unsupported => write!(f, "operation is not supported"),
            Self::InvalidGeometry => write!(f, "invalid panel geometry"),
        }
    }
}
