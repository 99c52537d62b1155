//! Tunables of the panel controller. Builder methods override one setting each and leave the rest
//! at their defaults.

/// Busy-wait budget used unless overridden. A full black/red refresh of this panel takes around
/// 15 seconds at room temperature and longer in the cold.
pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 30_000;

/// Display update control 1 bytes sent during `initialize`.
pub const DEFAULT_UPDATE_CONTROL: [u8; 2] = [0x00, 0x80];

/// A configuration for the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    pub(crate) busy_timeout_ms: Option<u32>,
    pub(crate) update_control: [u8; 2],
}

impl Config {
    /// Create a configuration with every setting at its default.
    pub fn new() -> Self {
        Config {
            busy_timeout_ms: Some(DEFAULT_BUSY_TIMEOUT_MS),
            update_control: DEFAULT_UPDATE_CONTROL,
        }
    }

    /// Extend this `Config` to give up on a busy panel after `ms` milliseconds of polling,
    /// returning `Error::BusyTimeout`.
    pub fn busy_timeout_ms(self, ms: u32) -> Self {
        Self {
            busy_timeout_ms: Some(ms),
            ..self
        }
    }

    /// Extend this `Config` to poll the busy line for as long as it takes. A panel that never
    /// releases the line will hang the caller.
    pub fn unbounded_busy_wait(self) -> Self {
        Self {
            busy_timeout_ms: None,
            ..self
        }
    }

    /// Extend this `Config` to send `a, b` as the display update control 1 parameters. See
    /// `Command::DisplayUpdateControl1`.
    pub fn display_update_control(self, a: u8, b: u8) -> Self {
        Self {
            update_control: [a, b],
            ..self
        }
    }

    /// The busy-wait budget in milliseconds, or `None` when unbounded.
    pub fn busy_timeout(&self) -> Option<u32> {
        self.busy_timeout_ms
    }

    /// The two display update control 1 bytes.
    pub fn update_control(&self) -> [u8; 2] {
        self.update_control
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}
