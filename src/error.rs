//! Errors reported by the driver.

use embedded_hal::{digital, spi};

/// Everything that can go wrong while talking to the panel.
///
/// HAL errors are reduced to their `ErrorKind` at the interface boundary so that the driver's
/// error type does not depend on the concrete SPI or GPIO implementation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A write on the SPI bus failed.
    #[error("SPI transfer failed: {0}")]
    Spi(spi::ErrorKind),
    /// Driving or sampling one of the control pins failed.
    #[error("GPIO access failed: {0}")]
    Pin(digital::ErrorKind),
    /// The busy line did not release within the configured budget.
    #[error("panel still busy after {waited_ms} ms")]
    BusyTimeout { waited_ms: u32 },
    /// A framebuffer was requested with a zero dimension.
    #[error("invalid panel geometry {width}x{height}")]
    InvalidGeometry { width: u16, height: u16 },
    /// The storage given to a framebuffer does not match its geometry.
    #[error("framebuffer storage is {actual} bytes, geometry needs {expected}")]
    BufferSize { expected: usize, actual: usize },
    /// The black and red planes do not share the same geometry.
    #[error("black and red planes differ in size")]
    PlaneMismatch,
    /// A pixel transfer was attempted before `initialize` or after `sleep`.
    #[error("panel is not initialized")]
    NotInitialized,
    /// A full refresh was attempted while the partial refresh sequence is loaded.
    #[error("partial refresh sequence is active, initialize before a full refresh")]
    PartialRefreshActive,
    /// A waveform table of the wrong length was handed to the LUT register.
    #[error("LUT is {actual} bytes, register takes {expected}")]
    LutLength { expected: usize, actual: usize },
}

impl Error {
    pub(crate) fn spi<E: spi::Error>(e: E) -> Self {
        Error::Spi(e.kind())
    }

    pub(crate) fn pin<E: digital::Error>(e: E) -> Self {
        Error::Pin(e.kind())
    }
}
