//! Waveform table for partial refresh.
//!
//! The first 153 bytes are the waveform proper (voltage selection and phase timing for each
//! transition). The last six are the end option, gate voltage, the three source voltages and
//! VCOM, in that order.

use crate::command::consts::LUT_WAVEFORM_LEN;

/// Length of `PARTIAL_REFRESH_LUT`.
pub const LUT_LEN: usize = 159;

#[rustfmt::skip]
pub static PARTIAL_REFRESH_LUT: [u8; LUT_LEN] = [
    0x00, 0x40, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x80, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x40, 0x40, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x80, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x0A, 0x00, 0x00, 0x00, 0x00, 0x00, 0x02, 0x01, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x22, 0x22, 0x22, 0x22, 0x22, 0x22,
    0x00, 0x00, 0x00, 0x22, 0x17, 0x41, 0xB0, 0x32, 0x36,
];

/// The waveform part of a table, as written to the LUT register.
pub fn waveform(lut: &[u8; LUT_LEN]) -> &[u8] {
    &lut[..LUT_WAVEFORM_LEN]
}

/// Register values loaded alongside the waveform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Voltages {
    /// End option (EOPT), opcode `0x3F`.
    pub end_option: u8,
    /// Gate driving voltage, opcode `0x03`.
    pub gate: u8,
    /// Source driving voltages VSH1, VSH2 and VSL, opcode `0x04`.
    pub source: (u8, u8, u8),
    /// VCOM, opcode `0x2C`.
    pub vcom: u8,
}

/// The register values trailing the waveform.
pub fn voltages(lut: &[u8; LUT_LEN]) -> Voltages {
    Voltages {
        end_option: lut[153],
        gate: lut[154],
        source: (lut[155], lut[156], lut[157]),
        vcom: lut[158],
    }
}
