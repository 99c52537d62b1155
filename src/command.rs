//! The command set of the panel controller.
//!
//! Note 1: RAM X addresses count bytes, so there is one X address per 8 horizontal pixels. The
//! X address registers are 5 bits wide. RAM Y addresses count rows and are 9 bits wide, sent as a
//! low byte followed by a byte carrying the ninth bit.

use crate::error::Error;
use crate::interface::DisplayInterface;

pub mod consts {
    //! Panel geometry and bus constants.

    /// Visible pixel columns.
    pub const WIDTH: u16 = 152;
    /// Visible pixel rows.
    pub const HEIGHT: u16 = 296;
    /// Bytes per framebuffer row. 152 is a multiple of 8 but the driver never relies on that.
    pub const ROW_BYTES: usize = (WIDTH as usize + 7) / 8;
    /// Bytes in one full-panel plane.
    pub const BUFFER_LEN: usize = ROW_BYTES * HEIGHT as usize;
    /// SPI clock used on the reference board.
    pub const SPI_FREQUENCY_HZ: u32 = 4_000_000;
    /// Largest value of a RAM X address.
    pub const RAM_X_MASK: u16 = 0x1F;
    /// Waveform bytes taken by the LUT register.
    pub const LUT_WAVEFORM_LEN: usize = 153;
}

pub mod opcode {
    //! Raw command bytes.

    pub const GATE_VOLTAGE: u8 = 0x03;
    pub const SOURCE_VOLTAGE: u8 = 0x04;
    pub const DEEP_SLEEP: u8 = 0x10;
    pub const DATA_ENTRY_MODE: u8 = 0x11;
    pub const SOFTWARE_RESET: u8 = 0x12;
    pub const MASTER_ACTIVATION: u8 = 0x20;
    pub const DISPLAY_UPDATE_CONTROL_1: u8 = 0x21;
    pub const DISPLAY_UPDATE_CONTROL_2: u8 = 0x22;
    pub const WRITE_BLACK_RAM: u8 = 0x24;
    pub const WRITE_RED_RAM: u8 = 0x26;
    pub const WRITE_VCOM: u8 = 0x2C;
    pub const WRITE_LUT: u8 = 0x32;
    pub const END_OPTION: u8 = 0x3F;
    pub const SET_RAM_X_WINDOW: u8 = 0x44;
    pub const SET_RAM_Y_WINDOW: u8 = 0x45;
    pub const SET_RAM_X_COUNTER: u8 = 0x4E;
    pub const SET_RAM_Y_COUNTER: u8 = 0x4F;
}

use self::consts::*;

/// Direction in which the RAM address counters advance as image data is written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataEntryMode {
    /// Y decrements, X decrements.
    DecrementYDecrementX,
    /// Y decrements, X increments.
    DecrementYIncrementX,
    /// Y increments, X decrements.
    IncrementYDecrementX,
    /// Y increments, X increments. Rows are written top to bottom, each left to right, which is
    /// the layout of `Framebuffer`.
    IncrementYIncrementX,
}

/// Deep sleep level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeepSleepMode {
    /// Leave deep sleep.
    Normal,
    /// Deep sleep mode 1. RAM is retained, but only a hardware reset wakes the panel.
    Mode1,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Set the gate driving voltage (VGH).
    SetGateVoltage(u8),
    /// Set the source driving voltages VSH1, VSH2 and VSL.
    SetSourceVoltage(u8, u8, u8),
    /// Enter or leave deep sleep.
    DeepSleep(DeepSleepMode),
    /// Set the address counter direction used by `WriteBlackRam` and `WriteRedRam`.
    DataEntryMode(DataEntryMode),
    /// Reset all commands and parameters to their power-on defaults. The busy line stays high
    /// while the reset runs.
    SoftwareReset,
    /// Run the display update sequence, redrawing the panel from its RAM. The busy line stays
    /// high until the refresh completes.
    MasterActivation,
    /// Display update control 1: RAM content options and source output mode.
    DisplayUpdateControl1(u8, u8),
    /// Display update control 2: the sequence run by `MasterActivation`.
    DisplayUpdateControl2(u8),
    /// Start writing the black/white RAM. Data sent afterwards fills RAM from the address
    /// counters onward.
    WriteBlackRam,
    /// Start writing the red RAM.
    WriteRedRam,
    /// Write the VCOM register.
    WriteVcom(u8),
    /// Set the end option (EOPT) that follows a custom waveform.
    SetEndOption(u8),
    /// Set the RAM X window from pixel columns. Each pixel column is reduced to its byte address,
    /// losing the bits below 8 pixels. (Note 1)
    SetRamXWindow(u16, u16),
    /// Set the RAM Y window in rows. (Note 1)
    SetRamYWindow(u16, u16),
    /// Set the RAM X address counter. The argument is a RAM X address, not a pixel column.
    /// (Note 1)
    SetRamXCounter(u16),
    /// Set the RAM Y address counter. (Note 1)
    SetRamYCounter(u16),
}

pub enum BufCommand<'buf> {
    /// Write the 153-byte waveform table into the LUT register.
    WriteLut(&'buf [u8]),
}

macro_rules! frame {
    ($buf:ident, $cmd:expr,[]) => {
        ($cmd, &$buf[..0])
    };
    ($buf:ident, $cmd:expr,[$arg0:expr]) => {{
        $buf[0] = $arg0;
        ($cmd, &$buf[..1])
    }};
    ($buf:ident, $cmd:expr,[$arg0:expr, $arg1:expr]) => {{
        $buf[0] = $arg0;
        $buf[1] = $arg1;
        ($cmd, &$buf[..2])
    }};
    ($buf:ident, $cmd:expr,[$arg0:expr, $arg1:expr, $arg2:expr]) => {{
        $buf[0] = $arg0;
        $buf[1] = $arg1;
        $buf[2] = $arg2;
        ($cmd, &$buf[..3])
    }};
    ($buf:ident, $cmd:expr,[$arg0:expr, $arg1:expr, $arg2:expr, $arg3:expr]) => {{
        $buf[0] = $arg0;
        $buf[1] = $arg1;
        $buf[2] = $arg2;
        $buf[3] = $arg3;
        ($cmd, &$buf[..4])
    }};
}

/// Split a 9-bit row address into the low byte and the high bit.
fn row_address(y: u16) -> (u8, u8) {
    ((y & 0xFF) as u8, ((y >> 8) & 0x01) as u8)
}

impl Command {
    pub fn send<DI>(self, iface: &mut DI) -> Result<(), Error>
    where
        DI: DisplayInterface,
    {
        let mut arg_buf = [0u8; 4];
        let (cmd, data): (u8, &[u8]) = match self {
            Command::SetGateVoltage(vgh) => frame!(arg_buf, opcode::GATE_VOLTAGE, [vgh]),
            Command::SetSourceVoltage(vsh1, vsh2, vsl) => {
                frame!(arg_buf, opcode::SOURCE_VOLTAGE, [vsh1, vsh2, vsl])
            }
            Command::DeepSleep(mode) => frame!(
                arg_buf,
                opcode::DEEP_SLEEP,
                [match mode {
                    DeepSleepMode::Normal => 0x00,
                    DeepSleepMode::Mode1 => 0x01,
                }]
            ),
            Command::DataEntryMode(mode) => frame!(
                arg_buf,
                opcode::DATA_ENTRY_MODE,
                [match mode {
                    DataEntryMode::DecrementYDecrementX => 0x00,
                    DataEntryMode::DecrementYIncrementX => 0x01,
                    DataEntryMode::IncrementYDecrementX => 0x02,
                    DataEntryMode::IncrementYIncrementX => 0x03,
                }]
            ),
            Command::SoftwareReset => frame!(arg_buf, opcode::SOFTWARE_RESET, []),
            Command::MasterActivation => frame!(arg_buf, opcode::MASTER_ACTIVATION, []),
            Command::DisplayUpdateControl1(a, b) => {
                frame!(arg_buf, opcode::DISPLAY_UPDATE_CONTROL_1, [a, b])
            }
            Command::DisplayUpdateControl2(seq) => {
                frame!(arg_buf, opcode::DISPLAY_UPDATE_CONTROL_2, [seq])
            }
            Command::WriteBlackRam => frame!(arg_buf, opcode::WRITE_BLACK_RAM, []),
            Command::WriteRedRam => frame!(arg_buf, opcode::WRITE_RED_RAM, []),
            Command::WriteVcom(vcom) => frame!(arg_buf, opcode::WRITE_VCOM, [vcom]),
            Command::SetEndOption(eopt) => frame!(arg_buf, opcode::END_OPTION, [eopt]),
            Command::SetRamXWindow(start, end) => frame!(
                arg_buf,
                opcode::SET_RAM_X_WINDOW,
                [
                    ((start >> 3) & RAM_X_MASK) as u8,
                    ((end >> 3) & RAM_X_MASK) as u8
                ]
            ),
            Command::SetRamYWindow(start, end) => {
                let (start_lo, start_hi) = row_address(start);
                let (end_lo, end_hi) = row_address(end);
                frame!(
                    arg_buf,
                    opcode::SET_RAM_Y_WINDOW,
                    [start_lo, start_hi, end_lo, end_hi]
                )
            }
            Command::SetRamXCounter(x) => frame!(
                arg_buf,
                opcode::SET_RAM_X_COUNTER,
                [(x & RAM_X_MASK) as u8]
            ),
            Command::SetRamYCounter(y) => {
                let (lo, hi) = row_address(y);
                frame!(arg_buf, opcode::SET_RAM_Y_COUNTER, [lo, hi])
            }
        };
        log::trace!("command {:#04x} with {} data bytes", cmd, data.len());
        iface.send_command(cmd)?;
        // Each parameter byte is framed on its own.
        data.iter().try_for_each(|b| iface.send_data(*b))
    }
}

impl<'a> BufCommand<'a> {
    pub fn send<DI>(self, iface: &mut DI) -> Result<(), Error>
    where
        DI: DisplayInterface,
    {
        let (cmd, data) = match self {
            BufCommand::WriteLut(table) => {
                if table.len() == LUT_WAVEFORM_LEN {
                    Ok((opcode::WRITE_LUT, table))
                } else {
                    Err(Error::LutLength {
                        expected: LUT_WAVEFORM_LEN,
                        actual: table.len(),
                    })
                }
            }
        }?;
        log::trace!("command {:#04x} with {} data bytes", cmd, data.len());
        iface.send_command(cmd)?;
        data.iter().try_for_each(|b| iface.send_data(*b))
    }
}

/// Restrict RAM writes to the rectangle spanning pixel columns `x_start..=x_end` and rows
/// `y_start..=y_end`. Columns are rounded down to whole bytes.
pub fn set_window<DI>(
    iface: &mut DI,
    x_start: u16,
    y_start: u16,
    x_end: u16,
    y_end: u16,
) -> Result<(), Error>
where
    DI: DisplayInterface,
{
    Command::SetRamXWindow(x_start, x_end).send(iface)?;
    Command::SetRamYWindow(y_start, y_end).send(iface)
}

/// Move the RAM address counters. `x_start` is a RAM X address (Note 1), `y_start` a row.
pub fn set_cursor<DI>(iface: &mut DI, x_start: u16, y_start: u16) -> Result<(), Error>
where
    DI: DisplayInterface,
{
    Command::SetRamXCounter(x_start).send(iface)?;
    Command::SetRamYCounter(y_start).send(iface)
}
