//! The panel controller. It owns the interface and both image planes, and sequences the reset,
//! initialization, RAM transfer and refresh of the panel.

use crate::command::consts::BUFFER_LEN;
use crate::command::{set_cursor, set_window, BufCommand, Command, DataEntryMode, DeepSleepMode};
use crate::config::Config;
use crate::error::Error;
use crate::framebuffer::Framebuffer;
use crate::interface::DisplayInterface;
use crate::lut::{self, LUT_LEN, PARTIAL_REFRESH_LUT};

/// Reset line high time before and after the pulse.
pub const RESET_SETTLE_MS: u32 = 50;
/// Width of the low reset pulse.
pub const RESET_PULSE_MS: u32 = 2;
/// Grace period before the busy line is first sampled, and again after it releases.
pub const BUSY_SETTLE_MS: u32 = 50;
/// Interval between busy line samples.
pub const BUSY_POLL_MS: u32 = 10;
/// Display update control 2 sequence for a partial refresh with the loaded LUT.
const PARTIAL_UPDATE_SEQUENCE: u8 = 0x0F;

/// Where the panel is in its power and refresh cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    /// Nothing has been sent since construction.
    Uninitialized,
    /// The hardware reset pulse is being driven.
    Resetting,
    /// Reset done, waiting for the panel to boot.
    BootWait,
    /// Configuration commands are being sent.
    Initializing,
    /// Ready for image data.
    Idle,
    /// Image data is being streamed into panel RAM.
    Transmitting,
    /// The panel is redrawing itself from RAM.
    Refreshing,
    /// In deep sleep. Only `initialize` brings the panel back.
    Sleeping,
}

impl State {
    /// Whether image data may be sent. `Transmitting` and `Refreshing` are only seen here after
    /// a transfer was aborted by a bus error, and the transfer can simply be retried.
    fn accepts_pixels(self) -> bool {
        matches!(self, State::Idle | State::Transmitting | State::Refreshing)
    }
}

/// The three colours the panel can show.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color {
    White,
    Black,
    Red,
}

/// A driver for the 2.66 inch black/white/red panel.
pub struct Epd2in66b<DI, B = [u8; BUFFER_LEN]> {
    iface: DI,
    black: Framebuffer<B>,
    red: Framebuffer<B>,
    config: Config,
    lut: &'static [u8; LUT_LEN],
    state: State,
    /// Update control 2 holds the partial sequence. Cleared by the reset pulse.
    partial_active: bool,
}

impl<DI> Epd2in66b<DI>
where
    DI: DisplayInterface,
{
    /// Construct a driver for the full 152x296 panel with blank planes. Nothing is sent until
    /// `initialize` is called.
    pub fn new(iface: DI, config: Config) -> Self {
        Epd2in66b {
            iface,
            black: Framebuffer::default(),
            red: Framebuffer::default(),
            config,
            lut: &PARTIAL_REFRESH_LUT,
            state: State::Uninitialized,
            partial_active: false,
        }
    }
}

impl<DI, B> Epd2in66b<DI, B>
where
    DI: DisplayInterface,
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    /// Construct a driver around caller-provided planes. The panel geometry is taken from the
    /// planes, which must agree with each other.
    pub fn with_planes(
        iface: DI,
        config: Config,
        black: Framebuffer<B>,
        red: Framebuffer<B>,
    ) -> Result<Self, Error> {
        if black.width() != red.width() || black.height() != red.height() {
            return Err(Error::PlaneMismatch);
        }
        Ok(Epd2in66b {
            iface,
            black,
            red,
            config,
            lut: &PARTIAL_REFRESH_LUT,
            state: State::Uninitialized,
            partial_active: false,
        })
    }

    /// Panel size in pixels as `(width, height)`.
    pub fn size(&self) -> (u16, u16) {
        (self.black.width(), self.black.height())
    }

    /// Current stage of the power and refresh cycle.
    pub fn state(&self) -> State {
        self.state
    }

    /// The configuration this driver was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Whether `display_partial` has run since the last reset. Full transfers are refused while
    /// this is set.
    pub fn partial_refresh_active(&self) -> bool {
        self.partial_active
    }

    /// The partial refresh waveform held by this driver.
    pub fn lut(&self) -> &'static [u8; LUT_LEN] {
        self.lut
    }

    pub fn black(&self) -> &Framebuffer<B> {
        &self.black
    }

    pub fn red(&self) -> &Framebuffer<B> {
        &self.red
    }

    pub fn black_mut(&mut self) -> &mut Framebuffer<B> {
        &mut self.black
    }

    pub fn red_mut(&mut self) -> &mut Framebuffer<B> {
        &mut self.red
    }

    /// Both planes at once, for drawing code that paints black and red together.
    pub fn planes_mut(&mut self) -> (&mut Framebuffer<B>, &mut Framebuffer<B>) {
        (&mut self.black, &mut self.red)
    }

    /// Paint one pixel across both planes. Coordinates outside the panel are ignored.
    pub fn set_pixel(&mut self, x: u16, y: u16, color: Color) {
        let (black, red) = match color {
            Color::White => (false, false),
            Color::Black => (true, false),
            Color::Red => (false, true),
        };
        self.black.set_pixel(x, y, black);
        self.red.set_pixel(x, y, red);
    }

    /// Blank both planes. This only touches the host-side buffers.
    pub fn clear_buffers(&mut self) {
        self.black.clear();
        self.red.clear();
    }

    /// Drive the hardware reset pulse: high for 50 ms, low for 2 ms, then high again for 50 ms.
    pub fn reset(&mut self) -> Result<(), Error> {
        self.state = State::Resetting;
        self.iface.set_reset(true)?;
        self.iface.delay_ms(RESET_SETTLE_MS);
        self.iface.set_reset(false)?;
        self.iface.delay_ms(RESET_PULSE_MS);
        self.iface.set_reset(true)?;
        self.iface.delay_ms(RESET_SETTLE_MS);
        self.partial_active = false;
        self.state = State::BootWait;
        Ok(())
    }

    /// Block until the panel releases its busy line.
    ///
    /// The line is first sampled 50 ms after the call, then every 10 ms while it reads busy, and
    /// the call returns 50 ms after it reads idle. With a bounded `Config`, polling gives up once
    /// the time spent between samples reaches the budget.
    pub fn wait_until_ready(&mut self) -> Result<(), Error> {
        self.iface.delay_ms(BUSY_SETTLE_MS);
        let mut waited_ms: u32 = 0;
        while self.iface.is_busy()? {
            if let Some(limit) = self.config.busy_timeout_ms {
                if waited_ms >= limit {
                    log::warn!("panel still busy after {} ms, giving up", waited_ms);
                    return Err(Error::BusyTimeout { waited_ms });
                }
            }
            self.iface.delay_ms(BUSY_POLL_MS);
            waited_ms = waited_ms.saturating_add(BUSY_POLL_MS);
        }
        log::debug!("busy released after {} ms", waited_ms);
        self.iface.delay_ms(BUSY_SETTLE_MS);
        Ok(())
    }

    /// Reset the panel and load its configuration. Must be called after power-up and after
    /// `sleep` before any image data is sent. Calling it again repeats the whole sequence,
    /// including the reset pulse.
    pub fn initialize(&mut self) -> Result<(), Error> {
        let (width, height) = self.size();
        log::info!("initializing {}x{} panel", width, height);

        self.reset()?;
        self.wait_until_ready()?;

        self.state = State::Initializing;
        Command::SoftwareReset.send(&mut self.iface)?;
        self.wait_until_ready()?;

        Command::DataEntryMode(DataEntryMode::IncrementYIncrementX).send(&mut self.iface)?;
        set_window(&mut self.iface, 0, 0, width - 1, height - 1)?;
        let [a, b] = self.config.update_control;
        Command::DisplayUpdateControl1(a, b).send(&mut self.iface)?;
        set_cursor(&mut self.iface, 0, 0)?;
        self.wait_until_ready()?;

        self.state = State::Idle;
        Ok(())
    }

    /// Trigger a refresh from panel RAM and wait for it to finish.
    pub fn turn_on_display(&mut self) -> Result<(), Error> {
        self.ensure_ready()?;
        log::debug!("master activation");
        Command::MasterActivation.send(&mut self.iface)?;
        self.state = State::Refreshing;
        self.wait_until_ready()?;
        self.state = State::Idle;
        Ok(())
    }

    /// Send both planes to the panel and refresh it.
    ///
    /// Every byte is inverted on the way out, since panel RAM uses 0 for ink, and is framed on
    /// its own. Refused with `Error::PartialRefreshActive` after `display_partial` until the
    /// panel is initialized again.
    pub fn display(&mut self) -> Result<(), Error> {
        self.ensure_full_refresh()?;
        self.state = State::Transmitting;
        Command::WriteBlackRam.send(&mut self.iface)?;
        write_inverted(&mut self.iface, &self.black)?;
        Command::WriteRedRam.send(&mut self.iface)?;
        write_inverted(&mut self.iface, &self.red)?;
        self.turn_on_display()
    }

    /// Fill panel RAM without touching the planes and refresh. `black_fill` is written to black
    /// RAM as is and `red_fill` is inverted once, each as a single burst covering the panel.
    /// Refused like `display` while a partial refresh sequence is loaded.
    pub fn clear(&mut self, black_fill: u8, red_fill: u8) -> Result<(), Error> {
        self.ensure_full_refresh()?;
        self.state = State::Transmitting;
        let len = self.black.stride() * usize::from(self.black.height());
        Command::WriteBlackRam.send(&mut self.iface)?;
        self.iface.send_data_fill(black_fill, len)?;
        Command::WriteRedRam.send(&mut self.iface)?;
        self.iface.send_data_fill(!red_fill, len)?;
        self.turn_on_display()
    }

    /// Load the partial refresh waveform and the voltages trailing it.
    pub fn load_partial_lut(&mut self) -> Result<(), Error> {
        self.ensure_ready()?;
        BufCommand::WriteLut(lut::waveform(self.lut)).send(&mut self.iface)?;
        self.wait_until_ready()?;
        let v = lut::voltages(self.lut);
        Command::SetEndOption(v.end_option).send(&mut self.iface)?;
        Command::SetGateVoltage(v.gate).send(&mut self.iface)?;
        let (vsh1, vsh2, vsl) = v.source;
        Command::SetSourceVoltage(vsh1, vsh2, vsl).send(&mut self.iface)?;
        Command::WriteVcom(v.vcom).send(&mut self.iface)
    }

    /// Send the black plane and run a partial refresh with the waveform from
    /// `load_partial_lut`. Red RAM is left as it is. The panel keeps using the partial sequence
    /// until `initialize` is called again, and `display` and `clear` are refused until then.
    pub fn display_partial(&mut self) -> Result<(), Error> {
        self.ensure_ready()?;
        self.state = State::Transmitting;
        Command::WriteBlackRam.send(&mut self.iface)?;
        write_inverted(&mut self.iface, &self.black)?;
        Command::DisplayUpdateControl2(PARTIAL_UPDATE_SEQUENCE).send(&mut self.iface)?;
        self.partial_active = true;
        self.turn_on_display()
    }

    /// Put the panel into deep sleep. It will ignore everything until `initialize` runs again.
    pub fn sleep(&mut self) -> Result<(), Error> {
        log::info!("entering deep sleep");
        Command::DeepSleep(DeepSleepMode::Mode1).send(&mut self.iface)?;
        self.state = State::Sleeping;
        Ok(())
    }

    /// Consume the driver and give back the interface.
    pub fn release(self) -> DI {
        self.iface
    }

    fn ensure_full_refresh(&self) -> Result<(), Error> {
        self.ensure_ready()?;
        if self.partial_active {
            Err(Error::PartialRefreshActive)
        } else {
            Ok(())
        }
    }

    fn ensure_ready(&self) -> Result<(), Error> {
        if self.state.accepts_pixels() {
            Ok(())
        } else {
            Err(Error::NotInitialized)
        }
    }
}

/// Stream a plane into the RAM selected by the preceding command, inverting every byte.
fn write_inverted<DI, B>(iface: &mut DI, plane: &Framebuffer<B>) -> Result<(), Error>
where
    DI: DisplayInterface,
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    plane
        .as_bytes()
        .iter()
        .try_for_each(|byte| iface.send_data(!*byte))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::consts::{HEIGHT, WIDTH};
    use crate::interface::test_spy::{Sent, TestSpyInterface};

    fn panel(di: &TestSpyInterface) -> Epd2in66b<TestSpyInterface> {
        Epd2in66b::new(di.split(), Config::new())
    }

    fn small_panel(di: &TestSpyInterface) -> Epd2in66b<TestSpyInterface, [u8; 6]> {
        let black = Framebuffer::new(12, 3, [0u8; 6]).unwrap();
        let red = Framebuffer::new(12, 3, [0u8; 6]).unwrap();
        Epd2in66b::with_planes(di.split(), Config::new(), black, red).unwrap()
    }

    #[test]
    fn reset_pulse_timing() {
        let di = TestSpyInterface::new();
        let mut disp = panel(&di);
        disp.reset().unwrap();
        assert_eq!(di.reset_edges(), vec![(true, 0), (false, 50), (true, 52)]);
        assert_eq!(di.now_ms(), 102);
        assert_eq!(disp.state(), State::BootWait);
    }

    #[test]
    fn wait_returns_after_settle_when_idle() {
        let di = TestSpyInterface::new();
        let mut disp = panel(&di);
        disp.wait_until_ready().unwrap();
        assert_eq!(di.busy_reads(), vec![(false, 50)]);
        assert_eq!(di.now_ms(), 100);
    }

    #[test]
    fn wait_blocks_while_busy() {
        let di = TestSpyInterface::new();
        let mut disp = panel(&di);
        di.set_busy_for(235);
        disp.wait_until_ready().unwrap();

        let reads = di.busy_reads();
        let (last_level, last_t) = *reads.last().unwrap();
        assert!(!last_level);
        assert!(reads[..reads.len() - 1].iter().all(|(busy, _)| *busy));
        assert_eq!(reads[0].1, 50);
        assert!(reads.windows(2).all(|w| w[1].1 - w[0].1 == 10));
        // Released at 235, noticed within one poll interval.
        assert!(last_t >= 235 && last_t < 245);
        assert_eq!(di.now_ms(), last_t + 50);
    }

    #[test]
    fn wait_times_out() {
        let di = TestSpyInterface::new();
        let mut disp = Epd2in66b::new(di.split(), Config::new().busy_timeout_ms(100));
        di.set_busy_for(10_000);
        assert_eq!(
            disp.wait_until_ready(),
            Err(Error::BusyTimeout { waited_ms: 100 })
        );
        assert_eq!(di.busy_reads().len(), 11);
        assert_eq!(di.now_ms(), 150);
    }

    #[test]
    fn unbounded_wait_outlasts_default_budget() {
        let di = TestSpyInterface::new();
        let mut disp = Epd2in66b::new(di.split(), Config::new().unbounded_busy_wait());
        di.set_busy_for(60_000);
        disp.wait_until_ready().unwrap();
        assert!(di.now_ms() >= 60_050);
    }

    #[test]
    fn initialize_sequence() {
        let di = TestSpyInterface::new();
        let mut disp = panel(&di);
        disp.initialize().unwrap();
        di.check_multi(&[
            (0x12, &[]),
            (0x11, &[0x03]),
            (0x44, &[0x00, 0x12]),
            (0x45, &[0x00, 0x00, 0x27, 0x01]),
            (0x21, &[0x00, 0x80]),
            (0x4E, &[0x00]),
            (0x4F, &[0x00, 0x00]),
        ]);
        assert_eq!(di.reset_edges().len(), 3);
        // One busy wait after the reset, one after the software reset, one at the end.
        assert_eq!(di.busy_reads().len(), 3);
        assert_eq!(disp.state(), State::Idle);
    }

    #[test]
    fn custom_update_control() {
        let di = TestSpyInterface::new();
        let mut disp = Epd2in66b::new(di.split(), Config::new().display_update_control(0x40, 0x00));
        disp.initialize().unwrap();
        assert!(di.frames().contains(&(0x21, vec![0x40, 0x00])));
    }

    #[test]
    fn init_clear_sleep_scenario() {
        let di = TestSpyInterface::new();
        let mut disp = panel(&di);
        disp.initialize().unwrap();
        disp.clear(0xFF, 0xFF).unwrap();
        disp.sleep().unwrap();
        assert_eq!(
            di.commands(),
            vec![0x12, 0x11, 0x44, 0x45, 0x21, 0x4E, 0x4F, 0x24, 0x26, 0x20, 0x10]
        );
        assert_eq!(disp.state(), State::Sleeping);
    }

    #[test]
    fn clear_sends_one_burst_per_plane() {
        let di = TestSpyInterface::new();
        let mut disp = panel(&di);
        disp.initialize().unwrap();
        di.clear();
        disp.clear(0xFF, 0xFF).unwrap();

        let sent = di.sent();
        assert_eq!(sent[0], Sent::Cmd(0x24));
        assert_eq!(sent[1], Sent::Burst(vec![0xFF; BUFFER_LEN]));
        assert_eq!(sent[2], Sent::Cmd(0x26));
        assert_eq!(sent[3], Sent::Burst(vec![0x00; BUFFER_LEN]));
        assert_eq!(sent[4], Sent::Cmd(0x20));
        assert!(sent[5..]
            .iter()
            .all(|s| matches!(s, Sent::Delay(_) | Sent::BusyRead(..))));
    }

    #[test]
    fn clear_inverts_only_red_fill() {
        let di = TestSpyInterface::new();
        let mut disp = small_panel(&di);
        disp.initialize().unwrap();
        di.clear();
        disp.clear(0x0F, 0x3C).unwrap();
        di.check_multi(&[(0x24, &[0x0F; 6]), (0x26, &[0xC3; 6]), (0x20, &[])]);
        // The planes themselves are untouched.
        assert_eq!(disp.black().as_bytes(), &[0u8; 6]);
    }

    #[test]
    fn display_inverts_every_byte() {
        let di = TestSpyInterface::new();
        let mut disp = small_panel(&di);
        disp.initialize().unwrap();
        disp.black_mut()
            .as_bytes_mut()
            .copy_from_slice(&[0x00, 0xF0, 0xFF, 0x10, 0x81, 0x7E]);
        disp.red_mut()
            .as_bytes_mut()
            .copy_from_slice(&[0xAA, 0x55, 0x01, 0x00, 0xFF, 0x80]);
        di.clear();
        disp.display().unwrap();

        di.check_multi(&[
            (0x24, &[0xFF, 0x0F, 0x00, 0xEF, 0x7E, 0x81]),
            (0x26, &[0x55, 0xAA, 0xFE, 0xFF, 0x00, 0x7F]),
            (0x20, &[]),
        ]);
        // Each byte in its own frame, never as a burst.
        assert!(!di.sent().iter().any(|s| matches!(s, Sent::Burst(_))));
        assert_eq!(
            di.sent()
                .iter()
                .filter(|s| matches!(s, Sent::Data(_)))
                .count(),
            12
        );
        assert_eq!(disp.state(), State::Idle);
    }

    #[test]
    fn display_full_panel_matches_planes() {
        let di = TestSpyInterface::new();
        let mut disp = panel(&di);
        disp.initialize().unwrap();
        disp.set_pixel(0, 0, Color::Black);
        disp.set_pixel(WIDTH - 1, HEIGHT - 1, Color::Red);
        di.clear();
        disp.display().unwrap();

        let frames = di.frames();
        assert_eq!(frames[0].0, 0x24);
        assert_eq!(frames[1].0, 0x26);
        let expected_black: Vec<u8> = disp.black().as_bytes().iter().map(|b| !b).collect();
        let expected_red: Vec<u8> = disp.red().as_bytes().iter().map(|b| !b).collect();
        assert_eq!(frames[0].1, expected_black);
        assert_eq!(frames[1].1, expected_red);
        assert_eq!(frames[0].1[0], 0x7F);
        assert_eq!(frames[1].1[BUFFER_LEN - 1], 0xFE);
    }

    #[test]
    fn refresh_waits_for_panel() {
        let di = TestSpyInterface::new();
        let mut disp = panel(&di);
        disp.initialize().unwrap();
        di.set_refresh_time(1_500);
        let start = di.now_ms();
        disp.clear(0xFF, 0xFF).unwrap();
        assert!(di.now_ms() >= start + 1_500 + 50);
        assert!(di.now_ms() < start + 1_500 + 50 + 10 + 50);
    }

    #[test]
    fn refuses_pixels_before_initialize_and_after_sleep() {
        let di = TestSpyInterface::new();
        let mut disp = panel(&di);
        assert_eq!(disp.display(), Err(Error::NotInitialized));
        assert_eq!(disp.clear(0xFF, 0xFF), Err(Error::NotInitialized));
        assert_eq!(disp.turn_on_display(), Err(Error::NotInitialized));
        assert!(di.sent().is_empty());

        disp.initialize().unwrap();
        disp.sleep().unwrap();
        di.clear();
        assert_eq!(disp.display(), Err(Error::NotInitialized));
        assert!(di.sent().is_empty());

        // A fresh initialize wakes it up again.
        disp.initialize().unwrap();
        disp.display().unwrap();
    }

    #[test]
    fn bus_error_aborts_and_can_be_retried() {
        let di = TestSpyInterface::new();
        let mut disp = small_panel(&di);
        disp.initialize().unwrap();

        di.fail_on_command(0x26);
        assert!(matches!(disp.display(), Err(Error::Spi(_))));
        assert_eq!(disp.state(), State::Transmitting);

        di.clear();
        disp.display().unwrap();
        assert_eq!(di.commands(), vec![0x24, 0x26, 0x20]);
        assert_eq!(disp.state(), State::Idle);
    }

    #[test]
    fn failed_initialize_must_be_repeated() {
        let di = TestSpyInterface::new();
        let mut disp = panel(&di);
        di.fail_on_command(0x12);
        assert!(disp.initialize().is_err());
        assert_eq!(disp.display(), Err(Error::NotInitialized));

        disp.initialize().unwrap();
        assert_eq!(disp.state(), State::Idle);
    }

    #[test]
    fn timeout_during_refresh_surfaces() {
        let di = TestSpyInterface::new();
        let mut disp = Epd2in66b::new(di.split(), Config::new().busy_timeout_ms(1_000));
        disp.initialize().unwrap();
        di.set_refresh_time(5_000);
        assert_eq!(
            disp.clear(0xFF, 0xFF),
            Err(Error::BusyTimeout { waited_ms: 1_000 })
        );
        assert_eq!(disp.state(), State::Refreshing);
    }

    #[test]
    fn set_pixel_colors() {
        let di = TestSpyInterface::new();
        let mut disp = small_panel(&di);
        disp.set_pixel(0, 0, Color::Black);
        disp.set_pixel(1, 0, Color::Red);
        disp.set_pixel(2, 0, Color::Black);
        disp.set_pixel(2, 0, Color::White);
        assert_eq!(disp.black().get_pixel(0, 0), Some(true));
        assert_eq!(disp.red().get_pixel(0, 0), Some(false));
        assert_eq!(disp.black().get_pixel(1, 0), Some(false));
        assert_eq!(disp.red().get_pixel(1, 0), Some(true));
        assert_eq!(disp.black().get_pixel(2, 0), Some(false));
        assert_eq!(disp.red().get_pixel(2, 0), Some(false));

        // Off-panel pixels are dropped.
        disp.set_pixel(12, 0, Color::Black);
        assert_eq!(disp.black().as_bytes(), &[0x80, 0, 0, 0, 0, 0]);

        disp.clear_buffers();
        assert_eq!(disp.red().as_bytes(), &[0u8; 6]);
    }

    #[test]
    fn geometry_from_planes() {
        let di = TestSpyInterface::new();
        let black = Framebuffer::new(150, 2, [0u8; 38]).unwrap();
        let red = Framebuffer::new(150, 2, [0u8; 38]).unwrap();
        let mut disp = Epd2in66b::with_planes(di.split(), Config::new(), black, red).unwrap();
        assert_eq!(disp.size(), (150, 2));
        disp.initialize().unwrap();
        assert!(di.frames().contains(&(0x44, vec![0x00, 0x12])));
        assert!(di.frames().contains(&(0x45, vec![0x00, 0x00, 0x01, 0x00])));
    }

    #[test]
    fn mismatched_planes_rejected() {
        let di = TestSpyInterface::new();
        let black = Framebuffer::new(16, 2, [0u8; 4]).unwrap();
        let red = Framebuffer::new(8, 4, [0u8; 4]).unwrap();
        assert!(matches!(
            Epd2in66b::with_planes(di.split(), Config::new(), black, red),
            Err(Error::PlaneMismatch)
        ));
    }

    #[test]
    fn partial_lut_load() {
        let di = TestSpyInterface::new();
        let mut disp = panel(&di);
        assert_eq!(disp.load_partial_lut(), Err(Error::NotInitialized));
        disp.initialize().unwrap();
        di.clear();
        disp.load_partial_lut().unwrap();
        di.check_multi(&[
            (0x32, &PARTIAL_REFRESH_LUT[..153]),
            (0x3F, &[0x22]),
            (0x03, &[0x17]),
            (0x04, &[0x41, 0xB0, 0x32]),
            (0x2C, &[0x36]),
        ]);
        assert!(!di.sent().iter().any(|s| matches!(s, Sent::Burst(_))));
        assert_eq!(disp.lut().len(), 159);
    }

    #[test]
    fn partial_display_leaves_red_ram() {
        let di = TestSpyInterface::new();
        let mut disp = small_panel(&di);
        disp.initialize().unwrap();
        disp.load_partial_lut().unwrap();
        disp.black_mut().fill(0xF0);
        di.clear();
        disp.display_partial().unwrap();
        di.check_multi(&[(0x24, &[0x0F; 6]), (0x22, &[0x0F]), (0x20, &[])]);
        assert_eq!(disp.state(), State::Idle);
        assert!(disp.partial_refresh_active());
    }

    #[test]
    fn full_refresh_refused_after_partial() {
        let di = TestSpyInterface::new();
        let mut disp = small_panel(&di);
        disp.initialize().unwrap();
        disp.load_partial_lut().unwrap();
        disp.display_partial().unwrap();
        di.clear();

        assert_eq!(disp.display(), Err(Error::PartialRefreshActive));
        assert_eq!(disp.clear(0xFF, 0xFF), Err(Error::PartialRefreshActive));
        assert!(di.sent().is_empty());

        // Further partial refreshes are still fine.
        disp.display_partial().unwrap();
        assert_eq!(di.commands(), vec![0x24, 0x22, 0x20]);

        // A fresh initialize puts the panel back on the full sequence.
        disp.initialize().unwrap();
        assert!(!disp.partial_refresh_active());
        di.clear();
        disp.display().unwrap();
        assert_eq!(di.commands(), vec![0x24, 0x26, 0x20]);
    }

    #[test]
    fn release_returns_interface() {
        let di = TestSpyInterface::new();
        let mut disp = panel(&di);
        disp.sleep().unwrap();
        let iface = disp.release();
        assert_eq!(iface.commands(), vec![0x10]);
    }
}
