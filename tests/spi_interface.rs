//! Bus-level checks of `SpiInterface` against mocked HAL peripherals.

use embedded_hal_mock::eh1::delay::NoopDelay;
use embedded_hal_mock::eh1::digital::{
    Mock as PinMock, State as PinState, Transaction as PinTransaction,
};
use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTransaction};

use epd2in66b::{Config, DisplayInterface, Epd2in66b, SpiInterface};

type Iface = SpiInterface<SpiMock<u8>, PinMock, PinMock, PinMock, PinMock, NoopDelay>;

/// Expected traffic on each line, built up frame by frame.
#[derive(Default)]
struct Expect {
    spi: Vec<SpiTransaction<u8>>,
    cs: Vec<PinTransaction>,
    dc: Vec<PinTransaction>,
    rst: Vec<PinTransaction>,
    busy: Vec<PinTransaction>,
}

impl Expect {
    fn frame(mut self, data: bool, writes: &[&[u8]]) -> Self {
        self.dc.push(PinTransaction::set(if data {
            PinState::High
        } else {
            PinState::Low
        }));
        self.cs.push(PinTransaction::set(PinState::Low));
        for w in writes {
            self.spi.push(SpiTransaction::write_vec(w.to_vec()));
        }
        self.spi.push(SpiTransaction::flush());
        self.cs.push(PinTransaction::set(PinState::High));
        self
    }

    fn command(self, cmd: u8) -> Self {
        self.frame(false, &[&[cmd]])
    }

    fn data(self, byte: u8) -> Self {
        self.frame(true, &[&[byte]])
    }

    fn rst(mut self, level: PinState) -> Self {
        self.rst.push(PinTransaction::set(level));
        self
    }

    fn busy(mut self, level: PinState) -> Self {
        self.busy.push(PinTransaction::get(level));
        self
    }

    fn build(self) -> Iface {
        SpiInterface::new(
            SpiMock::new(&self.spi),
            PinMock::new(&self.cs),
            PinMock::new(&self.dc),
            PinMock::new(&self.rst),
            PinMock::new(&self.busy),
            NoopDelay::new(),
        )
    }
}

fn finish(iface: Iface) {
    let (mut spi, mut cs, mut dc, mut rst, mut busy, _) = iface.release();
    spi.done();
    cs.done();
    dc.done();
    rst.done();
    busy.done();
}

#[test]
fn command_is_framed_with_dc_low() {
    let mut iface = Expect::default().command(0x12).build();
    iface.send_command(0x12).unwrap();
    finish(iface);
}

#[test]
fn data_bytes_get_a_frame_each() {
    let mut iface = Expect::default().data(0x00).data(0x80).build();
    iface.send_data(0x00).unwrap();
    iface.send_data(0x80).unwrap();
    finish(iface);
}

#[test]
fn burst_holds_chip_select() {
    let payload = [0x01, 0x02, 0x03, 0x04, 0x05];
    let mut iface = Expect::default().frame(true, &[&payload]).build();
    iface.send_data_burst(&payload).unwrap();
    finish(iface);
}

#[test]
fn fill_is_chunked_inside_one_frame() {
    let mut iface = Expect::default()
        .frame(true, &[&[0xAA; 32], &[0xAA; 8]])
        .build();
    iface.send_data_fill(0xAA, 40).unwrap();
    finish(iface);
}

#[test]
fn reset_and_busy_lines() {
    let mut iface = Expect::default()
        .rst(PinState::Low)
        .rst(PinState::High)
        .busy(PinState::High)
        .busy(PinState::Low)
        .build();
    iface.set_reset(false).unwrap();
    iface.set_reset(true).unwrap();
    assert!(iface.is_busy().unwrap());
    assert!(!iface.is_busy().unwrap());
    finish(iface);
}

#[test]
fn controller_reset_pulse_and_sleep() {
    let iface = Expect::default()
        .rst(PinState::High)
        .rst(PinState::Low)
        .rst(PinState::High)
        .busy(PinState::High)
        .busy(PinState::Low)
        .command(0x10)
        .data(0x01)
        .build();
    let mut disp = Epd2in66b::new(iface, Config::new());
    disp.reset().unwrap();
    disp.wait_until_ready().unwrap();
    disp.sleep().unwrap();
    finish(disp.release());
}
