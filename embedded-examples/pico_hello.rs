//! Full example code for driving the 2.66 inch black/red panel from a Raspberry Pi Pico, using
//! the Waveshare Pico-ePaper-2.66-B wiring: SPI1 on GPIO10 (SCK) and GPIO11 (MOSI), GPIO9 for
//! C/S, GPIO8 for D/C, GPIO12 for /RESET and GPIO13 for BUSY.
//!
//! Needs `embassy-executor`, `embassy-rp` (feature `rp2040`), `embassy-time`, `embedded-graphics`,
//! `cortex-m`, `defmt-rtt` and `panic-probe` on top of this crate.

#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::spi::{Config as SpiConfig, Spi};
use embassy_time::Delay;
use embedded_graphics::mono_font::ascii::FONT_10X20;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::Text;
use epd2in66b::{Config, Epd2in66b, SpiInterface, SPI_FREQUENCY_HZ};
use {defmt_rtt as _, panic_probe as _};

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_rp::init(Default::default());

    let mut spi_config = SpiConfig::default();
    spi_config.frequency = SPI_FREQUENCY_HZ;
    let spi = Spi::new_blocking_txonly(p.SPI1, p.PIN_10, p.PIN_11, spi_config);

    let cs = Output::new(p.PIN_9, Level::High);
    let dc = Output::new(p.PIN_8, Level::Low);
    let rst = Output::new(p.PIN_12, Level::High);
    let busy = Input::new(p.PIN_13, Pull::Up);

    let iface = SpiInterface::new(spi, cs, dc, rst, busy, Delay);
    let mut disp = Epd2in66b::new(iface, Config::new());

    disp.initialize().unwrap();
    disp.clear(0xFF, 0xFF).unwrap();

    // Black text on white with a red bar underneath.
    let (black, red) = disp.planes_mut();
    Text::new(
        "Hello",
        Point::new(10, 40),
        MonoTextStyle::new(&FONT_10X20, BinaryColor::On),
    )
    .draw(black)
    .unwrap();
    Rectangle::new(Point::new(10, 50), Size::new(132, 12))
        .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
        .draw(red)
        .unwrap();

    disp.display().unwrap();
    disp.sleep().unwrap();

    loop {
        cortex_m::asm::wfi();
    }
}
