//! Driver library for the Waveshare 2.66 inch black/white/red e-paper panel (152x296 pixels).
//!
//! The panel is driven over a 4-wire SPI link (SCK, MOSI, CS and D/C) plus a reset output and a
//! busy input. Image data lives in two packed 1-bit [`Framebuffer`] planes, one black and one red,
//! which [`Epd2in66b::display`] streams to the panel RAM before triggering a refresh.

#![cfg_attr(not(any(test, feature = "std")), no_std)]

pub mod command;
pub mod config;
pub mod display;
pub mod error;
pub mod framebuffer;
pub mod interface;
pub mod lut;

// Re-exports for primary API.
pub use command::consts::{BUFFER_LEN, HEIGHT, SPI_FREQUENCY_HZ, WIDTH};
pub use command::{DataEntryMode, DeepSleepMode};
pub use config::Config;
pub use display::{Color, Epd2in66b, State};
pub use error::Error;
pub use framebuffer::Framebuffer;
pub use interface::spi::SpiInterface;
pub use interface::DisplayInterface;
