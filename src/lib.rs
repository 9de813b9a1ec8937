#![cfg_attr(not(test), no_std)]
//! SX127x LoRa Radio Driver
//!
//! This crate provides a register-level interface for the Semtech SX1276/77/78/79
//! LoRa transceivers, and a blocking packet session on top of it. The chips are
//! driven purely over SPI: completion is detected by polling the IRQ flags, so
//! no DIO pins are needed.
//!
//! # Features
//! - Frequency range: 137-525 MHz (SX1278), 137-1020 MHz (SX1276)
//! - LoRa: SF6-12, BW 7.8-500kHz, CR 4/5-4/8
//! - Output power: -2 to +17 dBm
//! - 256 byte FIFO shared between TX and RX
//!
//! # Architecture
//! The driver is organized into several layers:
//!
//! - [`device`]: SPI register bus
//!   - Typed register reads, writes and read-modify-writes
//!   - FIFO bursts
//!   - Blocking and async variants
//!
//! - [`registers`]: Register definitions of the LoRa register page
//!
//! - [`codec`]: Conversions between physical units and register fields
//!
//! - [`radio`]: Stateless radio operations on [`Device`]
//!   - [`radio::mode`]: Operating mode control
//!   - [`radio::flags`]: IRQ flag polling
//!   - [`radio::packet`]: Packet transfer through the FIFO
//!   - [`radio::modem`]: RF and modem configuration
//!
//! - [`session`]: Locked, polling packet I/O for one attached chip
//!
//! - [`registry`]: Fixed table of attached sessions
//!
//! # Important Notes
//! - Modem configuration should be changed in Sleep or Standby
//! - LoRa mode can only be selected in Sleep, [`Session::new`] does this once
//! - Shared registers are always read-modify-written
//!
//! # Example
//! ```no_run
//! use embedded_hal::spi::SpiDevice;
//! use sx1278::{Device, Error, Mode};
//!
//! fn standby<SPI: SpiDevice>(spi: SPI) -> Result<Device<SPI>, Error> {
//!     let mut device = Device::new(spi);
//!
//!     if !device.version()?.is_present() {
//!         return Err(Error::NoDevice(0));
//!     }
//!     device.set_mode(Mode::Standby)?;
//!
//!     Ok(device)
//! }
//! ```

#[macro_use]
mod fmt;

pub mod codec;
pub mod config;
pub mod device;
mod error;
pub mod poll;
pub mod radio;
pub mod registers;
pub mod registry;
pub mod session;

#[cfg(test)]
mod mock;

pub use config::Config;
pub use device::Device;
pub use error::Error;
pub use poll::PollBudget;
pub use radio::State;
pub use registers::*;
pub use registry::{DeviceId, Registry};
pub use session::Session;
