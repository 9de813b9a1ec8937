//! Radio operations on top of the register bus
//!
//! Each submodule adds a group of methods to [`Device`](crate::Device):
//!
//! - [`mode`]: operating mode state machine
//! - [`flags`]: IRQ flag polling and clearing
//! - [`packet`]: FIFO pointer handling and payload transfer
//! - [`modem`]: RF and modem configuration in physical units
//!
//! These methods are stateless. They assume the chip already is in LoRa mode,
//! which [`Session::new`](crate::Session::new) establishes once at startup.
//! Shared registers are always updated with a read-modify-write.

pub mod flags;
pub mod mode;
pub mod modem;
pub mod packet;

pub use mode::State;
