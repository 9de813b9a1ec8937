//! Register definitions for the SX127x LoRa page
//! Taken from the SX1276/77/78/79 datasheet, rev. 7
//!
//! Every register type carries the bits it does not model through its codec
//! untouched, so a read followed by a write of the same value leaves the chip
//! exactly as it was.

mod common;
mod fifo;
mod modem;
mod status;

pub use common::*;
pub use fifo::*;
pub use modem::*;
pub use status::*;
