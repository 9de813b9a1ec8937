//! Driver error type

use core::fmt;

/// Errors reported by the driver.
///
/// `NoData` and `BadMessage` are recoverable: the session has already cleared
/// the IRQ flags and returned to RX-Continuous, so the caller may simply retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The version register read back 0x00 or 0xFF, nothing answers on the bus
    NoDevice(u8),
    /// The receive window elapsed without a packet, or the chip raised RxTimeout
    NoData,
    /// A packet arrived but its payload CRC did not match
    BadMessage,
    /// The SPI transaction failed
    Bus,
    /// A register held a value that has no meaning for its field
    InvalidRegister {
        /// Register address
        address: u8,
        /// Raw value that was read
        value: u8,
    },
    /// A caller supplied parameter cannot be encoded
    InvalidArgument,
    /// Every slot of a [`Registry`](crate::Registry) is occupied
    RegistryFull,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoDevice(version) => write!(f, "no LoRa device (version {version:#04x})"),
            Self::NoData => f.write_str("no data received"),
            Self::BadMessage => f.write_str("payload CRC error"),
            Self::Bus => f.write_str("SPI bus error"),
            Self::InvalidRegister { address, value } => {
                write!(f, "register {address:#04x} holds invalid value {value:#04x}")
            }
            Self::InvalidArgument => f.write_str("invalid argument"),
            Self::RegistryFull => f.write_str("device registry full"),
        }
    }
}
