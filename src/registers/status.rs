//! Status registers
//!
//! IRQ flags and signal quality of the channel and of the last packet.

use bitflags::bitflags;
use core::convert::Infallible;

use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

bitflags! {
    /// LoRa IRQ flags
    ///
    /// A flag is cleared by writing a 1 to its bit position, writing 0 leaves
    /// it untouched.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct IrqFlags: u8 {
        /// RX window elapsed without a valid header (RX single only)
        const RX_TIMEOUT = 1 << 7;
        /// A packet has been received and stored in the FIFO
        const RX_DONE = 1 << 6;
        /// The received payload failed its CRC
        const PAYLOAD_CRC_ERROR = 1 << 5;
        /// A valid header has been received in explicit header mode
        const VALID_HEADER = 1 << 4;
        /// Transmission complete
        const TX_DONE = 1 << 3;
        /// Channel activity detection finished
        const CAD_DONE = 1 << 2;
        /// Frequency hopping channel change requested
        const FHSS_CHANGE_CHANNEL = 1 << 1;
        /// Channel activity detected during CAD
        const CAD_DETECTED = 1;
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for IrqFlags {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "IrqFlags({=u8:#x})", self.bits())
    }
}

/// IRQ flags register (address: 0x12)
#[register(0x12u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct IrqFlagsRegister {
    /// Raised flags
    pub flags: IrqFlags,
}

/// SNR of the last packet (address: 0x19, read-only)
///
/// Two's complement, in steps of 0.25 dB.
#[register(0x19u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister)]
pub struct PktSnrValue {
    /// SNR * 4
    pub value: i8,
}

/// RSSI of the last packet (address: 0x1A, read-only)
///
/// RSSI[dBm] = -157 + value (HF port) or -164 + value (LF port).
#[register(0x1Au8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister)]
pub struct PktRssiValue {
    /// Raw value
    pub value: u8,
}

/// Current RSSI (address: 0x1B, read-only)
///
/// Same offsets as [`PktRssiValue`].
#[register(0x1Bu8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister)]
pub struct RssiValue {
    /// Raw value
    pub value: u8,
}

impl FromByteArray for IrqFlagsRegister {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            flags: IrqFlags::from_bits_retain(bytes[0]),
        })
    }
}

impl ToByteArray for IrqFlagsRegister {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.flags.bits()])
    }
}

impl FromByteArray for PktSnrValue {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            value: bytes[0] as i8,
        })
    }
}

impl FromByteArray for PktRssiValue {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { value: bytes[0] })
    }
}

impl FromByteArray for RssiValue {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { value: bytes[0] })
    }
}
