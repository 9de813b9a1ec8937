//! FIFO pointer registers
//!
//! The 256 byte FIFO is shared between TX and RX. The base address registers
//! partition it, the address pointer selects where the next SPI burst on
//! [`FIFO`](super::FIFO) lands. None of these are cached by the driver.

use core::convert::Infallible;

use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

/// FIFO SPI address pointer (address: 0x0D)
#[register(0x0Du8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct FifoAddrPtr {
    /// FIFO offset of the next SPI access
    pub address: u8,
}

/// FIFO TX base address (address: 0x0E)
///
/// Reset value 0x80, the upper half of the FIFO.
#[register(0x0Eu8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct FifoTxBaseAddr {
    /// Start of the TX payload in the FIFO
    pub address: u8,
}

/// FIFO RX base address (address: 0x0F)
#[register(0x0Fu8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct FifoRxBaseAddr {
    /// Where the demodulator starts writing received payloads
    pub address: u8,
}

/// Start address of the last received packet (address: 0x10, read-only)
#[register(0x10u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister)]
pub struct FifoRxCurrentAddr {
    /// FIFO offset of the first byte of the last packet
    pub address: u8,
}

/// Payload length of the last received packet (address: 0x13, read-only)
#[register(0x13u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister)]
pub struct RxNbBytes {
    /// Number of payload bytes
    pub count: u8,
}

impl FromByteArray for FifoAddrPtr {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { address: bytes[0] })
    }
}

impl ToByteArray for FifoAddrPtr {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.address])
    }
}

impl FromByteArray for FifoTxBaseAddr {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { address: bytes[0] })
    }
}

impl ToByteArray for FifoTxBaseAddr {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.address])
    }
}

impl FromByteArray for FifoRxBaseAddr {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { address: bytes[0] })
    }
}

impl ToByteArray for FifoRxBaseAddr {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.address])
    }
}

impl FromByteArray for FifoRxCurrentAddr {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { address: bytes[0] })
    }
}

impl FromByteArray for RxNbBytes {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { count: bytes[0] })
    }
}
