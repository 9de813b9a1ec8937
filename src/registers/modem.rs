//! LoRa modem registers
//!
//! Bandwidth, coding rate, header mode, spreading factor, CRC, RX timeout,
//! preamble and payload length configuration.
//!
//! Modem configuration should only be changed in Sleep or Standby.

use core::convert::Infallible;

use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

/// Modem configuration 1 (address: 0x1D)
///
/// # Layout
/// - Bits 7:4: Bw, index into the bandwidth table (0 = 7.8 kHz ... 9 = 500 kHz)
/// - Bits 3:1: CodingRate, 1 (4/5) through 4 (4/8)
/// - Bit 0: ImplicitHeaderModeOn
#[register(0x1Du8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct ModemConfig1 {
    /// Raw bandwidth selector
    pub bandwidth: u8,
    /// Raw coding rate field
    pub coding_rate: u8,
    /// Implicit header mode
    pub implicit_header: bool,
}

/// Modem configuration 2 (address: 0x1E)
///
/// # Layout
/// - Bits 7:4: SpreadingFactor, log2 of chips per symbol (6-12)
/// - Bit 3: TxContinuousMode
/// - Bit 2: RxPayloadCrcOn
/// - Bits 1:0: SymbTimeout(9:8), the rest lives in [`SymbTimeoutLsb`]
#[register(0x1Eu8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct ModemConfig2 {
    /// log2(chips / symbol)
    pub spreading_factor: u8,
    /// Send the FIFO contents over and over
    pub tx_continuous: bool,
    /// Generate and check payload CRC
    pub rx_crc_on: bool,
    /// Top two bits of the RX symbol timeout
    pub symb_timeout_msb: u8,
}

/// RX symbol timeout, low byte (address: 0x1F)
#[register(0x1Fu8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct SymbTimeoutLsb {
    /// SymbTimeout(7:0)
    pub value: u8,
}

/// Preamble length (address: 0x20, spans PREAMBLE_MSB/LSB)
///
/// The chip adds 4.25 symbols to the programmed length.
#[register(0x20u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct PreambleLength {
    /// Programmed preamble length in symbols
    pub value: u16,
}

/// Payload length (address: 0x22)
///
/// Number of FIFO bytes to transmit. Must be non-zero in implicit header mode.
#[register(0x22u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct PayloadLength {
    /// Length in bytes
    pub value: u8,
}

/// Maximum payload length (address: 0x23)
///
/// Packets whose header announces a longer payload are dropped by the modem.
#[register(0x23u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct MaxPayloadLength {
    /// Length in bytes
    pub value: u8,
}

/// Modem configuration 3 (address: 0x26)
///
/// # Layout
/// - Bits 7:4: reserved, preserved
/// - Bit 3: LowDataRateOptimize
/// - Bit 2: AgcAutoOn (LNA gain set by the AGC instead of [`Lna`](super::Lna))
/// - Bits 1:0: reserved, preserved
#[register(0x26u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct ModemConfig3 {
    /// Mandatory when the symbol length exceeds 16 ms
    pub low_data_rate_optimize: bool,
    /// Automatic gain control
    pub agc_auto_on: bool,
    /// Bits 7:4 and 1:0, kept as read
    pub reserved: u8,
}

impl FromByteArray for ModemConfig1 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            bandwidth: bytes[0] >> 4,
            coding_rate: (bytes[0] >> 1) & 0x07,
            implicit_header: bytes[0] & 0x01 != 0,
        })
    }
}

impl ToByteArray for ModemConfig1 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([((self.bandwidth & 0x0F) << 4)
            | ((self.coding_rate & 0x07) << 1)
            | self.implicit_header as u8])
    }
}

impl FromByteArray for ModemConfig2 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            spreading_factor: bytes[0] >> 4,
            tx_continuous: bytes[0] & 0x08 != 0,
            rx_crc_on: bytes[0] & 0x04 != 0,
            symb_timeout_msb: bytes[0] & 0x03,
        })
    }
}

impl ToByteArray for ModemConfig2 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([((self.spreading_factor & 0x0F) << 4)
            | ((self.tx_continuous as u8) << 3)
            | ((self.rx_crc_on as u8) << 2)
            | (self.symb_timeout_msb & 0x03)])
    }
}

impl FromByteArray for SymbTimeoutLsb {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { value: bytes[0] })
    }
}

impl ToByteArray for SymbTimeoutLsb {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.value])
    }
}

impl FromByteArray for PreambleLength {
    type Error = Infallible;
    type Array = [u8; 2];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            value: u16::from_be_bytes(bytes),
        })
    }
}

impl ToByteArray for PreambleLength {
    type Error = Infallible;
    type Array = [u8; 2];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok(self.value.to_be_bytes())
    }
}

impl FromByteArray for PayloadLength {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { value: bytes[0] })
    }
}

impl ToByteArray for PayloadLength {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.value])
    }
}

impl FromByteArray for MaxPayloadLength {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { value: bytes[0] })
    }
}

impl ToByteArray for MaxPayloadLength {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.value])
    }
}

impl FromByteArray for ModemConfig3 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            low_data_rate_optimize: bytes[0] & 0x08 != 0,
            agc_auto_on: bytes[0] & 0x04 != 0,
            reserved: bytes[0] & 0xF3,
        })
    }
}

impl ToByteArray for ModemConfig3 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([(self.reserved & 0xF3)
            | ((self.low_data_rate_optimize as u8) << 3)
            | ((self.agc_auto_on as u8) << 2)])
    }
}
