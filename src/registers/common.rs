//! Common registers
//!
//! This module contains the registers shared by every modem configuration:
//! - Operating mode and modem selection
//! - RF carrier frequency
//! - Power amplifier and LNA configuration
//! - Silicon revision

use core::convert::Infallible;

use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

/// FIFO data register (address: 0x00)
///
/// Not a typed register: bursts to this address read or write consecutive FIFO
/// bytes starting at the FIFO address pointer, which the chip advances itself.
pub const FIFO: u8 = 0x00;

/// Operating mode of the transceiver
///
/// Stored in bits 2:0 of [`OpMode`]. The values are only meaningful while
/// LoRa mode is selected in the same register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Lowest power, FIFO not accessible. Only mode in which LoRa mode may be toggled
    Sleep = 0x0,
    /// Crystal oscillator running, configuration allowed
    Standby = 0x1,
    /// Frequency synthesizer locked on the TX frequency
    FsTx = 0x2,
    /// Transmit the FIFO contents, then fall back to standby
    Tx = 0x3,
    /// Frequency synthesizer locked on the RX frequency
    FsRx = 0x4,
    /// Receive until told otherwise
    RxContinuous = 0x5,
    /// Receive one packet or time out, then fall back to standby
    RxSingle = 0x6,
    /// Channel activity detection
    Cad = 0x7,
}

impl Mode {
    /// Decodes the 3-bit mode field. Every value is a valid mode.
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0x07 {
            0x0 => Self::Sleep,
            0x1 => Self::Standby,
            0x2 => Self::FsTx,
            0x3 => Self::Tx,
            0x4 => Self::FsRx,
            0x5 => Self::RxContinuous,
            0x6 => Self::RxSingle,
            _ => Self::Cad,
        }
    }

    /// Raw 3-bit field value
    pub const fn bits(self) -> u8 {
        self as u8
    }
}

/// Operating mode register (address: 0x01)
///
/// # Layout
/// - Bit 7: LongRangeMode (1 = LoRa)
/// - Bit 6: AccessSharedReg
/// - Bits 5:4: reserved, preserved
/// - Bit 3: LowFrequencyModeOn (selects the low band register set and RSSI offset)
/// - Bits 2:0: Mode
#[register(0x01u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct OpMode {
    /// LoRa modem selected
    pub long_range_mode: bool,
    /// FSK register page mapped over the LoRa page
    pub access_shared_reg: bool,
    /// Bits 5:4, kept as read
    pub reserved: u8,
    /// Low frequency band register set selected
    pub low_frequency_mode: bool,
    /// Current operating mode
    pub mode: Mode,
}

/// RF carrier frequency (address: 0x06, spans FRF_MSB/MID/LSB)
///
/// Frf = F(rf) * 2^19 / F(xosc). Written as one 3 byte burst, the change takes
/// effect once the LSB has been written.
#[register(0x06u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct Frf {
    /// 24-bit frequency word
    pub value: u32,
}

/// Power amplifier configuration register (address: 0x09)
///
/// # Output power
/// - PA_BOOST pin (`pa_boost` set): Pout = 17 - (15 - OutputPower) dBm
/// - RFO pin: Pmax = 10.8 + 0.6 * MaxPower dBm, Pout = Pmax - (15 - OutputPower) dBm
///
/// The register is wholly owned by the power setting and is written without
/// reading it first.
#[register(0x09u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ReadableRegister, WritableRegister)]
pub struct PaConfig {
    /// Route the PA through PA_BOOST
    pub pa_boost: bool,
    /// Bits 6:4, maximum power selector for the RFO pin
    pub max_power: u8,
    /// Bits 3:0
    pub output_power: u8,
}

/// LNA settings register (address: 0x0C)
///
/// # Layout
/// - Bits 7:5: LnaGain, 1 (G1, maximum gain) through 6 (G6, minimum gain).
///   0 and 7 are reserved.
/// - Bits 4:0: LnaBoostLf / LnaBoostHf, preserved
#[register(0x0Cu8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct Lna {
    /// Raw gain selector
    pub gain: u8,
    /// Bits 4:0, kept as read
    pub boost: u8,
}

/// Silicon revision register (address: 0x42)
///
/// Bits 7:4 hold the full revision number, bits 3:0 the metal mask revision.
/// A floating or missing chip reads back 0x00 or 0xFF.
#[register(0x42u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister)]
pub struct Version {
    /// Raw version byte
    pub value: u8,
}

impl Version {
    /// Whether anything plausible answered on the bus
    pub fn is_present(&self) -> bool {
        self.value != 0x00 && self.value != 0xFF
    }

    /// Full revision number
    pub fn full(&self) -> u8 {
        self.value >> 4
    }

    /// Metal mask revision number
    pub fn metal_mask(&self) -> u8 {
        self.value & 0x0F
    }
}

impl FromByteArray for OpMode {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            long_range_mode: bytes[0] & 0x80 != 0,
            access_shared_reg: bytes[0] & 0x40 != 0,
            reserved: (bytes[0] >> 4) & 0x03,
            low_frequency_mode: bytes[0] & 0x08 != 0,
            mode: Mode::from_bits(bytes[0]),
        })
    }
}

impl ToByteArray for OpMode {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([((self.long_range_mode as u8) << 7)
            | ((self.access_shared_reg as u8) << 6)
            | ((self.reserved & 0x03) << 4)
            | ((self.low_frequency_mode as u8) << 3)
            | self.mode.bits()])
    }
}

impl FromByteArray for Frf {
    type Error = Infallible;
    type Array = [u8; 3];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            value: u32::from_be_bytes([0, bytes[0], bytes[1], bytes[2]]),
        })
    }
}

impl ToByteArray for Frf {
    type Error = Infallible;
    type Array = [u8; 3];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let [_, msb, mid, lsb] = self.value.to_be_bytes();
        Ok([msb, mid, lsb])
    }
}

impl FromByteArray for PaConfig {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            pa_boost: bytes[0] & 0x80 != 0,
            max_power: (bytes[0] >> 4) & 0x07,
            output_power: bytes[0] & 0x0F,
        })
    }
}

impl ToByteArray for PaConfig {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([((self.pa_boost as u8) << 7)
            | ((self.max_power & 0x07) << 4)
            | (self.output_power & 0x0F)])
    }
}

impl FromByteArray for Lna {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            gain: bytes[0] >> 5,
            boost: bytes[0] & 0x1F,
        })
    }
}

impl ToByteArray for Lna {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([((self.gain & 0x07) << 5) | (self.boost & 0x1F)])
    }
}

impl FromByteArray for Version {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { value: bytes[0] })
    }
}
