//! LoRa modem configuration
//!
//! Register-level setters and getters for the radio parameters. Values are
//! never cached: every getter reads the chip and every setter writes it,
//! read-modify-writing the registers it shares with other settings.

use embedded_hal::spi::SpiDevice;
use regiface::ReadableRegister;

use crate::codec;
use crate::registers::{
    Frf, Lna, MaxPayloadLength, ModemConfig1, ModemConfig2, ModemConfig3, OpMode, PaConfig,
    PktRssiValue, PktSnrValue, PreambleLength, RssiValue, SymbTimeoutLsb, Version,
};
use crate::{Device, Error};

impl<SPI> Device<SPI>
where
    SPI: SpiDevice,
{
    /// Sets the carrier frequency in Hz for a crystal running at `xosc_hz`.
    pub fn set_frequency(&mut self, hz: u32, xosc_hz: u32) -> Result<(), Error> {
        self.write_register(Frf {
            value: codec::frf_from_hz(hz, xosc_hz),
        })
    }

    /// Carrier frequency in Hz, rounded down to the synthesizer step
    pub fn frequency(&mut self, xosc_hz: u32) -> Result<u32, Error> {
        let frf = self.read_register::<Frf>()?;
        Ok(codec::hz_from_frf(frf.value, xosc_hz))
    }

    /// Programs the PA for `dbm`. See [`codec::pa_config_from_dbm`].
    pub fn set_power(&mut self, dbm: i32) -> Result<(), Error> {
        self.write_register(codec::pa_config_from_dbm(dbm))
    }

    /// Output power in dBm
    pub fn power(&mut self) -> Result<i32, Error> {
        Ok(codec::dbm_from_pa_config(self.read_register()?))
    }

    /// Routes the PA through PA_BOOST, leaving the power fields alone.
    pub fn set_boost(&mut self, on: bool) -> Result<(), Error> {
        self.modify_register(|pa: PaConfig| PaConfig { pa_boost: on, ..pa })?;
        Ok(())
    }

    /// Selects the strongest LNA gain not above `db`, down to -48 dB.
    pub fn set_lna(&mut self, db: i32) -> Result<(), Error> {
        let gain = codec::lna_selector_from_db(db);
        self.modify_register(|lna: Lna| Lna { gain, ..lna })?;
        Ok(())
    }

    /// LNA gain in dB
    ///
    /// # Errors
    /// * `Error::InvalidRegister` - the gain field holds a reserved selector
    pub fn lna(&mut self) -> Result<i32, Error> {
        let lna = self.read_register::<Lna>()?;
        codec::db_from_lna_selector(lna.gain).ok_or(Error::InvalidRegister {
            address: <Lna as ReadableRegister>::readable_id(),
            value: lna.gain,
        })
    }

    /// Lets the AGC pick the LNA gain.
    pub fn set_lna_agc(&mut self, on: bool) -> Result<(), Error> {
        self.modify_register(|mc3: ModemConfig3| ModemConfig3 {
            agc_auto_on: on,
            ..mc3
        })?;
        Ok(())
    }

    /// Selects the narrowest bandwidth that is at least `hz`, up to 500 kHz.
    pub fn set_bandwidth(&mut self, hz: u32) -> Result<(), Error> {
        let bandwidth = codec::bandwidth_selector_from_hz(hz);
        self.modify_register(|mc1: ModemConfig1| ModemConfig1 { bandwidth, ..mc1 })?;
        Ok(())
    }

    /// Signal bandwidth in Hz
    ///
    /// # Errors
    /// * `Error::InvalidRegister` - the bandwidth field is above 9
    pub fn bandwidth(&mut self) -> Result<u32, Error> {
        let mc1 = self.read_register::<ModemConfig1>()?;
        codec::hz_from_bandwidth_selector(mc1.bandwidth).ok_or(Error::InvalidRegister {
            address: <ModemConfig1 as ReadableRegister>::readable_id(),
            value: mc1.bandwidth,
        })
    }

    /// Sets the spreading factor from a chip count per symbol.
    ///
    /// Counts that are not a power of two between 64 and 2048 select 4096.
    pub fn set_spreading_factor(&mut self, chips_per_symbol: u32) -> Result<(), Error> {
        let spreading_factor = codec::spreading_factor_bits(chips_per_symbol);
        self.modify_register(|mc2: ModemConfig2| ModemConfig2 {
            spreading_factor,
            ..mc2
        })?;
        Ok(())
    }

    /// Chips per symbol
    pub fn spreading_factor(&mut self) -> Result<u32, Error> {
        let mc2 = self.read_register::<ModemConfig2>()?;
        Ok(codec::chips_from_spreading_factor(mc2.spreading_factor))
    }

    /// Sets the coding rate from a nibble pair, `0x45` (4/5) to `0x48` (4/8).
    ///
    /// # Errors
    /// * `Error::InvalidArgument` - the denominator is not 5 to 8
    pub fn set_coding_rate(&mut self, cr: u8) -> Result<(), Error> {
        let coding_rate = codec::coding_rate_bits(cr).ok_or(Error::InvalidArgument)?;
        self.modify_register(|mc1: ModemConfig1| ModemConfig1 { coding_rate, ..mc1 })?;
        Ok(())
    }

    /// Coding rate as a nibble pair, `0x45` for 4/5
    pub fn coding_rate(&mut self) -> Result<u8, Error> {
        let mc1 = self.read_register::<ModemConfig1>()?;
        Ok(codec::coding_rate_from_bits(mc1.coding_rate))
    }

    /// Switches between implicit (`true`) and explicit header mode.
    pub fn set_implicit_header(&mut self, on: bool) -> Result<(), Error> {
        self.modify_register(|mc1: ModemConfig1| ModemConfig1 {
            implicit_header: on,
            ..mc1
        })?;
        Ok(())
    }

    /// Enables payload CRC generation and checking.
    pub fn set_crc(&mut self, on: bool) -> Result<(), Error> {
        self.modify_register(|mc2: ModemConfig2| ModemConfig2 {
            rx_crc_on: on,
            ..mc2
        })?;
        Ok(())
    }

    /// Sets the single-receive timeout in symbols, clamped to 1..=1023.
    pub fn set_rx_symbol_timeout(&mut self, symbols: u16) -> Result<(), Error> {
        let symbols = symbols.clamp(1, codec::MAX_SYMBOL_TIMEOUT);

        self.modify_register(|mc2: ModemConfig2| ModemConfig2 {
            symb_timeout_msb: (symbols >> 8) as u8,
            ..mc2
        })?;
        self.write_register(SymbTimeoutLsb {
            value: symbols as u8,
        })
    }

    /// Single-receive timeout in symbols
    pub fn rx_symbol_timeout(&mut self) -> Result<u16, Error> {
        let msb = self.read_register::<ModemConfig2>()?.symb_timeout_msb;
        let lsb = self.read_register::<SymbTimeoutLsb>()?.value;
        Ok(u16::from(msb) << 8 | u16::from(lsb))
    }

    /// Sets the single-receive timeout in ms for the current bandwidth and
    /// spreading factor.
    pub fn set_rx_timeout(&mut self, ms: u32) -> Result<(), Error> {
        let bandwidth = self.bandwidth()?;
        let chips = self.spreading_factor()?;
        self.set_rx_symbol_timeout(codec::symbols_from_ms(ms, bandwidth, chips))
    }

    /// Single-receive timeout in ms
    pub fn rx_timeout(&mut self) -> Result<u32, Error> {
        let symbols = self.rx_symbol_timeout()?;
        let bandwidth = self.bandwidth()?;
        let chips = self.spreading_factor()?;
        Ok(codec::ms_from_symbols(symbols, bandwidth, chips))
    }

    /// Sets the programmed preamble length in symbols.
    pub fn set_preamble_length(&mut self, symbols: u16) -> Result<(), Error> {
        self.write_register(PreambleLength { value: symbols })
    }

    /// Programmed preamble length in symbols
    pub fn preamble_length(&mut self) -> Result<u16, Error> {
        Ok(self.read_register::<PreambleLength>()?.value)
    }

    /// Sets the length above which received packets are dropped.
    pub fn set_max_payload_length(&mut self, len: u8) -> Result<(), Error> {
        self.write_register(MaxPayloadLength { value: len })
    }

    /// SNR of the last packet in dB
    pub fn last_packet_snr(&mut self) -> Result<i32, Error> {
        Ok(codec::snr_db(self.read_register::<PktSnrValue>()?.value))
    }

    /// RSSI of the last packet in dBm
    pub fn last_packet_rssi(&mut self) -> Result<i32, Error> {
        let low_band = self.read_register::<OpMode>()?.low_frequency_mode;
        let raw = self.read_register::<PktRssiValue>()?.value;
        let snr = self.read_register::<PktSnrValue>()?.value;
        Ok(codec::packet_rssi_dbm(raw, snr, low_band))
    }

    /// Current RSSI in dBm
    pub fn rssi(&mut self) -> Result<i32, Error> {
        let low_band = self.read_register::<OpMode>()?.low_frequency_mode;
        let raw = self.read_register::<RssiValue>()?.value;
        Ok(codec::rssi_dbm(raw, low_band))
    }

    /// Silicon revision register
    pub fn version(&mut self) -> Result<Version, Error> {
        self.read_register()
    }
}
