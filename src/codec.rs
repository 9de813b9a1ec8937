//! Unit conversions between radio parameters and register fields
//!
//! Everything in here is pure: no bus access, no state. The register-touching
//! setters and getters built on top live in [`radio`](crate::radio).
//!
//! The discrete settings (LNA gain, bandwidth) are static ordered tables with
//! an explicit search policy, [`first_at_most`] and [`first_at_least`], so the
//! rounding rule of each setting can be read and tested on its own.

use crate::registers::PaConfig;

/// Default crystal oscillator frequency in Hz
pub const DEFAULT_XOSC_HZ: u32 = 32_000_000;

const FRF_SCALE: u64 = 1 << 19;

/// LNA gain in dB per selector, G1 (selector 1) first
pub const LNA_GAINS_DB: [i32; 6] = [0, -6, -12, -24, -26, -48];

/// LoRa signal bandwidths in Hz per selector, ascending
pub const BANDWIDTHS_HZ: [u32; 10] = [
    7_800, 10_400, 15_600, 20_800, 31_250, 41_700, 62_500, 125_000, 250_000, 500_000,
];

/// Smallest spreading factor tried by [`spreading_factor_bits`]
pub const MIN_SPREADING_FACTOR: u8 = 6;
/// Spreading factor used when no exact match exists
pub const MAX_SPREADING_FACTOR: u8 = 12;

/// Longest RX timeout the 10-bit symbol counter can hold
pub const MAX_SYMBOL_TIMEOUT: u16 = 0x3FF;

/// Index of the first table entry that is `<= value`.
///
/// Meant for tables ordered from the largest value down. Saturates to the
/// last index when nothing matches.
pub fn first_at_most<T: PartialOrd + Copy>(table: &[T], value: T) -> usize {
    table
        .iter()
        .position(|&entry| entry <= value)
        .unwrap_or(table.len().saturating_sub(1))
}

/// Index of the first table entry that is `>= value`.
///
/// Meant for tables ordered from the smallest value up. Saturates to the
/// last index when nothing matches.
pub fn first_at_least<T: PartialOrd + Copy>(table: &[T], value: T) -> usize {
    table
        .iter()
        .position(|&entry| entry >= value)
        .unwrap_or(table.len().saturating_sub(1))
}

/// Frequency word for `hz`: floor(hz * 2^19 / xosc)
pub fn frf_from_hz(hz: u32, xosc_hz: u32) -> u32 {
    (u64::from(hz) * FRF_SCALE / u64::from(xosc_hz.max(1))) as u32
}

/// Carrier frequency in Hz for a frequency word
pub fn hz_from_frf(frf: u32, xosc_hz: u32) -> u32 {
    (u64::from(frf) * u64::from(xosc_hz) / FRF_SCALE) as u32
}

/// Frequency resolution in Hz, rounded up
pub fn frequency_step_hz(xosc_hz: u32) -> u32 {
    (u64::from(xosc_hz).div_ceil(FRF_SCALE)) as u32
}

/// PA configuration for an output power in dBm.
///
/// - above 15 dBm: PA_BOOST, OutputPower = dbm - 2
/// - below 0 dBm: RFO with MaxPower 2, OutputPower = dbm + 3
/// - otherwise: RFO with MaxPower 7, OutputPower = dbm
///
/// Does not clamp. Values outside -3..=17 do not fit the 4-bit field and are
/// truncated by the register codec.
pub fn pa_config_from_dbm(dbm: i32) -> PaConfig {
    let (pa_boost, max_power, output_power) = if dbm > 15 {
        (true, 7, dbm - 2)
    } else if dbm < 0 {
        (false, 2, dbm + 3)
    } else {
        (false, 7, dbm)
    };

    PaConfig {
        pa_boost,
        max_power,
        output_power: output_power as u8,
    }
}

/// Output power in dBm for a PA configuration.
///
/// The RFO branch works in tenths of dB: Pmax = 108 + 6 * MaxPower, then
/// Pout = (Pmax - (150 - OutputPower * 10)) / 10 with truncating division.
pub fn dbm_from_pa_config(pa: PaConfig) -> i32 {
    let output_power = i32::from(pa.output_power);

    if pa.pa_boost {
        2 + output_power
    } else {
        let pmax_tenths = 108 + 6 * i32::from(pa.max_power);
        (pmax_tenths - (150 - output_power * 10)) / 10
    }
}

/// LNA gain selector (1-6) for a gain in dB, picking the strongest gain that
/// does not exceed `db`.
pub fn lna_selector_from_db(db: i32) -> u8 {
    first_at_most(&LNA_GAINS_DB, db) as u8 + 1
}

/// LNA gain in dB for a selector, `None` for the reserved selectors 0 and 7
pub fn db_from_lna_selector(selector: u8) -> Option<i32> {
    let index = usize::from(selector).checked_sub(1)?;
    LNA_GAINS_DB.get(index).copied()
}

/// Bandwidth selector for `hz`, rounding up to the next supported bandwidth
pub fn bandwidth_selector_from_hz(hz: u32) -> u8 {
    first_at_least(&BANDWIDTHS_HZ, hz) as u8
}

/// Bandwidth in Hz for a selector, `None` above 500 kHz (selectors 10-15)
pub fn hz_from_bandwidth_selector(selector: u8) -> Option<u32> {
    BANDWIDTHS_HZ.get(usize::from(selector)).copied()
}

/// Spreading factor field for a number of chips per symbol.
///
/// Looks for an exact power of two from 2^6 to 2^11. Anything else,
/// including 4096 itself, ends up at 12.
pub fn spreading_factor_bits(chips_per_symbol: u32) -> u8 {
    (MIN_SPREADING_FACTOR..MAX_SPREADING_FACTOR)
        .find(|&sf| chips_per_symbol == 1 << sf)
        .unwrap_or(MAX_SPREADING_FACTOR)
}

/// Chips per symbol for a spreading factor field
pub fn chips_from_spreading_factor(bits: u8) -> u32 {
    1 << (bits & 0x0F)
}

/// Coding rate field for a nibble pair such as `0x45` (4/5).
///
/// Only the denominator nibble is looked at; it must be 5 to 8.
pub fn coding_rate_bits(cr: u8) -> Option<u8> {
    match cr & 0x0F {
        denominator @ 5..=8 => Some(denominator - 4),
        _ => None,
    }
}

/// Nibble pair for a coding rate field: `0x40 + field + 4`
pub fn coding_rate_from_bits(bits: u8) -> u8 {
    0x40 + (bits & 0x07) + 4
}

/// RX timeout in symbols: ms * bw / (chips * 1000), clamped to 1..=1023
pub fn symbols_from_ms(ms: u32, bandwidth_hz: u32, chips_per_symbol: u32) -> u16 {
    let symbols =
        u64::from(ms) * u64::from(bandwidth_hz) / (u64::from(chips_per_symbol.max(1)) * 1000);
    symbols.clamp(1, u64::from(MAX_SYMBOL_TIMEOUT)) as u16
}

/// RX timeout in ms: 1000 * symbols * chips / bw
pub fn ms_from_symbols(symbols: u16, bandwidth_hz: u32, chips_per_symbol: u32) -> u32 {
    (1000 * u64::from(symbols) * u64::from(chips_per_symbol) / u64::from(bandwidth_hz.max(1)))
        as u32
}

/// Last-packet SNR in dB: register / 4, truncating toward zero
pub fn snr_db(raw: i8) -> i32 {
    i32::from(raw) / 4
}

/// RSSI offset in dBm for the selected frequency band
pub fn rssi_offset(low_frequency_mode: bool) -> i32 {
    if low_frequency_mode {
        -164
    } else {
        -157
    }
}

/// Current RSSI in dBm
pub fn rssi_dbm(raw: u8, low_frequency_mode: bool) -> i32 {
    rssi_offset(low_frequency_mode) + i32::from(raw)
}

/// Last-packet RSSI in dBm, corrected by SNR / 4 when the SNR is negative
pub fn packet_rssi_dbm(raw: u8, snr_raw: i8, low_frequency_mode: bool) -> i32 {
    let dbm = rssi_dbm(raw, low_frequency_mode);
    if snr_raw < 0 {
        dbm + snr_db(snr_raw)
    } else {
        dbm
    }
}
