//! Session configuration

use crate::codec::DEFAULT_XOSC_HZ;
use crate::poll::PollBudget;

/// Largest packet buffer a session holds, one full FIFO
pub const MAX_BUFFER_LEN: usize = 256;

/// Board and timing parameters of a [`Session`](crate::Session).
///
/// The defaults describe an SX1278 module with a 32 MHz crystal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Crystal oscillator frequency in Hz
    pub xosc_hz: u32,
    /// Size of the session's RX and TX buffers, at most [`MAX_BUFFER_LEN`]
    pub buffer_len: usize,
    /// How long a read waits for a packet
    pub rx_poll: PollBudget,
    /// Delay between TxDone checks in ms
    pub tx_poll_interval_ms: u32,
    /// FIFO offset packets are queued at
    pub tx_base_address: u8,
    /// FIFO offset packets are received at
    pub rx_base_address: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            xosc_hz: DEFAULT_XOSC_HZ,
            buffer_len: MAX_BUFFER_LEN,
            rx_poll: PollBudget::window(250, 20), // 5 s
            tx_poll_interval_ms: 20,
            tx_base_address: 0x80,
            rx_base_address: 0x00,
        }
    }
}

impl Config {
    /// Crystal oscillator frequency in Hz
    pub fn with_xosc_hz(mut self, hz: u32) -> Self {
        self.xosc_hz = hz;
        self
    }

    /// Buffer size, capped at [`MAX_BUFFER_LEN`]
    pub fn with_buffer_len(mut self, len: usize) -> Self {
        self.buffer_len = len.min(MAX_BUFFER_LEN);
        self
    }

    /// Receive window
    pub fn with_rx_poll(mut self, budget: PollBudget) -> Self {
        self.rx_poll = budget;
        self
    }

    /// Delay between TxDone checks in ms
    pub fn with_tx_poll_interval_ms(mut self, ms: u32) -> Self {
        self.tx_poll_interval_ms = ms;
        self
    }

    /// FIFO offset packets are queued at
    pub fn with_tx_base_address(mut self, address: u8) -> Self {
        self.tx_base_address = address;
        self
    }

    /// FIFO offset packets are received at
    pub fn with_rx_base_address(mut self, address: u8) -> Self {
        self.rx_base_address = address;
        self
    }

    /// Effective buffer size
    pub(crate) fn buffer_len(&self) -> usize {
        self.buffer_len.min(MAX_BUFFER_LEN)
    }
}
