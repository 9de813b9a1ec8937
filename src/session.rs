//! Device session
//!
//! A [`Session`] owns one attached chip: its register bus, the delay used for
//! polling, the packet buffers and the lock that serialises every operation on
//! them. It is the blocking, application-facing surface of the driver.
//!
//! The radio idles in RX-Continuous. A write interrupts reception, transmits
//! and returns to RX-Continuous; a read waits for the next packet.
//!
//! # Example
//! ```no_run
//! use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
//! use embedded_hal::delay::DelayNs;
//! use embedded_hal::spi::SpiDevice;
//! use sx1278::{Config, Error, Session};
//!
//! fn beacon<SPI: SpiDevice, D: DelayNs>(spi: SPI, delay: D) -> Result<(), Error> {
//!     let radio = Session::<CriticalSectionRawMutex, _, _>::new(spi, delay, Config::default())?;
//!     radio.set_frequency(433_175_000)?;
//!     radio.set_power(17)?;
//!     radio.write(b"ping")?;
//!
//!     let mut buf = [0u8; 64];
//!     match radio.read(&mut buf) {
//!         Ok(len) => { /* handle &buf[..len] */ }
//!         Err(Error::NoData) => {}
//!         Err(e) => return Err(e),
//!     }
//!     Ok(())
//! }
//! ```

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::{Mutex, MutexGuard};
use embedded_hal::delay::DelayNs;
use embedded_hal::spi::SpiDevice;

use crate::config::{Config, MAX_BUFFER_LEN};
use crate::poll::PollBudget;
use crate::radio::State;
use crate::registers::{FifoAddrPtr, FifoRxBaseAddr, FifoTxBaseAddr, IrqFlags, Mode, Version};
use crate::{Device, Error};

/// Lowest output power accepted, in dBm
pub const MIN_POWER_DBM: i32 = -2;
/// Highest output power accepted, in dBm
pub const MAX_POWER_DBM: i32 = 17;
/// Lowest LNA gain accepted, in dB
pub const MIN_LNA_DB: i32 = -48;
/// Highest LNA gain accepted, in dB
pub const MAX_LNA_DB: i32 = 0;

/// TxDone checks granted on top of the payload and preamble length
const TX_POLL_SLACK: u32 = 3;

/// An attached SX127x in LoRa mode.
///
/// All methods take `&self` and serialise on an internal
/// [`embassy_sync::mutex::Mutex`], so a session can be shared between
/// contexts when `M` is a thread safe raw mutex such as
/// `CriticalSectionRawMutex`. Blocking methods spin until the lock is free;
/// [`ready_to_read`](Self::ready_to_read) and
/// [`ready_to_write`](Self::ready_to_write) never wait.
pub struct Session<M: RawMutex, SPI, D> {
    inner: Mutex<M, Inner<SPI, D>>,
}

struct Inner<SPI, D> {
    device: Device<SPI>,
    delay: D,
    config: Config,
    rx_buf: [u8; MAX_BUFFER_LEN],
    tx_buf: [u8; MAX_BUFFER_LEN],
}

impl<M, SPI, D> Session<M, SPI, D>
where
    M: RawMutex,
    SPI: SpiDevice,
    D: DelayNs,
{
    /// Attaches to the chip behind `spi`.
    ///
    /// Checks that a chip answers, switches it to LoRa mode with an explicit
    /// header, resets the receive FIFO, clears all IRQ flags and starts
    /// continuous reception.
    ///
    /// # Errors
    /// * `Error::NoDevice` - the version register read back 0x00 or 0xFF
    /// * `Error::Bus` - SPI communication failed
    pub fn new(spi: SPI, delay: D, config: Config) -> Result<Self, Error> {
        let mut device = Device::new(spi);

        let version = device.version()?;
        if !version.is_present() {
            warn!("no SX127x found, version register reads {}", version.value);
            return Err(Error::NoDevice(version.value));
        }

        device.set_mode(Mode::Sleep)?;
        device.set_long_range_mode(true)?;
        device.set_mode(Mode::Standby)?;
        device.set_implicit_header(false)?;
        device.write_register(FifoRxBaseAddr {
            address: config.rx_base_address,
        })?;
        device.write_register(FifoAddrPtr {
            address: config.rx_base_address,
        })?;
        device.clear_all_flags()?;
        device.set_mode(Mode::RxContinuous)?;

        log_revision(version);

        Ok(Self {
            inner: Mutex::new(Inner {
                device,
                delay,
                config,
                rx_buf: [0; MAX_BUFFER_LEN],
                tx_buf: [0; MAX_BUFFER_LEN],
            }),
        })
    }

    fn lock(&self) -> MutexGuard<'_, M, Inner<SPI, D>> {
        loop {
            if let Ok(guard) = self.inner.try_lock() {
                return guard;
            }
            core::hint::spin_loop();
        }
    }

    /// Waits for a packet and copies it into `buf`.
    ///
    /// Returns the number of bytes copied, which is limited by `buf.len()` and
    /// the configured buffer length. IRQ flags are cleared on every return.
    ///
    /// # Errors
    /// * `Error::NoData` - nothing arrived within the receive window, or the
    ///   chip reported an RX timeout
    /// * `Error::BadMessage` - a packet arrived with a payload CRC error
    /// * `Error::Bus` - SPI communication failed
    pub fn read(&self, buf: &mut [u8]) -> Result<usize, Error> {
        self.lock().read(buf)
    }

    /// Transmits `data` and waits for the chip to report TxDone.
    ///
    /// At most the configured buffer length is sent. Returns the number of
    /// bytes transmitted, or 0 when TxDone never came. The radio is back in
    /// RX-Continuous afterwards.
    pub fn write(&self, data: &[u8]) -> Result<usize, Error> {
        self.lock().write(data)
    }

    /// Whether a received packet is waiting. Never blocks: a busy session
    /// reports `false`.
    pub fn ready_to_read(&self) -> Result<bool, Error> {
        match self.inner.try_lock() {
            Ok(mut inner) => Ok(!inner.device.flag(IrqFlags::RX_DONE)?.is_empty()),
            Err(_) => Ok(false),
        }
    }

    /// Whether no other operation is in progress
    pub fn ready_to_write(&self) -> bool {
        self.inner.try_lock().is_ok()
    }

    /// Forces the radio into `state`. [`State::Rx`] selects RX-Continuous.
    pub fn set_state(&self, state: State) -> Result<(), Error> {
        self.lock().device.set_mode(state.mode())
    }

    /// Current radio state
    pub fn state(&self) -> Result<State, Error> {
        Ok(self.lock().device.mode()?.into())
    }

    /// Sets the carrier frequency in Hz.
    pub fn set_frequency(&self, hz: u32) -> Result<(), Error> {
        let mut inner = self.lock();
        let xosc_hz = inner.config.xosc_hz;
        inner.device.set_frequency(hz, xosc_hz)
    }

    /// Carrier frequency in Hz
    pub fn frequency(&self) -> Result<u32, Error> {
        let mut inner = self.lock();
        let xosc_hz = inner.config.xosc_hz;
        inner.device.frequency(xosc_hz)
    }

    /// Sets the output power, clamped to -2..=17 dBm.
    pub fn set_power(&self, dbm: i32) -> Result<(), Error> {
        let dbm = dbm.clamp(MIN_POWER_DBM, MAX_POWER_DBM);
        self.lock().device.set_power(dbm)
    }

    /// Output power in dBm
    pub fn power(&self) -> Result<i32, Error> {
        self.lock().device.power()
    }

    /// Sets the LNA gain, clamped to -48..=0 dB.
    pub fn set_lna(&self, db: i32) -> Result<(), Error> {
        let db = db.clamp(MIN_LNA_DB, MAX_LNA_DB);
        self.lock().device.set_lna(db)
    }

    /// LNA gain in dB
    pub fn lna(&self) -> Result<i32, Error> {
        self.lock().device.lna()
    }

    /// Lets the AGC pick the LNA gain.
    pub fn set_lna_agc(&self, on: bool) -> Result<(), Error> {
        self.lock().device.set_lna_agc(on)
    }

    /// Sets the spreading factor from a chip count per symbol, 64 to 4096.
    pub fn set_spreading_factor(&self, chips_per_symbol: u32) -> Result<(), Error> {
        self.lock().device.set_spreading_factor(chips_per_symbol)
    }

    /// Chips per symbol
    pub fn spreading_factor(&self) -> Result<u32, Error> {
        self.lock().device.spreading_factor()
    }

    /// Sets the signal bandwidth, rounded up to the next supported value.
    pub fn set_bandwidth(&self, hz: u32) -> Result<(), Error> {
        self.lock().device.set_bandwidth(hz)
    }

    /// Signal bandwidth in Hz
    pub fn bandwidth(&self) -> Result<u32, Error> {
        self.lock().device.bandwidth()
    }

    /// Sets the coding rate from a nibble pair, `0x45` (4/5) to `0x48` (4/8).
    pub fn set_coding_rate(&self, cr: u8) -> Result<(), Error> {
        self.lock().device.set_coding_rate(cr)
    }

    /// Coding rate as a nibble pair
    pub fn coding_rate(&self) -> Result<u8, Error> {
        self.lock().device.coding_rate()
    }

    /// Sets the programmed preamble length in symbols.
    pub fn set_preamble_length(&self, symbols: u16) -> Result<(), Error> {
        self.lock().device.set_preamble_length(symbols)
    }

    /// Programmed preamble length in symbols
    pub fn preamble_length(&self) -> Result<u16, Error> {
        self.lock().device.preamble_length()
    }

    /// Sets the single-receive timeout in ms.
    pub fn set_rx_timeout(&self, ms: u32) -> Result<(), Error> {
        self.lock().device.set_rx_timeout(ms)
    }

    /// Single-receive timeout in ms
    pub fn rx_timeout(&self) -> Result<u32, Error> {
        self.lock().device.rx_timeout()
    }

    /// Enables payload CRC generation and checking.
    pub fn set_crc(&self, on: bool) -> Result<(), Error> {
        self.lock().device.set_crc(on)
    }

    /// Switches between implicit (`true`) and explicit header mode.
    pub fn set_implicit_header(&self, on: bool) -> Result<(), Error> {
        self.lock().device.set_implicit_header(on)
    }

    /// Sets the length above which received packets are dropped.
    pub fn set_max_payload_length(&self, len: u8) -> Result<(), Error> {
        self.lock().device.set_max_payload_length(len)
    }

    /// Current RSSI in dBm
    pub fn rssi(&self) -> Result<i32, Error> {
        self.lock().device.rssi()
    }

    /// RSSI of the last packet in dBm
    pub fn last_packet_rssi(&self) -> Result<i32, Error> {
        self.lock().device.last_packet_rssi()
    }

    /// SNR of the last packet in dB
    pub fn snr(&self) -> Result<i32, Error> {
        self.lock().device.last_packet_snr()
    }

    /// Silicon revision register
    pub fn version(&self) -> Result<Version, Error> {
        self.lock().device.version()
    }

    /// Puts the chip to sleep and hands back the bus and the delay.
    ///
    /// The SPI device is returned even if the sleep command fails.
    pub fn detach(self) -> (SPI, D) {
        let mut inner = self.inner.into_inner();
        if inner.device.set_mode(Mode::Sleep).is_err() {
            warn!("failed to put SX127x to sleep on detach");
        }
        (inner.device.release(), inner.delay)
    }
}

fn log_revision(version: Version) {
    info!(
        "SX127x revision {}.{} attached",
        version.full(),
        version.metal_mask()
    );
}

impl<SPI, D> Inner<SPI, D>
where
    SPI: SpiDevice,
    D: DelayNs,
{
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        let received = self.receive(buf);
        let cleared = self.device.clear_all_flags();
        let len = received?;
        cleared?;
        Ok(len)
    }

    fn receive(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        if self.device.mode()? != Mode::RxContinuous {
            self.device.set_mode(Mode::Standby)?;
            self.device.write_register(FifoRxBaseAddr {
                address: self.config.rx_base_address,
            })?;
            self.device.clear_all_flags()?;
            self.device.set_mode(Mode::RxContinuous)?;
        }

        let watched = IrqFlags::RX_TIMEOUT | IrqFlags::RX_DONE | IrqFlags::PAYLOAD_CRC_ERROR;
        let device = &mut self.device;
        let raised = self
            .config
            .rx_poll
            .run(&mut self.delay, || -> Result<_, Error> {
                let raised = device.flag(watched)?;
                Ok((!raised.is_empty()).then_some(raised))
            })?;

        let Some(raised) = raised else {
            debug!("rx window elapsed");
            return Err(Error::NoData);
        };
        // a CRC error wins over a simultaneous RX timeout
        if raised.contains(IrqFlags::PAYLOAD_CRC_ERROR) {
            warn!("payload CRC error");
            return Err(Error::BadMessage);
        }
        if raised.contains(IrqFlags::RX_TIMEOUT) {
            debug!("rx timeout");
            return Err(Error::NoData);
        }

        let len = self.config.buffer_len().min(buf.len());
        let received = self.device.read_packet(&mut self.rx_buf[..len])?;
        buf[..received].copy_from_slice(&self.rx_buf[..received]);

        trace!("received {} bytes", received);
        Ok(received)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, Error> {
        let sent = self.transmit(data);

        // back to listening whatever happened
        let standby = self.device.set_mode(Mode::Standby);
        let listening = standby.and_then(|()| self.device.set_mode(Mode::RxContinuous));

        let sent = sent?;
        listening?;
        Ok(sent)
    }

    fn transmit(&mut self, data: &[u8]) -> Result<usize, Error> {
        let len = data.len().min(self.config.buffer_len());
        self.tx_buf[..len].copy_from_slice(&data[..len]);

        self.device.set_mode(Mode::Standby)?;
        self.device.write_register(FifoTxBaseAddr {
            address: self.config.tx_base_address,
        })?;
        self.device.clear_flags(IrqFlags::TX_DONE)?;

        let queued = self.device.send_packet(&self.tx_buf[..len])?;
        if queued == 0 {
            return Ok(0);
        }

        let preamble = u32::from(self.device.preamble_length()?);
        let budget = PollBudget::attempts(
            queued as u32 + preamble + TX_POLL_SLACK,
            self.config.tx_poll_interval_ms,
        );

        self.device.set_mode(Mode::Tx)?;

        let device = &mut self.device;
        let done = budget.run(&mut self.delay, || -> Result<_, Error> {
            let done = device.flag(IrqFlags::TX_DONE)?;
            Ok((!done.is_empty()).then_some(()))
        })?;

        if done.is_none() {
            warn!("tx timeout after {} ms", budget.worst_case_ms());
            return Ok(0);
        }

        trace!("sent {} bytes", queued);
        Ok(queued)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{
        MockDelay, MockRadio, REG_FIFO_RX_BASE_ADDR, REG_IRQ_FLAGS, REG_OP_MODE,
        REG_PAYLOAD_LENGTH, REG_VERSION,
    };
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;

    type TestSession = Session<NoopRawMutex, MockRadio, MockDelay>;

    fn attach(radio: &MockRadio) -> TestSession {
        attach_with(radio, Config::default())
    }

    fn attach_with(radio: &MockRadio, config: Config) -> TestSession {
        match Session::new(radio.clone(), MockDelay::default(), config) {
            Ok(session) => session,
            Err(e) => panic!("attach failed: {e:?}"),
        }
    }

    fn elapsed_ms(session: &TestSession) -> u32 {
        session.lock().delay.elapsed_ms
    }

    #[test]
    fn startup_enters_lora_rx_continuous() {
        let radio = MockRadio::new();
        radio.set_reg(REG_FIFO_RX_BASE_ADDR, 0x40);
        radio.set_reg(0x1D, 0x73);
        radio.raise(0xFF);

        let session = attach(&radio);

        // LoRa, low frequency band kept, RX-Continuous
        assert_eq!(radio.reg(REG_OP_MODE), 0x8D);
        assert_eq!(radio.reg(REG_FIFO_RX_BASE_ADDR), 0x00);
        assert_eq!(radio.reg(0x1D), 0x72);
        assert_eq!(radio.reg(REG_IRQ_FLAGS), 0x00);
        assert_eq!(session.state().unwrap(), State::Rx);
        assert_eq!(session.version().unwrap().value, 0x12);
    }

    #[test]
    fn startup_rejects_missing_chip() {
        for value in [0x00, 0xFF] {
            let radio = MockRadio::new();
            radio.set_reg(REG_VERSION, value);

            let result = TestSession::new(radio.clone(), MockDelay::default(), Config::default());
            assert_eq!(result.err(), Some(Error::NoDevice(value)));
            assert!(radio.chip.borrow().writes.is_empty());
        }
    }

    #[test]
    fn startup_propagates_bus_errors() {
        let radio = MockRadio::new();
        radio.chip.borrow_mut().fail = true;

        let result = TestSession::new(radio, MockDelay::default(), Config::default());
        assert_eq!(result.err(), Some(Error::Bus));
    }

    #[test]
    fn read_times_out_after_full_window() {
        let radio = MockRadio::new();
        let session = attach(&radio);

        let mut buf = [0u8; 16];
        assert_eq!(session.read(&mut buf), Err(Error::NoData));
        assert_eq!(elapsed_ms(&session), 250 * 20);
        assert_eq!(session.lock().delay.calls, 250);
        assert_eq!(session.state().unwrap(), State::Rx);
    }

    #[test]
    fn read_reports_chip_rx_timeout() {
        let radio = MockRadio::new();
        let session = attach(&radio);
        radio.raise(IrqFlags::RX_TIMEOUT.bits());

        let mut buf = [0u8; 16];
        assert_eq!(session.read(&mut buf), Err(Error::NoData));
        assert_eq!(elapsed_ms(&session), 0);
        assert_eq!(radio.reg(REG_IRQ_FLAGS), 0);
    }

    #[test]
    fn read_rejects_crc_errors_and_clears_flags() {
        let radio = MockRadio::new();
        let session = attach(&radio);
        radio.raise(
            (IrqFlags::RX_DONE | IrqFlags::VALID_HEADER | IrqFlags::PAYLOAD_CRC_ERROR).bits(),
        );

        let mut buf = [0u8; 16];
        assert_eq!(session.read(&mut buf), Err(Error::BadMessage));
        assert_eq!(radio.reg(REG_IRQ_FLAGS), 0);
        assert!(!session.ready_to_read().unwrap());
    }

    #[test]
    fn crc_error_takes_precedence_over_rx_timeout() {
        let radio = MockRadio::new();
        let session = attach(&radio);
        radio.raise((IrqFlags::RX_TIMEOUT | IrqFlags::PAYLOAD_CRC_ERROR).bits());

        let mut buf = [0u8; 16];
        assert_eq!(session.read(&mut buf), Err(Error::BadMessage));
        assert_eq!(radio.reg(REG_IRQ_FLAGS), 0);
    }

    #[test]
    fn read_restarts_reception_from_standby() {
        let radio = MockRadio::new();
        let session = attach(&radio);
        session.set_state(State::Standby).unwrap();
        radio.set_reg(REG_FIFO_RX_BASE_ADDR, 0x20);

        let mut buf = [0u8; 16];
        assert_eq!(session.read(&mut buf), Err(Error::NoData));
        assert_eq!(radio.reg(REG_FIFO_RX_BASE_ADDR), 0x00);
        assert_eq!(session.state().unwrap(), State::Rx);
    }

    #[test]
    fn loopback() {
        let radio = MockRadio::new();
        radio.chip.borrow_mut().loopback = true;
        let session = attach(&radio);

        let payload: [u8; 10] = core::array::from_fn(|i| i as u8 + 1);
        assert_eq!(session.write(&payload).unwrap(), 10);
        assert_eq!(session.state().unwrap(), State::Rx);
        assert!(session.ready_to_read().unwrap());

        let mut buf = [0u8; 32];
        assert_eq!(session.read(&mut buf).unwrap(), 10);
        assert_eq!(buf[..10], payload);
        assert!(session.ready_to_write());
        assert!(!session.ready_to_read().unwrap());
        assert_eq!(elapsed_ms(&session), 0);
    }

    #[test]
    fn read_truncates_to_caller_buffer() {
        let radio = MockRadio::new();
        radio.chip.borrow_mut().loopback = true;
        let session = attach(&radio);
        session.write(b"0123456789").unwrap();

        let mut buf = [0u8; 4];
        assert_eq!(session.read(&mut buf).unwrap(), 4);
        assert_eq!(&buf, b"0123");
    }

    #[test]
    fn write_times_out_after_payload_and_preamble_polls() {
        let radio = MockRadio::new();
        radio.chip.borrow_mut().tx_completes = false;
        let session = attach(&radio);

        assert_eq!(session.write(&[0x55; 10]).unwrap(), 0);

        // 10 bytes + 8 preamble symbols + 3
        assert_eq!(radio.chip.borrow().irq_reads_in_tx, 21);
        assert_eq!(elapsed_ms(&session), 20 * 20);
        assert_eq!(session.state().unwrap(), State::Rx);
    }

    #[test]
    fn write_polls_scale_with_preamble() {
        let radio = MockRadio::new();
        radio.chip.borrow_mut().tx_completes = false;
        let session = attach(&radio);
        session.set_preamble_length(12).unwrap();

        assert_eq!(session.write(&[0x55; 5]).unwrap(), 0);
        assert_eq!(radio.chip.borrow().irq_reads_in_tx, 20);
    }

    #[test]
    fn write_is_capped_at_buffer_len() {
        let radio = MockRadio::new();
        let session = attach_with(&radio, Config::default().with_buffer_len(4));

        assert_eq!(session.write(b"0123456789").unwrap(), 4);
        assert_eq!(radio.reg(REG_PAYLOAD_LENGTH), 4);
        assert_eq!(&radio.chip.borrow().fifo[0x80..0x84], b"0123");
    }

    #[test]
    fn empty_write_does_not_transmit() {
        let radio = MockRadio::new();
        let session = attach(&radio);

        assert_eq!(session.write(&[]).unwrap(), 0);
        let entered_tx = radio
            .chip
            .borrow()
            .writes
            .iter()
            .any(|(address, data)| usize::from(*address) == REG_OP_MODE && data[0] & 0x07 == 0x03);
        assert!(!entered_tx);
        assert_eq!(session.state().unwrap(), State::Rx);
    }

    #[test]
    fn bus_errors_propagate() {
        let radio = MockRadio::new();
        let session = attach(&radio);
        radio.chip.borrow_mut().fail = true;

        let mut buf = [0u8; 4];
        assert_eq!(session.read(&mut buf), Err(Error::Bus));
        assert_eq!(session.write(b"x"), Err(Error::Bus));
        assert_eq!(session.ready_to_read(), Err(Error::Bus));
    }

    #[test]
    fn power_and_lna_are_clamped() {
        let radio = MockRadio::new();
        let session = attach(&radio);

        session.set_power(20).unwrap();
        assert_eq!(session.power().unwrap(), 17);
        session.set_power(-10).unwrap();
        assert_eq!(session.power().unwrap(), -2);

        session.set_lna(6).unwrap();
        assert_eq!(session.lna().unwrap(), 0);
        session.set_lna(-100).unwrap();
        assert_eq!(session.lna().unwrap(), -48);
    }

    #[test]
    fn radio_parameters() {
        let radio = MockRadio::new();
        let session = attach(&radio);

        session.set_frequency(433_175_000).unwrap();
        let hz = session.frequency().unwrap();
        assert!(433_175_000 - hz <= 62);

        session.set_bandwidth(9_000).unwrap();
        assert_eq!(session.bandwidth().unwrap(), 10_400);
        session.set_spreading_factor(512).unwrap();
        assert_eq!(session.spreading_factor().unwrap(), 512);
        session.set_coding_rate(0x47).unwrap();
        assert_eq!(session.coding_rate().unwrap(), 0x47);
        assert_eq!(session.set_coding_rate(0x42), Err(Error::InvalidArgument));
    }

    #[test]
    fn frequency_uses_configured_crystal() {
        let radio = MockRadio::new();
        let session = attach_with(&radio, Config::default().with_xosc_hz(26_000_000));

        session.set_frequency(434_000_000).unwrap();
        let chip = radio.chip.borrow();
        let frf = u32::from_be_bytes([0, chip.regs[0x06], chip.regs[0x07], chip.regs[0x08]]);
        assert_eq!(frf, crate::codec::frf_from_hz(434_000_000, 26_000_000));
    }

    #[test]
    fn state_mapping() {
        let radio = MockRadio::new();
        let session = attach(&radio);

        session.set_state(State::Sleep).unwrap();
        assert_eq!(radio.reg(REG_OP_MODE), 0x88);
        assert_eq!(session.state().unwrap(), State::Sleep);

        radio.set_reg(REG_OP_MODE, 0x8C);
        assert_eq!(session.state().unwrap(), State::Rx);
        radio.set_reg(REG_OP_MODE, 0x8A);
        assert_eq!(session.state().unwrap(), State::Tx);
    }

    #[test]
    fn readiness_reflects_lock() {
        let radio = MockRadio::new();
        let session = attach(&radio);
        radio.raise(IrqFlags::RX_DONE.bits());

        {
            let Ok(_guard) = session.inner.try_lock() else {
                panic!("session unexpectedly locked");
            };
            assert!(!session.ready_to_write());
            assert!(!session.ready_to_read().unwrap());
        }

        assert!(session.ready_to_write());
        assert!(session.ready_to_read().unwrap());
    }

    #[test]
    fn detach_sleeps_and_returns_bus() {
        let radio = MockRadio::new();
        let session = attach(&radio);

        let (spi, delay) = session.detach();
        assert_eq!(spi.reg(REG_OP_MODE), 0x88);
        assert_eq!(delay.elapsed_ms, 0);
    }
}
