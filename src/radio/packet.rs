//! Packet payload transfer through the FIFO

use embedded_hal::spi::SpiDevice;

use crate::registers::{FifoAddrPtr, FifoRxCurrentAddr, FifoTxBaseAddr, PayloadLength, RxNbBytes};
use crate::{Device, Error};

/// Largest payload a single packet can carry
pub const MAX_PAYLOAD_LEN: usize = 0xFF;

impl<SPI> Device<SPI>
where
    SPI: SpiDevice,
{
    /// Reads the last received packet into `buf`.
    ///
    /// Points the FIFO at the start of the last packet and reads
    /// `min(RxNbBytes, buf.len())` bytes. Returns the number of bytes read.
    pub fn read_packet(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        let start = self.read_register::<FifoRxCurrentAddr>()?;
        self.write_register(FifoAddrPtr {
            address: start.address,
        })?;

        let received = self.read_register::<RxNbBytes>()?;
        let len = usize::from(received.count).min(buf.len());

        self.read_fifo(&mut buf[..len])
    }

    /// Queues `payload` for transmission.
    ///
    /// Writes at most [`MAX_PAYLOAD_LEN`] bytes from the TX base address on and
    /// sets the payload length to the number of bytes written, which is
    /// returned.
    pub fn send_packet(&mut self, payload: &[u8]) -> Result<usize, Error> {
        let base = self.read_register::<FifoTxBaseAddr>()?;
        self.write_register(FifoAddrPtr {
            address: base.address,
        })?;

        let len = payload.len().min(MAX_PAYLOAD_LEN);
        let written = self.write_fifo(&payload[..len])?;

        self.write_register(PayloadLength {
            value: written as u8,
        })?;

        Ok(written)
    }
}
