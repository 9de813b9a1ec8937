//! SX127x register bus
//!
//! This module provides the lowest layer of the driver: single register-bus
//! transactions with the chip over SPI. Both synchronous and asynchronous
//! operations are supported.
//!
//! Every transaction is one SPI transaction made of an address byte followed by
//! the data bytes. Bit 7 of the address selects the direction (0 = read,
//! 1 = write) and the chip auto-increments the address for bursts, except on
//! the [`FIFO`] register where it advances the FIFO pointer instead.
//!
//! The interface is built around the `Device<SPI>` struct which wraps an SPI
//! interface and provides methods for:
//! - Reading, writing and read-modify-writing typed registers
//! - Burst reads and writes of the FIFO
//!
//! # Example
//! ```no_run
//! use embedded_hal::spi::SpiDevice;
//! use sx1278::{Device, Error, OpMode};
//!
//! fn lora_selected<SPI: SpiDevice>(spi: SPI) -> Result<bool, Error> {
//!     let mut device = Device::new(spi);
//!     let op: OpMode = device.read_register()?;
//!     Ok(op.long_range_mode)
//! }
//! ```

use core::convert::Infallible;

use embedded_hal::spi::Operation;
use regiface::{ByteArray, ReadableRegister, ToByteArray, WritableRegister};

use crate::registers::FIFO;
use crate::Error;

const WRITE_BIT: u8 = 0x80;

/// Main register-bus interface for the SX127x radio.
///
/// This struct wraps an SPI interface and provides methods to interact with the radio.
/// It supports both synchronous operations through the embedded-hal traits and
/// asynchronous operations through embedded-hal-async.
pub struct Device<SPI> {
    spi: SPI,
}

impl<SPI> Device<SPI> {
    /// Creates a new Device instance wrapping the provided SPI interface.
    ///
    /// # Arguments
    /// * `spi` - An SPI interface implementing the required embedded-hal traits
    pub fn new(spi: SPI) -> Self {
        Self { spi }
    }

    /// Releases the underlying SPI device.
    ///
    /// This method consumes the Device instance and returns the wrapped SPI interface.
    pub fn release(self) -> SPI {
        self.spi
    }
}

fn encode<R>(register: R) -> R::Array
where
    R: ToByteArray<Error = Infallible>,
{
    match register.to_bytes() {
        Ok(raw) => raw,
        Err(never) => match never {},
    }
}

impl<SPI> Device<SPI>
where
    SPI: embedded_hal::spi::SpiDevice,
{
    /// Reads `buf.len()` bytes starting at `address`.
    ///
    /// Returns the number of data bytes transferred, the address byte excluded.
    ///
    /// # Errors
    /// * `Error::Bus` - SPI communication failed
    pub fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<usize, Error> {
        let len = buf.len();

        self.spi
            .transaction(&mut [
                Operation::Write(&[address & !WRITE_BIT]),
                Operation::Read(buf),
            ])
            .map_err(|_| Error::Bus)?;

        Ok(len)
    }

    /// Writes `bytes` starting at `address`.
    ///
    /// Returns the number of data bytes transferred, the address byte excluded.
    ///
    /// # Errors
    /// * `Error::Bus` - SPI communication failed
    pub fn write(&mut self, address: u8, bytes: &[u8]) -> Result<usize, Error> {
        self.spi
            .transaction(&mut [
                Operation::Write(&[address | WRITE_BIT]),
                Operation::Write(bytes),
            ])
            .map_err(|_| Error::Bus)?;

        Ok(bytes.len())
    }

    /// Reads a register value from the device.
    ///
    /// # Type Parameters
    /// * `R` - Register type implementing ReadableRegister with u8 ID
    ///
    /// # Errors
    /// * `Error::Bus` - SPI communication failed
    pub fn read_register<R>(&mut self) -> Result<R, Error>
    where
        R: ReadableRegister<IdType = u8, Error = Infallible>,
    {
        let mut raw_value = R::Array::new();
        self.read(R::id(), raw_value.as_mut())?;

        match R::from_bytes(raw_value) {
            Ok(register) => Ok(register),
            Err(never) => match never {},
        }
    }

    /// Writes a value to a device register.
    ///
    /// Only use this directly on registers that are wholly owned by a single
    /// setting. Shared registers go through [`modify_register`](Self::modify_register).
    ///
    /// # Errors
    /// * `Error::Bus` - SPI communication failed
    pub fn write_register<R>(&mut self, register: R) -> Result<(), Error>
    where
        R: WritableRegister<IdType = u8, Error = Infallible>,
    {
        let raw_value = encode(register);
        self.write(R::id(), raw_value.as_ref())?;
        Ok(())
    }

    /// Read-modify-write of a register.
    ///
    /// Reads the current value, hands it to `f` and writes back whatever `f`
    /// returns. Bits the register type does not model survive untouched.
    /// Returns the value that was written.
    ///
    /// # Errors
    /// * `Error::Bus` - SPI communication failed
    pub fn modify_register<R, F>(&mut self, f: F) -> Result<R, Error>
    where
        R: ReadableRegister<IdType = u8, Error = Infallible>
            + WritableRegister<IdType = u8, Error = Infallible>
            + Copy,
        F: FnOnce(R) -> R,
    {
        let current = self.read_register::<R>()?;
        let updated = f(current);
        self.write_register(updated)?;
        Ok(updated)
    }

    /// Burst-reads from the FIFO at the current FIFO address pointer.
    ///
    /// # Errors
    /// * `Error::Bus` - SPI communication failed
    pub fn read_fifo(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        self.read(FIFO, buf)
    }

    /// Burst-writes to the FIFO at the current FIFO address pointer.
    ///
    /// # Errors
    /// * `Error::Bus` - SPI communication failed
    pub fn write_fifo(&mut self, bytes: &[u8]) -> Result<usize, Error> {
        self.write(FIFO, bytes)
    }
}

impl<SPI> Device<SPI>
where
    SPI: embedded_hal_async::spi::SpiDevice,
{
    /// Asynchronously reads `buf.len()` bytes starting at `address`.
    ///
    /// This is the async version of [`read`](Device::read).
    pub async fn read_async(&mut self, address: u8, buf: &mut [u8]) -> Result<usize, Error> {
        let len = buf.len();

        self.spi
            .transaction(&mut [
                embedded_hal_async::spi::Operation::Write(&[address & !WRITE_BIT]),
                embedded_hal_async::spi::Operation::Read(buf),
            ])
            .await
            .map_err(|_| Error::Bus)?;

        Ok(len)
    }

    /// Asynchronously writes `bytes` starting at `address`.
    ///
    /// This is the async version of [`write`](Device::write).
    pub async fn write_async(&mut self, address: u8, bytes: &[u8]) -> Result<usize, Error> {
        self.spi
            .transaction(&mut [
                embedded_hal_async::spi::Operation::Write(&[address | WRITE_BIT]),
                embedded_hal_async::spi::Operation::Write(bytes),
            ])
            .await
            .map_err(|_| Error::Bus)?;

        Ok(bytes.len())
    }

    /// Asynchronously reads a register value from the device.
    ///
    /// This is the async version of [`read_register`](Device::read_register).
    pub async fn read_register_async<R>(&mut self) -> Result<R, Error>
    where
        R: ReadableRegister<IdType = u8, Error = Infallible>,
    {
        let mut raw_value = R::Array::new();
        self.read_async(R::id(), raw_value.as_mut()).await?;

        match R::from_bytes(raw_value) {
            Ok(register) => Ok(register),
            Err(never) => match never {},
        }
    }

    /// Asynchronously writes a value to a device register.
    ///
    /// This is the async version of [`write_register`](Device::write_register).
    pub async fn write_register_async<R>(&mut self, register: R) -> Result<(), Error>
    where
        R: WritableRegister<IdType = u8, Error = Infallible>,
    {
        let raw_value = encode(register);
        self.write_async(R::id(), raw_value.as_ref()).await?;
        Ok(())
    }

    /// Asynchronous read-modify-write of a register.
    ///
    /// This is the async version of [`modify_register`](Device::modify_register).
    pub async fn modify_register_async<R, F>(&mut self, f: F) -> Result<R, Error>
    where
        R: ReadableRegister<IdType = u8, Error = Infallible>
            + WritableRegister<IdType = u8, Error = Infallible>
            + Copy,
        F: FnOnce(R) -> R,
    {
        let current = self.read_register_async::<R>().await?;
        let updated = f(current);
        self.write_register_async(updated).await?;
        Ok(updated)
    }

    /// Asynchronously burst-reads from the FIFO.
    ///
    /// This is the async version of [`read_fifo`](Device::read_fifo).
    pub async fn read_fifo_async(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        self.read_async(FIFO, buf).await
    }

    /// Asynchronously burst-writes to the FIFO.
    ///
    /// This is the async version of [`write_fifo`](Device::write_fifo).
    pub async fn write_fifo_async(&mut self, bytes: &[u8]) -> Result<usize, Error> {
        self.write_async(FIFO, bytes).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockRadio, REG_OP_MODE};
    use crate::registers::{Frf, Lna, OpMode, PreambleLength, Version};
    use embassy_futures::block_on;

    #[test]
    fn write_sets_address_bit() {
        let radio = MockRadio::new();
        let mut device = Device::new(radio.clone());

        device.write(0x80 | 0x0C, &[0x43]).unwrap();
        assert_eq!(radio.reg(0x0C), 0x43);
        assert_eq!(radio.chip.borrow().writes[0], (0x0C, std::vec![0x43]));
    }

    #[test]
    fn multi_byte_registers_burst() {
        let radio = MockRadio::new();
        let mut device = Device::new(radio.clone());

        device.write_register(Frf { value: 0xE4C026 }).unwrap();
        device.write_register(PreambleLength { value: 0x1234 }).unwrap();

        let chip = radio.chip.borrow();
        assert_eq!(&chip.regs[0x06..0x09], &[0xE4, 0xC0, 0x26]);
        assert_eq!(&chip.regs[0x20..0x22], &[0x12, 0x34]);
        assert_eq!(chip.writes.len(), 2);
    }

    #[test]
    fn modify_register_keeps_other_fields() {
        let radio = MockRadio::new();
        radio.set_reg(0x0C, 0x23);
        let mut device = Device::new(radio.clone());

        let written = device.modify_register(|lna: Lna| Lna { gain: 6, ..lna }).unwrap();
        assert_eq!(written.boost, 0x03);
        assert_eq!(radio.reg(0x0C), 0xC3);
    }

    #[test]
    fn fifo_bursts_follow_pointer() {
        let radio = MockRadio::new();
        let mut device = Device::new(radio.clone());

        assert_eq!(device.write_fifo(&[1, 2, 3]).unwrap(), 3);
        radio.set_reg(0x0D, 0x00);

        let mut buf = [0u8; 3];
        assert_eq!(device.read_fifo(&mut buf).unwrap(), 3);
        assert_eq!(buf, [1, 2, 3]);
    }

    #[test]
    fn bus_failure() {
        let radio = MockRadio::new();
        radio.chip.borrow_mut().fail = true;
        let mut device = Device::new(radio);

        assert_eq!(device.read_register::<Version>(), Err(Error::Bus));
        assert_eq!(device.write_register(Frf { value: 0 }), Err(Error::Bus));
    }

    #[test]
    fn async_register_access() {
        let radio = MockRadio::new();
        let mut device = Device::new(radio.clone());

        block_on(async {
            let version: Version = device.read_register_async().await.unwrap();
            assert_eq!(version.value, 0x12);

            device
                .modify_register_async(|op: OpMode| OpMode {
                    long_range_mode: true,
                    ..op
                })
                .await
                .unwrap();

            device.write_fifo_async(b"abc").await.unwrap();
        });

        assert_eq!(radio.reg(REG_OP_MODE), 0x89);
        assert_eq!(&radio.chip.borrow().fifo[..3], b"abc");
    }
}
