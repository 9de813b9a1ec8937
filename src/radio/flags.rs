//! IRQ flag monitoring

use embedded_hal::spi::SpiDevice;

use crate::registers::{IrqFlags, IrqFlagsRegister};
use crate::{Device, Error};

impl<SPI> Device<SPI>
where
    SPI: SpiDevice,
{
    /// All currently raised IRQ flags
    pub fn flags(&mut self) -> Result<IrqFlags, Error> {
        Ok(self.read_register::<IrqFlagsRegister>()?.flags)
    }

    /// The subset of `mask` that is currently raised
    pub fn flag(&mut self, mask: IrqFlags) -> Result<IrqFlags, Error> {
        Ok(self.flags()? & mask)
    }

    /// Clears `mask` by writing back the current flags with `mask` set.
    ///
    /// The register is write-1-to-clear and every raised flag already reads
    /// as 1, so this clears all raised flags, not only `mask`.
    pub fn clear_flags(&mut self, mask: IrqFlags) -> Result<(), Error> {
        self.modify_register(|reg: IrqFlagsRegister| IrqFlagsRegister {
            flags: reg.flags | mask,
        })?;
        Ok(())
    }

    /// Clears every IRQ flag
    pub fn clear_all_flags(&mut self) -> Result<(), Error> {
        self.clear_flags(IrqFlags::all())
    }
}
