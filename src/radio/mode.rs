//! Operating mode control

use embedded_hal::spi::SpiDevice;

use crate::registers::{Mode, OpMode};
use crate::{Device, Error};

/// Coarse radio state as reported to applications
///
/// The frequency synthesis and single/continuous receive variants of the
/// chip are folded into [`State::Tx`] and [`State::Rx`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Sleep
    Sleep,
    /// Standby
    Standby,
    /// Synthesizing or transmitting
    Tx,
    /// Synthesizing or receiving
    Rx,
    /// Channel activity detection
    Cad,
}

impl State {
    /// Mode entered when this state is requested
    pub fn mode(self) -> Mode {
        match self {
            Self::Sleep => Mode::Sleep,
            Self::Standby => Mode::Standby,
            Self::Tx => Mode::Tx,
            Self::Rx => Mode::RxContinuous,
            Self::Cad => Mode::Cad,
        }
    }
}

impl From<Mode> for State {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Sleep => Self::Sleep,
            Mode::Standby => Self::Standby,
            Mode::FsTx | Mode::Tx => Self::Tx,
            Mode::FsRx | Mode::RxContinuous | Mode::RxSingle => Self::Rx,
            Mode::Cad => Self::Cad,
        }
    }
}

impl<SPI> Device<SPI>
where
    SPI: SpiDevice,
{
    /// Reads the whole operating mode register
    pub fn mode_register(&mut self) -> Result<OpMode, Error> {
        self.read_register()
    }

    /// Current operating mode
    pub fn mode(&mut self) -> Result<Mode, Error> {
        Ok(self.mode_register()?.mode)
    }

    /// Switches the operating mode, leaving the modem selection and band bits alone.
    pub fn set_mode(&mut self, mode: Mode) -> Result<(), Error> {
        self.modify_register(|op: OpMode| OpMode { mode, ..op })?;
        trace!("mode -> {:?}", mode);
        Ok(())
    }

    /// Selects the LoRa (`true`) or FSK/OOK (`false`) modem.
    ///
    /// The chip only accepts this change in [`Mode::Sleep`].
    pub fn set_long_range_mode(&mut self, on: bool) -> Result<(), Error> {
        self.modify_register(|op: OpMode| OpMode {
            long_range_mode: on,
            ..op
        })?;
        Ok(())
    }
}
