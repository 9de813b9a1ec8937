//! Fixed-capacity table of attached devices
//!
//! Applications that drive several radios keep their sessions in a
//! [`Registry`] and refer to them by [`DeviceId`]. Ids are handed out lowest
//! free slot first and are reused once a device is detached.

use crate::Error;

/// Default number of slots, one per possible chip select on a typical board
pub const DEFAULT_CAPACITY: usize = 8;

/// Handle of a device in a [`Registry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceId(u8);

impl DeviceId {
    /// Slot number
    pub fn index(self) -> usize {
        usize::from(self.0)
    }
}

/// Up to `N` devices of type `S`, usually [`Session`](crate::Session)s.
pub struct Registry<S, const N: usize = DEFAULT_CAPACITY> {
    slots: [Option<S>; N],
}

impl<S, const N: usize> Default for Registry<S, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, const N: usize> Registry<S, N> {
    /// Empty registry
    ///
    /// `N` must not exceed 256.
    pub fn new() -> Self {
        Self {
            slots: core::array::from_fn(|_| None),
        }
    }

    /// Stores `device` in the lowest free slot.
    ///
    /// # Errors
    /// * `Error::RegistryFull` - every slot is taken, `device` is dropped
    pub fn attach(&mut self, device: S) -> Result<DeviceId, Error> {
        let (index, slot) = self
            .slots
            .iter_mut()
            .enumerate()
            .take(usize::from(u8::MAX) + 1)
            .find(|(_, slot)| slot.is_none())
            .ok_or(Error::RegistryFull)?;

        *slot = Some(device);
        debug!("device attached as {}", index);
        Ok(DeviceId(index as u8))
    }

    /// Removes a device, freeing its id.
    pub fn detach(&mut self, id: DeviceId) -> Option<S> {
        let device = self.slots.get_mut(id.index())?.take();
        if device.is_some() {
            debug!("device {} detached", id.index());
        }
        device
    }

    pub fn get(&self, id: DeviceId) -> Option<&S> {
        self.slots.get(id.index())?.as_ref()
    }

    pub fn get_mut(&mut self, id: DeviceId) -> Option<&mut S> {
        self.slots.get_mut(id.index())?.as_mut()
    }

    /// Number of attached devices
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Attached devices with their ids, in id order
    pub fn iter(&self) -> impl Iterator<Item = (DeviceId, &S)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| Some((DeviceId(index as u8), slot.as_ref()?)))
    }
}
